use serde::{Deserialize, Serialize};

use crate::error::{LearnerError, Result};

/// Sizes and hyperparameters of a learner.
///
/// The defaults describe the drawing-pad model: an 8×8 grid, 16 hidden units
/// and four digit classes, with room for 100 remembered examples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnerConfig {
    pub input_size: usize,
    pub hidden_size: usize,
    pub output_size: usize,
    pub learning_rate: f64,
    /// Capacity of the replay memory.
    pub max_examples: usize,
    /// Per-class draw cap for one replay pass.
    pub max_sample_per_class: usize,
    /// Replay epochs run by `Network::teach` after every taught example.
    pub replay_epochs: usize,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        LearnerConfig {
            input_size: 64,
            hidden_size: 16,
            output_size: 4,
            learning_rate: 0.1,
            max_examples: 100,
            max_sample_per_class: 10,
            replay_epochs: 1,
        }
    }
}

impl LearnerConfig {
    /// Default hyperparameters with custom layer sizes.
    pub fn with_sizes(input_size: usize, hidden_size: usize, output_size: usize) -> Self {
        LearnerConfig {
            input_size,
            hidden_size,
            output_size,
            ..LearnerConfig::default()
        }
    }

    /// Per-class cap of the replay memory.
    pub fn max_per_class(&self) -> usize {
        self.max_examples / self.output_size.max(1)
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_size == 0 || self.hidden_size == 0 || self.output_size == 0 {
            return Err(LearnerError::Format("layer sizes must be positive".into()));
        }
        if self.max_examples < self.output_size {
            return Err(LearnerError::Format(format!(
                "max_examples ({}) must leave room for every one of the {} classes",
                self.max_examples, self.output_size
            )));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(LearnerError::Format(format!(
                "learning rate must be positive, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Reads and validates a config written by `save_json`. Missing keys take
    /// their default value.
    pub fn load_json(path: &str) -> Result<LearnerConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: LearnerConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_drawing_pad() {
        let config = LearnerConfig::default();
        assert_eq!((config.input_size, config.hidden_size, config.output_size), (64, 16, 4));
        assert_eq!(config.learning_rate, 0.1);
        assert_eq!(config.max_per_class(), 25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_degenerate_configs() {
        assert!(LearnerConfig::with_sizes(0, 16, 4).validate().is_err());
        let config = LearnerConfig { max_examples: 3, ..LearnerConfig::default() };
        assert!(config.validate().is_err());
        let config = LearnerConfig { learning_rate: f64::NAN, ..LearnerConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: LearnerConfig = serde_json::from_str(r#"{ "hidden_size": 32 }"#).unwrap();
        assert_eq!(config.hidden_size, 32);
        assert_eq!(config.max_examples, 100);
    }

    #[test]
    fn json_file_round_trip() {
        let path = std::env::temp_dir().join(format!("ferrite-tutor-config-{}.json", std::process::id()));
        let path = path.to_str().unwrap();
        let config = LearnerConfig::with_sizes(16, 8, 2);
        config.save_json(path).unwrap();
        assert_eq!(LearnerConfig::load_json(path).unwrap(), config);
        std::fs::remove_file(path).unwrap();
    }
}
