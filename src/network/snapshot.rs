//! JSON persistence of a `Network`: sizes, the four weight matrices as nested
//! arrays, and the replay memory verbatim.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    config::LearnerConfig,
    error::{LearnerError, Result},
    math::matrix::Matrix,
    memory::replay::{Example, ReplayMemory},
    network::{
        network::Network,
        params::{check_shape, NetworkParameters},
    },
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotRef<'a> {
    input_size: usize,
    hidden_size: usize,
    output_size: usize,
    weights1: Vec<Vec<f64>>,
    bias1: Vec<Vec<f64>>,
    weights2: Vec<Vec<f64>>,
    bias2: Vec<Vec<f64>>,
    examples: &'a [Example],
}

/// Every field optional so a missing one can be reported by name.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSnapshot {
    input_size: Option<usize>,
    hidden_size: Option<usize>,
    output_size: Option<usize>,
    #[serde(alias = "W1")]
    weights1: Option<Value>,
    #[serde(alias = "b1")]
    bias1: Option<Value>,
    #[serde(alias = "W2")]
    weights2: Option<Value>,
    #[serde(alias = "b2")]
    bias2: Option<Value>,
    #[serde(default)]
    examples: Option<Value>,
}

impl Network {
    /// Encodes the network as a JSON document.
    pub fn serialize(&self) -> Result<String> {
        let p = &self.params;
        let snapshot = SnapshotRef {
            input_size: p.input_size(),
            hidden_size: p.hidden_size(),
            output_size: p.output_size(),
            weights1: p.w1.to_rows(),
            bias1: p.b1.to_rows(),
            weights2: p.w2.to_rows(),
            bias2: p.b2.to_rows(),
            examples: self.memory.examples(),
        };
        Ok(serde_json::to_string(&snapshot)?)
    }

    /// Rebuilds a network from `serialize` output with default hyperparameters.
    pub fn deserialize(text: &str) -> Result<Network> {
        Network::deserialize_with(text, LearnerConfig::default())
    }

    /// Rebuilds a network from `serialize` output. Layer sizes come from the
    /// payload; every other setting from `config`.
    pub fn deserialize_with(text: &str, config: LearnerConfig) -> Result<Network> {
        let raw: RawSnapshot = serde_json::from_str(text)?;

        let input_size = required_size(raw.input_size, "inputSize")?;
        let hidden_size = required_size(raw.hidden_size, "hiddenSize")?;
        let output_size = required_size(raw.output_size, "outputSize")?;
        let w1 = required(raw.weights1, "weights1")?;
        let b1 = required(raw.bias1, "bias1")?;
        let w2 = required(raw.weights2, "weights2")?;
        let b2 = required(raw.bias2, "bias2")?;

        let w1 = to_matrix("weights1", w1, input_size, hidden_size)?;
        let b1 = to_matrix("bias1", b1, 1, hidden_size)?;
        let w2 = to_matrix("weights2", w2, hidden_size, output_size)?;
        let b2 = to_matrix("bias2", b2, 1, output_size)?;

        let config = LearnerConfig {
            input_size,
            hidden_size,
            output_size,
            ..config
        };
        config.validate()?;
        let params = NetworkParameters::from_matrices(w1, b1, w2, b2, config.learning_rate)?;
        let examples = to_examples(raw.examples, input_size, output_size)?;
        let memory = ReplayMemory::from_examples(examples, output_size, config.max_examples);

        Ok(Network { config, params, memory })
    }

    /// Writes `serialize()` output to `path`.
    pub fn save_json(&self, path: &str) -> Result<()> {
        std::fs::write(path, self.serialize()?)?;
        info!("model saved to {path} ({} examples)", self.memory.len());
        Ok(())
    }

    /// Reads a network previously written by `save_json`.
    pub fn load_json(path: &str) -> Result<Network> {
        let text = std::fs::read_to_string(path)?;
        Network::deserialize(&text)
    }

    /// Loads `path`, or starts over with a fresh network if it is missing or
    /// unreadable.
    pub fn load_or_fresh(path: &str, config: LearnerConfig) -> Result<Network> {
        let loaded = std::fs::read_to_string(path)
            .map_err(LearnerError::from)
            .and_then(|text| Network::deserialize_with(&text, config.clone()));
        match loaded {
            Ok(network) => {
                info!("model loaded from {path} ({} examples)", network.example_count());
                Ok(network)
            }
            Err(e) => {
                warn!("could not load {path}, starting fresh: {e}");
                Network::new(config)
            }
        }
    }
}

/// Zero counts as absent.
fn required_size(value: Option<usize>, name: &str) -> Result<usize> {
    match value {
        Some(n) if n > 0 => Ok(n),
        _ => Err(missing(name)),
    }
}

fn required(value: Option<Value>, name: &str) -> Result<Value> {
    match value {
        Some(Value::Null) | None => Err(missing(name)),
        Some(v) => Ok(v),
    }
}

fn missing(name: &str) -> LearnerError {
    LearnerError::Format(format!("missing required property `{name}`"))
}

fn to_matrix(name: &str, value: Value, rows: usize, cols: usize) -> Result<Matrix> {
    let nested: Vec<Vec<f64>> = serde_json::from_value(value)
        .map_err(|e| LearnerError::matrix(name, e.to_string()))?;
    let matrix = Matrix::from_rows(name, nested)?;
    check_shape(name, &matrix, rows, cols)?;
    Ok(matrix)
}

fn to_examples(value: Option<Value>, input_size: usize, classes: usize) -> Result<Vec<Example>> {
    let Some(value @ Value::Array(_)) = value else {
        return Ok(Vec::new());
    };
    let examples: Vec<Example> = serde_json::from_value(value)
        .map_err(|e| LearnerError::Format(format!("invalid examples: {e}")))?;
    for (i, ex) in examples.iter().enumerate() {
        if ex.input.len() != input_size {
            return Err(LearnerError::Format(format!(
                "example {i} has {} inputs, expected {input_size}",
                ex.input.len()
            )));
        }
        if ex.target >= classes {
            return Err(LearnerError::Format(format!(
                "example {i} has label {}, expected below {classes}",
                ex.target
            )));
        }
    }
    Ok(examples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn small() -> Network {
        let config = LearnerConfig::with_sizes(4, 3, 2);
        Network::with_rng(config, &mut StdRng::seed_from_u64(31)).unwrap()
    }

    #[test]
    fn empty_object_is_a_format_error() {
        assert!(matches!(Network::deserialize("{}"), Err(LearnerError::Format(_))));
    }

    #[test]
    fn garbage_is_a_format_error() {
        assert!(matches!(Network::deserialize("not json"), Err(LearnerError::Format(_))));
    }

    #[test]
    fn each_required_field_is_checked() {
        let full: Value = serde_json::from_str(&small().serialize().unwrap()).unwrap();
        for field in ["inputSize", "hiddenSize", "outputSize", "weights1", "bias1", "weights2", "bias2"] {
            let mut doc = full.clone();
            doc.as_object_mut().unwrap().remove(field);
            let err = Network::deserialize(&doc.to_string()).unwrap_err();
            assert!(
                matches!(err, LearnerError::Format(ref msg) if msg.contains(field)),
                "{field}: {err}"
            );
        }
    }

    #[test]
    fn zero_size_counts_as_missing() {
        let mut doc: Value = serde_json::from_str(&small().serialize().unwrap()).unwrap();
        doc["hiddenSize"] = 0.into();
        assert!(matches!(Network::deserialize(&doc.to_string()), Err(LearnerError::Format(_))));
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let mut doc: Value = serde_json::from_str(&small().serialize().unwrap()).unwrap();
        doc["inputSize"] = 5.into();
        let err = Network::deserialize(&doc.to_string()).unwrap_err();
        assert!(matches!(err, LearnerError::MatrixConversion { ref name, .. } if name == "weights1"));
    }

    #[test]
    fn non_numeric_matrix_is_a_conversion_error() {
        let mut doc: Value = serde_json::from_str(&small().serialize().unwrap()).unwrap();
        doc["bias2"] = serde_json::json!([["a", "b"]]);
        assert!(matches!(
            Network::deserialize(&doc.to_string()),
            Err(LearnerError::MatrixConversion { .. })
        ));
    }

    #[test]
    fn missing_or_odd_examples_default_to_empty() {
        let mut doc: Value = serde_json::from_str(&small().serialize().unwrap()).unwrap();
        doc.as_object_mut().unwrap().remove("examples");
        assert!(Network::deserialize(&doc.to_string()).unwrap().memory().is_empty());
        doc["examples"] = "nope".into();
        assert!(Network::deserialize(&doc.to_string()).unwrap().memory().is_empty());
    }

    #[test]
    fn malformed_examples_are_rejected() {
        let mut doc: Value = serde_json::from_str(&small().serialize().unwrap()).unwrap();
        doc["examples"] = serde_json::json!([{ "input": [0.0, 1.0], "target": 0 }]);
        assert!(matches!(Network::deserialize(&doc.to_string()), Err(LearnerError::Format(_))));
        doc["examples"] = serde_json::json!([{ "input": [0.0, 1.0, 0.0, 0.0], "target": 2 }]);
        assert!(matches!(Network::deserialize(&doc.to_string()), Err(LearnerError::Format(_))));
    }

    #[test]
    fn upper_case_matrix_keys_are_accepted() {
        let text = small()
            .serialize()
            .unwrap()
            .replace("\"weights1\"", "\"W1\"")
            .replace("\"weights2\"", "\"W2\"");
        assert!(Network::deserialize(&text).is_ok());
    }

    #[test]
    fn round_trip_is_exact() {
        let mut net = small();
        net.record_and_train(&[1.0, 0.0, 1.0, 0.0], 1).unwrap();
        net.record_and_train(&[0.0, 1.0, 0.0, 0.3], 0).unwrap();
        let restored = Network::deserialize(&net.serialize().unwrap()).unwrap();
        assert_eq!(restored.parameters(), net.parameters());
        assert_eq!(restored.memory().examples(), net.memory().examples());
    }

    #[test]
    fn load_or_fresh_falls_back_on_missing_file() {
        let path = std::env::temp_dir().join("ferrite-tutor-definitely-missing.json");
        let net = Network::load_or_fresh(path.to_str().unwrap(), LearnerConfig::default()).unwrap();
        assert!(net.memory().is_empty());
        assert_eq!(net.config().input_size, 64);
    }
}
