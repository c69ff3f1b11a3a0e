use rand::Rng;

use crate::{
    config::LearnerConfig,
    error::{LearnerError, Result},
    memory::replay::{Example, ReplayMemory},
    network::{
        input::Pixels,
        params::NetworkParameters,
        prediction::{Activations, Prediction},
    },
    train::{retrain, trainer},
};

/// Losses reported by `Network::teach`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeachOutcome {
    /// L1 residual of the step on the new example.
    pub loss: f64,
    /// Mean step loss of the replay pass that followed.
    pub replay_loss: f64,
}

/// An incrementally trained classifier together with its replay memory.
///
/// Not internally synchronized: callers sharing a network across threads must
/// serialize access themselves.
#[derive(Debug, Clone)]
pub struct Network {
    pub(crate) config: LearnerConfig,
    pub(crate) params: NetworkParameters,
    pub(crate) memory: ReplayMemory,
}

impl Network {
    /// Fresh network with random weights drawn from the thread RNG.
    pub fn new(config: LearnerConfig) -> Result<Network> {
        Network::with_rng(config, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(config: LearnerConfig, rng: &mut R) -> Result<Network> {
        config.validate()?;
        let params = NetworkParameters::random(
            config.input_size,
            config.hidden_size,
            config.output_size,
            config.learning_rate,
            rng,
        );
        let memory = ReplayMemory::new(config.output_size, config.max_examples);
        Ok(Network { config, params, memory })
    }

    /// Wraps existing parameters with an empty memory. Layer sizes and the
    /// learning rate are taken from `params`.
    pub fn from_parameters(params: NetworkParameters, config: LearnerConfig) -> Result<Network> {
        let config = LearnerConfig {
            input_size: params.input_size(),
            hidden_size: params.hidden_size(),
            output_size: params.output_size(),
            learning_rate: params.learning_rate(),
            ..config
        };
        config.validate()?;
        let memory = ReplayMemory::new(config.output_size, config.max_examples);
        Ok(Network { config, params, memory })
    }

    pub fn config(&self) -> &LearnerConfig {
        &self.config
    }

    pub fn parameters(&self) -> &NetworkParameters {
        &self.params
    }

    pub fn memory(&self) -> &ReplayMemory {
        &self.memory
    }

    pub fn example_count(&self) -> usize {
        self.memory.len()
    }

    /// Inference only.
    pub fn predict<I: Pixels + ?Sized>(&self, input: &I) -> Result<Activations> {
        self.params.forward(&input.flatten())
    }

    /// Most likely label, its confidence, and the raw activations.
    pub fn get_predicted_label<I: Pixels + ?Sized>(&self, input: &I) -> Result<Prediction> {
        self.predict(input).map(Prediction::from)
    }

    /// Stores the example in replay memory, then takes one gradient step on it.
    /// Invalid input or label leaves both memory and weights untouched.
    pub fn record_and_train<I: Pixels + ?Sized>(&mut self, input: &I, target: usize) -> Result<f64> {
        let input = input.flatten();
        self.check_label(target)?;
        self.params.check_input(&input)?;

        let example = Example::new(input.into_owned(), target);
        self.memory.admit(example.clone());
        trainer::train_on_example(&mut self.params, &example.input, example.target)
    }

    /// Replay consolidation over a balanced sample, using the thread RNG.
    pub fn retrain_all(&mut self, epochs: usize) -> Result<f64> {
        self.retrain_all_with(epochs, &mut rand::thread_rng())
    }

    /// Replay consolidation with a caller-supplied random source.
    pub fn retrain_all_with<R: Rng + ?Sized>(&mut self, epochs: usize, rng: &mut R) -> Result<f64> {
        retrain::retrain_all(
            &mut self.params,
            &self.memory,
            self.config.max_sample_per_class,
            epochs,
            rng,
        )
    }

    /// A full teaching event: record and train on the example, then replay
    /// memory for `replay_epochs` epochs.
    pub fn teach<I: Pixels + ?Sized>(&mut self, input: &I, target: usize) -> Result<TeachOutcome> {
        self.teach_with(input, target, &mut rand::thread_rng())
    }

    pub fn teach_with<I: Pixels + ?Sized, R: Rng + ?Sized>(
        &mut self,
        input: &I,
        target: usize,
        rng: &mut R,
    ) -> Result<TeachOutcome> {
        let loss = self.record_and_train(input, target)?;
        let replay_loss = self.retrain_all_with(self.config.replay_epochs, rng)?;
        Ok(TeachOutcome { loss, replay_loss })
    }

    /// Forgets everything: new random weights and an empty memory.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.params = NetworkParameters::random(
            self.config.input_size,
            self.config.hidden_size,
            self.config.output_size,
            self.config.learning_rate,
            rng,
        );
        self.memory.clear();
    }

    fn check_label(&self, target: usize) -> Result<()> {
        if target >= self.config.output_size {
            return Err(LearnerError::InvalidLabel {
                label: target,
                classes: self.config.output_size,
            });
        }
        Ok(())
    }
}
