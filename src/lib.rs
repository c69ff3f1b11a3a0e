pub mod activation;
pub mod config;
pub mod error;
pub mod math;
pub mod memory;
pub mod network;
pub mod train;

// Convenience re-exports
pub use config::LearnerConfig;
pub use error::{LearnerError, Result};
pub use math::matrix::Matrix;
pub use memory::replay::{Admission, Example, ReplayMemory};
pub use network::network::{Network, TeachOutcome};
pub use network::params::NetworkParameters;
pub use network::prediction::{Activations, Prediction};
pub use network::input::Pixels;
pub use train::trainer::train_on_example;
