pub mod input;
pub mod network;
pub mod params;
pub mod prediction;
pub mod snapshot;

pub use input::Pixels;
pub use network::{Network, TeachOutcome};
pub use params::NetworkParameters;
pub use prediction::{Activations, Prediction};
