pub mod retrain;
pub mod trainer;

pub use retrain::{retrain_all, sample_balanced};
pub use trainer::train_on_example;
