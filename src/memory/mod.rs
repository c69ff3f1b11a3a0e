pub mod replay;

pub use replay::{Admission, Example, ReplayMemory};
