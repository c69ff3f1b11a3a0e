use std::fmt;

/// Every failure the learner can report. All of them are per-call and leave
/// the model exactly as it was before the call.
#[derive(Debug)]
pub enum LearnerError {
    /// Input vector length does not match the network's input size.
    Shape { expected: usize, actual: usize },
    /// Target label outside `[0, classes)`.
    InvalidLabel { label: usize, classes: usize },
    /// Serialized payload is not valid JSON, or a required field is missing.
    Format(String),
    /// A restored array cannot be read as a matrix of the declared shape.
    MatrixConversion { name: String, reason: String },
    /// Reading or writing a snapshot file failed.
    Io(std::io::Error),
}

pub type Result<T> = std::result::Result<T, LearnerError>;

impl LearnerError {
    pub(crate) fn matrix(name: &str, reason: impl Into<String>) -> Self {
        Self::MatrixConversion {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for LearnerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shape { expected, actual } => {
                write!(f, "shape error: expected {expected} inputs, got {actual}")
            }
            Self::InvalidLabel { label, classes } => {
                write!(f, "invalid label {label}: must be below {classes}")
            }
            Self::Format(msg) => write!(f, "invalid model format: {msg}"),
            Self::MatrixConversion { name, reason } => {
                write!(f, "cannot convert `{name}` to a matrix: {reason}")
            }
            Self::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for LearnerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LearnerError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for LearnerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Format(e.to_string())
    }
}
