//! Engine error type
//!
//! Steady-state stepping never fails; only construction and lookups do.
//! Those return `Result<T, EngineError>`.

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// Options could not be parsed or contain an unusable value
    InvalidOptions {
        message: String,
    },
    /// A polygon cannot carry mass (fewer than 3 vertices or zero area)
    DegenerateShape {
        reason: &'static str,
    },
    /// No body with this id exists in the world
    UnknownBody {
        id: u32,
    },
    UnknownConstraint {
        id: u32,
    },
    UnknownComposite {
        id: u32,
    },
}

impl EngineError {
    pub(crate) fn invalid_options(message: impl Into<String>) -> Self {
        Self::InvalidOptions { message: message.into() }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOptions { message } => write!(f, "invalid options: {message}"),
            Self::DegenerateShape { reason } => write!(f, "degenerate shape: {reason}"),
            Self::UnknownBody { id } => write!(f, "no body with id {id}"),
            Self::UnknownConstraint { id } => write!(f, "no constraint with id {id}"),
            Self::UnknownComposite { id } => write!(f, "no composite with id {id}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        Self::invalid_options(e.to_string())
    }
}
