use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors raised by the distance transforms and their configuration. Every failure is a
/// precondition failure detected before any output array is allocated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistanceMapError {
    /// A chamfer mask or named weight preset could not be built from the given weights.
    InvalidConfiguration(String),

    /// An array, spacing, or index argument does not conform to what the operation expects,
    /// for example a 3D array handed to a 2D transform.
    InvalidArgument(String),
}

impl DistanceMapError {
    pub fn configuration(msg: impl Into<String>) -> Box<dyn Error> {
        Box::new(Self::InvalidConfiguration(msg.into()))
    }

    pub fn argument(msg: impl Into<String>) -> Box<dyn Error> {
        Box::new(Self::InvalidArgument(msg.into()))
    }
}

impl Display for DistanceMapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DistanceMapError::InvalidConfiguration(msg) => {
                write!(f, "invalid configuration: {}", msg)
            }
            DistanceMapError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
        }
    }
}

impl Error for DistanceMapError {}

/// Returns true if the boxed error is a `DistanceMapError::InvalidArgument`.
pub fn is_invalid_argument(err: &(dyn Error + 'static)) -> bool {
    matches!(
        err.downcast_ref::<DistanceMapError>(),
        Some(DistanceMapError::InvalidArgument(_))
    )
}

/// Returns true if the boxed error is a `DistanceMapError::InvalidConfiguration`.
pub fn is_invalid_configuration(err: &(dyn Error + 'static)) -> bool {
    matches!(
        err.downcast_ref::<DistanceMapError>(),
        Some(DistanceMapError::InvalidConfiguration(_))
    )
}
