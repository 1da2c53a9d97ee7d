//! Error types for board construction and descriptor lookups.

use thiserror::Error;

/// Errors surfaced by the Vaaman board crate.
#[derive(Debug, Error)]
pub enum BoardError {
    /// A dynamic allocation for the descriptor failed. Nothing partially
    /// built is returned alongside this error.
    #[error("Allocation failed: {0}")]
    Allocation(String),

    /// Logical pin index is 0 (reserved) or beyond the physical pin count.
    #[error("Invalid pin index: {0}")]
    InvalidPin(usize),

    /// The pin exists but does not support the requested subsystem.
    #[error("Pin {pin} is not {capability}-capable")]
    MissingCapability {
        pin: usize,
        capability: &'static str,
    },

    /// Bus or device index beyond the configured count.
    #[error("No {bus} bus at index {index}")]
    BusOutOfRange { bus: &'static str, index: usize },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BoardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            BoardError::InvalidPin(0).to_string(),
            "Invalid pin index: 0"
        );
        assert_eq!(
            BoardError::MissingCapability {
                pin: 2,
                capability: "gpio"
            }
            .to_string(),
            "Pin 2 is not gpio-capable"
        );
        assert_eq!(
            BoardError::BusOutOfRange {
                bus: "spi",
                index: 5
            }
            .to_string(),
            "No spi bus at index 5"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: BoardError = io.into();
        assert!(matches!(err, BoardError::Io(_)));
    }
}
