//! Error types and handling for the `TourGuide` application

use thiserror::Error;

/// Main error type for the `TourGuide` application
#[derive(Error, Debug)]
pub enum TourGuideError {
    /// No point of interest carries the requested identifier
    #[error("Point of interest not found: {id}")]
    NotFound { id: String },

    /// Persistence read or write failures
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON encoding or decoding errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

impl TourGuideError {
    /// Create a new not-found error for a POI identifier
    pub fn not_found<S: Into<String>>(id: S) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a new storage error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether the error came from an unknown POI identifier
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, TourGuideError::NotFound { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TourGuideError::NotFound { id } => {
                format!("No point of interest with id '{id}' exists.")
            }
            TourGuideError::Storage { .. } => {
                "Could not save your changes. Please try again.".to_string()
            }
            TourGuideError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            TourGuideError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            TourGuideError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            TourGuideError::Serialization { .. } => {
                "Stored data could not be read.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let not_found = TourGuideError::not_found("42");
        assert!(matches!(not_found, TourGuideError::NotFound { .. }));
        assert!(not_found.is_not_found());

        let storage_err = TourGuideError::storage("disk full");
        assert!(matches!(storage_err, TourGuideError::Storage { .. }));
        assert!(!storage_err.is_not_found());

        let validation_err = TourGuideError::validation("invalid coordinates");
        assert!(matches!(validation_err, TourGuideError::Validation { .. }));
    }

    #[test]
    fn test_user_messages() {
        let not_found = TourGuideError::not_found("42");
        assert!(not_found.user_message().contains("'42'"));

        let storage_err = TourGuideError::storage("test");
        assert!(storage_err.user_message().contains("try again"));

        let validation_err = TourGuideError::validation("test input");
        assert!(validation_err.user_message().contains("test input"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TourGuideError = io_err.into();
        assert!(matches!(err, TourGuideError::Io { .. }));
    }

    #[test]
    fn test_serde_error_conversion() {
        let serde_err = serde_json::from_str::<Vec<String>>("not json").unwrap_err();
        let err: TourGuideError = serde_err.into();
        assert!(matches!(err, TourGuideError::Serialization { .. }));
        assert_eq!(err.user_message(), "Stored data could not be read.");
    }
}
