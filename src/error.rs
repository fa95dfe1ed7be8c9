//! Store and configuration errors.

use std::io;

/// Error returned when a preference store cannot complete a write.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing medium is missing or refused access
    #[error("preference storage unavailable: {0}")]
    Unavailable(String),
    /// The backing medium is full
    #[error("preference storage quota exceeded")]
    QuotaExceeded,
    #[error("preference file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("preference file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error returned when a [`SwitcherConfig`](crate::SwitcherConfig) fails to load.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid switcher config JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A required field is empty
    #[error("switcher config field '{field}' must not be empty")]
    Empty { field: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_error_display() {
        let err = StoreError::Unavailable("no localStorage".to_string());
        let msg = err.to_string();
        assert!(msg.contains("unavailable"));
        assert!(msg.contains("no localStorage"));
    }

    #[test]
    fn test_io_error_converts() {
        let err: StoreError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(err, StoreError::Io(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_empty_field_error_display() {
        let err = ConfigError::Empty {
            field: "storage_key",
        };
        assert!(err.to_string().contains("storage_key"));
    }
}
