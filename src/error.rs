//! Error types for warmtree
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in warmtree
#[derive(Debug, Error)]
pub enum WarmtreeError {
    /// Creating the branch or checkout failed
    #[error("Provisioning failed: {0}")]
    Provision(String),

    /// The checkout was created but post-creation setup failed
    #[error("Setup failed: {0}")]
    Setup(String),

    /// Moving or renaming a cached checkout failed
    #[error("Rebind failed: {0}")]
    Rebind(String),

    /// Removing a checkout or deleting its branch failed
    #[error("Disposal failed: {0}")]
    Dispose(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for warmtree operations
pub type Result<T> = std::result::Result<T, WarmtreeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provision_error() {
        let err = WarmtreeError::Provision("disk full".to_string());
        assert_eq!(err.to_string(), "Provisioning failed: disk full");
    }

    #[test]
    fn test_setup_error() {
        let err = WarmtreeError::Setup("HEAD does not resolve".to_string());
        assert_eq!(err.to_string(), "Setup failed: HEAD does not resolve");
    }

    #[test]
    fn test_rebind_error() {
        let err = WarmtreeError::Rebind("target path already exists".to_string());
        assert_eq!(err.to_string(), "Rebind failed: target path already exists");
    }

    #[test]
    fn test_dispose_error() {
        let err = WarmtreeError::Dispose("checkout is locked".to_string());
        assert_eq!(err.to_string(), "Disposal failed: checkout is locked");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: WarmtreeError = io_err.into();
        assert!(matches!(err, WarmtreeError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(WarmtreeError::Provision("test".to_string()))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
