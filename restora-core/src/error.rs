//! Error handling for the Restora core layer.
//!
//! Error types are defined with `thiserror` and follow a simple scheme:
//! specific error enums per concern ([`ConfigError`], [`LoggingError`]) that
//! the crate-wide [`CoreError`] wraps via `#[from]` conversions.

use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for the core infrastructure layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Errors related to configuration loading, parsing, or validation.
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),

    /// Errors that occur while setting up the logging system.
    #[error("Logging Error: {0}")]
    Logging(#[from] LoggingError),

    /// Errors related to filesystem operations not covered by a more
    /// specific variant. Carries the path involved and the source I/O error.
    #[error("Filesystem Error: {message} (Path: {path:?})")]
    Filesystem {
        message: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// General I/O errors.
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),
}

/// Specific errors related to configuration handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read configuration file from {path:?}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file could not be parsed as TOML.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// The configuration parsed but contained invalid values.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// No configuration file was found at any of the expected locations.
    #[error("Configuration file not found at expected locations: {locations:?}")]
    NotFound { locations: Vec<PathBuf> },

    /// A required base directory (e.g. the XDG config home) could not be
    /// determined.
    #[error("Could not determine base directory for {dir_type}")]
    DirectoryUnavailable { dir_type: String },
}

/// Errors raised while initializing the logging subsystem.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The tracing subscriber could not be installed or configured.
    #[error("Logging initialization failed: {0}")]
    InitializationFailure(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn core_error_config_from_config_error() {
        let original = ConfigError::ValidationError("bad level".to_string());
        let core_err: CoreError = original.into();

        assert_eq!(
            format!("{}", core_err),
            "Configuration Error: Configuration validation failed: bad level"
        );
        assert!(core_err.source().is_some());
        match core_err.source().unwrap().downcast_ref::<ConfigError>() {
            Some(ConfigError::ValidationError(msg)) => assert_eq!(msg, "bad level"),
            _ => panic!("Incorrect source for CoreError::Config"),
        }
    }

    #[test]
    fn core_error_logging_from_logging_error() {
        let core_err: CoreError =
            LoggingError::InitializationFailure("subscriber already set".to_string()).into();
        assert_eq!(
            format!("{}", core_err),
            "Logging Error: Logging initialization failed: subscriber already set"
        );
    }

    #[test]
    fn core_error_filesystem_variant_carries_source() {
        let path = PathBuf::from("/tmp/restora-test");
        let core_err = CoreError::Filesystem {
            message: "File operation failed".to_string(),
            path: path.clone(),
            source: IoError::new(ErrorKind::PermissionDenied, "denied"),
        };

        assert_eq!(
            format!("{}", core_err),
            format!("Filesystem Error: File operation failed (Path: {:?})", path)
        );
        assert_eq!(
            core_err
                .source()
                .unwrap()
                .downcast_ref::<IoError>()
                .unwrap()
                .kind(),
            ErrorKind::PermissionDenied
        );
    }

    #[test]
    fn config_error_not_found_lists_locations() {
        let locations = vec![PathBuf::from("/a"), PathBuf::from("/b")];
        let err = ConfigError::NotFound {
            locations: locations.clone(),
        };
        assert_eq!(
            format!("{}", err),
            format!(
                "Configuration file not found at expected locations: {:?}",
                locations
            )
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn config_error_parse_error_from_toml() {
        let toml_err = toml::from_str::<toml::Value>("not [ valid").unwrap_err();
        let display = format!("{}", toml_err);
        let err: ConfigError = toml_err.into();
        assert_eq!(
            format!("{}", err),
            format!("Failed to parse configuration file: {}", display)
        );
    }
}
