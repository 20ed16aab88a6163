//! Application error types with rich context

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Terminal/TUI Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Terminal error: {message}")]
    Terminal { message: String },

    #[error("Failed to initialize terminal: {0}")]
    TerminalInit(String),

    #[error("Failed to restore terminal: {0}")]
    TerminalRestore(String),

    // ─────────────────────────────────────────────────────────────
    // Remote Queue Store Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Queue read failed: {message}")]
    RemoteRead { message: String },

    #[error("Queue write rejected: {message}")]
    RemoteWrite { message: String },

    #[error("Realtime channel error: {message}")]
    RemoteProtocol { message: String },

    // ─────────────────────────────────────────────────────────────
    // Location Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Geolocation is not available on this device")]
    GeolocationUnavailable,

    #[error("Geolocation permission denied")]
    GeolocationDenied,

    #[error("Timed out waiting for a position fix")]
    GeolocationTimeout,

    #[error("Location lookup failed: {message}")]
    Lookup { message: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid configuration: {message}")]
    ConfigInvalid { message: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn terminal(message: impl Into<String>) -> Self {
        Self::Terminal {
            message: message.into(),
        }
    }

    pub fn remote_read(message: impl Into<String>) -> Self {
        Self::RemoteRead {
            message: message.into(),
        }
    }

    pub fn remote_write(message: impl Into<String>) -> Self {
        Self::RemoteWrite {
            message: message.into(),
        }
    }

    pub fn remote_protocol(message: impl Into<String>) -> Self {
        Self::RemoteProtocol {
            message: message.into(),
        }
    }

    pub fn lookup(message: impl Into<String>) -> Self {
        Self::Lookup {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether a position watch must stop after this error.
    ///
    /// Timeouts are transient and the watch keeps polling; an unavailable or
    /// denied source will not recover on its own.
    pub fn ends_position_watch(&self) -> bool {
        matches!(
            self,
            Error::GeolocationUnavailable | Error::GeolocationDenied
        )
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions (for use with color-eyre)
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = Error::remote_write("duplicate key");
        assert_eq!(err.to_string(), "Queue write rejected: duplicate key");

        let err = Error::GeolocationDenied;
        assert!(err.to_string().contains("permission denied"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_position_watch_termination() {
        assert!(Error::GeolocationUnavailable.ends_position_watch());
        assert!(Error::GeolocationDenied.ends_position_watch());
        assert!(!Error::GeolocationTimeout.ends_position_watch());
    }

    #[test]
    fn test_context_preserves_error_variant() {
        let res: std::result::Result<(), Error> = Err(Error::TerminalRestore("no tty".into()));
        let err = res.context("leaving the TUI").unwrap_err();
        assert!(matches!(err, Error::TerminalRestore(_)));
    }

    #[test]
    fn test_context_converts_source_errors() {
        let res: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        ));
        let err = res.with_context(|| "writing config".to_string()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
