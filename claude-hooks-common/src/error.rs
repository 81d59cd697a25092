//! Error types for the hook pipeline.

use thiserror::Error;

/// Result alias used throughout the hook pipeline.
pub type HooksResult<T> = Result<T, HooksError>;

/// Main error type for hook operations.
///
/// Every variant is terminal for the invocation; the CLI maps all of them to
/// a non-zero exit status and writes the message to stderr.
#[derive(Debug, Error)]
pub enum HooksError {
    /// The event keyword is not one of the known hook events.
    #[error("Unrecognized event: '{0}' (expected one of: stop, subagent-stop, notification)")]
    UnrecognizedEvent(String),

    /// No webhook target has been configured.
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    /// A configuration value is present but unusable.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidConfiguration {
        /// The offending configuration key.
        key: String,
        /// Why the value was rejected.
        message: String,
    },

    /// A configuration source could not be read or parsed.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] figment::Error),

    /// The webhook delivery attempt failed.
    #[error("Delivery failed: {0}")]
    Delivery(#[from] DeliveryError),

    /// Filesystem error while handling start files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a single webhook delivery attempt can fail.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Network or connection failure before a response was received.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("webhook returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body text, possibly empty.
        body: String,
    },
}

impl HooksError {
    /// Convenience constructor for [`HooksError::MissingConfiguration`].
    pub fn missing(message: impl Into<String>) -> Self {
        Self::MissingConfiguration(message.into())
    }

    /// Convenience constructor for [`HooksError::InvalidConfiguration`].
    pub fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            key: key.into(),
            message: message.into(),
        }
    }

    /// True for errors produced by the webhook call itself.
    pub fn is_delivery_failure(&self) -> bool {
        matches!(self, Self::Delivery(_))
    }
}
