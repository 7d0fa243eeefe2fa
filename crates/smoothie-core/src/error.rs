//! Error types for the smoothie mixer
//!
//! Internal fallible operations return `Result<T, Error>`. The submission
//! controller never hands these to the user; it logs them and degrades.

use thiserror::Error;

/// Smoothie mixer error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Reference dictionary could not be read or parsed
    #[error("Dictionary error: {0}")]
    Dictionary(String),

    /// Network failure before a response arrived
    #[error("Transport error: {0}")]
    Transport(String),

    /// Lookup endpoint answered with a non-success status
    #[error("Unexpected status: {0}")]
    Status(u16),

    /// Response body did not have the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Durable client-side key could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// Submission with nothing but whitespace
    #[error("Empty input")]
    EmptyInput,

    /// Malformed configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(feature = "client")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Error::Status(status.as_u16()),
            None if err.is_decode() => Error::Decode(err.to_string()),
            None => Error::Transport(err.to_string()),
        }
    }
}

/// Result type alias for smoothie mixer operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(Error::Status(404).to_string(), "Unexpected status: 404");
        assert_eq!(Error::EmptyInput.to_string(), "Empty input");
        assert_eq!(
            Error::Dictionary("missing zutaten".into()).to_string(),
            "Dictionary error: missing zutaten"
        );
    }
}
