use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the enhancement pipeline.
///
/// Every variant except [`Error::Config`] is scoped to a single target
/// file: the batch driver logs it and moves on to the next file.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// IO error with context about the file path.
    #[error("IO error accessing '{path}': {message}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// Configuration validation error.
    #[error("Invalid configuration: {message}")]
    Config {
        /// Detailed error message
        message: String,
    },

    /// Invalid UTF-8 encountered in a target file.
    #[error("Invalid UTF-8 encoding in file '{path}'. File may be binary or use unsupported encoding.")]
    InvalidUtf8 {
        /// Path to file with encoding issues
        path: PathBuf,
    },

    /// The HTTP call itself failed (connection, timeout, body read).
    #[error("Request to '{endpoint}' failed: {message}")]
    Transport {
        /// Endpoint that was called
        endpoint: String,
        /// Error message
        message: String,
    },

    /// The endpoint answered with a non-2xx status.
    #[error("Endpoint returned HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Response body, as far as it could be read
        body: String,
    },

    /// The completion response did not have the expected shape.
    #[error("Malformed completion response: {reason}")]
    Envelope {
        /// What was missing or wrong
        reason: String,
    },

    /// The generated document is not valid JSON.
    #[error("Generated document is not valid JSON: {message}")]
    Parse {
        /// Parser error message
        message: String,
    },

    /// The generated document has no string `info.title`.
    #[error("Generated document has no string 'info.title'")]
    MissingTitle,

    /// The title cannot be used as a file name.
    #[error("Title '{title}' cannot be used as a file name: {reason}")]
    InvalidTitle {
        /// Offending title
        title: String,
        /// Reason it was rejected
        reason: String,
    },

    /// The rename target already exists.
    #[error("Refusing to replace existing file '{path}'")]
    Collision {
        /// Path that already exists
        path: PathBuf,
    },
}

impl Error {
    /// Creates an IO error with path context.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid UTF-8 error.
    #[must_use]
    pub fn invalid_utf8(path: impl Into<PathBuf>) -> Self {
        Self::InvalidUtf8 { path: path.into() }
    }

    /// Creates a transport error for the given endpoint.
    #[must_use]
    pub fn transport(endpoint: impl Into<String>, source: &reqwest::Error) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            message: source.to_string(),
        }
    }

    /// Creates a structural response error.
    #[must_use]
    pub fn envelope(reason: impl Into<String>) -> Self {
        Self::Envelope {
            reason: reason.into(),
        }
    }

    /// Creates an invalid title error.
    #[must_use]
    pub fn invalid_title(title: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTitle {
            title: title.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this is an IO error.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// Returns true if the remote call failed or answered non-2xx.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::HttpStatus { .. })
    }

    /// Returns true if the generated document could not be used.
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::MissingTitle)
    }
}
