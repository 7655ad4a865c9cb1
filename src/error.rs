// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for the Mustekala browser
//!
//! Three families of failures cross the public boundary: caller misuse
//! (`Logic`), content-dependent navigation failures (`InvalidArgument`)
//! and transport failures, which pass through untouched.

use thiserror::Error;

/// Result type alias for Mustekala operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Mustekala browser
#[derive(Error, Debug)]
pub enum Error {
    /// A link, form or button could not be located in the current document
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Browser misuse: nothing to follow, redirect limit reached, empty history
    #[error("{0}")]
    Logic(String),

    /// HTTP transport failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Malformed cookie string
    #[error("invalid cookie: {0}")]
    Cookie(String),

    /// Selector parsing error
    #[error("invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },

    /// I/O error (file uploads)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new invalid-argument error
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Create a new logic error
    pub fn logic<S: Into<String>>(msg: S) -> Self {
        Error::Logic(msg.into())
    }

    /// Create a new cookie error
    pub fn cookie<S: Into<String>>(msg: S) -> Self {
        Error::Cookie(msg.into())
    }

    /// Create a selector error
    pub fn selector(selector: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Selector {
            selector: selector.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a logic (misuse) error
    pub fn is_logic(&self) -> bool {
        matches!(self, Error::Logic(_))
    }

    /// Check if this is an invalid-argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }

    /// Check if this is a transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let err = Error::logic("the request was not redirected");
        assert!(err.is_logic());
        assert!(!err.is_invalid_argument());

        let err = Error::invalid_argument("no link matching \"Sign in\"");
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_error_display() {
        let err = Error::logic("the page history is empty");
        assert_eq!(err.to_string(), "the page history is empty");

        let err = Error::invalid_argument("missing button");
        assert_eq!(err.to_string(), "invalid argument: missing button");
    }
}
