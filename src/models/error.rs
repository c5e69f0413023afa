//! Error types for the SQL generation client.
//!
//! Schema, transport and response errors all render as "Server Error" in the
//! result display. Application-level failures (`success: false`) are not
//! errors here, they travel inside [`GenerateResponse`](super::GenerateResponse).

use std::fmt;

/// Custom error type for the client.
#[derive(Debug)]
pub enum AppError {
    /// The schema text is not valid JSON
    InvalidSchema(String),
    /// The request could not be sent or the connection failed
    Transport(String),
    /// The response body is not the expected JSON
    InvalidResponse(String),
    /// Invalid client configuration
    Config(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSchema(msg) => write!(f, "Invalid schema JSON: {msg}"),
            Self::Transport(msg) => write!(f, "Request failed: {msg}"),
            Self::InvalidResponse(msg) => write!(f, "Invalid response: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::InvalidResponse(error.to_string())
        } else {
            Self::Transport(error.to_string())
        }
    }
}
