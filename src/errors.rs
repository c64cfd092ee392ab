/*!
 * Error types for the signgloss application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions. Most of these never
 * reach the caller: the pipeline turns them into "no result" at each fallback
 * boundary and only logs them.
 */

use thiserror::Error;

/// Errors that can occur when working with text-generation provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The provider is not configured or could not be constructed
    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors that can occur while fetching a sign video from the remote dictionary
#[derive(Error, Debug)]
pub enum FetchError {
    /// Network-level failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote answered with a non-success status
    #[error("Remote responded with status {0}")]
    Status(u16),

    /// The page did not reference any video resource
    #[error("No video resource found for '{0}'")]
    NoVideo(String),

    /// A URL could not be built or resolved
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Writing the downloaded file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No remote dictionary is configured
    #[error("Fetcher unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur during an encyclopedia lookup
#[derive(Error, Debug)]
pub enum LookupError {
    /// No page matches the query
    #[error("No page found for '{0}'")]
    NotFound(String),

    /// Network-level or status failure
    #[error("Lookup request failed: {0}")]
    Request(String),

    /// The response body was not understood
    #[error("Failed to parse lookup response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Parse(error.to_string())
        } else {
            Self::Request(error.to_string())
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// The request carried no text or query
    #[error("{0}")]
    EmptyInput(String),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
