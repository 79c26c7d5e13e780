//! Error types for console client operations

use thiserror::Error;
use url::Url;

/// Result type alias for console client operations
pub type Result<T> = std::result::Result<T, ConsoleClientError>;

/// Errors that can occur during console client operations
///
/// The two request failure kinds mirror where the failure originated:
/// [`Client`](ConsoleClientError::Client) never reached a backend response
/// (connection refused, timeout, undecodable body), while
/// [`Server`](ConsoleClientError::Server) carries whatever the backend sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsoleClientError {
    /// Client-side or network failure
    #[error("{message}")]
    Client { url: Option<Url>, message: String },

    /// Backend returned an unsuccessful status code
    #[error("Backend returned code {status}, body was: {body}")]
    Server { url: Url, status: u16, body: String },

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Invalid default header value
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Local I/O failure outside the request path
    #[error("I/O error: {0}")]
    Io(String),
}

impl ConsoleClientError {
    /// Create a client-side error
    pub fn client_error(url: Option<Url>, message: impl Into<String>) -> Self {
        Self::Client {
            url,
            message: message.into(),
        }
    }

    /// Create a server error from status code and raw body
    pub fn server_error(url: Url, status: u16, body: impl Into<String>) -> Self {
        Self::Server {
            url,
            status,
            body: body.into(),
        }
    }

    /// URL of the request that failed, if known
    pub fn url(&self) -> Option<&Url> {
        match self {
            Self::Client { url, .. } => url.as_ref(),
            Self::Server { url, .. } => Some(url),
            Self::InvalidUrl(_) | Self::InvalidHeader(_) | Self::Io(_) => None,
        }
    }

    /// HTTP status returned by the backend, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend produced this failure
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Server { .. })
    }
}

impl From<std::io::Error> for ConsoleClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<reqwest::Error> for ConsoleClientError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("Request timed out: {}", err)
        } else if err.is_connect() {
            format!("Connection failed: {}", err)
        } else {
            err.to_string()
        };
        Self::Client {
            url: err.url().cloned(),
            message,
        }
    }
}
