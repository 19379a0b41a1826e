use rspotify::ClientError;
use rspotify::http::HttpError;
use rspotify::model::IdError;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced by the export and download stages.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Spotify error: {0}")]
    Spotify(#[from] ClientError),

    #[error("Invalid Spotify id: {0}")]
    InvalidId(#[from] IdError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Whether an error is worth retrying.
///
/// Transient covers the remote hiccups that tend to clear on their own:
/// rate limiting, server errors, timeouts, dropped connections. Everything
/// else (auth failures, bad ids, parse errors, local configuration) is
/// terminal and retrying it would only burn the backoff budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Likely to succeed on a later attempt.
    Transient,
    /// Retrying cannot help; fail fast.
    Terminal,
}

impl Error {
    /// Classify this error for retry decisions.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Spotify(ClientError::Http(http)) => match http.as_ref() {
                HttpError::StatusCode(response) => status_kind(response.status().as_u16()),
                HttpError::Client(e) if e.is_timeout() || e.is_connect() || e.is_request() => {
                    ErrorKind::Transient
                }
                HttpError::Client(_) => ErrorKind::Terminal,
            },
            Error::Io(e) => io_kind(e),
            _ => ErrorKind::Terminal,
        }
    }
}

/// Classify an HTTP status code for retry decisions.
#[must_use]
pub fn status_kind(code: u16) -> ErrorKind {
    match code {
        429 | 500..=599 => ErrorKind::Transient,
        _ => ErrorKind::Terminal,
    }
}

fn io_kind(e: &std::io::Error) -> ErrorKind {
    use std::io::ErrorKind as Io;
    match e.kind() {
        Io::TimedOut | Io::ConnectionReset | Io::ConnectionAborted | Io::Interrupted => {
            ErrorKind::Transient
        }
        _ => ErrorKind::Terminal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_429_and_5xx_transient() {
        assert_eq!(status_kind(429), ErrorKind::Transient);
        assert_eq!(status_kind(500), ErrorKind::Transient);
        assert_eq!(status_kind(503), ErrorKind::Transient);
    }

    #[test]
    fn http_4xx_terminal() {
        assert_eq!(status_kind(401), ErrorKind::Terminal);
        assert_eq!(status_kind(403), ErrorKind::Terminal);
        assert_eq!(status_kind(404), ErrorKind::Terminal);
    }

    #[test]
    fn timeouts_transient_configuration_terminal() {
        let timeout = Error::Io(std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out"));
        assert_eq!(timeout.kind(), ErrorKind::Transient);

        let config = Error::Configuration("missing credentials".into());
        assert_eq!(config.kind(), ErrorKind::Terminal);
    }
}
