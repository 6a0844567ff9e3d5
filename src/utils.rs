// src/utils.rs
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

/// Failures of a single proxy request. Each one ends that request.
#[derive(Debug, PartialEq)]
pub enum ProxyError {
    /// No usable upstream URL was configured at startup.
    MissingUpstreamUrl,
    /// Upstream answered with a non-success status; the code is forwarded.
    UpstreamStatus(u16),
    /// The exchange itself failed: connect, read or JSON decoding.
    Transport(String),
}

impl fmt::Display for ProxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingUpstreamUrl => write!(f, "Backend URL is not configured"),
            Self::UpstreamStatus(_) => write!(f, "Failed to fetch server data"),
            Self::Transport(_) => write!(f, "An error occurred while fetching server data"),
        }
    }
}

impl ResponseError for ProxyError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::UpstreamStatus(code) => {
                StatusCode::from_u16(*code).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::MissingUpstreamUrl | Self::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(self.to_string())
    }
}

/// Why one poll of the status endpoint produced no data.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    Status(u16),
    Transport(String),
    Decode(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(_) => write!(f, "Failed to fetch server data"),
            Self::Transport(msg) => write!(f, "{}", msg),
            Self::Decode(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}
