use thiserror::Error;

/// Why `get_latest_agents` could not produce a list. The `Display` text is
/// what ends up in the `error` field of the response envelope.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Missing API configuration")]
    MissingConfig,
    #[error("Backend server not available - please ensure it is running")]
    BackendUnavailable { status: u16 },
    #[error("Backend server not reachable - please check if it is running")]
    BackendUnreachable(#[source] reqwest::Error),
    #[error("Invalid API key - please check your configuration")]
    Unauthorized,
    #[error("Both latest and main endpoints failed - please check server status")]
    FallbackFailed { status: u16 },
    #[error("Server error - please try again later")]
    Server { status: u16 },
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("Invalid API response structure")]
    InvalidShape,
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid response body: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

impl FetchError {
    /// HTTP status reported by the backend, when the failure came from one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::BackendUnavailable { status }
            | Self::FallbackFailed { status }
            | Self::Server { status }
            | Self::Rejected { status, .. } => Some(*status),
            Self::Unauthorized => Some(401),
            _ => None,
        }
    }
}
