// Fetch-cycle errors. Caught at the poller boundary, never surfaced to callers.

/// Why one fetch against the collector failed.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Non-2xx response; the body is not read.
    #[error("collector returned HTTP {status}")]
    Http { status: u16 },

    /// Connection refused, DNS failure, timeout, or body read failure.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Body is not JSON, or neither a record nor an array of records.
    #[error("malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

impl FetchError {
    /// Short label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Http { .. } => "http",
            FetchError::Network(_) => "network",
            FetchError::MalformedResponse(_) => "malformed_response",
        }
    }
}
