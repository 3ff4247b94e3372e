use thiserror::Error;

/// Failures inside the advisory layer. These never reach callers of
/// `AdvisoryGenerator::generate_insight`; they are folded into an outcome.
#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Advisory backend request failed: {0}")]
    Http(String),

    #[error("Advisory backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Response blocked by safety filter: {0}")]
    Blocked(String),

    #[error("Advisory backend returned no usable candidate: {0}")]
    EmptyCandidate(String),

    #[error("Advisory backend timed out after {0} ms")]
    Timeout(u64),

    #[error("Advisory request cancelled")]
    Cancelled,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
