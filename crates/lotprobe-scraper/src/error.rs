use thiserror::Error;

/// Failures from the HTTP transport. HTTP-level error statuses are not
/// errors; only requests that never produced a body end up here.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("invalid proxy URL: {reason}")]
    InvalidProxy { reason: String },
}

/// Failures from running an external process.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} did not finish within {timeout_secs}s")]
    Timeout { program: String, timeout_secs: u64 },
}

/// Failures from the cookie minter. Neither variant is fatal to the process;
/// the orchestrator turns them into a terminal outcome for the current listing.
#[derive(Debug, Error)]
pub enum MinterError {
    #[error("cookie minter failed: {reason}")]
    Failed { reason: String },

    #[error("cookie minter output is not valid: {reason}")]
    InvalidOutput { reason: String },
}

impl From<RunnerError> for MinterError {
    fn from(err: RunnerError) -> Self {
        MinterError::Failed {
            reason: err.to_string(),
        }
    }
}
