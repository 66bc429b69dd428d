use lotprobe_core::OutcomeRecord;
use serde::Serialize;

use super::context::AttemptTrace;
use crate::dispatch::RawResponse;

/// Everything known about a run once it reaches a terminal state.
#[derive(Debug, Clone, Serialize)]
pub struct TerminalRecord {
    /// Log stream name, e.g. `copart_good` or `iaai_dont_see`.
    pub sink: &'static str,
    pub outcome: OutcomeRecord,
    pub trace: AttemptTrace,
    /// Last body or minted payload seen before the run ended.
    pub response: Option<RawResponse>,
}

/// Receives exactly one [`TerminalRecord`] per resolved listing.
pub trait OutcomeSink: Send + Sync {
    fn record(&self, record: &TerminalRecord);
}

/// Emits terminal records as `tracing` events under `lotprobe::outcome`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl OutcomeSink for TracingSink {
    fn record(&self, record: &TerminalRecord) {
        let payload = match serde_json::to_string(record) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(sink = record.sink, error = %e, "failed to serialize terminal record");
                return;
            }
        };

        if record.outcome.is_success() {
            tracing::info!(
                target: "lotprobe::outcome",
                sink = record.sink,
                url = record.outcome.url(),
                steps = record.trace.len(),
                record = %payload,
                "listing resolved"
            );
        } else {
            tracing::warn!(
                target: "lotprobe::outcome",
                sink = record.sink,
                url = record.outcome.url(),
                error = ?record.outcome.error_kind(),
                steps = record.trace.len(),
                record = %payload,
                "listing failed"
            );
        }
    }
}
