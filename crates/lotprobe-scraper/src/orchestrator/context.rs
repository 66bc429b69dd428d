use serde::Serialize;

use crate::dispatch::RawResponse;
use crate::listing::ListingRequest;

/// One recorded step of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    pub label: String,
    /// Filtered jar contents, serialized, at the time of the step.
    pub jar_snapshot: String,
    /// `None` until the minter has run.
    pub minted_cookies: Option<String>,
    pub response: RawResponse,
}

/// Ordered log of the steps taken for one listing. Entries are only ever
/// appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AttemptTrace {
    entries: Vec<TraceEntry>,
}

impl AttemptTrace {
    #[must_use]
    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }
}

/// State carried from one stage to the next. Stages take it by value and
/// hand back an extended copy; nothing already recorded is rewritten.
#[derive(Debug, Clone)]
pub(crate) struct RunContext {
    pub request: ListingRequest,
    pub trace: AttemptTrace,
    pub minted_cookies: Option<String>,
    /// Most recent payload seen: a response body or minted data.
    pub latest: RawResponse,
}

impl RunContext {
    pub(crate) fn new(request: ListingRequest) -> Self {
        Self {
            request,
            trace: AttemptTrace::default(),
            minted_cookies: None,
            latest: RawResponse::empty(),
        }
    }

    pub(crate) fn with_minted_cookies(self, header: String) -> Self {
        Self {
            minted_cookies: Some(header),
            ..self
        }
    }

    /// Appends a trace entry and makes `response` the latest payload.
    pub(crate) fn record(
        mut self,
        label: &str,
        jar_snapshot: String,
        response: RawResponse,
    ) -> Self {
        self.trace.entries.push(TraceEntry {
            label: label.to_owned(),
            jar_snapshot,
            minted_cookies: self.minted_cookies.clone(),
            response: response.clone(),
        });
        self.latest = response;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_appends_in_order_and_tracks_latest() {
        let request = ListingRequest::parse("https://www.copart.com/lot/1").unwrap();
        let ctx = RunContext::new(request)
            .record("initial_fetch", String::new(), RawResponse::new("first", Some(403)))
            .with_minted_cookies("a=1".to_owned())
            .record("mint", "sessionid=x".to_owned(), RawResponse::new("{}", None));

        assert_eq!(ctx.trace.labels(), vec!["initial_fetch", "mint"]);
        assert_eq!(ctx.trace.entries()[0].minted_cookies, None);
        assert_eq!(ctx.trace.entries()[1].minted_cookies.as_deref(), Some("a=1"));
        assert_eq!(ctx.latest.body, "{}");
    }

    #[test]
    fn trace_serializes_as_plain_array() {
        let request = ListingRequest::parse("https://www.iaai.com/x").unwrap();
        let ctx = RunContext::new(request).record("fetch", String::new(), RawResponse::empty());
        let json = serde_json::to_value(&ctx.trace).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["label"], "fetch");
        assert_eq!(json[0]["minted_cookies"], serde_json::Value::Null);
    }
}
