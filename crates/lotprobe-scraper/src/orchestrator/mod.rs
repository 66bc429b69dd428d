//! Per-listing escalation pipeline.
//!
//! A run starts from a [`ListingRequest`], walks the site's stage sequence
//! (fetch, block check, mint, retry, extract) and ends in exactly one
//! [`OutcomeRecord`]. Every terminal state, other than an unrecognized URL,
//! is also reported to the [`OutcomeSink`].

mod context;
mod copart;
mod iaai;
mod sink;

use std::path::PathBuf;
use std::sync::Arc;

use lotprobe_core::{AppConfig, ErrorKind, OutcomeRecord, SiteKind, VehicleRecord};

use crate::cookies::{self, JarLocks};
use crate::dispatch::{DispatchRequest, RawResponse, Transport};
use crate::extract::RuleSet;
use crate::error::MinterError;
use crate::listing::ListingRequest;
use crate::minter::ExternalCookieMinter;

use context::RunContext;

pub use context::{AttemptTrace, TraceEntry};
pub use sink::{OutcomeSink, TerminalRecord, TracingSink};

/// Filesystem and endpoint settings the pipeline needs.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub cookie_dir: PathBuf,
    pub cookie_file_base: String,
    /// Copart lot-details endpoint; the lot id is appended.
    pub copart_lot_details_url: String,
}

impl OrchestratorConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            cookie_dir: config.cookie_dir.clone(),
            cookie_file_base: config.cookie_file_base.clone(),
            copart_lot_details_url: config.copart_lot_details_url.clone(),
        }
    }

    #[must_use]
    pub fn jar_path(&self, site: SiteKind) -> PathBuf {
        cookies::jar_path(&self.cookie_dir, &self.cookie_file_base, site)
    }
}

/// How a run ended, before it is turned into an [`OutcomeRecord`].
#[derive(Debug)]
pub(crate) struct Terminal {
    sink: &'static str,
    result: Result<VehicleRecord, ErrorKind>,
}

impl Terminal {
    fn success(sink: &'static str, record: VehicleRecord) -> Self {
        Self {
            sink,
            result: Ok(record),
        }
    }

    fn failure(sink: &'static str, kind: ErrorKind) -> Self {
        Self {
            sink,
            result: Err(kind),
        }
    }
}

pub struct ListingOrchestrator {
    transport: Arc<dyn Transport>,
    minter: ExternalCookieMinter,
    rules: RuleSet,
    sink: Arc<dyn OutcomeSink>,
    config: OrchestratorConfig,
    locks: Arc<JarLocks>,
}

impl ListingOrchestrator {
    pub fn new(
        transport: Arc<dyn Transport>,
        minter: ExternalCookieMinter,
        rules: RuleSet,
        sink: Arc<dyn OutcomeSink>,
        config: OrchestratorConfig,
        locks: Arc<JarLocks>,
    ) -> Self {
        Self {
            transport,
            minter,
            rules,
            sink,
            config,
            locks,
        }
    }

    /// Resolves one listing URL to its outcome. Never fails: every problem
    /// along the way becomes a failure outcome.
    pub async fn resolve(&self, url: &str) -> OutcomeRecord {
        let Some(request) = ListingRequest::parse(url) else {
            tracing::info!(url, "url matches no supported site");
            return OutcomeRecord::Failure {
                kind: ErrorKind::UrlNotRecognized,
                site: None,
                url: url.to_owned(),
            };
        };

        let site = request.site();
        tracing::info!(url = request.url(), %site, "resolving listing");

        let ctx = RunContext::new(request);
        let (ctx, terminal) = match site {
            SiteKind::Copart => self.run_copart(ctx).await,
            SiteKind::Iaai => self.run_iaai(ctx).await,
        };
        self.finish(ctx, terminal)
    }

    fn finish(&self, ctx: RunContext, terminal: Terminal) -> OutcomeRecord {
        let site = ctx.request.site();
        let url = ctx.request.url().to_owned();
        let outcome = match terminal.result {
            Ok(record) => OutcomeRecord::Success { record, url },
            Err(kind) => OutcomeRecord::Failure {
                kind,
                site: Some(site),
                url,
            },
        };

        let response = (!ctx.trace.is_empty()).then_some(ctx.latest);
        self.sink.record(&TerminalRecord {
            sink: terminal.sink,
            outcome: outcome.clone(),
            trace: ctx.trace,
            response,
        });
        outcome
    }

    /// Sends `request` while holding the site's jar lock. A transport
    /// failure comes back as an empty body, which reads as blocked.
    async fn dispatch(&self, site: SiteKind, request: DispatchRequest) -> RawResponse {
        let url = request.url.clone();
        let _guard = self.locks.acquire(site).await;
        match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(%url, %site, error = %e, "request failed; treating as empty response");
                RawResponse::empty()
            }
        }
    }

    /// Filtered jar contents for `site`, serialized.
    async fn jar_snapshot(&self, site: SiteKind) -> String {
        let _guard = self.locks.acquire(site).await;
        cookies::load(&self.config.jar_path(site)).serialize()
    }

    async fn delete_jar(&self, site: SiteKind) {
        let _guard = self.locks.acquire(site).await;
        cookies::delete(&self.config.jar_path(site));
    }

    fn extract(
        &self,
        ctx: RunContext,
        good: &'static str,
        bad: &'static str,
    ) -> (RunContext, Terminal) {
        let terminal = match self.rules.extract(ctx.request.site(), &ctx.latest.body) {
            Some(record) => Terminal::success(good, record),
            None => Terminal::failure(bad, ErrorKind::AllExtractionAttemptsFailed),
        };
        (ctx, terminal)
    }
}

fn minter_error_kind(err: &MinterError) -> ErrorKind {
    match err {
        MinterError::Failed { .. } => ErrorKind::ExternalMinterFailed,
        MinterError::InvalidOutput { .. } => ErrorKind::ExternalMinterInvalidOutput,
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
