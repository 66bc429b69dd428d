//! `fetch` command: wires the production collaborators together and resolves
//! one listing.

use std::sync::Arc;

use lotprobe_core::{AppConfig, OutcomeRecord};
use lotprobe_scraper::{
    ExternalCookieMinter, HttpDispatcher, JarLocks, ListingOrchestrator, MinterConfig,
    OrchestratorConfig, RuleSet, TokioProcessRunner, TracingSink,
};

/// Builds the orchestrator from configuration.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built (for example a
/// malformed proxy URL).
pub(crate) fn build_orchestrator(config: &AppConfig) -> anyhow::Result<ListingOrchestrator> {
    let dispatcher = HttpDispatcher::new(
        config.request_timeout_secs,
        config.connect_timeout_secs,
        config.proxy_url.as_deref(),
    )?;
    let minter = ExternalCookieMinter::new(
        Arc::new(TokioProcessRunner),
        MinterConfig::from_app_config(config),
    );

    Ok(ListingOrchestrator::new(
        Arc::new(dispatcher),
        minter,
        RuleSet::default(),
        Arc::new(TracingSink),
        OrchestratorConfig::from_app_config(config),
        Arc::new(JarLocks::default()),
    ))
}

/// Renders the outcome the way it is printed on stdout.
pub(crate) fn render(outcome: &OutcomeRecord, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(outcome)
    } else {
        serde_json::to_string(outcome)
    }
}

/// Resolves `url` and prints the outcome. Pipeline failures are part of the
/// printed JSON, not errors.
///
/// # Errors
///
/// Returns an error only if the orchestrator cannot be built or the outcome
/// cannot be serialized.
pub(crate) async fn run(config: &AppConfig, url: &str, pretty: bool) -> anyhow::Result<()> {
    let orchestrator = build_orchestrator(config)?;
    let outcome = orchestrator.resolve(url).await;

    if let Some(kind) = outcome.error_kind() {
        tracing::info!(url, error = %kind, "listing not resolved");
    }

    println!("{}", render(&outcome, pretty)?);
    Ok(())
}
