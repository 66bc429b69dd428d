pub mod block;
pub mod cookies;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod listing;
pub mod minter;
pub mod orchestrator;

#[cfg(test)]
pub(crate) mod test_support;

pub use cookies::{Cookie, CookieJar, JarLocks};
pub use dispatch::{DispatchRequest, HttpDispatcher, RawResponse, Transport};
pub use error::{DispatchError, MinterError, RunnerError};
pub use extract::{ExtractionRule, RuleSet};
pub use listing::ListingRequest;
pub use minter::{ExternalCookieMinter, MintResult, MinterConfig, ProcessRunner, TokioProcessRunner};
pub use orchestrator::{
    AttemptTrace, ListingOrchestrator, OrchestratorConfig, OutcomeSink, TerminalRecord,
    TracingSink,
};
