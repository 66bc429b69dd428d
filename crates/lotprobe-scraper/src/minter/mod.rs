//! Cookie minting through an external headless-browser script.
//!
//! The script is opaque: it gets positional arguments, drives a real browser,
//! and prints a JSON payload on its last stdout line. Only that contract is
//! relied on here.

mod output;
pub mod runner;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use lotprobe_core::AppConfig;

use crate::cookies::{serialize_cookies, Cookie};
use crate::error::MinterError;

pub use runner::{ProcessInvocation, ProcessOutput, ProcessRunner, TokioProcessRunner};

/// Where and how the minter scripts run.
#[derive(Debug, Clone)]
pub struct MinterConfig {
    /// Interpreter, e.g. `node`.
    pub interpreter: PathBuf,
    /// Directory containing the scripts; also the working directory.
    pub script_dir: PathBuf,
    pub iaai_script: String,
    pub copart_script: String,
    pub timeout: Duration,
}

impl MinterConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            interpreter: config.node_path.clone(),
            script_dir: config.minter_dir.clone(),
            iaai_script: config.iaai_minter_script.clone(),
            copart_script: config.copart_minter_script.clone(),
            timeout: Duration::from_secs(config.minter_timeout_secs),
        }
    }
}

/// What one minter run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MintResult {
    pub cookies: Vec<Cookie>,
    /// Copart only: the unwrapped data payload, `{}` when none was embedded.
    pub data: Option<String>,
}

impl MintResult {
    /// Minted cookies in `Cookie` header form.
    #[must_use]
    pub fn cookie_header(&self) -> String {
        serialize_cookies(&self.cookies)
    }
}

pub struct ExternalCookieMinter {
    runner: Arc<dyn ProcessRunner>,
    config: MinterConfig,
}

impl ExternalCookieMinter {
    pub fn new(runner: Arc<dyn ProcessRunner>, config: MinterConfig) -> Self {
        Self { runner, config }
    }

    /// Mints IAAI cookies for `listing_url`. Never carries data.
    ///
    /// # Errors
    ///
    /// - [`MinterError::Failed`] on spawn failure, timeout, non-zero exit, or
    ///   empty output.
    /// - [`MinterError::InvalidOutput`] if the last output line does not decode.
    pub async fn mint_iaai(&self, listing_url: &str) -> Result<MintResult, MinterError> {
        let line = self
            .invoke(&self.config.iaai_script, vec![listing_url.to_owned()])
            .await?;
        let decoded = output::decode_line(&line)?;
        Ok(MintResult {
            cookies: decoded.cookies,
            data: None,
        })
    }

    /// Mints Copart cookies (and possibly lot data) for `lot_id`, seeding the
    /// browser with the `current_cookies` header string.
    ///
    /// # Errors
    ///
    /// Same as [`ExternalCookieMinter::mint_iaai`].
    pub async fn mint_copart(
        &self,
        lot_id: &str,
        current_cookies: &str,
    ) -> Result<MintResult, MinterError> {
        let line = self
            .invoke(
                &self.config.copart_script,
                vec![lot_id.to_owned(), current_cookies.to_owned()],
            )
            .await?;
        let decoded = output::decode_line(&line)?;
        let data = output::unwrap_data_fragment(decoded.data.as_deref().unwrap_or_default());
        Ok(MintResult {
            cookies: decoded.cookies,
            data: Some(data),
        })
    }

    /// Runs `script` with positional `args` and returns its last non-empty
    /// stdout line.
    async fn invoke(&self, script: &str, args: Vec<String>) -> Result<String, MinterError> {
        let script_path = self.config.script_dir.join(script);
        let mut full_args = Vec::with_capacity(args.len() + 1);
        full_args.push(script_path.display().to_string());
        full_args.extend(args);

        let invocation = ProcessInvocation {
            program: self.config.interpreter.clone(),
            args: full_args,
            cwd: self.config.script_dir.clone(),
            timeout: self.config.timeout,
        };

        tracing::debug!(
            program = %invocation.program.display(),
            script,
            timeout_secs = invocation.timeout.as_secs(),
            "invoking cookie minter"
        );

        let output = self.runner.run(&invocation).await?;

        tracing::debug!(
            script,
            exit_code = ?output.exit_code,
            stdout_len = output.stdout.len(),
            stderr = %output.stderr.trim(),
            "cookie minter finished"
        );

        if !output.success {
            return Err(MinterError::Failed {
                reason: format!(
                    "{script} exited with {}",
                    output
                        .exit_code
                        .map_or_else(|| "a signal".to_owned(), |c| format!("status {c}"))
                ),
            });
        }

        output::last_non_empty_line(&output.stdout)
            .map(str::to_owned)
            .ok_or_else(|| MinterError::Failed {
                reason: format!("{script} produced no output"),
            })
    }
}

#[cfg(test)]
#[path = "minter_test.rs"]
mod tests;
