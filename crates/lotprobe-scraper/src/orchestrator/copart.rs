use lotprobe_core::{ErrorKind, SiteKind};

use super::context::RunContext;
use super::{minter_error_kind, ListingOrchestrator, Terminal};
use crate::block;
use crate::dispatch::{headers, DispatchRequest, RawResponse};

const GOOD: &str = "copart_good";
const BAD: &str = "copart_bad";

const SITE: SiteKind = SiteKind::Copart;

impl ListingOrchestrator {
    /// Initial fetch with the stored jar; on a block, mint cookies (and
    /// possibly the payload itself) and retry once.
    pub(super) async fn run_copart(&self, ctx: RunContext) -> (RunContext, Terminal) {
        let Some(lot_id) = ctx.request.lot_id().map(str::to_owned) else {
            tracing::warn!(url = ctx.request.url(), "no lot id in copart url");
            return (ctx, Terminal::failure(BAD, ErrorKind::LotIdExtractionFailed));
        };

        let endpoint = lot_details_url(&self.config.copart_lot_details_url, &lot_id);
        let jar_path = self.config.jar_path(SITE);

        let response = self
            .dispatch(
                SITE,
                DispatchRequest::get(&endpoint, headers::for_site(SITE), jar_path.clone()),
            )
            .await;
        let ctx = ctx.record("initial_fetch", self.jar_snapshot(SITE).await, response);

        if !block::is_blocked(&ctx.latest.body) {
            return self.extract(ctx, GOOD, BAD);
        }

        tracing::info!(%lot_id, stage = "mint", status = ?ctx.latest.status, "copart response blocked");
        let current_cookies = self.jar_snapshot(SITE).await;

        let minted = match self.minter.mint_copart(&lot_id, &current_cookies).await {
            Ok(minted) => minted,
            Err(e) => {
                tracing::warn!(%lot_id, stage = "mint", error = %e, "copart cookie minter failed");
                let ctx = ctx.record("mint", current_cookies, RawResponse::empty());
                self.delete_jar(SITE).await;
                return (ctx, Terminal::failure(BAD, minter_error_kind(&e)));
            }
        };

        let ctx = ctx.with_minted_cookies(minted.cookie_header()).record(
            "mint",
            self.jar_snapshot(SITE).await,
            RawResponse::new(minted.data.unwrap_or_default(), None),
        );

        if let Some(record) = self.rules.extract(SITE, &ctx.latest.body) {
            tracing::info!(%lot_id, stage = "mint", "minter returned usable lot data");
            return (ctx, Terminal::success(GOOD, record));
        }

        if minted.cookies.is_empty() {
            tracing::warn!(%lot_id, stage = "mint", "minter returned neither data nor cookies; dropping jar");
            self.delete_jar(SITE).await;
            return (ctx, Terminal::failure(BAD, ErrorKind::ExternalMinterFailed));
        }

        let retry = DispatchRequest::get(endpoint, headers::for_site(SITE), jar_path)
            .with_extra_cookies(minted.cookies);
        let response = self.dispatch(SITE, retry).await;
        let ctx = ctx.record("retry_fetch", self.jar_snapshot(SITE).await, response);

        self.extract(ctx, GOOD, BAD)
    }
}

fn lot_details_url(base: &str, lot_id: &str) -> String {
    format!("{}/{lot_id}", base.trim_end_matches('/'))
}
