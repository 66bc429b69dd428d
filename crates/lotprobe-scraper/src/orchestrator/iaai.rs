use lotprobe_core::{ErrorKind, SiteKind};

use super::context::RunContext;
use super::{minter_error_kind, ListingOrchestrator, Terminal};
use crate::dispatch::{headers, DispatchRequest, RawResponse};

const GOOD: &str = "iaai_good";
const BAD: &str = "iaai_bad";
const UNREADABLE: &str = "iaai_dont_see";

const SITE: SiteKind = SiteKind::Iaai;

/// IAAI answers a request for a lot that no longer exists with a redirect page.
const REDIRECT_MARKER: &str = "Object moved to";

impl ListingOrchestrator {
    /// Always mints first; the detail page is never requested without fresh
    /// cookies.
    pub(super) async fn run_iaai(&self, ctx: RunContext) -> (RunContext, Terminal) {
        let url = ctx.request.url().to_owned();

        let minted = match self.minter.mint_iaai(&url).await {
            Ok(minted) if !minted.cookies.is_empty() => minted,
            Ok(_) => {
                tracing::warn!(%url, stage = "mint", "iaai cookie minter returned no cookies");
                let ctx = ctx.record("mint", self.jar_snapshot(SITE).await, RawResponse::empty());
                return (ctx, Terminal::failure(BAD, ErrorKind::ExternalMinterFailed));
            }
            Err(e) => {
                tracing::warn!(%url, stage = "mint", error = %e, "iaai cookie minter failed");
                let ctx = ctx.record("mint", self.jar_snapshot(SITE).await, RawResponse::empty());
                return (ctx, Terminal::failure(BAD, minter_error_kind(&e)));
            }
        };

        let ctx = ctx.with_minted_cookies(minted.cookie_header()).record(
            "mint",
            self.jar_snapshot(SITE).await,
            RawResponse::empty(),
        );

        let request = DispatchRequest::get(&url, headers::for_site(SITE), self.config.jar_path(SITE))
            .with_extra_cookies(minted.cookies);
        let response = self.dispatch(SITE, request).await;
        let ctx = ctx.record("fetch", self.jar_snapshot(SITE).await, response);

        if ctx.latest.body.contains(REDIRECT_MARKER) {
            tracing::info!(%url, stage = "fetch", "iaai redirected; lot is gone");
            return (ctx, Terminal::failure(BAD, ErrorKind::RedirectIndicatesMissingLot));
        }

        self.extract(ctx, GOOD, UNREADABLE)
    }
}
