//! Listing URL classification.

use std::sync::LazyLock;

use lotprobe_core::SiteKind;
use regex::Regex;

static LOT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/lot/([0-9]+)").expect("valid regex"));

/// A listing URL with its resolved site. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    url: String,
    site: SiteKind,
}

impl ListingRequest {
    /// Resolves the site from the URL's host.
    ///
    /// Returns `None` for unparseable URLs, URLs without a host, and hosts
    /// belonging to neither supported site.
    #[must_use]
    pub fn parse(url: &str) -> Option<Self> {
        let parsed = reqwest::Url::parse(url.trim()).ok()?;
        let site = SiteKind::from_host(parsed.host_str()?)?;
        Some(Self {
            url: url.trim().to_owned(),
            site,
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn site(&self) -> SiteKind {
        self.site
    }

    /// Copart lot id: the digits following `/lot/` in the URL.
    #[must_use]
    pub fn lot_id(&self) -> Option<&str> {
        LOT_ID_RE
            .captures(&self.url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}
