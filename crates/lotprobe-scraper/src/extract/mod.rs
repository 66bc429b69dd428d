//! Site-specific field extraction rules.
//!
//! Each site's payload format is handled by one versioned [`ExtractionRule`].
//! When a site changes its markup or API shape, a new rule version replaces
//! the old one in the [`RuleSet`] without touching transport or orchestration.

mod copart;
mod iaai;

pub use copart::CopartLotDetailsRule;
pub use iaai::IaaiMarkupRule;

use lotprobe_core::{SiteKind, VehicleRecord};

/// Pulls the five required vehicle fields out of a raw payload.
pub trait ExtractionRule: Send + Sync {
    fn site(&self) -> SiteKind;

    /// Identifier recorded in logs, e.g. `"copart-lotdetails-v1"`.
    fn version(&self) -> &'static str;

    /// Returns `None` unless every field is present and non-empty.
    fn extract(&self, payload: &str) -> Option<VehicleRecord>;
}

/// One active rule per site. A rule can only occupy its own site's slot.
pub struct RuleSet {
    copart: Box<dyn ExtractionRule>,
    iaai: Box<dyn ExtractionRule>,
}

impl RuleSet {
    /// Installs `rule` in the slot for the site it declares, replacing the
    /// rule previously active for that site.
    #[must_use]
    pub fn with_rule(mut self, rule: Box<dyn ExtractionRule>) -> Self {
        match rule.site() {
            SiteKind::Copart => self.copart = rule,
            SiteKind::Iaai => self.iaai = rule,
        }
        self
    }

    #[must_use]
    pub fn rule(&self, site: SiteKind) -> &dyn ExtractionRule {
        match site {
            SiteKind::Copart => self.copart.as_ref(),
            SiteKind::Iaai => self.iaai.as_ref(),
        }
    }

    #[must_use]
    pub fn extract(&self, site: SiteKind, payload: &str) -> Option<VehicleRecord> {
        let rule = self.rule(site);
        let record = rule.extract(payload);
        if record.is_none() {
            tracing::debug!(%site, rule = rule.version(), payload_len = payload.len(), "extraction incomplete");
        }
        record
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            copart: Box::new(CopartLotDetailsRule),
            iaai: Box::new(IaaiMarkupRule::default()),
        }
    }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
