use std::sync::LazyLock;

use lotprobe_core::{SiteKind, VehicleRecord};
use regex::Regex;

use super::ExtractionRule;

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""heading-2">(\d+)"#).expect("valid regex"));

static LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"Vehicle Location:</span>\s+<div\sclass="data-list__value">\s+<span>([^<]{5,45})<"#,
    )
    .expect("valid regex")
});

static BRANCH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"Selling Branch:</span>\s+<span class="data-list__value">([^<]{5,45})</span>"#)
        .expect("valid regex")
});

// The engine row has no label of its own on the detail page; it is the item
// rendered directly before the "Transmission" row.
static ENGINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#">([^<]+)</span>\s+</li>\s+<li class="data-list__item">\s+<span class="data-list__label">Transmission"#,
    )
    .expect("valid regex")
});

static FUEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"Fuel Type:</span>\s+<span class="data-list__value">\s+([^<]+)"#)
        .expect("valid regex")
});

/// Scrapes the IAAI vehicle detail page markup with five independent patterns.
#[derive(Debug, Clone, Copy, Default)]
pub struct IaaiMarkupRule;

impl ExtractionRule for IaaiMarkupRule {
    fn site(&self) -> SiteKind {
        SiteKind::Iaai
    }

    fn version(&self) -> &'static str {
        "iaai-markup-v1"
    }

    fn extract(&self, payload: &str) -> Option<VehicleRecord> {
        VehicleRecord::from_parts(
            capture(&YEAR_RE, payload),
            capture(&LOCATION_RE, payload),
            capture(&BRANCH_RE, payload),
            capture(&ENGINE_RE, payload),
            capture(&FUEL_RE, payload),
        )
    }
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_owned())
}

#[cfg(test)]
#[path = "iaai_test.rs"]
mod tests;
