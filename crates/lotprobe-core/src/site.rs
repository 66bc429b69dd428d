use serde::{Deserialize, Serialize};

/// Auction site a listing URL belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteKind {
    Copart,
    Iaai,
}

impl SiteKind {
    pub const ALL: [SiteKind; 2] = [SiteKind::Copart, SiteKind::Iaai];

    /// Resolves the site from a URL host by substring match.
    ///
    /// `"www.copart.com"` and `"copart.com"` both resolve to `Copart`.
    #[must_use]
    pub fn from_host(host: &str) -> Option<Self> {
        let host = host.to_ascii_lowercase();
        if host.contains("copart.com") {
            Some(SiteKind::Copart)
        } else if host.contains("iaai.com") {
            Some(SiteKind::Iaai)
        } else {
            None
        }
    }

    /// Lowercase short name, used for jar file suffixes and log sink names.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SiteKind::Copart => "copart",
            SiteKind::Iaai => "iaai",
        }
    }
}

impl std::fmt::Display for SiteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SiteKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "copart" => Ok(SiteKind::Copart),
            "iaai" => Ok(SiteKind::Iaai),
            other => Err(format!("unknown site \"{other}\" (expected copart or iaai)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_host_matches_copart() {
        assert_eq!(SiteKind::from_host("www.copart.com"), Some(SiteKind::Copart));
    }

    #[test]
    fn from_host_matches_iaai_case_insensitively() {
        assert_eq!(SiteKind::from_host("WWW.IAAI.COM"), Some(SiteKind::Iaai));
    }

    #[test]
    fn from_host_rejects_other_hosts() {
        assert_eq!(SiteKind::from_host("www.manheim.com"), None);
    }

    #[test]
    fn parses_from_str() {
        assert_eq!("Copart".parse::<SiteKind>(), Ok(SiteKind::Copart));
        assert!("ebay".parse::<SiteKind>().is_err());
    }
}
