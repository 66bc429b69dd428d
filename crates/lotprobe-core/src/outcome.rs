use serde::{Deserialize, Serialize, Serializer};

use crate::site::SiteKind;

/// The five vehicle fields every successful lookup must produce.
///
/// Construct through [`VehicleRecord::from_parts`] so that blank values never
/// make it into a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRecord {
    pub year: String,
    pub location: String,
    pub branch_seller: String,
    pub engine: String,
    pub fuel: String,
}

impl VehicleRecord {
    /// Builds a record from optional field values, trimming each one.
    ///
    /// Returns `None` if any field is missing or blank after trimming.
    #[must_use]
    pub fn from_parts(
        year: Option<String>,
        location: Option<String>,
        branch_seller: Option<String>,
        engine: Option<String>,
        fuel: Option<String>,
    ) -> Option<Self> {
        fn required(value: Option<String>) -> Option<String> {
            let trimmed = value?.trim().to_owned();
            (!trimmed.is_empty()).then_some(trimmed)
        }

        Some(Self {
            year: required(year)?,
            location: required(location)?,
            branch_seller: required(branch_seller)?,
            engine: required(engine)?,
            fuel: required(fuel)?,
        })
    }
}

/// Why a lookup ended without a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    UrlNotRecognized,
    LotIdExtractionFailed,
    ExternalMinterFailed,
    ExternalMinterInvalidOutput,
    RedirectIndicatesMissingLot,
    AllExtractionAttemptsFailed,
}

impl ErrorKind {
    /// Short human-readable description surfaced as `error_desc`.
    #[must_use]
    pub fn description(self, site: Option<SiteKind>) -> &'static str {
        match (self, site) {
            (ErrorKind::UrlNotRecognized, _) => "Wrong URL",
            (ErrorKind::LotIdExtractionFailed, _) => "Could not extract lot ID",
            (ErrorKind::ExternalMinterFailed, Some(SiteKind::Iaai)) => {
                "Failed to obtain cookies from Node.js for IAAI."
            }
            (ErrorKind::ExternalMinterFailed, _) => {
                "Failed to obtain necessary cookies from Node.js (potential ban)."
            }
            (ErrorKind::ExternalMinterInvalidOutput, _) => {
                "Cookie minter returned unreadable output."
            }
            (ErrorKind::RedirectIndicatesMissingLot, _) => "Lot does not exist",
            (ErrorKind::AllExtractionAttemptsFailed, Some(SiteKind::Iaai)) => {
                "Could not extract all data from IAAI HTML"
            }
            (ErrorKind::AllExtractionAttemptsFailed, _) => {
                "Failed to retrieve data from Copart (empty or unparsable response)."
            }
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::UrlNotRecognized => "url_not_recognized",
            ErrorKind::LotIdExtractionFailed => "lot_id_extraction_failed",
            ErrorKind::ExternalMinterFailed => "external_minter_failed",
            ErrorKind::ExternalMinterInvalidOutput => "external_minter_invalid_output",
            ErrorKind::RedirectIndicatesMissingLot => "redirect_indicates_missing_lot",
            ErrorKind::AllExtractionAttemptsFailed => "all_extraction_attempts_failed",
        };
        f.write_str(name)
    }
}

/// Final result of one listing lookup. Serializes to the public JSON shape:
///
/// - success: `{"year", "location", "branchSeller", "engine", "fuel", "error": 0, "url"}`
/// - failure: `{"error": 1, "error_desc", "url"}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeRecord {
    Success {
        record: VehicleRecord,
        url: String,
    },
    Failure {
        kind: ErrorKind,
        site: Option<SiteKind>,
        url: String,
    },
}

impl OutcomeRecord {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, OutcomeRecord::Success { .. })
    }

    #[must_use]
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            OutcomeRecord::Success { .. } => None,
            OutcomeRecord::Failure { kind, .. } => Some(*kind),
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            OutcomeRecord::Success { url, .. } | OutcomeRecord::Failure { url, .. } => url,
        }
    }
}

#[derive(Serialize)]
struct SuccessWire<'a> {
    #[serde(flatten)]
    record: &'a VehicleRecord,
    error: u8,
    url: &'a str,
}

#[derive(Serialize)]
struct FailureWire<'a> {
    error: u8,
    error_desc: &'a str,
    url: &'a str,
}

impl Serialize for OutcomeRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OutcomeRecord::Success { record, url } => SuccessWire {
                record,
                error: 0,
                url,
            }
            .serialize(serializer),
            OutcomeRecord::Failure { kind, site, url } => FailureWire {
                error: 1,
                error_desc: kind.description(*site),
                url,
            }
            .serialize(serializer),
        }
    }
}

#[cfg(test)]
#[path = "outcome_test.rs"]
mod tests;
