use lotprobe_core::{SiteKind, VehicleRecord};
use serde_json::Value;

use super::ExtractionRule;

/// Reads `data.lotDetails` from Copart's lot-details JSON.
///
/// | field | key |
/// |---|---|
/// | year | `lcy` |
/// | location | `yn` |
/// | branch seller | `scn` |
/// | engine | `egn` |
/// | fuel | `ft` |
#[derive(Debug, Clone, Copy, Default)]
pub struct CopartLotDetailsRule;

impl ExtractionRule for CopartLotDetailsRule {
    fn site(&self) -> SiteKind {
        SiteKind::Copart
    }

    fn version(&self) -> &'static str {
        "copart-lotdetails-v1"
    }

    fn extract(&self, payload: &str) -> Option<VehicleRecord> {
        let json: Value = serde_json::from_str(payload).ok()?;
        let details = json.get("data")?.get("lotDetails")?;

        VehicleRecord::from_parts(
            field_text(details, "lcy"),
            field_text(details, "yn"),
            field_text(details, "scn"),
            field_text(details, "egn"),
            field_text(details, "ft"),
        )
    }
}

/// Strings pass through; numbers and booleans are rendered as text.
fn field_text(details: &Value, key: &str) -> Option<String> {
    match details.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn payload(details: &Value) -> String {
        json!({ "returnCode": 1, "data": { "lotDetails": details } }).to_string()
    }

    fn full_details() -> Value {
        json!({
            "lcy": 2018,
            "yn": "CA - SACRAMENTO",
            "scn": "Sacramento",
            "egn": "2.5L  4",
            "ft": "GAS",
            "mkn": "TOYOTA"
        })
    }

    #[test]
    fn maps_all_five_fields() {
        let record = CopartLotDetailsRule
            .extract(&payload(&full_details()))
            .expect("complete lot details");
        assert_eq!(record.year, "2018");
        assert_eq!(record.location, "CA - SACRAMENTO");
        assert_eq!(record.branch_seller, "Sacramento");
        assert_eq!(record.engine, "2.5L  4");
        assert_eq!(record.fuel, "GAS");
    }

    #[test]
    fn missing_lot_details_is_none() {
        let body = json!({ "returnCode": 1, "data": { "imagesList": [] } }).to_string();
        assert!(CopartLotDetailsRule.extract(&body).is_none());
    }

    #[test]
    fn each_missing_key_is_none() {
        for key in ["lcy", "yn", "scn", "egn", "ft"] {
            let mut details = full_details();
            details.as_object_mut().unwrap().remove(key);
            assert!(
                CopartLotDetailsRule.extract(&payload(&details)).is_none(),
                "missing {key} should fail extraction"
            );
        }
    }

    #[test]
    fn null_value_is_none() {
        let mut details = full_details();
        details["ft"] = Value::Null;
        assert!(CopartLotDetailsRule.extract(&payload(&details)).is_none());
    }

    #[test]
    fn blank_value_is_none() {
        let mut details = full_details();
        details["scn"] = json!("   ");
        assert!(CopartLotDetailsRule.extract(&payload(&details)).is_none());
    }

    #[test]
    fn non_json_is_none() {
        assert!(CopartLotDetailsRule
            .extract("<html><body>Request unsuccessful</body></html>")
            .is_none());
    }

    #[test]
    fn empty_object_is_none() {
        assert!(CopartLotDetailsRule.extract("{}").is_none());
    }
}
