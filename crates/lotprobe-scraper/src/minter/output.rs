//! Decoding of the cookie minter's final stdout line.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::cookies::Cookie;
use crate::error::MinterError;

// Greedy and single-line: everything from the first `>{` to the last `}<`.
static DATA_FRAGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">\{(.*)\}<").expect("valid regex"));

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DecodedOutput {
    pub cookies: Vec<Cookie>,
    /// Raw `data` string, before fragment unwrapping.
    pub data: Option<String>,
}

/// Returns the last line of `stdout` that is not blank.
pub(crate) fn last_non_empty_line(stdout: &str) -> Option<&str> {
    stdout.lines().map(str::trim).rfind(|line| !line.is_empty())
}

/// Decodes one output line.
///
/// Accepts `{"cookies": [...], "data": "..."}` or a bare `[...]` cookie
/// array. Cookie entries without string `name` and `value` are skipped.
pub(crate) fn decode_line(line: &str) -> Result<DecodedOutput, MinterError> {
    let value: Value = serde_json::from_str(line).map_err(|e| MinterError::InvalidOutput {
        reason: format!("last line is not JSON: {e}"),
    })?;

    match value {
        Value::Array(items) => Ok(DecodedOutput {
            cookies: cookies_from(&items),
            data: None,
        }),
        Value::Object(map) => {
            let cookies = match map.get("cookies") {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(items)) => cookies_from(items),
                Some(other) => {
                    return Err(MinterError::InvalidOutput {
                        reason: format!("\"cookies\" is not an array: {other}"),
                    })
                }
            };
            let data = map.get("data").and_then(Value::as_str).map(str::to_owned);
            Ok(DecodedOutput { cookies, data })
        }
        other => Err(MinterError::InvalidOutput {
            reason: format!("expected an object or array, got {other}"),
        }),
    }
}

fn cookies_from(items: &[Value]) -> Vec<Cookie> {
    items
        .iter()
        .filter_map(|item| {
            let name = item.get("name")?.as_str()?;
            let value = item.get("value")?.as_str()?;
            (!name.is_empty()).then(|| Cookie::new(name, value))
        })
        .collect()
}

/// Pulls the JSON fragment out of markup-wrapped minter data.
///
/// The minter may hand back a rendered page such as
/// `<pre>{"data":{...}}</pre>`; the text between `>{` and `}<` is re-wrapped
/// in braces. Without that delimiter pair the result is `{}`. Nested markup
/// inside the fragment is not handled.
pub(crate) fn unwrap_data_fragment(raw: &str) -> String {
    let inner = DATA_FRAGMENT_RE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str());
    format!("{{{inner}}}")
}
