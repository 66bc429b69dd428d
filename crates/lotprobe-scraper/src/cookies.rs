//! Per-site cookie jar files.
//!
//! A jar file holds one cookie per line. The last two whitespace-separated
//! tokens of a line are the cookie name and value, so plain `name value`
//! lines and Netscape-style tab-separated lines both parse. Lines starting
//! with `"# "` are comments.
//!
//! Stored values are kept verbatim, including percent-encoded ones. Only
//! [`load`], which feeds the minter, narrows the jar to token-charset cookies.
//!
//! Reads never fail: a missing or unreadable file is an empty jar. Writes are
//! best-effort and only logged on failure.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use lotprobe_core::SiteKind;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, MutexGuard};

/// Minimum value length for a cookie to count as an auth token.
const MIN_COOKIE_VALUE_LENGTH: usize = 20;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z._-]+$").expect("valid regex"));
static VALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z=/\-_+.:,]+$").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Whether the cookie looks like an auth/session token worth replaying.
    fn is_relevant(&self) -> bool {
        self.value.len() >= MIN_COOKIE_VALUE_LENGTH
            || self.name.to_ascii_lowercase().contains("session")
    }

    fn has_token_charset(&self) -> bool {
        NAME_RE.is_match(&self.name) && VALUE_RE.is_match(&self.value)
    }
}

/// Ordered cookie set bound to one jar file. Names are unique; inserting an
/// existing name replaces its value in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieJar {
    path: PathBuf,
    cookies: Vec<Cookie>,
}

impl CookieJar {
    #[must_use]
    pub fn empty(path: &Path) -> Self {
        Self {
            path: path.to_owned(),
            cookies: Vec::new(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value.as_str())
    }

    pub fn insert(&mut self, cookie: Cookie) {
        match self.cookies.iter_mut().find(|c| c.name == cookie.name) {
            Some(existing) => existing.value = cookie.value,
            None => self.cookies.push(cookie),
        }
    }

    pub fn remove(&mut self, name: &str) {
        self.cookies.retain(|c| c.name != name);
    }

    /// Header value form: `name=value; name2=value2`.
    #[must_use]
    pub fn serialize(&self) -> String {
        serialize_cookies(&self.cookies)
    }

    /// Jar contents with `extra` cookies layered on top. Same-named extra
    /// cookies override the stored value.
    #[must_use]
    pub fn with_overrides(&self, extra: &[Cookie]) -> Self {
        let mut merged = self.clone();
        for cookie in extra {
            merged.insert(cookie.clone());
        }
        merged
    }

    fn to_file_contents(&self) -> String {
        self.cookies
            .iter()
            .map(|c| format!("{} {}\n", c.name, c.value))
            .collect()
    }
}

/// Joins cookies as `name=value; ` and trims the trailing separator.
#[must_use]
pub fn serialize_cookies(cookies: &[Cookie]) -> String {
    cookies
        .iter()
        .map(|c| format!("{}={}", c.name, c.value))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Parses a `Cookie` header value (`a=1; b=2`) back into cookies.
/// Segments without `=` or with an empty name are skipped.
#[must_use]
pub fn parse_cookie_header(header: &str) -> Vec<Cookie> {
    header
        .split(';')
        .filter_map(|segment| {
            let (name, value) = segment.split_once('=')?;
            let name = name.trim();
            (!name.is_empty()).then(|| Cookie::new(name, value.trim()))
        })
        .collect()
}

/// Reads the jar at `path`, keeping only cookies that look like auth tokens:
/// values of at least 20 characters, or names containing `"session"`, made
/// of plain token characters.
#[must_use]
pub fn load(path: &Path) -> CookieJar {
    let mut jar = load_all(path);
    jar.cookies
        .retain(|cookie| cookie.has_token_charset() && cookie.is_relevant());
    jar
}

/// Reads every cookie line at `path` without filtering. Values are taken
/// as stored, so cookies merged from `Set-Cookie` headers read back intact.
#[must_use]
pub fn load_all(path: &Path) -> CookieJar {
    let mut jar = CookieJar::empty(path);
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "cookie jar not readable; using empty jar");
            return jar;
        }
    };

    for line in contents.lines() {
        if let Some(cookie) = parse_jar_line(line) {
            jar.insert(cookie);
        }
    }
    jar
}

fn parse_jar_line(line: &str) -> Option<Cookie> {
    let line = line.trim();
    if line.is_empty() || line.starts_with("# ") {
        return None;
    }
    let mut tokens = line.split_whitespace().rev();
    let value = tokens.next()?;
    let name = tokens.next()?;
    Some(Cookie::new(name, value))
}

/// Removes the jar file. Failure (including a missing file) is ignored.
pub fn delete(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        tracing::debug!(path = %path.display(), error = %e, "cookie jar not removed");
    }
}

/// Merges raw `Set-Cookie` header values into the jar file at `path`.
///
/// A cookie with an empty value, a `Max-Age` of zero or less, or an
/// `Expires` date in the past is removed.
/// The file is only written when something changed.
pub fn merge_set_cookies<S: AsRef<str>>(path: &Path, set_cookies: &[S]) {
    if set_cookies.is_empty() {
        return;
    }

    let mut jar = load_all(path);
    let before = jar.clone();

    for raw in set_cookies {
        let Some(update) = parse_set_cookie(raw.as_ref()) else {
            continue;
        };
        match update {
            SetCookie::Store(cookie) => jar.insert(cookie),
            SetCookie::Expire(name) => jar.remove(&name),
        }
    }

    if jar == before {
        return;
    }
    if let Err(e) = std::fs::write(path, jar.to_file_contents()) {
        tracing::warn!(path = %path.display(), error = %e, "failed to write cookie jar");
    }
}

#[derive(Debug, PartialEq, Eq)]
enum SetCookie {
    Store(Cookie),
    Expire(String),
}

fn parse_set_cookie(raw: &str) -> Option<SetCookie> {
    let mut parts = raw.split(';');
    let (name, value) = parts.next()?.split_once('=')?;
    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }
    let value = value.trim().trim_matches('"');
    if value.contains(char::is_whitespace) {
        return None;
    }

    let mut max_age = None;
    let mut expires = None;
    for attr in parts {
        let Some((key, val)) = attr.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.eq_ignore_ascii_case("max-age") {
            max_age = val.trim().parse::<i64>().ok().or(max_age);
        } else if key.eq_ignore_ascii_case("expires") {
            expires = parse_cookie_date(val.trim()).or(expires);
        }
    }

    // Max-Age wins over Expires when both are present.
    let expired = match max_age {
        Some(secs) => secs <= 0,
        None => expires.is_some_and(|at| at <= Utc::now()),
    };

    if expired || value.is_empty() {
        Some(SetCookie::Expire(name.to_owned()))
    } else {
        Some(SetCookie::Store(Cookie::new(name, value)))
    }
}

/// Parses an `Expires` attribute: RFC 1123 dates, plus the dashed
/// `Thu, 01-Jan-1970 00:00:00 GMT` form some servers still send.
fn parse_cookie_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw)
        .map(|at| at.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%a, %d-%b-%Y %H:%M:%S GMT")
                .ok()
                .as_ref()
                .map(NaiveDateTime::and_utc)
        })
}

/// Jar file location for `site`: `<dir>/<base>.<site>.txt`.
#[must_use]
pub fn jar_path(dir: &Path, base: &str, site: SiteKind) -> PathBuf {
    dir.join(format!("{base}.{}.txt", site.as_str()))
}

/// One async lock per site. Every read-send-write round trip on a site's
/// jar, and every deletion of it, happens while holding that site's lock.
#[derive(Debug, Default)]
pub struct JarLocks {
    copart: Mutex<()>,
    iaai: Mutex<()>,
}

impl JarLocks {
    pub async fn acquire(&self, site: SiteKind) -> MutexGuard<'_, ()> {
        match site {
            SiteKind::Copart => self.copart.lock().await,
            SiteKind::Iaai => self.iaai.lock().await,
        }
    }
}

#[cfg(test)]
#[path = "cookies_test.rs"]
mod tests;
