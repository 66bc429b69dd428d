//! Anti-bot block page detection.

/// Substrings that only appear on challenge or rejection pages.
const BLOCK_MARKERS: [&str; 3] = [
    "_Incapsula_Resource",
    "Request unsuccessful",
    "Hacking attempt",
];

/// Bodies shorter than this cannot hold a real payload and count as blocked.
const MIN_BODY_LENGTH: usize = 20;

/// Returns `true` if `body` is a block page or too short to be real data.
///
/// A truncated or empty body is treated the same as an explicit challenge
/// page: both mean the request has to be escalated.
#[must_use]
pub fn is_blocked(body: &str) -> bool {
    body.trim().is_empty()
        || body.len() < MIN_BODY_LENGTH
        || BLOCK_MARKERS.iter().any(|marker| body.contains(marker))
}
