use regex::Regex;
use std::sync::LazyLock;

static ENGAGE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"secure\.vormats\.com/engage/[a-zA-Z0-9_\-]+").expect("static regex compile")
});

static STORY_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .expect("static regex compile")
});

/// First Vormats engage link in `text`, without scheme.
#[must_use]
pub fn find_engage_url(text: &str) -> Option<&str> {
    ENGAGE_URL_RE.find(text).map(|m| m.as_str())
}

/// Story UUID embedded in an engage link.
#[must_use]
pub fn story_id_from_url(url: &str) -> Option<&str> {
    STORY_ID_RE.find(url).map(|m| m.as_str())
}

/// Story UUID of the first engage link in `text`.
#[must_use]
pub fn extract_story_id(text: &str) -> Option<&str> {
    find_engage_url(text).and_then(story_id_from_url)
}
