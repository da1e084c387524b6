use regex::Regex;
use std::sync::LazyLock;

use crate::domain::models::base_name;

// Rip source, audio codec, source, video codec with group suffix,
// resolution, container and season/episode markers.
static RELEASE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:(?:BD|DVD)Rip|(?:AAC|FLAC)[0-9]?|BluRay|HDTV|x?264-.+|[0-9]{3,4}p?|mkv|WEB|S[0-9]{2}(?:E[0-9]{2})?)$",
    )
    .expect("release tag pattern is valid")
});

static RELEASE_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:19|20)[0-9]{2}$").expect("year pattern is valid"));

/// Whether a dot separated filename token is release noise rather than part
/// of the title. Four digit years (1900-2099) count as title words.
pub fn is_release_tag(token: &str) -> bool {
    RELEASE_TAG.is_match(token) && !RELEASE_YEAR.is_match(token)
}

/// Turns a release-style filename or path into a display title.
///
/// Tag tokens are blanked rather than removed, so a stripped token in the
/// middle of a name leaves a double space behind. Only the ends are trimmed.
pub fn normalize(raw_name: &str) -> String {
    let parts: Vec<&str> = base_name(raw_name)
        .split('.')
        .map(|part| if is_release_tag(part) { "" } else { part })
        .collect();
    parts.join(" ").trim().to_string()
}
