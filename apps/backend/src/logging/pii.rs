//! Redaction of personal data and credentials before they reach the logs.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b([A-Za-z0-9._%+-])[A-Za-z0-9._%+-]*(@[A-Za-z0-9.-]+\.[A-Za-z]+)\b").ok());

// header.payload.signature, each segment base64url
static JWT: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"\beyJ[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]*").ok()
});

// PHC strings as produced by argon2
static PHC_HASH: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\$argon2(?:id|i|d)\$[^\s]+").ok());

/// Masks emails (first character of the local part survives), bearer tokens
/// and password hashes.
pub fn redact(input: &str) -> String {
    let mut out = input.to_string();
    if let Some(re) = EMAIL.as_ref() {
        out = re.replace_all(&out, "$1***$2").into_owned();
    }
    if let Some(re) = JWT.as_ref() {
        out = re.replace_all(&out, "[REDACTED_JWT]").into_owned();
    }
    if let Some(re) = PHC_HASH.as_ref() {
        out = re.replace_all(&out, "[REDACTED_HASH]").into_owned();
    }
    out
}

/// Display wrapper that redacts on format.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
