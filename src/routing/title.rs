//! Page title validation
//!
//! A `Title` can only be built from a string that matches the canonical
//! pattern `^[a-zA-Z0-9 ]+$`, so every title reaching the store is safe to
//! use as a file name.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Canonical title grammar: ASCII letters, digits and spaces, anchored
pub const TITLE_PATTERN: &str = r"^[a-zA-Z0-9 ]+$";

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TITLE_PATTERN).expect("title pattern is a valid regex"));

/// Rejected title
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid page title: {0:?}")]
pub struct TitleError(pub String);

/// Validated page title, also the storage key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Title(String);

impl Title {
    /// Validate `raw` against the canonical pattern
    pub fn parse(raw: &str) -> Result<Self, TitleError> {
        if TITLE_RE.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(TitleError(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Title as it appears inside a URL path segment
    pub fn url_encoded(&self) -> String {
        urlencoding::encode(&self.0).into_owned()
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
