//! Mention extraction from post text
//!
//! A mention is an `@handle` token inside a post referencing another user.
//! Handle syntax: 3 to 24 characters from letters, digits, dot and
//! underscore, with at most one dot and at most one underscore. The `@` must
//! not be glued to a preceding word character, so email-like tokens are not
//! mentions, and trailing dots read as sentence punctuation rather than part
//! of the handle.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Minimum handle length (in characters)
pub const MIN_HANDLE_LENGTH: usize = 3;

/// Maximum handle length (in characters)
pub const MAX_HANDLE_LENGTH: usize = 24;

/// A mention of a user, tagged with the author of the post containing it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mention {
    /// The mentioned handle, without the `@` prefix
    pub handle: String,
    /// Author of the post the mention appeared in
    pub author: String,
}

impl Mention {
    /// Create a new mention
    pub fn new(handle: impl Into<String>, author: impl Into<String>) -> Self {
        Self { handle: handle.into(), author: author.into() }
    }
}

impl fmt::Display for Mention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [in post by {}]", self.handle, self.author)
    }
}

/// Scan `text` for mention tokens, tagging each with `author`
pub fn scan(text: &str, author: &str) -> Vec<Mention> {
    static MENTION_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = MENTION_REGEX
        .get_or_init(|| Regex::new(r"@[A-Za-z0-9._]+").unwrap());

    let mut mentions = Vec::new();

    for m in re.find_iter(text) {
        // `@` glued to a preceding word character is an email-like token
        if let Some(prev) = text[..m.start()].chars().next_back() {
            if prev.is_ascii_alphanumeric() || prev == '_' {
                continue;
            }
        }

        let handle = m.as_str()[1..].trim_end_matches('.');
        if is_valid_handle(handle) {
            mentions.push(Mention::new(handle, author));
        }
    }

    mentions
}

/// Check a candidate handle against the mention syntax rules
fn is_valid_handle(handle: &str) -> bool {
    let length = handle.chars().count();
    if !(MIN_HANDLE_LENGTH..=MAX_HANDLE_LENGTH).contains(&length) {
        return false;
    }

    handle.chars().filter(|c| *c == '_').count() <= 1
        && handle.chars().filter(|c| *c == '.').count() <= 1
}
