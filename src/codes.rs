//! Error code convention - lexical checks for stable string codes.
//!
//! A code is the sole field used for programmatic branching, so its shape has
//! to survive grep, log pipelines, and delimiter-based tooling unmodified.
//! The recommended convention:
//!
//! - non-empty
//! - ASCII alphanumerics and hyphen (`-`) only
//! - hyphens separate "hunks"; no hunk is empty, so no leading hyphen, no
//!   trailing hyphen, no `--`
//!
//! Recommended (not enforced) hunk structure: first hunk names the producing
//! package or application, an optional second hunk is the literal `error`,
//! and the remaining hunks name the specific condition -
//! `cairn-error-decode`, `app-error-config-missing`.
//!
//! # Advisory Strength
//!
//! These checks are advisory, not serialization-blocking. The codec accepts
//! and emits any non-empty code so that foreign codes pass through systems
//! that did not mint them. Validation is an opt-in guard at construction
//! time ([`crate::Fault::conforming`]) so that programmatically generated
//! codes do not silently drift from the convention.
//!
//! # Example
//!
//! ```rust
//! use cairn_errors::codes::{validate_code, CodeFormatViolation};
//!
//! assert!(validate_code("cairn-error-decode").is_ok());
//! assert_eq!(validate_code(""), Err(CodeFormatViolation::Empty));
//! assert_eq!(validate_code("-oops"), Err(CodeFormatViolation::EdgeHyphen));
//! ```

use std::fmt;

/// A violation of the recommended code convention.
///
/// Advisory-only: a violating code still serializes and deserializes. The
/// variants carry enough position information for a lint message without
/// requiring the caller to re-scan the string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeFormatViolation {
    /// The code is the empty string.
    Empty,
    /// A character outside ASCII alphanumerics and `-`.
    DisallowedCharacter {
        /// The offending character.
        ch: char,
        /// Byte offset of the character within the code.
        at: usize,
    },
    /// The code starts or ends with a hyphen.
    EdgeHyphen,
    /// Two consecutive hyphens produce an empty hunk.
    EmptyHunk {
        /// Byte offset of the second hyphen.
        at: usize,
    },
}

impl fmt::Display for CodeFormatViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("code is empty"),
            Self::DisallowedCharacter { ch, at } => {
                write!(f, "disallowed character {ch:?} at byte {at}")
            }
            Self::EdgeHyphen => f.write_str("code starts or ends with a hyphen"),
            Self::EmptyHunk { at } => {
                write!(f, "consecutive hyphens produce an empty hunk at byte {at}")
            }
        }
    }
}

impl std::error::Error for CodeFormatViolation {}

/// Check a candidate code against the recommended convention.
///
/// Returns the first violation encountered, scanning left to right. The scan
/// is a single pass; edge hyphens are reported before any interior finding.
///
/// # Example
///
/// ```rust
/// use cairn_errors::codes::{validate_code, CodeFormatViolation};
///
/// assert!(validate_code("app-error-io").is_ok());
/// assert_eq!(
///     validate_code("app error"),
///     Err(CodeFormatViolation::DisallowedCharacter { ch: ' ', at: 3 })
/// );
/// assert_eq!(
///     validate_code("app--io"),
///     Err(CodeFormatViolation::EmptyHunk { at: 4 })
/// );
/// ```
pub fn validate_code(code: &str) -> Result<(), CodeFormatViolation> {
    if code.is_empty() {
        return Err(CodeFormatViolation::Empty);
    }
    if code.starts_with('-') || code.ends_with('-') {
        return Err(CodeFormatViolation::EdgeHyphen);
    }

    let mut previous_was_hyphen = false;
    for (at, ch) in code.char_indices() {
        if ch == '-' {
            if previous_was_hyphen {
                return Err(CodeFormatViolation::EmptyHunk { at });
            }
            previous_was_hyphen = true;
        } else if ch.is_ascii_alphanumeric() {
            previous_was_hyphen = false;
        } else {
            return Err(CodeFormatViolation::DisallowedCharacter { ch, at });
        }
    }

    Ok(())
}

/// Convenience predicate over [`validate_code`].
#[inline]
pub fn is_conforming(code: &str) -> bool {
    validate_code(code).is_ok()
}

/// Iterate over the dash-delimited hunks of a code.
///
/// Purely lexical: no conformance check is applied, so a non-conforming code
/// yields whatever `split('-')` produces (including empty segments).
///
/// ```rust
/// let hunks: Vec<&str> = cairn_errors::codes::hunks("cairn-error-decode").collect();
/// assert_eq!(hunks, ["cairn", "error", "decode"]);
/// ```
pub fn hunks(code: &str) -> impl Iterator<Item = &str> {
    code.split('-')
}
