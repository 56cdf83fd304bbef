//! The error value - an immutable tree of coded failures.
//!
//! # Architecture
//!
//! A [`Fault`] is a plain value, not a type hierarchy. Classification is a
//! string comparison on [`Fault::code`]; everything else is cargo:
//!
//! - `message`: free-form prose for humans, never parsed
//! - `details`: flat string-to-string annotations for machines, never used
//!   for control flow
//! - `cause`: an ordered sequence of upstream faults, each itself a full
//!   fault, forming a tree
//!
//! # Presence Semantics
//!
//! Absent and empty are different states and both survive the codec
//! round-trip. A present-but-empty `message` is legal and distinct from no
//! message; an explicitly set empty `details` map stays present.
//!
//! # Ownership & Safety
//!
//! Each node is solely owned by its parent (or the holder that constructed
//! it), so a fault transitively containing itself cannot be expressed: the
//! structure is acyclic by construction. What remains to guard is depth -
//! adversarially nested trees would otherwise exhaust the stack in the
//! recursive operations - so construction and decoding reject anything
//! deeper than [`MAX_CAUSE_DEPTH`]. Depth checks themselves walk with an
//! explicit work-stack.
//!
//! Values are immutable after construction: the builder consumes and
//! returns `Self`, and there are no `&mut` mutators. Concurrent readers need
//! no synchronization.

use std::collections::BTreeMap;
use std::fmt;

use crate::codes::{validate_code, CodeFormatViolation};
use crate::render::{render_to, RenderOptions};

/// Maximum depth of a cause tree, root included.
///
/// Construction ([`Fault::caused_by`], [`Fault::with_cause`]) and the codec
/// both enforce this bound, so every reachable `Fault` keeps the recursive
/// operations (serialize, render, collect) within a fixed stack budget.
pub const MAX_CAUSE_DEPTH: usize = 128;

/// A structured error value identified by a stable string code.
///
/// Equality (`PartialEq`/`Eq`) is structural over all four fields including
/// presence/absence - that is the equality the codec round-trip law is
/// stated in. Classification equality is on `code` alone; use
/// [`Fault::same_kind`] or [`crate::CodeSet`] for that reading.
///
/// # Example
///
/// ```rust
/// use cairn_errors::{Fault, InvalidValue};
///
/// fn main() -> Result<(), InvalidValue> {
///     let fault = Fault::new("app-error-config")?
///         .with_message("configuration could not be loaded")
///         .with_detail("path", "/etc/app.toml")
///         .caused_by(Fault::new("app-error-io")?)?;
///
///     assert_eq!(fault.code(), "app-error-config");
///     assert_eq!(fault.cause().map(<[Fault]>::len), Some(1));
///     Ok(())
/// }
/// ```
#[must_use = "faults should be returned, serialized, or rendered"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    code: String,
    message: Option<String>,
    details: Option<BTreeMap<String, String>>,
    cause: Option<Vec<Fault>>,
}

impl Fault {
    /// Create a fault with the given code and every other field absent.
    ///
    /// # Errors
    ///
    /// [`InvalidValue::EmptyCode`] if `code` is empty. Any non-empty string
    /// is accepted here; conformance to the lexical convention is the
    /// opt-in [`Fault::conforming`].
    pub fn new(code: impl Into<String>) -> Result<Self, InvalidValue> {
        let code = code.into();
        if code.is_empty() {
            return Err(InvalidValue::EmptyCode);
        }
        Ok(Self {
            code,
            message: None,
            details: None,
            cause: None,
        })
    }

    /// Create a fault, additionally checking the code against the
    /// recommended lexical convention.
    ///
    /// Intended for codes minted by the calling application itself, where a
    /// convention drift is a programming error worth surfacing.
    ///
    /// # Errors
    ///
    /// [`InvalidValue::CodeFormat`] describing the violation.
    pub fn conforming(code: impl Into<String>) -> Result<Self, InvalidValue> {
        let code = code.into();
        validate_code(&code).map_err(InvalidValue::CodeFormat)?;
        Self::new(code)
    }

    /// Trusted constructor for the codec, which performs its own validation.
    pub(crate) fn from_parts(
        code: String,
        message: Option<String>,
        details: Option<BTreeMap<String, String>>,
        cause: Option<Vec<Fault>>,
    ) -> Self {
        Self {
            code,
            message,
            details,
            cause,
        }
    }

    /// Set the human-readable message.
    ///
    /// An empty string is a legal message and is distinct from no message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Insert one machine-oriented detail, creating the map if absent.
    ///
    /// Values are strings by type; producers stringify numbers or booleans
    /// themselves.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Set the whole details map, marking it present even when empty.
    pub fn with_details(mut self, details: BTreeMap<String, String>) -> Self {
        self.details = Some(details);
        self
    }

    /// Append one cause, creating the sequence if absent.
    ///
    /// # Errors
    ///
    /// [`InvalidValue::CauseTooDeep`] if attaching `cause` would nest beyond
    /// [`MAX_CAUSE_DEPTH`].
    pub fn caused_by(mut self, cause: Fault) -> Result<Self, InvalidValue> {
        check_attachable(&cause)?;
        self.cause.get_or_insert_with(Vec::new).push(cause);
        Ok(self)
    }

    /// Set the whole cause sequence, marking it present even when empty.
    ///
    /// # Errors
    ///
    /// [`InvalidValue::CauseTooDeep`] if any element would nest beyond
    /// [`MAX_CAUSE_DEPTH`].
    pub fn with_cause(mut self, cause: Vec<Fault>) -> Result<Self, InvalidValue> {
        for element in &cause {
            check_attachable(element)?;
        }
        self.cause = Some(cause);
        Ok(self)
    }

    /// The stable code identifying this error's kind.
    #[inline]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The human-readable message, if present.
    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The machine-oriented annotations, if present.
    #[inline]
    pub fn details(&self) -> Option<&BTreeMap<String, String>> {
        self.details.as_ref()
    }

    /// The ordered cause sequence, if present.
    #[inline]
    pub fn cause(&self) -> Option<&[Fault]> {
        self.cause.as_deref()
    }

    /// Whether two faults are the same error kind.
    ///
    /// Kind equality is on `code` alone; messages and details do not
    /// participate.
    #[inline]
    pub fn same_kind(&self, other: &Fault) -> bool {
        self.code == other.code
    }

    /// Depth of this cause tree, root included (a leaf has depth 1).
    pub fn depth(&self) -> usize {
        let mut max_depth = 1;
        let mut stack: Vec<(&Fault, usize)> = vec![(self, 1)];
        while let Some((node, depth)) = stack.pop() {
            if depth > max_depth {
                max_depth = depth;
            }
            if let Some(cause) = node.cause() {
                for child in cause {
                    stack.push((child, depth + 1));
                }
            }
        }
        max_depth
    }
}

/// Reject a subtree that would exceed [`MAX_CAUSE_DEPTH`] once attached
/// under one more parent. Iterative walk; bails at the first offending node.
fn check_attachable(cause: &Fault) -> Result<(), InvalidValue> {
    let mut stack: Vec<(&Fault, usize)> = vec![(cause, 2)];
    while let Some((node, depth)) = stack.pop() {
        if depth > MAX_CAUSE_DEPTH {
            return Err(InvalidValue::CauseTooDeep { depth });
        }
        if let Some(children) = node.cause() {
            for child in children {
                stack.push((child, depth + 1));
            }
        }
    }
    Ok(())
}

impl fmt::Display for Fault {
    /// Human-readable rendering with default options.
    ///
    /// Delegates to [`crate::render::render_to`]; `details` never appears in
    /// this output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_to(self, &RenderOptions::default(), f)
    }
}

impl std::error::Error for Fault {
    /// The first cause, adapting the cause tree to Rust's error chain.
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause()
            .and_then(<[Fault]>::first)
            .map(|first| first as &(dyn std::error::Error + 'static))
    }
}

/// Construction-time violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidValue {
    /// The code was empty or missing.
    EmptyCode,
    /// The cause tree would exceed [`MAX_CAUSE_DEPTH`].
    CauseTooDeep {
        /// Depth at which the bound was crossed.
        depth: usize,
    },
    /// Opt-in lexical validation rejected the code.
    CodeFormat(CodeFormatViolation),
}

impl fmt::Display for InvalidValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCode => f.write_str("error code must be a non-empty string"),
            Self::CauseTooDeep { depth } => write!(
                f,
                "cause tree depth {depth} exceeds the maximum of {MAX_CAUSE_DEPTH}"
            ),
            Self::CodeFormat(violation) => write!(f, "code format violation: {violation}"),
        }
    }
}

impl std::error::Error for InvalidValue {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CodeFormat(violation) => Some(violation),
            _ => None,
        }
    }
}

impl From<CodeFormatViolation> for InvalidValue {
    fn from(violation: CodeFormatViolation) -> Self {
        Self::CodeFormat(violation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_empty_code() {
        assert_eq!(Fault::new(""), Err(InvalidValue::EmptyCode));
    }

    #[test]
    fn new_accepts_foreign_codes() {
        // Non-conforming but non-empty codes are fine outside the opt-in guard
        let fault = Fault::new("Not A Conventional Code!").unwrap();
        assert_eq!(fault.code(), "Not A Conventional Code!");
    }

    #[test]
    fn conforming_rejects_violations() {
        assert!(matches!(
            Fault::conforming("app code"),
            Err(InvalidValue::CodeFormat(
                CodeFormatViolation::DisallowedCharacter { ch: ' ', .. }
            ))
        ));
        assert!(Fault::conforming("app-error-io").is_ok());
    }

    #[test]
    fn builder_defaults_everything_absent() {
        let fault = Fault::new("x").unwrap();
        assert!(fault.message().is_none());
        assert!(fault.details().is_none());
        assert!(fault.cause().is_none());
    }

    #[test]
    fn empty_message_is_present() {
        let fault = Fault::new("x").unwrap().with_message("");
        assert_eq!(fault.message(), Some(""));
        assert_ne!(fault, Fault::new("x").unwrap());
    }

    #[test]
    fn empty_details_are_present() {
        let fault = Fault::new("x").unwrap().with_details(BTreeMap::new());
        assert_eq!(fault.details().map(BTreeMap::len), Some(0));
        assert_ne!(fault, Fault::new("x").unwrap());
    }

    #[test]
    fn with_detail_accumulates() {
        let fault = Fault::new("x")
            .unwrap()
            .with_detail("a", "1")
            .with_detail("b", "2");
        let details = fault.details().unwrap();
        assert_eq!(details.get("a").map(String::as_str), Some("1"));
        assert_eq!(details.get("b").map(String::as_str), Some("2"));
    }

    #[test]
    fn caused_by_builds_ordered_sequence() {
        let fault = Fault::new("x")
            .unwrap()
            .caused_by(Fault::new("y").unwrap())
            .unwrap()
            .caused_by(Fault::new("z").unwrap())
            .unwrap();
        let cause = fault.cause().unwrap();
        assert_eq!(cause[0].code(), "y");
        assert_eq!(cause[1].code(), "z");
    }

    #[test]
    fn same_kind_ignores_everything_but_code() {
        let a = Fault::new("x").unwrap().with_message("one");
        let b = Fault::new("x").unwrap().with_detail("k", "v");
        let c = Fault::new("y").unwrap();
        assert!(a.same_kind(&b));
        assert!(!a.same_kind(&c));
        assert_ne!(a, b); // structural equality still differs
    }

    #[test]
    fn depth_counts_longest_chain() {
        let leaf = Fault::new("leaf").unwrap();
        assert_eq!(leaf.depth(), 1);

        let two = Fault::new("mid").unwrap().caused_by(leaf).unwrap();
        let three = Fault::new("root")
            .unwrap()
            .caused_by(Fault::new("short").unwrap())
            .unwrap()
            .caused_by(two)
            .unwrap();
        assert_eq!(three.depth(), 3);
    }

    #[test]
    fn depth_guard_rejects_adversarial_nesting() {
        let mut chain = Fault::new("leaf").unwrap();
        for _ in 1..MAX_CAUSE_DEPTH {
            chain = Fault::new("link").unwrap().caused_by(chain).unwrap();
        }
        assert_eq!(chain.depth(), MAX_CAUSE_DEPTH);

        // One more layer crosses the bound
        let over = Fault::new("root").unwrap().caused_by(chain);
        assert_eq!(
            over,
            Err(InvalidValue::CauseTooDeep {
                depth: MAX_CAUSE_DEPTH + 1
            })
        );
    }

    #[test]
    fn error_source_is_first_cause() {
        use std::error::Error;

        let fault = Fault::new("x")
            .unwrap()
            .caused_by(Fault::new("y").unwrap())
            .unwrap();
        let source = fault.source().unwrap();
        assert_eq!(source.to_string(), "y");

        assert!(Fault::new("x").unwrap().source().is_none());
    }

    #[test]
    fn display_uses_renderer() {
        let fault = Fault::new("x").unwrap().with_message("m");
        assert_eq!(fault.to_string(), "x: m");
    }
}
