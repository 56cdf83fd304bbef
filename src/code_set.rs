//! Set algebra over error codes.
//!
//! A [`CodeSet`] expresses "the codes an operation may produce" or "the
//! codes a caller handles". The algebra is the whole contract: a caller's
//! handled-set should be a superset of a callee's declared produced-set, and
//! every element of `difference(produced, handled)` is an unhandled code for
//! review tooling to surface. Policy enforcement lives in that tooling; this
//! module only supplies the sets.
//!
//! Sets operate purely over the `code` field. Two faults with the same code
//! are the same error kind here, whatever their messages or details say.
//!
//! Iteration and [`Display`](fmt::Display) order is sorted, so lint output
//! and snapshot tests are deterministic.
//!
//! # Example
//!
//! ```rust
//! use cairn_errors::{code_set, CodeSet};
//!
//! let produced = code_set!["app-error-io", "app-error-parse"];
//! let handled = code_set!["app-error-io"];
//!
//! assert!(!produced.is_subset_of(&handled));
//! let unhandled = produced.difference(&handled);
//! assert_eq!(unhandled.to_string(), "{app-error-parse}");
//! ```

use std::collections::BTreeSet;
use std::fmt;

use crate::fault::Fault;

/// An unordered collection of distinct error codes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeSet {
    codes: BTreeSet<String>,
}

impl CodeSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every code appearing anywhere in a fault's cause tree.
    ///
    /// Walks with an explicit work-stack; useful for computing the
    /// produced-set of an operation from an observed fault.
    pub fn from_tree(fault: &Fault) -> Self {
        let mut set = Self::new();
        let mut stack = vec![fault];
        while let Some(node) = stack.pop() {
            set.codes.insert(node.code().to_owned());
            if let Some(cause) = node.cause() {
                stack.extend(cause);
            }
        }
        set
    }

    /// Insert a code. Returns whether the set did not already contain it.
    pub fn insert(&mut self, code: impl Into<String>) -> bool {
        self.codes.insert(code.into())
    }

    /// Whether the set contains the code.
    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    /// Whether this set handles the given fault's kind.
    pub fn handles(&self, fault: &Fault) -> bool {
        self.contains(fault.code())
    }

    /// Number of distinct codes.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Iterate the codes in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    /// Codes in `self` or `other` (no duplicates by construction).
    #[must_use]
    pub fn union(&self, other: &CodeSet) -> CodeSet {
        CodeSet {
            codes: self.codes.union(&other.codes).cloned().collect(),
        }
    }

    /// Codes in `self` that are not in `other`.
    ///
    /// `difference(produced, handled)` is the unhandled-set of the
    /// exhaustiveness check.
    #[must_use]
    pub fn difference(&self, other: &CodeSet) -> CodeSet {
        CodeSet {
            codes: self.codes.difference(&other.codes).cloned().collect(),
        }
    }

    /// True iff every code in `self` appears in `other`.
    pub fn is_subset_of(&self, other: &CodeSet) -> bool {
        self.codes.is_subset(&other.codes)
    }

    /// True iff every code in `other` appears in `self`.
    pub fn is_superset_of(&self, other: &CodeSet) -> bool {
        self.codes.is_superset(&other.codes)
    }
}

impl<S: Into<String>> FromIterator<S> for CodeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            codes: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for CodeSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.codes.extend(iter.into_iter().map(Into::into));
    }
}

impl<'a> IntoIterator for &'a CodeSet {
    type Item = &'a String;
    type IntoIter = std::collections::btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.codes.iter()
    }
}

impl fmt::Display for CodeSet {
    /// Sorted, brace-delimited: `{a, b, c}`. Suitable for lint findings.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (index, code) in self.codes.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            f.write_str(code)?;
        }
        f.write_str("}")
    }
}

/// Build a [`CodeSet`] from code expressions.
///
/// ```rust
/// use cairn_errors::code_set;
///
/// let set = code_set!["app-error-io", "app-error-parse"];
/// assert_eq!(set.len(), 2);
/// assert!(code_set![].is_empty());
/// ```
#[macro_export]
macro_rules! code_set {
    () => {
        $crate::CodeSet::new()
    };
    ($($code:expr),+ $(,)?) => {{
        let mut set = $crate::CodeSet::new();
        $( set.insert($code); )+
        set
    }};
}
