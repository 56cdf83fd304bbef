//! # Cairn Errors
//!
//! Structured errors as plain values with stable string codes.
//!
//! ## Design Philosophy
//!
//! 1. **Errors are data, not hierarchies** - kind is a flat string `code`,
//!    never an inheritance tree
//! 2. **Classification is one comparison** - the code is the sole field
//!    programs branch on
//! 3. **Everything round-trips** - in-memory value and serial map are
//!    interchangeable, presence and absence included
//! 4. **Rendering is deterministic** - one fixed recursive rule set, with
//!    multi-cause behavior as an explicit policy
//! 5. **Coverage is set algebra** - produced-sets and handled-sets compare
//!    with `union` / `difference` / `is_subset_of`
//!
//! ## Data Model
//!
//! A [`Fault`] is a code, an optional human message, an optional flat
//! string-to-string `details` map for machines, and an optional ordered
//! sequence of causes - each itself a full fault, forming a tree. Values
//! are immutable after construction and safe to share across threads.
//!
//! The serial schema (JSON or equivalent):
//!
//! ```text
//! code:    string              (required)
//! message: string              (optional)
//! details: map<string,string>  (optional)
//! cause:   list<Error>         (optional)
//! ```
//!
//! Minimal instance: `{"code":"x"}`.
//!
//! ## Quick Start
//!
//! ```rust
//! use cairn_errors::{codec, render, Fault, InvalidValue};
//!
//! fn main() -> Result<(), InvalidValue> {
//!     let io = Fault::new("app-error-io")?.with_detail("path", "/etc/app.toml");
//!     let fault = Fault::new("app-error-config")?
//!         .with_message("configuration could not be loaded")
//!         .caused_by(io)?;
//!
//!     // Human display: details stay machine-only
//!     assert_eq!(
//!         render::render(&fault),
//!         "app-error-config: configuration could not be loaded: app-error-io"
//!     );
//!
//!     // Boundary round-trip
//!     let text = codec::encode_string(&fault);
//!     let received = codec::decode_str(&text).expect("valid payload");
//!     assert_eq!(received, fault);
//!     Ok(())
//! }
//! ```
//!
//! ## Exhaustiveness Checking
//!
//! ```rust
//! use cairn_errors::code_set;
//!
//! let produced = code_set!["app-error-io", "app-error-parse"];
//! let handled = code_set!["app-error-io"];
//!
//! let unhandled = produced.difference(&handled);
//! assert_eq!(unhandled.to_string(), "{app-error-parse}");
//! assert!(produced.is_subset_of(&produced.union(&handled)));
//! ```
//!
//! ## Interop Posture
//!
//! Foreign codes are first-class: the codec accepts any non-empty code, and
//! unknown serial fields are ignored so producers can add information
//! without breaking older consumers. The lexical convention in [`codes`] is
//! an opt-in lint for codes you mint yourself ([`Fault::conforming`]), not a
//! gate on what you can receive.
//!
//! All operations are synchronous, pure, and total apart from the
//! documented failure conditions; deep cause trees are bounded by
//! [`MAX_CAUSE_DEPTH`] so no input can exhaust the stack.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod code_set;
pub mod codec;
pub mod codes;
pub mod fault;
pub mod render;

pub use code_set::CodeSet;
pub use codec::{CausePath, DecodeError};
pub use codes::CodeFormatViolation;
pub use fault::{Fault, InvalidValue, MAX_CAUSE_DEPTH};
pub use render::{MultiCauseStyle, RenderOptions};
