//! Human-readable rendering of fault trees.
//!
//! The rendering rules are fixed and deterministic:
//!
//! 1. only a code: `code`
//! 2. code and message: `code: message`
//! 3. code and exactly one cause: `code: <rendered cause>`
//! 4. code, message, and exactly one cause: `code: message: <rendered cause>`
//!
//! Single-cause chains are followed iteratively, so rendering never recurses
//! and a maximally deep tree costs a fixed amount of stack. An explicitly
//! present but empty cause sequence renders like an absent one - the
//! rendered form is for humans and an empty list says nothing to them.
//!
//! More than one cause has no universally right answer, so the behavior is a
//! policy on [`RenderOptions`] rather than a hard-coded rule; see
//! [`MultiCauseStyle`]. Both styles are deterministic and pinned by tests.
//!
//! `details` never appears in rendered output. It is reserved for machine
//! consumption; anything a human needs from it belongs in `message`.
//!
//! # Example
//!
//! ```rust
//! use cairn_errors::{render, Fault, InvalidValue};
//!
//! fn main() -> Result<(), InvalidValue> {
//!     let fault = Fault::new("app-error-config")?
//!         .with_message("load failed")
//!         .caused_by(Fault::new("app-error-io")?)?;
//!     assert_eq!(render::render(&fault), "app-error-config: load failed: app-error-io");
//!     Ok(())
//! }
//! ```

use std::fmt;

use crate::fault::Fault;

/// Policy for a node carrying more than one cause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MultiCauseStyle {
    /// List the direct cause codes, joined by `", "` inside brackets:
    /// `x: m: [y, z]`. Does not recurse into the causes.
    #[default]
    ListCodes,
    /// State that detail was elided: `x: m: (2 causes elided)`, directing
    /// the reader to the serialized form.
    Elide,
}

/// Rendering options.
///
/// `Default` gives [`MultiCauseStyle::ListCodes`], which is also what
/// `Fault`'s `Display` implementation uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// How to render a node with more than one cause.
    pub multi_cause: MultiCauseStyle,
}

/// Render a fault with default options.
pub fn render(fault: &Fault) -> String {
    render_with(fault, &RenderOptions::default())
}

/// Render a fault with the given options.
pub fn render_with(fault: &Fault, options: &RenderOptions) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = render_to(fault, options, &mut out);
    out
}

/// Write the rendering directly to a formatter, without intermediate
/// allocation.
pub fn render_to(
    fault: &Fault,
    options: &RenderOptions,
    out: &mut impl fmt::Write,
) -> fmt::Result {
    let mut node = fault;
    loop {
        out.write_str(node.code())?;
        if let Some(message) = node.message() {
            out.write_str(": ")?;
            out.write_str(message)?;
        }
        match node.cause() {
            None | Some([]) => return Ok(()),
            Some([only]) => {
                out.write_str(": ")?;
                node = only;
            }
            Some(many) => {
                out.write_str(": ")?;
                return match options.multi_cause {
                    MultiCauseStyle::ListCodes => {
                        out.write_char('[')?;
                        for (index, cause) in many.iter().enumerate() {
                            if index > 0 {
                                out.write_str(", ")?;
                            }
                            out.write_str(cause.code())?;
                        }
                        out.write_char(']')
                    }
                    MultiCauseStyle::Elide => {
                        write!(out, "({} causes elided)", many.len())
                    }
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fault(code: &str) -> Fault {
        Fault::new(code).unwrap()
    }

    #[test]
    fn rule_1_code_only() {
        assert_eq!(render(&fault("x")), "x");
    }

    #[test]
    fn rule_2_code_and_message() {
        assert_eq!(render(&fault("x").with_message("m")), "x: m");
    }

    #[test]
    fn rule_3_code_and_single_cause() {
        let f = fault("x").caused_by(fault("y")).unwrap();
        assert_eq!(render(&f), "x: y");
    }

    #[test]
    fn rule_4_code_message_and_single_cause() {
        let f = fault("x").with_message("m").caused_by(fault("y")).unwrap();
        assert_eq!(render(&f), "x: m: y");
    }

    #[test]
    fn single_cause_chains_follow_recursively() {
        let f = fault("x")
            .caused_by(fault("y").with_message("mid").caused_by(fault("z")).unwrap())
            .unwrap();
        assert_eq!(render(&f), "x: y: mid: z");
    }

    #[test]
    fn empty_message_still_renders_separator() {
        // A present-but-empty message is rule 2 with an empty suffix
        assert_eq!(render(&fault("x").with_message("")), "x: ");
    }

    #[test]
    fn empty_cause_sequence_renders_like_absent() {
        let f = fault("x").with_cause(Vec::new()).unwrap();
        assert_eq!(render(&f), "x");
        let f = fault("x").with_message("m").with_cause(Vec::new()).unwrap();
        assert_eq!(render(&f), "x: m");
    }

    #[test]
    fn multi_cause_lists_codes() {
        let f = fault("x")
            .with_message("m")
            .with_cause(vec![fault("y"), fault("z")])
            .unwrap();
        assert_eq!(render(&f), "x: m: [y, z]");
    }

    #[test]
    fn multi_cause_list_does_not_recurse() {
        let nested = fault("y").caused_by(fault("deep")).unwrap();
        let f = fault("x").with_cause(vec![nested, fault("z")]).unwrap();
        assert_eq!(render(&f), "x: [y, z]");
    }

    #[test]
    fn multi_cause_elide_style() {
        let f = fault("x")
            .with_message("m")
            .with_cause(vec![fault("y"), fault("z")])
            .unwrap();
        let options = RenderOptions {
            multi_cause: MultiCauseStyle::Elide,
        };
        assert_eq!(render_with(&f, &options), "x: m: (2 causes elided)");
    }

    #[test]
    fn multi_cause_is_deterministic() {
        let a = fault("x").with_cause(vec![fault("y"), fault("z")]).unwrap();
        let b = fault("x")
            .with_detail("ignored", "by renderer")
            .with_cause(vec![fault("y"), fault("z")])
            .unwrap();
        assert_eq!(render(&a), render(&b));
    }

    #[test]
    fn details_never_rendered() {
        let f = fault("x").with_detail("secret", "value");
        assert_eq!(render(&f), "x");
    }

    #[test]
    fn render_to_matches_render() {
        let f = fault("x").with_message("m").caused_by(fault("y")).unwrap();
        let mut buffer = String::new();
        render_to(&f, &RenderOptions::default(), &mut buffer).unwrap();
        assert_eq!(buffer, render(&f));
    }
}
