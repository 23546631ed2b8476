//! E0308 (mismatched types) where assigning through a mutable reference is missing a `*`.

use super::{InlineHint, InlineResult, QuickFix};
use crate::diagnostics::Diagnostic;
use crate::handler::HandlerResult;
use crate::line_index::{LineSource, word_range_at};
use regex::Regex;
use std::sync::LazyLock;

static MISMATCH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^mismatched types\nexpected `(?P<expected>.*)`, found (?P<found>.*)$")
        .expect("valid E0308 regex")
});

const DEREF_HINT: &str = "consider dereferencing here to assign to the mutably borrowed value";

/// The two types of a mismatched-types message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMismatch {
    /// The expected type.
    pub expected_type: String,
    /// The found type. Not always a real type (e.g. `integer`), hence only unwrapped from
    /// backticks when present.
    pub found_type: String,
}

/// Parse a mismatched-types message.
pub fn check_autoderef(diag: &Diagnostic) -> HandlerResult<TypeMismatch> {
    let Some(caps) = MISMATCH_RE.captures(&diag.message) else {
        return HandlerResult::not_applicable();
    };
    let found = &caps["found"];
    let found_type = found
        .strip_prefix('`')
        .and_then(|s| s.strip_suffix('`'))
        .unwrap_or(found);
    HandlerResult::Success(TypeMismatch {
        expected_type: caps["expected"].to_string(),
        found_type: found_type.to_string(),
    })
}

/// Suggest inserting a single `*` where the compiler says dereferencing is needed.
pub fn autoderef(document: &dyn LineSource, diag: &Diagnostic) -> InlineResult {
    check_autoderef(diag).map(|_| {
        diag.related_starting_with(DEREF_HINT)
            .map(|info| {
                let at = info.range.start;
                // The reported range is zero-width; hover over the whole word instead.
                let range = word_range_at(document, at).unwrap_or(info.range);
                InlineHint {
                    range,
                    hover_message: format!("{DEREF_HINT} (click to accept)"),
                    fix: QuickFix::InsertText {
                        line: at.line,
                        character: at.character,
                        text: "*".to_string(),
                    },
                }
            })
            .into_iter()
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticRange;

    #[test]
    fn test_found_type_unwrapped_only_when_quoted() {
        let range = DiagnosticRange::line_start(0);
        let quoted = Diagnostic::rustc_error(
            "E0308",
            "mismatched types\nexpected `&mut i32`, found `i32`",
            range,
        );
        assert_eq!(
            check_autoderef(&quoted).success(),
            Some(TypeMismatch {
                expected_type: "&mut i32".to_string(),
                found_type: "i32".to_string(),
            })
        );

        let bare = Diagnostic::rustc_error(
            "E0308",
            "mismatched types\nexpected `&mut {integer}`, found integer",
            range,
        );
        assert_eq!(
            check_autoderef(&bare).success().map(|m| m.found_type),
            Some("integer".to_string())
        );

        let other = Diagnostic::rustc_error("E0308", "mismatched types", range);
        assert!(check_autoderef(&other).is_unsuccessful());
    }
}
