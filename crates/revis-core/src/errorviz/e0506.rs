//! E0506: cannot assign to `x` because it is borrowed.

use super::{
    CANNOT_PARSE, CANNOT_PARSE_RELATED, Conflict, RenderContext, RenderResult,
    region_point_conflict, related_region,
};
use crate::diagnostics::Diagnostic;
use crate::handler::HandlerResult;
use regex::Regex;
use std::sync::LazyLock;

static ASSIGN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^cannot assign to `(.+)` because it is borrowed").expect("valid E0506 regex")
});

/// What an E0506 diagnostic says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignWhileBorrowed {
    /// The reassigned place.
    pub borrowed: String,
    /// Line of the borrow.
    pub from: usize,
    /// Line where the borrow is last used.
    pub to: usize,
    /// Line of the assignment.
    pub error_line: usize,
}

/// Parse an E0506 diagnostic.
pub fn extract(diag: &Diagnostic) -> HandlerResult<AssignWhileBorrowed> {
    let Some(caps) = ASSIGN_RE.captures(&diag.message) else {
        return HandlerResult::inapplicable(CANNOT_PARSE);
    };
    let Some((from, to)) = related_region(diag, "is borrowed here", "borrow later used here")
    else {
        return HandlerResult::inapplicable(CANNOT_PARSE_RELATED);
    };
    HandlerResult::Success(AssignWhileBorrowed {
        borrowed: caps[1].to_string(),
        from,
        to,
        error_line: diag.line(),
    })
}

/// Render an E0506 diagnostic.
pub fn render(ctx: &RenderContext<'_>, diag: &Diagnostic) -> RenderResult {
    extract(diag).map(|facts| {
        let b = &facts.borrowed;
        region_point_conflict(
            ctx,
            Conflict {
                from: facts.from,
                to: facts.to,
                error_line: facts.error_line,
                tip_line: facts.to,
                region_text: &format!("`{b}` borrowed in this region"),
                point_text: &format!("`{b}` assigned to another value"),
                tip: "tip: when a variable is borrowed by another variable, it cannot be reassigned",
            },
        )
    })
}
