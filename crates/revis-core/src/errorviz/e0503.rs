//! E0503: cannot use `x` because it was mutably borrowed.

use super::{
    CANNOT_PARSE, CANNOT_PARSE_RELATED, Conflict, RenderContext, RenderResult,
    region_point_conflict, related_region,
};
use crate::diagnostics::Diagnostic;
use crate::handler::HandlerResult;
use regex::Regex;
use std::sync::LazyLock;

static USE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^cannot use `(.+)` because it was mutably borrowed").expect("valid E0503 regex")
});

/// What an E0503 diagnostic says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseWhileBorrowed {
    /// The used place.
    pub borrowed: String,
    /// Line of the mutable borrow.
    pub from: usize,
    /// Line where the borrow is last used.
    pub to: usize,
    /// Line of the conflicting use.
    pub error_line: usize,
}

/// Parse an E0503 diagnostic.
pub fn extract(diag: &Diagnostic) -> HandlerResult<UseWhileBorrowed> {
    let Some(caps) = USE_RE.captures(&diag.message) else {
        return HandlerResult::inapplicable(CANNOT_PARSE);
    };
    let Some((from, to)) = related_region(diag, "is borrowed here", "borrow later used here")
    else {
        return HandlerResult::inapplicable(CANNOT_PARSE_RELATED);
    };
    HandlerResult::Success(UseWhileBorrowed {
        borrowed: caps[1].to_string(),
        from,
        to,
        error_line: diag.line(),
    })
}

/// Render an E0503 diagnostic.
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
                region_text: &format!("`{b}` borrowed mutably in this region"),
                point_text: &format!("`{b}` used here, conflicting with the borrow"),
                tip: &format!("tip: move the use of `{b}` out of the borrow region"),
            },
        )
    })
}
