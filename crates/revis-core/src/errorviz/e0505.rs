//! E0505: cannot move out of `x` because it is borrowed.

use super::{
    CANNOT_PARSE, CANNOT_PARSE_RELATED, Conflict, RenderContext, RenderResult,
    region_point_conflict, related_region,
};
use crate::diagnostics::Diagnostic;
use crate::handler::HandlerResult;
use regex::Regex;
use std::sync::LazyLock;

static MOVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^cannot move out of `(.+)` because it is borrowed").expect("valid E0505 regex")
});

const TIP: &str = "tip: the move of a value should happen when it is not borrowed.\n\
                   after the move, the value can no longer be borrowed";

/// What an E0505 diagnostic says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveWhileBorrowed {
    /// The moved value.
    pub borrowed: String,
    /// Line of the borrow.
    pub from: usize,
    /// Line where the borrow is last used.
    pub to: usize,
    /// Line of the move.
    pub error_line: usize,
}

/// Parse an E0505 diagnostic.
pub fn extract(diag: &Diagnostic) -> HandlerResult<MoveWhileBorrowed> {
    let Some(caps) = MOVE_RE.captures(&diag.message) else {
        return HandlerResult::inapplicable(CANNOT_PARSE);
    };
    let Some((from, to)) = related_region(diag, "is borrowed here", "borrow later used here")
    else {
        return HandlerResult::inapplicable(CANNOT_PARSE_RELATED);
    };
    HandlerResult::Success(MoveWhileBorrowed {
        borrowed: caps[1].to_string(),
        from,
        to,
        error_line: diag.line(),
    })
}

/// Render an E0505 diagnostic.
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
                point_text: &format!("`{b}` moved"),
                tip: TIP,
            },
        )
    })
}
