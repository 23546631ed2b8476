//! E0502: cannot borrow `x` as mutable because it is also borrowed as immutable (or vice versa).

use super::{
    CANNOT_PARSE, CANNOT_PARSE_RELATED, Conflict, RenderContext, RenderResult,
    region_point_conflict, related_region,
};
use crate::diagnostics::Diagnostic;
use crate::handler::HandlerResult;
use regex::Regex;
use std::sync::LazyLock;

static BORROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^cannot borrow `\*?(.+)` as (im)?mutable").expect("valid E0502 regex")
});

/// What an E0502 diagnostic says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowConflict {
    /// The borrowed place, without a leading `*`.
    pub borrowed: String,
    /// `true` when the conflicting (erroring) borrow is immutable.
    pub immutable: bool,
    /// Line of the earlier borrow.
    pub from: usize,
    /// Line where the earlier borrow is last used.
    pub to: usize,
    /// Line of the conflicting borrow.
    pub error_line: usize,
}

/// Parse an E0502 diagnostic.
pub fn extract(diag: &Diagnostic) -> HandlerResult<BorrowConflict> {
    let Some(caps) = BORROW_RE.captures(&diag.message) else {
        return HandlerResult::inapplicable(CANNOT_PARSE);
    };
    let borrowed = caps[1].to_string();
    let immutable = caps.get(2).is_some();

    let Some((from, to)) =
        related_region(diag, "borrow occurs here", "borrow later used here")
    else {
        return HandlerResult::inapplicable(CANNOT_PARSE_RELATED);
    };

    HandlerResult::Success(BorrowConflict {
        borrowed,
        immutable,
        from,
        to,
        error_line: diag.line(),
    })
}

/// Render an E0502 diagnostic.
pub fn render(ctx: &RenderContext<'_>, diag: &Diagnostic) -> RenderResult {
    extract(diag).map(|facts| {
        // The region is the earlier borrow, which has the opposite mutability of the error.
        let (here, earlier) = if facts.immutable {
            ("im", "")
        } else {
            ("", "im")
        };
        let b = &facts.borrowed;
        let region = format!("`{b}` borrowed {earlier}mutably in this region");
        let point =
            format!("`{b}` borrowed {here}mutably here, conflicting with the previous borrow");
        let tip =
            format!("tip: move the {here}mutable borrow out of the {earlier}mutable borrow area");
        region_point_conflict(
            ctx,
            Conflict {
                from: facts.from,
                to: facts.to,
                error_line: facts.error_line,
                tip_line: facts.to,
                region_text: &region,
                point_text: &point,
                tip: &tip,
            },
        )
    })
}
