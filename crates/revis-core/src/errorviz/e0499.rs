//! E0499: cannot borrow `x` as mutable more than once at a time.

use super::{
    CANNOT_PARSE, CANNOT_PARSE_RELATED, Conflict, RenderContext, RenderResult, RenderSuccess,
    region_point_conflict, related_region,
};
use crate::canvas::{Painter, Pointer};
use crate::diagnostics::Diagnostic;
use crate::geometry::minmax;
use crate::handler::HandlerResult;
use crate::svg::svg_with_canvas;
use regex::Regex;
use std::sync::LazyLock;

static TWICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^cannot borrow `(.+)` as mutable more than once at a time")
        .expect("valid E0499 regex")
});

/// What an E0499 diagnostic says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoubleMutBorrow {
    /// The borrowed place.
    pub borrowed: String,
    /// Line of the first mutable borrow.
    pub from: usize,
    /// Line where the first borrow is last used.
    pub to: usize,
    /// Line of the second mutable borrow.
    pub error_line: usize,
}

impl DoubleMutBorrow {
    /// The first borrow starts and is last used on the same line, which is how a borrow held
    /// across loop iterations is reported.
    pub fn is_loop(&self) -> bool {
        self.from == self.to
    }
}

/// Parse an E0499 diagnostic.
pub fn extract(diag: &Diagnostic) -> HandlerResult<DoubleMutBorrow> {
    let Some(caps) = TWICE_RE.captures(&diag.message) else {
        return HandlerResult::inapplicable(CANNOT_PARSE);
    };
    let Some((from, to)) = related_region(
        diag,
        "first mutable borrow occurs here",
        "first borrow later used here",
    ) else {
        return HandlerResult::inapplicable(CANNOT_PARSE_RELATED);
    };

    HandlerResult::Success(DoubleMutBorrow {
        borrowed: caps[1].to_string(),
        from,
        to,
        error_line: diag.line(),
    })
}

/// Render an E0499 diagnostic.
pub fn render(ctx: &RenderContext<'_>, diag: &Diagnostic) -> RenderResult {
    extract(diag).map(|facts| {
        if facts.is_loop() {
            return in_loop(ctx, &facts);
        }
        let b = &facts.borrowed;
        let region = format!("`{b}` borrowed mutably in this region");
        let point = format!("`{b}` borrowed mutably again, conflicting with the first borrow");
        region_point_conflict(
            ctx,
            Conflict {
                from: facts.from,
                to: facts.to,
                error_line: facts.error_line,
                tip_line: facts.to,
                region_text: &region,
                point_text: &point,
                tip: "tip: a variable can only be mutably borrowed once at a time",
            },
        )
    })
}

fn in_loop(ctx: &RenderContext<'_>, facts: &DoubleMutBorrow) -> RenderSuccess {
    let colors = ctx.colors();
    let b = &facts.borrowed;
    let tip_line = facts.error_line + 1;
    let (top, bottom) = minmax(&[facts.from, facts.error_line, tip_line]);
    let mut image = svg_with_canvas(ctx.config, ctx.shift_px(top, bottom), bottom - top + 1);

    let mut painter = Painter::new(&mut image.canvas, ctx.config, top);
    painter.pointer_text(Pointer {
        line: facts.from,
        text_line: facts.from,
        offset: 0.5,
        text: &format!("`{b}` mutably borrowed for the duration of the loop"),
        color: &colors.info,
    });
    painter.pointer_text(Pointer {
        line: facts.error_line,
        text_line: facts.error_line,
        offset: 0.5,
        text: &format!("`{b}` mutably borrowed again"),
        color: &colors.error,
    });
    painter.tip(
        tip_line,
        "tip: a value can only be mutably borrowed once at a time",
        &colors.tip,
    );

    RenderSuccess { image, line: top }
}
