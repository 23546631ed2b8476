//! E0382: use of moved value / borrow of moved value.

use super::{
    CANNOT_PARSE, Conflict, RenderContext, RenderResult, RenderSuccess, region_point_conflict,
};
use crate::canvas::{Painter, Pointer};
use crate::diagnostics::Diagnostic;
use crate::geometry::minmax;
use crate::handler::HandlerResult;
use crate::svg::svg_with_canvas;
use regex::Regex;
use std::sync::LazyLock;

static MOVED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r": `(.+)`(?:\n|$)").expect("valid E0382 regex"));

const TIP: &str = "tip: value cannot be used after being moved";

/// What an E0382 diagnostic says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UseAfterMove {
    /// The moved value.
    pub moved: String,
    /// Line of the move.
    pub move_line: usize,
    /// Line the value was defined on, when the compiler reports it.
    pub define_line: Option<usize>,
    /// Line of the use after the move.
    pub error_line: usize,
}

/// Parse an E0382 diagnostic.
pub fn extract(diag: &Diagnostic) -> HandlerResult<UseAfterMove> {
    let Some(move_line) = diag
        .related_ending_with("value moved here")
        .map(|info| info.range.start.line)
    else {
        return HandlerResult::inapplicable(CANNOT_PARSE);
    };
    let Some(caps) = MOVED_RE.captures(&diag.message) else {
        return HandlerResult::inapplicable(CANNOT_PARSE);
    };
    let define_line = diag
        .related_starting_with("move occurs because `")
        .map(|info| info.range.start.line);

    HandlerResult::Success(UseAfterMove {
        moved: caps[1].to_string(),
        move_line,
        define_line,
        error_line: diag.line(),
    })
}

/// Render an E0382 diagnostic.
///
/// With a known definition line the value's lifetime is drawn as a region ending at the move;
/// without one, the drawing degrades to two pointers.
pub fn render(ctx: &RenderContext<'_>, diag: &Diagnostic) -> RenderResult {
    extract(diag).map(|facts| match facts.define_line {
        Some(define_line) => with_definition(ctx, &facts, define_line),
        None => pointers_only(ctx, &facts),
    })
}

fn with_definition(
    ctx: &RenderContext<'_>,
    facts: &UseAfterMove,
    define_line: usize,
) -> RenderSuccess {
    let moved = &facts.moved;
    let region = format!("lifetime of `{moved}`");
    let point = format!("use of `{moved}` after being moved");
    let mut success = region_point_conflict(
        ctx,
        Conflict {
            from: define_line,
            to: facts.move_line,
            error_line: facts.error_line,
            tip_line: facts.error_line + 1,
            region_text: &region,
            point_text: &point,
            tip: TIP,
        },
    );

    let colors = ctx.colors();
    Painter::new(&mut success.image.canvas, ctx.config, success.line).pointer_text(Pointer {
        line: facts.move_line,
        text_line: facts.move_line,
        offset: 1.0,
        text: &format!("`{moved}` moved to another variable"),
        color: &colors.info2,
    });
    success
}

fn pointers_only(ctx: &RenderContext<'_>, facts: &UseAfterMove) -> RenderSuccess {
    let colors = ctx.colors();
    let moved = &facts.moved;
    let tip_line = facts.error_line + 1;
    let (top, bottom) = minmax(&[facts.move_line, facts.error_line, tip_line]);
    let mut image = svg_with_canvas(ctx.config, ctx.shift_px(top, bottom), bottom - top + 1);

    let mut painter = Painter::new(&mut image.canvas, ctx.config, top);
    painter.pointer_text(Pointer {
        line: facts.move_line,
        text_line: facts.move_line,
        offset: 0.5,
        text: &format!("end of `{moved}`'s lifetime when it is moved"),
        color: &colors.info,
    });
    painter.pointer_text(Pointer {
        line: facts.error_line,
        text_line: facts.error_line,
        offset: 0.5,
        text: &format!("use of `{moved}` after being moved"),
        color: &colors.error,
    });
    painter.tip(tip_line, TIP, &colors.tip);

    RenderSuccess { image, line: top }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moved_pattern_requires_line_end() {
        let caps = MOVED_RE
            .captures("borrow of moved value: `v`\nvalue borrowed here after move")
            .map(|c| c[1].to_string());
        assert_eq!(caps.as_deref(), Some("v"));
        let caps = MOVED_RE
            .captures("use of moved value: `s`")
            .map(|c| c[1].to_string());
        assert_eq!(caps.as_deref(), Some("s"));
        assert!(MOVED_RE.captures("use of moved value: `s` here").is_none());
    }
}
