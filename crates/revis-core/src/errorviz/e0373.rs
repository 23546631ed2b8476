//! E0373: closure may outlive the current function, but it borrows `x`.

use super::{CANNOT_PARSE, RenderContext, RenderResult, RenderSuccess};
use crate::canvas::{Painter, TEXT_X};
use crate::diagnostics::Diagnostic;
use crate::handler::HandlerResult;
use crate::svg::{PathBuilder, svg_with_canvas};
use regex::Regex;
use std::sync::LazyLock;

static CLOSURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^closure may outlive the current function, but it borrows `(.+)`,")
        .expect("valid E0373 regex")
});

/// What an E0373 diagnostic says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosureEscape {
    /// The captured variable.
    pub borrowed: String,
    /// Line of the closure.
    pub line: usize,
}

/// Parse an E0373 diagnostic.
pub fn extract(diag: &Diagnostic) -> HandlerResult<ClosureEscape> {
    match CLOSURE_RE.captures(&diag.message) {
        Some(caps) => HandlerResult::Success(ClosureEscape {
            borrowed: caps[1].to_string(),
            line: diag.line(),
        }),
        None => HandlerResult::inapplicable(CANNOT_PARSE),
    }
}

/// Render an E0373 diagnostic: a down arrow beside two lines of explanation.
pub fn render(ctx: &RenderContext<'_>, diag: &Diagnostic) -> RenderResult {
    extract(diag).map(|facts| {
        let colors = ctx.colors();
        let lh = ctx.config.line_height;
        let a = ctx.config.arrow_size;
        let line = facts.line;
        let mut image = svg_with_canvas(ctx.config, ctx.shift_px(line, line + 1), 2);

        let mut d = PathBuilder::new();
        d.move_to(0.0, lh / 2.0)
            .line_by(10.0, 0.0)
            .line_by(0.0, lh * 1.5)
            .line_by(-a / 2.0, -a)
            .move_by(a / 2.0, a)
            .line_by(a / 2.0, -a);

        let mut painter = Painter::new(&mut image.canvas, ctx.config, line);
        painter.path(d.build(), &colors.error);
        painter.text(
            line,
            TEXT_X,
            &format!(
                "the closure borrows `{}`, which only lives in the current function",
                facts.borrowed
            ),
            &colors.info,
        );
        painter.text(
            line + 1,
            TEXT_X,
            "but the closure needs to live after the function returns",
            &colors.error,
        );
        RenderSuccess { image, line }
    })
}
