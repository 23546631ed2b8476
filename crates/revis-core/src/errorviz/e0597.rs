//! E0597: `x` does not live long enough.
//!
//! The compiler reports three shapes of this error, told apart by the related information:
//! a named borrower used after the drop, a borrow that *might* be used later (e.g. by a
//! destructor), and a borrow required to be `'static`.

use super::{
    CANNOT_PARSE, Conflict, RenderContext, RenderResult, RenderSuccess, region_point_conflict,
};
use crate::canvas::{Painter, Pointer, Region, RegionOptions};
use crate::diagnostics::{Diagnostic, DiagnosticRange};
use crate::geometry::minmax;
use crate::handler::HandlerResult;
use crate::line_index::slice_line;
use crate::svg::svg_with_canvas;
use regex::Regex;
use std::sync::LazyLock;

static SHORT_LIVED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`(.+)` does not live long enough").expect("valid E0597 regex"));

/// How the dropped value is still needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaterUse {
    /// A borrower is used (or stored) after the drop; the range covers the borrower.
    Used(DiagnosticRange),
    /// The borrow might be used later; carries the compiler's explanation.
    MightUse {
        /// Line of the possible use.
        line: usize,
        /// The related message, shown verbatim.
        message: String,
    },
    /// The borrow is required to live for `'static`; carries the line that requires it.
    Static(usize),
}

/// What an E0597 diagnostic says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLived {
    /// The value that does not live long enough.
    pub borrowed: String,
    /// Line where the value is borrowed.
    pub valid_from: usize,
    /// Line where the value is dropped.
    pub valid_to: usize,
    /// How the borrow outlives the value.
    pub later: LaterUse,
}

/// Parse an E0597 diagnostic.
pub fn extract(diag: &Diagnostic) -> HandlerResult<ShortLived> {
    let Some(caps) = SHORT_LIVED_RE.captures(&diag.message) else {
        return HandlerResult::inapplicable(CANNOT_PARSE);
    };
    let Some(valid_to) = diag
        .related_ending_with("dropped here while still borrowed")
        .map(|info| info.range.end.line)
    else {
        return HandlerResult::inapplicable(CANNOT_PARSE);
    };

    let later_use = diag.related_information.iter().find(|info| {
        info.message.ends_with("borrow later used here")
            || info.message.ends_with("borrow later stored here")
    });
    let later = if let Some(info) = later_use {
        LaterUse::Used(info.range)
    } else if let Some(info) = diag.related_starting_with("borrow might be used here,") {
        LaterUse::MightUse {
            line: info.range.start.line,
            message: info.message.clone(),
        }
    } else if let Some(info) = diag.related_ending_with(" is borrowed for `'static`") {
        LaterUse::Static(info.range.end.line)
    } else {
        return HandlerResult::inapplicable(CANNOT_PARSE);
    };

    HandlerResult::Success(ShortLived {
        borrowed: caps[1].to_string(),
        valid_from: diag.line(),
        valid_to,
        later,
    })
}

/// Render an E0597 diagnostic.
pub fn render(ctx: &RenderContext<'_>, diag: &Diagnostic) -> RenderResult {
    extract(diag).and_then(|facts| match &facts.later {
        LaterUse::Used(range) => used_after_drop(ctx, &facts, *range),
        LaterUse::MightUse { line, message } => {
            HandlerResult::Success(might_use(ctx, &facts, *line, message))
        }
        LaterUse::Static(line) => HandlerResult::Success(needs_static(ctx, &facts, *line)),
    })
}

fn used_after_drop(
    ctx: &RenderContext<'_>,
    facts: &ShortLived,
    borrower: DiagnosticRange,
) -> RenderResult {
    if borrower.start.line != borrower.end.line {
        tracing::warn!(
            from = borrower.start.line,
            to = borrower.end.line,
            "borrower spans multiple lines"
        );
    }
    let later_use = borrower.end.line;
    let Some(user) = slice_line(
        ctx.document,
        later_use,
        borrower.start.character,
        borrower.end.character,
    ) else {
        return HandlerResult::failed(format!("line {later_use} is not in the document"));
    };

    let b = &facts.borrowed;
    let (_, last) = minmax(&[facts.valid_from, facts.valid_to, later_use]);
    HandlerResult::Success(region_point_conflict(
        ctx,
        Conflict {
            from: facts.valid_from,
            to: facts.valid_to,
            error_line: later_use,
            tip_line: last + 1,
            region_text: &format!("`{user}` borrows from `{b}` and can only be used in this region"),
            point_text: &format!("`{b}` is no longer valid, while `{user}` is still borrowing it"),
            tip: &format!("tip: make sure `{user}` borrows from a valid value"),
        },
    ))
}

fn might_use(
    ctx: &RenderContext<'_>,
    facts: &ShortLived,
    line: usize,
    message: &str,
) -> RenderSuccess {
    let colors = ctx.colors();
    let (top, bottom) = minmax(&[facts.valid_from, facts.valid_to, line, line + 1]);
    let mut image = svg_with_canvas(ctx.config, ctx.shift_px(top, bottom), bottom - top + 2);

    let mut painter = Painter::new(&mut image.canvas, ctx.config, top);
    painter.region_text(Region {
        from: facts.valid_from,
        to: facts.valid_to,
        text_line: facts.valid_to,
        text: &format!("`{}` can only be used until this point", facts.borrowed),
        color: &colors.info,
        options: RegionOptions {
            text_arrow: false,
            from_open: true,
            to_arrow: true,
            ..RegionOptions::default()
        },
    });
    painter.pointer_text(Pointer {
        line,
        text_line: line,
        offset: 0.5,
        text: message,
        color: &colors.error,
    });

    RenderSuccess { image, line: top }
}

fn needs_static(ctx: &RenderContext<'_>, facts: &ShortLived, line: usize) -> RenderSuccess {
    let colors = ctx.colors();
    let b = &facts.borrowed;
    let (top, bottom) = minmax(&[line, facts.valid_from, facts.valid_to]);
    let mut image = svg_with_canvas(ctx.config, ctx.shift_px(top, bottom), bottom - top + 2);

    let mut painter = Painter::new(&mut image.canvas, ctx.config, top);
    painter.pointer_text(Pointer {
        line: facts.valid_to,
        text_line: facts.valid_to,
        offset: 0.5,
        text: &format!("lifetime of `{b}` ends here"),
        color: &colors.info,
    });
    painter.pointer_text(Pointer {
        line,
        text_line: line,
        offset: 0.5,
        text: &format!("`{b}` is required to have static lifetime"),
        color: &colors.error,
    });

    RenderSuccess { image, line: top }
}
