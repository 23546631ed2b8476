//! The region + conflicting point + tip composite used by most borrow errors.

use super::{RenderContext, RenderSuccess};
use crate::canvas::{Painter, Pointer, Region, RegionOptions};
use crate::geometry::minmax;
use crate::svg::svg_with_canvas;

/// Lines and labels of a region-point-conflict drawing. Lines are 0-indexed.
#[derive(Debug, Clone, Copy)]
pub struct Conflict<'t> {
    /// First line of the region (e.g. where the borrow starts).
    pub from: usize,
    /// Last line of the region (e.g. where the borrow is last used).
    pub to: usize,
    /// The conflicting line.
    pub error_line: usize,
    /// Line the tip is written on.
    pub tip_line: usize,
    /// Label of the region.
    pub region_text: &'t str,
    /// Label of the conflicting point.
    pub point_text: &'t str,
    /// Tip text.
    pub tip: &'t str,
}

/// Draw a region over `from..=to`, a pointer to `error_line` and a tip line.
///
/// The error label goes on the error line, except when the error line is the region's first
/// line (whose row already carries the region label): then it moves one line down. If the
/// region is a single line, that extra line lies outside the region and the image grows by one
/// line to hold it.
///
/// The returned image is anchored at the topmost referenced line; callers that add more
/// drawings must use that line as their baseline.
pub fn region_point_conflict(ctx: &RenderContext<'_>, conflict: Conflict<'_>) -> RenderSuccess {
    let colors = ctx.colors();

    let mut error_text_line = conflict.error_line;
    if error_text_line == conflict.from {
        if conflict.to > conflict.from {
            error_text_line += 1;
        } else {
            tracing::warn!(
                line = conflict.from,
                "no where to put error text, extending the image by one line"
            );
            error_text_line = conflict.from + 1;
        }
    }

    let (top, bottom) = minmax(&[
        conflict.from,
        conflict.to,
        conflict.error_line,
        conflict.tip_line,
        error_text_line,
    ]);
    let mut image = svg_with_canvas(ctx.config, ctx.shift_px(top, bottom), bottom - top + 2);

    let mut painter = Painter::new(&mut image.canvas, ctx.config, top);
    painter.region_text(Region {
        from: conflict.from,
        to: conflict.to,
        text_line: conflict.from,
        text: conflict.region_text,
        color: &colors.info,
        options: RegionOptions::default(),
    });
    painter.pointer_text(Pointer {
        line: conflict.error_line,
        text_line: error_text_line,
        offset: 0.5,
        text: conflict.point_text,
        color: &colors.error,
    });
    painter.tip(conflict.tip_line, conflict.tip, &colors.tip);

    RenderSuccess { image, line: top }
}
