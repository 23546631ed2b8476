//! Drawing primitives for visualizations.
//!
//! Every primitive works in editor-line coordinates relative to a `baseline` line: the topmost
//! line covered by the image. Line `baseline` maps to y = 0, line `baseline + 1` to one line
//! height below, and so on. Primitives only append nodes to an existing canvas.

use crate::config::VizConfig;
use crate::svg::{Group, Paint, PathBuilder};

/// Left edge of the label text of a pointer / arrowed region, in px.
const TEXT_X_ARROWED: f64 = 30.0;
/// Left edge of label and tip text when no text arrow is drawn, in px.
pub const TEXT_X: f64 = 20.0;

/// An elbowed connector from one line to a label.
#[derive(Debug, Clone, Copy)]
pub struct Pointer<'t> {
    /// The line being annotated.
    pub line: usize,
    /// The line the label is written on.
    pub text_line: usize,
    /// Where on `line` the connector starts: 0 = top, 0.5 = middle, 1 = bottom.
    pub offset: f64,
    /// Label text.
    pub text: &'t str,
    /// Stroke and text color.
    pub color: &'t str,
}

/// End-cap options of a region bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionOptions {
    /// Draw an arrow from the bracket to the label.
    pub text_arrow: bool,
    /// Omit the horizontal tick at the top of the bracket.
    pub from_open: bool,
    /// Cap the top of the bracket with an arrowhead.
    pub from_arrow: bool,
    /// Omit the horizontal tick at the bottom of the bracket.
    pub to_open: bool,
    /// Cap the bottom of the bracket with an arrowhead.
    pub to_arrow: bool,
}

impl Default for RegionOptions {
    fn default() -> Self {
        Self {
            text_arrow: true,
            from_open: false,
            from_arrow: false,
            to_open: false,
            to_arrow: false,
        }
    }
}

/// A vertical bracket over lines `from..=to` plus a label.
#[derive(Debug, Clone, Copy)]
pub struct Region<'t> {
    /// First bracketed line.
    pub from: usize,
    /// Last bracketed line (inclusive).
    pub to: usize,
    /// The line the label is written on.
    pub text_line: usize,
    /// Label text.
    pub text: &'t str,
    /// Stroke and text color.
    pub color: &'t str,
    /// End caps.
    pub options: RegionOptions,
}

/// Draws onto a canvas group relative to a baseline line.
pub struct Painter<'a> {
    canvas: &'a mut Group,
    config: &'a VizConfig,
    baseline: usize,
}

impl<'a> Painter<'a> {
    /// A painter for `canvas` whose y = 0 is line `baseline`.
    pub fn new(canvas: &'a mut Group, config: &'a VizConfig, baseline: usize) -> Self {
        Self {
            canvas,
            config,
            baseline,
        }
    }

    /// The baseline line.
    pub fn baseline(&self) -> usize {
        self.baseline
    }

    fn row(&self, line: usize) -> f64 {
        line as f64 - self.baseline as f64
    }

    fn text_y(&self, line: usize) -> f64 {
        self.config.font_size + self.config.line_height * self.row(line)
    }

    /// Write `text` on `line`, starting `x` px from the canvas left edge.
    pub fn text(&mut self, line: usize, x: f64, text: &str, color: &str) {
        let y = self.text_y(line);
        self.canvas
            .text(text, color, x, y, self.config.line_height);
    }

    /// Write a tip / free-standing label on `line`.
    pub fn tip(&mut self, line: usize, text: &str, color: &str) {
        self.text(line, TEXT_X, text, color);
    }

    /// Raw path in canvas coordinates.
    pub fn path(&mut self, d: String, color: &str) {
        self.canvas.path(d, Paint::Stroke(color.to_string()));
    }

    /// Draw an elbowed connector from `pointer.line` down (or up) to `pointer.text_line`, capped
    /// with a right-pointing arrowhead before the label.
    pub fn pointer_text(&mut self, pointer: Pointer<'_>) {
        let lh = self.config.line_height;
        let a = self.config.arrow_size;
        let start_y = (self.row(pointer.line) + pointer.offset) * lh;
        let drop = (pointer.text_line as f64 - pointer.line as f64 - pointer.offset + 0.5) * lh;

        let mut d = PathBuilder::new();
        d.move_to(0.0, start_y)
            .line_by(15.0, 0.0)
            .line_by(0.0, drop)
            .line_by(10.0, 0.0)
            .line_by(-a, -a / 2.0)
            .move_by(a, a / 2.0)
            .line_by(-a, a / 2.0);
        self.path(d.build(), pointer.color);
        self.text(pointer.text_line, TEXT_X_ARROWED, pointer.text, pointer.color);
    }

    /// Draw a bracket over `region.from..=region.to` with a label on `region.text_line`.
    pub fn region_text(&mut self, region: Region<'_>) {
        let lh = self.config.line_height;
        let a = self.config.arrow_size;
        let opts = region.options;
        let top = self.row(region.from) * lh;
        let bottom = (self.row(region.to) + 1.0) * lh;
        let span = (region.to as f64 - region.from as f64 + 1.0) * lh;

        let mut bracket = PathBuilder::new();
        bracket.move_to(0.0, top);
        if opts.from_open {
            bracket.move_by(10.0, 0.0);
        } else {
            bracket.line_by(10.0, 0.0);
        }
        bracket.line_by(0.0, span);
        if opts.to_open {
            bracket.move_by(-10.0, 0.0);
        } else {
            bracket.line_by(-10.0, 0.0);
        }
        self.path(bracket.build(), region.color);

        if opts.text_arrow {
            let mut arrow = PathBuilder::new();
            arrow
                .move_to(10.0, (0.5 + self.row(region.text_line)) * lh)
                .line_by(10.0, 0.0)
                .line_by(-a, -a / 2.0)
                .move_by(a, a / 2.0)
                .line_by(-a, a / 2.0);
            self.path(arrow.build(), region.color);
        }

        if opts.from_arrow {
            let mut cap = PathBuilder::new();
            if opts.from_open {
                cap.move_to(10.0, top);
                arrow_up(&mut cap, a);
            } else {
                cap.move_to(0.0, top);
                arrow_left(&mut cap, a);
            }
            self.path(cap.build(), region.color);
        }
        if opts.to_arrow {
            let mut cap = PathBuilder::new();
            if opts.to_open {
                cap.move_to(10.0, bottom);
                arrow_down(&mut cap, a);
            } else {
                cap.move_to(0.0, bottom);
                arrow_left(&mut cap, a);
            }
            self.path(cap.build(), region.color);
        }

        let x = if opts.text_arrow {
            TEXT_X_ARROWED
        } else {
            TEXT_X
        };
        self.text(region.text_line, x, region.text, region.color);
    }
}

fn arrow_left(d: &mut PathBuilder, a: f64) {
    d.line_by(a, -a / 2.0)
        .move_by(-a, a / 2.0)
        .line_by(a, a / 2.0);
}

fn arrow_up(d: &mut PathBuilder, a: f64) {
    d.line_by(-a / 2.0, a)
        .move_by(a / 2.0, -a)
        .line_by(a / 2.0, a);
}

fn arrow_down(d: &mut PathBuilder, a: f64) {
    d.line_by(-a / 2.0, -a)
        .move_by(a / 2.0, a)
        .line_by(a / 2.0, -a);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::SvgNode;
    use pretty_assertions::assert_eq;

    fn paths(group: &Group) -> Vec<String> {
        group
            .children()
            .iter()
            .filter_map(|n| match n {
                SvgNode::Path { d, .. } => Some(d.clone()),
                SvgNode::Text { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_pointer_text_geometry() {
        let config = VizConfig::default();
        let mut canvas = Group::new();
        Painter::new(&mut canvas, &config, 3).pointer_text(Pointer {
            line: 5,
            text_line: 6,
            offset: 0.5,
            text: "here",
            color: "#F44747",
        });
        // (5 - 3 + 0.5) * 19 = 47.5, drop (6 - 5 - 0.5 + 0.5) * 19 = 19
        assert_eq!(
            paths(&canvas),
            vec!["M0,47.5 l15,0 l0,19 l10,0 l-6,-3 m6,3 l-6,3".to_string()]
        );
        match &canvas.children()[1] {
            SvgNode::Text { x, y, lines, .. } => {
                assert_eq!(*x, 30.0);
                assert_eq!(*y, 14.0 + 19.0 * 3.0);
                assert_eq!(lines, &vec!["here".to_string()]);
            }
            other => panic!("unexpected node: {other:?}"),
        }
    }

    #[test]
    fn test_open_region_with_closing_arrow() {
        let config = VizConfig::default();
        let mut canvas = Group::new();
        Painter::new(&mut canvas, &config, 2).region_text(Region {
            from: 2,
            to: 4,
            text_line: 4,
            text: "until here",
            color: "#6796E6",
            options: RegionOptions {
                text_arrow: false,
                from_open: true,
                to_arrow: true,
                ..RegionOptions::default()
            },
        });
        assert_eq!(
            paths(&canvas),
            vec![
                "M0,0 m10,0 l0,57 l-10,0".to_string(),
                "M0,57 l6,-3 m-6,3 l6,3".to_string(),
            ]
        );
        match canvas.children().last() {
            Some(SvgNode::Text { x, .. }) => assert_eq!(*x, 20.0),
            other => panic!("unexpected node: {other:?}"),
        }
    }
}
