//! Per-error-code visualizations.
//!
//! Each submodule owns exactly one error code. It pattern-matches the diagnostic's message and
//! related information into the facts it needs (which identifier, which lines), then draws an
//! image with the [`crate::canvas`] primitives. When the wording does not match, the extractor
//! returns [`HandlerResult::Inapplicable`]; a change in compiler wording therefore only ever
//! disables one code.

mod conflict;
pub mod e0373;
pub mod e0382;
pub mod e0499;
pub mod e0502;
pub mod e0503;
pub mod e0505;
pub mod e0506;
pub mod e0597;

pub use conflict::{Conflict, region_point_conflict};

use crate::config::{ColorTheme, ThemeName, VizConfig};
use crate::diagnostics::Diagnostic;
use crate::geometry::horizontal_shift;
use crate::handler::HandlerResult;
use crate::line_index::LineSource;
use crate::svg::Svg;
use std::collections::BTreeMap;

/// Inputs shared by every renderer call.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    /// The document the diagnostic belongs to.
    pub document: &'a dyn LineSource,
    /// Geometry and palette.
    pub config: &'a VizConfig,
    /// Theme being rendered.
    pub theme: ThemeName,
}

impl<'a> RenderContext<'a> {
    /// Create a context.
    pub fn new(document: &'a dyn LineSource, config: &'a VizConfig, theme: ThemeName) -> Self {
        Self {
            document,
            config,
            theme,
        }
    }

    /// Colors of the current theme.
    pub fn colors(&self) -> &'a ColorTheme {
        self.config.colors(self.theme)
    }

    /// Horizontal shift in px that lets an image anchored at `from` clear every line up to `to`.
    pub fn shift_px(&self, from: usize, to: usize) -> f64 {
        horizontal_shift(self.document, from, to) as f64 * self.config.char_width
    }
}

/// A rendered image and the line it must be attached to.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSuccess {
    /// The image.
    pub image: Svg,
    /// Topmost line covered by the image; the decoration anchors here.
    pub line: usize,
}

/// Result of a renderer.
pub type RenderResult = HandlerResult<RenderSuccess>;

/// A per-code renderer.
pub type RenderFn = fn(&RenderContext<'_>, &Diagnostic) -> RenderResult;

/// Maps error codes to their renderers.
///
/// Built once at startup and shared by reference; never mutated afterwards.
#[derive(Clone)]
pub struct ErrorvizRegistry {
    renderers: BTreeMap<&'static str, RenderFn>,
}

impl ErrorvizRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self {
            renderers: BTreeMap::new(),
        }
    }

    /// Registry with a renderer for every supported borrow-checker error.
    pub fn builtin() -> Self {
        Self::empty()
            .with("E0373", e0373::render)
            .with("E0382", e0382::render)
            .with("E0499", e0499::render)
            .with("E0502", e0502::render)
            .with("E0503", e0503::render)
            .with("E0505", e0505::render)
            .with("E0506", e0506::render)
            .with("E0597", e0597::render)
    }

    /// Add (or replace) a renderer.
    pub fn with(mut self, code: &'static str, render: RenderFn) -> Self {
        self.renderers.insert(code, render);
        self
    }

    /// Renderer for `code`.
    pub fn get(&self, code: &str) -> Option<RenderFn> {
        self.renderers.get(code).copied()
    }

    /// `true` if `code` has a renderer.
    pub fn contains(&self, code: &str) -> bool {
        self.renderers.contains_key(code)
    }

    /// Registered codes, in order.
    pub fn codes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.renderers.keys().copied()
    }
}

impl Default for ErrorvizRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for ErrorvizRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.renderers.keys()).finish()
    }
}

/// Start line of the related entry ending with `from_suffix` and end line of the one ending with
/// `to_suffix`; `None` unless both exist.
pub(crate) fn related_region(
    diag: &Diagnostic,
    from_suffix: &str,
    to_suffix: &str,
) -> Option<(usize, usize)> {
    let from = diag.related_ending_with(from_suffix)?.range.start.line;
    let to = diag.related_ending_with(to_suffix)?.range.end.line;
    Some((from, to))
}

/// Shared inapplicable context for a message that did not match.
pub(crate) const CANNOT_PARSE: &str = "cannot parse diagnostics";
/// Shared inapplicable context for missing related information.
pub(crate) const CANNOT_PARSE_RELATED: &str = "cannot parse related diagnostics";
