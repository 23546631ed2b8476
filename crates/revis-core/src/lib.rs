#![warn(missing_docs)]
//! Revis Core - headless borrow-checker error visualizations
//!
//! # Overview
//!
//! `revis-core` turns compiler diagnostics into small per-line SVG drawings that explain an
//! error in place: which lines hold a borrow, where the conflicting use is, and a short tip. It
//! does not draw into an editor itself; the host implements [`DecorationHost`] and receives
//! ready-made decorations (two `data:` URIs per visualization, one per color theme).
//!
//! # Data Flow
//!
//! ```text
//! diagnostics changed ─► VizSession (debounce) ─► VizStore::rebuild
//!                                                   │
//!            ErrorvizRegistry ◄── code ─────────────┤
//!                  │                                │
//!        extractor (regex + related info)           ▼
//!                  │                       gutter triangles / inline hints
//!        canvas primitives ─► Svg ─► data URI ─► DecorationHost
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use revis_core::{
//!     Diagnostic, DiagnosticRange, HeadlessHost, LineIndex, LineToggle, SessionOptions,
//!     ToggleOutcome, VizConfig, VizSession,
//! };
//!
//! let document = LineIndex::from_text(
//!     "fn main() {\n    let mut x = 1;\n    let r = &x;\n    x += 1;\n    println!(\"{r}\");\n}\n",
//! );
//! let diag = Diagnostic::rustc_error(
//!     "E0506",
//!     "cannot assign to `x` because it is borrowed",
//!     DiagnosticRange::on_line(3, 4, 10),
//! )
//! .with_related("`x` is borrowed here", DiagnosticRange::on_line(2, 12, 14))
//! .with_related("borrow later used here", DiagnosticRange::on_line(4, 14, 17));
//!
//! let mut host = HeadlessHost::new();
//! let mut session = VizSession::new(VizConfig::default(), SessionOptions::default());
//! session
//!     .update_interventions(&mut host, "rust", &document, &[diag])
//!     .unwrap();
//!
//! match session.toggle_at_line(&mut host, &document, 3) {
//!     LineToggle::Toggled(key, outcome) => {
//!         assert_eq!(key.to_string(), "3_E0506");
//!         assert_eq!(outcome, ToggleOutcome::Shown);
//!     }
//!     other => panic!("unexpected: {other:?}"),
//! }
//! assert_eq!(host.visible_visualizations().len(), 1);
//! ```
//!
//! # Module Description
//!
//! - [`diagnostics`] - diagnostic data model consumed from the host
//! - [`line_index`] - line access and measurement of the current document
//! - [`geometry`] - line ranges, extents and horizontal shift
//! - [`svg`] / [`canvas`] - SVG model and the pointer / region drawing primitives
//! - [`errorviz`] - one extractor + renderer per supported error code
//! - [`inline`] - inline suggestions (E0308 autoderef)
//! - [`store`] - per-diagnostic show/hide state
//! - [`session`] - debounced driver

pub mod canvas;
pub mod config;
pub mod diagnostics;
mod error;
pub mod errorviz;
pub mod geometry;
pub mod handler;
pub mod host;
pub mod image;
pub mod inline;
pub mod interventions;
pub mod line_index;
pub mod session;
pub mod store;
pub mod svg;
pub mod triangle;

pub use config::{ColorTheme, Palette, ThemeName, VizConfig};
pub use diagnostics::{
    CodeValue, Diagnostic, DiagnosticCode, DiagnosticRange, DiagnosticSeverity, Position,
    RelatedInformation,
};
pub use error::VizError;
pub use errorviz::{ErrorvizRegistry, RenderContext, RenderResult, RenderSuccess};
pub use handler::HandlerResult;
pub use host::{
    DecorationHost, DecorationOptions, DecorationTypeId, DecorationTypeOptions, HeadlessHost,
};
pub use image::{image_by_code, svg_to_data_uri};
pub use inline::{InlineHint, InlineRegistry, QuickFix};
pub use interventions::Interventions;
pub use line_index::{LineIndex, LineSource};
pub use session::{LineToggle, SessionOptions, VizSession};
pub use store::{DiagnosticEntry, DiagnosticKey, RenderEnv, ToggleOutcome, VizStore};
pub use svg::Svg;
