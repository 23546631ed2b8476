//! The boundary between the engine and the editor that displays its output.
//!
//! The engine never draws into an editor view itself. It creates *decoration types* (a styling
//! recipe, e.g. "whole line, with this gutter icon") through a [`DecorationHost`], and then sets
//! the list of ranges each type is applied to. Setting an empty list clears the type; disposing
//! it releases the host resource.
//!
//! [`HeadlessHost`] is an in-memory implementation that records every call, used by the demo
//! binary and by tests that check for leaked decorations.

use crate::diagnostics::DiagnosticRange;
use std::collections::BTreeMap;
use std::fmt;

/// Handle of a decoration type created by a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DecorationTypeId(pub u32);

impl fmt::Display for DecorationTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dectype#{}", self.0)
    }
}

/// How a decoration type renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecorationTypeOptions {
    /// Applies to whole lines; per-decoration render options carry the content.
    WholeLine,
    /// Whole-line type showing an icon in the gutter.
    GutterIcon {
        /// Icon image, as a URI.
        icon_uri: String,
    },
    /// Virtual text rendered before each decorated range.
    InlineBefore {
        /// Text to insert.
        content: String,
        /// Text color.
        color: String,
        /// Background color.
        background: String,
    },
}

/// An image attached after the end of a decorated line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AfterAttachment {
    /// Image, as a URI.
    pub content_icon_uri: String,
    /// CSS-like vertical alignment of the image relative to the line.
    pub vertical_align: String,
}

/// Per-theme render options of a single decoration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemedRenderOptions {
    /// Used by light color themes.
    pub light: AfterAttachment,
    /// Used by dark color themes.
    pub dark: AfterAttachment,
}

/// A single decoration: where it goes and what it adds on top of its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationOptions {
    /// Anchor range.
    pub range: DiagnosticRange,
    /// Optional themed attachments.
    pub render_options: Option<ThemedRenderOptions>,
    /// Optional hover text (plain text; markup is host-defined).
    pub hover_message: Option<String>,
}

impl DecorationOptions {
    /// A bare decoration over `range`.
    pub fn at(range: DiagnosticRange) -> Self {
        Self {
            range,
            render_options: None,
            hover_message: None,
        }
    }
}

/// Operations the engine needs from the editor.
pub trait DecorationHost {
    /// Create a decoration type and return its handle.
    fn create_decoration_type(&mut self, options: DecorationTypeOptions) -> DecorationTypeId;

    /// Replace the decorations of `ty`. An empty list clears it.
    fn set_decorations(&mut self, ty: DecorationTypeId, decorations: Vec<DecorationOptions>);

    /// Release `ty`; its decorations disappear.
    fn dispose_decoration_type(&mut self, ty: DecorationTypeId);

    /// Show a non-blocking error message to the user.
    fn show_error_message(&mut self, message: &str);
}

/// State of one decoration type inside a [`HeadlessHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessDecorationType {
    /// Creation options.
    pub options: DecorationTypeOptions,
    /// Currently applied decorations.
    pub decorations: Vec<DecorationOptions>,
    /// Whether the type was disposed.
    pub disposed: bool,
}

/// In-memory [`DecorationHost`].
#[derive(Debug, Default)]
pub struct HeadlessHost {
    next_id: u32,
    types: BTreeMap<DecorationTypeId, HeadlessDecorationType>,
    error_messages: Vec<String>,
    set_calls: usize,
}

impl HeadlessHost {
    /// An empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// State of `ty`, disposed or not.
    pub fn decoration_type(&self, ty: DecorationTypeId) -> Option<&HeadlessDecorationType> {
        self.types.get(&ty)
    }

    /// Decorations currently applied with `ty` (empty for unknown or disposed types).
    pub fn decorations(&self, ty: DecorationTypeId) -> &[DecorationOptions] {
        match self.types.get(&ty) {
            Some(state) if !state.disposed => &state.decorations,
            _ => &[],
        }
    }

    /// Handles of every type that has not been disposed.
    pub fn live_types(&self) -> Vec<DecorationTypeId> {
        self.types
            .iter()
            .filter(|(_, state)| !state.disposed)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Live whole-line types that currently carry decorations, i.e. visible visualizations.
    pub fn visible_visualizations(&self) -> Vec<DecorationTypeId> {
        self.types
            .iter()
            .filter(|(_, state)| {
                !state.disposed
                    && state.options == DecorationTypeOptions::WholeLine
                    && !state.decorations.is_empty()
            })
            .map(|(id, _)| *id)
            .collect()
    }

    /// Number of types ever created.
    pub fn created_count(&self) -> usize {
        self.types.len()
    }

    /// Number of `set_decorations` calls received.
    pub fn set_calls(&self) -> usize {
        self.set_calls
    }

    /// Error messages shown so far.
    pub fn error_messages(&self) -> &[String] {
        &self.error_messages
    }
}

impl DecorationHost for HeadlessHost {
    fn create_decoration_type(&mut self, options: DecorationTypeOptions) -> DecorationTypeId {
        self.next_id += 1;
        let id = DecorationTypeId(self.next_id);
        self.types.insert(
            id,
            HeadlessDecorationType {
                options,
                decorations: Vec::new(),
                disposed: false,
            },
        );
        id
    }

    fn set_decorations(&mut self, ty: DecorationTypeId, decorations: Vec<DecorationOptions>) {
        self.set_calls += 1;
        match self.types.get_mut(&ty) {
            Some(state) if !state.disposed => state.decorations = decorations,
            Some(_) => tracing::warn!(%ty, "set_decorations on a disposed decoration type"),
            None => tracing::warn!(%ty, "set_decorations on an unknown decoration type"),
        }
    }

    fn dispose_decoration_type(&mut self, ty: DecorationTypeId) {
        if let Some(state) = self.types.get_mut(&ty) {
            state.disposed = true;
            state.decorations.clear();
        }
    }

    fn show_error_message(&mut self, message: &str) {
        self.error_messages.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispose_clears_and_hides_type() {
        let mut host = HeadlessHost::new();
        let ty = host.create_decoration_type(DecorationTypeOptions::WholeLine);
        host.set_decorations(ty, vec![DecorationOptions::at(DiagnosticRange::line_start(2))]);
        assert_eq!(host.visible_visualizations(), vec![ty]);

        host.dispose_decoration_type(ty);
        assert!(host.decorations(ty).is_empty());
        assert!(host.live_types().is_empty());
        assert_eq!(host.created_count(), 1);

        // Late sets on a disposed type are ignored.
        host.set_decorations(ty, vec![DecorationOptions::at(DiagnosticRange::line_start(2))]);
        assert!(host.decorations(ty).is_empty());
    }
}
