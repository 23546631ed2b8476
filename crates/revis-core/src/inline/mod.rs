//! Inline suggestions: small in-place hints with a one-click fix, used instead of a full
//! visualization for errors whose fix is mechanical.

pub mod e0308;

use crate::diagnostics::{Diagnostic, DiagnosticRange, Position};
use crate::handler::HandlerResult;
use crate::host::{DecorationHost, DecorationOptions, DecorationTypeId, DecorationTypeOptions};
use crate::line_index::{LineIndex, LineSource};
use std::collections::BTreeMap;

/// An edit offered by an inline hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuickFix {
    /// Insert `text` at `(line, character)`.
    InsertText {
        /// Line (0-indexed).
        line: usize,
        /// Character offset (0-indexed).
        character: usize,
        /// Text to insert.
        text: String,
    },
}

impl QuickFix {
    /// Apply the edit to `document`. Returns `false` if the target position no longer exists.
    pub fn apply(&self, document: &mut LineIndex) -> bool {
        match self {
            Self::InsertText {
                line,
                character,
                text,
            } => document.insert(Position::new(*line, *character), text),
        }
    }
}

/// One inline hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineHint {
    /// Decorated range; hovering anywhere over it shows the hint.
    pub range: DiagnosticRange,
    /// Hover text.
    pub hover_message: String,
    /// The edit accepted by clicking the hint.
    pub fix: QuickFix,
}

impl InlineHint {
    fn to_decoration(&self) -> DecorationOptions {
        DecorationOptions {
            range: self.range,
            render_options: None,
            hover_message: Some(self.hover_message.clone()),
        }
    }
}

/// Result of an inline-suggestion handler.
pub type InlineResult = HandlerResult<Vec<InlineHint>>;

/// A per-code inline-suggestion handler.
pub type InlineSuggestionFn = fn(&dyn LineSource, &Diagnostic) -> InlineResult;

/// Maps error codes to inline-suggestion handlers.
#[derive(Clone)]
pub struct InlineRegistry {
    handlers: BTreeMap<&'static str, InlineSuggestionFn>,
}

impl InlineRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// Registry with every built-in handler.
    pub fn builtin() -> Self {
        Self::empty().with("E0308", e0308::autoderef)
    }

    /// Add (or replace) a handler.
    pub fn with(mut self, code: &'static str, handler: InlineSuggestionFn) -> Self {
        self.handlers.insert(code, handler);
        self
    }

    /// Handler for `code`.
    pub fn get(&self, code: &str) -> Option<InlineSuggestionFn> {
        self.handlers.get(code).copied()
    }

    /// `true` if `code` has a handler.
    pub fn contains(&self, code: &str) -> bool {
        self.handlers.contains_key(code)
    }

    /// Registered codes, in order.
    pub fn codes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }

    /// `true` if `diag` is handled inline.
    pub fn handles(&self, diag: &Diagnostic) -> bool {
        diag.code_str().is_some_and(|code| self.contains(code))
    }
}

impl Default for InlineRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for InlineRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}

/// Decoration type shared by every inline hint.
pub fn inline_hint_type_options() -> DecorationTypeOptions {
    DecorationTypeOptions::InlineBefore {
        content: "*".to_string(),
        color: "#ff0000".to_string(),
        background: "#eddddd".to_string(),
    }
}

/// Owner of the inline-hint decoration type.
#[derive(Debug, Default)]
pub struct InlineSuggestions {
    decoration_type: Option<DecorationTypeId>,
    hints: Vec<InlineHint>,
}

impl InlineSuggestions {
    /// No hints, no decoration type yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hints currently applied.
    pub fn hints(&self) -> &[InlineHint] {
        &self.hints
    }

    /// Run every applicable handler over `diagnostics` and replace the applied hints with the
    /// results. Unsuccessful handlers are skipped.
    pub fn show(
        &mut self,
        host: &mut dyn DecorationHost,
        registry: &InlineRegistry,
        document: &dyn LineSource,
        diagnostics: &[Diagnostic],
    ) -> &[InlineHint] {
        let mut hints = Vec::new();
        for diag in diagnostics {
            let Some(handler) = diag.code_str().and_then(|code| registry.get(code)) else {
                continue;
            };
            match handler(document, diag) {
                HandlerResult::Success(found) => hints.extend(found),
                other => {
                    tracing::debug!(context = ?other.context(), "inline suggestion skipped");
                }
            }
        }

        let ty = *self
            .decoration_type
            .get_or_insert_with(|| host.create_decoration_type(inline_hint_type_options()));
        host.set_decorations(ty, hints.iter().map(InlineHint::to_decoration).collect());
        self.hints = hints;
        &self.hints
    }

    /// Release the decoration type.
    pub fn dispose(&mut self, host: &mut dyn DecorationHost) {
        if let Some(ty) = self.decoration_type.take() {
            host.dispose_decoration_type(ty);
        }
        self.hints.clear();
    }
}
