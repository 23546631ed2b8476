//! Per-diagnostic visualization state and the show/hide/toggle engine.
//!
//! The store keys tracked diagnostics by `(line, code)`. Each entry owns its decoration type,
//! created on first show, cleared on hide and disposed when the entry is discarded. At most one
//! entry is displayed at any time: showing an entry hides every other one first.
//!
//! The map is never patched. Each diagnostics change rebuilds it, and entries that were displayed
//! under the same key before the rebuild are shown again afterwards.

use crate::config::VizConfig;
use crate::diagnostics::{Diagnostic, DiagnosticRange};
use crate::error::VizError;
use crate::handler::HandlerResult;
use crate::host::{DecorationHost, DecorationOptions, DecorationTypeId, DecorationTypeOptions};
use crate::image::{image_by_code, svg_to_data_uri};
use crate::interventions::Interventions;
use crate::line_index::LineSource;
use crate::triangle::{triangle_available, triangle_shown};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Identifies a tracked diagnostic: the line it starts on and its code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DiagnosticKey {
    /// Start line of the primary range.
    pub line: usize,
    /// Error code, e.g. `"E0502"`.
    pub code: String,
}

impl DiagnosticKey {
    /// Create a key.
    pub fn new(line: usize, code: impl Into<String>) -> Self {
        Self {
            line,
            code: code.into(),
        }
    }
}

impl fmt::Display for DiagnosticKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.line, self.code)
    }
}

/// A tracked diagnostic and its visualization state.
#[derive(Debug, Clone)]
pub struct DiagnosticEntry {
    diagnostic: Diagnostic,
    inline: bool,
    displayed: bool,
    decoration_type: Option<DecorationTypeId>,
    rendered: Option<DecorationOptions>,
}

impl DiagnosticEntry {
    fn new(diagnostic: Diagnostic, inline: bool) -> Self {
        Self {
            diagnostic,
            inline,
            displayed: false,
            decoration_type: None,
            rendered: None,
        }
    }

    /// The diagnostic.
    pub fn diagnostic(&self) -> &Diagnostic {
        &self.diagnostic
    }

    /// Whether the visualization is currently shown.
    pub fn is_displayed(&self) -> bool {
        self.displayed
    }

    /// Whether the diagnostic is handled by an inline suggestion (never visualized).
    pub fn is_inline(&self) -> bool {
        self.inline
    }

    /// The entry's decoration type, once it has been shown.
    pub fn decoration_type(&self) -> Option<DecorationTypeId> {
        self.decoration_type
    }

    /// The last rendered decoration.
    pub fn rendered(&self) -> Option<&DecorationOptions> {
        self.rendered.as_ref()
    }
}

/// What a show / hide / toggle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The visualization is now shown.
    Shown,
    /// The visualization is now hidden.
    Hidden,
    /// No entry under the key.
    Missing,
    /// The entry is handled by an inline suggestion; nothing to show.
    Inline,
    /// The renderer did not understand the diagnostic; nothing is shown.
    Inapplicable(Option<String>),
    /// Rendering failed; the user was told.
    Failed(String),
}

/// Inputs needed to render a visualization.
#[derive(Clone, Copy)]
pub struct RenderEnv<'a> {
    /// Registries.
    pub interventions: &'a Interventions,
    /// The current document.
    pub document: &'a dyn LineSource,
    /// Geometry and palette.
    pub config: &'a VizConfig,
}

#[derive(Debug, Clone, Copy)]
struct Triangles {
    available: DecorationTypeId,
    shown: DecorationTypeId,
}

/// Keyed visualization state of one editor.
#[derive(Debug, Default)]
pub struct VizStore {
    entries: BTreeMap<DiagnosticKey, DiagnosticEntry>,
    triangles: Option<Triangles>,
}

impl VizStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry under `key`.
    pub fn get(&self, key: &DiagnosticKey) -> Option<&DiagnosticEntry> {
        self.entries.get(key)
    }

    /// All entries, ordered by line then code.
    pub fn entries(&self) -> impl Iterator<Item = (&DiagnosticKey, &DiagnosticEntry)> {
        self.entries.iter()
    }

    /// Number of tracked diagnostics.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys of displayed entries (zero or one).
    pub fn displayed_keys(&self) -> Vec<DiagnosticKey> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.displayed)
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Keys of every entry on `line`.
    pub fn keys_on_line(&self, line: usize) -> Vec<DiagnosticKey> {
        self.entries
            .keys()
            .filter(|key| key.line == line)
            .cloned()
            .collect()
    }

    /// Replace the tracked diagnostics with `diagnostics`.
    ///
    /// Diagnostics whose code has no handler are skipped; two diagnostics with the same key
    /// collapse into the later one. Entries displayed before are shown again. A diagnostic whose
    /// code is not a wrapped string aborts the whole batch and leaves the store untouched.
    pub fn rebuild(
        &mut self,
        host: &mut dyn DecorationHost,
        env: &RenderEnv<'_>,
        diagnostics: &[Diagnostic],
    ) -> Result<(), VizError> {
        let mut next = BTreeMap::new();
        let mut refresh = BTreeSet::new();
        for diag in diagnostics {
            let Some(code) = diag.code_str() else {
                let shape = diag
                    .code
                    .as_ref()
                    .map_or_else(|| "undefined".to_string(), ToString::to_string);
                tracing::error!(code = %shape, "unexpected diag.code type");
                return Err(VizError::UnexpectedCode(shape));
            };
            if !env.interventions.is_supported(code) {
                tracing::debug!(code, "skipping diagnostic without a handler");
                continue;
            }
            let key = DiagnosticKey::new(diag.line(), code);
            if self.entries.get(&key).is_some_and(|old| old.displayed) {
                refresh.insert(key.clone());
            }
            let entry = DiagnosticEntry::new(diag.clone(), env.interventions.is_inline(diag));
            next.insert(key, entry);
        }

        for (_, entry) in std::mem::take(&mut self.entries) {
            release(host, entry);
        }
        self.entries = next;

        for key in refresh {
            tracing::info!(%key, "reshow");
            self.show_entry(host, env, &key);
        }
        self.show_triangles(host);
        Ok(())
    }

    /// Show the visualization under `key`, hiding every other one.
    pub fn show(
        &mut self,
        host: &mut dyn DecorationHost,
        env: &RenderEnv<'_>,
        key: &DiagnosticKey,
    ) -> ToggleOutcome {
        let outcome = self.show_entry(host, env, key);
        self.show_triangles(host);
        outcome
    }

    /// Hide the visualization under `key`.
    pub fn hide(&mut self, host: &mut dyn DecorationHost, key: &DiagnosticKey) -> ToggleOutcome {
        let outcome = self.hide_entry(host, key);
        self.show_triangles(host);
        outcome
    }

    /// Flip the visualization under `key`.
    pub fn toggle(
        &mut self,
        host: &mut dyn DecorationHost,
        env: &RenderEnv<'_>,
        key: &DiagnosticKey,
    ) -> ToggleOutcome {
        let Some(entry) = self.entries.get(key) else {
            tracing::info!(%key, "nothing to toggle");
            return ToggleOutcome::Missing;
        };
        if entry.displayed {
            self.hide(host, key)
        } else {
            self.show(host, env, key)
        }
    }

    /// Hide every visualization.
    pub fn hide_all(&mut self, host: &mut dyn DecorationHost) {
        self.hide_all_entries(host);
        self.show_triangles(host);
    }

    /// Apply the gutter indicators: displayed and inline entries get the "shown" triangle, the
    /// rest the "available" one.
    pub fn show_triangles(&mut self, host: &mut dyn DecorationHost) {
        let triangles = self.triangles(host);
        let mut shown = Vec::new();
        let mut available = Vec::new();
        for (key, entry) in &self.entries {
            let decoration = DecorationOptions::at(DiagnosticRange::line_start(key.line));
            if entry.displayed || entry.inline {
                shown.push(decoration);
            } else {
                available.push(decoration);
            }
        }
        host.set_decorations(triangles.shown, shown);
        host.set_decorations(triangles.available, available);
    }

    /// Clear the gutter indicators.
    pub fn hide_triangles(&mut self, host: &mut dyn DecorationHost) {
        if let Some(triangles) = self.triangles {
            host.set_decorations(triangles.shown, Vec::new());
            host.set_decorations(triangles.available, Vec::new());
        }
    }

    /// Drop every entry and release every decoration type the store created.
    pub fn dispose(&mut self, host: &mut dyn DecorationHost) {
        for (_, entry) in std::mem::take(&mut self.entries) {
            release(host, entry);
        }
        if let Some(triangles) = self.triangles.take() {
            host.dispose_decoration_type(triangles.shown);
            host.dispose_decoration_type(triangles.available);
        }
    }

    fn triangles(&mut self, host: &mut dyn DecorationHost) -> Triangles {
        *self.triangles.get_or_insert_with(|| Triangles {
            available: host.create_decoration_type(DecorationTypeOptions::GutterIcon {
                icon_uri: svg_to_data_uri(&triangle_available()),
            }),
            shown: host.create_decoration_type(DecorationTypeOptions::GutterIcon {
                icon_uri: svg_to_data_uri(&triangle_shown()),
            }),
        })
    }

    fn hide_all_entries(&mut self, host: &mut dyn DecorationHost) {
        for entry in self.entries.values_mut() {
            clear(host, entry);
        }
    }

    fn hide_entry(&mut self, host: &mut dyn DecorationHost, key: &DiagnosticKey) -> ToggleOutcome {
        match self.entries.get_mut(key) {
            Some(entry) => {
                clear(host, entry);
                ToggleOutcome::Hidden
            }
            None => ToggleOutcome::Missing,
        }
    }

    fn show_entry(
        &mut self,
        host: &mut dyn DecorationHost,
        env: &RenderEnv<'_>,
        key: &DiagnosticKey,
    ) -> ToggleOutcome {
        match self.entries.get(key) {
            None => {
                tracing::info!(%key, "no diagnostic under key");
                return ToggleOutcome::Missing;
            }
            Some(entry) if entry.inline => return ToggleOutcome::Inline,
            Some(_) => {}
        }

        self.hide_all_entries(host);
        let Some(entry) = self.entries.get_mut(key) else {
            return ToggleOutcome::Missing;
        };
        let image = image_by_code(
            &env.interventions.errorviz,
            env.document,
            env.config,
            &entry.diagnostic,
        );
        match image {
            HandlerResult::Success(decoration) => {
                let ty = *entry.decoration_type.get_or_insert_with(|| {
                    host.create_decoration_type(DecorationTypeOptions::WholeLine)
                });
                host.set_decorations(ty, vec![decoration.clone()]);
                entry.rendered = Some(decoration);
                entry.displayed = true;
                ToggleOutcome::Shown
            }
            HandlerResult::Inapplicable { context } => {
                tracing::info!(%key, context = ?context, "visualization not applicable");
                ToggleOutcome::Inapplicable(context)
            }
            HandlerResult::Failed { context } => {
                let message = VizError::RenderFailed(context.clone()).to_string();
                tracing::error!(%key, "{message}");
                host.show_error_message(&message);
                ToggleOutcome::Failed(context)
            }
        }
    }
}

fn clear(host: &mut dyn DecorationHost, entry: &mut DiagnosticEntry) {
    if let Some(ty) = entry.decoration_type {
        host.set_decorations(ty, Vec::new());
    }
    entry.displayed = false;
}

fn release(host: &mut dyn DecorationHost, mut entry: DiagnosticEntry) {
    clear(host, &mut entry);
    if let Some(ty) = entry.decoration_type.take() {
        host.dispose_decoration_type(ty);
    }
}
