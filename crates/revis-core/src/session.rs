//! Event-driven driver tying the store, inline suggestions and the host together.
//!
//! The session is single-threaded and clock-agnostic: the host passes `now` in, which keeps the
//! debounce deterministic in tests.

use crate::config::VizConfig;
use crate::diagnostics::Diagnostic;
use crate::error::VizError;
use crate::host::DecorationHost;
use crate::inline::{InlineHint, InlineSuggestions};
use crate::interventions::Interventions;
use crate::line_index::LineSource;
use crate::store::{DiagnosticKey, RenderEnv, ToggleOutcome, VizStore};
use std::time::{Duration, Instant};

/// Tuning knobs of a [`VizSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Delay between the last diagnostics change and the rebuild.
    pub debounce: Duration,
    /// Only diagnostics from this source are considered.
    pub source: String,
    /// Only documents with this language id are considered.
    pub language_id: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(200),
            source: "rustc".to_string(),
            language_id: "rust".to_string(),
        }
    }
}

/// Result of a toggle request on a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineToggle {
    /// No tracked diagnostic on the line.
    Nothing,
    /// The single diagnostic on the line was toggled.
    Toggled(DiagnosticKey, ToggleOutcome),
    /// Several diagnostics share the line; the caller picks one and calls
    /// [`VizSession::toggle`].
    Choose(Vec<DiagnosticKey>),
}

/// Visualization state of one editor session.
#[derive(Debug)]
pub struct VizSession {
    interventions: Interventions,
    config: VizConfig,
    options: SessionOptions,
    store: VizStore,
    inline: InlineSuggestions,
    rebuild_due: Option<Instant>,
}

impl VizSession {
    /// A session using the built-in handlers.
    pub fn new(config: VizConfig, options: SessionOptions) -> Self {
        Self::with_interventions(Interventions::default(), config, options)
    }

    /// A session using custom handler registries.
    pub fn with_interventions(
        interventions: Interventions,
        config: VizConfig,
        options: SessionOptions,
    ) -> Self {
        Self {
            interventions,
            config,
            options,
            store: VizStore::new(),
            inline: InlineSuggestions::new(),
            rebuild_due: None,
        }
    }

    /// Geometry and palette, fixed for the session.
    pub fn config(&self) -> &VizConfig {
        &self.config
    }

    /// Session options.
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// The handler registries.
    pub fn interventions(&self) -> &Interventions {
        &self.interventions
    }

    /// The visualization store.
    pub fn store(&self) -> &VizStore {
        &self.store
    }

    /// Inline hints currently applied.
    pub fn inline_hints(&self) -> &[InlineHint] {
        self.inline.hints()
    }

    /// When the pending rebuild is due, if any.
    pub fn rebuild_due(&self) -> Option<Instant> {
        self.rebuild_due
    }

    /// Note that diagnostics changed. Schedules a rebuild `debounce` after `now`, replacing any
    /// pending one. Changes in documents of another language are ignored (returns `false`).
    pub fn diagnostics_changed(&mut self, language_id: &str, now: Instant) -> bool {
        if language_id != self.options.language_id {
            return false;
        }
        self.rebuild_due = Some(now + self.options.debounce);
        true
    }

    /// Run the pending rebuild if it is due. Returns `true` if a rebuild ran.
    pub fn poll(
        &mut self,
        host: &mut dyn DecorationHost,
        document: &dyn LineSource,
        diagnostics: &[Diagnostic],
        now: Instant,
    ) -> Result<bool, VizError> {
        let Some(due) = self.rebuild_due else {
            return Ok(false);
        };
        if now < due {
            return Ok(false);
        }
        self.rebuild_due = None;
        self.rebuild(host, document, diagnostics)?;
        Ok(true)
    }

    /// Rebuild immediately, e.g. when the active editor changes. Documents of another language
    /// are ignored (returns `false`).
    pub fn update_interventions(
        &mut self,
        host: &mut dyn DecorationHost,
        language_id: &str,
        document: &dyn LineSource,
        diagnostics: &[Diagnostic],
    ) -> Result<bool, VizError> {
        if language_id != self.options.language_id {
            return Ok(false);
        }
        self.rebuild(host, document, diagnostics)?;
        Ok(true)
    }

    fn rebuild(
        &mut self,
        host: &mut dyn DecorationHost,
        document: &dyn LineSource,
        diagnostics: &[Diagnostic],
    ) -> Result<(), VizError> {
        let candidates: Vec<Diagnostic> = diagnostics
            .iter()
            .filter(|diag| self.interventions.accepts(diag, &self.options.source))
            .cloned()
            .collect();
        tracing::debug!(
            total = diagnostics.len(),
            candidates = candidates.len(),
            "rebuilding visualizations"
        );

        let env = RenderEnv {
            interventions: &self.interventions,
            document,
            config: &self.config,
        };
        self.store.rebuild(host, &env, &candidates)?;
        self.inline
            .show(host, &self.interventions.inline, document, &candidates);
        Ok(())
    }

    /// Toggle the visualization under `key`.
    pub fn toggle(
        &mut self,
        host: &mut dyn DecorationHost,
        document: &dyn LineSource,
        key: &DiagnosticKey,
    ) -> ToggleOutcome {
        let env = RenderEnv {
            interventions: &self.interventions,
            document,
            config: &self.config,
        };
        self.store.toggle(host, &env, key)
    }

    /// Toggle the diagnostic on `line`, or list the candidates when there are several.
    pub fn toggle_at_line(
        &mut self,
        host: &mut dyn DecorationHost,
        document: &dyn LineSource,
        line: usize,
    ) -> LineToggle {
        let mut keys = self.store.keys_on_line(line);
        match keys.len() {
            0 => {
                tracing::info!(line = line + 1, "no diagnostics on line");
                LineToggle::Nothing
            }
            1 => {
                let key = keys.remove(0);
                let outcome = self.toggle(host, document, &key);
                LineToggle::Toggled(key, outcome)
            }
            _ => LineToggle::Choose(keys),
        }
    }

    /// Hide every visualization.
    pub fn clear_all(&mut self, host: &mut dyn DecorationHost) {
        self.store.hide_all(host);
    }

    /// Release every decoration type created by the session.
    pub fn dispose(&mut self, host: &mut dyn DecorationHost) {
        self.rebuild_due = None;
        self.store.dispose(host);
        self.inline.dispose(host);
    }
}
