//! Library half of the `revis` demo binary.
//!
//! Reads a Rust source file and a diagnostics JSON file, runs them through a headless
//! [`VizSession`], and writes the light and dark SVG of every visualizable diagnostic to an
//! output directory as `{line}_{code}.{theme}.svg`.
//!
//! The diagnostics file may hold a bare array of LSP diagnostics, the `params` of a
//! `textDocument/publishDiagnostics` notification, or the whole notification.

use revis_core::{
    Diagnostic, DiagnosticKey, HandlerResult, HeadlessHost, InlineHint, LineIndex,
    RenderContext, SessionOptions, ThemeName, VizConfig, VizError, VizSession,
};
use revis_lsp::{PublishedDiagnostics, diagnostics_from_value};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Output directory used when none is given.
pub const DEFAULT_OUT_DIR: &str = "revis-out";

/// Environment variable overriding the editor font size.
pub const FONT_SIZE_ENV: &str = "REVIS_FONT_SIZE";

/// Failures of the demo binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// Bad command line.
    #[error("usage: {program} <source.rs> <diagnostics.json> [out-dir]")]
    Usage {
        /// Program name as invoked.
        program: String,
    },

    /// A file could not be read or written.
    #[error("{}: {source}", path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The diagnostics file is not valid JSON.
    #[error("{}: {source}", path.display())]
    Json {
        /// The diagnostics file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// The diagnostics file is JSON but holds no recognizable diagnostics payload.
    #[error("{}: expected a diagnostics array or publishDiagnostics params", path.display())]
    NotDiagnostics {
        /// The diagnostics file.
        path: PathBuf,
    },

    /// The engine rejected the diagnostics.
    #[error(transparent)]
    Viz(#[from] VizError),
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    /// Rust source file the diagnostics refer to.
    pub source: PathBuf,
    /// Diagnostics JSON file.
    pub diagnostics: PathBuf,
    /// Where the SVG files go.
    pub out_dir: PathBuf,
}

impl CliArgs {
    /// Parse `argv` (including the program name).
    pub fn parse(args: &[String]) -> Result<Self, CliError> {
        let program = args.first().map_or("revis", String::as_str).to_string();
        match args {
            [_, source, diagnostics] => Ok(Self {
                source: PathBuf::from(source),
                diagnostics: PathBuf::from(diagnostics),
                out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            }),
            [_, source, diagnostics, out_dir] => Ok(Self {
                source: PathBuf::from(source),
                diagnostics: PathBuf::from(diagnostics),
                out_dir: PathBuf::from(out_dir),
            }),
            _ => Err(CliError::Usage { program }),
        }
    }
}

/// Font size from the value of [`FONT_SIZE_ENV`]. Unparsable or non-positive values are
/// ignored with a warning.
pub fn font_size_from_env(value: Option<&str>) -> Option<f64> {
    let raw = value?.trim();
    match raw.parse::<f64>() {
        Ok(size) if size.is_finite() && size > 0.0 => Some(size),
        _ => {
            tracing::warn!(value = raw, "ignoring invalid {FONT_SIZE_ENV}");
            None
        }
    }
}

/// Engine configuration for an optional font size override.
pub fn viz_config(font_size: Option<f64>) -> VizConfig {
    font_size.map(VizConfig::from_font_size).unwrap_or_default()
}

/// Extract diagnostics from any of the accepted JSON shapes, with positions converted to
/// character offsets within `document`.
pub fn diagnostics_from_json(value: &Value, document: &LineIndex) -> Option<Vec<Diagnostic>> {
    if value.is_array() {
        let published = PublishedDiagnostics {
            uri: String::new(),
            version: None,
            diagnostics: diagnostics_from_value(value),
        };
        return Some(published.into_char_positions(document).diagnostics);
    }
    let params = value.get("params").unwrap_or(value);
    PublishedDiagnostics::from_value(params)
        .map(|published| published.into_char_positions(document).diagnostics)
}

/// File name suffix of a theme.
pub fn theme_suffix(theme: ThemeName) -> &'static str {
    match theme {
        ThemeName::Light => "light",
        ThemeName::Dark => "dark",
    }
}

/// A diagnostic that produced no image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    /// The diagnostic.
    pub key: DiagnosticKey,
    /// Why it was skipped.
    pub reason: String,
}

/// What a run produced.
#[derive(Debug, Default)]
pub struct Report {
    /// Diagnostics tracked by the session.
    pub tracked: usize,
    /// SVG files written, in key then theme order.
    pub written: Vec<PathBuf>,
    /// Tracked diagnostics without an image.
    pub skipped: Vec<Skipped>,
    /// Inline suggestions offered instead of images.
    pub inline_hints: Vec<InlineHint>,
}

fn read_to_string(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Render everything the session tracks into `args.out_dir`.
pub fn run(args: &CliArgs, config: VizConfig) -> Result<Report, CliError> {
    let document = LineIndex::from_text(&read_to_string(&args.source)?);
    let raw = read_to_string(&args.diagnostics)?;
    let value: Value = serde_json::from_str(&raw).map_err(|source| CliError::Json {
        path: args.diagnostics.clone(),
        source,
    })?;
    let diagnostics =
        diagnostics_from_json(&value, &document).ok_or_else(|| CliError::NotDiagnostics {
            path: args.diagnostics.clone(),
        })?;

    let mut host = HeadlessHost::new();
    let mut session = VizSession::new(config, SessionOptions::default());
    let language_id = session.options().language_id.clone();
    session.update_interventions(&mut host, &language_id, &document, &diagnostics)?;
    tracing::info!(
        received = diagnostics.len(),
        tracked = session.store().len(),
        "diagnostics loaded"
    );

    fs::create_dir_all(&args.out_dir).map_err(|source| CliError::Io {
        path: args.out_dir.clone(),
        source,
    })?;

    let mut report = Report {
        tracked: session.store().len(),
        inline_hints: session.inline_hints().to_vec(),
        ..Report::default()
    };
    for (key, entry) in session.store().entries() {
        if entry.is_inline() {
            continue;
        }
        let Some(render) = session.interventions().errorviz.get(&key.code) else {
            continue;
        };
        for theme in ThemeName::ALL {
            let ctx = RenderContext::new(&document, session.config(), theme);
            match render(&ctx, entry.diagnostic()) {
                HandlerResult::Success(success) => {
                    let path = args
                        .out_dir
                        .join(format!("{key}.{}.svg", theme_suffix(theme)));
                    fs::write(&path, success.image.to_svg_string()).map_err(|source| {
                        CliError::Io {
                            path: path.clone(),
                            source,
                        }
                    })?;
                    tracing::debug!(%key, path = %path.display(), "wrote visualization");
                    report.written.push(path);
                }
                other => {
                    let reason = other.context().unwrap_or("not applicable").to_string();
                    tracing::info!(%key, reason, "no visualization");
                    report.skipped.push(Skipped {
                        key: key.clone(),
                        reason,
                    });
                    break;
                }
            }
        }
    }

    session.dispose(&mut host);
    Ok(report)
}
