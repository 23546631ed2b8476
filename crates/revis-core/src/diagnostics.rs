//! Compiler diagnostics as consumed by the visualization engine.
//!
//! The engine never produces diagnostics. It receives them from the host (usually converted
//! from LSP `publishDiagnostics` by `revis-lsp`) and only reads:
//! - severity / source / code, to decide whether a diagnostic is a candidate at all
//! - the message and related information, to extract what to draw
//! - the primary range, to key and anchor visualizations
//!
//! All line and column numbers are 0-indexed.

use std::fmt;

/// A 0-indexed `(line, character)` position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    /// Line number (0-indexed).
    pub line: usize,
    /// Character offset within the line (0-indexed).
    pub character: usize,
}

impl Position {
    /// Create a new position.
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

/// A `start..end` range of positions in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DiagnosticRange {
    /// Range start (inclusive).
    pub start: Position,
    /// Range end (exclusive).
    pub end: Position,
}

impl DiagnosticRange {
    /// Create a new range.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A range covering `start_character..end_character` on a single line.
    pub fn on_line(line: usize, start_character: usize, end_character: usize) -> Self {
        Self {
            start: Position::new(line, start_character),
            end: Position::new(line, end_character),
        }
    }

    /// A zero-width range at the start of `line`.
    pub fn line_start(line: usize) -> Self {
        Self::on_line(line, 0, 0)
    }
}

/// Diagnostic severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    /// Error diagnostics.
    Error,
    /// Warning diagnostics.
    Warning,
    /// Informational diagnostics.
    Information,
    /// Hint diagnostics.
    Hint,
}

/// The scalar payload of a diagnostic code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CodeValue {
    /// A string code such as `"E0502"`.
    String(String),
    /// A numeric code.
    Number(i64),
}

impl fmt::Display for CodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// The code attached to a diagnostic.
///
/// Hosts report codes either bare (`"E0502"`, `502`) or wrapped in an object that also carries a
/// documentation target (`{ value: "E0502", target: "https://..." }`). Compiler diagnostics
/// with a documented error index always arrive in the wrapped form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticCode {
    /// A bare string or number.
    Bare(CodeValue),
    /// An object wrapping `{ value, target? }`.
    Wrapped {
        /// The code itself.
        value: CodeValue,
        /// Optional documentation link.
        target: Option<String>,
    },
    /// Any other shape the host handed over, kept as raw text for logging.
    Unrecognized(String),
}

impl DiagnosticCode {
    /// Shorthand for a wrapped string code without a target.
    pub fn wrapped(value: impl Into<String>) -> Self {
        Self::Wrapped {
            value: CodeValue::String(value.into()),
            target: None,
        }
    }

    /// Returns the code string when it is in the wrapped-string shape, which is the only shape
    /// the engine works with.
    pub fn wrapped_str(&self) -> Option<&str> {
        match self {
            Self::Wrapped {
                value: CodeValue::String(s),
                ..
            } => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bare(value) => write!(f, "{value}"),
            Self::Wrapped { value, .. } => write!(f, "{{value: {value}}}"),
            Self::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

/// A secondary location referenced by a diagnostic (e.g. "first borrow occurs here").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInformation {
    /// Related message.
    pub message: String,
    /// Location of the related span.
    pub range: DiagnosticRange,
    /// Optional document URI of the related span.
    pub uri: Option<String>,
}

impl RelatedInformation {
    /// Create a related-information entry without a URI.
    pub fn new(message: impl Into<String>, range: DiagnosticRange) -> Self {
        Self {
            message: message.into(),
            range,
            uri: None,
        }
    }
}

/// A single diagnostic item for the current document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Primary range.
    pub range: DiagnosticRange,
    /// Optional severity.
    pub severity: Option<DiagnosticSeverity>,
    /// Optional diagnostic code.
    pub code: Option<DiagnosticCode>,
    /// Optional diagnostic source (e.g. `"rustc"`).
    pub source: Option<String>,
    /// Diagnostic message.
    pub message: String,
    /// Related secondary locations.
    pub related_information: Vec<RelatedInformation>,
}

impl Diagnostic {
    /// An error-severity diagnostic from `rustc` with a wrapped code and no related information.
    pub fn rustc_error(code: &str, message: impl Into<String>, range: DiagnosticRange) -> Self {
        Self {
            range,
            severity: Some(DiagnosticSeverity::Error),
            code: Some(DiagnosticCode::wrapped(code)),
            source: Some("rustc".to_string()),
            message: message.into(),
            related_information: Vec::new(),
        }
    }

    /// Builder-style helper appending a related-information entry.
    pub fn with_related(mut self, message: impl Into<String>, range: DiagnosticRange) -> Self {
        self.related_information
            .push(RelatedInformation::new(message, range));
        self
    }

    /// Line of the primary range start.
    pub fn line(&self) -> usize {
        self.range.start.line
    }

    /// The wrapped code string, if the code has that shape.
    pub fn code_str(&self) -> Option<&str> {
        self.code.as_ref().and_then(DiagnosticCode::wrapped_str)
    }

    /// First related entry whose message ends with `suffix`.
    pub fn related_ending_with(&self, suffix: &str) -> Option<&RelatedInformation> {
        self.related_information
            .iter()
            .find(|info| info.message.ends_with(suffix))
    }

    /// First related entry whose message starts with `prefix`.
    pub fn related_starting_with(&self, prefix: &str) -> Option<&RelatedInformation> {
        self.related_information
            .iter()
            .find(|info| info.message.starts_with(prefix))
    }
}
