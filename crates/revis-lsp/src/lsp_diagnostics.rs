//! `textDocument/publishDiagnostics` payloads to `revis-core` diagnostics.
//!
//! Servers report a diagnostic code in one of two ways:
//! - bare: `"code": "E0502"` (or a number)
//! - documented: `"code": "E0502", "codeDescription": { "href": "https://..." }`
//!
//! Editors built on top of LSP commonly fold the second form into an object
//! `{ "value": "E0502", "target": "https://..." }`, and hosts may hand that object over as-is.
//! Both the documented form and the folded object become [`DiagnosticCode::Wrapped`]; anything
//! else that is not a string or number is kept as [`DiagnosticCode::Unrecognized`] so the engine
//! can log it.

use crate::lsp_position::utf16_to_char_offset;
use revis_core::{
    CodeValue, Diagnostic, DiagnosticCode, DiagnosticRange, DiagnosticSeverity, LineSource,
    Position, RelatedInformation,
};
use serde_json::Value;

/// Parameters of a `textDocument/publishDiagnostics` notification.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedDiagnostics {
    /// Document URI (e.g. `file:///...`).
    pub uri: String,
    /// Optional document version.
    pub version: Option<i32>,
    /// Diagnostics for the document, positions still in UTF-16 code units.
    pub diagnostics: Vec<Diagnostic>,
}

impl PublishedDiagnostics {
    /// Parse the `params` of a `publishDiagnostics` notification.
    ///
    /// Returns `None` when `uri` is missing. Individual diagnostics without a valid range are
    /// skipped.
    pub fn from_value(params: &Value) -> Option<Self> {
        let uri = params.get("uri")?.as_str()?.to_string();
        let version = params
            .get("version")
            .and_then(Value::as_i64)
            .and_then(|v| i32::try_from(v).ok());
        let diagnostics = params
            .get("diagnostics")
            .map(diagnostics_from_value)
            .unwrap_or_default();
        Some(Self {
            uri,
            version,
            diagnostics,
        })
    }

    /// Convert every position from UTF-16 code units to character offsets within `document`.
    pub fn into_char_positions(mut self, document: &dyn LineSource) -> Self {
        for diag in &mut self.diagnostics {
            diag.range = range_to_chars(document, diag.range);
            for info in &mut diag.related_information {
                let same_document = info.uri.as_deref().is_none_or(|uri| uri == self.uri);
                if same_document {
                    info.range = range_to_chars(document, info.range);
                }
            }
        }
        self
    }
}

/// Parse an array of LSP diagnostics. Entries that are not objects with a valid range are
/// skipped.
pub fn diagnostics_from_value(value: &Value) -> Vec<Diagnostic> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let diag = diagnostic_from_value(item);
            if diag.is_none() {
                tracing::debug!(%item, "skipping malformed diagnostic");
            }
            diag
        })
        .collect()
}

/// Parse a single LSP diagnostic.
pub fn diagnostic_from_value(value: &Value) -> Option<Diagnostic> {
    let range = range_from_value(value.get("range")?)?;
    let severity = value
        .get("severity")
        .and_then(Value::as_u64)
        .and_then(severity_from_u64);
    let source = value
        .get("source")
        .and_then(Value::as_str)
        .map(str::to_string);
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();
    let related_information = value
        .get("relatedInformation")
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(related_from_value).collect())
        .unwrap_or_default();

    Some(Diagnostic {
        range,
        severity,
        code: code_from_value(value),
        source,
        message,
        related_information,
    })
}

/// Convert the numeric LSP `DiagnosticSeverity`.
pub fn severity_from_u64(value: u64) -> Option<DiagnosticSeverity> {
    match value {
        1 => Some(DiagnosticSeverity::Error),
        2 => Some(DiagnosticSeverity::Warning),
        3 => Some(DiagnosticSeverity::Information),
        4 => Some(DiagnosticSeverity::Hint),
        _ => None,
    }
}

/// Read the code of a diagnostic object, looking at `code` and `codeDescription`.
pub fn code_from_value(diag: &Value) -> Option<DiagnosticCode> {
    let code = diag.get("code")?;
    if code.is_null() {
        return None;
    }

    if let Some(value) = code_value(code) {
        let href = diag
            .get("codeDescription")
            .and_then(|d| d.get("href"))
            .and_then(Value::as_str);
        return Some(match href {
            Some(href) => DiagnosticCode::Wrapped {
                value,
                target: Some(href.to_string()),
            },
            None => DiagnosticCode::Bare(value),
        });
    }

    // Already folded: { value, target? }
    if let Some(value) = code.get("value").and_then(code_value) {
        let target = code
            .get("target")
            .and_then(Value::as_str)
            .map(str::to_string);
        return Some(DiagnosticCode::Wrapped { value, target });
    }

    Some(DiagnosticCode::Unrecognized(code.to_string()))
}

fn code_value(value: &Value) -> Option<CodeValue> {
    match value {
        Value::String(s) => Some(CodeValue::String(s.clone())),
        Value::Number(n) => n.as_i64().map(CodeValue::Number),
        _ => None,
    }
}

fn position_from_value(value: &Value) -> Option<Position> {
    let line = usize::try_from(value.get("line")?.as_u64()?).ok()?;
    let character = usize::try_from(value.get("character")?.as_u64()?).ok()?;
    Some(Position::new(line, character))
}

fn range_from_value(value: &Value) -> Option<DiagnosticRange> {
    let start = position_from_value(value.get("start")?)?;
    let end = position_from_value(value.get("end")?)?;
    Some(DiagnosticRange::new(start, end))
}

fn related_from_value(value: &Value) -> Option<RelatedInformation> {
    let location = value.get("location")?;
    let range = range_from_value(location.get("range")?)?;
    let message = value.get("message")?.as_str()?.to_string();
    let uri = location
        .get("uri")
        .and_then(Value::as_str)
        .map(str::to_string);
    Some(RelatedInformation {
        message,
        range,
        uri,
    })
}

fn position_to_chars(document: &dyn LineSource, position: Position) -> Position {
    match document.line_text(position.line) {
        Some(text) => Position::new(
            position.line,
            utf16_to_char_offset(&text, position.character),
        ),
        None => position,
    }
}

fn range_to_chars(document: &dyn LineSource, range: DiagnosticRange) -> DiagnosticRange {
    DiagnosticRange::new(
        position_to_chars(document, range.start),
        position_to_chars(document, range.end),
    )
}
