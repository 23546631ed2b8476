#![warn(missing_docs)]
//! `revis-lsp` - feed LSP diagnostics into `revis-core`.
//!
//! This crate parses `textDocument/publishDiagnostics` payloads (`serde_json::Value`) into
//! [`revis_core::Diagnostic`]s, keeping the code shape the server used, and converts LSP UTF-16
//! positions to character offsets against the current document.

pub mod lsp_diagnostics;
pub mod lsp_position;

pub use lsp_diagnostics::{
    PublishedDiagnostics, code_from_value, diagnostic_from_value, diagnostics_from_value,
    severity_from_u64,
};
pub use lsp_position::{char_offset_to_utf16, utf16_to_char_offset};
