//! The set of error codes the engine acts on.

use crate::diagnostics::{Diagnostic, DiagnosticSeverity};
use crate::errorviz::ErrorvizRegistry;
use crate::inline::InlineRegistry;
use std::collections::BTreeSet;

/// Both handler registries: full visualizations and inline suggestions.
///
/// Built once and passed by reference to the store and the session.
#[derive(Debug, Clone, Default)]
pub struct Interventions {
    /// Code -> visualization renderer.
    pub errorviz: ErrorvizRegistry,
    /// Code -> inline-suggestion handler.
    pub inline: InlineRegistry,
}

impl Interventions {
    /// Combine two registries.
    pub fn new(errorviz: ErrorvizRegistry, inline: InlineRegistry) -> Self {
        Self { errorviz, inline }
    }

    /// Every code with a visualization or an inline suggestion.
    pub fn supported_codes(&self) -> BTreeSet<&'static str> {
        self.errorviz.codes().chain(self.inline.codes()).collect()
    }

    /// `true` if `code` has a visualization or an inline suggestion.
    pub fn is_supported(&self, code: &str) -> bool {
        self.errorviz.contains(code) || self.inline.contains(code)
    }

    /// `true` if `diag` is worth tracking: an error from `source` whose code is a wrapped string
    /// in the supported set.
    pub fn accepts(&self, diag: &Diagnostic, source: &str) -> bool {
        diag.source.as_deref() == Some(source)
            && diag.severity == Some(DiagnosticSeverity::Error)
            && diag.code_str().is_some_and(|code| self.is_supported(code))
    }

    /// `true` if `diag` is handled by an inline suggestion instead of a visualization.
    pub fn is_inline(&self, diag: &Diagnostic) -> bool {
        self.inline.handles(diag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticCode, DiagnosticRange};

    #[test]
    fn test_supported_codes_is_union() {
        let interventions = Interventions::default();
        let codes: Vec<_> = interventions.supported_codes().into_iter().collect();
        assert_eq!(
            codes,
            vec![
                "E0308", "E0373", "E0382", "E0499", "E0502", "E0503", "E0505", "E0506", "E0597"
            ]
        );
    }

    #[test]
    fn test_accepts_filters_source_severity_and_shape() {
        let interventions = Interventions::default();
        let range = DiagnosticRange::line_start(1);
        let diag = Diagnostic::rustc_error("E0502", "cannot borrow `x` as mutable", range);
        assert!(interventions.accepts(&diag, "rustc"));
        assert!(!interventions.accepts(&diag, "clippy"));

        let mut warning = diag.clone();
        warning.severity = Some(DiagnosticSeverity::Warning);
        assert!(!interventions.accepts(&warning, "rustc"));

        let mut bare = diag.clone();
        bare.code = Some(DiagnosticCode::Bare(crate::diagnostics::CodeValue::String(
            "E0502".to_string(),
        )));
        assert!(!interventions.accepts(&bare, "rustc"));

        let unsupported = Diagnostic::rustc_error("E0425", "cannot find value `y`", range);
        assert!(!interventions.accepts(&unsupported, "rustc"));
    }
}
