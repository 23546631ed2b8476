use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Contract violations and rendering failures surfaced by the engine.
pub enum VizError {
    #[error("unexpected diag.code type: {0}")]
    /// A candidate diagnostic carried a code that is not a wrapped string.
    UnexpectedCode(String),

    #[error("unsupported error code {0}")]
    /// No visualization is registered for the code.
    UnsupportedCode(String),

    #[error("SVG generation failed: {0}")]
    /// A renderer failed unexpectedly.
    RenderFailed(String),
}
