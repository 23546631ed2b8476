//! Turning rendered images into decorations.

use crate::config::{ThemeName, VizConfig};
use crate::diagnostics::{Diagnostic, DiagnosticRange};
use crate::error::VizError;
use crate::errorviz::{ErrorvizRegistry, RenderContext};
use crate::handler::HandlerResult;
use crate::host::{AfterAttachment, DecorationOptions, ThemedRenderOptions};
use crate::line_index::LineSource;
use crate::svg::Svg;
use base64::{Engine as _, engine::general_purpose::STANDARD};

/// Hover text of every visualization decoration.
pub const HOVER_MESSAGE: &str = "click for visualization";

/// Serialize `svg` into a self-contained `data:` URI.
pub fn svg_to_data_uri(svg: &Svg) -> String {
    format!(
        "data:image/svg+xml;base64,{}",
        STANDARD.encode(svg.to_svg_string().as_bytes())
    )
}

/// Render `diag` for both themes and wrap the images into one decoration anchored at the start
/// of the image's topmost line.
///
/// An unexpected code shape or a code without a renderer is a [`HandlerResult::Failed`]; a
/// renderer that does not understand the diagnostic passes its inapplicability through.
pub fn image_by_code(
    registry: &ErrorvizRegistry,
    document: &dyn LineSource,
    config: &VizConfig,
    diag: &Diagnostic,
) -> HandlerResult<DecorationOptions> {
    let Some(code) = diag.code_str() else {
        let shape = diag
            .code
            .as_ref()
            .map_or_else(|| "undefined".to_string(), ToString::to_string);
        tracing::error!(code = %shape, "unexpected diag.code type");
        return HandlerResult::failed(VizError::UnexpectedCode(shape).to_string());
    };
    let Some(render) = registry.get(code) else {
        tracing::error!(code, "unsupported error code");
        return HandlerResult::failed(VizError::UnsupportedCode(code.to_string()).to_string());
    };

    render(&RenderContext::new(document, config, ThemeName::Dark), diag).and_then(|dark| {
        render(&RenderContext::new(document, config, ThemeName::Light), diag)
            .map(|light| image_to_decoration(&dark.image, &light.image, dark.line))
    })
}

fn image_to_decoration(dark: &Svg, light: &Svg, line: usize) -> DecorationOptions {
    let attach = |svg: &Svg| AfterAttachment {
        content_icon_uri: svg_to_data_uri(svg),
        vertical_align: "text-top".to_string(),
    };
    DecorationOptions {
        range: DiagnosticRange::line_start(line),
        render_options: Some(ThemedRenderOptions {
            light: attach(light),
            dark: attach(dark),
        }),
        hover_message: Some(HOVER_MESSAGE.to_string()),
    }
}
