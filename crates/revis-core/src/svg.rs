//! A small retained SVG tree plus serialization.
//!
//! Visualizations only ever need stroked/filled paths and plain text inside one translated
//! group, so the model is deliberately flat: an [`Svg`] owns a single canvas [`Group`] whose
//! children are [`SvgNode`]s.

use crate::config::VizConfig;
use std::fmt::Write as _;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Base image width in px, before the horizontal shift is added.
pub const BASE_WIDTH: f64 = 800.0;

/// How a path is painted.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    /// Outline only.
    Stroke(String),
    /// Filled shape.
    Fill(String),
}

/// A drawable node.
#[derive(Debug, Clone, PartialEq)]
pub enum SvgNode {
    /// `<path>`.
    Path {
        /// Path data.
        d: String,
        /// Stroke or fill color.
        paint: Paint,
    },
    /// `<text>`; several lines are emitted as `<tspan>`s.
    Text {
        /// Left edge in px.
        x: f64,
        /// Baseline of the first line in px.
        y: f64,
        /// Fill color.
        fill: String,
        /// Text lines (split on `\n`).
        lines: Vec<String>,
        /// Vertical advance between lines in px.
        line_height: f64,
    },
}

impl SvgNode {
    /// Concatenated text content, or `None` for paths.
    pub fn text_content(&self) -> Option<String> {
        match self {
            Self::Text { lines, .. } => Some(lines.join("\n")),
            Self::Path { .. } => None,
        }
    }
}

/// A `<g>` element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    attrs: Vec<(&'static str, String)>,
    children: Vec<SvgNode>,
}

impl Group {
    /// An empty group without attributes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or replace) an attribute.
    pub fn attr(&mut self, name: &'static str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
        self
    }

    /// Value of attribute `name`.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Append a path.
    pub fn path(&mut self, d: impl Into<String>, paint: Paint) {
        self.children.push(SvgNode::Path {
            d: d.into(),
            paint,
        });
    }

    /// Append text at `(x, y)`. Embedded newlines start new lines `line_height` apart.
    pub fn text(&mut self, text: &str, fill: &str, x: f64, y: f64, line_height: f64) {
        self.children.push(SvgNode::Text {
            x,
            y,
            fill: fill.to_string(),
            lines: text.split('\n').map(str::to_string).collect(),
            line_height,
        });
    }

    /// Child nodes in drawing order.
    pub fn children(&self) -> &[SvgNode] {
        &self.children
    }

    /// Text content of every text child, in drawing order.
    pub fn texts(&self) -> Vec<String> {
        self.children
            .iter()
            .filter_map(SvgNode::text_content)
            .collect()
    }

    fn write_into(&self, out: &mut String) {
        out.push_str("<g");
        for (name, value) in &self.attrs {
            let _ = write!(out, " {name}=\"{}\"", escape_xml(value));
        }
        out.push('>');
        for child in &self.children {
            write_node(out, child);
        }
        out.push_str("</g>");
    }
}

/// A standalone SVG image.
#[derive(Debug, Clone, PartialEq)]
pub struct Svg {
    /// Image width in px.
    pub width: f64,
    /// Image height in px.
    pub height: f64,
    /// The single drawing group.
    pub canvas: Group,
}

impl Svg {
    /// An empty image of the given size.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            canvas: Group::new(),
        }
    }

    /// Serialize to SVG markup.
    pub fn to_svg_string(&self) -> String {
        let mut out = String::with_capacity(256 + self.canvas.children.len() * 96);
        let _ = write!(
            out,
            r#"<svg xmlns="{SVG_NS}" width="{}" height="{}">"#,
            fmt_num(self.width),
            fmt_num(self.height)
        );
        self.canvas.write_into(&mut out);
        out.push_str("</svg>");
        out
    }
}

/// An image `BASE_WIDTH + xshift` px wide and `height_lines` editor lines tall, whose canvas is
/// translated right by `xshift` px and styled for monospace text.
pub fn svg_with_canvas(config: &VizConfig, xshift: f64, height_lines: usize) -> Svg {
    let mut svg = Svg::new(
        BASE_WIDTH + xshift,
        config.line_height * height_lines as f64,
    );
    svg.canvas
        .attr("fill", "transparent")
        .attr("transform", format!("translate({}, 0)", fmt_num(xshift)))
        .attr(
            "style",
            format!(
                "font-family: monospace; font-size: {}px; overflow: visible;",
                fmt_num(config.font_size)
            ),
        );
    svg
}

/// Incremental builder for SVG path data.
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    d: String,
}

impl PathBuilder {
    /// An empty path.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, cmd: char, x: f64, y: f64) -> &mut Self {
        if !self.d.is_empty() {
            self.d.push(' ');
        }
        let _ = write!(self.d, "{cmd}{},{}", fmt_num(x), fmt_num(y));
        self
    }

    /// Absolute move (`M`).
    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.push('M', x, y)
    }

    /// Absolute line (`L`).
    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.push('L', x, y)
    }

    /// Relative move (`m`).
    pub fn move_by(&mut self, dx: f64, dy: f64) -> &mut Self {
        self.push('m', dx, dy)
    }

    /// Relative line (`l`).
    pub fn line_by(&mut self, dx: f64, dy: f64) -> &mut Self {
        self.push('l', dx, dy)
    }

    /// Finished path data.
    pub fn build(&self) -> String {
        self.d.clone()
    }
}

fn write_node(out: &mut String, node: &SvgNode) {
    match node {
        SvgNode::Path { d, paint } => {
            let _ = write!(out, r#"<path d="{}""#, escape_xml(d));
            match paint {
                Paint::Stroke(color) => {
                    let _ = write!(out, r#" stroke="{}""#, escape_xml(color));
                }
                Paint::Fill(color) => {
                    let _ = write!(out, r#" fill="{}""#, escape_xml(color));
                }
            }
            out.push_str("/>");
        }
        SvgNode::Text {
            x,
            y,
            fill,
            lines,
            line_height,
        } => {
            let _ = write!(
                out,
                r#"<text x="{}" y="{}" fill="{}">"#,
                fmt_num(*x),
                fmt_num(*y),
                escape_xml(fill)
            );
            if let [single] = lines.as_slice() {
                out.push_str(&escape_xml(single));
            } else {
                for (i, line) in lines.iter().enumerate() {
                    let dy = if i == 0 { 0.0 } else { *line_height };
                    let _ = write!(
                        out,
                        r#"<tspan x="{}" dy="{}">{}</tspan>"#,
                        fmt_num(*x),
                        fmt_num(dy),
                        escape_xml(line)
                    );
                }
            }
            out.push_str("</text>");
        }
    }
}

/// Format a number for SVG output: at most 3 decimals, no trailing zeros, no `-0`.
pub fn fmt_num(v: f64) -> String {
    if !v.is_finite() || v.abs() < 0.0005 {
        return "0".to_string();
    }
    let mut out = format!("{v:.3}");
    while out.ends_with('0') {
        out.pop();
    }
    if out.ends_with('.') {
        out.pop();
    }
    if out == "-0" {
        out = "0".to_string();
    }
    out
}

/// Escape text for use in XML content and attribute values.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(0.0), "0");
        assert_eq!(fmt_num(-0.0), "0");
        assert_eq!(fmt_num(f64::NAN), "0");
        assert_eq!(fmt_num(10.0), "10");
        assert_eq!(fmt_num(9.5), "9.5");
        assert_eq!(fmt_num(-3.0), "-3");
        assert_eq!(fmt_num(0.1 + 0.2), "0.3");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("`a` < &b>"), "`a` &lt; &amp;b&gt;");
        assert_eq!(escape_xml(r#"say "hi""#), "say &quot;hi&quot;");
    }

    #[test]
    fn test_path_builder() {
        let mut p = PathBuilder::new();
        p.move_to(0.0, 9.5).line_by(15.0, 0.0).move_by(-6.0, -3.0);
        assert_eq!(p.build(), "M0,9.5 l15,0 m-6,-3");
    }

    #[test]
    fn test_serialize_canvas() {
        let config = VizConfig::default();
        let mut svg = svg_with_canvas(&config, 18.0, 2);
        svg.canvas
            .path("M0,0 l10,0", Paint::Stroke("#F44747".to_string()));
        svg.canvas.text("a\nb", "#C8C8C8", 20.0, 14.0, 19.0);
        let markup = svg.to_svg_string();
        assert!(markup.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="818" height="38">"#));
        assert!(markup.contains(r#"transform="translate(18, 0)""#));
        assert!(markup.contains(r##"<path d="M0,0 l10,0" stroke="#F44747"/>"##));
        assert!(markup.contains(r#"<tspan x="20" dy="19">b</tspan>"#));
        assert!(markup.ends_with("</g></svg>"));
    }
}
