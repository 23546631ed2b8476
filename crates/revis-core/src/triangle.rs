//! Gutter indicators: a right-pointing triangle marks a line with an available visualization,
//! a down-pointing one marks the visualization currently shown.

use crate::svg::{Paint, PathBuilder, Svg};

const SIDE: f64 = 9.0;
const COLOR: &str = "#ff3300";

/// Down-pointing triangle for a shown visualization.
pub fn triangle_shown() -> Svg {
    let mut d = PathBuilder::new();
    d.move_to(0.0, 0.0)
        .line_to(SIDE, 0.0)
        .line_to(SIDE / 2.0, SIDE);
    triangle(d.build())
}

/// Right-pointing triangle for an available (hidden) visualization.
pub fn triangle_available() -> Svg {
    let mut d = PathBuilder::new();
    d.move_to(0.0, 0.0)
        .line_to(SIDE, SIDE / 2.0)
        .line_to(0.0, SIDE);
    triangle(d.build())
}

fn triangle(d: String) -> Svg {
    let mut sign = Svg::new(SIDE, SIDE);
    sign.canvas.path(d, Paint::Fill(COLOR.to_string()));
    sign
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::SvgNode;

    #[test]
    fn test_triangle_paths() {
        let path = |svg: Svg| match svg.canvas.children() {
            [SvgNode::Path { d, paint }] => (d.clone(), paint.clone()),
            other => panic!("unexpected nodes: {other:?}"),
        };
        assert_eq!(
            path(triangle_shown()),
            ("M0,0 L9,0 L4.5,9".to_string(), Paint::Fill("#ff3300".to_string()))
        );
        assert_eq!(path(triangle_available()).0, "M0,0 L9,4.5 L0,9");
    }
}
