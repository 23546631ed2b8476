//! Line geometry helpers.
//!
//! Annotations are drawn to the right of the line they anchor to. An annotation that spans
//! several lines must start past the end of the longest of them, so the anchor line is padded by
//! [`horizontal_shift`] character cells.

use crate::line_index::LineSource;

/// Integers in the half-open interval `[from, to)`. Empty when `from >= to`.
pub fn range(from: usize, to: usize) -> std::ops::Range<usize> {
    from..to.max(from)
}

/// Minimum and maximum of `lines`.
///
/// Order-independent: any permutation of the same values yields the same pair. An empty slice
/// yields `(0, 0)`.
pub fn minmax(lines: &[usize]) -> (usize, usize) {
    let Some(&first) = lines.first() else {
        return (0, 0);
    };
    lines
        .iter()
        .fold((first, first), |(lo, hi), &l| (lo.min(l), hi.max(l)))
}

/// Clamp `x` into `[min, max]`.
pub fn clamp(x: f64, min: f64, max: f64) -> f64 {
    x.max(min).min(max)
}

/// Longest line length among lines `from..=to`.
///
/// Lines outside the document contribute 0 instead of failing.
pub fn line_length_range(source: &dyn LineSource, from: usize, to: usize) -> usize {
    range(from, to + 1)
        .map(|line| source.line_len(line).unwrap_or(0))
        .max()
        .unwrap_or(0)
}

/// How many character cells line `from` must be padded to be as long as the longest line in
/// `from..=to`.
///
/// Always `>= 0`: `from` itself takes part in the maximum.
pub fn horizontal_shift(source: &dyn LineSource, from: usize, to: usize) -> usize {
    let longest = line_length_range(source, from, to);
    let first = source.line_len(from).unwrap_or(0);
    longest.saturating_sub(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_index::LineIndex;

    #[test]
    fn test_minmax_is_order_independent() {
        let a = minmax(&[5, 3, 7, 4]);
        let b = minmax(&[7, 4, 3, 5]);
        let c = minmax(&[3, 4, 5, 7]);
        assert_eq!(a, (3, 7));
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(minmax(&[9]), (9, 9));
        assert_eq!(minmax(&[]), (0, 0));
    }

    #[test]
    fn test_range_is_half_open() {
        assert_eq!(range(2, 5).collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(range(5, 5).count(), 0);
        assert_eq!(range(6, 5).count(), 0);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(-1.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
        assert_eq!(clamp(3.0, 0.0, 1.0), 1.0);
    }

    struct Sparse;

    impl LineSource for Sparse {
        fn line_text(&self, line: usize) -> Option<String> {
            match line {
                10 => Some("abcd".to_string()),
                12 => Some("abcdefg".to_string()),
                _ => None,
            }
        }

        fn line_count(&self) -> usize {
            13
        }
    }

    #[test]
    fn test_line_length_range_skips_missing_lines() {
        assert_eq!(line_length_range(&Sparse, 10, 12), 7);
        assert_eq!(line_length_range(&Sparse, 11, 11), 0);
        assert_eq!(horizontal_shift(&Sparse, 10, 12), 3);
    }

    #[test]
    fn test_horizontal_shift() {
        let doc = LineIndex::from_text("ab\nabcdef\nabc\n");
        assert_eq!(horizontal_shift(&doc, 0, 2), 4);
        assert_eq!(horizontal_shift(&doc, 1, 1), 0);
        assert_eq!(horizontal_shift(&doc, 1, 2), 0);
        assert_eq!(horizontal_shift(&doc, 2, 2), 0);
        // Anchor past the end of the document.
        assert_eq!(horizontal_shift(&doc, 10, 12), 0);
    }
}
