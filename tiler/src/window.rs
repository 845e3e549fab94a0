//! Two-axis window sizes used for patch kernels and strides

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Extent along the two spatial axes, `(rows, cols)`.
///
/// Used both for the patch kernel (size of a patch) and the stride (step
/// between successive patch origins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Window {
    pub rows: usize,
    pub cols: usize,
}

impl Window {
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Square window with the same extent on both axes
    pub const fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    /// True when both components are at least one
    pub fn is_positive(&self) -> bool {
        self.rows >= 1 && self.cols >= 1
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::square(16)
    }
}

impl From<(usize, usize)> for Window {
    fn from((rows, cols): (usize, usize)) -> Self {
        Self::new(rows, cols)
    }
}

impl From<Window> for (usize, usize) {
    fn from(w: Window) -> Self {
        (w.rows, w.cols)
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Parse `"RxC"` (e.g. `"32x16"`) or a single `"N"` for a square window
impl FromStr for Window {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim()
                .parse::<usize>()
                .map_err(|_| format!("Invalid window component: '{}'", part.trim()))
        };

        let parts: Vec<&str> = s.split(['x', 'X']).collect();
        match parts.as_slice() {
            [size] => Ok(Self::square(parse(size)?)),
            [rows, cols] => Ok(Self::new(parse(rows)?, parse(cols)?)),
            _ => Err("Window must be in format 'RxC' or 'N'".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair() {
        assert_eq!("32x16".parse::<Window>().unwrap(), Window::new(32, 16));
        assert_eq!(" 4 X 2 ".parse::<Window>().unwrap(), Window::new(4, 2));
    }

    #[test]
    fn test_parse_square() {
        assert_eq!("8".parse::<Window>().unwrap(), Window::square(8));
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<Window>().is_err());
        assert!("4x".parse::<Window>().is_err());
        assert!("4x4x4".parse::<Window>().is_err());
        assert!("-1x4".parse::<Window>().is_err());
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        let w = Window::new(7, 3);
        assert_eq!(w.to_string().parse::<Window>().unwrap(), w);
    }

    #[test]
    fn test_is_positive() {
        assert!(Window::new(1, 1).is_positive());
        assert!(!Window::new(0, 4).is_positive());
        assert!(!Window::new(4, 0).is_positive());
    }
}
