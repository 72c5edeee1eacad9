use crate::consts::DEFAULT_TOLERANCE;

/// Margins for approximate float comparisons.
///
/// Two numbers are considered equal when they differ by less than
/// `relative` times the smaller magnitude. Near zero that margin vanishes,
/// so it never drops below `floor`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub relative: f64,
    pub floor: f64,
}

impl Tolerance {
    pub const DEFAULT: Tolerance = Tolerance {
        relative: DEFAULT_TOLERANCE,
        floor: DEFAULT_TOLERANCE,
    };

    pub fn new(relative: f64, floor: f64) -> Self {
        Self {
            relative: relative.abs(),
            floor: floor.abs(),
        }
    }

    pub fn margin(&self, a: f64, b: f64) -> f64 {
        let smaller = a.abs().min(b.abs());
        (smaller * self.relative).max(self.floor)
    }

    pub fn nearly_equal(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.margin(a, b)
    }

    pub fn nearly_zero(&self, a: f64) -> bool {
        self.nearly_equal(a, 0.0)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}
