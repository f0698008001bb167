use ndarray::Array2;
use tracing::warn;

/// Ordered contour boundaries; `n` levels delimit `n - 1` bands.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelSet {
    values: Vec<f64>,
}

impl LevelSet {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn bands(&self) -> usize {
        self.values.len().saturating_sub(1)
    }

    pub fn min(&self) -> Option<f64> {
        self.values.first().copied()
    }

    pub fn max(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Band holding `value`, clamped to the outermost bands. `None` for NaN
    /// or when there is no band to hold it.
    pub fn band_of(&self, value: f64) -> Option<usize> {
        let bands = self.bands();
        if bands == 0 || value.is_nan() {
            return None;
        }
        // count of inner boundaries at or below value
        let inner = &self.values[1..bands];
        Some(inner.partition_point(|&level| level <= value))
    }

    /// Midpoint of band `k`.
    pub fn band_center(&self, k: usize) -> f64 {
        0.5 * (self.values[k] + self.values[k + 1])
    }
}

/// `n_levels` evenly spaced values from `min(field)` to `max(field)`.
///
/// NaN entries are skipped when taking the extremes; infinities are kept.
pub fn levels(field: &Array2<f64>, n_levels: usize) -> LevelSet {
    let (lo, hi) = field
        .iter()
        .filter(|v| !v.is_nan())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    let (lo, hi) = if lo > hi { (f64::NAN, f64::NAN) } else { (lo, hi) };

    if lo == hi {
        warn!(value = lo, "constant field, contour levels collapse to a single value");
    }

    let values = match n_levels {
        0 => Vec::new(),
        1 => vec![lo],
        n => {
            let last = n - 1;
            (0..n)
                .map(|k| match k {
                    0 => lo,
                    k if k == last || lo == hi => hi,
                    k => {
                        // weighted form, `hi - lo` overflows for extreme finite ranges
                        let t = k as f64 / last as f64;
                        lo * (1.0 - t) + hi * t
                    }
                })
                .collect()
        }
    };

    LevelSet { values }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn spans_min_to_max_strictly_increasing() {
        let f = arr2(&[[3.0, -2.0, 0.5], [7.5, 1.0, -1.25]]);
        for n in [2, 3, 10, 100] {
            let l = levels(&f, n);
            assert_eq!(l.len(), n);
            assert_eq!(l.min(), Some(-2.0));
            assert_eq!(l.max(), Some(7.5));
            assert!(l.values().windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn constant_field_collapses() {
        let f = Array2::from_elem((3, 3), 4.25);
        let l = levels(&f, 5);
        assert_eq!(l.values(), &[4.25; 5]);
    }

    #[test]
    fn single_level_is_min() {
        let f = arr2(&[[1.0, 9.0]]);
        assert_eq!(levels(&f, 1).values(), &[1.0]);
        assert_eq!(levels(&f, 1).bands(), 0);
        assert!(levels(&f, 0).is_empty());
    }

    #[test]
    fn nan_entries_are_skipped() {
        let f = arr2(&[[f64::NAN, 2.0], [6.0, f64::NAN]]);
        assert_eq!(levels(&f, 3).values(), &[2.0, 4.0, 6.0]);

        let all_nan = Array2::from_elem((2, 2), f64::NAN);
        assert!(levels(&all_nan, 3).values().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn extreme_finite_range_stays_finite() {
        let f = arr2(&[[-1.0e308, 1.0e308]]);
        let l = levels(&f, 5);
        assert_eq!(l.min(), Some(-1.0e308));
        assert_eq!(l.max(), Some(1.0e308));
        assert!(l.values().iter().all(|v| v.is_finite()));
        assert!(l.values().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn infinities_are_kept_as_extremes() {
        let f = arr2(&[[0.0, f64::INFINITY], [2.0, f64::NAN]]);
        assert_eq!(levels(&f, 3).values(), &[0.0, f64::INFINITY, f64::INFINITY]);

        let f = arr2(&[[f64::NEG_INFINITY, 1.0]]);
        assert_eq!(levels(&f, 2).values(), &[f64::NEG_INFINITY, 1.0]);

        let f = arr2(&[[f64::NEG_INFINITY, f64::INFINITY]]);
        let l = levels(&f, 3);
        assert_eq!(l.min(), Some(f64::NEG_INFINITY));
        assert_eq!(l.max(), Some(f64::INFINITY));
        assert!(l.values()[1].is_nan());
    }

    #[test]
    fn band_lookup() {
        let f = arr2(&[[0.0, 4.0]]);
        let l = levels(&f, 5); // 0 1 2 3 4
        assert_eq!(l.bands(), 4);
        assert_eq!(l.band_of(-1.0), Some(0));
        assert_eq!(l.band_of(0.0), Some(0));
        assert_eq!(l.band_of(0.99), Some(0));
        assert_eq!(l.band_of(1.0), Some(1));
        assert_eq!(l.band_of(3.5), Some(3));
        assert_eq!(l.band_of(4.0), Some(3));
        assert_eq!(l.band_of(10.0), Some(3));
        assert_eq!(l.band_of(f64::NAN), None);
        assert_eq!(l.band_center(2), 2.5);
    }
}
