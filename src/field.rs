use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use ndarray::{Array2, Zip};
use tracing::debug;

use crate::error::{PlotError, PlotResult};
use crate::grid::SampleGrid;
use crate::math::{C, ComplexFunction, FnError};

/// Function values over a sample grid, same shape as the grid.
#[derive(Clone, Debug)]
pub struct ComplexField {
    pub values: Array2<C>,
}

impl ComplexField {
    pub fn new(values: Array2<C>) -> Self {
        ComplexField { values }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }
}

/// How the element-wise map is scheduled. Both give identical results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Schedule {
    Sequential,
    #[default]
    Parallel,
}

pub fn evaluate<F>(func: &F, grid: &SampleGrid) -> PlotResult<ComplexField>
where
    F: ComplexFunction + ?Sized,
{
    evaluate_with(func, grid, Schedule::default())
}

pub fn evaluate_with<F>(func: &F, grid: &SampleGrid, schedule: Schedule) -> PlotResult<ComplexField>
where
    F: ComplexFunction + ?Sized,
{
    let start = Instant::now();
    let (rows, cols) = grid.shape();
    let mut values = Array2::from_elem((rows, cols), C::new(0.0, 0.0));

    // Lowest failing row-major index seen so far; points past it are skipped.
    // Points before it still run, so the reported point does not depend on scheduling.
    let first_failure = AtomicUsize::new(usize::MAX);
    let failure: Mutex<Option<(usize, FnError)>> = Mutex::new(None);

    let visit = |(i, j): (usize, usize), out: &mut C, &re: &f64, &im: &f64| {
        let idx = i * cols + j;
        if idx > first_failure.load(Ordering::Relaxed) {
            return;
        }
        match func.try_eval(C::new(re, im)) {
            Ok(v) => *out = v,
            Err(source) => {
                first_failure.fetch_min(idx, Ordering::Relaxed);
                let mut slot = failure.lock().unwrap_or_else(PoisonError::into_inner);
                if slot.as_ref().is_none_or(|(seen, _)| idx < *seen) {
                    *slot = Some((idx, source));
                }
            }
        }
    };

    let zip = Zip::indexed(&mut values).and(&grid.real_coords).and(&grid.imag_coords);
    match schedule {
        Schedule::Sequential => zip.for_each(visit),
        Schedule::Parallel => zip.par_for_each(visit),
    }

    if let Some((idx, source)) = failure.into_inner().unwrap_or_else(PoisonError::into_inner) {
        let z = grid.point(idx / cols, idx % cols);
        return Err(PlotError::Evaluation { re: z.re, im: z.im, source });
    }

    debug!(rows, cols, ?schedule, elapsed_ms = start.elapsed().as_millis() as u64, "evaluated field");

    Ok(ComplexField::new(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::build_grid;
    use crate::math::{Fallible, Polynomial, PrincipalPower};

    #[test]
    fn identity_preserves_coordinates() {
        let g = build_grid(1.0, 5).unwrap();
        let f = evaluate(&|z: C| z, &g).unwrap();
        assert_eq!(f.shape(), g.shape());
        for i in 0..5 {
            for j in 0..5 {
                assert_eq!(f.values[[i, j]], g.point(i, j));
            }
        }
    }

    #[test]
    fn shape_preserved_for_various_grids() {
        let p = Polynomial::default_field();
        for n in [1, 2, 3, 17, 64] {
            let g = build_grid(1.5, n).unwrap();
            assert_eq!(evaluate(&p, &g).unwrap().shape(), (n, n));
        }
    }

    #[test]
    fn schedules_agree() {
        let g = build_grid(1.0, 33).unwrap();
        let p = Polynomial::default_field();
        let a = evaluate_with(&p, &g, Schedule::Sequential).unwrap();
        let b = evaluate_with(&p, &g, Schedule::Parallel).unwrap();
        assert_eq!(a.values, b.values);
    }

    #[test]
    fn failure_reports_first_row_major_coordinate() {
        let g = build_grid(1.0, 5).unwrap();
        // fails on the whole right half
        let f = Fallible(|z: C| if z.re > 0.0 { Err("right half") } else { Ok(z) });
        for schedule in [Schedule::Sequential, Schedule::Parallel] {
            match evaluate_with(&f, &g, schedule) {
                Err(PlotError::Evaluation { re, im, source }) => {
                    assert_eq!((re, im), (0.5, -1.0));
                    assert_eq!(source.to_string(), "right half");
                }
                other => panic!("expected evaluation error, got {:?}", other.map(|f| f.shape())),
            }
        }
    }

    #[test]
    fn sequential_stops_after_first_failure() {
        let g = build_grid(1.0, 8).unwrap();
        let calls = AtomicUsize::new(0);
        let f = Fallible(|z: C| {
            calls.fetch_add(1, Ordering::Relaxed);
            if z.im > -1.0 { Err("past first row") } else { Ok(z) }
        });
        let err = evaluate_with(&f, &g, Schedule::Sequential).unwrap_err();
        assert!(matches!(err, PlotError::Evaluation { re, im, .. } if (re, im) == (-1.0, g.im_axis[1])));
        // the whole first row plus the failing point
        assert_eq!(calls.load(Ordering::Relaxed), 9);
    }

    #[test]
    fn parallel_failure_is_deterministic() {
        let g = build_grid(1.0, 64).unwrap();
        let f = Fallible(|z: C| if z.re * z.im > 0.25 { Err("quadrant") } else { Ok(z) });
        let expected = match evaluate_with(&f, &g, Schedule::Sequential) {
            Err(PlotError::Evaluation { re, im, .. }) => (re, im),
            _ => panic!("expected evaluation error"),
        };
        for _ in 0..8 {
            match evaluate_with(&f, &g, Schedule::Parallel) {
                Err(PlotError::Evaluation { re, im, .. }) => assert_eq!((re, im), expected),
                _ => panic!("expected evaluation error"),
            }
        }
    }

    #[test]
    fn nan_and_inf_pass_through() {
        let g = build_grid(1.0, 3).unwrap();
        let f = evaluate(&|z: C| z.inv(), &g).unwrap();
        let at_origin = f.values[[1, 1]];
        assert!(at_origin.re.is_nan() || at_origin.re.is_infinite());
    }

    #[test]
    fn works_through_trait_object() {
        let g = build_grid(1.0, 4).unwrap();
        let func: Box<dyn ComplexFunction> = Box::new(PrincipalPower::new(C::new(1.0, 0.0), C::new(0.5, 0.0)));
        let f = evaluate(func.as_ref(), &g).unwrap();
        assert_eq!(f.shape(), (4, 4));
    }
}
