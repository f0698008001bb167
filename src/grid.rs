use ndarray::{Array1, Array2};
use tracing::debug;

use crate::error::{PlotError, PlotResult};
use crate::math::C;

/// Uniform lattice of complex sample points over `[-size, size]^2`.
///
/// Laid out like `meshgrid(re_axis, im_axis)`: rows walk the imaginary axis,
/// columns walk the real axis.
#[derive(Clone, Debug)]
pub struct SampleGrid {
    pub re_axis: Array1<f64>,
    pub im_axis: Array1<f64>,
    pub real_coords: Array2<f64>,
    pub imag_coords: Array2<f64>,
}

impl SampleGrid {
    pub fn shape(&self) -> (usize, usize) {
        self.real_coords.dim()
    }

    pub fn point(&self, i: usize, j: usize) -> C {
        C::new(self.real_coords[[i, j]], self.imag_coords[[i, j]])
    }
}

/// `n` evenly spaced samples over `[-size, size]`, endpoints exact.
pub fn axis(size: f64, n: usize) -> Array1<f64> {
    if n == 1 {
        return Array1::from_elem(1, -size);
    }
    let last = n - 1;
    Array1::from_shape_fn(n, |k| {
        if k == last {
            size
        } else {
            -size + (k as f64 / last as f64) * 2.0 * size
        }
    })
}

pub fn build_grid(size: f64, n: usize) -> PlotResult<SampleGrid> {
    if !(size.is_finite() && size > 0.0) {
        return Err(PlotError::invalid(format!("grid size must be positive and finite, got {}", size)));
    }
    if n < 1 {
        return Err(PlotError::invalid("grid resolution must be at least 1"));
    }

    let re_axis = axis(size, n);
    let im_axis = axis(size, n);

    let real_coords = Array2::from_shape_fn((n, n), |(_, j)| re_axis[j]);
    let imag_coords = Array2::from_shape_fn((n, n), |(i, _)| im_axis[i]);

    debug!(size, n, "built sample grid");

    Ok(SampleGrid { re_axis, im_axis, real_coords, imag_coords })
}
