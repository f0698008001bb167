use ndarray::Array2;
use tracing::debug;

use crate::field::ComplexField;
use crate::math::{C, principal_arg};

/// Argument and magnitude of a complex field, element for element.
#[derive(Clone, Debug)]
pub struct PolarField {
    /// Phase in (-π, π].
    pub argument: Array2<f64>,
    /// Modulus, non-negative unless NaN.
    pub magnitude: Array2<f64>,
}

impl PolarField {
    pub fn shape(&self) -> (usize, usize) {
        self.argument.dim()
    }
}

pub fn magnitude(z: C) -> f64 {
    if z.re == 0.0 && z.im == 0.0 {
        return 0.0;
    }
    z.re.hypot(z.im)
}

/// Never fails. Zero points decompose to argument 0 and magnitude 0;
/// NaN and infinities flow through the float ops untouched.
pub fn decompose(field: &ComplexField) -> PolarField {
    let argument = field.values.mapv(principal_arg);
    let magnitude = field.values.mapv(magnitude);

    let nonfinite = field.values.iter().filter(|z| !z.is_finite()).count();
    debug!(shape = ?field.shape(), nonfinite, "decomposed field");

    PolarField { argument, magnitude }
}
