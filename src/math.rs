use std::f64::consts::PI;
use std::error::Error;

use num_complex::Complex64;

pub type C = Complex64;

/// Error type a caller-supplied function may signal for a single point.
pub type FnError = Box<dyn Error + Send + Sync>;

/// A pointwise map from one complex value to one complex value.
///
/// Implementations must not depend on other points or on shared mutable state:
/// the evaluator is free to call `try_eval` in any order and from any thread.
pub trait ComplexFunction: Sync {
    fn try_eval(&self, z: C) -> Result<C, FnError>;
}

impl<F> ComplexFunction for F
where
    F: Fn(C) -> C + Sync,
{
    fn try_eval(&self, z: C) -> Result<C, FnError> {
        Ok(self(z))
    }
}

/// Adapter for closures that can fail at some points.
pub struct Fallible<F>(pub F);

impl<F, E> ComplexFunction for Fallible<F>
where
    F: Fn(C) -> Result<C, E> + Sync,
    E: Into<FnError>,
{
    fn try_eval(&self, z: C) -> Result<C, FnError> {
        (self.0)(z).map_err(Into::into)
    }
}

/// Sparse polynomial `sum(coeff * z^power)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Polynomial {
    terms: Vec<(u32, C)>,
}

impl Polynomial {
    pub fn new(terms: Vec<(u32, C)>) -> Self {
        Polynomial { terms }
    }

    /// `z^3 - i z^4 - 3 z^6`
    pub fn default_field() -> Self {
        Polynomial::new(vec![
            (3, C::new(1.0, 0.0)),
            (4, C::new(0.0, -1.0)),
            (6, C::new(-3.0, 0.0)),
        ])
    }

    pub fn terms(&self) -> &[(u32, C)] {
        &self.terms
    }

    pub fn eval(&self, z: C) -> C {
        // Integer powers by repeated multiplication, no branch cut involved
        self.terms
            .iter()
            .fold(C::new(0.0, 0.0), |acc, &(power, coeff)| acc + coeff * z.powu(power))
    }
}

impl ComplexFunction for Polynomial {
    fn try_eval(&self, z: C) -> Result<C, FnError> {
        Ok(self.eval(z))
    }
}

/// `coeff * z^exponent` with the principal-value power.
#[derive(Clone, Copy, Debug)]
pub struct PrincipalPower {
    pub coeff: C,
    pub exponent: C,
}

impl PrincipalPower {
    pub fn new(coeff: C, exponent: C) -> Self {
        PrincipalPower { coeff, exponent }
    }
}

impl ComplexFunction for PrincipalPower {
    fn try_eval(&self, z: C) -> Result<C, FnError> {
        Ok(self.coeff * principal_pow(z, self.exponent))
    }
}

/// Principal argument in (-π, π]. Both signed zeros map to 0.
pub fn principal_arg(z: C) -> f64 {
    if z.re == 0.0 && z.im == 0.0 {
        return 0.0;
    }
    let theta = z.im.atan2(z.re);
    // -0.0 imaginary part on the negative real axis lands on -π
    if theta == -PI { PI } else { theta }
}

/// Principal logarithm `ln|z| + i Arg z`.
pub fn principal_ln(z: C) -> C {
    C::new(z.norm().ln(), principal_arg(z))
}

/// Principal power `exp(w Ln z)`.
///
/// The branch cut runs along the negative real axis and belongs to its upper
/// side. `0^0 = 1`, `0^w = 0` when `Re(w) > 0`, NaN for any other exponent at 0.
pub fn principal_pow(z: C, w: C) -> C {
    if w.re == 0.0 && w.im == 0.0 {
        return C::new(1.0, 0.0);
    }
    if z.re == 0.0 && z.im == 0.0 {
        return if w.re > 0.0 {
            C::new(0.0, 0.0)
        } else {
            C::new(f64::NAN, f64::NAN)
        };
    }
    (w * principal_ln(z)).exp()
}
