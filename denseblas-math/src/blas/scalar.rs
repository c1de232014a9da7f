use std::{
    fmt::Debug,
    ops::{AddAssign, MulAssign, SubAssign},
};

use num_complex::{Complex32, Complex64, ComplexFloat};
use num_traits::Float;

/// An element type that the BLAS operations are defined over.
///
/// `Real` is the type of norms and absolute values: `f32` for `f32` and
/// [`Complex32`], `f64` for `f64` and [`Complex64`].
pub trait Scalar:
    ComplexFloat + denseblas_sys::zero::Zero + AddAssign + SubAssign + MulAssign + Debug
{
    /// `|re| + |im|`, the absolute value BLAS uses for `amax` and `asum`
    fn abs1(self) -> Self::Real {
        Float::abs(self.re()) + Float::abs(self.im())
    }

    /// `sqrt(re² + im²)`
    fn modulus(self) -> Self::Real {
        ComplexFloat::abs(self)
    }
}

impl Scalar for f32 {
    fn abs1(self) -> f32 {
        self.abs()
    }
}

impl Scalar for f64 {
    fn abs1(self) -> f64 {
        self.abs()
    }
}

impl Scalar for Complex32 {}

impl Scalar for Complex64 {}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use num_complex::Complex64;

    use super::Scalar;

    #[test]
    fn abs1_and_modulus() {
        let z = Complex64::new(3.0, -4.0);
        assert_relative_eq!(z.abs1(), 7.0);
        assert_relative_eq!(z.modulus(), 5.0);

        assert_relative_eq!((-2.5_f64).abs1(), 2.5);
        assert_relative_eq!((-2.5_f32).modulus(), 2.5);
    }
}
