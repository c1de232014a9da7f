use denseblas_sys::{device::DefaultDeviceAllocator, DefaultVec};

use crate::{
    blas::{DefaultBLASContext, BLAS1, BLAS2, BLAS3},
    error::BlasResult,
    storage::Storage,
};

use super::{Matrix, Vector, ViewOf};

/// Trait for the dot product.
pub trait Dot<Rhs> {
    type Output;

    /// # Errors
    /// If the operands' shapes do not agree
    fn dot(&self, rhs: Rhs) -> BlasResult<Self::Output>;
}

impl<S: Storage> Dot<Matrix<&ViewOf<S>>> for Matrix<S>
where
    S::Device: DefaultDeviceAllocator + DefaultBLASContext,
    S::T: BLAS3<<S::Device as DefaultBLASContext>::Context>,
{
    type Output = Matrix<DefaultVec<S::T, S::Device>>;

    fn dot(&self, rhs: Matrix<&ViewOf<S>>) -> BlasResult<Self::Output> {
        Matrix::dot(self, rhs)
    }
}

impl<S: Storage> Dot<Vector<&ViewOf<S>>> for Matrix<S>
where
    S::Device: DefaultDeviceAllocator + DefaultBLASContext,
    S::T: BLAS2<<S::Device as DefaultBLASContext>::Context>,
{
    type Output = Vector<DefaultVec<S::T, S::Device>>;

    fn dot(&self, rhs: Vector<&ViewOf<S>>) -> BlasResult<Self::Output> {
        self.dot_vector(rhs)
    }
}

impl<S: Storage> Dot<Vector<&ViewOf<S>>> for Vector<S>
where
    S::Device: DefaultBLASContext,
    S::T: BLAS1<<S::Device as DefaultBLASContext>::Context>,
{
    type Output = S::T;

    fn dot(&self, rhs: Vector<&ViewOf<S>>) -> BlasResult<Self::Output> {
        Vector::dot(self, rhs)
    }
}

#[cfg(test)]
mod tests {
    use denseblas_sys::View;

    use crate::tensor::{Tensor, Vector};

    use super::Dot;

    fn product<L: Dot<R>, R>(lhs: &L, rhs: R) -> L::Output {
        lhs.dot(rhs).unwrap()
    }

    #[test]
    fn dispatch_by_operand() {
        let a = Tensor::from_shape([2, 2], [1., 2., 3., 4.]);
        let x = Vector::from_shape([2], [1., 1.]);

        assert_eq!(product(&a, a.view()).into_inner().into_std(), [7., 10., 15., 22.]);
        assert_eq!(product(&a, x.view()).into_inner().into_std(), [4., 6.]);
        assert_eq!(product(&x, x.view()), 2.0);
    }
}
