use std::{
    mem::MaybeUninit,
    ops::{AddAssign, Mul, MulAssign},
};

use denseblas_sys::{
    device::{DefaultDeviceAllocator, Device},
    View, ViewMut,
};
use num_traits::{One, Zero};

use crate::{
    blas::{BLASContext, DefaultBLASContext, BLAS1},
    error::{BlasError, BlasResult},
    storage::{IntoOwned, Storage, StorageMut},
};

use super::{Slice, Tensor, ViewOf};

/// A 1-dimensional tensor
pub type Vector<S> = Tensor<S, [usize; 1]>;

/// A 'view' of a vector, Like `&[T]` is to `Vec<T>`
pub type VectorView<'a, T, D> = Vector<&'a Slice<T, D>>;

/// A 'mut view' of a vector, Like `&mut [T]` is to `Vec<T>`
pub type VectorViewMut<'a, T, D> = Vector<&'a mut Slice<T, D>>;

/// An uninit vector. Contents are mutable and specified as [`MaybeUninit`].
pub type UninitVector<'a, T, D> = VectorViewMut<'a, MaybeUninit<T>, D>;

impl<S: Storage> Vector<S> {
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub(crate) fn inc(&self) -> i32 {
        self.strides[0].max(1) as i32
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub(crate) fn n(&self) -> i32 {
        self.shape[0] as i32
    }

    /// Vector dot product
    ///
    /// # Errors
    /// If the vectors do not have the same length
    pub fn dot(&self, rhs: Vector<&ViewOf<S>>) -> BlasResult<S::T>
    where
        S::Device: DefaultBLASContext,
        S::T: BLAS1<<S::Device as DefaultBLASContext>::Context>,
    {
        self.dot_using(rhs, <S::Device as DefaultBLASContext>::default_ctx())
    }

    /// Vector dot product, using the specified [`BLASContext`]
    ///
    /// # Errors
    /// If the vectors do not have the same length
    pub fn dot_using<C: BLASContext<Device = S::Device>>(
        &self,
        rhs: Vector<&ViewOf<S>>,
        ctx: C,
    ) -> BlasResult<S::T>
    where
        S::T: BLAS1<C>,
    {
        dot_ctx(ctx, self.view(), rhs)
    }
}

impl<'a, S: StorageMut> AddAssign<Vector<&'a ViewOf<S>>> for Vector<S>
where
    S::Device: DefaultBLASContext,
    S::T: BLAS1<<S::Device as DefaultBLASContext>::Context>,
{
    /// # Panics
    /// If the vectors do not have the same length
    fn add_assign(&mut self, rhs: Vector<&'a ViewOf<S>>) {
        if let Err(e) = axpy_ctx(
            <S::Device as DefaultBLASContext>::default_ctx(),
            One::one(),
            rhs,
            self.view_mut(),
        ) {
            panic!("vector add failed: {e}");
        }
    }
}

impl<S: StorageMut> MulAssign<S::T> for Vector<S>
where
    S::Device: DefaultBLASContext,
    S::T: BLAS1<<S::Device as DefaultBLASContext>::Context>,
{
    fn mul_assign(&mut self, rhs: S::T) {
        if let Err(e) = self.scale_using(rhs, <S::Device as DefaultBLASContext>::default_ctx()) {
            panic!("vector scale failed: {e}");
        }
    }
}

impl<S: Storage + IntoOwned> Mul<S::T> for Vector<S>
where
    S::Device: DefaultBLASContext + DefaultDeviceAllocator,
    S::T: BLAS1<<S::Device as DefaultBLASContext>::Context>,
    S::Owned: Storage<T = S::T, Device = S::Device> + StorageMut,
{
    type Output = Vector<S::Owned>;
    fn mul(self, rhs: S::T) -> Self::Output {
        let mut x = self.into_owned();
        x *= rhs;
        x
    }
}

impl<S: StorageMut> Vector<S> {
    /// Vector scaling, using the specified [`BLASContext`]
    ///
    /// # Errors
    /// If the backend fails
    pub fn scale_using<C: BLASContext<Device = S::Device>>(
        &mut self,
        alpha: S::T,
        ctx: C,
    ) -> BlasResult<()>
    where
        S::T: BLAS1<C>,
    {
        scal_ctx(ctx, alpha, self.view_mut())
    }
}

fn check_len(op: &'static str, n: i32, m: i32) -> BlasResult<()> {
    if n == m {
        Ok(())
    } else {
        Err(BlasError::shape(op, &[n as usize], &[m as usize]))
    }
}

/// Index of the first element with the largest `|re| + |im|`. 0 for an empty vector.
///
/// Uses the default [`BLASContext`] for the device.
pub fn amax<F: BLAS1<D::Context>, D: DefaultBLASContext>(x: VectorView<F, D>) -> BlasResult<usize> {
    amax_ctx(D::Context::default(), x)
}

/// Index of the first element with the largest `|re| + |im|`. 0 for an empty vector.
#[allow(clippy::needless_pass_by_value)]
pub fn amax_ctx<F: BLAS1<C>, C: BLASContext<Device = D>, D: Device>(
    ctx: C,
    x: VectorView<F, D>,
) -> BlasResult<usize> {
    if x.n() == 0 {
        return Ok(0);
    }
    unsafe { F::amax(ctx, x.n(), x.data.as_ptr(), x.inc()) }
}

/// Sum of `|re| + |im|` over the vector.
///
/// Uses the default [`BLASContext`] for the device.
pub fn asum<F: BLAS1<D::Context>, D: DefaultBLASContext>(x: VectorView<F, D>) -> BlasResult<F::Real> {
    asum_ctx(D::Context::default(), x)
}

/// Sum of `|re| + |im|` over the vector.
#[allow(clippy::needless_pass_by_value)]
pub fn asum_ctx<F: BLAS1<C>, C: BLASContext<Device = D>, D: Device>(
    ctx: C,
    x: VectorView<F, D>,
) -> BlasResult<F::Real> {
    if x.n() == 0 {
        return Ok(F::Real::zero());
    }
    unsafe { F::asum(ctx, x.n(), x.data.as_ptr(), x.inc()) }
}

/// Performs the vector scale and add operation.
/// > y = alpha * x + y.
///
/// Uses the default [`BLASContext`] for the device.
pub fn axpy<F: BLAS1<D::Context>, D: DefaultBLASContext>(
    alpha: F,
    x: VectorView<F, D>,
    y: VectorViewMut<F, D>,
) -> BlasResult<()> {
    axpy_ctx(D::Context::default(), alpha, x, y)
}

/// Performs the vector scale and add operation.
/// > y = alpha * x + y.
///
/// # Errors
/// If the vectors do not have the same length
#[allow(clippy::needless_pass_by_value)]
pub fn axpy_ctx<F: BLAS1<C>, C: BLASContext<Device = D>, D: Device>(
    ctx: C,
    alpha: F,
    x: VectorView<F, D>,
    mut y: VectorViewMut<F, D>,
) -> BlasResult<()> {
    check_len("axpy", x.n(), y.n())?;
    if x.n() == 0 {
        return Ok(());
    }

    let (incx, incy) = (x.inc(), y.inc());
    unsafe {
        F::axpy(
            ctx,
            x.n(),
            alpha,
            x.data.as_ptr(),
            incx,
            y.data.as_mut_ptr(),
            incy,
        )
    }
}

/// > out = alpha * x + beta * y.
///
/// Uses the default [`BLASContext`] for the device.
pub fn axpby<F: BLAS1<D::Context>, D: DefaultBLASContext>(
    alpha: F,
    x: VectorView<F, D>,
    beta: F,
    y: VectorView<F, D>,
    out: VectorViewMut<F, D>,
) -> BlasResult<()> {
    axpby_ctx(D::Context::default(), alpha, x, beta, y, out)
}

/// > out = alpha * x + beta * y.
///
/// # Errors
/// If the vectors do not have the same length
#[allow(clippy::needless_pass_by_value)]
pub fn axpby_ctx<F: BLAS1<C>, C: BLASContext<Device = D>, D: Device>(
    ctx: C,
    alpha: F,
    x: VectorView<F, D>,
    beta: F,
    y: VectorView<F, D>,
    mut out: VectorViewMut<F, D>,
) -> BlasResult<()> {
    check_len("axpby", x.n(), y.n())?;
    check_len("axpby", x.n(), out.n())?;
    if x.n() == 0 {
        return Ok(());
    }

    let inco = out.inc();
    unsafe {
        F::axpby(
            ctx,
            x.n(),
            alpha,
            x.data.as_ptr(),
            x.inc(),
            beta,
            y.data.as_ptr(),
            y.inc(),
            out.data.as_mut_ptr(),
            inco,
        )
    }
}

/// > out = alpha * x + beta * y + gamma * z.
///
/// Uses the default [`BLASContext`] for the device.
#[allow(clippy::too_many_arguments)]
pub fn axpbypcz<F: BLAS1<D::Context>, D: DefaultBLASContext>(
    alpha: F,
    x: VectorView<F, D>,
    beta: F,
    y: VectorView<F, D>,
    gamma: F,
    z: VectorView<F, D>,
    out: VectorViewMut<F, D>,
) -> BlasResult<()> {
    axpbypcz_ctx(D::Context::default(), alpha, x, beta, y, gamma, z, out)
}

/// > out = alpha * x + beta * y + gamma * z.
///
/// # Errors
/// If the vectors do not have the same length
#[allow(clippy::too_many_arguments, clippy::needless_pass_by_value)]
pub fn axpbypcz_ctx<F: BLAS1<C>, C: BLASContext<Device = D>, D: Device>(
    ctx: C,
    alpha: F,
    x: VectorView<F, D>,
    beta: F,
    y: VectorView<F, D>,
    gamma: F,
    z: VectorView<F, D>,
    mut out: VectorViewMut<F, D>,
) -> BlasResult<()> {
    check_len("axpbypcz", x.n(), y.n())?;
    check_len("axpbypcz", x.n(), z.n())?;
    check_len("axpbypcz", x.n(), out.n())?;
    if x.n() == 0 {
        return Ok(());
    }

    let inco = out.inc();
    unsafe {
        F::axpbypcz(
            ctx,
            x.n(),
            alpha,
            x.data.as_ptr(),
            x.inc(),
            beta,
            y.data.as_ptr(),
            y.inc(),
            gamma,
            z.data.as_ptr(),
            z.inc(),
            out.data.as_mut_ptr(),
            inco,
        )
    }
}

/// Elementwise product.
/// > out\[i\] = x\[i\] * y\[i\].
///
/// Uses the default [`BLASContext`] for the device.
pub fn xmy<F: BLAS1<D::Context>, D: DefaultBLASContext>(
    x: VectorView<F, D>,
    y: VectorView<F, D>,
    out: VectorViewMut<F, D>,
) -> BlasResult<()> {
    xmy_ctx(D::Context::default(), x, y, out)
}

/// Elementwise product.
/// > out\[i\] = x\[i\] * y\[i\].
///
/// # Errors
/// If the vectors do not have the same length
#[allow(clippy::needless_pass_by_value)]
pub fn xmy_ctx<F: BLAS1<C>, C: BLASContext<Device = D>, D: Device>(
    ctx: C,
    x: VectorView<F, D>,
    y: VectorView<F, D>,
    mut out: VectorViewMut<F, D>,
) -> BlasResult<()> {
    check_len("xmy", x.n(), y.n())?;
    check_len("xmy", x.n(), out.n())?;
    if x.n() == 0 {
        return Ok(());
    }

    let inco = out.inc();
    unsafe {
        F::xmy(
            ctx,
            x.n(),
            x.data.as_ptr(),
            x.inc(),
            y.data.as_ptr(),
            y.inc(),
            out.data.as_mut_ptr(),
            inco,
        )
    }
}

/// > y = x.
///
/// Uses the default [`BLASContext`] for the device.
pub fn copy<F: BLAS1<D::Context>, D: DefaultBLASContext>(
    x: VectorView<F, D>,
    y: VectorViewMut<F, D>,
) -> BlasResult<()> {
    copy_ctx(D::Context::default(), x, y)
}

/// > y = x.
///
/// # Errors
/// If the vectors do not have the same length
#[allow(clippy::needless_pass_by_value)]
pub fn copy_ctx<F: BLAS1<C>, C: BLASContext<Device = D>, D: Device>(
    ctx: C,
    x: VectorView<F, D>,
    mut y: VectorViewMut<F, D>,
) -> BlasResult<()> {
    check_len("copy", x.n(), y.n())?;
    if x.n() == 0 {
        return Ok(());
    }

    let incy = y.inc();
    unsafe { F::copy(ctx, x.n(), x.data.as_ptr(), x.inc(), y.data.as_mut_ptr(), incy) }
}

/// Unconjugated dot product.
///
/// Uses the default [`BLASContext`] for the device.
pub fn dot<F: BLAS1<D::Context>, D: DefaultBLASContext>(
    x: VectorView<F, D>,
    y: VectorView<F, D>,
) -> BlasResult<F> {
    dot_ctx(D::Context::default(), x, y)
}

/// Unconjugated dot product.
///
/// # Errors
/// If the vectors do not have the same length
#[allow(clippy::needless_pass_by_value)]
pub fn dot_ctx<F: BLAS1<C>, C: BLASContext<Device = D>, D: Device>(
    ctx: C,
    x: VectorView<F, D>,
    y: VectorView<F, D>,
) -> BlasResult<F> {
    check_len("dot", x.n(), y.n())?;
    if x.n() == 0 {
        return Ok(F::zero());
    }
    unsafe { F::dot(ctx, x.n(), x.data.as_ptr(), x.inc(), y.data.as_ptr(), y.inc()) }
}

/// Dot product with `x` conjugated.
///
/// Uses the default [`BLASContext`] for the device.
pub fn dotc<F: BLAS1<D::Context>, D: DefaultBLASContext>(
    x: VectorView<F, D>,
    y: VectorView<F, D>,
) -> BlasResult<F> {
    dotc_ctx(D::Context::default(), x, y)
}

/// Dot product with `x` conjugated.
///
/// # Errors
/// If the vectors do not have the same length
#[allow(clippy::needless_pass_by_value)]
pub fn dotc_ctx<F: BLAS1<C>, C: BLASContext<Device = D>, D: Device>(
    ctx: C,
    x: VectorView<F, D>,
    y: VectorView<F, D>,
) -> BlasResult<F> {
    check_len("dotc", x.n(), y.n())?;
    if x.n() == 0 {
        return Ok(F::zero());
    }
    unsafe { F::dotc(ctx, x.n(), x.data.as_ptr(), x.inc(), y.data.as_ptr(), y.inc()) }
}

/// Sets every element to `alpha`.
///
/// Uses the default [`BLASContext`] for the device.
pub fn fill<F: BLAS1<D::Context>, D: DefaultBLASContext>(
    x: VectorViewMut<F, D>,
    alpha: F,
) -> BlasResult<()> {
    fill_ctx(D::Context::default(), x, alpha)
}

/// Sets every element to `alpha`.
#[allow(clippy::needless_pass_by_value)]
pub fn fill_ctx<F: BLAS1<C>, C: BLASContext<Device = D>, D: Device>(
    ctx: C,
    mut x: VectorViewMut<F, D>,
    alpha: F,
) -> BlasResult<()> {
    if x.n() == 0 {
        return Ok(());
    }
    let (n, incx) = (x.n(), x.inc());
    unsafe { F::fill(ctx, n, alpha, x.data.as_mut_ptr(), incx) }
}

/// Sum of the element moduli.
///
/// Uses the default [`BLASContext`] for the device.
pub fn nrm1<F: BLAS1<D::Context>, D: DefaultBLASContext>(x: VectorView<F, D>) -> BlasResult<F::Real> {
    nrm1_ctx(D::Context::default(), x)
}

/// Sum of the element moduli.
#[allow(clippy::needless_pass_by_value)]
pub fn nrm1_ctx<F: BLAS1<C>, C: BLASContext<Device = D>, D: Device>(
    ctx: C,
    x: VectorView<F, D>,
) -> BlasResult<F::Real> {
    if x.n() == 0 {
        return Ok(F::Real::zero());
    }
    unsafe { F::nrm1(ctx, x.n(), x.data.as_ptr(), x.inc()) }
}

/// Euclidean norm.
///
/// Uses the default [`BLASContext`] for the device.
pub fn nrm2<F: BLAS1<D::Context>, D: DefaultBLASContext>(x: VectorView<F, D>) -> BlasResult<F::Real> {
    nrm2_ctx(D::Context::default(), x)
}

/// Euclidean norm.
#[allow(clippy::needless_pass_by_value)]
pub fn nrm2_ctx<F: BLAS1<C>, C: BLASContext<Device = D>, D: Device>(
    ctx: C,
    x: VectorView<F, D>,
) -> BlasResult<F::Real> {
    if x.n() == 0 {
        return Ok(F::Real::zero());
    }
    unsafe { F::nrm2(ctx, x.n(), x.data.as_ptr(), x.inc()) }
}

/// Largest element modulus. 0 for an empty vector.
///
/// Uses the default [`BLASContext`] for the device.
pub fn nrmmax<F: BLAS1<D::Context>, D: DefaultBLASContext>(
    x: VectorView<F, D>,
) -> BlasResult<F::Real> {
    nrmmax_ctx(D::Context::default(), x)
}

/// Largest element modulus. 0 for an empty vector.
#[allow(clippy::needless_pass_by_value)]
pub fn nrmmax_ctx<F: BLAS1<C>, C: BLASContext<Device = D>, D: Device>(
    ctx: C,
    x: VectorView<F, D>,
) -> BlasResult<F::Real> {
    if x.n() == 0 {
        return Ok(F::Real::zero());
    }
    unsafe { F::nrmmax(ctx, x.n(), x.data.as_ptr(), x.inc()) }
}

/// Performs the vector scale operation.
/// > x = alpha * x.
///
/// Uses the default [`BLASContext`] for the device.
pub fn scal<F: BLAS1<D::Context>, D: DefaultBLASContext>(
    alpha: F,
    x: VectorViewMut<F, D>,
) -> BlasResult<()> {
    scal_ctx(D::Context::default(), alpha, x)
}

/// Performs the vector scale operation.
/// > x = alpha * x.
///
/// A zero `alpha` writes zeros without reading `x`.
#[allow(clippy::needless_pass_by_value)]
pub fn scal_ctx<F: BLAS1<C>, C: BLASContext<Device = D>, D: Device>(
    ctx: C,
    alpha: F,
    mut x: VectorViewMut<F, D>,
) -> BlasResult<()> {
    if x.n() == 0 {
        return Ok(());
    }
    let (n, incx) = (x.n(), x.inc());
    unsafe { F::scal(ctx, n, alpha, x.data.as_mut_ptr(), incx) }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use denseblas_sys::{View, ViewMut};
    use num_complex::Complex64;

    use crate::{
        blas::cpu::CpuContext,
        error::BlasError,
        tensor::{Tensor, Vector},
    };

    use super::{
        amax, amax_ctx, asum, axpby, axpbypcz, axpy, axpy_ctx, copy, dot, dotc, fill, nrm1, nrm2,
        nrm2_ctx, nrmmax, nrmmax_ctx, scal, xmy,
    };

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn reductions() {
        let x = Vector::from_shape([4], [1.0_f64, -4.0, 3.0, 4.0]);

        assert_eq!(amax(x.view()).unwrap(), 1);
        assert_relative_eq!(asum(x.view()).unwrap(), 12.0);
        assert_relative_eq!(nrm1(x.view()).unwrap(), 12.0);
        assert_relative_eq!(nrm2(x.view()).unwrap(), 42.0_f64.sqrt());
        assert_relative_eq!(nrmmax(x.view()).unwrap(), 4.0);
    }

    #[test]
    fn complex_norms() {
        let x = Vector::from_shape([2], [c(3.0, 4.0), c(0.0, -1.0)]);

        // abs1 for asum, modulus for nrm1
        assert_relative_eq!(asum(x.view()).unwrap(), 8.0);
        assert_relative_eq!(nrm1(x.view()).unwrap(), 6.0);
        assert_relative_eq!(nrm2(x.view()).unwrap(), 26.0_f64.sqrt());
        assert_relative_eq!(nrmmax(x.view()).unwrap(), 5.0);
    }

    #[test]
    fn empty() {
        let x = Vector::from_shape([0], [0.0_f64; 0]);
        assert_eq!(amax(x.view()).unwrap(), 0);
        assert_eq!(nrmmax(x.view()).unwrap(), 0.0);
        assert_eq!(dot(x.view(), x.view()).unwrap(), 0.0);
    }

    #[test]
    fn axpy_and_operators() {
        let x = Vector::from_shape([3], [1.0_f64, 2.0, 3.0]);
        let mut y = Vector::from_shape([3], [10.0_f64, 20.0, 30.0]);

        axpy(2.0, x.view(), y.view_mut()).unwrap();
        assert_eq!(y.data, [12.0, 24.0, 36.0]);

        y += x.view();
        assert_eq!(y.data, [13.0, 26.0, 39.0]);

        y *= 2.0;
        assert_eq!(y.data, [26.0, 52.0, 78.0]);

        let z = x.view() * 3.0;
        assert_eq!(z.into_inner().into_std(), vec![3.0, 6.0, 9.0]);
    }

    #[test]
    fn combinations() {
        let x = Vector::from_shape([2], [1.0_f64, 2.0]);
        let y = Vector::from_shape([2], [3.0_f64, 4.0]);
        let z = Vector::from_shape([2], [5.0_f64, 6.0]);
        let mut out = Vector::from_shape([2], [0.0_f64; 2]);

        axpby(2.0, x.view(), -1.0, y.view(), out.view_mut()).unwrap();
        assert_eq!(out.data, [-1.0, 0.0]);

        axpbypcz(1.0, x.view(), 1.0, y.view(), 0.5, z.view(), out.view_mut()).unwrap();
        assert_eq!(out.data, [6.5, 9.0]);

        xmy(x.view(), y.view(), out.view_mut()).unwrap();
        assert_eq!(out.data, [3.0, 8.0]);

        copy(z.view(), out.view_mut()).unwrap();
        assert_eq!(out.data, [5.0, 6.0]);

        fill(out.view_mut(), 7.0).unwrap();
        assert_eq!(out.data, [7.0, 7.0]);
    }

    #[test]
    fn scal_zero_clears_nan() {
        let mut x = Vector::from_shape([2], [f64::NAN, 1.0]);
        scal(0.0, x.view_mut()).unwrap();
        assert_eq!(x.data, [0.0, 0.0]);
    }

    #[test]
    fn dot_conjugation() {
        let x = Vector::from_shape([2], [c(1.0, 1.0), c(0.0, 2.0)]);
        let y = Vector::from_shape([2], [c(1.0, 0.0), c(1.0, 1.0)]);

        // (1+i) + 2i(1+i) = -1 + 3i
        assert_eq!(dot(x.view(), y.view()).unwrap(), c(-1.0, 3.0));
        // (1-i) + -2i(1+i) = 3 - 3i
        assert_eq!(dotc(x.view(), y.view()).unwrap(), c(3.0, -3.0));
    }

    #[test]
    fn strided_row() {
        // 2x3 column major, row 1 is [1, 3, 5] with stride 2
        let a = Tensor::from_shape([2, 3], [0.0_f64, 1.0, 2.0, 3.0, 4.0, 5.0]);
        let row = a.slice_axis(0, 1);
        let ones = Vector::from_shape([3], [1.0_f64; 3]);

        assert_relative_eq!(row.dot(ones.view()).unwrap(), 9.0);
    }

    #[test]
    fn length_mismatch() {
        let x = Vector::from_shape([2], [1.0_f64, 2.0]);
        let mut y = Vector::from_shape([3], [0.0_f64; 3]);

        let err = axpy(1.0, x.view(), y.view_mut()).unwrap_err();
        assert!(matches!(err, BlasError::ShapeMismatch { op: "axpy", .. }));
    }

    #[test]
    fn explicit_cpu_context() {
        let x = Vector::from_shape([3], [1.0_f64, -5.0, 2.0]);
        let mut y = Vector::from_shape([3], [1.0_f64; 3]);

        assert_eq!(amax_ctx(CpuContext, x.view()).unwrap(), 1);
        assert_relative_eq!(nrmmax_ctx(CpuContext, x.view()).unwrap(), 5.0);
        assert_relative_eq!(nrm2_ctx(CpuContext, x.view()).unwrap(), 30.0_f64.sqrt());

        axpy_ctx(CpuContext, 2.0, x.view(), y.view_mut()).unwrap();
        assert_eq!(y.data, [3.0, -9.0, 5.0]);

        assert_relative_eq!(x.dot_using(y.view(), CpuContext).unwrap(), 58.0);

        y.scale_using(0.5, CpuContext).unwrap();
        assert_eq!(y.data, [1.5, -4.5, 2.5]);
    }
}
