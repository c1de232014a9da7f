use std::mem::MaybeUninit;

use denseblas_sys::{
    device::{DefaultDeviceAllocator, Device, DeviceAllocator},
    DefaultVec, Vec, View,
};
use log::trace;
use num_traits::{One, Zero};

use crate::{
    blas::{BLASContext, DefaultBLASContext, Diag, MatrixOp, Side, UpLo, BLAS2, BLAS3},
    error::{BlasError, BlasResult},
    storage::Storage,
};

use super::{Slice, Tensor, UninitVector, Vector, VectorView, VectorViewMut, ViewOf};

/// A 2-dimensional tensor
pub type Matrix<S> = Tensor<S, [usize; 2]>;

/// A 'view' of a matrix, Like `&[T]` is to `Vec<T>`
pub type MatrixView<'a, T, D> = Matrix<&'a Slice<T, D>>;

/// A 'mut view' of a matrix, Like `&mut [T]` is to `Vec<T>`
pub type MatrixViewMut<'a, T, D> = Matrix<&'a mut Slice<T, D>>;

/// An uninit matrix. Contents are mutable and specified as [`MaybeUninit`].
pub type UninitMatrix<'a, T, D> = MatrixViewMut<'a, MaybeUninit<T>, D>;

impl<S: Storage> Matrix<S> {
    /// Multiply two matricies together.
    ///
    /// # Errors
    /// If the inner dimensions do not agree or an operand has no unit stride
    pub fn dot(&self, rhs: Matrix<&ViewOf<S>>) -> BlasResult<Matrix<DefaultVec<S::T, S::Device>>>
    where
        S::Device: DefaultDeviceAllocator + DefaultBLASContext,
        S::T: BLAS3<<S::Device as DefaultBLASContext>::Context>,
    {
        self.dot_using(rhs, <S::Device as DefaultBLASContext>::default_ctx())
    }

    /// Multiply two matricies together, using the specified [`BLASContext`]
    ///
    /// # Errors
    /// If the inner dimensions do not agree or an operand has no unit stride
    pub fn dot_using<C: BLASContext<Device = S::Device>>(
        &self,
        rhs: Matrix<&ViewOf<S>>,
        ctx: C,
    ) -> BlasResult<Matrix<DefaultVec<S::T, S::Device>>>
    where
        S::Device: DefaultDeviceAllocator,
        S::T: BLAS3<C>,
    {
        self.dot_into(rhs, ctx, Default::default())
    }

    /// Multiply two matricies together, using the provided [`DeviceAllocator`], using the specified [`BLASContext`]
    ///
    /// # Errors
    /// If the inner dimensions do not agree or an operand has no unit stride
    pub fn dot_into<C: BLASContext<Device = S::Device>, A: DeviceAllocator<Device = S::Device>>(
        &self,
        rhs: Matrix<&ViewOf<S>>,
        ctx: C,
        alloc: A,
    ) -> BlasResult<Matrix<Vec<S::T, A>>>
    where
        S::T: BLAS3<C>,
    {
        let rows = self.shape[0];
        let cols = rhs.shape[1];
        let mut v = Vec::with_capacity_in(rows * cols, alloc);
        unsafe {
            let uninit =
                Matrix::from_shape([rows, cols], &mut v.space_capacity_mut()[..rows * cols]);

            gemm_uninit_ctx(ctx, S::T::one(), self.view(), rhs, uninit)?;

            v.set_len(rows * cols);
        }
        Ok(Matrix::from_shape([rows, cols], v))
    }

    /// Multiply the matrix with a vector.
    ///
    /// # Errors
    /// If the vector length does not match the columns of the matrix
    pub fn dot_vector(
        &self,
        rhs: Vector<&ViewOf<S>>,
    ) -> BlasResult<Vector<DefaultVec<S::T, S::Device>>>
    where
        S::Device: DefaultDeviceAllocator + DefaultBLASContext,
        S::T: BLAS2<<S::Device as DefaultBLASContext>::Context>,
    {
        self.dot_vector_using(rhs, <S::Device as DefaultBLASContext>::default_ctx())
    }

    /// Multiply the matrix with a vector, using the specified [`BLASContext`]
    ///
    /// # Errors
    /// If the vector length does not match the columns of the matrix
    pub fn dot_vector_using<C: BLASContext<Device = S::Device>>(
        &self,
        rhs: Vector<&ViewOf<S>>,
        ctx: C,
    ) -> BlasResult<Vector<DefaultVec<S::T, S::Device>>>
    where
        S::Device: DefaultDeviceAllocator,
        S::T: BLAS2<C>,
    {
        let rows = self.shape[0];
        let mut v = Vec::with_capacity_in(rows, Default::default());
        unsafe {
            let uninit: UninitVector<S::T, S::Device> =
                Vector::from_shape([rows], &mut v.space_capacity_mut()[..rows]);

            // beta == 0 never reads y
            gemv_ctx(
                ctx,
                S::T::one(),
                self.view(),
                rhs,
                S::T::zero(),
                uninit.assume_init(),
            )?;

            v.set_len(rows);
        }
        Ok(Vector::from_shape([rows], v))
    }
}

/// Which way round a matrix is stored, and its leading dimension.
///
/// A matrix whose first stride is 1 is column-major and passed as is.
/// One whose second stride is 1 is the transpose of a column-major matrix.
///
/// The stride of an axis of length 1 never addresses a second element, so it is ignored.
/// Row and column vectors therefore resolve to `NoTrans` however they were produced.
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
fn lead(op: &'static str, shape: [usize; 2], strides: [usize; 2]) -> BlasResult<(MatrixOp, i32)> {
    let [rows, cols] = shape;
    let [s0, s1] = strides;
    let col_major = (rows <= 1 || s0 == 1) && (cols <= 1 || s1 >= rows);
    let row_major = (cols <= 1 || s1 == 1) && (rows <= 1 || s0 >= cols);
    if col_major {
        let ld = if cols <= 1 { rows } else { s1 };
        Ok((MatrixOp::NoTrans, ld.max(rows).max(1) as i32))
    } else if row_major {
        let ld = if rows <= 1 { cols } else { s0 };
        Ok((MatrixOp::Trans, ld.max(cols).max(1) as i32))
    } else {
        Err(BlasError::NonContiguous { op, strides })
    }
}

fn square(op: &'static str, shape: [usize; 2]) -> BlasResult<usize> {
    let [rows, cols] = shape;
    if rows == cols {
        Ok(rows)
    } else {
        Err(BlasError::NotSquare { op, rows, cols })
    }
}

fn check(op: &'static str, expected: &[usize], got: &[usize]) -> BlasResult<()> {
    if expected == got {
        Ok(())
    } else {
        Err(BlasError::shape(op, expected, got))
    }
}

fn flip_if(trans: MatrixOp, uplo: UpLo) -> UpLo {
    match trans {
        MatrixOp::NoTrans => uplo,
        MatrixOp::Trans | MatrixOp::ConjTrans => uplo.flip(),
    }
}

// level 2

/// Performs the matrix-vector product.
/// > y = alpha * A * x + beta * y.
///
/// Uses the default [`BLASContext`] for the device.
pub fn gemv<F: BLAS2<D::Context>, D: DefaultBLASContext>(
    alpha: F,
    a: MatrixView<F, D>,
    x: VectorView<F, D>,
    beta: F,
    y: VectorViewMut<F, D>,
) -> BlasResult<()> {
    gemv_ctx(D::Context::default(), alpha, a, x, beta, y)
}

/// Performs the matrix-vector product.
/// > y = alpha * A * x + beta * y.
///
/// When `beta` is zero, `y` is not read.
///
/// # Errors
/// If the shapes do not agree or `A` has no unit stride
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation, clippy::needless_pass_by_value)]
pub fn gemv_ctx<F: BLAS2<C>, C: BLASContext<Device = D>, D: Device>(
    ctx: C,
    alpha: F,
    a: MatrixView<F, D>,
    x: VectorView<F, D>,
    beta: F,
    mut y: VectorViewMut<F, D>,
) -> BlasResult<()> {
    let [rows, cols] = a.shape;
    check("gemv", &[cols], &x.shape)?;
    check("gemv", &[rows], &y.shape)?;

    let incy = y.inc();
    if rows == 0 {
        return Ok(());
    }
    if cols == 0 {
        let n = rows as i32;
        return unsafe {
            if beta.is_zero() {
                F::fill(ctx, n, beta, y.data.as_mut_ptr(), incy)
            } else {
                F::scal(ctx, n, beta, y.data.as_mut_ptr(), incy)
            }
        };
    }

    let (trans, lda) = lead("gemv", a.shape, a.strides)?;
    let (m, n) = match trans {
        MatrixOp::NoTrans => (rows, cols),
        MatrixOp::Trans | MatrixOp::ConjTrans => (cols, rows),
    };
    trace!("gemv trans={trans:?} m={m} n={n}");

    unsafe {
        F::gemv(
            ctx,
            trans,
            m as i32,
            n as i32,
            alpha,
            a.data.as_ptr(),
            lda,
            x.data.as_ptr(),
            x.inc(),
            beta,
            y.data.as_mut_ptr(),
            incy,
        )
    }
}

/// Performs the rank-1 update.
/// > A = alpha * x * yᵀ + A.
///
/// Uses the default [`BLASContext`] for the device.
pub fn ger<F: BLAS2<D::Context>, D: DefaultBLASContext>(
    alpha: F,
    x: VectorView<F, D>,
    y: VectorView<F, D>,
    a: MatrixViewMut<F, D>,
) -> BlasResult<()> {
    ger_ctx(D::Context::default(), alpha, x, y, a)
}

/// Performs the rank-1 update.
/// > A = alpha * x * yᵀ + A.
///
/// # Errors
/// If the shapes do not agree or `A` has no unit stride
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation, clippy::needless_pass_by_value)]
pub fn ger_ctx<F: BLAS2<C>, C: BLASContext<Device = D>, D: Device>(
    ctx: C,
    alpha: F,
    x: VectorView<F, D>,
    y: VectorView<F, D>,
    mut a: MatrixViewMut<F, D>,
) -> BlasResult<()> {
    let [rows, cols] = a.shape;
    check("ger", &[rows, cols], &[x.shape[0], y.shape[0]])?;
    if rows == 0 || cols == 0 {
        return Ok(());
    }

    let (trans, lda) = lead("ger", a.shape, a.strides)?;
    trace!("ger trans={trans:?} m={rows} n={cols}");

    // the transpose is stored, so update it with y * xᵀ instead
    let ((m, x, incx), (n, y, incy)) = match trans {
        MatrixOp::NoTrans => ((rows, &x, x.inc()), (cols, &y, y.inc())),
        MatrixOp::Trans | MatrixOp::ConjTrans => ((cols, &y, y.inc()), (rows, &x, x.inc())),
    };

    unsafe {
        F::ger(
            ctx,
            m as i32,
            n as i32,
            alpha,
            x.data.as_ptr(),
            incx,
            y.data.as_ptr(),
            incy,
            a.data.as_mut_ptr(),
            lda,
        )
    }
}

/// Performs the symmetric matrix-vector product, reading only the `uplo` triangle of `A`.
/// > y = alpha * A * x + beta * y.
///
/// Uses the default [`BLASContext`] for the device.
pub fn symv<F: BLAS2<D::Context>, D: DefaultBLASContext>(
    uplo: UpLo,
    alpha: F,
    a: MatrixView<F, D>,
    x: VectorView<F, D>,
    beta: F,
    y: VectorViewMut<F, D>,
) -> BlasResult<()> {
    symv_ctx(D::Context::default(), uplo, alpha, a, x, beta, y)
}

/// Performs the symmetric matrix-vector product, reading only the `uplo` triangle of `A`.
/// > y = alpha * A * x + beta * y.
///
/// # Errors
/// If `A` is not square, the shapes do not agree or `A` has no unit stride
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation, clippy::needless_pass_by_value)]
pub fn symv_ctx<F: BLAS2<C>, C: BLASContext<Device = D>, D: Device>(
    ctx: C,
    uplo: UpLo,
    alpha: F,
    a: MatrixView<F, D>,
    x: VectorView<F, D>,
    beta: F,
    mut y: VectorViewMut<F, D>,
) -> BlasResult<()> {
    let n = square("symv", a.shape)?;
    check("symv", &[n], &x.shape)?;
    check("symv", &[n], &y.shape)?;
    if n == 0 {
        return Ok(());
    }

    let (trans, lda) = lead("symv", a.shape, a.strides)?;
    let uplo = flip_if(trans, uplo);
    trace!("symv uplo={uplo:?} n={n}");

    let incy = y.inc();
    unsafe {
        F::symv(
            ctx,
            uplo,
            n as i32,
            alpha,
            a.data.as_ptr(),
            lda,
            x.data.as_ptr(),
            x.inc(),
            beta,
            y.data.as_mut_ptr(),
            incy,
        )
    }
}

/// Performs the symmetric rank-1 update, writing only the `uplo` triangle of `A`.
/// > A = alpha * x * xᵀ + A.
///
/// Uses the default [`BLASContext`] for the device.
pub fn syr<F: BLAS2<D::Context>, D: DefaultBLASContext>(
    uplo: UpLo,
    alpha: F,
    x: VectorView<F, D>,
    a: MatrixViewMut<F, D>,
) -> BlasResult<()> {
    syr_ctx(D::Context::default(), uplo, alpha, x, a)
}

/// Performs the symmetric rank-1 update, writing only the `uplo` triangle of `A`.
/// > A = alpha * x * xᵀ + A.
///
/// # Errors
/// If `A` is not square, the shapes do not agree or `A` has no unit stride
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation, clippy::needless_pass_by_value)]
pub fn syr_ctx<F: BLAS2<C>, C: BLASContext<Device = D>, D: Device>(
    ctx: C,
    uplo: UpLo,
    alpha: F,
    x: VectorView<F, D>,
    mut a: MatrixViewMut<F, D>,
) -> BlasResult<()> {
    let n = square("syr", a.shape)?;
    check("syr", &[n], &x.shape)?;
    if n == 0 {
        return Ok(());
    }

    let (trans, lda) = lead("syr", a.shape, a.strides)?;
    let uplo = flip_if(trans, uplo);
    trace!("syr uplo={uplo:?} n={n}");

    unsafe {
        F::syr(
            ctx,
            uplo,
            n as i32,
            alpha,
            x.data.as_ptr(),
            x.inc(),
            a.data.as_mut_ptr(),
            lda,
        )
    }
}

/// Performs the triangular matrix-vector product in place.
/// > x = A * x.
///
/// Uses the default [`BLASContext`] for the device.
pub fn trmv<F: BLAS2<D::Context>, D: DefaultBLASContext>(
    uplo: UpLo,
    diag: Diag,
    a: MatrixView<F, D>,
    x: VectorViewMut<F, D>,
) -> BlasResult<()> {
    trmv_ctx(D::Context::default(), uplo, diag, a, x)
}

/// Performs the triangular matrix-vector product in place.
/// > x = A * x.
///
/// # Errors
/// If `A` is not square, the shapes do not agree or `A` has no unit stride
pub fn trmv_ctx<F: BLAS2<C>, C: BLASContext<Device = D>, D: Device>(
    ctx: C,
    uplo: UpLo,
    diag: Diag,
    a: MatrixView<F, D>,
    x: VectorViewMut<F, D>,
) -> BlasResult<()> {
    triangular_mv("trmv", ctx, uplo, diag, a, x, F::trmv)
}

/// Solves the triangular system `A * x = b` in place, `x` holds `b` on entry.
///
/// Uses the default [`BLASContext`] for the device.
pub fn trsv<F: BLAS2<D::Context>, D: DefaultBLASContext>(
    uplo: UpLo,
    diag: Diag,
    a: MatrixView<F, D>,
    x: VectorViewMut<F, D>,
) -> BlasResult<()> {
    trsv_ctx(D::Context::default(), uplo, diag, a, x)
}

/// Solves the triangular system `A * x = b` in place, `x` holds `b` on entry.
///
/// A singular `A` is not detected.
///
/// # Errors
/// If `A` is not square, the shapes do not agree or `A` has no unit stride
pub fn trsv_ctx<F: BLAS2<C>, C: BLASContext<Device = D>, D: Device>(
    ctx: C,
    uplo: UpLo,
    diag: Diag,
    a: MatrixView<F, D>,
    x: VectorViewMut<F, D>,
) -> BlasResult<()> {
    triangular_mv("trsv", ctx, uplo, diag, a, x, F::trsv)
}

type TriangularMv<F, C> = unsafe fn(
    C,
    UpLo,
    MatrixOp,
    Diag,
    i32,
    <<C as BLASContext>::Device as Device>::Ptr<F>,
    i32,
    <<C as BLASContext>::Device as Device>::Ptr<F>,
    i32,
) -> BlasResult<()>;

#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation, clippy::needless_pass_by_value)]
fn triangular_mv<F: BLAS2<C>, C: BLASContext<Device = D>, D: Device>(
    op: &'static str,
    ctx: C,
    uplo: UpLo,
    diag: Diag,
    a: MatrixView<F, D>,
    mut x: VectorViewMut<F, D>,
    f: TriangularMv<F, C>,
) -> BlasResult<()> {
    let n = square(op, a.shape)?;
    check(op, &[n], &x.shape)?;
    if n == 0 {
        return Ok(());
    }

    // the transpose of an upper triangle is a lower one
    let (trans, lda) = lead(op, a.shape, a.strides)?;
    let uplo = flip_if(trans, uplo);
    trace!("{op} uplo={uplo:?} trans={trans:?} n={n}");

    let incx = x.inc();
    unsafe {
        f(
            ctx,
            uplo,
            trans,
            diag,
            n as i32,
            a.data.as_ptr(),
            lda,
            x.data.as_mut_ptr(),
            incx,
        )
    }
}

// level 3

/// Performs the basic matmul operation.
/// C = alpha * A * B.
///
/// Uses the default [`BLASContext`] for the device.
pub fn gemm_uninit<F: BLAS3<D::Context>, D: DefaultBLASContext>(
    alpha: F,
    a: MatrixView<F, D>,
    b: MatrixView<F, D>,
    c: UninitMatrix<F, D>,
) -> BlasResult<()> {
    gemm_uninit_ctx(D::Context::default(), alpha, a, b, c)
}

/// Performs the basic matmul operation.
/// C = alpha * A * B.
///
/// # Errors
/// See [`gemm_ctx`]
pub fn gemm_uninit_ctx<F: BLAS3<C>, C: BLASContext<Device = D>, D: Device>(
    ctx: C,
    alpha: F,
    a: MatrixView<F, D>,
    b: MatrixView<F, D>,
    c: UninitMatrix<F, D>,
) -> BlasResult<()> {
    // Safety:
    // Specifying beta == 0.0 should allow c to be safely read while uninitialised
    unsafe { gemm_ctx(ctx, alpha, a, b, F::zero(), c.assume_init()) }
}

/// Performs the basic matmul operation.
/// C = alpha * A * B + beta * C.
///
/// Uses the default [`BLASContext`] for the device.
pub fn gemm<F: BLAS3<D::Context>, D: DefaultBLASContext>(
    alpha: F,
    a: MatrixView<F, D>,
    b: MatrixView<F, D>,
    beta: F,
    c: MatrixViewMut<F, D>,
) -> BlasResult<()> {
    gemm_ctx(D::Context::default(), alpha, a, b, beta, c)
}

/// Performs the basic matmul operation.
/// C = alpha * A * B + beta * C.
///
/// `C` may be a transposed view, which is computed as `Cᵀ = Bᵀ * Aᵀ`.
///
/// # Errors
/// If the shapes do not agree or an operand has no unit stride
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation, clippy::needless_pass_by_value)]
pub fn gemm_ctx<F: BLAS3<C>, C: BLASContext<Device = D>, D: Device>(
    ctx: C,
    alpha: F,
    a: MatrixView<F, D>,
    b: MatrixView<F, D>,
    beta: F,
    mut c: MatrixViewMut<F, D>,
) -> BlasResult<()> {
    let [rowsa, colsa] = a.shape;
    let [rowsb, colsb] = b.shape;
    check("gemm", &[colsa], &[rowsb])?;
    check("gemm", &[rowsa, colsb], &c.shape)?;

    let (m, n, k) = (rowsa, colsb, colsa);
    if m == 0 || n == 0 {
        return Ok(());
    }

    let (transa, lda) = lead("gemm", a.shape, a.strides)?;
    let (transb, ldb) = lead("gemm", b.shape, b.strides)?;
    let (transc, ldc) = lead("gemm", c.shape, c.strides)?;
    trace!("gemm transa={transa:?} transb={transb:?} transc={transc:?} m={m} n={n} k={k}");

    let (a, b) = (a.data.as_ptr(), b.data.as_ptr());
    let c = c.data.as_mut_ptr();
    unsafe {
        match transc {
            MatrixOp::NoTrans => F::gemm(
                ctx, transa, transb, m as i32, n as i32, k as i32, alpha, a, lda, b, ldb, beta,
                c, ldc,
            ),
            MatrixOp::Trans | MatrixOp::ConjTrans => F::gemm(
                ctx,
                transb.toggle(),
                transa.toggle(),
                n as i32,
                m as i32,
                k as i32,
                alpha,
                b,
                ldb,
                a,
                lda,
                beta,
                c,
                ldc,
            ),
        }
    }
}

/// Performs the symmetric matmul, reading only the `uplo` triangle of `A`.
/// > C = alpha * A * B + beta * C (Left) or C = alpha * B * A + beta * C (Right).
///
/// Uses the default [`BLASContext`] for the device.
pub fn symm<F: BLAS3<D::Context>, D: DefaultBLASContext>(
    side: Side,
    uplo: UpLo,
    alpha: F,
    a: MatrixView<F, D>,
    b: MatrixView<F, D>,
    beta: F,
    c: MatrixViewMut<F, D>,
) -> BlasResult<()> {
    symm_ctx(D::Context::default(), side, uplo, alpha, a, b, beta, c)
}

/// Performs the symmetric matmul, reading only the `uplo` triangle of `A`.
/// > C = alpha * A * B + beta * C (Left) or C = alpha * B * A + beta * C (Right).
///
/// # Errors
/// If `A` is not square, the shapes do not agree, an operand has no unit stride
/// or `B` and `C` are stored differently
#[allow(
    clippy::too_many_arguments,
    clippy::cast_possible_wrap,
    clippy::cast_possible_truncation,
    clippy::needless_pass_by_value
)]
pub fn symm_ctx<F: BLAS3<C>, C: BLASContext<Device = D>, D: Device>(
    ctx: C,
    side: Side,
    uplo: UpLo,
    alpha: F,
    a: MatrixView<F, D>,
    b: MatrixView<F, D>,
    beta: F,
    mut c: MatrixViewMut<F, D>,
) -> BlasResult<()> {
    let na = square("symm", a.shape)?;
    let [m, n] = b.shape;
    check("symm", &b.shape, &c.shape)?;
    match side {
        Side::Left => check("symm", &[m], &[na])?,
        Side::Right => check("symm", &[n], &[na])?,
    }
    if m == 0 || n == 0 {
        return Ok(());
    }

    let (transa, lda) = lead("symm", a.shape, a.strides)?;
    let (transb, ldb) = lead("symm", b.shape, b.strides)?;
    let (transc, ldc) = lead("symm", c.shape, c.strides)?;
    if transb != transc {
        return Err(BlasError::MixedLayout { op: "symm" });
    }
    let uplo = flip_if(transa, uplo);

    // Cᵀ = Bᵀ * A, so a transposed C swaps the side
    let (side, m, n) = match transc {
        MatrixOp::NoTrans => (side, m, n),
        MatrixOp::Trans | MatrixOp::ConjTrans => (side.flip(), n, m),
    };
    trace!("symm side={side:?} uplo={uplo:?} m={m} n={n}");

    unsafe {
        F::symm(
            ctx,
            side,
            uplo,
            m as i32,
            n as i32,
            alpha,
            a.data.as_ptr(),
            lda,
            b.data.as_ptr(),
            ldb,
            beta,
            c.data.as_mut_ptr(),
            ldc,
        )
    }
}

/// Performs the symmetric rank-k update, writing only the `uplo` triangle of `C`.
/// > C = alpha * A * Aᵀ + beta * C.
///
/// Uses the default [`BLASContext`] for the device.
pub fn syrk<F: BLAS3<D::Context>, D: DefaultBLASContext>(
    uplo: UpLo,
    alpha: F,
    a: MatrixView<F, D>,
    beta: F,
    c: MatrixViewMut<F, D>,
) -> BlasResult<()> {
    syrk_ctx(D::Context::default(), uplo, alpha, a, beta, c)
}

/// Performs the symmetric rank-k update, writing only the `uplo` triangle of `C`.
/// > C = alpha * A * Aᵀ + beta * C.
///
/// # Errors
/// If `C` is not square, the shapes do not agree or an operand has no unit stride
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation, clippy::needless_pass_by_value)]
pub fn syrk_ctx<F: BLAS3<C>, C: BLASContext<Device = D>, D: Device>(
    ctx: C,
    uplo: UpLo,
    alpha: F,
    a: MatrixView<F, D>,
    beta: F,
    mut c: MatrixViewMut<F, D>,
) -> BlasResult<()> {
    let n = square("syrk", c.shape)?;
    let [rows, k] = a.shape;
    check("syrk", &[n], &[rows])?;
    if n == 0 {
        return Ok(());
    }

    let (trans, lda) = lead("syrk", a.shape, a.strides)?;
    let (transc, ldc) = lead("syrk", c.shape, c.strides)?;
    let uplo = flip_if(transc, uplo);
    trace!("syrk uplo={uplo:?} trans={trans:?} n={n} k={k}");

    unsafe {
        F::syrk(
            ctx,
            uplo,
            trans,
            n as i32,
            k as i32,
            alpha,
            a.data.as_ptr(),
            lda,
            beta,
            c.data.as_mut_ptr(),
            ldc,
        )
    }
}

/// Performs the symmetric rank-2k update, writing only the `uplo` triangle of `C`.
/// > C = alpha * (A * Bᵀ + B * Aᵀ) + beta * C.
///
/// Uses the default [`BLASContext`] for the device.
pub fn syr2k<F: BLAS3<D::Context>, D: DefaultBLASContext>(
    uplo: UpLo,
    alpha: F,
    a: MatrixView<F, D>,
    b: MatrixView<F, D>,
    beta: F,
    c: MatrixViewMut<F, D>,
) -> BlasResult<()> {
    syr2k_ctx(D::Context::default(), uplo, alpha, a, b, beta, c)
}

/// Performs the symmetric rank-2k update, writing only the `uplo` triangle of `C`.
/// > C = alpha * (A * Bᵀ + B * Aᵀ) + beta * C.
///
/// # Errors
/// If `C` is not square, the shapes do not agree, an operand has no unit stride
/// or `A` and `B` are stored differently
#[allow(
    clippy::too_many_arguments,
    clippy::cast_possible_wrap,
    clippy::cast_possible_truncation,
    clippy::needless_pass_by_value
)]
pub fn syr2k_ctx<F: BLAS3<C>, C: BLASContext<Device = D>, D: Device>(
    ctx: C,
    uplo: UpLo,
    alpha: F,
    a: MatrixView<F, D>,
    b: MatrixView<F, D>,
    beta: F,
    mut c: MatrixViewMut<F, D>,
) -> BlasResult<()> {
    let n = square("syr2k", c.shape)?;
    let [rows, k] = a.shape;
    check("syr2k", &a.shape, &b.shape)?;
    check("syr2k", &[n], &[rows])?;
    if n == 0 {
        return Ok(());
    }

    let (trans, lda) = lead("syr2k", a.shape, a.strides)?;
    let (transb, ldb) = lead("syr2k", b.shape, b.strides)?;
    if trans != transb {
        return Err(BlasError::MixedLayout { op: "syr2k" });
    }
    let (transc, ldc) = lead("syr2k", c.shape, c.strides)?;
    let uplo = flip_if(transc, uplo);
    trace!("syr2k uplo={uplo:?} trans={trans:?} n={n} k={k}");

    unsafe {
        F::syr2k(
            ctx,
            uplo,
            trans,
            n as i32,
            k as i32,
            alpha,
            a.data.as_ptr(),
            lda,
            b.data.as_ptr(),
            ldb,
            beta,
            c.data.as_mut_ptr(),
            ldc,
        )
    }
}

/// Performs the triangular matmul in place.
/// > B = alpha * A * B (Left) or B = alpha * B * A (Right).
///
/// Uses the default [`BLASContext`] for the device.
pub fn trmm<F: BLAS3<D::Context>, D: DefaultBLASContext>(
    side: Side,
    uplo: UpLo,
    diag: Diag,
    alpha: F,
    a: MatrixView<F, D>,
    b: MatrixViewMut<F, D>,
) -> BlasResult<()> {
    trmm_ctx(D::Context::default(), side, uplo, diag, alpha, a, b)
}

/// Performs the triangular matmul in place.
/// > B = alpha * A * B (Left) or B = alpha * B * A (Right).
///
/// # Errors
/// If `A` is not square, the shapes do not agree or an operand has no unit stride
pub fn trmm_ctx<F: BLAS3<C>, C: BLASContext<Device = D>, D: Device>(
    ctx: C,
    side: Side,
    uplo: UpLo,
    diag: Diag,
    alpha: F,
    a: MatrixView<F, D>,
    b: MatrixViewMut<F, D>,
) -> BlasResult<()> {
    triangular_mm("trmm", ctx, side, uplo, diag, alpha, a, b, F::trmm)
}

/// Solves the triangular system `A * X = alpha * B` (Left) or
/// `X * A = alpha * B` (Right) in place, `B` is overwritten with `X`.
///
/// Uses the default [`BLASContext`] for the device.
pub fn trsm<F: BLAS3<D::Context>, D: DefaultBLASContext>(
    side: Side,
    uplo: UpLo,
    diag: Diag,
    alpha: F,
    a: MatrixView<F, D>,
    b: MatrixViewMut<F, D>,
) -> BlasResult<()> {
    trsm_ctx(D::Context::default(), side, uplo, diag, alpha, a, b)
}

/// Solves the triangular system `A * X = alpha * B` (Left) or
/// `X * A = alpha * B` (Right) in place, `B` is overwritten with `X`.
///
/// A singular `A` is not detected.
///
/// # Errors
/// If `A` is not square, the shapes do not agree or an operand has no unit stride
pub fn trsm_ctx<F: BLAS3<C>, C: BLASContext<Device = D>, D: Device>(
    ctx: C,
    side: Side,
    uplo: UpLo,
    diag: Diag,
    alpha: F,
    a: MatrixView<F, D>,
    b: MatrixViewMut<F, D>,
) -> BlasResult<()> {
    triangular_mm("trsm", ctx, side, uplo, diag, alpha, a, b, F::trsm)
}

type TriangularMm<F, C> = unsafe fn(
    C,
    Side,
    UpLo,
    MatrixOp,
    Diag,
    i32,
    i32,
    F,
    <<C as BLASContext>::Device as Device>::Ptr<F>,
    i32,
    <<C as BLASContext>::Device as Device>::Ptr<F>,
    i32,
) -> BlasResult<()>;

#[allow(
    clippy::too_many_arguments,
    clippy::cast_possible_wrap,
    clippy::cast_possible_truncation,
    clippy::needless_pass_by_value
)]
fn triangular_mm<F: BLAS3<C>, C: BLASContext<Device = D>, D: Device>(
    op: &'static str,
    ctx: C,
    side: Side,
    uplo: UpLo,
    diag: Diag,
    alpha: F,
    a: MatrixView<F, D>,
    mut b: MatrixViewMut<F, D>,
    f: TriangularMm<F, C>,
) -> BlasResult<()> {
    let na = square(op, a.shape)?;
    let [m, n] = b.shape;
    match side {
        Side::Left => check(op, &[m], &[na])?,
        Side::Right => check(op, &[n], &[na])?,
    }
    if m == 0 || n == 0 {
        return Ok(());
    }

    let (transa, lda) = lead(op, a.shape, a.strides)?;
    let uplo = flip_if(transa, uplo);
    let (transb, ldb) = lead(op, b.shape, b.strides)?;

    // (A * B)ᵀ = Bᵀ * Aᵀ, so a transposed B swaps the side and the op on A
    let (side, transa, m, n) = match transb {
        MatrixOp::NoTrans => (side, transa, m, n),
        MatrixOp::Trans | MatrixOp::ConjTrans => (side.flip(), transa.toggle(), n, m),
    };
    trace!("{op} side={side:?} uplo={uplo:?} transa={transa:?} m={m} n={n}");

    unsafe {
        f(
            ctx,
            side,
            uplo,
            transa,
            diag,
            m as i32,
            n as i32,
            alpha,
            a.data.as_ptr(),
            lda,
            b.data.as_mut_ptr(),
            ldb,
        )
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use denseblas_sys::{device::cpu::CpuAlloc, View, ViewMut};
    use num_complex::Complex64;

    use crate::{
        blas::{cpu::CpuContext, Diag, MatrixOp, Side, UpLo},
        error::BlasError,
        tensor::{Tensor, Vector},
    };

    use super::{
        gemm, gemm_ctx, gemv, gemv_ctx, ger, lead, symm, symv, syr, syr2k, syrk, trmm, trmv, trsm,
        trsv, trsv_ctx, Matrix,
    };

    #[test]
    fn matmul() {
        //     0 1
        // A = 2 3
        //     4 5

        // B = 0 1
        //     2 3

        // column major (read each column first)
        let a = [0., 2., 4., 1., 3., 5.];
        let b = [0., 2., 1., 3.];

        let a = Tensor::from_shape([3, 2], a); // 3 rows x 2 cols
        let b = Tensor::from_shape([2, 2], b); // 2 rows x 2 cols

        //           2  3
        // C = AB = 6 11
        //          10 19

        let c = a.dot(b.view()).unwrap();
        assert_eq!(c.into_inner().into_std(), [2., 6., 10., 3., 11., 19.]);
    }

    #[test]
    fn matmul_t() {
        // A = 1 3
        //     2 4

        // B = 5 7
        //     6 8

        let a = [1., 2., 3., 4.];
        let b = [5., 6., 7., 8.];

        let a = Tensor::from_shape([2, 2], a);
        let b = Tensor::from_shape([2, 2], b);

        // C1 = A^B^ = 19 22
        //             43 50

        let c1 = a.t().dot(b.t()).unwrap();
        assert_eq!(c1.into_inner().into_std(), [19.0, 43.0, 22.0, 50.0]);

        // C2 = AB^ = 26 30
        //            38 44

        let c2 = a.dot(b.t()).unwrap();
        assert_eq!(c2.into_inner().into_std(), [26.0, 38.0, 30.0, 44.0]);

        // C3 = A^B = 17 23
        //            39 53

        let c3 = a.t().dot(b.view()).unwrap();
        assert_eq!(c3.into_inner().into_std(), [17.0, 39.0, 23.0, 53.0]);
    }

    #[test]
    fn matmul_complex() {
        let i = Complex64::i();
        let one = Complex64::new(1.0, 0.0);

        // [i 1] * [i]  = [i*i + 1*1] = [0]
        //          [1]
        let a = Tensor::from_shape([1, 2], [i, one]);
        let b = Tensor::from_shape([2, 1], [i, one]);

        let c = a.dot(b.view()).unwrap();
        assert_eq!(c.into_inner().into_std(), [Complex64::new(0.0, 0.0)]);
    }

    #[test]
    fn gemm_into_transposed_c() {
        let a = Tensor::from_shape([2, 2], [1., 2., 3., 4.]);
        let b = Tensor::from_shape([2, 2], [5., 6., 7., 8.]);
        let mut c = Tensor::from_shape([2, 2], [0.0_f64; 4]);

        // C^ = AB = 23 31
        //           34 46
        let mut ct = c.view_mut();
        ct.reverse_axes();
        gemm(1.0, a.view(), b.view(), 0.0, ct).unwrap();
        assert_eq!(c.data, [23.0, 31.0, 34.0, 46.0]);
    }

    #[test]
    fn gemm_beta_zero_ignores_nan() {
        let a = Tensor::from_shape([1, 1], [2.0_f64]);
        let b = Tensor::from_shape([1, 1], [3.0_f64]);
        let mut c = Tensor::from_shape([1, 1], [f64::NAN]);

        gemm(1.0, a.view(), b.view(), 0.0, c.view_mut()).unwrap();
        assert_eq!(c.data, [6.0]);
    }

    #[test]
    fn gemm_shape_errors() {
        let a = Tensor::from_shape([2, 3], [0.0_f64; 6]);
        let b = Tensor::from_shape([2, 2], [0.0_f64; 4]);

        assert_eq!(a.dot(b.view()).err(), Some(BlasError::shape("gemm", &[3], &[2])));
    }

    #[test]
    fn non_contiguous() {
        // a row of a 3d tensor has no unit stride in either axis
        let t = Tensor::from_shape([2, 2, 2], [0.0_f64; 8]);
        let a = t.slice_axis(0, 0);
        let b = Tensor::from_shape([2, 2], [0.0_f64; 4]);

        assert!(matches!(
            a.dot(b.view()),
            Err(BlasError::NonContiguous {
                op: "gemm",
                strides: [2, 4]
            })
        ));
    }

    #[test]
    fn matvec() {
        let a = Tensor::from_shape([2, 3], [1., 4., 2., 5., 3., 6.]);
        let x = Vector::from_shape([3], [1., 1., 1.]);

        let y = a.dot_vector(x.view()).unwrap();
        assert_eq!(y.into_inner().into_std(), [6.0, 15.0]);

        let z = Vector::from_shape([2], [1., -1.]);
        let mut out = Vector::from_shape([3], [1.0_f64; 3]);
        gemv(2.0, a.t(), z.view(), 1.0, out.view_mut()).unwrap();
        assert_eq!(out.data, [-5.0, -5.0, -5.0]);
    }

    #[test]
    fn gemv_empty_columns() {
        let a = Matrix::from_shape([2, 0], [0.0_f64; 0]);
        let x = Vector::from_shape([0], [0.0_f64; 0]);
        let mut y = Vector::from_shape([2], [f64::NAN, 1.0]);

        gemv(1.0, a.view(), x.view(), 0.0, y.view_mut()).unwrap();
        assert_eq!(y.data, [0.0, 0.0]);
    }

    #[test]
    fn rank_updates() {
        let x = Vector::from_shape([2], [1., 2.]);
        let y = Vector::from_shape([3], [1., 0., -1.]);
        let mut a = Tensor::from_shape([2, 3], [0.0_f64; 6]);

        ger(1.0, x.view(), y.view(), a.view_mut()).unwrap();
        assert_eq!(a.data, [1., 2., 0., 0., -1., -2.]);

        // same update through the transpose
        let mut at = Tensor::from_shape([3, 2], [0.0_f64; 6]);
        let mut view = at.view_mut();
        view.reverse_axes();
        ger(1.0, x.view(), y.view(), view).unwrap();
        assert_eq!(at.data, [1., 0., -1., 2., 0., -2.]);

        let mut s = Tensor::from_shape([2, 2], [0.0_f64; 4]);
        syr(UpLo::Lower, 1.0, x.view(), s.view_mut()).unwrap();
        // upper element is untouched
        assert_eq!(s.data, [1., 2., 0., 4.]);
    }

    #[test]
    fn symmetric_matvec() {
        // only the upper triangle is valid, the rest is garbage
        let a = Tensor::from_shape([2, 2], [1., 99., 2., 3.]);
        let x = Vector::from_shape([2], [1., 1.]);
        let mut y = Vector::from_shape([2], [0.0_f64; 2]);

        symv(UpLo::Upper, 1.0, a.view(), x.view(), 0.0, y.view_mut()).unwrap();
        assert_eq!(y.data, [3., 5.]);

        // the transposed view keeps the valid triangle in its lower half
        symv(UpLo::Lower, 1.0, a.t(), x.view(), 0.0, y.view_mut()).unwrap();
        assert_eq!(y.data, [3., 5.]);
    }

    #[test]
    fn triangular_vector() {
        // A = 2 1
        //     0 4
        let a = Tensor::from_shape([2, 2], [2., 0., 1., 4.]);
        let mut x = Vector::from_shape([2], [1., 1.]);

        trmv(UpLo::Upper, Diag::NonUnit, a.view(), x.view_mut()).unwrap();
        assert_eq!(x.data, [3., 4.]);

        trsv(UpLo::Upper, Diag::NonUnit, a.view(), x.view_mut()).unwrap();
        assert_relative_eq!(x.data[..], [1., 1.][..]);

        // A^ = 2 0
        //      1 4
        trmv(UpLo::Lower, Diag::NonUnit, a.t(), x.view_mut()).unwrap();
        assert_eq!(x.data, [2., 5.]);

        trmv(UpLo::Upper, Diag::Unit, a.view(), x.view_mut()).unwrap();
        assert_eq!(x.data, [7., 5.]);
    }

    #[test]
    fn not_square() {
        let a = Tensor::from_shape([2, 3], [0.0_f64; 6]);
        let mut x = Vector::from_shape([3], [0.0_f64; 3]);

        let err = trmv(UpLo::Upper, Diag::Unit, a.view(), x.view_mut()).unwrap_err();
        assert_eq!(
            err,
            BlasError::NotSquare {
                op: "trmv",
                rows: 2,
                cols: 3
            }
        );
    }

    #[test]
    fn symmetric_matmul() {
        // S = 1 2 (lower triangle stored)
        //     2 3
        let s = Tensor::from_shape([2, 2], [1., 2., -7., 3.]);
        let b = Tensor::from_shape([2, 1], [1., 1.]);
        let mut c = Tensor::from_shape([2, 1], [0.0_f64; 2]);

        symm(Side::Left, UpLo::Lower, 1.0, s.view(), b.view(), 0.0, c.view_mut()).unwrap();
        assert_eq!(c.data, [3., 5.]);

        // row vector from the right, both transposed
        let bt = b.t();
        let mut ct = c.view_mut();
        ct.reverse_axes();
        symm(Side::Right, UpLo::Lower, 1.0, s.view(), bt, 1.0, ct).unwrap();
        assert_eq!(c.data, [6., 10.]);

        // a transposed row vector against a fresh one is the same layout
        let mut d = Tensor::from_shape([1, 2], [0.0_f64; 2]);
        symm(Side::Right, UpLo::Lower, 1.0, s.view(), b.t(), 0.0, d.view_mut()).unwrap();
        assert_eq!(d.data, [3., 5.]);

        let b2 = Tensor::from_shape([2, 2], [1., 0., 0., 1.]);
        let mut c2 = Tensor::from_shape([2, 2], [0.0_f64; 4]);
        let mut c2t = c2.view_mut();
        c2t.reverse_axes();
        let err = symm(Side::Left, UpLo::Lower, 1.0, s.view(), b2.view(), 0.0, c2t).unwrap_err();
        assert_eq!(err, BlasError::MixedLayout { op: "symm" });
    }

    #[test]
    fn degenerate_layouts() {
        // the stride of a length-1 axis is never used
        assert_eq!(lead("gemm", [1, 2], [2, 1]), Ok((MatrixOp::NoTrans, 1)));
        assert_eq!(lead("gemm", [1, 2], [1, 1]), Ok((MatrixOp::NoTrans, 1)));
        assert_eq!(lead("gemm", [2, 1], [1, 2]), Ok((MatrixOp::NoTrans, 2)));
        assert_eq!(lead("gemm", [2, 1], [1, 1]), Ok((MatrixOp::NoTrans, 2)));
        assert_eq!(lead("gemm", [1, 1], [5, 7]), Ok((MatrixOp::NoTrans, 1)));

        // a column taken out of a row-major matrix
        assert_eq!(lead("gemm", [3, 1], [3, 1]), Ok((MatrixOp::Trans, 3)));
        assert_eq!(lead("gemm", [3, 2], [2, 1]), Ok((MatrixOp::Trans, 2)));
        assert_eq!(lead("gemm", [2, 3], [1, 4]), Ok((MatrixOp::NoTrans, 4)));

        assert_eq!(
            lead("gemm", [2, 2], [2, 4]),
            Err(BlasError::NonContiguous {
                op: "gemm",
                strides: [2, 4]
            })
        );
    }

    #[test]
    fn explicit_cpu_context() {
        let a = Tensor::from_shape([2, 2], [2., 0., 1., 4.]);
        let b = Tensor::from_shape([2, 2], [5., 6., 7., 8.]);

        // A B = 16 22
        //       24 32
        let mut c = Tensor::from_shape([2, 2], [0.0_f64; 4]);
        gemm_ctx(CpuContext, 1.0, a.view(), b.view(), 0.0, c.view_mut()).unwrap();
        assert_eq!(c.data, [16., 24., 22., 32.]);

        let c = a.dot_into(b.view(), CpuContext, CpuAlloc).unwrap();
        assert_eq!(c.into_inner().into_std(), [16., 24., 22., 32.]);

        let x = Vector::from_shape([2], [1., 1.]);
        let mut y = Vector::from_shape([2], [0.0_f64; 2]);
        gemv_ctx(CpuContext, 1.0, a.view(), x.view(), 0.0, y.view_mut()).unwrap();
        assert_eq!(y.data, [3., 4.]);

        trsv_ctx(CpuContext, UpLo::Upper, Diag::NonUnit, a.view(), y.view_mut()).unwrap();
        assert_relative_eq!(y.data[..], [1., 1.][..]);

        let y = a.dot_vector_using(x.view(), CpuContext).unwrap();
        assert_eq!(y.into_inner().into_std(), [3., 4.]);
    }

    #[test]
    fn rank_k_updates() {
        let a = Tensor::from_shape([2, 2], [1., 2., 3., 4.]);
        let mut c = Tensor::from_shape([2, 2], [0.0_f64; 4]);

        // A A^ = 10 14
        //        14 20
        syrk(UpLo::Upper, 1.0, a.view(), 0.0, c.view_mut()).unwrap();
        assert_eq!(c.data, [10., 0., 14., 20.]);

        let mut c = Tensor::from_shape([2, 2], [0.0_f64; 4]);
        syrk(UpLo::Lower, 1.0, a.t(), 0.0, c.view_mut()).unwrap();
        // A^ A = 5 11
        //       11 25
        assert_eq!(c.data, [5., 11., 0., 25.]);

        let b = Tensor::from_shape([2, 2], [1., 0., 0., 1.]);
        let mut c = Tensor::from_shape([2, 2], [0.0_f64; 4]);
        // A I + I A^ = 2 5
        //              5 8
        syr2k(UpLo::Upper, 1.0, a.view(), b.view(), 0.0, c.view_mut()).unwrap();
        assert_eq!(c.data, [2., 0., 5., 8.]);

        let err = syr2k(UpLo::Upper, 1.0, a.view(), b.t(), 0.0, c.view_mut()).unwrap_err();
        assert_eq!(err, BlasError::MixedLayout { op: "syr2k" });
    }

    #[test]
    fn triangular_matmul() {
        // L = 1 0
        //     2 1
        let l = Tensor::from_shape([2, 2], [1., 2., 0., 1.]);
        let mut b = Tensor::from_shape([2, 2], [1., 1., 0., 1.]);

        // L B = 1 0
        //       3 1
        trmm(Side::Left, UpLo::Lower, Diag::NonUnit, 1.0, l.view(), b.view_mut()).unwrap();
        assert_eq!(b.data, [1., 3., 0., 1.]);

        trsm(Side::Left, UpLo::Lower, Diag::Unit, 1.0, l.view(), b.view_mut()).unwrap();
        assert_eq!(b.data, [1., 1., 0., 1.]);

        // B^ = 1 1   B^L = 3 1
        //      0 1         2 1
        let mut bt = b.view_mut();
        bt.reverse_axes();
        trmm(Side::Right, UpLo::Lower, Diag::NonUnit, 1.0, l.view(), bt).unwrap();
        assert_eq!(b.data, [3., 1., 2., 1.]);

        // X L = 2 B^  =>  X = 2 2
        //                     0 2
        let mut bt = b.view_mut();
        bt.reverse_axes();
        trsm(Side::Right, UpLo::Lower, Diag::NonUnit, 2.0, l.view(), bt).unwrap();
        assert_relative_eq!(b.data[..], [2., 2., 0., 2.][..]);
    }

    #[cfg(feature = "cublas")]
    #[test]
    fn matmul_cuda() {
        use denseblas_sys::{
            device::cuda::{Context, Cuda},
            DefaultVec,
        };

        use crate::blas::cublas::CublasContext;

        let _ctx = Context::quick_init().unwrap();
        let cublas = CublasContext::new().unwrap();

        let a = DefaultVec::<f32, Cuda>::copy_from_host(&[0., 2., 4., 1., 3., 5.]);
        let b = DefaultVec::<f32, Cuda>::copy_from_host(&[0., 2., 1., 3.]);

        let a = Tensor::from_shape([3, 2], a);
        let b = Tensor::from_shape([2, 2], b);

        let c = a.dot_using(b.view(), &*cublas).unwrap();

        let mut out = [0.0_f32; 6];
        c.data.copy_to_host(&mut out);
        assert_eq!(out, [2., 6., 10., 3., 11., 19.]);
    }
}
