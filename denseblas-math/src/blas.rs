use denseblas_sys::{device::Device, ptr::DPtr};

use crate::error::BlasResult;

pub mod cpu;
mod scalar;

#[cfg(feature = "cublas")]
pub mod cublas;

pub use scalar::Scalar;

/// How a matrix operand is applied
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixOp {
    NoTrans = b'N',
    Trans = b'T',
    ConjTrans = b'C',
}

impl MatrixOp {
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            MatrixOp::NoTrans => MatrixOp::Trans,
            MatrixOp::Trans | MatrixOp::ConjTrans => MatrixOp::NoTrans,
        }
    }
}

/// Which triangle of a symmetric or triangular matrix is referenced
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpLo {
    Upper = b'U',
    Lower = b'L',
}

impl UpLo {
    #[must_use]
    pub fn flip(self) -> Self {
        match self {
            UpLo::Upper => UpLo::Lower,
            UpLo::Lower => UpLo::Upper,
        }
    }
}

/// Whether a triangular matrix has an implicit unit diagonal
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diag {
    NonUnit = b'N',
    Unit = b'U',
}

/// Which side the special matrix multiplies from
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left = b'L',
    Right = b'R',
}

impl Side {
    #[must_use]
    pub fn flip(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A context needed for running BLAS operations
pub trait BLASContext: Clone {
    type Device: Device;
}

/// The default blas context for a device
pub trait DefaultBLASContext: Device {
    type Context: BLASContext<Device = Self> + Default;

    fn default_ctx() -> Self::Context {
        Self::Context::default()
    }
}

type Ptr<F, C> = DPtr<F, <C as BLASContext>::Device>;

/// Vector-vector routines.
///
/// # Safety
/// All methods are calls across an FFI barrier or into raw pointer kernels.
/// Pointers must address at least `1 + (n - 1) * inc` elements on the context's
/// device and sizes must be non-negative.
#[allow(clippy::too_many_arguments)]
pub trait BLAS1<C: BLASContext>: Scalar {
    /// 0-based index of the first element with the largest [`Scalar::abs1`]
    unsafe fn amax(ctx: C, n: i32, x: Ptr<Self, C>, incx: i32) -> BlasResult<usize>;

    unsafe fn asum(ctx: C, n: i32, x: Ptr<Self, C>, incx: i32) -> BlasResult<Self::Real>;

    unsafe fn axpy(
        ctx: C,
        n: i32,
        alpha: Self,
        x: Ptr<Self, C>,
        incx: i32,
        y: Ptr<Self, C>,
        incy: i32,
    ) -> BlasResult<()>;

    /// `out = alpha * x + beta * y`
    unsafe fn axpby(
        ctx: C,
        n: i32,
        alpha: Self,
        x: Ptr<Self, C>,
        incx: i32,
        beta: Self,
        y: Ptr<Self, C>,
        incy: i32,
        out: Ptr<Self, C>,
        inco: i32,
    ) -> BlasResult<()> {
        Self::copy(ctx.clone(), n, y, incy, out, inco)?;
        Self::scal(ctx.clone(), n, beta, out, inco)?;
        Self::axpy(ctx, n, alpha, x, incx, out, inco)
    }

    /// `out = alpha * x + beta * y + gamma * z`
    unsafe fn axpbypcz(
        ctx: C,
        n: i32,
        alpha: Self,
        x: Ptr<Self, C>,
        incx: i32,
        beta: Self,
        y: Ptr<Self, C>,
        incy: i32,
        gamma: Self,
        z: Ptr<Self, C>,
        incz: i32,
        out: Ptr<Self, C>,
        inco: i32,
    ) -> BlasResult<()> {
        Self::copy(ctx.clone(), n, z, incz, out, inco)?;
        Self::scal(ctx.clone(), n, gamma, out, inco)?;
        Self::axpy(ctx.clone(), n, beta, y, incy, out, inco)?;
        Self::axpy(ctx, n, alpha, x, incx, out, inco)
    }

    /// `out[i] = x[i] * y[i]`
    unsafe fn xmy(
        ctx: C,
        n: i32,
        x: Ptr<Self, C>,
        incx: i32,
        y: Ptr<Self, C>,
        incy: i32,
        out: Ptr<Self, C>,
        inco: i32,
    ) -> BlasResult<()>;

    unsafe fn copy(
        ctx: C,
        n: i32,
        x: Ptr<Self, C>,
        incx: i32,
        y: Ptr<Self, C>,
        incy: i32,
    ) -> BlasResult<()>;

    unsafe fn dot(
        ctx: C,
        n: i32,
        x: Ptr<Self, C>,
        incx: i32,
        y: Ptr<Self, C>,
        incy: i32,
    ) -> BlasResult<Self>;

    /// Dot product with `x` conjugated
    unsafe fn dotc(
        ctx: C,
        n: i32,
        x: Ptr<Self, C>,
        incx: i32,
        y: Ptr<Self, C>,
        incy: i32,
    ) -> BlasResult<Self>;

    unsafe fn fill(ctx: C, n: i32, alpha: Self, x: Ptr<Self, C>, incx: i32) -> BlasResult<()>;

    /// Sum of [`Scalar::modulus`]
    unsafe fn nrm1(ctx: C, n: i32, x: Ptr<Self, C>, incx: i32) -> BlasResult<Self::Real>;

    unsafe fn nrm2(ctx: C, n: i32, x: Ptr<Self, C>, incx: i32) -> BlasResult<Self::Real>;

    /// Largest [`Scalar::modulus`]
    unsafe fn nrmmax(ctx: C, n: i32, x: Ptr<Self, C>, incx: i32) -> BlasResult<Self::Real>;

    unsafe fn scal(ctx: C, n: i32, alpha: Self, x: Ptr<Self, C>, incx: i32) -> BlasResult<()>;
}

/// Matrix-vector routines on column-major matrices.
///
/// # Safety
/// See [`BLAS1`]. Matrices must address `lda * (cols - 1) + rows` elements.
#[allow(clippy::too_many_arguments)]
pub trait BLAS2<C: BLASContext>: BLAS1<C> {
    unsafe fn gemv(
        ctx: C,
        trans: MatrixOp,
        m: i32,
        n: i32,
        alpha: Self,
        a: Ptr<Self, C>,
        lda: i32,
        x: Ptr<Self, C>,
        incx: i32,
        beta: Self,
        y: Ptr<Self, C>,
        incy: i32,
    ) -> BlasResult<()>;

    unsafe fn ger(
        ctx: C,
        m: i32,
        n: i32,
        alpha: Self,
        x: Ptr<Self, C>,
        incx: i32,
        y: Ptr<Self, C>,
        incy: i32,
        a: Ptr<Self, C>,
        lda: i32,
    ) -> BlasResult<()>;

    unsafe fn symv(
        ctx: C,
        uplo: UpLo,
        n: i32,
        alpha: Self,
        a: Ptr<Self, C>,
        lda: i32,
        x: Ptr<Self, C>,
        incx: i32,
        beta: Self,
        y: Ptr<Self, C>,
        incy: i32,
    ) -> BlasResult<()>;

    unsafe fn syr(
        ctx: C,
        uplo: UpLo,
        n: i32,
        alpha: Self,
        x: Ptr<Self, C>,
        incx: i32,
        a: Ptr<Self, C>,
        lda: i32,
    ) -> BlasResult<()>;

    unsafe fn trmv(
        ctx: C,
        uplo: UpLo,
        trans: MatrixOp,
        diag: Diag,
        n: i32,
        a: Ptr<Self, C>,
        lda: i32,
        x: Ptr<Self, C>,
        incx: i32,
    ) -> BlasResult<()>;

    unsafe fn trsv(
        ctx: C,
        uplo: UpLo,
        trans: MatrixOp,
        diag: Diag,
        n: i32,
        a: Ptr<Self, C>,
        lda: i32,
        x: Ptr<Self, C>,
        incx: i32,
    ) -> BlasResult<()>;
}

/// Matrix-matrix routines on column-major matrices.
///
/// # Safety
/// See [`BLAS2`].
#[allow(clippy::too_many_arguments)]
pub trait BLAS3<C: BLASContext>: BLAS2<C> {
    unsafe fn gemm(
        ctx: C,
        transa: MatrixOp,
        transb: MatrixOp,
        m: i32,
        n: i32,
        k: i32,
        alpha: Self,
        a: Ptr<Self, C>,
        lda: i32,
        b: Ptr<Self, C>,
        ldb: i32,
        beta: Self,
        c: Ptr<Self, C>,
        ldc: i32,
    ) -> BlasResult<()>;

    unsafe fn symm(
        ctx: C,
        side: Side,
        uplo: UpLo,
        m: i32,
        n: i32,
        alpha: Self,
        a: Ptr<Self, C>,
        lda: i32,
        b: Ptr<Self, C>,
        ldb: i32,
        beta: Self,
        c: Ptr<Self, C>,
        ldc: i32,
    ) -> BlasResult<()>;

    unsafe fn syrk(
        ctx: C,
        uplo: UpLo,
        trans: MatrixOp,
        n: i32,
        k: i32,
        alpha: Self,
        a: Ptr<Self, C>,
        lda: i32,
        beta: Self,
        c: Ptr<Self, C>,
        ldc: i32,
    ) -> BlasResult<()>;

    unsafe fn syr2k(
        ctx: C,
        uplo: UpLo,
        trans: MatrixOp,
        n: i32,
        k: i32,
        alpha: Self,
        a: Ptr<Self, C>,
        lda: i32,
        b: Ptr<Self, C>,
        ldb: i32,
        beta: Self,
        c: Ptr<Self, C>,
        ldc: i32,
    ) -> BlasResult<()>;

    /// In place, `b` is overwritten with the product
    unsafe fn trmm(
        ctx: C,
        side: Side,
        uplo: UpLo,
        transa: MatrixOp,
        diag: Diag,
        m: i32,
        n: i32,
        alpha: Self,
        a: Ptr<Self, C>,
        lda: i32,
        b: Ptr<Self, C>,
        ldb: i32,
    ) -> BlasResult<()>;

    /// In place, `b` is overwritten with the solution
    unsafe fn trsm(
        ctx: C,
        side: Side,
        uplo: UpLo,
        transa: MatrixOp,
        diag: Diag,
        m: i32,
        n: i32,
        alpha: Self,
        a: Ptr<Self, C>,
        lda: i32,
        b: Ptr<Self, C>,
        ldb: i32,
    ) -> BlasResult<()>;
}
