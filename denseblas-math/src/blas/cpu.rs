use denseblas_sys::device::cpu::Cpu;
use num_complex::{Complex32, Complex64};

use super::{BLASContext, DefaultBLASContext};

pub(crate) mod matmul;
pub(crate) mod native;

/// Runs BLAS operations with the portable kernels in this crate
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuContext;

impl BLASContext for CpuContext {
    type Device = Cpu;
}

/// Implements [`BLAS1`](super::BLAS1), [`BLAS2`](super::BLAS2) and [`BLAS3`](super::BLAS3)
/// for a host context with the native kernels, using the given gemm kernel
macro_rules! impl_native_blas {
    ($ctx:ty => $($float:ty: gemm $gemm:path),* $(,)?) => {$(
        impl $crate::blas::BLAS1<$ctx> for $float {
            unsafe fn amax(_ctx: $ctx, n: i32, x: *mut Self, incx: i32) -> $crate::error::BlasResult<usize> {
                Ok($crate::blas::cpu::native::amax(n as usize, x, incx as usize))
            }

            unsafe fn asum(_ctx: $ctx, n: i32, x: *mut Self, incx: i32) -> $crate::error::BlasResult<<Self as num_complex::ComplexFloat>::Real> {
                Ok($crate::blas::cpu::native::asum(n as usize, x, incx as usize))
            }

            unsafe fn axpy(
                _ctx: $ctx,
                n: i32,
                alpha: Self,
                x: *mut Self,
                incx: i32,
                y: *mut Self,
                incy: i32,
            ) -> $crate::error::BlasResult<()> {
                $crate::blas::cpu::native::axpy(n as usize, alpha, x, incx as usize, y, incy as usize);
                Ok(())
            }

            unsafe fn axpby(
                _ctx: $ctx,
                n: i32,
                alpha: Self,
                x: *mut Self,
                incx: i32,
                beta: Self,
                y: *mut Self,
                incy: i32,
                out: *mut Self,
                inco: i32,
            ) -> $crate::error::BlasResult<()> {
                $crate::blas::cpu::native::axpby(
                    n as usize, alpha, x, incx as usize, beta, y, incy as usize, out, inco as usize,
                );
                Ok(())
            }

            unsafe fn axpbypcz(
                _ctx: $ctx,
                n: i32,
                alpha: Self,
                x: *mut Self,
                incx: i32,
                beta: Self,
                y: *mut Self,
                incy: i32,
                gamma: Self,
                z: *mut Self,
                incz: i32,
                out: *mut Self,
                inco: i32,
            ) -> $crate::error::BlasResult<()> {
                $crate::blas::cpu::native::axpbypcz(
                    n as usize,
                    alpha,
                    x,
                    incx as usize,
                    beta,
                    y,
                    incy as usize,
                    gamma,
                    z,
                    incz as usize,
                    out,
                    inco as usize,
                );
                Ok(())
            }

            unsafe fn xmy(
                _ctx: $ctx,
                n: i32,
                x: *mut Self,
                incx: i32,
                y: *mut Self,
                incy: i32,
                out: *mut Self,
                inco: i32,
            ) -> $crate::error::BlasResult<()> {
                $crate::blas::cpu::native::xmy(
                    n as usize, x, incx as usize, y, incy as usize, out, inco as usize,
                );
                Ok(())
            }

            unsafe fn copy(
                _ctx: $ctx,
                n: i32,
                x: *mut Self,
                incx: i32,
                y: *mut Self,
                incy: i32,
            ) -> $crate::error::BlasResult<()> {
                $crate::blas::cpu::native::copy(n as usize, x, incx as usize, y, incy as usize);
                Ok(())
            }

            unsafe fn dot(
                _ctx: $ctx,
                n: i32,
                x: *mut Self,
                incx: i32,
                y: *mut Self,
                incy: i32,
            ) -> $crate::error::BlasResult<Self> {
                Ok($crate::blas::cpu::native::dot(n as usize, x, incx as usize, y, incy as usize))
            }

            unsafe fn dotc(
                _ctx: $ctx,
                n: i32,
                x: *mut Self,
                incx: i32,
                y: *mut Self,
                incy: i32,
            ) -> $crate::error::BlasResult<Self> {
                Ok($crate::blas::cpu::native::dotc(n as usize, x, incx as usize, y, incy as usize))
            }

            unsafe fn fill(_ctx: $ctx, n: i32, alpha: Self, x: *mut Self, incx: i32) -> $crate::error::BlasResult<()> {
                $crate::blas::cpu::native::fill(n as usize, alpha, x, incx as usize);
                Ok(())
            }

            unsafe fn nrm1(_ctx: $ctx, n: i32, x: *mut Self, incx: i32) -> $crate::error::BlasResult<<Self as num_complex::ComplexFloat>::Real> {
                Ok($crate::blas::cpu::native::nrm1(n as usize, x, incx as usize))
            }

            unsafe fn nrm2(_ctx: $ctx, n: i32, x: *mut Self, incx: i32) -> $crate::error::BlasResult<<Self as num_complex::ComplexFloat>::Real> {
                Ok($crate::blas::cpu::native::nrm2(n as usize, x, incx as usize))
            }

            unsafe fn nrmmax(_ctx: $ctx, n: i32, x: *mut Self, incx: i32) -> $crate::error::BlasResult<<Self as num_complex::ComplexFloat>::Real> {
                Ok($crate::blas::cpu::native::nrmmax(n as usize, x, incx as usize))
            }

            unsafe fn scal(_ctx: $ctx, n: i32, alpha: Self, x: *mut Self, incx: i32) -> $crate::error::BlasResult<()> {
                $crate::blas::cpu::native::scal(n as usize, alpha, x, incx as usize);
                Ok(())
            }
        }

        impl $crate::blas::BLAS2<$ctx> for $float {
            unsafe fn gemv(
                _ctx: $ctx,
                trans: $crate::blas::MatrixOp,
                m: i32,
                n: i32,
                alpha: Self,
                a: *mut Self,
                lda: i32,
                x: *mut Self,
                incx: i32,
                beta: Self,
                y: *mut Self,
                incy: i32,
            ) -> $crate::error::BlasResult<()> {
                $crate::blas::cpu::native::gemv(
                    trans,
                    m as usize,
                    n as usize,
                    alpha,
                    a,
                    lda as usize,
                    x,
                    incx as usize,
                    beta,
                    y,
                    incy as usize,
                );
                Ok(())
            }

            unsafe fn ger(
                _ctx: $ctx,
                m: i32,
                n: i32,
                alpha: Self,
                x: *mut Self,
                incx: i32,
                y: *mut Self,
                incy: i32,
                a: *mut Self,
                lda: i32,
            ) -> $crate::error::BlasResult<()> {
                $crate::blas::cpu::native::ger(
                    m as usize,
                    n as usize,
                    alpha,
                    x,
                    incx as usize,
                    y,
                    incy as usize,
                    a,
                    lda as usize,
                );
                Ok(())
            }

            unsafe fn symv(
                _ctx: $ctx,
                uplo: $crate::blas::UpLo,
                n: i32,
                alpha: Self,
                a: *mut Self,
                lda: i32,
                x: *mut Self,
                incx: i32,
                beta: Self,
                y: *mut Self,
                incy: i32,
            ) -> $crate::error::BlasResult<()> {
                $crate::blas::cpu::native::symv(
                    uplo,
                    n as usize,
                    alpha,
                    a,
                    lda as usize,
                    x,
                    incx as usize,
                    beta,
                    y,
                    incy as usize,
                );
                Ok(())
            }

            unsafe fn syr(
                _ctx: $ctx,
                uplo: $crate::blas::UpLo,
                n: i32,
                alpha: Self,
                x: *mut Self,
                incx: i32,
                a: *mut Self,
                lda: i32,
            ) -> $crate::error::BlasResult<()> {
                $crate::blas::cpu::native::syr(
                    uplo,
                    n as usize,
                    alpha,
                    x,
                    incx as usize,
                    a,
                    lda as usize,
                );
                Ok(())
            }

            unsafe fn trmv(
                _ctx: $ctx,
                uplo: $crate::blas::UpLo,
                trans: $crate::blas::MatrixOp,
                diag: $crate::blas::Diag,
                n: i32,
                a: *mut Self,
                lda: i32,
                x: *mut Self,
                incx: i32,
            ) -> $crate::error::BlasResult<()> {
                $crate::blas::cpu::native::trmv(
                    uplo,
                    trans,
                    diag,
                    n as usize,
                    a,
                    lda as usize,
                    x,
                    incx as usize,
                );
                Ok(())
            }

            unsafe fn trsv(
                _ctx: $ctx,
                uplo: $crate::blas::UpLo,
                trans: $crate::blas::MatrixOp,
                diag: $crate::blas::Diag,
                n: i32,
                a: *mut Self,
                lda: i32,
                x: *mut Self,
                incx: i32,
            ) -> $crate::error::BlasResult<()> {
                $crate::blas::cpu::native::trsv(
                    uplo,
                    trans,
                    diag,
                    n as usize,
                    a,
                    lda as usize,
                    x,
                    incx as usize,
                );
                Ok(())
            }
        }

        impl $crate::blas::BLAS3<$ctx> for $float {
            unsafe fn gemm(
                _ctx: $ctx,
                transa: $crate::blas::MatrixOp,
                transb: $crate::blas::MatrixOp,
                m: i32,
                n: i32,
                k: i32,
                alpha: Self,
                a: *mut Self,
                lda: i32,
                b: *mut Self,
                ldb: i32,
                beta: Self,
                c: *mut Self,
                ldc: i32,
            ) -> $crate::error::BlasResult<()> {
                $gemm(
                    transa,
                    transb,
                    m as usize,
                    n as usize,
                    k as usize,
                    alpha,
                    a,
                    lda as usize,
                    b,
                    ldb as usize,
                    beta,
                    c,
                    ldc as usize,
                );
                Ok(())
            }

            unsafe fn symm(
                _ctx: $ctx,
                side: $crate::blas::Side,
                uplo: $crate::blas::UpLo,
                m: i32,
                n: i32,
                alpha: Self,
                a: *mut Self,
                lda: i32,
                b: *mut Self,
                ldb: i32,
                beta: Self,
                c: *mut Self,
                ldc: i32,
            ) -> $crate::error::BlasResult<()> {
                $crate::blas::cpu::native::symm(
                    side,
                    uplo,
                    m as usize,
                    n as usize,
                    alpha,
                    a,
                    lda as usize,
                    b,
                    ldb as usize,
                    beta,
                    c,
                    ldc as usize,
                );
                Ok(())
            }

            unsafe fn syrk(
                _ctx: $ctx,
                uplo: $crate::blas::UpLo,
                trans: $crate::blas::MatrixOp,
                n: i32,
                k: i32,
                alpha: Self,
                a: *mut Self,
                lda: i32,
                beta: Self,
                c: *mut Self,
                ldc: i32,
            ) -> $crate::error::BlasResult<()> {
                $crate::blas::cpu::native::syrk(
                    uplo,
                    trans,
                    n as usize,
                    k as usize,
                    alpha,
                    a,
                    lda as usize,
                    beta,
                    c,
                    ldc as usize,
                );
                Ok(())
            }

            unsafe fn syr2k(
                _ctx: $ctx,
                uplo: $crate::blas::UpLo,
                trans: $crate::blas::MatrixOp,
                n: i32,
                k: i32,
                alpha: Self,
                a: *mut Self,
                lda: i32,
                b: *mut Self,
                ldb: i32,
                beta: Self,
                c: *mut Self,
                ldc: i32,
            ) -> $crate::error::BlasResult<()> {
                $crate::blas::cpu::native::syr2k(
                    uplo,
                    trans,
                    n as usize,
                    k as usize,
                    alpha,
                    a,
                    lda as usize,
                    b,
                    ldb as usize,
                    beta,
                    c,
                    ldc as usize,
                );
                Ok(())
            }

            unsafe fn trmm(
                _ctx: $ctx,
                side: $crate::blas::Side,
                uplo: $crate::blas::UpLo,
                transa: $crate::blas::MatrixOp,
                diag: $crate::blas::Diag,
                m: i32,
                n: i32,
                alpha: Self,
                a: *mut Self,
                lda: i32,
                b: *mut Self,
                ldb: i32,
            ) -> $crate::error::BlasResult<()> {
                $crate::blas::cpu::native::trmm(
                    side,
                    uplo,
                    transa,
                    diag,
                    m as usize,
                    n as usize,
                    alpha,
                    a,
                    lda as usize,
                    b,
                    ldb as usize,
                );
                Ok(())
            }

            unsafe fn trsm(
                _ctx: $ctx,
                side: $crate::blas::Side,
                uplo: $crate::blas::UpLo,
                transa: $crate::blas::MatrixOp,
                diag: $crate::blas::Diag,
                m: i32,
                n: i32,
                alpha: Self,
                a: *mut Self,
                lda: i32,
                b: *mut Self,
                ldb: i32,
            ) -> $crate::error::BlasResult<()> {
                $crate::blas::cpu::native::trsm(
                    side,
                    uplo,
                    transa,
                    diag,
                    m as usize,
                    n as usize,
                    alpha,
                    a,
                    lda as usize,
                    b,
                    ldb as usize,
                );
                Ok(())
            }
        }
    )*};
}

impl_native_blas!(CpuContext =>
    f32: gemm matmul::sgemm,
    f64: gemm matmul::dgemm,
    Complex32: gemm native::gemm,
    Complex64: gemm native::gemm,
);

#[cfg(feature = "blas-sys")]
mod blas_sys;

#[cfg(feature = "blas-sys")]
pub use blas_sys::SysBlasContext;

#[cfg(not(feature = "blas-sys"))]
impl DefaultBLASContext for Cpu {
    type Context = CpuContext;
}

#[cfg(feature = "blas-sys")]
impl DefaultBLASContext for Cpu {
    type Context = SysBlasContext;
}
