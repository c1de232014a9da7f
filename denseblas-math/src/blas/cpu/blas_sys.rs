extern crate blas_src;
extern crate blas_sys;

use std::os::raw::c_char;

use denseblas_sys::device::cpu::Cpu;
use num_complex::{Complex32, Complex64};

use crate::{
    blas::{BLASContext, Diag, MatrixOp, Side, UpLo, BLAS1, BLAS2, BLAS3},
    error::BlasResult,
};

use super::native;

/// Runs BLAS operations through the Fortran BLAS linked by `blas-src`.
///
/// Only `f32` and `f64` have Fortran routines bound, complex types use the native kernels.
#[derive(Debug, Clone, Copy, Default)]
pub struct SysBlasContext;

impl BLASContext for SysBlasContext {
    type Device = Cpu;
}

fn ch(v: u8) -> c_char {
    v as c_char
}

macro_rules! impl_blas1 {
    ($float:ident =>
        amax: $amax:path,
        asum: $asum:path,
        axpy: $axpy:path,
        copy: $copy:path,
        dot: $dot:path,
        nrm2: $nrm2:path,
        scal: $scal:path,
    ) => {
        impl BLAS1<SysBlasContext> for $float {
            unsafe fn amax(_ctx: SysBlasContext, n: i32, x: *mut Self, incx: i32) -> BlasResult<usize> {
                // Fortran indices are 1-based
                let i = $amax(&n, x, &incx);
                Ok((i.max(1) - 1) as usize)
            }

            unsafe fn asum(_ctx: SysBlasContext, n: i32, x: *mut Self, incx: i32) -> BlasResult<Self> {
                Ok($asum(&n, x, &incx))
            }

            unsafe fn axpy(
                _ctx: SysBlasContext,
                n: i32,
                alpha: Self,
                x: *mut Self,
                incx: i32,
                y: *mut Self,
                incy: i32,
            ) -> BlasResult<()> {
                $axpy(&n, &alpha, x, &incx, y, &incy);
                Ok(())
            }

            unsafe fn xmy(
                _ctx: SysBlasContext,
                n: i32,
                x: *mut Self,
                incx: i32,
                y: *mut Self,
                incy: i32,
                out: *mut Self,
                inco: i32,
            ) -> BlasResult<()> {
                native::xmy(n as usize, x, incx as usize, y, incy as usize, out, inco as usize);
                Ok(())
            }

            unsafe fn copy(
                _ctx: SysBlasContext,
                n: i32,
                x: *mut Self,
                incx: i32,
                y: *mut Self,
                incy: i32,
            ) -> BlasResult<()> {
                $copy(&n, x, &incx, y, &incy);
                Ok(())
            }

            unsafe fn dot(
                _ctx: SysBlasContext,
                n: i32,
                x: *mut Self,
                incx: i32,
                y: *mut Self,
                incy: i32,
            ) -> BlasResult<Self> {
                Ok($dot(&n, x, &incx, y, &incy))
            }

            unsafe fn dotc(
                ctx: SysBlasContext,
                n: i32,
                x: *mut Self,
                incx: i32,
                y: *mut Self,
                incy: i32,
            ) -> BlasResult<Self> {
                Self::dot(ctx, n, x, incx, y, incy)
            }

            unsafe fn fill(_ctx: SysBlasContext, n: i32, alpha: Self, x: *mut Self, incx: i32) -> BlasResult<()> {
                native::fill(n as usize, alpha, x, incx as usize);
                Ok(())
            }

            unsafe fn nrm1(ctx: SysBlasContext, n: i32, x: *mut Self, incx: i32) -> BlasResult<Self> {
                Self::asum(ctx, n, x, incx)
            }

            unsafe fn nrm2(_ctx: SysBlasContext, n: i32, x: *mut Self, incx: i32) -> BlasResult<Self> {
                Ok($nrm2(&n, x, &incx))
            }

            unsafe fn nrmmax(ctx: SysBlasContext, n: i32, x: *mut Self, incx: i32) -> BlasResult<Self> {
                if n <= 0 {
                    return Ok(0.0);
                }
                let i = Self::amax(ctx, n, x, incx)?;
                Ok((*x.add(i * incx as usize)).abs())
            }

            unsafe fn scal(_ctx: SysBlasContext, n: i32, alpha: Self, x: *mut Self, incx: i32) -> BlasResult<()> {
                if alpha == 0.0 {
                    // reference scal multiplies, which keeps NaNs
                    native::fill(n as usize, alpha, x, incx as usize);
                } else {
                    $scal(&n, &alpha, x, &incx);
                }
                Ok(())
            }
        }
    };
}

macro_rules! impl_blas2 {
    ($float:ident =>
        gemv: $gemv:path,
        ger: $ger:path,
        symv: $symv:path,
        syr: $syr:path,
        trmv: $trmv:path,
        trsv: $trsv:path,
    ) => {
        impl BLAS2<SysBlasContext> for $float {
            unsafe fn gemv(
                _ctx: SysBlasContext,
                trans: MatrixOp,
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
            ) -> BlasResult<()> {
                $gemv(
                    &ch(trans as u8),
                    &m,
                    &n,
                    &alpha,
                    a,
                    &lda,
                    x,
                    &incx,
                    &beta,
                    y,
                    &incy,
                );
                Ok(())
            }

            unsafe fn ger(
                _ctx: SysBlasContext,
                m: i32,
                n: i32,
                alpha: Self,
                x: *mut Self,
                incx: i32,
                y: *mut Self,
                incy: i32,
                a: *mut Self,
                lda: i32,
            ) -> BlasResult<()> {
                $ger(&m, &n, &alpha, x, &incx, y, &incy, a, &lda);
                Ok(())
            }

            unsafe fn symv(
                _ctx: SysBlasContext,
                uplo: UpLo,
                n: i32,
                alpha: Self,
                a: *mut Self,
                lda: i32,
                x: *mut Self,
                incx: i32,
                beta: Self,
                y: *mut Self,
                incy: i32,
            ) -> BlasResult<()> {
                $symv(
                    &ch(uplo as u8),
                    &n,
                    &alpha,
                    a,
                    &lda,
                    x,
                    &incx,
                    &beta,
                    y,
                    &incy,
                );
                Ok(())
            }

            unsafe fn syr(
                _ctx: SysBlasContext,
                uplo: UpLo,
                n: i32,
                alpha: Self,
                x: *mut Self,
                incx: i32,
                a: *mut Self,
                lda: i32,
            ) -> BlasResult<()> {
                $syr(&ch(uplo as u8), &n, &alpha, x, &incx, a, &lda);
                Ok(())
            }

            unsafe fn trmv(
                _ctx: SysBlasContext,
                uplo: UpLo,
                trans: MatrixOp,
                diag: Diag,
                n: i32,
                a: *mut Self,
                lda: i32,
                x: *mut Self,
                incx: i32,
            ) -> BlasResult<()> {
                $trmv(
                    &ch(uplo as u8),
                    &ch(trans as u8),
                    &ch(diag as u8),
                    &n,
                    a,
                    &lda,
                    x,
                    &incx,
                );
                Ok(())
            }

            unsafe fn trsv(
                _ctx: SysBlasContext,
                uplo: UpLo,
                trans: MatrixOp,
                diag: Diag,
                n: i32,
                a: *mut Self,
                lda: i32,
                x: *mut Self,
                incx: i32,
            ) -> BlasResult<()> {
                $trsv(
                    &ch(uplo as u8),
                    &ch(trans as u8),
                    &ch(diag as u8),
                    &n,
                    a,
                    &lda,
                    x,
                    &incx,
                );
                Ok(())
            }
        }
    };
}

macro_rules! impl_blas3 {
    ($float:ident =>
        gemm: $gemm:path,
        symm: $symm:path,
        syrk: $syrk:path,
        syr2k: $syr2k:path,
        trmm: $trmm:path,
        trsm: $trsm:path,
    ) => {
        impl BLAS3<SysBlasContext> for $float {
            unsafe fn gemm(
                _ctx: SysBlasContext,
                transa: MatrixOp,
                transb: MatrixOp,
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
            ) -> BlasResult<()> {
                $gemm(
                    &ch(transa as u8),
                    &ch(transb as u8),
                    &m,
                    &n,
                    &k,
                    &alpha,
                    a,
                    &lda,
                    b,
                    &ldb,
                    &beta,
                    c,
                    &ldc,
                );
                Ok(())
            }

            unsafe fn symm(
                _ctx: SysBlasContext,
                side: Side,
                uplo: UpLo,
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
            ) -> BlasResult<()> {
                $symm(
                    &ch(side as u8),
                    &ch(uplo as u8),
                    &m,
                    &n,
                    &alpha,
                    a,
                    &lda,
                    b,
                    &ldb,
                    &beta,
                    c,
                    &ldc,
                );
                Ok(())
            }

            unsafe fn syrk(
                _ctx: SysBlasContext,
                uplo: UpLo,
                trans: MatrixOp,
                n: i32,
                k: i32,
                alpha: Self,
                a: *mut Self,
                lda: i32,
                beta: Self,
                c: *mut Self,
                ldc: i32,
            ) -> BlasResult<()> {
                $syrk(
                    &ch(uplo as u8),
                    &ch(trans as u8),
                    &n,
                    &k,
                    &alpha,
                    a,
                    &lda,
                    &beta,
                    c,
                    &ldc,
                );
                Ok(())
            }

            unsafe fn syr2k(
                _ctx: SysBlasContext,
                uplo: UpLo,
                trans: MatrixOp,
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
            ) -> BlasResult<()> {
                $syr2k(
                    &ch(uplo as u8),
                    &ch(trans as u8),
                    &n,
                    &k,
                    &alpha,
                    a,
                    &lda,
                    b,
                    &ldb,
                    &beta,
                    c,
                    &ldc,
                );
                Ok(())
            }

            unsafe fn trmm(
                _ctx: SysBlasContext,
                side: Side,
                uplo: UpLo,
                transa: MatrixOp,
                diag: Diag,
                m: i32,
                n: i32,
                alpha: Self,
                a: *mut Self,
                lda: i32,
                b: *mut Self,
                ldb: i32,
            ) -> BlasResult<()> {
                $trmm(
                    &ch(side as u8),
                    &ch(uplo as u8),
                    &ch(transa as u8),
                    &ch(diag as u8),
                    &m,
                    &n,
                    &alpha,
                    a,
                    &lda,
                    b,
                    &ldb,
                );
                Ok(())
            }

            unsafe fn trsm(
                _ctx: SysBlasContext,
                side: Side,
                uplo: UpLo,
                transa: MatrixOp,
                diag: Diag,
                m: i32,
                n: i32,
                alpha: Self,
                a: *mut Self,
                lda: i32,
                b: *mut Self,
                ldb: i32,
            ) -> BlasResult<()> {
                $trsm(
                    &ch(side as u8),
                    &ch(uplo as u8),
                    &ch(transa as u8),
                    &ch(diag as u8),
                    &m,
                    &n,
                    &alpha,
                    a,
                    &lda,
                    b,
                    &ldb,
                );
                Ok(())
            }
        }
    };
}

impl_blas1!(f32 =>
    amax: blas_sys::isamax_,
    asum: blas_sys::sasum_,
    axpy: blas_sys::saxpy_,
    copy: blas_sys::scopy_,
    dot: blas_sys::sdot_,
    nrm2: blas_sys::snrm2_,
    scal: blas_sys::sscal_,
);
impl_blas2!(f32 =>
    gemv: blas_sys::sgemv_,
    ger: blas_sys::sger_,
    symv: blas_sys::ssymv_,
    syr: blas_sys::ssyr_,
    trmv: blas_sys::strmv_,
    trsv: blas_sys::strsv_,
);
impl_blas3!(f32 =>
    gemm: blas_sys::sgemm_,
    symm: blas_sys::ssymm_,
    syrk: blas_sys::ssyrk_,
    syr2k: blas_sys::ssyr2k_,
    trmm: blas_sys::strmm_,
    trsm: blas_sys::strsm_,
);

impl_blas1!(f64 =>
    amax: blas_sys::idamax_,
    asum: blas_sys::dasum_,
    axpy: blas_sys::daxpy_,
    copy: blas_sys::dcopy_,
    dot: blas_sys::ddot_,
    nrm2: blas_sys::dnrm2_,
    scal: blas_sys::dscal_,
);
impl_blas2!(f64 =>
    gemv: blas_sys::dgemv_,
    ger: blas_sys::dger_,
    symv: blas_sys::dsymv_,
    syr: blas_sys::dsyr_,
    trmv: blas_sys::dtrmv_,
    trsv: blas_sys::dtrsv_,
);
impl_blas3!(f64 =>
    gemm: blas_sys::dgemm_,
    symm: blas_sys::dsymm_,
    syrk: blas_sys::dsyrk_,
    syr2k: blas_sys::dsyr2k_,
    trmm: blas_sys::dtrmm_,
    trsm: blas_sys::dtrsm_,
);

impl_native_blas!(SysBlasContext =>
    Complex32: gemm native::gemm,
    Complex64: gemm native::gemm,
);

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use denseblas_sys::{View, ViewMut};
    use num_complex::Complex64;

    use crate::{
        blas::{cpu::CpuContext, Diag, Side, UpLo},
        tensor::{
            amax_ctx, gemm_ctx, gemv_ctx, nrmmax_ctx, scal_ctx, symm_ctx, syrk_ctx, trsm_ctx,
            trsv_ctx, Tensor, Vector,
        },
    };

    use super::SysBlasContext;

    #[test]
    fn level1_matches_native() {
        let x = Vector::from_shape([4], [1.0_f64, -5.0, 2.0, 5.0]);
        assert_eq!(amax_ctx(SysBlasContext, x.view()).unwrap(), 1);
        assert_eq!(amax_ctx(CpuContext, x.view()).unwrap(), 1);
        assert_relative_eq!(nrmmax_ctx(SysBlasContext, x.view()).unwrap(), 5.0);

        // stride 2 sees [1, 2]
        let a = Tensor::from_shape([2, 2], [1.0_f64, -5.0, 2.0, 5.0]);
        let row = a.slice_axis(0, 0);
        assert_eq!(amax_ctx(SysBlasContext, row.view()).unwrap(), 1);
        assert_relative_eq!(nrmmax_ctx(SysBlasContext, row.view()).unwrap(), 2.0);

        let mut y = Vector::from_shape([2], [f64::NAN, 3.0]);
        scal_ctx(SysBlasContext, 0.0, y.view_mut()).unwrap();
        assert_eq!(y.data, [0.0, 0.0]);

        let z = Vector::from_shape([2], [Complex64::new(3.0, 3.0), Complex64::new(5.0, 0.0)]);
        assert_eq!(amax_ctx(SysBlasContext, z.view()).unwrap(), 0);
    }

    #[test]
    fn level2_matches_native() {
        let a = Tensor::from_shape([3, 3], [4., 1., -2., 0., 3., 5., 0., 0., 2.]);
        let x = Vector::from_shape([3], [1., -1., 2.]);

        let mut sys = Vector::from_shape([3], [1.0_f64; 3]);
        let mut cpu = sys.clone();
        gemv_ctx(SysBlasContext, 2.0, a.t(), x.view(), 0.5, sys.view_mut()).unwrap();
        gemv_ctx(CpuContext, 2.0, a.t(), x.view(), 0.5, cpu.view_mut()).unwrap();
        assert_relative_eq!(sys.data[..], cpu.data[..]);

        trsv_ctx(SysBlasContext, UpLo::Lower, Diag::NonUnit, a.view(), sys.view_mut()).unwrap();
        trsv_ctx(CpuContext, UpLo::Lower, Diag::NonUnit, a.view(), cpu.view_mut()).unwrap();
        assert_relative_eq!(sys.data[..], cpu.data[..], max_relative = 1e-12);
    }

    #[test]
    fn level3_matches_native() {
        let a = Tensor::from_shape([2, 3], [1., 4., 2., 5., 3., 6.]);
        let b = Tensor::from_shape([3, 2], [1., 0., -1., 2., 1., 0.]);
        let l = Tensor::from_shape([2, 2], [2., 1., 0., 3.]);

        let mut sys = Tensor::from_shape([2, 2], [1.0_f64; 4]);
        let mut cpu = sys.clone();
        gemm_ctx(SysBlasContext, 1.0, a.view(), b.view(), 2.0, sys.view_mut()).unwrap();
        gemm_ctx(CpuContext, 1.0, a.view(), b.view(), 2.0, cpu.view_mut()).unwrap();
        assert_relative_eq!(sys.data[..], cpu.data[..]);

        let mut sys = Tensor::from_shape([2, 3], [0.0_f64; 6]);
        let mut cpu = sys.clone();
        symm_ctx(SysBlasContext, Side::Left, UpLo::Lower, 1.0, l.view(), a.view(), 0.0, sys.view_mut())
            .unwrap();
        symm_ctx(CpuContext, Side::Left, UpLo::Lower, 1.0, l.view(), a.view(), 0.0, cpu.view_mut())
            .unwrap();
        assert_relative_eq!(sys.data[..], cpu.data[..]);

        let mut sys = Tensor::from_shape([2, 2], [0.0_f64; 4]);
        let mut cpu = sys.clone();
        syrk_ctx(SysBlasContext, UpLo::Upper, 1.0, a.view(), 0.0, sys.view_mut()).unwrap();
        syrk_ctx(CpuContext, UpLo::Upper, 1.0, a.view(), 0.0, cpu.view_mut()).unwrap();
        assert_relative_eq!(sys.data[..], cpu.data[..]);

        let mut sys = a.clone();
        let mut cpu = a.clone();
        trsm_ctx(SysBlasContext, Side::Left, UpLo::Lower, Diag::NonUnit, 2.0, l.view(), sys.view_mut())
            .unwrap();
        trsm_ctx(CpuContext, Side::Left, UpLo::Lower, Diag::NonUnit, 2.0, l.view(), cpu.view_mut())
            .unwrap();
        assert_relative_eq!(sys.data[..], cpu.data[..], max_relative = 1e-12);
    }
}
