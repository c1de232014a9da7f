use denseblas_sys::device::{cuda::CudaPtr, DevicePtr};

use crate::{
    blas::{Diag, MatrixOp, UpLo, BLAS2},
    error::BlasResult,
};

use super::{SharedCublasContext, ToCublasResult};

macro_rules! impl_blas2 {
    ($float:ident =>
        gemv: $gemv:path,
        ger: $ger:path,
        symv: $symv:path,
        syr: $syr:path,
        trmv: $trmv:path,
        trsv: $trsv:path,
    ) => {
        impl<'a> BLAS2<&'a SharedCublasContext> for $float {
            unsafe fn gemv(
                handle: &'a SharedCublasContext,
                trans: MatrixOp,
                m: i32,
                n: i32,
                alpha: Self,
                a: CudaPtr<Self>,
                lda: i32,
                x: CudaPtr<Self>,
                incx: i32,
                beta: Self,
                y: CudaPtr<Self>,
                incy: i32,
            ) -> BlasResult<()> {
                $gemv(
                    handle.handle(),
                    trans.into(),
                    m,
                    n,
                    &alpha,
                    a.as_raw(),
                    lda,
                    x.as_raw(),
                    incx,
                    &beta,
                    y.as_raw(),
                    incy,
                )
                .to_cublas_result()?;
                Ok(())
            }

            unsafe fn ger(
                handle: &'a SharedCublasContext,
                m: i32,
                n: i32,
                alpha: Self,
                x: CudaPtr<Self>,
                incx: i32,
                y: CudaPtr<Self>,
                incy: i32,
                a: CudaPtr<Self>,
                lda: i32,
            ) -> BlasResult<()> {
                $ger(
                    handle.handle(),
                    m,
                    n,
                    &alpha,
                    x.as_raw(),
                    incx,
                    y.as_raw(),
                    incy,
                    a.as_raw(),
                    lda,
                )
                .to_cublas_result()?;
                Ok(())
            }

            unsafe fn symv(
                handle: &'a SharedCublasContext,
                uplo: UpLo,
                n: i32,
                alpha: Self,
                a: CudaPtr<Self>,
                lda: i32,
                x: CudaPtr<Self>,
                incx: i32,
                beta: Self,
                y: CudaPtr<Self>,
                incy: i32,
            ) -> BlasResult<()> {
                $symv(
                    handle.handle(),
                    uplo.into(),
                    n,
                    &alpha,
                    a.as_raw(),
                    lda,
                    x.as_raw(),
                    incx,
                    &beta,
                    y.as_raw(),
                    incy,
                )
                .to_cublas_result()?;
                Ok(())
            }

            unsafe fn syr(
                handle: &'a SharedCublasContext,
                uplo: UpLo,
                n: i32,
                alpha: Self,
                x: CudaPtr<Self>,
                incx: i32,
                a: CudaPtr<Self>,
                lda: i32,
            ) -> BlasResult<()> {
                $syr(
                    handle.handle(),
                    uplo.into(),
                    n,
                    &alpha,
                    x.as_raw(),
                    incx,
                    a.as_raw(),
                    lda,
                )
                .to_cublas_result()?;
                Ok(())
            }

            unsafe fn trmv(
                handle: &'a SharedCublasContext,
                uplo: UpLo,
                trans: MatrixOp,
                diag: Diag,
                n: i32,
                a: CudaPtr<Self>,
                lda: i32,
                x: CudaPtr<Self>,
                incx: i32,
            ) -> BlasResult<()> {
                $trmv(
                    handle.handle(),
                    uplo.into(),
                    trans.into(),
                    diag.into(),
                    n,
                    a.as_raw(),
                    lda,
                    x.as_raw(),
                    incx,
                )
                .to_cublas_result()?;
                Ok(())
            }

            unsafe fn trsv(
                handle: &'a SharedCublasContext,
                uplo: UpLo,
                trans: MatrixOp,
                diag: Diag,
                n: i32,
                a: CudaPtr<Self>,
                lda: i32,
                x: CudaPtr<Self>,
                incx: i32,
            ) -> BlasResult<()> {
                $trsv(
                    handle.handle(),
                    uplo.into(),
                    trans.into(),
                    diag.into(),
                    n,
                    a.as_raw(),
                    lda,
                    x.as_raw(),
                    incx,
                )
                .to_cublas_result()?;
                Ok(())
            }
        }
    };
}

impl_blas2!(f32 =>
    gemv: rcublas_sys::cublasSgemv_v2,
    ger: rcublas_sys::cublasSger_v2,
    symv: rcublas_sys::cublasSsymv_v2,
    syr: rcublas_sys::cublasSsyr_v2,
    trmv: rcublas_sys::cublasStrmv_v2,
    trsv: rcublas_sys::cublasStrsv_v2,
);

impl_blas2!(f64 =>
    gemv: rcublas_sys::cublasDgemv_v2,
    ger: rcublas_sys::cublasDger_v2,
    symv: rcublas_sys::cublasDsymv_v2,
    syr: rcublas_sys::cublasDsyr_v2,
    trmv: rcublas_sys::cublasDtrmv_v2,
    trsv: rcublas_sys::cublasDtrsv_v2,
);
