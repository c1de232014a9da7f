use denseblas_sys::device::{cuda::CudaPtr, DevicePtr};

use crate::{
    blas::{Diag, MatrixOp, Side, UpLo, BLAS3},
    error::BlasResult,
};

use super::{SharedCublasContext, ToCublasResult};

macro_rules! impl_blas3 {
    ($float:ident =>
        gemm: $gemm:path,
        symm: $symm:path,
        syrk: $syrk:path,
        syr2k: $syr2k:path,
        trmm: $trmm:path,
        trsm: $trsm:path,
    ) => {
        impl<'a> BLAS3<&'a SharedCublasContext> for $float {
            unsafe fn gemm(
                handle: &'a SharedCublasContext,
                transa: MatrixOp,
                transb: MatrixOp,
                m: i32,
                n: i32,
                k: i32,
                alpha: Self,
                a: CudaPtr<Self>,
                lda: i32,
                b: CudaPtr<Self>,
                ldb: i32,
                beta: Self,
                c: CudaPtr<Self>,
                ldc: i32,
            ) -> BlasResult<()> {
                $gemm(
                    handle.handle(),
                    transa.into(),
                    transb.into(),
                    m,
                    n,
                    k,
                    &alpha,
                    a.as_raw(),
                    lda,
                    b.as_raw(),
                    ldb,
                    &beta,
                    c.as_raw(),
                    ldc,
                )
                .to_cublas_result()?;
                Ok(())
            }

            unsafe fn symm(
                handle: &'a SharedCublasContext,
                side: Side,
                uplo: UpLo,
                m: i32,
                n: i32,
                alpha: Self,
                a: CudaPtr<Self>,
                lda: i32,
                b: CudaPtr<Self>,
                ldb: i32,
                beta: Self,
                c: CudaPtr<Self>,
                ldc: i32,
            ) -> BlasResult<()> {
                $symm(
                    handle.handle(),
                    side.into(),
                    uplo.into(),
                    m,
                    n,
                    &alpha,
                    a.as_raw(),
                    lda,
                    b.as_raw(),
                    ldb,
                    &beta,
                    c.as_raw(),
                    ldc,
                )
                .to_cublas_result()?;
                Ok(())
            }

            unsafe fn syrk(
                handle: &'a SharedCublasContext,
                uplo: UpLo,
                trans: MatrixOp,
                n: i32,
                k: i32,
                alpha: Self,
                a: CudaPtr<Self>,
                lda: i32,
                beta: Self,
                c: CudaPtr<Self>,
                ldc: i32,
            ) -> BlasResult<()> {
                $syrk(
                    handle.handle(),
                    uplo.into(),
                    trans.into(),
                    n,
                    k,
                    &alpha,
                    a.as_raw(),
                    lda,
                    &beta,
                    c.as_raw(),
                    ldc,
                )
                .to_cublas_result()?;
                Ok(())
            }

            unsafe fn syr2k(
                handle: &'a SharedCublasContext,
                uplo: UpLo,
                trans: MatrixOp,
                n: i32,
                k: i32,
                alpha: Self,
                a: CudaPtr<Self>,
                lda: i32,
                b: CudaPtr<Self>,
                ldb: i32,
                beta: Self,
                c: CudaPtr<Self>,
                ldc: i32,
            ) -> BlasResult<()> {
                $syr2k(
                    handle.handle(),
                    uplo.into(),
                    trans.into(),
                    n,
                    k,
                    &alpha,
                    a.as_raw(),
                    lda,
                    b.as_raw(),
                    ldb,
                    &beta,
                    c.as_raw(),
                    ldc,
                )
                .to_cublas_result()?;
                Ok(())
            }

            unsafe fn trmm(
                handle: &'a SharedCublasContext,
                side: Side,
                uplo: UpLo,
                transa: MatrixOp,
                diag: Diag,
                m: i32,
                n: i32,
                alpha: Self,
                a: CudaPtr<Self>,
                lda: i32,
                b: CudaPtr<Self>,
                ldb: i32,
            ) -> BlasResult<()> {
                // the v2 api writes the product to a separate output, which may alias b
                $trmm(
                    handle.handle(),
                    side.into(),
                    uplo.into(),
                    transa.into(),
                    diag.into(),
                    m,
                    n,
                    &alpha,
                    a.as_raw(),
                    lda,
                    b.as_raw(),
                    ldb,
                    b.as_raw(),
                    ldb,
                )
                .to_cublas_result()?;
                Ok(())
            }

            unsafe fn trsm(
                handle: &'a SharedCublasContext,
                side: Side,
                uplo: UpLo,
                transa: MatrixOp,
                diag: Diag,
                m: i32,
                n: i32,
                alpha: Self,
                a: CudaPtr<Self>,
                lda: i32,
                b: CudaPtr<Self>,
                ldb: i32,
            ) -> BlasResult<()> {
                $trsm(
                    handle.handle(),
                    side.into(),
                    uplo.into(),
                    transa.into(),
                    diag.into(),
                    m,
                    n,
                    &alpha,
                    a.as_raw(),
                    lda,
                    b.as_raw(),
                    ldb,
                )
                .to_cublas_result()?;
                Ok(())
            }
        }
    };
}

impl_blas3!(f32 =>
    gemm: rcublas_sys::cublasSgemm_v2,
    symm: rcublas_sys::cublasSsymm_v2,
    syrk: rcublas_sys::cublasSsyrk_v2,
    syr2k: rcublas_sys::cublasSsyr2k_v2,
    trmm: rcublas_sys::cublasStrmm_v2,
    trsm: rcublas_sys::cublasStrsm_v2,
);

impl_blas3!(f64 =>
    gemm: rcublas_sys::cublasDgemm_v2,
    symm: rcublas_sys::cublasDsymm_v2,
    syrk: rcublas_sys::cublasDsyrk_v2,
    syr2k: rcublas_sys::cublasDsyr2k_v2,
    trmm: rcublas_sys::cublasDtrmm_v2,
    trsm: rcublas_sys::cublasDtrsm_v2,
);
