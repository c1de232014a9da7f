use std::{ffi::c_void, os::raw::c_int};

use denseblas_sys::device::{cuda::CudaPtr, DevicePtr};
use rcublas_sys::cublasSideMode_t;

use crate::{blas::BLAS1, error::BlasResult};

use super::{SharedCublasContext, ToCublasResult};

macro_rules! impl_blas1 {
    ($float:ident =>
        amax: $amax:path,
        asum: $asum:path,
        axpy: $axpy:path,
        copy: $copy:path,
        dgmm: $dgmm:path,
        dot: $dot:path,
        nrm2: $nrm2:path,
        scal: $scal:path,
    ) => {
        impl<'a> BLAS1<&'a SharedCublasContext> for $float {
            unsafe fn amax(
                handle: &'a SharedCublasContext,
                n: i32,
                x: CudaPtr<Self>,
                incx: i32,
            ) -> BlasResult<usize> {
                let mut i: c_int = 0;
                $amax(handle.handle(), n, x.as_raw(), incx, &mut i).to_cublas_result()?;
                // cublas indices are 1-based
                Ok((i.max(1) - 1) as usize)
            }

            unsafe fn asum(
                handle: &'a SharedCublasContext,
                n: i32,
                x: CudaPtr<Self>,
                incx: i32,
            ) -> BlasResult<Self> {
                let mut out = 0.0;
                $asum(handle.handle(), n, x.as_raw(), incx, &mut out).to_cublas_result()?;
                Ok(out)
            }

            unsafe fn axpy(
                handle: &'a SharedCublasContext,
                n: i32,
                alpha: Self,
                x: CudaPtr<Self>,
                incx: i32,
                y: CudaPtr<Self>,
                incy: i32,
            ) -> BlasResult<()> {
                $axpy(handle.handle(), n, &alpha, x.as_raw(), incx, y.as_raw(), incy)
                    .to_cublas_result()?;
                Ok(())
            }

            unsafe fn xmy(
                handle: &'a SharedCublasContext,
                n: i32,
                x: CudaPtr<Self>,
                incx: i32,
                y: CudaPtr<Self>,
                incy: i32,
                out: CudaPtr<Self>,
                inco: i32,
            ) -> BlasResult<()> {
                // y as a 1 x n matrix with its increment as the leading dimension,
                // scaled column-wise by diag(x)
                $dgmm(
                    handle.handle(),
                    cublasSideMode_t::CUBLAS_SIDE_RIGHT,
                    1,
                    n,
                    y.as_raw(),
                    incy,
                    x.as_raw(),
                    incx,
                    out.as_raw(),
                    inco,
                )
                .to_cublas_result()?;
                Ok(())
            }

            unsafe fn copy(
                handle: &'a SharedCublasContext,
                n: i32,
                x: CudaPtr<Self>,
                incx: i32,
                y: CudaPtr<Self>,
                incy: i32,
            ) -> BlasResult<()> {
                $copy(handle.handle(), n, x.as_raw(), incx, y.as_raw(), incy).to_cublas_result()?;
                Ok(())
            }

            unsafe fn dot(
                handle: &'a SharedCublasContext,
                n: i32,
                x: CudaPtr<Self>,
                incx: i32,
                y: CudaPtr<Self>,
                incy: i32,
            ) -> BlasResult<Self> {
                let mut out = 0.0;
                $dot(handle.handle(), n, x.as_raw(), incx, y.as_raw(), incy, &mut out)
                    .to_cublas_result()?;
                Ok(out)
            }

            unsafe fn dotc(
                handle: &'a SharedCublasContext,
                n: i32,
                x: CudaPtr<Self>,
                incx: i32,
                y: CudaPtr<Self>,
                incy: i32,
            ) -> BlasResult<Self> {
                Self::dot(handle, n, x, incx, y, incy)
            }

            unsafe fn fill(
                _handle: &'a SharedCublasContext,
                n: i32,
                alpha: Self,
                x: CudaPtr<Self>,
                incx: i32,
            ) -> BlasResult<()> {
                let host = vec![alpha; n.max(0) as usize];
                rcublas_sys::cublasSetVector(
                    n,
                    std::mem::size_of::<Self>() as c_int,
                    host.as_ptr().cast::<c_void>(),
                    1,
                    x.as_raw().cast::<c_void>(),
                    incx,
                )
                .to_cublas_result()?;
                Ok(())
            }

            unsafe fn nrm1(
                handle: &'a SharedCublasContext,
                n: i32,
                x: CudaPtr<Self>,
                incx: i32,
            ) -> BlasResult<Self> {
                Self::asum(handle, n, x, incx)
            }

            unsafe fn nrm2(
                handle: &'a SharedCublasContext,
                n: i32,
                x: CudaPtr<Self>,
                incx: i32,
            ) -> BlasResult<Self> {
                let mut out = 0.0;
                $nrm2(handle.handle(), n, x.as_raw(), incx, &mut out).to_cublas_result()?;
                Ok(out)
            }

            unsafe fn nrmmax(
                handle: &'a SharedCublasContext,
                n: i32,
                x: CudaPtr<Self>,
                incx: i32,
            ) -> BlasResult<Self> {
                if n <= 0 {
                    return Ok(0.0);
                }
                let i = Self::amax(handle, n, x, incx)?;

                let mut out: Self = 0.0;
                rcublas_sys::cublasGetVector(
                    1,
                    std::mem::size_of::<Self>() as c_int,
                    x.as_raw().add(i * incx as usize).cast::<c_void>(),
                    1,
                    (&mut out as *mut Self).cast::<c_void>(),
                    1,
                )
                .to_cublas_result()?;
                Ok(out.abs())
            }

            unsafe fn scal(
                handle: &'a SharedCublasContext,
                n: i32,
                alpha: Self,
                x: CudaPtr<Self>,
                incx: i32,
            ) -> BlasResult<()> {
                if alpha == 0.0 {
                    return Self::fill(handle, n, alpha, x, incx);
                }
                $scal(handle.handle(), n, &alpha, x.as_raw(), incx).to_cublas_result()?;
                Ok(())
            }
        }
    };
}

impl_blas1!(f32 =>
    amax: rcublas_sys::cublasIsamax_v2,
    asum: rcublas_sys::cublasSasum_v2,
    axpy: rcublas_sys::cublasSaxpy_v2,
    copy: rcublas_sys::cublasScopy_v2,
    dgmm: rcublas_sys::cublasSdgmm,
    dot: rcublas_sys::cublasSdot_v2,
    nrm2: rcublas_sys::cublasSnrm2_v2,
    scal: rcublas_sys::cublasSscal_v2,
);

impl_blas1!(f64 =>
    amax: rcublas_sys::cublasIdamax_v2,
    asum: rcublas_sys::cublasDasum_v2,
    axpy: rcublas_sys::cublasDaxpy_v2,
    copy: rcublas_sys::cublasDcopy_v2,
    dgmm: rcublas_sys::cublasDdgmm,
    dot: rcublas_sys::cublasDdot_v2,
    nrm2: rcublas_sys::cublasDnrm2_v2,
    scal: rcublas_sys::cublasDscal_v2,
);
