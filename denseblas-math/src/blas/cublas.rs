use std::{ops::Deref, ptr::NonNull};

use log::debug;
use rcublas_sys::{
    cublasContext, cublasCreate_v2, cublasDestroy_v2, cublasDiagType_t, cublasFillMode_t,
    cublasHandle_t, cublasOperation_t, cublasSideMode_t, cublasStatus_t,
};
use thiserror::Error;

use denseblas_sys::device::cuda::Cuda;

use super::{BLASContext, Diag, MatrixOp, Side, UpLo};
use crate::error::BlasResult;

mod global;
mod level1;
mod level2;
mod level3;

pub use global::get_cublas;

/// An owned cuBLAS handle
pub struct CublasContext {
    inner: NonNull<cublasContext>,
}

impl CublasContext {
    /// Creates a new cublas context.
    ///
    /// # Errors
    /// If cublas can't create a new context
    pub fn new() -> BlasResult<Self> {
        unsafe {
            let mut handle = std::ptr::null_mut();
            cublasCreate_v2(&mut handle).to_cublas_result()?;
            debug!("created cublas handle {handle:p}");

            let inner = NonNull::new(handle).ok_or(CublasError::NotInitialized)?;
            Ok(Self { inner })
        }
    }
}

impl Drop for CublasContext {
    fn drop(&mut self) {
        debug!("destroying cublas handle {:p}", self.inner);
        unsafe {
            if let Err(e) = cublasDestroy_v2(self.inner.as_ptr()).to_cublas_result() {
                log::warn!("failed to destroy cublas handle: {e}");
            }
        }
    }
}

impl Deref for CublasContext {
    type Target = SharedCublasContext;
    fn deref(&self) -> &SharedCublasContext {
        unsafe { &*(self.inner.as_ptr().cast()) }
    }
}

/// A borrowed cuBLAS handle. `&SharedCublasContext` is the [`BLASContext`] for [`Cuda`]
#[repr(transparent)]
pub struct SharedCublasContext(cublasContext);

impl SharedCublasContext {
    pub(crate) fn handle(&self) -> cublasHandle_t {
        self as *const Self as *mut cublasContext
    }
}

impl<'a> BLASContext for &'a SharedCublasContext {
    type Device = Cuda;
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CublasError {
    #[error("cublas library was not initialized")]
    NotInitialized,
    #[error("cublas resource allocation failed")]
    AllocFailed,
    #[error("cublas was given an invalid value")]
    InvalidValue,
    #[error("the device does not support this cublas feature")]
    ArchMismatch,
    #[error("cublas failed to access gpu memory")]
    MappingError,
    #[error("cublas kernel failed to execute")]
    ExecutionFailed,
    #[error("internal cublas failure")]
    InternalError,
    #[error("operation not supported by cublas")]
    NotSupported,
    #[error("cublas license error")]
    LicenseError,
    #[error("unexpected cublas status")]
    UnexpectedError,
}

pub(crate) trait ToCublasResult {
    fn to_cublas_result(self) -> Result<(), CublasError>;
}

impl ToCublasResult for cublasStatus_t {
    fn to_cublas_result(self) -> Result<(), CublasError> {
        #[allow(clippy::enum_glob_use)]
        use cublasStatus_t::*;
        match self {
            CUBLAS_STATUS_SUCCESS => Ok(()),
            CUBLAS_STATUS_NOT_INITIALIZED => Err(CublasError::NotInitialized),
            CUBLAS_STATUS_ALLOC_FAILED => Err(CublasError::AllocFailed),
            CUBLAS_STATUS_INVALID_VALUE => Err(CublasError::InvalidValue),
            CUBLAS_STATUS_ARCH_MISMATCH => Err(CublasError::ArchMismatch),
            CUBLAS_STATUS_MAPPING_ERROR => Err(CublasError::MappingError),
            CUBLAS_STATUS_EXECUTION_FAILED => Err(CublasError::ExecutionFailed),
            CUBLAS_STATUS_INTERNAL_ERROR => Err(CublasError::InternalError),
            CUBLAS_STATUS_NOT_SUPPORTED => Err(CublasError::NotSupported),
            CUBLAS_STATUS_LICENSE_ERROR => Err(CublasError::LicenseError),
            _ => Err(CublasError::UnexpectedError),
        }
    }
}

impl From<MatrixOp> for cublasOperation_t {
    fn from(op: MatrixOp) -> Self {
        match op {
            MatrixOp::NoTrans => cublasOperation_t::CUBLAS_OP_N,
            // only real routines are bound, where conjugation is a no-op
            MatrixOp::Trans | MatrixOp::ConjTrans => cublasOperation_t::CUBLAS_OP_T,
        }
    }
}

impl From<UpLo> for cublasFillMode_t {
    fn from(uplo: UpLo) -> Self {
        match uplo {
            UpLo::Upper => cublasFillMode_t::CUBLAS_FILL_MODE_UPPER,
            UpLo::Lower => cublasFillMode_t::CUBLAS_FILL_MODE_LOWER,
        }
    }
}

impl From<Diag> for cublasDiagType_t {
    fn from(diag: Diag) -> Self {
        match diag {
            Diag::NonUnit => cublasDiagType_t::CUBLAS_DIAG_NON_UNIT,
            Diag::Unit => cublasDiagType_t::CUBLAS_DIAG_UNIT,
        }
    }
}

impl From<Side> for cublasSideMode_t {
    fn from(side: Side) -> Self {
        match side {
            Side::Left => cublasSideMode_t::CUBLAS_SIDE_LEFT,
            Side::Right => cublasSideMode_t::CUBLAS_SIDE_RIGHT,
        }
    }
}
