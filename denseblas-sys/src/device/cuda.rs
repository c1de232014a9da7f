use std::{ffi::c_void, ptr::NonNull};

use cust::error::{CudaError, CudaResult};
use cust_raw::CUdeviceptr;

use crate::ptr::Ref;

use super::{DefaultDeviceAllocator, Device, DeviceAllocator, DevicePtr};

mod context;

pub use context::Context;

#[derive(Debug, Clone, Copy, Default)]
/// Device for CUDA enabled GPUs
///
/// # Note
/// Needs a [`Context`] to be created on the current thread to work
pub struct Cuda;

/// A pointer into CUDA device memory. Never dereferenced on the host.
#[repr(transparent)]
pub struct CudaPtr<T>(*mut T);

impl<T> Clone for CudaPtr<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for CudaPtr<T> {}

impl<T> DevicePtr<T> for CudaPtr<T> {
    fn as_raw(self) -> *mut T {
        self.0
    }

    fn from_raw(ptr: *mut T) -> Self {
        Self(ptr)
    }
}

impl Device for Cuda {
    type Ptr<T> = CudaPtr<T>;

    fn copy_from_host<T: Copy>(from: &[T], to: &mut Ref<[T], Self>) {
        assert_eq!(from.len(), to.len());
        // Safety:
        // Device refs are only made through unsafe constructors that guarantee the allocation
        unsafe {
            cust_raw::cuMemcpyHtoD_v2(
                d_ptr(to.as_mut_ptr()),
                from.as_ptr().cast::<c_void>(),
                std::mem::size_of_val(from),
            )
            .to_cuda_result()
            .unwrap_or_else(|e| panic!("copy to cuda device failed: {e}"));
        }
    }

    fn copy_to_host<T: Copy>(from: &Ref<[T], Self>, to: &mut [T]) {
        assert_eq!(from.len(), to.len());
        unsafe {
            cust_raw::cuMemcpyDtoH_v2(
                to.as_mut_ptr().cast::<c_void>(),
                d_ptr(from.as_ptr()),
                std::mem::size_of_val(to),
            )
            .to_cuda_result()
            .unwrap_or_else(|e| panic!("copy from cuda device failed: {e}"));
        }
    }

    fn copy<T: Copy>(from: &Ref<[T], Self>, to: &mut Ref<[T], Self>) {
        assert_eq!(from.len(), to.len());
        unsafe {
            cust_raw::cuMemcpyDtoD_v2(
                d_ptr(to.as_mut_ptr()),
                d_ptr(from.as_ptr()),
                std::mem::size_of::<T>() * from.len(),
            )
            .to_cuda_result()
            .unwrap_or_else(|e| panic!("cuda device copy failed: {e}"));
        }
    }
}

/// Synchronous allocations with `cuMemAlloc`
#[derive(Debug, Clone, Copy, Default)]
pub struct CudaAlloc;

impl DeviceAllocator for CudaAlloc {
    type AllocError = CudaError;
    type Device = Cuda;

    fn allocate(&self, layout: std::alloc::Layout) -> CudaResult<NonNull<u8>> {
        let mut ptr: CUdeviceptr = 0;
        unsafe {
            cust_raw::cuMemAlloc_v2(&mut ptr, layout.size()).to_cuda_result()?;
        }
        NonNull::new(ptr as *mut u8).ok_or(CudaError::OutOfMemory)
    }

    fn allocate_zeroed(&self, layout: std::alloc::Layout) -> CudaResult<NonNull<u8>> {
        let ptr = self.allocate(layout)?;
        unsafe {
            cust_raw::cuMemsetD8_v2(ptr.as_ptr() as CUdeviceptr, 0, layout.size())
                .to_cuda_result()?;
        }
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, _layout: std::alloc::Layout) {
        cust_raw::cuMemFree_v2(ptr.as_ptr() as CUdeviceptr)
            .to_cuda_result()
            .unwrap_or_else(|e| panic!("freeing cuda memory failed: {e}"));
    }
}

impl DefaultDeviceAllocator for Cuda {
    type Alloc = CudaAlloc;
}

fn d_ptr<T>(ptr: CudaPtr<T>) -> CUdeviceptr {
    ptr.as_raw() as CUdeviceptr
}

pub(crate) trait ToCudaResult {
    fn to_cuda_result(self) -> CudaResult<()>;
}

impl ToCudaResult for cust_raw::cudaError_enum {
    fn to_cuda_result(self) -> CudaResult<()> {
        use cust_raw::cudaError_enum;
        match self {
            cudaError_enum::CUDA_SUCCESS => Ok(()),
            cudaError_enum::CUDA_ERROR_INVALID_VALUE => Err(CudaError::InvalidValue),
            cudaError_enum::CUDA_ERROR_OUT_OF_MEMORY => Err(CudaError::OutOfMemory),
            cudaError_enum::CUDA_ERROR_NOT_INITIALIZED => Err(CudaError::NotInitialized),
            cudaError_enum::CUDA_ERROR_DEINITIALIZED => Err(CudaError::Deinitialized),
            cudaError_enum::CUDA_ERROR_NO_DEVICE => Err(CudaError::NoDevice),
            cudaError_enum::CUDA_ERROR_INVALID_DEVICE => Err(CudaError::InvalidDevice),
            cudaError_enum::CUDA_ERROR_INVALID_CONTEXT => Err(CudaError::InvalidContext),
            cudaError_enum::CUDA_ERROR_INVALID_HANDLE => Err(CudaError::InvalidHandle),
            cudaError_enum::CUDA_ERROR_ILLEGAL_ADDRESS => Err(CudaError::IllegalAddress),
            cudaError_enum::CUDA_ERROR_LAUNCH_FAILED => Err(CudaError::LaunchFailed),
            cudaError_enum::CUDA_ERROR_NOT_PERMITTED => Err(CudaError::NotPermitted),
            cudaError_enum::CUDA_ERROR_NOT_SUPPORTED => Err(CudaError::NotSupported),
            _ => Err(CudaError::UnknownError),
        }
    }
}
