use cust::{context::ContextFlags, error::CudaResult};
use cust_raw::CUcontext;

use super::ToCudaResult;

/// An owned CUDA context, destroyed on drop
pub struct Context {
    inner: CUcontext,
}

impl Context {
    /// Initialises the CUDA driver API and creates a context on device `ordinal`.
    ///
    /// The context must outlive any device memory or cuBLAS handle created under it.
    #[must_use = "The CUDA Context must be kept alive or errors will be issued for any CUDA function that is run"]
    pub fn new(ordinal: u32) -> CudaResult<Self> {
        cust::init(cust::CudaFlags::empty())?;
        let device = cust::device::Device::get_device(ordinal)?;
        let flags = ContextFlags::MAP_HOST | ContextFlags::SCHED_AUTO;

        let mut inner: CUcontext = std::ptr::null_mut();
        unsafe {
            cust_raw::cuCtxCreate_v2(&mut inner, flags.bits(), device.as_raw()).to_cuda_result()?;
        }
        Ok(Self { inner })
    }

    /// [`Context::new`] on the first device, e.g. `let _ctx = Context::quick_init()?;`
    #[must_use = "The CUDA Context must be kept alive or errors will be issued for any CUDA function that is run"]
    pub fn quick_init() -> CudaResult<Self> {
        Self::new(0)
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        if !self.inner.is_null() {
            unsafe {
                cust_raw::cuCtxDestroy_v2(self.inner);
            }
        }
    }
}
