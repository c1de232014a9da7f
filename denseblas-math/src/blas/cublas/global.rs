use std::{cell::Cell, ptr::NonNull};

use log::debug;
use rcublas_sys::cublasContext;

use denseblas_sys::device::cuda::Cuda;

use crate::blas::DefaultBLASContext;

use super::SharedCublasContext;

thread_local! {
    static GLOBAL: Cell<Option<NonNull<cublasContext>>> = Cell::new(None);
}

/// Puts the previous thread default back, also when the closure unwinds
struct Restore(Option<NonNull<cublasContext>>);

impl Drop for Restore {
    fn drop(&mut self) {
        GLOBAL.with(|g| g.set(self.0));
    }
}

impl SharedCublasContext {
    /// Runs the given closure with the cublas context as the global thread-local context.
    ///
    /// The previous default is restored when `f` returns or panics, so calls may nest.
    pub fn global_over<R, F: FnOnce(&Self) -> R>(&self, f: F) -> R {
        let handle = NonNull::new(self.handle());
        debug!("installing cublas handle {:p} as thread default", self.handle());

        let _restore = Restore(GLOBAL.with(|g| g.replace(handle)));
        f(self)
    }
}

/// Get the global context set via [`SharedCublasContext::global_over`].
///
/// The reference is only valid until the innermost enclosing `global_over` returns.
/// It must not be stored or sent to another thread.
pub fn get_cublas() -> Option<&'static SharedCublasContext> {
    GLOBAL
        .with(Cell::get)
        .map(|p| unsafe { &*(p.as_ptr() as *const SharedCublasContext) })
}

impl DefaultBLASContext for Cuda {
    type Context = &'static SharedCublasContext;
}

impl Default for &'static SharedCublasContext {
    /// The `'static` lifetime is nominal, see [`get_cublas`].
    ///
    /// # Panics
    /// Outside of [`SharedCublasContext::global_over`]
    fn default() -> Self {
        get_cublas().expect("no global cublas context, use SharedCublasContext::global_over")
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    use denseblas_sys::device::cuda::Context;

    use crate::blas::cublas::CublasContext;

    use super::get_cublas;

    #[test]
    fn default_restored() {
        let _ctx = Context::quick_init().unwrap();
        let outer = CublasContext::new().unwrap();
        let inner = CublasContext::new().unwrap();
        assert!(get_cublas().is_none());

        outer.global_over(|outer| {
            inner.global_over(|inner| {
                assert!(std::ptr::eq(get_cublas().unwrap(), inner));
            });
            assert!(std::ptr::eq(get_cublas().unwrap(), outer));
        });
        assert!(get_cublas().is_none());

        let res = catch_unwind(AssertUnwindSafe(|| {
            outer.global_over(|_| panic!("kernel failed"));
        }));
        assert!(res.is_err());
        assert!(get_cublas().is_none());
    }
}
