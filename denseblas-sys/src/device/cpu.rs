use std::{
    alloc::Layout,
    ops::{Deref, DerefMut},
    ptr::NonNull,
};

use thiserror::Error;

use crate::ptr::Ref;

use super::{DefaultDeviceAllocator, Device, DeviceAllocator, DevicePtr};

/// Host memory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cpu;

/// Allocates host memory through the global allocator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuAlloc;

#[derive(Debug, Error)]
#[error("failed to allocate {size} bytes of host memory")]
pub struct CpuAllocError {
    size: usize,
}

impl Device for Cpu {
    type Ptr<T> = *mut T;

    const IS_CPU: bool = true;

    fn copy_from_host<T: Copy>(from: &[T], to: &mut Ref<[T], Self>) {
        to.deref_mut().copy_from_slice(from);
    }

    fn copy_to_host<T: Copy>(from: &Ref<[T], Self>, to: &mut [T]) {
        to.copy_from_slice(from.deref());
    }

    fn copy<T: Copy>(from: &Ref<[T], Self>, to: &mut Ref<[T], Self>) {
        to.deref_mut().copy_from_slice(from.deref());
    }
}

impl DeviceAllocator for CpuAlloc {
    type AllocError = CpuAllocError;
    type Device = Cpu;

    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, CpuAllocError> {
        debug_assert_ne!(layout.size(), 0);
        let ptr = unsafe { std::alloc::alloc(layout) };
        NonNull::new(ptr).ok_or(CpuAllocError {
            size: layout.size(),
        })
    }

    fn allocate_zeroed(&self, layout: Layout) -> Result<NonNull<u8>, CpuAllocError> {
        debug_assert_ne!(layout.size(), 0);
        let ptr = unsafe { std::alloc::alloc_zeroed(layout) };
        NonNull::new(ptr).ok_or(CpuAllocError {
            size: layout.size(),
        })
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        std::alloc::dealloc(ptr.as_ptr(), layout);
    }
}

impl DefaultDeviceAllocator for Cpu {
    type Alloc = CpuAlloc;
}

impl<T> DevicePtr<T> for *mut T {
    fn as_raw(self) -> *mut T {
        self
    }

    fn from_raw(ptr: *mut T) -> Self {
        ptr
    }
}
