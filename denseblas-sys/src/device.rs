use std::{alloc::Layout, ptr::NonNull};

use crate::ptr::Ref;

pub mod cpu;
#[cfg(feature = "cuda")]
pub mod cuda;

/// A memory space that buffers can live in.
pub trait Device: Sized {
    /// The pointer type that addresses memory on this device
    type Ptr<T>: DevicePtr<T>;

    /// Whether memory on this device can be read directly by the host
    const IS_CPU: bool = false;

    /// Copies `from` on the host into `to` on the device.
    ///
    /// # Panics
    /// If the lengths differ or the device reports an error
    fn copy_from_host<T: Copy>(from: &[T], to: &mut Ref<[T], Self>);

    /// Copies `from` on the device into `to` on the host.
    ///
    /// # Panics
    /// If the lengths differ or the device reports an error
    fn copy_to_host<T: Copy>(from: &Ref<[T], Self>, to: &mut [T]);

    /// Copies between two buffers on the same device.
    ///
    /// # Panics
    /// If the lengths differ or the device reports an error
    fn copy<T: Copy>(from: &Ref<[T], Self>, to: &mut Ref<[T], Self>);
}

pub trait DevicePtr<T>: Copy {
    fn as_raw(self) -> *mut T;
    fn from_raw(ptr: *mut T) -> Self;
}

/// Allocates buffers on a [`Device`].
///
/// Returned pointers are device addresses. They are only dereferencable
/// on the host if [`Device::IS_CPU`] is set.
pub trait DeviceAllocator {
    type AllocError: std::error::Error;
    type Device: Device;

    /// `layout` must have a non-zero size
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, Self::AllocError>;

    /// `layout` must have a non-zero size
    fn allocate_zeroed(&self, layout: Layout) -> Result<NonNull<u8>, Self::AllocError>;

    /// # Safety
    /// `ptr` must have been returned by this allocator with the same `layout`
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

/// The allocator used when none is given explicitly
pub trait DefaultDeviceAllocator: Device {
    type Alloc: DeviceAllocator<Device = Self> + Default;

    fn default_alloc() -> Self::Alloc {
        Self::Alloc::default()
    }
}
