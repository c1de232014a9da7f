use std::{
    alloc::{handle_alloc_error, Layout},
    borrow::Borrow,
    mem::{ManuallyDrop, MaybeUninit},
    ops::{Deref, DerefMut},
    ptr::NonNull,
};

use crate::{
    device::{cpu::CpuAlloc, DefaultDeviceAllocator, Device, DeviceAllocator},
    ptr::Ref,
    zero::Zero,
};

/// Same as [`std::vec::Vec`] but using device allocators rather than host allocators.
/// This allows you to have owned buffers on GPUs and CPUs using a single data structure.
pub struct Vec<T, A: DeviceAllocator = CpuAlloc> {
    ptr: NonNull<T>,
    cap: usize,
    len: usize,
    alloc: A,
}

pub type DefaultVec<T, D = crate::device::cpu::Cpu> = Vec<T, <D as DefaultDeviceAllocator>::Alloc>;

unsafe impl<T: Send, A: DeviceAllocator + Send> Send for Vec<T, A> {}
unsafe impl<T: Sync, A: DeviceAllocator + Sync> Sync for Vec<T, A> {}

fn array_layout<T>(cap: usize) -> Layout {
    Layout::array::<T>(cap).unwrap_or_else(|_| panic!("capacity overflow"))
}

impl<T, A: DeviceAllocator> Drop for Vec<T, A> {
    fn drop(&mut self) {
        unsafe {
            if std::mem::needs_drop::<T>() {
                if A::Device::IS_CPU {
                    let slice = std::ptr::slice_from_raw_parts_mut(self.ptr.as_ptr(), self.len);
                    std::ptr::drop_in_place(slice);
                } else {
                    panic!("drop types should not be initialised outside of the CPU")
                }
            }

            if self.cap != 0 && std::mem::size_of::<T>() != 0 {
                self.alloc
                    .deallocate(self.ptr.cast(), array_layout::<T>(self.cap));
            }
        }
    }
}

impl<T: Copy, A: DeviceAllocator + Clone> Clone for Vec<T, A> {
    fn clone(&self) -> Self {
        let slice = self.deref();
        unsafe {
            let mut vec = Self::with_capacity_in(slice.len(), self.alloc.clone());
            vec.space_capacity_mut()[..slice.len()].init_from_slice(slice);
            vec.set_len(slice.len());
            vec
        }
    }
}

impl<T, A: DeviceAllocator> Vec<T, A> {
    /// Allocates room for `capacity` values.
    ///
    /// # Errors
    /// If the allocator fails
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self, A::AllocError> {
        Self::try_alloc(capacity, alloc, false)
    }

    /// Allocates room for `capacity` values.
    ///
    /// # Panics
    /// If the allocator fails
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        Self::try_alloc(capacity, alloc, false)
            .unwrap_or_else(|_| handle_alloc_error(array_layout::<T>(capacity)))
    }

    pub fn with_capacity(capacity: usize) -> Self
    where
        A: Default,
    {
        Self::with_capacity_in(capacity, A::default())
    }

    pub fn zeroed_in(len: usize, alloc: A) -> Self
    where
        T: Zero,
    {
        let mut v = Self::try_alloc(len, alloc, true)
            .unwrap_or_else(|_| handle_alloc_error(array_layout::<T>(len)));
        // Safety: `T: Zero` makes the zeroed bytes valid values
        unsafe { v.set_len(len) };
        v
    }

    pub fn zeroed(len: usize) -> Self
    where
        T: Zero,
        A: Default,
    {
        Self::zeroed_in(len, A::default())
    }

    pub fn copy_from_host_in(slice: &[T], alloc: A) -> Self
    where
        T: Copy,
    {
        unsafe {
            let mut vec = Self::with_capacity_in(slice.len(), alloc);
            vec.space_capacity_mut()[..slice.len()].init_from_host(slice);
            vec.set_len(slice.len());
            vec
        }
    }

    pub fn copy_from_host(slice: &[T]) -> Self
    where
        T: Copy,
        A: Default,
    {
        Self::copy_from_host_in(slice, A::default())
    }

    fn try_alloc(capacity: usize, alloc: A, zeroed: bool) -> Result<Self, A::AllocError> {
        if std::mem::size_of::<T>() == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                cap: usize::MAX,
                len: 0,
                alloc,
            });
        }
        if capacity == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                cap: 0,
                len: 0,
                alloc,
            });
        }

        let layout = array_layout::<T>(capacity);
        let ptr = if zeroed {
            alloc.allocate_zeroed(layout)?
        } else {
            alloc.allocate(layout)?
        };

        Ok(Self {
            ptr: ptr.cast(),
            cap: capacity,
            len: 0,
            alloc,
        })
    }

    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// The allocated but unused tail of the buffer
    pub fn space_capacity_mut(&mut self) -> &mut Ref<[MaybeUninit<T>], A::Device> {
        unsafe {
            Ref::from_raw_parts_mut(
                self.ptr.as_ptr().wrapping_add(self.len).cast(),
                self.cap - self.len,
            )
        }
    }

    /// # Safety
    /// If len is smaller than the current length, the caller must ensure they drop the values.
    /// If the len is greater than the current length, the caller must ensure they have initialised those values
    pub unsafe fn set_len(&mut self, len: usize) {
        self.len = len;
    }

    fn ensure(&mut self, capacity: usize)
    where
        T: Copy,
    {
        if capacity <= self.cap {
            return;
        }

        let new = match capacity {
            1..=4 => 4,
            n => n.next_power_of_two(),
        };

        let (ptr, cap) = match Vec::<T, &A>::try_alloc(new, &self.alloc, false) {
            Ok(v) => v.into_parts(),
            Err(_) => handle_alloc_error(array_layout::<T>(new)),
        };

        unsafe {
            let old = Ref::<[T], A::Device>::from_raw_parts(self.ptr.as_ptr(), self.len);
            let dst = Ref::<[T], A::Device>::from_raw_parts_mut(ptr.as_ptr(), self.len);
            dst.copy_from_slice(old);

            if self.cap != 0 {
                self.alloc
                    .deallocate(self.ptr.cast(), array_layout::<T>(self.cap));
            }
        }

        self.ptr = ptr;
        self.cap = cap;
    }

    /// Appends a value, growing the buffer if needed
    pub fn push(&mut self, val: T)
    where
        T: Copy,
    {
        self.ensure(self.len + 1);
        self.space_capacity_mut()[..1].init_from_host(std::slice::from_ref(&val));
        self.len += 1;
    }
}

impl<'a, A: DeviceAllocator> DeviceAllocator for &'a A {
    type AllocError = A::AllocError;
    type Device = A::Device;

    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, Self::AllocError> {
        (**self).allocate(layout)
    }

    fn allocate_zeroed(&self, layout: Layout) -> Result<NonNull<u8>, Self::AllocError> {
        (**self).allocate_zeroed(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        (**self).deallocate(ptr, layout);
    }
}

impl<'a, T, A: DeviceAllocator> Vec<T, &'a A> {
    /// Leaks the buffer, returning its pointer and capacity
    fn into_parts(self) -> (NonNull<T>, usize) {
        let v = ManuallyDrop::new(self);
        (v.ptr, v.cap)
    }
}

impl<T> From<std::vec::Vec<T>> for Vec<T, CpuAlloc> {
    fn from(v: std::vec::Vec<T>) -> Self {
        let mut v = ManuallyDrop::new(v);
        Self {
            // Safety: std vectors never hold a null pointer
            ptr: unsafe { NonNull::new_unchecked(v.as_mut_ptr()) },
            cap: v.capacity(),
            len: v.len(),
            alloc: CpuAlloc,
        }
    }
}

impl<T> From<Vec<T, CpuAlloc>> for std::vec::Vec<T> {
    fn from(v: Vec<T, CpuAlloc>) -> Self {
        let v = ManuallyDrop::new(v);
        // Safety: `CpuAlloc` uses the global allocator with the same array layout as std
        unsafe { std::vec::Vec::from_raw_parts(v.ptr.as_ptr(), v.len, v.cap) }
    }
}

impl<T> Vec<T, CpuAlloc> {
    pub fn into_std(self) -> std::vec::Vec<T> {
        self.into()
    }
}

impl<T, A: DeviceAllocator> Deref for Vec<T, A> {
    type Target = Ref<[T], A::Device>;

    fn deref(&self) -> &Self::Target {
        unsafe { Ref::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<T, A: DeviceAllocator> DerefMut for Vec<T, A> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        unsafe { Ref::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T, A: DeviceAllocator> Borrow<Ref<[T], A::Device>> for Vec<T, A> {
    fn borrow(&self) -> &Ref<[T], A::Device> {
        self
    }
}

impl<T, A: DeviceAllocator> AsRef<Ref<[T], A::Device>> for Vec<T, A> {
    fn as_ref(&self) -> &Ref<[T], A::Device> {
        self
    }
}

impl<T, A: DeviceAllocator> AsMut<Ref<[T], A::Device>> for Vec<T, A> {
    fn as_mut(&mut self) -> &mut Ref<[T], A::Device> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::Vec;
    use std::ops::Deref;

    #[test]
    fn push() {
        let mut v = Vec::<_>::with_capacity(0);

        assert_eq!(v.capacity(), 0);
        v.push(0);
        assert_eq!(v.capacity(), 4);
        v.push(1);
        assert_eq!(v.capacity(), 4);
        v.push(2);
        assert_eq!(v.capacity(), 4);
        v.push(3);
        assert_eq!(v.capacity(), 4);
        v.push(4);
        assert_eq!(v.capacity(), 8);

        assert_eq!(v.deref().deref(), [0, 1, 2, 3, 4]);
    }

    #[test]
    fn convert() {
        let mut v1 = Vec::with_capacity(0);

        v1.push(0);
        v1.push(1);
        v1.push(2);
        v1.push(3);
        v1.push(4);

        let v2 = vec![0, 1, 2, 3, 4];

        assert_eq!(v1.deref().deref(), v2.as_slice());

        let v3 = Vec::from(v2.clone());
        assert_eq!(v3.into_std(), v2);
        assert_eq!(v1.into_std(), v2);
    }

    #[test]
    fn zeroed_and_clone() {
        let v = Vec::<f64>::zeroed(3);
        let mut w = v.clone();
        w.copy_from_host(&[1.0, 2.0, 3.0]);

        assert_eq!(v.into_std(), vec![0.0; 3]);
        assert_eq!(w.into_std(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn zero_sized() {
        let mut v = Vec::<()>::with_capacity(10);
        v.push(());
        v.push(());
        assert_eq!(v.len(), 2);
        assert_eq!(v.into_std().len(), 2);
    }
}
