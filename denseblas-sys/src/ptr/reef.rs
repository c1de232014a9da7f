use std::{
    marker::PhantomData,
    mem::MaybeUninit,
    ops::{Deref, DerefMut, Index, IndexMut},
};

use crate::{
    device::{cpu::Cpu, DefaultDeviceAllocator, Device, DevicePtr},
    vec::Vec,
};

/// A reference type for devices. Has the same representation as `T` but is not
/// safely transmutable. Device references can not be read directly since
/// the host is not guaranteed to be able to address that device.
#[repr(transparent)]
pub struct Ref<T: ?Sized, D> {
    _device: PhantomData<D>,
    inner: T,
}

impl<T, D: Device> Ref<[T], D> {
    /// # Safety
    /// `ptr` must point to `len` initialised values in an allocation on `D`
    /// that outlives `'a`
    pub unsafe fn from_raw_parts<'a>(ptr: *mut T, len: usize) -> &'a Self {
        &*(std::ptr::slice_from_raw_parts(ptr, len) as *const Self)
    }

    /// # Safety
    /// Same as [`Ref::from_raw_parts`], and there must be no other live
    /// reference to the same memory
    pub unsafe fn from_raw_parts_mut<'a>(ptr: *mut T, len: usize) -> &'a mut Self {
        &mut *(std::ptr::slice_from_raw_parts_mut(ptr, len) as *mut Self)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn as_ptr(&self) -> D::Ptr<T> {
        D::Ptr::from_raw(self.inner.as_ptr() as *mut T)
    }

    pub fn as_mut_ptr(&mut self) -> D::Ptr<T> {
        D::Ptr::from_raw(self.inner.as_mut_ptr())
    }
}

impl<T, D: Device> Ref<[MaybeUninit<T>], D> {
    /// # Safety
    /// Contents must be initialised
    pub unsafe fn assume_init(&self) -> &Ref<[T], D> {
        &*(self as *const Self as *const Ref<[T], D>)
    }

    /// # Safety
    /// Contents must be initialised
    pub unsafe fn assume_init_mut(&mut self) -> &mut Ref<[T], D> {
        &mut *(self as *mut Self as *mut Ref<[T], D>)
    }
}

impl<T: Copy, D: Device> Ref<[T], D> {
    pub fn copy_from_slice(&mut self, from: &Self) {
        D::copy(from, self);
    }

    pub fn copy_from_host(&mut self, from: &[T]) {
        D::copy_from_host(from, self);
    }

    pub fn copy_to_host(&self, to: &mut [T]) {
        D::copy_to_host(self, to);
    }
}

impl<T: Copy, D: Device> Ref<[MaybeUninit<T>], D> {
    pub fn init_from_slice(&mut self, from: &Ref<[T], D>) {
        // writing initialised values never reads the uninit memory
        unsafe { self.assume_init_mut().copy_from_slice(from) }
    }

    pub fn init_from_host(&mut self, from: &[T]) {
        unsafe { self.assume_init_mut().copy_from_host(from) }
    }
}

impl<T: Copy, D: DefaultDeviceAllocator> ToOwned for Ref<[T], D> {
    type Owned = Vec<T, D::Alloc>;

    fn to_owned(&self) -> Self::Owned {
        unsafe {
            let mut v = Vec::with_capacity_in(self.len(), D::default_alloc());
            v.space_capacity_mut()[..self.len()].init_from_slice(self);
            v.set_len(self.len());
            v
        }
    }
}

impl<T> Deref for Ref<[T], Cpu> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T> DerefMut for Ref<[T], Cpu> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl<T, D: Device> AsRef<Ref<[T], D>> for Ref<[T], D> {
    fn as_ref(&self) -> &Ref<[T], D> {
        self
    }
}

impl<T, D: Device> AsMut<Ref<[T], D>> for Ref<[T], D> {
    fn as_mut(&mut self) -> &mut Ref<[T], D> {
        self
    }
}

impl<T, D: Device, S> Index<S> for Ref<[T], D>
where
    [T]: Index<S, Output = [T]>,
{
    type Output = Self;

    fn index(&self, index: S) -> &Self::Output {
        unsafe { &*(&self.inner[index] as *const [T] as *const Self) }
    }
}

impl<T, D: Device, S> IndexMut<S> for Ref<[T], D>
where
    [T]: IndexMut<S, Output = [T]>,
{
    fn index_mut(&mut self, index: S) -> &mut Self::Output {
        unsafe { &mut *(&mut self.inner[index] as *mut [T] as *mut Self) }
    }
}

impl<T> AsRef<Ref<[T], Cpu>> for [T] {
    fn as_ref(&self) -> &Ref<[T], Cpu> {
        unsafe { &*(self as *const [T] as *const Ref<[T], Cpu>) }
    }
}

impl<T> AsMut<Ref<[T], Cpu>> for [T] {
    fn as_mut(&mut self) -> &mut Ref<[T], Cpu> {
        unsafe { &mut *(self as *mut [T] as *mut Ref<[T], Cpu>) }
    }
}

impl<T, const N: usize> AsRef<Ref<[T], Cpu>> for [T; N] {
    fn as_ref(&self) -> &Ref<[T], Cpu> {
        unsafe { &*(self.as_slice() as *const [T] as *const Ref<[T], Cpu>) }
    }
}

impl<T, const N: usize> AsMut<Ref<[T], Cpu>> for [T; N] {
    fn as_mut(&mut self) -> &mut Ref<[T], Cpu> {
        unsafe { &mut *(self.as_mut_slice() as *mut [T] as *mut Ref<[T], Cpu>) }
    }
}

impl<T> AsRef<Ref<[T], Cpu>> for std::vec::Vec<T> {
    fn as_ref(&self) -> &Ref<[T], Cpu> {
        unsafe { &*(self.as_slice() as *const [T] as *const Ref<[T], Cpu>) }
    }
}

impl<T> AsMut<Ref<[T], Cpu>> for std::vec::Vec<T> {
    fn as_mut(&mut self) -> &mut Ref<[T], Cpu> {
        unsafe { &mut *(self.as_mut_slice() as *mut [T] as *mut Ref<[T], Cpu>) }
    }
}

#[cfg(test)]
mod tests {
    use std::mem::MaybeUninit;

    use crate::device::cpu::Cpu;

    use super::Ref;

    #[test]
    fn index_keeps_device() {
        let mut data = [1.0_f32, 2.0, 3.0, 4.0];
        let r: &mut Ref<[f32], Cpu> = data.as_mut();

        assert_eq!(r.len(), 4);
        assert_eq!(&*r[1..3], [2.0, 3.0]);

        r[2..].copy_from_host(&[7.0, 8.0]);
        assert_eq!(data, [1.0, 2.0, 7.0, 8.0]);
    }

    #[test]
    fn init_uninit() {
        let mut buf = [MaybeUninit::<u32>::uninit(); 3];
        let r: &mut Ref<[MaybeUninit<u32>], Cpu> = buf.as_mut();
        r.init_from_host(&[4, 5, 6]);

        let r = unsafe { r.assume_init() };
        assert_eq!(&**r, [4, 5, 6]);
    }

    #[test]
    fn to_owned() {
        let data = [1_u8, 2, 3];
        let r: &Ref<[u8], Cpu> = data.as_ref();
        let v = r.to_owned();
        assert_eq!(v.into_std(), vec![1, 2, 3]);
    }
}
