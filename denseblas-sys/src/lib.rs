//! Device memory for denseblas.
//!
//! A [`device::Device`] names a memory space, a [`device::DeviceAllocator`] hands out
//! buffers in it, and [`ptr::Ref`] / [`vec::Vec`] are the borrowed and owned slices
//! that live there.

pub mod device;
pub mod ptr;
pub mod vec;
pub mod zero;

pub use vec::{DefaultVec, Vec};

/// Borrow a value as a shared view, like `&[T]` is to `Vec<T>`
pub trait View {
    type Ref<'a>
    where
        Self: 'a;

    fn view(&self) -> Self::Ref<'_>;
}

/// Borrow a value as a mutable view, like `&mut [T]` is to `Vec<T>`
pub trait ViewMut {
    type Mut<'a>
    where
        Self: 'a;

    fn view_mut(&mut self) -> Self::Mut<'_>;
}
