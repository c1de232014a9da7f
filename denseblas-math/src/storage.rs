//! The buffers a [`Tensor`](crate::tensor::Tensor) can sit on.
//!
//! Every storage derefs to a device slice, so the BLAS wrappers only ever see
//! a base pointer plus the tensor's strides. Which impl is picked decides who
//! owns the elements:
//!
//! * [`Vec<T, A>`] owns a device buffer. Results such as `Matrix::dot` are written into one.
//! * `&Ref<[T], D>` is a read-only operand (`A`, `B` or `x`).
//! * `&mut Ref<[T], D>` is an in/out operand (`C`, `y`, or `B` of `trsm`).
//! * `[T; N]` and [`std::vec::Vec<T>`] are host buffers, handy for small inputs and tests.

use denseblas_sys::{
    device::{cpu::Cpu, DefaultDeviceAllocator, Device, DeviceAllocator},
    ptr::Ref,
    Vec,
};

/// Convert a value into a storage that owns its elements.
///
/// Views copy into a fresh buffer from the device's default allocator,
/// owning storages are returned as they are.
pub trait IntoOwned {
    type Owned;
    fn into_owned(self) -> Self::Owned;
}

/// Elements of type `T` on `Device`, readable as a BLAS operand
pub trait Storage: AsRef<Ref<[Self::T], Self::Device>> {
    type T;
    type Device: Device;
}

/// A [`Storage`] that BLAS routines may write their output into
pub trait StorageMut: Storage + AsMut<Ref<[Self::T], Self::Device>> {}

impl<T, A: DeviceAllocator> Storage for Vec<T, A> {
    type T = T;
    type Device = A::Device;
}

impl<T, A: DeviceAllocator> StorageMut for Vec<T, A> {}

impl<T, A: DeviceAllocator> IntoOwned for Vec<T, A> {
    type Owned = Self;
    fn into_owned(self) -> Self::Owned {
        self
    }
}

impl<'a, T, D: Device> Storage for &'a Ref<[T], D> {
    type T = T;
    type Device = D;
}

impl<'a, T: Copy, D: DefaultDeviceAllocator> IntoOwned for &'a Ref<[T], D> {
    type Owned = Vec<T, D::Alloc>;
    fn into_owned(self) -> Self::Owned {
        self.to_owned()
    }
}

impl<'a, T, D: Device> Storage for &'a mut Ref<[T], D> {
    type T = T;
    type Device = D;
}

impl<'a, T, D: Device> StorageMut for &'a mut Ref<[T], D> {}

impl<'a, T: Copy, D: DefaultDeviceAllocator> IntoOwned for &'a mut Ref<[T], D> {
    type Owned = Vec<T, D::Alloc>;
    fn into_owned(self) -> Self::Owned {
        (*self).to_owned()
    }
}

/// Host-only buffers. They already own their elements.
macro_rules! host_storage {
    ($([$($gen:tt)*] $ty:ty;)*) => {$(
        impl<$($gen)*> Storage for $ty {
            type T = T;
            type Device = Cpu;
        }

        impl<$($gen)*> StorageMut for $ty {}

        impl<$($gen)*> IntoOwned for $ty {
            type Owned = Self;
            fn into_owned(self) -> Self::Owned {
                self
            }
        }
    )*};
}

host_storage! {
    [T, const N: usize] [T; N];
    [T] std::vec::Vec<T>;
}

#[cfg(test)]
mod tests {
    use denseblas_sys::View;

    use crate::tensor::{Tensor, Vector};

    #[test]
    fn host_buffers_as_operands() {
        let x = Vector::from_shape([3], vec![1.0_f64, 2.0, 3.0]);
        let y = Vector::from_shape([3], [4.0_f64, 5.0, 6.0]);

        assert_eq!(x.dot(y.view()).unwrap(), 32.0);
        assert_eq!(y.dot(x.view()).unwrap(), 32.0);
    }

    #[test]
    fn owned_results() {
        // a view copies out, the source keeps its values
        let a = Tensor::from_shape([2, 2], [1.0_f64, 2.0, 3.0, 4.0]);
        let owned = a.t().into_owned();
        assert_eq!(owned.into_inner().into_std(), [1.0, 2.0, 3.0, 4.0]);

        // an array stays an array
        let x = Vector::from_shape([2], [1.0_f64, -2.0]);
        let y = x * 3.0;
        assert_eq!(y.into_inner(), [3.0, -6.0]);
    }
}
