use std::mem::MaybeUninit;

use denseblas_sys::{device::Device, ptr::Ref, View, ViewMut};

use crate::{
    dims::{Dimension, RemoveDim},
    storage::{IntoOwned, Storage, StorageMut},
};

mod dot;
mod matrix;
mod vector;

pub use dot::Dot;
pub use matrix::*;
pub use vector::*;

pub type Slice<T, D> = Ref<[T], D>;
pub type ViewOf<S> = Slice<<S as Storage>::T, <S as Storage>::Device>;

/// A multidimensional data structure not unlike [`ndarray::ArrayBase`](https://docs.rs/ndarray).
///
/// Data is column-major by default. Any axis may be strided, but the BLAS
/// operations need matrices with one unit stride.
#[derive(Clone, Copy)]
pub struct Tensor<S: Storage, Dim: Dimension> {
    shape: Dim,
    strides: Dim,
    data: S,
}

impl<S: Storage, Dim: Dimension> View for Tensor<S, Dim> {
    type Ref<'a> = TensorView<'a, S::T, S::Device, Dim>
    where
        Self: 'a;

    fn view(&self) -> TensorView<S::T, S::Device, Dim> {
        Tensor {
            shape: self.shape.clone(),
            strides: self.strides.clone(),
            data: self.data.as_ref(),
        }
    }
}

impl<S: StorageMut, Dim: Dimension> ViewMut for Tensor<S, Dim> {
    type Mut<'a> = TensorViewMut<'a, S::T, S::Device, Dim>
    where
        Self: 'a;

    fn view_mut(&mut self) -> TensorViewMut<S::T, S::Device, Dim> {
        Tensor {
            shape: self.shape.clone(),
            strides: self.strides.clone(),
            data: self.data.as_mut(),
        }
    }
}

impl<S: Storage, Dim: Dimension> Tensor<S, Dim> {
    /// Creates a new tensor using the shape and the raw data.
    ///
    /// # Panics
    /// The length of the data structure must match the size of the dimensions
    pub fn from_shape(shape: Dim, data: S) -> Self {
        assert_eq!(data.as_ref().len(), shape.len());
        let strides = shape.column_major_strides();
        Self {
            shape,
            strides,
            data,
        }
    }

    /// Consumes the tensor, returning the underlying data
    pub fn into_inner(self) -> S {
        self.data
    }

    pub fn shape(&self) -> &Dim {
        &self.shape
    }

    pub fn strides(&self) -> &Dim {
        &self.strides
    }

    /// Reverses the axes of the tensor. An inplace transpose
    pub fn reverse_axes(&mut self) {
        self.shape.as_mut().reverse();
        self.strides.as_mut().reverse();
    }

    /// Swaps the axes of the tensor.
    pub fn swap_axes(&mut self, i: usize, j: usize) {
        self.shape.as_mut().swap(i, j);
        self.strides.as_mut().swap(i, j);
    }

    /// Returns a view with the axes reversed
    pub fn t(&self) -> TensorView<S::T, S::Device, Dim> {
        let mut view = self.view();
        view.reverse_axes();
        view
    }

    /// Creates a new owned version of the tensor.
    /// Will only clone the contents if needed
    pub fn into_owned(self) -> Tensor<S::Owned, Dim>
    where
        S: IntoOwned,
        S::Owned: Storage<T = S::T, Device = S::Device>,
    {
        Tensor {
            shape: self.shape,
            strides: self.strides,
            data: self.data.into_owned(),
        }
    }

    /// Slices the tensor over a specific axis. The resulting tensor will be a dimension smaller
    ///
    /// # Panics
    /// If the axis or the index along it is out of range
    pub fn slice_axis(&self, axis: usize, n: usize) -> TensorView<S::T, S::Device, Dim::Smaller>
    where
        Dim: RemoveDim,
    {
        assert!(axis < self.shape.as_ref().len());

        let (shape, m) = self.shape.remove(axis);
        let (strides, s) = self.strides.remove(axis);

        assert!(n < m);

        Tensor {
            shape,
            strides,
            data: &self.data.as_ref()[s * n..],
        }
    }

    /// Mutably slices the tensor over a specific axis
    ///
    /// # Panics
    /// If the axis or the index along it is out of range
    pub fn slice_axis_mut(
        &mut self,
        axis: usize,
        n: usize,
    ) -> TensorViewMut<S::T, S::Device, Dim::Smaller>
    where
        S: StorageMut,
        Dim: RemoveDim,
    {
        assert!(axis < self.shape.as_ref().len());

        let (shape, m) = self.shape.remove(axis);
        let (strides, s) = self.strides.remove(axis);

        assert!(n < m);

        Tensor {
            shape,
            strides,
            data: &mut self.data.as_mut()[s * n..],
        }
    }
}

/// A 'view' of a tensor, Like `&[T]` is to `Vec<T>`
pub type TensorView<'a, T, D, Dim> = Tensor<&'a Slice<T, D>, Dim>;

/// A 'mut view' of a tensor, Like `&mut [T]` is to `Vec<T>`
pub type TensorViewMut<'a, T, D, Dim> = Tensor<&'a mut Slice<T, D>, Dim>;

/// An uninit tensor. Contents are mutable and specified as [`MaybeUninit`].
pub type UninitTensor<'a, T, D, Dim> = TensorViewMut<'a, MaybeUninit<T>, D, Dim>;

impl<'a, T, D: Device, Dim: Dimension> UninitTensor<'a, T, D, Dim> {
    /// # Safety
    /// Contents must be initialised
    pub unsafe fn assume_init(self) -> TensorViewMut<'a, T, D, Dim> {
        Tensor {
            shape: self.shape,
            strides: self.strides,
            data: self.data.assume_init_mut(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::ops::Deref;

    use denseblas_sys::View;

    use super::Tensor;

    #[test]
    fn slice() {
        // column major
        let a = [0., 1., 2., 3., 4., 5.];
        let a = Tensor::from_shape([2, 3], a);

        // axis 0 (rows)
        let a00 = a.slice_axis(0, 0);
        assert_eq!(a00.data.deref(), [0., 1., 2., 3., 4., 5.]); // represents 0, 2, 4
        assert_eq!(a00.shape, [3]);
        assert_eq!(a00.strides, [2]);

        let a01 = a.slice_axis(0, 1);
        assert_eq!(a01.data.deref(), [1., 2., 3., 4., 5.]); // represents 1, 3, 5
        assert_eq!(a01.shape, [3]);
        assert_eq!(a01.strides, [2]);

        // axis 1 (columns)
        let a11 = a.slice_axis(1, 1);
        assert_eq!(a11.data.deref(), [2., 3., 4., 5.]); // represents 2, 3
        assert_eq!(a11.shape, [2]);
        assert_eq!(a11.strides, [1]);

        let a12 = a.slice_axis(1, 2);
        assert_eq!(a12.data.deref(), [4., 5.]); // represents 4, 5
        assert_eq!(a12.shape, [2]);
        assert_eq!(a12.strides, [1]);
    }

    #[test]
    fn transpose_view() {
        let a = Tensor::from_shape([2, 3], [0_u8; 6]);
        let t = a.t();
        assert_eq!(t.shape(), &[3, 2]);
        assert_eq!(t.strides(), &[2, 1]);

        let mut v = a.view();
        v.swap_axes(0, 1);
        assert_eq!(v.shape, t.shape);
        assert_eq!(v.strides, t.strides);
    }

    #[test]
    fn slice_mut_writes_through() {
        let mut a = Tensor::from_shape([2, 2], vec![1.0_f32, 2.0, 3.0, 4.0]);
        {
            let col = a.slice_axis_mut(1, 1);
            col.data.copy_from_host(&[7.0, 8.0]);
        }
        assert_eq!(a.into_inner(), vec![1.0, 2.0, 7.0, 8.0]);
    }

    #[test]
    #[should_panic]
    fn from_shape_checks_len() {
        let _ = Tensor::from_shape([2, 2], [0.0_f64; 3]);
    }

    #[test]
    fn owned_from_view() {
        let a = Tensor::from_shape([3], [1_i32, 2, 3]);
        let owned = a.view().into_owned();
        assert_eq!(owned.into_inner().into_std(), vec![1, 2, 3]);
    }
}
