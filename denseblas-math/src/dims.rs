#[allow(clippy::len_without_is_empty)]
/// A dimension type for a tensor
pub trait Dimension: AsRef<[usize]> + AsMut<[usize]> + Clone {
    /// Number of elements covered by the shape
    fn len(&self) -> usize {
        self.as_ref().iter().product()
    }

    /// Strides of a densely packed column-major tensor of this shape
    #[must_use]
    fn column_major_strides(&self) -> Self {
        let mut strides = self.clone();
        let s = strides.as_mut();
        if let Some(first) = s.first_mut() {
            *first = 1;
        }

        for i in 1..s.len() {
            s[i] = s[i - 1] * self.as_ref()[i - 1];
        }

        strides
    }
}

impl<const N: usize> Dimension for [usize; N] {}
impl Dimension for std::vec::Vec<usize> {}

/// Reduce an axis from a dimension
pub trait RemoveDim: Dimension {
    type Smaller: Dimension;

    /// Removes `axis`, returning the remaining dimension and the removed length
    fn remove(&self, axis: usize) -> (Self::Smaller, usize);
}

macro_rules! impl_remove_dim {
    ($($n:literal => $m:literal),*) => {$(
        impl RemoveDim for [usize; $n] {
            type Smaller = [usize; $m];

            fn remove(&self, axis: usize) -> (Self::Smaller, usize) {
                assert!(axis < $n);

                let mut new = [0; $m];
                let (lhs, rhs) = self.split_at(axis);
                new[..axis].copy_from_slice(lhs);
                new[axis..].copy_from_slice(&rhs[1..]);
                (new, rhs[0])
            }
        }
    )*};
}

impl_remove_dim!(1 => 0, 2 => 1, 3 => 2, 4 => 3);

impl RemoveDim for std::vec::Vec<usize> {
    type Smaller = Self;

    fn remove(&self, axis: usize) -> (Self::Smaller, usize) {
        let mut new = self.clone();
        let n = std::vec::Vec::remove(&mut new, axis);
        (new, n)
    }
}

#[cfg(test)]
mod tests {
    use super::{Dimension, RemoveDim};

    #[test]
    fn strides() {
        assert_eq!([3, 4, 5].column_major_strides(), [1, 3, 12]);
        assert_eq!([0_usize; 0].column_major_strides(), []);
        assert_eq!(vec![2, 2].column_major_strides(), vec![1, 2]);
    }

    #[test]
    fn remove() {
        assert_eq!([3, 4, 5].remove(1), ([3, 5], 4));
        assert_eq!([7].remove(0), ([], 7));
        assert_eq!(RemoveDim::remove(&vec![3, 4, 5], 2), (vec![3, 4], 5));
    }
}
