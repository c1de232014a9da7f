/// Types whose all-zero bit pattern is a valid value equal to zero,
/// so buffers of them can be created with `allocate_zeroed`.
///
/// # Safety
/// `[0u8; size_of::<Self>()]` must be a valid `Self`
pub unsafe trait Zero: Copy {}

macro_rules! impl_zero {
    ($($t:ty),*) => {
        $(unsafe impl Zero for $t {})*
    };
}

impl_zero!(f32, f64, u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

// `Complex<T>` is `repr(C)` over two `T`s
unsafe impl<T: Zero> Zero for num_complex::Complex<T> {}
