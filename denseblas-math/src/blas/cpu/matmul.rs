use crate::blas::MatrixOp;

/// Row and column strides of `op(A)` for a column-major `A`
fn strides(trans: MatrixOp, ld: usize) -> (isize, isize) {
    let mut s = [1, ld as isize];
    match trans {
        MatrixOp::NoTrans => (),
        // real matrices, so conjugation is a no-op
        MatrixOp::Trans | MatrixOp::ConjTrans => s.rotate_left(1),
    }
    (s[0], s[1])
}

macro_rules! impl_matmul {
    ($name:ident, $float:ty, $kernel:path) => {
        /// Real gemm through the `matrixmultiply` packing kernels
        #[allow(clippy::too_many_arguments, clippy::cast_possible_wrap)]
        pub unsafe fn $name(
            transa: MatrixOp,
            transb: MatrixOp,
            m: usize,
            n: usize,
            k: usize,
            alpha: $float,
            a: *mut $float,
            lda: usize,
            b: *mut $float,
            ldb: usize,
            beta: $float,
            c: *mut $float,
            ldc: usize,
        ) {
            let (rsa, csa) = strides(transa, lda);
            let (rsb, csb) = strides(transb, ldb);

            $kernel(
                m,
                k,
                n,
                alpha,
                a,
                rsa,
                csa,
                b,
                rsb,
                csb,
                beta,
                c,
                1,
                ldc as isize,
            );
        }
    };
}

impl_matmul!(sgemm, f32, matrixmultiply::sgemm);
impl_matmul!(dgemm, f64, matrixmultiply::dgemm);

#[cfg(test)]
mod tests {
    use crate::blas::MatrixOp;

    #[test]
    fn transposed_operands() {
        // A = 1 3    B = 5 7
        //     2 4        6 8
        let mut a = [1.0_f64, 2.0, 3.0, 4.0];
        let mut b = [5.0_f64, 6.0, 7.0, 8.0];
        let mut c = [0.0_f64; 4];

        // AᵀBᵀ = 19 22
        //        43 50
        unsafe {
            super::dgemm(
                MatrixOp::Trans,
                MatrixOp::Trans,
                2,
                2,
                2,
                1.0,
                a.as_mut_ptr(),
                2,
                b.as_mut_ptr(),
                2,
                0.0,
                c.as_mut_ptr(),
                2,
            );
        }
        assert_eq!(c, [19.0, 43.0, 22.0, 50.0]);
    }
}
