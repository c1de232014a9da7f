//! Portable kernels over raw host pointers.
//!
//! Matrices are column-major, `a(i, j)` lives at `a[i + j * lda]`.
//! Callers guarantee the extents, these functions do no bounds checking.

use num_traits::{Float, One, Zero};

use crate::blas::{Diag, MatrixOp, Scalar, Side, UpLo};

#[inline]
unsafe fn get<T: Copy>(p: *mut T, i: usize, inc: usize) -> T {
    *p.add(i * inc)
}

#[inline]
unsafe fn set<T>(p: *mut T, i: usize, inc: usize, v: T) {
    *p.add(i * inc) = v;
}

unsafe fn gather<T: Copy>(n: usize, x: *mut T, incx: usize) -> Vec<T> {
    (0..n).map(|i| get(x, i, incx)).collect()
}

unsafe fn scatter<T: Copy>(v: &[T], x: *mut T, incx: usize) {
    for (i, &e) in v.iter().enumerate() {
        set(x, i, incx, e);
    }
}

/// Element `(i, j)` of `op(A)`
#[inline]
unsafe fn op_elem<T: Scalar>(trans: MatrixOp, a: *mut T, lda: usize, i: usize, j: usize) -> T {
    match trans {
        MatrixOp::NoTrans => *a.add(i + j * lda),
        MatrixOp::Trans => *a.add(j + i * lda),
        MatrixOp::ConjTrans => (*a.add(j + i * lda)).conj(),
    }
}

/// Element `(i, j)` of a symmetric matrix stored in the `uplo` triangle
#[inline]
unsafe fn sym<T: Scalar>(uplo: UpLo, a: *mut T, lda: usize, i: usize, j: usize) -> T {
    let stored = match uplo {
        UpLo::Upper => i <= j,
        UpLo::Lower => i >= j,
    };
    if stored {
        *a.add(i + j * lda)
    } else {
        *a.add(j + i * lda)
    }
}

/// Whether `op(A)` is upper triangular
fn op_upper(uplo: UpLo, trans: MatrixOp) -> bool {
    (uplo == UpLo::Upper) == (trans == MatrixOp::NoTrans)
}

/// `M * b` for a triangular `M` given elementwise
fn tri_mul<T: Scalar>(
    b: &[T],
    upper: bool,
    unit: bool,
    m: impl Fn(usize, usize) -> T,
) -> Vec<T> {
    let n = b.len();
    (0..n)
        .map(|i| {
            let mut sum = if unit { b[i] } else { m(i, i) * b[i] };
            let range = if upper { i + 1..n } else { 0..i };
            for j in range {
                sum += m(i, j) * b[j];
            }
            sum
        })
        .collect()
}

/// Solves `M * x = b` in place for a triangular `M` given elementwise
fn tri_solve<T: Scalar>(b: &mut [T], upper: bool, unit: bool, m: impl Fn(usize, usize) -> T) {
    let n = b.len();
    let mut solve = |i: usize, others: std::ops::Range<usize>| {
        let mut v = b[i];
        for j in others {
            v -= m(i, j) * b[j];
        }
        b[i] = if unit { v } else { v / m(i, i) };
    };

    if upper {
        for i in (0..n).rev() {
            solve(i, i + 1..n);
        }
    } else {
        for i in 0..n {
            solve(i, 0..i);
        }
    }
}

// level 1

pub unsafe fn amax<T: Scalar>(n: usize, x: *mut T, incx: usize) -> usize {
    let mut best = 0;
    let mut max = T::Real::zero();
    for i in 0..n {
        let v = get(x, i, incx).abs1();
        if i == 0 || v > max {
            best = i;
            max = v;
        }
    }
    best
}

pub unsafe fn asum<T: Scalar>(n: usize, x: *mut T, incx: usize) -> T::Real {
    (0..n).fold(T::Real::zero(), |acc, i| acc + get(x, i, incx).abs1())
}

pub unsafe fn axpy<T: Scalar>(n: usize, alpha: T, x: *mut T, incx: usize, y: *mut T, incy: usize) {
    if alpha.is_zero() {
        return;
    }
    for i in 0..n {
        *y.add(i * incy) += alpha * get(x, i, incx);
    }
}

#[allow(clippy::too_many_arguments)]
pub unsafe fn axpby<T: Scalar>(
    n: usize,
    alpha: T,
    x: *mut T,
    incx: usize,
    beta: T,
    y: *mut T,
    incy: usize,
    out: *mut T,
    inco: usize,
) {
    for i in 0..n {
        let mut v = alpha * get(x, i, incx);
        if !beta.is_zero() {
            v += beta * get(y, i, incy);
        }
        set(out, i, inco, v);
    }
}

#[allow(clippy::too_many_arguments)]
pub unsafe fn axpbypcz<T: Scalar>(
    n: usize,
    alpha: T,
    x: *mut T,
    incx: usize,
    beta: T,
    y: *mut T,
    incy: usize,
    gamma: T,
    z: *mut T,
    incz: usize,
    out: *mut T,
    inco: usize,
) {
    for i in 0..n {
        let v = alpha * get(x, i, incx) + beta * get(y, i, incy) + gamma * get(z, i, incz);
        set(out, i, inco, v);
    }
}

#[allow(clippy::too_many_arguments)]
pub unsafe fn xmy<T: Scalar>(
    n: usize,
    x: *mut T,
    incx: usize,
    y: *mut T,
    incy: usize,
    out: *mut T,
    inco: usize,
) {
    for i in 0..n {
        set(out, i, inco, get(x, i, incx) * get(y, i, incy));
    }
}

pub unsafe fn copy<T: Scalar>(n: usize, x: *mut T, incx: usize, y: *mut T, incy: usize) {
    for i in 0..n {
        set(y, i, incy, get(x, i, incx));
    }
}

pub unsafe fn dot<T: Scalar>(n: usize, x: *mut T, incx: usize, y: *mut T, incy: usize) -> T {
    (0..n).fold(T::zero(), |acc, i| acc + get(x, i, incx) * get(y, i, incy))
}

pub unsafe fn dotc<T: Scalar>(n: usize, x: *mut T, incx: usize, y: *mut T, incy: usize) -> T {
    (0..n).fold(T::zero(), |acc, i| {
        acc + get(x, i, incx).conj() * get(y, i, incy)
    })
}

pub unsafe fn fill<T: Scalar>(n: usize, alpha: T, x: *mut T, incx: usize) {
    for i in 0..n {
        set(x, i, incx, alpha);
    }
}

pub unsafe fn nrm1<T: Scalar>(n: usize, x: *mut T, incx: usize) -> T::Real {
    (0..n).fold(T::Real::zero(), |acc, i| acc + get(x, i, incx).modulus())
}

/// Euclidean norm, accumulated as `scale² * ssq` so that neither
/// large nor tiny entries overflow or underflow when squared
pub unsafe fn nrm2<T: Scalar>(n: usize, x: *mut T, incx: usize) -> T::Real {
    let mut scale = T::Real::zero();
    let mut ssq = T::Real::one();

    let mut add = |v: T::Real| {
        if !v.is_zero() {
            let a = v.abs();
            if scale < a {
                let r = scale / a;
                ssq = T::Real::one() + ssq * r * r;
                scale = a;
            } else {
                let r = a / scale;
                ssq = ssq + r * r;
            }
        }
    };

    for i in 0..n {
        let v = get(x, i, incx);
        add(v.re());
        add(v.im());
    }

    scale * ssq.sqrt()
}

pub unsafe fn nrmmax<T: Scalar>(n: usize, x: *mut T, incx: usize) -> T::Real {
    (0..n).fold(T::Real::zero(), |acc, i| acc.max(get(x, i, incx).modulus()))
}

pub unsafe fn scal<T: Scalar>(n: usize, alpha: T, x: *mut T, incx: usize) {
    if alpha.is_zero() {
        return fill(n, alpha, x, incx);
    }
    for i in 0..n {
        *x.add(i * incx) *= alpha;
    }
}

/// `y = beta * y`, never reading `y` when `beta` is zero
unsafe fn scale_out<T: Scalar>(n: usize, beta: T, y: *mut T, incy: usize) {
    if !beta.is_one() {
        scal(n, beta, y, incy);
    }
}

// level 2

#[allow(clippy::too_many_arguments)]
pub unsafe fn gemv<T: Scalar>(
    trans: MatrixOp,
    m: usize,
    n: usize,
    alpha: T,
    a: *mut T,
    lda: usize,
    x: *mut T,
    incx: usize,
    beta: T,
    y: *mut T,
    incy: usize,
) {
    let (rows, cols) = match trans {
        MatrixOp::NoTrans => (m, n),
        MatrixOp::Trans | MatrixOp::ConjTrans => (n, m),
    };

    scale_out(rows, beta, y, incy);
    if alpha.is_zero() {
        return;
    }

    for i in 0..rows {
        let mut sum = T::zero();
        for j in 0..cols {
            sum += op_elem(trans, a, lda, i, j) * get(x, j, incx);
        }
        *y.add(i * incy) += alpha * sum;
    }
}

#[allow(clippy::too_many_arguments)]
pub unsafe fn ger<T: Scalar>(
    m: usize,
    n: usize,
    alpha: T,
    x: *mut T,
    incx: usize,
    y: *mut T,
    incy: usize,
    a: *mut T,
    lda: usize,
) {
    for j in 0..n {
        let t = alpha * get(y, j, incy);
        for i in 0..m {
            *a.add(i + j * lda) += get(x, i, incx) * t;
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub unsafe fn symv<T: Scalar>(
    uplo: UpLo,
    n: usize,
    alpha: T,
    a: *mut T,
    lda: usize,
    x: *mut T,
    incx: usize,
    beta: T,
    y: *mut T,
    incy: usize,
) {
    scale_out(n, beta, y, incy);
    if alpha.is_zero() {
        return;
    }

    for i in 0..n {
        let mut sum = T::zero();
        for j in 0..n {
            sum += sym(uplo, a, lda, i, j) * get(x, j, incx);
        }
        *y.add(i * incy) += alpha * sum;
    }
}

#[allow(clippy::too_many_arguments)]
pub unsafe fn syr<T: Scalar>(
    uplo: UpLo,
    n: usize,
    alpha: T,
    x: *mut T,
    incx: usize,
    a: *mut T,
    lda: usize,
) {
    for j in 0..n {
        let t = alpha * get(x, j, incx);
        let rows = match uplo {
            UpLo::Upper => 0..j + 1,
            UpLo::Lower => j..n,
        };
        for i in rows {
            *a.add(i + j * lda) += get(x, i, incx) * t;
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub unsafe fn trmv<T: Scalar>(
    uplo: UpLo,
    trans: MatrixOp,
    diag: Diag,
    n: usize,
    a: *mut T,
    lda: usize,
    x: *mut T,
    incx: usize,
) {
    let b = gather(n, x, incx);
    let out = tri_mul(&b, op_upper(uplo, trans), diag == Diag::Unit, |i, j| {
        op_elem(trans, a, lda, i, j)
    });
    scatter(&out, x, incx);
}

#[allow(clippy::too_many_arguments)]
pub unsafe fn trsv<T: Scalar>(
    uplo: UpLo,
    trans: MatrixOp,
    diag: Diag,
    n: usize,
    a: *mut T,
    lda: usize,
    x: *mut T,
    incx: usize,
) {
    let mut b = gather(n, x, incx);
    tri_solve(&mut b, op_upper(uplo, trans), diag == Diag::Unit, |i, j| {
        op_elem(trans, a, lda, i, j)
    });
    scatter(&b, x, incx);
}

// level 3

#[allow(clippy::too_many_arguments)]
pub unsafe fn gemm<T: Scalar>(
    transa: MatrixOp,
    transb: MatrixOp,
    m: usize,
    n: usize,
    k: usize,
    alpha: T,
    a: *mut T,
    lda: usize,
    b: *mut T,
    ldb: usize,
    beta: T,
    c: *mut T,
    ldc: usize,
) {
    for j in 0..n {
        scale_out(m, beta, c.add(j * ldc), 1);
        if alpha.is_zero() {
            continue;
        }
        for i in 0..m {
            let mut sum = T::zero();
            for l in 0..k {
                sum += op_elem(transa, a, lda, i, l) * op_elem(transb, b, ldb, l, j);
            }
            *c.add(i + j * ldc) += alpha * sum;
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub unsafe fn symm<T: Scalar>(
    side: Side,
    uplo: UpLo,
    m: usize,
    n: usize,
    alpha: T,
    a: *mut T,
    lda: usize,
    b: *mut T,
    ldb: usize,
    beta: T,
    c: *mut T,
    ldc: usize,
) {
    for j in 0..n {
        scale_out(m, beta, c.add(j * ldc), 1);
        if alpha.is_zero() {
            continue;
        }
        for i in 0..m {
            let sum = match side {
                Side::Left => (0..m).fold(T::zero(), |acc, l| {
                    acc + sym(uplo, a, lda, i, l) * *b.add(l + j * ldb)
                }),
                Side::Right => (0..n).fold(T::zero(), |acc, l| {
                    acc + *b.add(i + l * ldb) * sym(uplo, a, lda, l, j)
                }),
            };
            *c.add(i + j * ldc) += alpha * sum;
        }
    }
}

/// Rows of the `uplo` triangle in column `j` of an `n x n` matrix
fn triangle(uplo: UpLo, n: usize, j: usize) -> std::ops::Range<usize> {
    match uplo {
        UpLo::Upper => 0..j + 1,
        UpLo::Lower => j..n,
    }
}

/// `syrk`/`syr2k` never conjugate, `ConjTrans` reads as `Trans`
fn plain(trans: MatrixOp) -> MatrixOp {
    match trans {
        MatrixOp::NoTrans => MatrixOp::NoTrans,
        MatrixOp::Trans | MatrixOp::ConjTrans => MatrixOp::Trans,
    }
}

#[allow(clippy::too_many_arguments)]
pub unsafe fn syrk<T: Scalar>(
    uplo: UpLo,
    trans: MatrixOp,
    n: usize,
    k: usize,
    alpha: T,
    a: *mut T,
    lda: usize,
    beta: T,
    c: *mut T,
    ldc: usize,
) {
    let trans = plain(trans);
    for j in 0..n {
        for i in triangle(uplo, n, j) {
            let mut sum = T::zero();
            for l in 0..k {
                sum += op_elem(trans, a, lda, i, l) * op_elem(trans, a, lda, j, l);
            }
            let cij = c.add(i + j * ldc);
            *cij = if beta.is_zero() {
                alpha * sum
            } else {
                alpha * sum + beta * *cij
            };
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub unsafe fn syr2k<T: Scalar>(
    uplo: UpLo,
    trans: MatrixOp,
    n: usize,
    k: usize,
    alpha: T,
    a: *mut T,
    lda: usize,
    b: *mut T,
    ldb: usize,
    beta: T,
    c: *mut T,
    ldc: usize,
) {
    let trans = plain(trans);
    for j in 0..n {
        for i in triangle(uplo, n, j) {
            let mut sum = T::zero();
            for l in 0..k {
                sum += op_elem(trans, a, lda, i, l) * op_elem(trans, b, ldb, j, l)
                    + op_elem(trans, b, ldb, i, l) * op_elem(trans, a, lda, j, l);
            }
            let cij = c.add(i + j * ldc);
            *cij = if beta.is_zero() {
                alpha * sum
            } else {
                alpha * sum + beta * *cij
            };
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub unsafe fn trmm<T: Scalar>(
    side: Side,
    uplo: UpLo,
    transa: MatrixOp,
    diag: Diag,
    m: usize,
    n: usize,
    alpha: T,
    a: *mut T,
    lda: usize,
    b: *mut T,
    ldb: usize,
) {
    let upper = op_upper(uplo, transa);
    let unit = diag == Diag::Unit;
    let opa = |i, j| op_elem(transa, a, lda, i, j);

    match side {
        // each column of B is multiplied by op(A)
        Side::Left => {
            for j in 0..n {
                let col = b.add(j * ldb);
                let out = tri_mul(&gather(m, col, 1), upper, unit, opa);
                scatter(&out, col, 1);
                scal(m, alpha, col, 1);
            }
        }
        // each row r of B becomes op(A)ᵀ r
        Side::Right => {
            for i in 0..m {
                let row = b.add(i);
                let out = tri_mul(&gather(n, row, ldb), !upper, unit, |j, l| opa(l, j));
                scatter(&out, row, ldb);
                scal(n, alpha, row, ldb);
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub unsafe fn trsm<T: Scalar>(
    side: Side,
    uplo: UpLo,
    transa: MatrixOp,
    diag: Diag,
    m: usize,
    n: usize,
    alpha: T,
    a: *mut T,
    lda: usize,
    b: *mut T,
    ldb: usize,
) {
    let upper = op_upper(uplo, transa);
    let unit = diag == Diag::Unit;
    let opa = |i, j| op_elem(transa, a, lda, i, j);

    match side {
        Side::Left => {
            for j in 0..n {
                let col = b.add(j * ldb);
                scal(m, alpha, col, 1);
                let mut x = gather(m, col, 1);
                tri_solve(&mut x, upper, unit, opa);
                scatter(&x, col, 1);
            }
        }
        Side::Right => {
            for i in 0..m {
                let row = b.add(i);
                scal(n, alpha, row, ldb);
                let mut x = gather(n, row, ldb);
                tri_solve(&mut x, !upper, unit, |j, l| opa(l, j));
                scatter(&x, row, ldb);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use num_complex::Complex64;

    use crate::blas::{Diag, MatrixOp, Side, UpLo};

    #[test]
    fn nrm2_does_not_overflow() {
        let mut x = [3e300_f64, 4e300];
        let n = unsafe { super::nrm2(2, x.as_mut_ptr(), 1) };
        assert_relative_eq!(n, 5e300, max_relative = 1e-12);

        let mut x = [3e-300_f64, 4e-300];
        let n = unsafe { super::nrm2(2, x.as_mut_ptr(), 1) };
        assert_relative_eq!(n, 5e-300, max_relative = 1e-12);
    }

    #[test]
    fn amax_first_of_ties() {
        // |re| + |im| = 1, 3, 3
        let mut x = [
            Complex64::new(1.0, 0.0),
            Complex64::new(-3.0, 0.0),
            Complex64::new(0.0, 3.0),
        ];
        let i = unsafe { super::amax(3, x.as_mut_ptr(), 1) };
        assert_eq!(i, 1);

        // ranked by |re| + |im| (6 > 5), not by modulus (4.24 < 5)
        let mut y = [Complex64::new(3.0, 3.0), Complex64::new(5.0, 0.0)];
        let i = unsafe { super::amax(2, y.as_mut_ptr(), 1) };
        assert_eq!(i, 0);
    }

    #[test]
    fn gemv_conj_trans() {
        // A = [1+i  2]
        //     [3    4i]
        let mut a = [
            Complex64::new(1.0, 1.0),
            Complex64::new(3.0, 0.0),
            Complex64::new(2.0, 0.0),
            Complex64::new(0.0, 4.0),
        ];
        let mut x = [Complex64::new(1.0, 0.0), Complex64::new(1.0, 0.0)];
        let mut y = [Complex64::new(f64::NAN, 0.0); 2];

        unsafe {
            super::gemv(
                MatrixOp::ConjTrans,
                2,
                2,
                Complex64::new(1.0, 0.0),
                a.as_mut_ptr(),
                2,
                x.as_mut_ptr(),
                1,
                Complex64::new(0.0, 0.0),
                y.as_mut_ptr(),
                1,
            );
        }

        // Aᴴ x = [4-i, 2-4i]
        assert_eq!(y, [Complex64::new(4.0, -1.0), Complex64::new(2.0, -4.0)]);
    }

    #[test]
    fn trsm_right_lower_trans() {
        // A = [2 0]
        //     [1 4]
        let mut a = [2.0_f64, 1.0, 0.0, 4.0];
        // X * Aᵀ = B with X = [1 2; 3 4]
        // Aᵀ = [2 1; 0 4] so B = [2 9; 6 19]
        let mut b = [2.0_f64, 6.0, 9.0, 19.0];

        unsafe {
            super::trsm(
                Side::Right,
                UpLo::Lower,
                MatrixOp::Trans,
                Diag::NonUnit,
                2,
                2,
                1.0,
                a.as_mut_ptr(),
                2,
                b.as_mut_ptr(),
                2,
            );
        }

        assert_eq!(b, [1.0, 3.0, 2.0, 4.0]);
    }
}
