use denseblas_math::{
    blas::{Diag, UpLo},
    tensor::{axpy, nrm2, trsv, Tensor},
    BlasResult,
};
use denseblas_sys::{View, ViewMut};

fn main() -> BlasResult<()> {
    //     0 1
    // A = 2 3
    //     4 5

    // B = 0 1
    //     2 3

    // column major (read each column first)
    let a = [0., 2., 4., 1., 3., 5.];
    let b = [0., 2., 1., 3.];

    let a = Tensor::from_shape([3, 2], a); // 3 rows x 2 cols
    let b = Tensor::from_shape([2, 2], b); // 2 rows x 2 cols

    //           2  3
    // C = AB =  6 11
    //          10 19

    let c = a.dot(b.view())?;
    assert_eq!(c.into_inner().into_std(), [2., 6., 10., 3., 11., 19.]);

    // solve U x = [3, 4] where U = 2 1
    //                              0 4
    let u = Tensor::from_shape([2, 2], [2., 0., 1., 4.]);
    let mut x = Tensor::from_shape([2], [3., 4.]);
    trsv(UpLo::Upper, Diag::NonUnit, u.view(), x.view_mut())?;

    // residual of the solution against the known answer
    let expected = Tensor::from_shape([2], [1., 1.]);
    axpy(-1.0, expected.view(), x.view_mut())?;
    println!("residual: {}", nrm2(x.view())?);

    Ok(())
}
