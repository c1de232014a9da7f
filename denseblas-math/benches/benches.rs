use criterion::{black_box, criterion_group, criterion_main, Bencher, Criterion};
use denseblas_sys::{
    device::{cpu::Cpu, DefaultDeviceAllocator},
    DefaultVec, View, ViewMut,
};

use denseblas_math::{
    blas::{DefaultBLASContext, BLAS1, BLAS3},
    random::RandomIter,
    tensor::{dot_ctx, gemm_ctx, Tensor},
};

const N: usize = 256;

/// Performs 100 matrix mulitplications on a 256x256 matrix
pub fn matmul_100_256<D: DefaultDeviceAllocator + DefaultBLASContext>(
    init: &[f64],
) -> DefaultVec<f64, D>
where
    f64: BLAS3<D::Context>,
    D::Alloc: Clone,
{
    let a = DefaultVec::<f64, D>::copy_from_host(init);
    let b = a.clone();
    let c = b.clone();

    let mut a = Tensor::from_shape([N, N], a);
    let b = Tensor::from_shape([N, N], b);
    let mut c = Tensor::from_shape([N, N], c);

    let ctx = D::default_ctx();
    for _ in 0..100 {
        gemm_ctx(ctx.clone(), 1., a.view(), b.view(), 0., c.view_mut()).unwrap();
        std::mem::swap(&mut a, &mut c);
    }

    c.into_inner()
}

/// Dot product of two 1M element vectors
pub fn dot_1m<D: DefaultDeviceAllocator + DefaultBLASContext>(x: &[f32], y: &[f32]) -> f32
where
    f32: BLAS1<D::Context>,
{
    let x = Tensor::from_shape([x.len()], DefaultVec::<f32, D>::copy_from_host(x));
    let y = Tensor::from_shape([y.len()], DefaultVec::<f32, D>::copy_from_host(y));

    dot_ctx(D::default_ctx(), x.view(), y.view()).unwrap()
}

pub fn matmul(c: &mut Criterion) {
    let mut group = c.benchmark_group("matmul");

    // near identity, keeps the values bounded over repeated products
    let mut init = vec![0.0f64; N * N];
    for (i, r) in RandomIter::<f64>::new(0).take(N * N).enumerate() {
        init[i] = r * 1e-3;
    }
    for i in 0..N {
        init[i * N + i] = 1.0;
    }

    let cpu = |b: &mut Bencher| {
        b.iter(|| black_box(matmul_100_256::<Cpu>(&init)));
    };

    #[cfg(feature = "openblas")]
    group.bench_function("openblas", cpu);

    #[cfg(feature = "blis")]
    group.bench_function("blis", cpu);

    #[cfg(feature = "netlib")]
    group.bench_function("netlib", cpu);

    #[cfg(feature = "accelerate")]
    group.bench_function("accelerate", cpu);

    #[cfg(feature = "intel-mkl")]
    group.bench_function("intel-mkl", cpu);

    #[cfg(not(feature = "blas-sys"))]
    group.bench_function("matrixmultiply", cpu);

    #[cfg(feature = "cublas")]
    {
        use denseblas_math::blas::cublas::CublasContext;
        use denseblas_sys::device::cuda::{Context, Cuda};

        let _cuda_ctx = Context::quick_init().unwrap();
        let cublas_ctx = CublasContext::new().unwrap();

        cublas_ctx.global_over(|_| {
            group.bench_function("cublas", |b| {
                b.iter(|| {
                    // includes the time to sync data in the benchmark
                    let mut out = vec![0.0f64; N * N];
                    matmul_100_256::<Cuda>(&init).copy_to_host(&mut out);

                    black_box(out)
                });
            });
        });
    }

    group.finish();
}

pub fn dot(c: &mut Criterion) {
    let mut group = c.benchmark_group("dot");

    let x: Vec<f32> = RandomIter::new(1).take(1 << 20).collect();
    let y: Vec<f32> = RandomIter::new(2).take(1 << 20).collect();

    group.bench_function("cpu", |b| {
        b.iter(|| black_box(dot_1m::<Cpu>(&x, &y)));
    });

    #[cfg(feature = "cublas")]
    {
        use denseblas_math::blas::cublas::CublasContext;
        use denseblas_sys::device::cuda::{Context, Cuda};

        let _cuda_ctx = Context::quick_init().unwrap();
        let cublas_ctx = CublasContext::new().unwrap();

        cublas_ctx.global_over(|_| {
            group.bench_function("cublas", |b| {
                b.iter(|| black_box(dot_1m::<Cuda>(&x, &y)));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, matmul, dot);
criterion_main!(benches);
