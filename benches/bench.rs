use criterion::{Criterion, criterion_group, criterion_main};
use distmap::DistanceTransform;
use distmap::array::BinaryArray;
use distmap::chamfer::{
    ChamferDistanceTransform2D, ChamferDistanceTransform3D, ChamferMask2D, ChamferMask3D,
};
use distmap::euclidean::EuclideanDistanceTransform;
use std::hint::black_box;

const N: usize = 512;

fn prep_disk(n: usize) -> BinaryArray {
    let c = n as f64 / 2.0;
    BinaryArray::from_fn2(n, n, |x, y| (x as f64 - c).hypot(y as f64 - c) < c * 0.9)
}

fn prep_ball(n: usize) -> BinaryArray {
    let c = n as f64 / 2.0;
    BinaryArray::from_fn3(n, n, n, |x, y, z| {
        (x as f64 - c).hypot(y as f64 - c).hypot(z as f64 - c) < c * 0.9
    })
}

/// Borgefors 3-4 chamfer transform of a large disk with integer output
fn chamfer_2d(c: &mut Criterion) {
    let mask = prep_disk(N);
    let transform = ChamferDistanceTransform2D::<u16>::new(ChamferMask2D::borgefors(), true);
    c.bench_function("chamfer_2d_borgefors", |b| {
        b.iter(|| transform.compute_result(black_box(&mask)))
    });

    let transform = ChamferDistanceTransform2D::<u16>::new(ChamferMask2D::chess_knight(), true);
    c.bench_function("chamfer_2d_chess_knight", |b| {
        b.iter(|| transform.compute_result(black_box(&mask)))
    });
}

fn chamfer_3d(c: &mut Criterion) {
    let mask = prep_ball(64);
    let transform = ChamferDistanceTransform3D::<u16>::new(ChamferMask3D::svensson(), true);
    c.bench_function("chamfer_3d_svensson", |b| {
        b.iter(|| transform.compute_result(black_box(&mask)))
    });
}

/// Exact separable transform of the same disk, and of a ball with anisotropic spacing
fn euclidean(c: &mut Criterion) {
    let mask = prep_disk(N);
    let transform = EuclideanDistanceTransform::<f32>::new();
    c.bench_function("euclidean_2d", |b| {
        b.iter(|| transform.compute_result(black_box(&mask)))
    });

    let mask = prep_ball(64);
    let transform = EuclideanDistanceTransform::<f32>::new().with_spacing(vec![1.0, 1.0, 2.5]);
    c.bench_function("euclidean_3d", |b| {
        b.iter(|| transform.compute_result(black_box(&mask)))
    });
}

criterion_group!(benches, chamfer_2d, chamfer_3d, euclidean);
criterion_main!(benches);
