//! Benchmarks for the dense solvers.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use nalgebra::{DMatrix, DVector};
use numlin_solver::{
    EigenConfig, IterativeConfig, SolverConfig, gauss_jordan, gaussian, iterative, jacobi_eigen,
    lu,
};

// Diagonally dominant, so every method (including the non-pivoting ones)
// succeeds.
fn system(size: usize) -> (DMatrix<f64>, DVector<f64>) {
    let a = DMatrix::from_fn(size, size, |i, j| {
        if i == j {
            (size as f64) + 1.0
        } else {
            1.0 / ((i as f64 - j as f64).abs() + 1.0)
        }
    });
    let rhs = DVector::from_fn(size, |i, _| (i + 1) as f64);
    (a, rhs)
}

fn bench_direct(c: &mut Criterion) {
    let mut group = c.benchmark_group("direct");
    let config = SolverConfig::default();

    for size in [10, 50, 100] {
        let (a, rhs) = system(size);

        group.bench_with_input(BenchmarkId::new("gaussian_plain", size), &size, |bencher, _| {
            bencher.iter(|| gaussian::solve_plain(black_box(&a), black_box(&rhs), &config).unwrap())
        });
        group.bench_with_input(
            BenchmarkId::new("gaussian_pivoted", size),
            &size,
            |bencher, _| {
                bencher.iter(|| {
                    gaussian::solve_pivoted(black_box(&a), black_box(&rhs), &config).unwrap()
                })
            },
        );
        group.bench_with_input(BenchmarkId::new("gauss_jordan", size), &size, |bencher, _| {
            bencher.iter(|| gauss_jordan::solve(black_box(&a), black_box(&rhs), &config).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("lu", size), &size, |bencher, _| {
            bencher.iter(|| lu::solve(black_box(&a), black_box(&rhs), &config).unwrap())
        });
    }

    group.finish();
}

fn bench_iterative(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterative");

    for size in [10, 50, 100] {
        let (a, rhs) = system(size);
        let x0 = DVector::zeros(size);

        for config in [IterativeConfig::jacobi(), IterativeConfig::gauss_seidel()] {
            let id = BenchmarkId::new(config.method.name(), size);
            group.bench_with_input(id, &size, |bencher, _| {
                bencher.iter(|| {
                    iterative::solve(black_box(&a), black_box(&rhs), &x0, &config).unwrap()
                })
            });
        }
    }

    group.finish();
}

fn bench_eigen(c: &mut Criterion) {
    let mut group = c.benchmark_group("jacobi_eigen");
    let config = EigenConfig::default();

    for size in [4, 10, 20] {
        let (a, _) = system(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |bencher, _| {
            bencher.iter(|| jacobi_eigen(black_box(&a), &config).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_direct, bench_iterative, bench_eigen);
criterion_main!(benches);
