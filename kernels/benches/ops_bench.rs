use criterion::{Criterion, criterion_group, criterion_main};
use qkv_attention_kernels::{cpu_matmul, cpu_matmul_nt, cpu_softmax_rows, cpu_transpose};
use std::hint::black_box;

fn benchmark_matmul(c: &mut Criterion) {
    let mut group = c.benchmark_group("matmul");
    let sizes = [64, 128, 256];

    for &size in &sizes {
        let shape = [size, size];
        let lhs_data = vec![1.0f32; size * size];
        let rhs_data = vec![1.0f32; size * size];

        group.bench_function(format!("nn/{}x{}", size, size), |b| {
            b.iter(|| {
                cpu_matmul(
                    black_box(&lhs_data),
                    black_box(&rhs_data),
                    black_box(&shape),
                    black_box(&shape),
                )
                .unwrap()
            })
        });

        group.bench_function(format!("nt/{}x{}", size, size), |b| {
            b.iter(|| {
                cpu_matmul_nt(
                    black_box(&lhs_data),
                    black_box(&rhs_data),
                    black_box(&shape),
                    black_box(&shape),
                )
                .unwrap()
            })
        });
    }
    group.finish();
}

fn benchmark_transpose(c: &mut Criterion) {
    let mut group = c.benchmark_group("transpose");
    let sizes = [128, 512, 1024];

    for &size in &sizes {
        let shape = [size, size];
        let data = vec![1.0f32; size * size];

        group.bench_function(format!("{}x{}", size, size), |b| {
            b.iter(|| cpu_transpose(black_box(&data), black_box(&shape)).unwrap())
        });
    }
    group.finish();
}

fn benchmark_softmax(c: &mut Criterion) {
    let mut group = c.benchmark_group("softmax");
    let rows = 64;

    for &cols in &[16, 300, 4096] {
        let shape = [rows, cols];
        let data: Vec<f64> = (0..rows * cols).map(|i| (i % 97) as f64 * 0.1).collect();

        group.bench_function(format!("{}x{}", rows, cols), |b| {
            b.iter(|| cpu_softmax_rows(black_box(&data), black_box(&shape)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_matmul, benchmark_transpose, benchmark_softmax);
criterion_main!(benches);
