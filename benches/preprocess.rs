use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use spectre::preprocess::{preprocess, remove_baseline, remove_noise};
use spectre::sampling::{sample, ScanTable};
use spectre::sparse::{rolling, Axis, PaddingMode, RollingOp, SparseMatrix};

const RESOLUTION: f64 = 0.01;

/// Synthetic run with drifting background ions and sparse compound peaks
fn create_scan_table(num_scans: usize, peaks_per_scan: usize) -> ScanTable<f32> {
    let mut table = ScanTable::new();
    for scan in 0..num_scans {
        let t = scan as f64;
        let mut masses = Vec::with_capacity(peaks_per_scan);
        let mut intensities = Vec::with_capacity(peaks_per_scan);
        for j in 0..peaks_per_scan {
            let mz = 150.0 + j as f64 * 7.31 + (t * 0.01 + j as f64).sin() * 0.004;
            let background = 200.0 + 50.0 * (t * 0.02 + j as f64).sin();
            let offset = (scan % 97) as f64 - (j % 97) as f64;
            let compound = 10_000.0 * (-offset * offset / 8.0).exp();
            masses.push(mz);
            intensities.push((background + compound) as f32);
        }
        table
            .push_scan(t * 0.5, &masses, &intensities)
            .unwrap();
    }
    table
}

fn create_matrix(num_scans: usize, peaks_per_scan: usize) -> SparseMatrix<f32> {
    let table = create_scan_table(num_scans, peaks_per_scan);
    sample(&table.pointers, &table.masses, &table.intensities, RESOLUTION).unwrap()
}

/// Benchmark quantizing scans into mass bins
fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling");

    for num_scans in [500, 2000] {
        let peaks_per_scan = 200;
        let table = create_scan_table(num_scans, peaks_per_scan);

        group.throughput(Throughput::Elements((num_scans * peaks_per_scan) as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}scans", num_scans)),
            &table,
            |b, table| {
                b.iter(|| {
                    let matrix = sample(
                        &table.pointers,
                        &table.masses,
                        &table.intensities,
                        black_box(RESOLUTION),
                    )
                    .unwrap();
                    black_box(matrix);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark every rolling statistic along retention time
fn bench_rolling(c: &mut Criterion) {
    let mut group = c.benchmark_group("rolling");
    let matrix = create_matrix(1000, 200);
    group.throughput(Throughput::Elements(matrix.nnz() as u64));

    for op in [RollingOp::Min, RollingOp::Max, RollingOp::Mean, RollingOp::Median] {
        group.bench_with_input(BenchmarkId::new("symmetric_w51", op), &op, |b, &op| {
            b.iter(|| {
                let result = rolling(&matrix, black_box(51), Axis::Rows, op, PaddingMode::Symmetric).unwrap();
                black_box(result);
            });
        });
    }

    group.finish();
}

/// Benchmark the two preprocessing stages and the full pipeline
fn bench_preprocess(c: &mut Criterion) {
    let mut group = c.benchmark_group("preprocess");

    for num_scans in [500, 2000] {
        let matrix = create_matrix(num_scans, 200);
        group.throughput(Throughput::Elements(matrix.nnz() as u64));
        let label = format!("{}scans", num_scans);

        group.bench_with_input(BenchmarkId::new("noise", &label), &matrix, |b, matrix| {
            b.iter(|| black_box(remove_noise(matrix, black_box(5.0)).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("baseline", &label), &matrix, |b, matrix| {
            b.iter(|| black_box(remove_baseline(matrix, black_box(50)).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("full", &label), &matrix, |b, matrix| {
            b.iter(|| black_box(preprocess(matrix, black_box(5.0)).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sampling, bench_rolling, bench_preprocess);
criterion_main!(benches);
