use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kolosal_viz::prelude::*;
use ndarray::Array2;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

fn create_clustered_data(n_rows: usize, n_features: usize) -> Array2<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    Array2::from_shape_fn((n_rows, n_features), |(i, _)| {
        (i % 4) as f64 * 5.0 + rng.gen::<f64>()
    })
}

fn bench_pca(c: &mut Criterion) {
    let mut group = c.benchmark_group("pca");

    for n_rows in [500, 2000, 10000].iter() {
        let data = create_clustered_data(*n_rows, 20);
        group.bench_with_input(BenchmarkId::new("reduce", n_rows), &data, |b, data| {
            let pca = Pca::default();
            b.iter(|| pca.reduce(black_box(data.view()), 2).unwrap())
        });
    }

    group.finish();
}

fn bench_tsne(c: &mut Criterion) {
    let mut group = c.benchmark_group("tsne");
    group.sample_size(10);

    for n_rows in [100, 300].iter() {
        let data = create_clustered_data(*n_rows, 10);
        group.bench_with_input(BenchmarkId::new("reduce", n_rows), &data, |b, data| {
            let tsne = Tsne::new(TsneConfig {
                n_iter: 300,
                ..Default::default()
            });
            b.iter(|| tsne.reduce(black_box(data.view()), 2).unwrap())
        });
    }

    group.finish();
}

fn bench_umap(c: &mut Criterion) {
    let mut group = c.benchmark_group("umap");
    group.sample_size(10);

    for n_rows in [200, 1000].iter() {
        let data = create_clustered_data(*n_rows, 10);
        group.bench_with_input(BenchmarkId::new("reduce", n_rows), &data, |b, data| {
            let umap = Umap::default();
            b.iter(|| umap.reduce(black_box(data.view()), 2).unwrap())
        });
    }

    group.finish();
}

fn bench_dispatch(c: &mut Criterion) {
    let data = create_clustered_data(1000, 8);
    let labels: Vec<String> = (0..1000).map(|i| format!("c{}", i % 4)).collect();
    let dataset = Dataset::new(data).unwrap();
    let viz = VisualizationDispatcher::new(dataset, labels, MemoryRenderer::new()).unwrap();

    let mut group = c.benchmark_group("build_figure");
    for kind in [ChartKind::Scatter, ChartKind::Histogram, ChartKind::AndrewsCurves, ChartKind::RadViz] {
        group.bench_function(kind.as_str(), |b| {
            b.iter(|| viz.build_figure(black_box(kind), 2).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pca, bench_tsne, bench_umap, bench_dispatch);
criterion_main!(benches);
