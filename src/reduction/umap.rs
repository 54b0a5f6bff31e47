//! UMAP - Uniform Manifold Approximation and Projection
//!
//! Implements the UMAP algorithm (McInnes et al., 2018) with:
//! - Parallel KNN graph construction via rayon
//! - SIMD-accelerated distance computation
//! - Fuzzy simplicial set with binary-search sigma
//! - SGD layout optimization with negative sampling, in any number of components

use super::{check_input, to_rows, Reducer};
use crate::error::{Result, VizError};
use crate::utils::simd::SimdOps;
use ndarray::{Array2, ArrayView2};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use tracing::debug;

/// UMAP configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UmapConfig {
    /// Number of nearest neighbors (controls local vs global structure)
    pub n_neighbors: usize,
    /// Minimum distance between points in the embedding
    pub min_dist: f64,
    /// Number of output dimensions
    pub n_components: usize,
    /// Number of optimization epochs
    pub n_epochs: usize,
    /// SGD learning rate
    pub learning_rate: f64,
    /// Number of negative samples per positive edge
    pub negative_sample_rate: usize,
    /// Spread of the embedding
    pub spread: f64,
    /// Random seed for reproducibility
    pub random_state: u64,
    /// Maximum samples (subsample if dataset is larger)
    pub max_samples: usize,
}

impl Default for UmapConfig {
    fn default() -> Self {
        Self {
            n_neighbors: 15,
            min_dist: 0.1,
            n_components: 2,
            n_epochs: 200,
            learning_rate: 1.0,
            negative_sample_rate: 5,
            spread: 1.0,
            random_state: 42,
            max_samples: 10_000,
        }
    }
}

/// Max-heap entry keyed by distance, so the farthest neighbor is evicted first
#[derive(Clone)]
struct Neighbor {
    index: usize,
    distance: f64,
}

impl PartialEq for Neighbor {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Neighbor {}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Neighbor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .partial_cmp(&other.distance)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.index.cmp(&other.index))
    }
}

/// An edge in the fuzzy simplicial set
struct Edge {
    i: usize,
    j: usize,
    weight: f64,
}

/// UMAP dimensionality reduction
#[derive(Debug, Clone, Default)]
pub struct Umap {
    config: UmapConfig,
}

impl Umap {
    /// Create a new UMAP instance
    pub fn new(config: UmapConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &UmapConfig {
        &self.config
    }

    /// Run UMAP with the configured number of components.
    pub fn fit_transform(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        self.reduce(data, self.config.n_components)
    }

    fn embed(&self, data: &[Vec<f64>], n_components: usize) -> Vec<Vec<f64>> {
        let n = data.len();
        let k = self.config.n_neighbors.min(n - 1).max(1);

        let sample_indices = (n > self.config.max_samples).then(|| self.subsample(n));
        let work_data: Vec<Vec<f64>> = match &sample_indices {
            Some(indices) => indices.iter().map(|&i| data[i].clone()).collect(),
            None => data.to_vec(),
        };
        let k = k.min(work_data.len() - 1).max(1);

        let (knn_indices, knn_distances) = Self::compute_knn(&work_data, k);
        let edges = Self::compute_fuzzy_set(&knn_indices, &knn_distances, k);
        let embedding = self.optimize_layout(work_data.len(), n_components, &edges);

        match sample_indices {
            Some(indices) => Self::place_unsampled(data, &indices, embedding),
            None => embedding,
        }
    }

    /// Partial Fisher-Yates shuffle, returned sorted.
    fn subsample(&self, n: usize) -> Vec<usize> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.random_state);
        let mut indices: Vec<usize> = (0..n).collect();
        for i in 0..self.config.max_samples {
            let j = rng.gen_range(i..n);
            indices.swap(i, j);
        }
        indices.truncate(self.config.max_samples);
        indices.sort_unstable();
        indices
    }

    /// Put every point left out of the subsample next to its nearest sampled neighbor.
    fn place_unsampled(
        data: &[Vec<f64>],
        indices: &[usize],
        embedding: Vec<Vec<f64>>,
    ) -> Vec<Vec<f64>> {
        let n = data.len();
        let dims = embedding.first().map(|p| p.len()).unwrap_or(0);
        let mut full = vec![vec![0.0; dims]; n];
        let mut sampled = vec![false; n];
        for (sub_idx, &orig_idx) in indices.iter().enumerate() {
            full[orig_idx] = embedding[sub_idx].clone();
            sampled[orig_idx] = true;
        }

        let placements: Vec<(usize, usize)> = (0..n)
            .into_par_iter()
            .filter(|&i| !sampled[i])
            .map(|i| {
                let nearest = indices
                    .iter()
                    .copied()
                    .min_by(|&a, &b| {
                        let da = SimdOps::squared_euclidean_distance(&data[i], &data[a]);
                        let db = SimdOps::squared_euclidean_distance(&data[i], &data[b]);
                        da.partial_cmp(&db).unwrap_or(Ordering::Equal)
                    })
                    .unwrap_or(0);
                (i, nearest)
            })
            .collect();

        for (i, nearest) in placements {
            let anchor = full[nearest].clone();
            full[i] = anchor
                .iter()
                .enumerate()
                .map(|(c, &v)| v + ((i * (c + 1)) as f64 * 0.001).sin() * 0.1)
                .collect();
        }
        full
    }

    /// Phase 1: brute-force k-nearest neighbors, parallel over samples.
    fn compute_knn(data: &[Vec<f64>], k: usize) -> (Vec<Vec<usize>>, Vec<Vec<f64>>) {
        let n = data.len();

        let results: Vec<(Vec<usize>, Vec<f64>)> = (0..n)
            .into_par_iter()
            .map(|i| {
                let mut heap: BinaryHeap<Neighbor> = BinaryHeap::with_capacity(k + 1);

                for j in 0..n {
                    if i == j {
                        continue;
                    }
                    let dist = SimdOps::euclidean_distance(&data[i], &data[j]);

                    if heap.len() < k {
                        heap.push(Neighbor { index: j, distance: dist });
                    } else if let Some(top) = heap.peek() {
                        if dist < top.distance {
                            heap.pop();
                            heap.push(Neighbor { index: j, distance: dist });
                        }
                    }
                }

                let neighbors = heap.into_sorted_vec();
                (
                    neighbors.iter().map(|n| n.index).collect(),
                    neighbors.iter().map(|n| n.distance).collect(),
                )
            })
            .collect();

        results.into_iter().unzip()
    }

    /// Phase 2: fuzzy simplicial set. Per point, rho is the nearest-neighbor
    /// distance and sigma is found by binary search so the membership mass
    /// equals log2(k); directed weights are then combined by probabilistic union.
    fn compute_fuzzy_set(
        knn_indices: &[Vec<usize>],
        knn_distances: &[Vec<f64>],
        k: usize,
    ) -> Vec<Edge> {
        let n = knn_indices.len();
        let target = (k as f64).log2().max(1e-3);

        let params: Vec<(f64, f64)> = knn_distances
            .par_iter()
            .map(|dists| {
                let rho = dists.first().copied().unwrap_or(0.0);

                let mut lo = 1e-8_f64;
                let mut hi = 1000.0_f64;
                let mut sigma = 1.0;
                for _ in 0..64 {
                    sigma = (lo + hi) / 2.0;
                    let sum: f64 = dists
                        .iter()
                        .map(|&d| (-(d - rho).max(0.0) / sigma).exp())
                        .sum();
                    if (sum - target).abs() < 1e-5 {
                        break;
                    }
                    if sum > target {
                        hi = sigma;
                    } else {
                        lo = sigma;
                    }
                }
                (rho, sigma)
            })
            .collect();

        let mut directed: HashMap<(usize, usize), f64> = HashMap::with_capacity(n * k);
        for i in 0..n {
            let (rho, sigma) = params[i];
            for (&j, &d) in knn_indices[i].iter().zip(&knn_distances[i]) {
                let w = (-(d - rho).max(0.0) / sigma.max(1e-12)).exp();
                directed.insert((i, j), w);
            }
        }

        // w_sym(i,j) = w(i,j) + w(j,i) - w(i,j) * w(j,i)
        let mut symmetric: HashMap<(usize, usize), f64> = HashMap::with_capacity(directed.len());
        for (&(i, j), &w_ij) in &directed {
            let key = if i < j { (i, j) } else { (j, i) };
            let w_ji = directed.get(&(j, i)).copied().unwrap_or(0.0);
            symmetric.insert(key, w_ij + w_ji - w_ij * w_ji);
        }

        let mut edges: Vec<Edge> = symmetric
            .into_iter()
            .filter(|(_, w)| *w > 1e-8)
            .map(|((i, j), weight)| Edge { i, j, weight })
            .collect();
        // HashMap order is random; the SGD pass must not be
        edges.sort_unstable_by_key(|e| (e.i, e.j));
        edges
    }

    /// Phase 3: SGD layout optimization with negative sampling.
    fn optimize_layout(&self, n_samples: usize, n_components: usize, edges: &[Edge]) -> Vec<Vec<f64>> {
        let (a, b) = find_ab_params(self.config.spread, self.config.min_dist);

        let mut rng = ChaCha8Rng::seed_from_u64(self.config.random_state);
        let mut embedding: Vec<Vec<f64>> = (0..n_samples)
            .map(|_| (0..n_components).map(|_| rng.gen_range(-10.0..10.0)).collect())
            .collect();

        let n_epochs = self.config.n_epochs.max(1);
        let max_weight = edges.iter().map(|e| e.weight).fold(0.0_f64, f64::max);
        let epochs_per_sample: Vec<f64> = edges
            .iter()
            .map(|e| (max_weight / e.weight).max(1.0))
            .collect();
        let mut next_epoch = epochs_per_sample.clone();

        for epoch in 0..n_epochs {
            let alpha = self.config.learning_rate * (1.0 - epoch as f64 / n_epochs as f64);

            for (e, edge) in edges.iter().enumerate() {
                if next_epoch[e] > (epoch + 1) as f64 {
                    continue;
                }
                next_epoch[e] += epochs_per_sample[e];

                let (i, j) = (edge.i, edge.j);

                // Attraction along the edge
                let dist_sq = squared_distance(&embedding[i], &embedding[j]);
                if dist_sq > 0.0 {
                    let coeff = -2.0 * a * b * dist_sq.powf(b - 1.0) / (1.0 + a * dist_sq.powf(b));
                    for c in 0..n_components {
                        let delta = clip(coeff * (embedding[i][c] - embedding[j][c])) * alpha;
                        embedding[i][c] += delta;
                        embedding[j][c] -= delta;
                    }
                }

                // Repulsion from random samples
                for _ in 0..self.config.negative_sample_rate {
                    let other = rng.gen_range(0..n_samples);
                    if other == i {
                        continue;
                    }
                    let dist_sq = squared_distance(&embedding[i], &embedding[other]);
                    let coeff = 2.0 * b / ((0.001 + dist_sq) * (1.0 + a * dist_sq.powf(b)));
                    for c in 0..n_components {
                        let grad = if dist_sq > 0.0 {
                            clip(coeff * (embedding[i][c] - embedding[other][c]))
                        } else {
                            4.0
                        };
                        embedding[i][c] += grad * alpha;
                    }
                }
            }
        }

        embedding
    }
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Gradient clipping used by the reference implementation
fn clip(v: f64) -> f64 {
    v.clamp(-4.0, 4.0)
}

/// Fit a, b for the low-dimensional membership curve 1 / (1 + a * d^(2b)),
/// approximating 1 below `min_dist` and `exp(-(d - min_dist) / spread)` above it.
/// Least squares over a grid via Gauss-Newton.
fn find_ab_params(spread: f64, min_dist: f64) -> (f64, f64) {
    let xs: Vec<f64> = (1..300).map(|i| i as f64 * spread * 3.0 / 300.0).collect();
    let ys: Vec<f64> = xs
        .iter()
        .map(|&x| if x < min_dist { 1.0 } else { (-(x - min_dist) / spread).exp() })
        .collect();

    let sse = |a: f64, b: f64| -> f64 {
        xs.iter()
            .zip(&ys)
            .map(|(&x, &y)| (1.0 / (1.0 + a * x.powf(2.0 * b)) - y).powi(2))
            .sum()
    };

    let (mut a, mut b) = (1.0_f64, 1.0_f64);
    let mut error = sse(a, b);
    for _ in 0..100 {
        // Normal equations for the 2-parameter Jacobian
        let (mut jtj00, mut jtj01, mut jtj11, mut jtr0, mut jtr1) = (0.0, 0.0, 0.0, 0.0, 0.0);
        for (&x, &y) in xs.iter().zip(&ys) {
            let x2b = x.powf(2.0 * b);
            let denom = 1.0 + a * x2b;
            let r = 1.0 / denom - y;
            let da = -x2b / (denom * denom);
            let db = -a * x2b * 2.0 * x.ln() / (denom * denom);
            jtj00 += da * da;
            jtj01 += da * db;
            jtj11 += db * db;
            jtr0 += da * r;
            jtr1 += db * r;
        }
        let det = jtj00 * jtj11 - jtj01 * jtj01;
        if det.abs() < 1e-18 {
            break;
        }
        let step_a = (jtj11 * jtr0 - jtj01 * jtr1) / det;
        let step_b = (jtj00 * jtr1 - jtj01 * jtr0) / det;

        // Backtrack until the step reduces the residual
        let mut scale = 1.0;
        let mut accepted = false;
        while scale > 1e-4 {
            let next_a = (a - scale * step_a).max(1e-3);
            let next_b = (b - scale * step_b).clamp(0.1, 5.0);
            let next_error = sse(next_a, next_b);
            if next_error < error {
                a = next_a;
                b = next_b;
                error = next_error;
                accepted = true;
                break;
            }
            scale /= 2.0;
        }
        if !accepted || (scale * step_a).abs() + (scale * step_b).abs() < 1e-9 {
            break;
        }
    }
    (a, b)
}

impl Reducer for Umap {
    fn name(&self) -> &'static str {
        "umap"
    }

    fn reduce(&self, data: ArrayView2<'_, f64>, n_components: usize) -> Result<Array2<f64>> {
        check_input("UMAP", &data, n_components, 3)?;
        if self.config.max_samples < 3 {
            return Err(VizError::invalid_parameter(
                "max_samples",
                self.config.max_samples,
                "must be at least 3",
            ));
        }
        let n = data.nrows();
        let rows = to_rows(&data);
        let embedding = self.embed(&rows, n_components);

        debug!(
            samples = n,
            components = n_components,
            neighbors = self.config.n_neighbors.min(n - 1),
            epochs = self.config.n_epochs,
            "UMAP layout complete"
        );

        Ok(Array2::from_shape_fn((n, n_components), |(i, c)| embedding[i][c]))
    }
}
