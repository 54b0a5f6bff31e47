//! t-SNE - t-distributed Stochastic Neighbor Embedding
//!
//! Exact O(n²) implementation (van der Maaten & Hinton, 2008):
//! - Gaussian input affinities with per-point perplexity calibration
//! - Student-t output affinities
//! - Gradient descent with momentum, adaptive gains and early exaggeration

use super::{check_input, to_rows, Reducer};
use crate::error::Result;
use crate::utils::simd::SimdOps;
use ndarray::{Array2, ArrayView2};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// t-SNE configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TsneConfig {
    /// Number of output dimensions
    pub n_components: usize,
    /// Effective number of neighbors
    pub perplexity: f64,
    /// Multiplier on input affinities during the early phase
    pub early_exaggeration: f64,
    /// Iterations that use early exaggeration
    pub exaggeration_iter: usize,
    /// Gradient descent step size
    pub learning_rate: f64,
    /// Total optimization iterations
    pub n_iter: usize,
    /// Random seed for the initial layout
    pub random_state: u64,
}

impl Default for TsneConfig {
    fn default() -> Self {
        Self {
            n_components: 2,
            perplexity: 30.0,
            early_exaggeration: 12.0,
            exaggeration_iter: 250,
            learning_rate: 200.0,
            n_iter: 1000,
            random_state: 42,
        }
    }
}

const MIN_GAIN: f64 = 0.01;
const INITIAL_MOMENTUM: f64 = 0.5;
const FINAL_MOMENTUM: f64 = 0.8;

/// t-SNE dimensionality reduction
#[derive(Debug, Clone, Default)]
pub struct Tsne {
    config: TsneConfig,
}

impl Tsne {
    /// Create a new t-SNE instance
    pub fn new(config: TsneConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TsneConfig {
        &self.config
    }

    /// Run t-SNE with the configured number of components.
    pub fn fit_transform(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        self.reduce(data, self.config.n_components)
    }

    /// Pairwise squared distances, row-parallel.
    fn squared_distances(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
        rows.par_iter()
            .map(|a| {
                rows.iter()
                    .map(|b| SimdOps::squared_euclidean_distance(a, b))
                    .collect()
            })
            .collect()
    }

    /// Conditional affinities P(j|i), each row calibrated to the target perplexity
    /// by binary search on the Gaussian precision.
    fn conditional_affinities(distances: &[Vec<f64>], perplexity: f64) -> Vec<Vec<f64>> {
        let target_entropy = perplexity.ln();

        distances
            .par_iter()
            .enumerate()
            .map(|(i, row)| {
                let mut beta = 1.0_f64;
                let mut lo = f64::NEG_INFINITY;
                let mut hi = f64::INFINITY;
                let mut probs = vec![0.0; row.len()];

                for _ in 0..100 {
                    let mut sum = 0.0;
                    for (j, &d) in row.iter().enumerate() {
                        probs[j] = if j == i { 0.0 } else { (-d * beta).exp() };
                        sum += probs[j];
                    }
                    let sum = sum.max(1e-300);

                    // H = log(sum) + beta * sum(d * p) / sum
                    let weighted: f64 = row.iter().zip(&probs).map(|(&d, &p)| d * p).sum();
                    let entropy = sum.ln() + beta * weighted / sum;
                    probs.iter_mut().for_each(|p| *p /= sum);

                    let diff = entropy - target_entropy;
                    if diff.abs() < 1e-5 {
                        break;
                    }
                    if diff > 0.0 {
                        lo = beta;
                        beta = if hi.is_finite() { (beta + hi) / 2.0 } else { beta * 2.0 };
                    } else {
                        hi = beta;
                        beta = if lo.is_finite() { (beta + lo) / 2.0 } else { beta / 2.0 };
                    }
                }
                probs
            })
            .collect()
    }

    /// Symmetrized joint affinities P = (P + P^T) / 2n
    fn joint_affinities(conditional: &[Vec<f64>]) -> Vec<Vec<f64>> {
        let n = conditional.len();
        let norm = 2.0 * n as f64;
        (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        if i == j {
                            0.0
                        } else {
                            ((conditional[i][j] + conditional[j][i]) / norm).max(1e-12)
                        }
                    })
                    .collect()
            })
            .collect()
    }

    fn optimize(&self, p: &[Vec<f64>], n_components: usize) -> Vec<Vec<f64>> {
        let n = p.len();
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.random_state);
        let mut y: Vec<Vec<f64>> = (0..n)
            .map(|_| {
                (0..n_components)
                    .map(|_| rng.gen_range(-1.0..1.0) * 1e-4)
                    .collect()
            })
            .collect();
        let mut velocity = vec![vec![0.0; n_components]; n];
        let mut gains = vec![vec![1.0_f64; n_components]; n];

        for iter in 0..self.config.n_iter {
            let exaggeration = if iter < self.config.exaggeration_iter {
                self.config.early_exaggeration
            } else {
                1.0
            };
            let momentum = if iter < self.config.exaggeration_iter {
                INITIAL_MOMENTUM
            } else {
                FINAL_MOMENTUM
            };

            // Student-t kernel numerators and their total
            let num: Vec<Vec<f64>> = y
                .par_iter()
                .enumerate()
                .map(|(i, yi)| {
                    y.iter()
                        .enumerate()
                        .map(|(j, yj)| {
                            if i == j {
                                0.0
                            } else {
                                1.0 / (1.0 + SimdOps::squared_euclidean_distance(yi, yj))
                            }
                        })
                        .collect()
                })
                .collect();
            let num_sum: f64 = num.iter().map(|row| row.iter().sum::<f64>()).sum::<f64>().max(1e-300);

            let grads: Vec<Vec<f64>> = (0..n)
                .into_par_iter()
                .map(|i| {
                    let mut g = vec![0.0; n_components];
                    for j in 0..n {
                        if i == j {
                            continue;
                        }
                        let q = (num[i][j] / num_sum).max(1e-12);
                        let coeff = 4.0 * (exaggeration * p[i][j] - q) * num[i][j];
                        for c in 0..n_components {
                            g[c] += coeff * (y[i][c] - y[j][c]);
                        }
                    }
                    g
                })
                .collect();

            for i in 0..n {
                for c in 0..n_components {
                    let grad = grads[i][c];
                    let gain = &mut gains[i][c];
                    *gain = if (grad > 0.0) != (velocity[i][c] > 0.0) {
                        *gain + 0.2
                    } else {
                        *gain * 0.8
                    };
                    *gain = gain.max(MIN_GAIN);
                    velocity[i][c] =
                        momentum * velocity[i][c] - self.config.learning_rate * *gain * grad;
                    y[i][c] += velocity[i][c];
                }
            }

            // Re-center
            for c in 0..n_components {
                let mean = y.iter().map(|row| row[c]).sum::<f64>() / n as f64;
                y.iter_mut().for_each(|row| row[c] -= mean);
            }
        }

        y
    }
}

impl Reducer for Tsne {
    fn name(&self) -> &'static str {
        "tsne"
    }

    fn reduce(&self, data: ArrayView2<'_, f64>, n_components: usize) -> Result<Array2<f64>> {
        check_input("t-SNE", &data, n_components, 3)?;
        let n = data.nrows();

        let perplexity = self
            .config
            .perplexity
            .min((n - 1) as f64 / 3.0)
            .max(1.0);

        let rows = to_rows(&data);
        let distances = Self::squared_distances(&rows);
        let conditional = Self::conditional_affinities(&distances, perplexity);
        let p = Self::joint_affinities(&conditional);
        let y = self.optimize(&p, n_components);

        debug!(
            samples = n,
            components = n_components,
            perplexity,
            iterations = self.config.n_iter,
            "t-SNE optimization complete"
        );

        Ok(Array2::from_shape_fn((n, n_components), |(i, c)| y[i][c]))
    }
}
