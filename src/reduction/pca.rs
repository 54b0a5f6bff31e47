//! PCA - Principal Component Analysis
//!
//! Linear dimensionality reduction. Computes the top-k eigenvectors of the
//! covariance matrix using power iteration with deflation, then projects the
//! centered data onto them.

use super::{check_input, Reducer};
use crate::error::Result;
use crate::utils::simd::SimdOps;
use ndarray::parallel::prelude::*;
use ndarray::{Array1, Array2, ArrayView2, Axis};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// PCA configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PcaConfig {
    /// Number of output dimensions (default 2)
    pub n_components: usize,
    /// Whether to center the data (subtract mean per feature)
    pub center: bool,
    /// Whether to scale to unit variance
    pub scale: bool,
    /// Power iteration cap per component
    pub max_iter: usize,
    /// Convergence tolerance on the eigenvector update
    pub tolerance: f64,
    /// Random seed for power iteration initialization
    pub random_state: u64,
}

impl Default for PcaConfig {
    fn default() -> Self {
        Self {
            n_components: 2,
            center: true,
            scale: false,
            max_iter: 300,
            tolerance: 1e-10,
            random_state: 42,
        }
    }
}

/// PCA result including the embedding and explained variance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PcaResult {
    /// Projected data: n_samples x n_components
    pub embedding: Array2<f64>,
    /// Explained variance ratio for each component (sums to <= 1.0)
    pub explained_variance_ratio: Vec<f64>,
    /// Eigenvalues (raw variance per component)
    pub eigenvalues: Vec<f64>,
    /// Principal axes, one row per component
    pub components: Array2<f64>,
}

/// PCA dimensionality reduction
#[derive(Debug, Clone, Default)]
pub struct Pca {
    config: PcaConfig,
}

impl Pca {
    /// Create a new PCA instance
    pub fn new(config: PcaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PcaConfig {
        &self.config
    }

    /// Run PCA with the configured number of components.
    pub fn fit_transform(&self, data: ArrayView2<'_, f64>) -> Result<PcaResult> {
        self.fit_transform_with(data, self.config.n_components)
    }

    /// Run PCA producing exactly `n_components` columns.
    ///
    /// Components beyond the rank of the data come back as zero columns
    /// with zero explained variance.
    pub fn fit_transform_with(
        &self,
        data: ArrayView2<'_, f64>,
        n_components: usize,
    ) -> Result<PcaResult> {
        check_input("PCA", &data, n_components, 2)?;
        let (n, d) = data.dim();
        let solvable = n_components.min(d);

        let centered = self.center_and_scale(&data);
        let cov = centered.t().dot(&centered) / (n as f64 - 1.0);
        let full_variance = cov.diag().sum().max(1e-12);

        let (eigenvalues, axes) = self.power_iteration(&cov, solvable);

        let mut components = Array2::<f64>::zeros((n_components, d));
        let mut all_eigenvalues = vec![0.0; n_components];
        let rank_floor = eigenvalues.first().copied().unwrap_or(0.0) * 1e-10;
        for (c, (value, axis)) in eigenvalues.iter().zip(axes.iter()).enumerate() {
            if *value > rank_floor.max(1e-12) {
                components.row_mut(c).assign(axis);
                all_eigenvalues[c] = *value;
            }
        }

        let explained_variance_ratio = all_eigenvalues
            .iter()
            .map(|&ev| (ev / full_variance).max(0.0))
            .collect();

        let projected: Vec<Vec<f64>> = centered
            .axis_iter(Axis(0))
            .into_par_iter()
            .map(|sample| {
                components
                    .outer_iter()
                    .map(|axis| sample.dot(&axis))
                    .collect()
            })
            .collect();
        let embedding = Array2::from_shape_fn((n, n_components), |(i, c)| projected[i][c]);

        debug!(
            samples = n,
            attributes = d,
            components = n_components,
            "PCA projection complete"
        );

        Ok(PcaResult {
            embedding,
            explained_variance_ratio,
            eigenvalues: all_eigenvalues,
            components,
        })
    }

    /// Center data (subtract mean) and optionally scale to unit variance.
    fn center_and_scale(&self, data: &ArrayView2<'_, f64>) -> Array2<f64> {
        let mut out = data.to_owned();
        for mut col in out.axis_iter_mut(Axis(1)) {
            let values = col.to_vec();
            let mean = if self.config.center {
                SimdOps::mean_f64(&values)
            } else {
                0.0
            };
            let std = if self.config.scale {
                SimdOps::variance_f64(&values).sqrt().max(1e-12)
            } else {
                1.0
            };
            col.mapv_inplace(|v| (v - mean) / std);
        }
        out
    }

    /// Power iteration with deflation to extract top-k eigenvectors.
    fn power_iteration(&self, cov: &Array2<f64>, k: usize) -> (Vec<f64>, Vec<Array1<f64>>) {
        let d = cov.nrows();
        let mut work = cov.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.random_state);

        let mut eigenvalues = Vec::with_capacity(k);
        let mut eigenvectors = Vec::with_capacity(k);

        for _ in 0..k {
            let mut v: Array1<f64> = (0..d).map(|_| rng.gen_range(-1.0..1.0)).collect();
            let norm = v.dot(&v).sqrt().max(1e-12);
            v /= norm;

            let mut eigenvalue = 0.0;
            for _ in 0..self.config.max_iter {
                let w = work.dot(&v);
                eigenvalue = v.dot(&w);

                let w_norm = w.dot(&w).sqrt();
                if w_norm < 1e-300 {
                    break;
                }
                let next = w / w_norm;
                let diff = (&next - &v).mapv(|x| x * x).sum().sqrt();
                v = next;
                if diff < self.config.tolerance {
                    break;
                }
            }

            let eigenvalue = eigenvalue.max(0.0);
            orient(&mut v);

            // Deflate: A = A - lambda * v v^T
            for i in 0..d {
                for j in 0..d {
                    work[[i, j]] -= eigenvalue * v[i] * v[j];
                }
            }

            eigenvalues.push(eigenvalue);
            eigenvectors.push(v);
        }

        (eigenvalues, eigenvectors)
    }
}

/// Flip the axis so its largest-magnitude loading is positive.
fn orient(v: &mut Array1<f64>) {
    let pivot = v
        .iter()
        .copied()
        .fold(0.0_f64, |best, x| if x.abs() > best.abs() { x } else { best });
    if pivot < 0.0 {
        v.mapv_inplace(|x| -x);
    }
}

impl Reducer for Pca {
    fn name(&self) -> &'static str {
        "pca"
    }

    fn reduce(&self, data: ArrayView2<'_, f64>, n_components: usize) -> Result<Array2<f64>> {
        let result = self.fit_transform_with(data, n_components)?;
        debug!(
            explained_variance_ratio = ?result.explained_variance_ratio,
            "PCA explained variance"
        );
        Ok(result.embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_pca_basic() {
        // Perfectly linear data: one component carries everything
        let data = array![
            [1.0, 2.0],
            [2.0, 4.0],
            [3.0, 6.0],
            [4.0, 8.0],
            [5.0, 10.0],
        ];

        let pca = Pca::new(PcaConfig::default());
        let result = pca.fit_transform(data.view()).unwrap();

        assert_eq!(result.embedding.dim(), (5, 2));
        assert!(
            result.explained_variance_ratio[0] > 0.95,
            "First component should explain >95% variance, got {}",
            result.explained_variance_ratio[0]
        );
    }

    #[test]
    fn test_pca_two_clusters() {
        let data = array![
            [0.0, 0.0, 0.0],
            [0.1, 0.1, 0.0],
            [0.0, 0.1, 0.1],
            [10.0, 10.0, 10.0],
            [10.1, 10.0, 10.0],
            [10.0, 10.1, 10.0],
        ];

        let pca = Pca::new(PcaConfig::default());
        let result = pca.fit_transform(data.view()).unwrap();

        let emb = &result.embedding;
        let mean_a: f64 = (0..3).map(|i| emb[[i, 0]]).sum::<f64>() / 3.0;
        let mean_b: f64 = (3..6).map(|i| emb[[i, 0]]).sum::<f64>() / 3.0;
        assert!(
            (mean_a - mean_b).abs() > 1.0,
            "Clusters should be separated along PC1"
        );
    }

    #[test]
    fn test_pca_three_components() {
        let data = array![
            [1.0, 0.0, 0.5, 0.1],
            [0.0, 1.0, 0.3, 0.7],
            [1.0, 1.0, 0.8, 0.2],
            [0.5, 0.5, 0.4, 0.9],
            [0.2, 0.8, 0.6, 0.3],
            [0.9, 0.1, 0.2, 0.5],
        ];

        let pca = Pca::default();
        let embedding = pca.reduce(data.view(), 3).unwrap();
        assert_eq!(embedding.dim(), (6, 3));
    }

    #[test]
    fn test_pca_pads_beyond_rank() {
        let data = array![[1.0, 2.0], [2.0, 1.0], [3.0, 5.0], [4.0, 3.0]];

        let pca = Pca::default();
        let result = pca.fit_transform_with(data.view(), 3).unwrap();

        assert_eq!(result.embedding.dim(), (4, 3));
        assert!(result.embedding.column(2).iter().all(|&v| v == 0.0));
        assert_eq!(result.explained_variance_ratio[2], 0.0);
        let total: f64 = result.explained_variance_ratio.iter().sum();
        assert!((total - 1.0).abs() < 1e-6, "sum={}", total);
    }

    #[test]
    fn test_pca_embedding_is_centered() {
        let data = array![[3.0, 1.0, 7.0], [4.0, 2.0, 5.0], [8.0, 0.0, 1.0], [1.0, 9.0, 2.0]];
        let result = Pca::default().fit_transform(data.view()).unwrap();
        for col in result.embedding.axis_iter(Axis(1)) {
            assert!(col.sum().abs() < 1e-8);
        }
    }

    #[test]
    fn test_pca_deterministic() {
        let data = array![[1.0, 0.3, 2.0], [0.2, 1.5, 0.1], [2.2, 0.4, 1.1], [0.7, 0.9, 0.8]];
        let a = Pca::default().fit_transform(data.view()).unwrap();
        let b = Pca::default().fit_transform(data.view()).unwrap();
        assert_eq!(a.embedding, b.embedding);
    }

    #[test]
    fn test_pca_config_defaults() {
        let config = PcaConfig::default();
        assert_eq!(config.n_components, 2);
        assert!(config.center);
        assert!(!config.scale);
    }

    #[test]
    fn test_pca_too_few_samples() {
        let data = array![[1.0, 2.0]];
        assert!(Pca::default().fit_transform(data.view()).is_err());
    }

    #[test]
    fn test_pca_with_scaling() {
        let data = array![[1.0, 100.0], [2.0, 210.0], [3.0, 290.0], [4.0, 400.0]];

        let config = PcaConfig {
            scale: true,
            ..Default::default()
        };
        let result = Pca::new(config).fit_transform(data.view()).unwrap();
        assert_eq!(result.embedding.nrows(), 4);
        assert!(result.explained_variance_ratio[0] > 0.9);
    }
}
