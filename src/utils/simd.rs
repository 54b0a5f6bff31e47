//! SIMD-accelerated vector kernels used by the reducers
//!
//! AVX2 paths on x86_64 with scalar fallbacks everywhere else.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

/// Vector math over `f64` slices
pub struct SimdOps;

impl SimdOps {
    /// Sum of slice elements
    pub fn sum_f64(data: &[f64]) -> f64 {
        data.iter().sum()
    }

    /// Arithmetic mean, 0 for an empty slice
    pub fn mean_f64(data: &[f64]) -> f64 {
        if data.is_empty() {
            return 0.0;
        }
        Self::sum_f64(data) / data.len() as f64
    }

    /// Population variance
    pub fn variance_f64(data: &[f64]) -> f64 {
        if data.len() < 2 {
            return 0.0;
        }
        let mean = Self::mean_f64(data);
        data.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / data.len() as f64
    }

    /// Squared Euclidean distance
    #[cfg(target_arch = "x86_64")]
    pub fn squared_euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len());
        if !is_x86_feature_detected!("avx2") || a.len() < 4 {
            return a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum();
        }
        unsafe { Self::squared_distance_avx(a, b) }
    }

    #[cfg(not(target_arch = "x86_64"))]
    pub fn squared_euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
        a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
    }

    /// Euclidean distance
    pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
        Self::squared_euclidean_distance(a, b).sqrt()
    }

    #[cfg(target_arch = "x86_64")]
    #[target_feature(enable = "avx2")]
    unsafe fn squared_distance_avx(a: &[f64], b: &[f64]) -> f64 {
        let chunks_a = a.chunks_exact(4);
        let chunks_b = b.chunks_exact(4);
        let tail: f64 = chunks_a
            .remainder()
            .iter()
            .zip(chunks_b.remainder())
            .map(|(x, y)| (x - y).powi(2))
            .sum();

        let mut acc = _mm256_setzero_pd();
        for (ca, cb) in chunks_a.zip(chunks_b) {
            let diff = _mm256_sub_pd(_mm256_loadu_pd(ca.as_ptr()), _mm256_loadu_pd(cb.as_ptr()));
            acc = _mm256_add_pd(acc, _mm256_mul_pd(diff, diff));
        }
        Self::horizontal_sum(acc) + tail
    }

    #[cfg(target_arch = "x86_64")]
    #[target_feature(enable = "avx2")]
    unsafe fn horizontal_sum(v: __m256d) -> f64 {
        let low = _mm256_castpd256_pd128(v);
        let high = _mm256_extractf128_pd(v, 1);
        let sum128 = _mm_add_pd(low, high);
        let high64 = _mm_unpackhi_pd(sum128, sum128);
        _mm_cvtsd_f64(_mm_add_sd(sum128, high64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((SimdOps::mean_f64(&data) - 3.0).abs() < 1e-10);
        assert_eq!(SimdOps::mean_f64(&[]), 0.0);
    }

    #[test]
    fn test_squared_distance() {
        let a = vec![0.0, 0.0, 0.0, 0.0, 0.0];
        let b = vec![1.0, 2.0, 0.0, 0.0, 2.0];
        assert!((SimdOps::squared_euclidean_distance(&a, &b) - 9.0).abs() < 1e-10);
        assert!((SimdOps::euclidean_distance(&a, &b) - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_variance() {
        let data = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((SimdOps::variance_f64(&data) - 4.0).abs() < 1e-10);
    }
}
