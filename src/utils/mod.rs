//! Utility functions and types

pub mod data_loader;
pub mod simd;

pub use data_loader::DataLoader;
pub use simd::SimdOps;
