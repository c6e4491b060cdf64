// src/extractors/mod.rs
pub mod schools;

// Re-export key extraction types for convenience
pub use schools::{Extraction, SchoolExtractor};
