pub mod normalizer;

pub use normalizer::{normalize, NormalizedExport};
