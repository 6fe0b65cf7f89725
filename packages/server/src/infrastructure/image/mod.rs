//! Image decoding, orientation normalization and re-encoding

pub mod normalizer;

pub use normalizer::{ImageProcessingError, NormalizedImage, normalize_upload};
