// src/model/mod.rs
//! Frozen model artifacts: feature vectorizer, emotion classifier, label table.
//! All three are loaded once at startup and only read afterwards.

pub mod dense;
pub mod labels;
pub mod tfidf;

use crate::error::Result;

pub use dense::{Activation, DenseLayer, DenseNetwork};
pub use labels::LabelTable;
pub use tfidf::TfidfVectorizer;

/// Cleaned token string → fixed-length feature vector.
pub trait Vectorizer: Send + Sync {
    fn dim(&self) -> usize;
    fn vectorize(&self, text: &str) -> Result<Vec<f32>>;
}

/// Feature vector → probability distribution over the label table.
pub trait Classifier: Send + Sync {
    fn input_dim(&self) -> usize;
    fn output_dim(&self) -> usize;
    fn predict(&self, features: &[f32]) -> Result<Vec<f32>>;
}
