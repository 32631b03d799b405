//! # newsflow-embeddings
//!
//! Word-embedding table loading, the article vectoriser, and the vector
//! math (cosine, centroid, cohesion) the clustering stages build on.

pub mod math;
pub mod table;
pub mod vectorize;

pub use table::WordTable;
pub use vectorize::Vectorizer;
