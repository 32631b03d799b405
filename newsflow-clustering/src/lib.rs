//! # newsflow-clustering
//!
//! The in-memory clustering core: the run-scoped cluster store, the
//! single-pass online clusterer, history loading, centroid merging, and
//! the reevaluate/split loop.

pub mod history;
pub mod merge;
pub mod online;
pub mod reevaluate;
pub mod store;

pub use online::{online_clustering, ClusterBatch, ClusterMode};
pub use store::{Cluster, ClusterStore};
