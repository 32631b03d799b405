//! Single-pass leader-follower clustering.
//!
//! Order-dependent by design: callers present articles in a stable order
//! (crawl time) to get reproducible clusterings. Every input lands in
//! exactly one cluster.

use tracing::info;

use newsflow_core::traits::IEventIdSource;
use newsflow_embeddings::math;

use crate::store::Cluster;

/// Assignment mode for the clusterer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterMode<'a> {
    /// Fresh clustering: every new cluster mints a fresh id.
    Clustering,
    /// Re-clustering a diffuse cluster: the first new cluster keeps the
    /// parent's id, the rest mint fresh ids and become its children.
    Split { parent_event_id: &'a str },
}

/// Clusters produced by one clustering pass, in creation order.
#[derive(Debug, Default)]
pub struct ClusterBatch {
    pub clusters: Vec<(String, Cluster)>,
}

impl ClusterBatch {
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Total member count across all clusters.
    pub fn member_count(&self) -> usize {
        self.clusters.iter().map(|(_, c)| c.len()).sum()
    }
}

/// Assign each `(article_id, vector)` to the most similar existing
/// cluster, or seed a new one when the best similarity falls strictly
/// below `sim_threshold`. Centroids track the batch mean of members.
///
/// Ties on the maximum similarity keep the earliest-created cluster; the
/// choice is stable but not part of the contract.
pub fn online_clustering(
    vectors: &[(String, Vec<f32>)],
    sim_threshold: f64,
    mode: ClusterMode<'_>,
    id_source: &dyn IEventIdSource,
) -> ClusterBatch {
    let mut batch = ClusterBatch::default();
    let mut parent_pending = match mode {
        ClusterMode::Split { parent_event_id } => Some(parent_event_id),
        ClusterMode::Clustering => None,
    };

    for (article_id, vector) in vectors {
        let mut best: Option<(usize, f64)> = None;
        for (idx, (_, cluster)) in batch.clusters.iter().enumerate() {
            let sim = math::cosine(vector, &cluster.centroid);
            if best.map_or(true, |(_, best_sim)| sim > best_sim) {
                best = Some((idx, sim));
            }
        }

        match best {
            Some((idx, sim)) if sim >= sim_threshold => {
                batch.clusters[idx].1.push(article_id, vector.clone());
            }
            _ => {
                let event_id = match parent_pending.take() {
                    Some(parent) => parent.to_string(),
                    None => id_source.mint(),
                };
                batch
                    .clusters
                    .push((event_id, Cluster::seeded(article_id, vector.clone())));
            }
        }
    }

    if matches!(mode, ClusterMode::Clustering) {
        info!(
            articles = vectors.len(),
            clusters = batch.len(),
            "online clustering complete"
        );
    }
    batch
}
