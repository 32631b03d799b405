//! Centroid reevaluation and cluster splitting.
//!
//! After merging, every centroid is recomputed and each multi-member
//! cluster is checked for diffusion. Diffuse clusters are re-clustered
//! at the stricter sub-event threshold; the first sub-cluster keeps the
//! parent id, the rest become its children and go through a second merge
//! pass so small fragments can coalesce with existing events.

use tracing::{debug, info};

use newsflow_core::traits::IEventIdSource;
use newsflow_embeddings::math;

use crate::merge;
use crate::online::{online_clustering, ClusterBatch, ClusterMode};
use crate::store::ClusterStore;

/// Cosine mean / standard deviation samples observed across the store,
/// kept for the debug dump.
#[derive(Debug, Default, Clone)]
pub struct CohesionObservations {
    pub cos: Vec<f64>,
    pub cos_std: Vec<f64>,
    pub splits: usize,
}

/// Recompute all centroids, split diffuse clusters, and merge the spare
/// fragments back against the store.
pub fn reevaluate(
    store: &mut ClusterStore,
    subevent_sim_threshold: f64,
    cos_std_threshold: f64,
    merge_sim_threshold: f64,
    id_source: &dyn IEventIdSource,
) -> CohesionObservations {
    store.recompute_all_centroids();

    let mut observations = CohesionObservations::default();
    let mut diffuse = Vec::new();
    for (event_id, cluster) in store.iter() {
        if cluster.len() < 2 {
            continue;
        }
        let (cos_mean, cos_std) = math::cohesion(&cluster.vectors, &cluster.centroid);
        observations.cos.push(cos_mean);
        observations.cos_std.push(cos_std);
        if cos_std > cos_std_threshold {
            debug!(event = %event_id, cos_std, "diffuse cluster, will split");
            diffuse.push(event_id.clone());
        }
    }

    let mut spare = ClusterBatch::default();
    for event_id in &diffuse {
        let leftover = split_cluster(store, event_id, subevent_sim_threshold, id_source);
        spare.clusters.extend(leftover.clusters);
    }
    observations.splits = diffuse.len();

    info!(
        split = diffuse.len(),
        fragments = spare.len(),
        "reevaluation complete"
    );
    merge::merge_batch(store, spare, merge_sim_threshold);
    observations
}

/// Re-cluster one diffuse cluster's members at the sub-event threshold.
/// The first sub-cluster overwrites the original under its id; remaining
/// sub-clusters are linked as children and returned for the second merge
/// pass. The parent is flagged updated so its new shape is persisted.
fn split_cluster(
    store: &mut ClusterStore,
    event_id: &str,
    subevent_sim_threshold: f64,
    id_source: &dyn IEventIdSource,
) -> ClusterBatch {
    let cluster = match store.cluster(event_id) {
        Some(cluster) => cluster.clone(),
        None => return ClusterBatch::default(),
    };

    let vectors: Vec<(String, Vec<f32>)> = cluster
        .article_ids
        .iter()
        .cloned()
        .zip(cluster.vectors.iter().cloned())
        .collect();

    let mut batch = online_clustering(
        &vectors,
        subevent_sim_threshold,
        ClusterMode::Split {
            parent_event_id: event_id,
        },
        id_source,
    );
    if batch.is_empty() {
        return batch;
    }

    let (first_id, first_cluster) = batch.clusters.remove(0);
    debug_assert_eq!(first_id, event_id);
    store.replace_cluster(event_id, first_cluster);
    store.mark_updated(event_id);

    for (child_id, _) in &batch.clusters {
        store.link(child_id, event_id);
    }
    batch
}
