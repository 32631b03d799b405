//! Centroid merge: fold newly produced clusters into the store.

use tracing::{debug, info};

use newsflow_embeddings::math;

use crate::online::ClusterBatch;
use crate::store::ClusterStore;

/// Merge a batch of new clusters into the store by centroid similarity.
///
/// A new cluster whose best match falls below `merge_sim_threshold` is
/// installed standalone under its own id; otherwise it folds into the
/// best match, which is flagged updated. An absorbed cluster's hierarchy
/// links are stripped: it is no longer a distinct sub-event.
///
/// An empty store takes the whole batch verbatim.
pub fn merge_batch(store: &mut ClusterStore, batch: ClusterBatch, merge_sim_threshold: f64) {
    if store.is_empty() {
        let installed = batch.clusters.len();
        for (event_id, cluster) in batch.clusters {
            store.insert_cluster(&event_id, cluster);
        }
        info!(installed, "merge into empty store");
        return;
    }

    let mut installed = 0usize;
    let mut folded = 0usize;
    for (event_id, cluster) in batch.clusters {
        let mut best: Option<(String, f64)> = None;
        for (candidate_id, candidate) in store.iter() {
            let sim = math::cosine(&cluster.centroid, &candidate.centroid);
            if best.as_ref().map_or(true, |(_, best_sim)| sim > *best_sim) {
                best = Some((candidate_id.clone(), sim));
            }
        }

        match best {
            Some((best_id, sim)) if sim >= merge_sim_threshold => {
                debug!(new = %event_id, into = %best_id, sim, "folding cluster");
                if let Some(target) = store.cluster_mut(&best_id) {
                    target.absorb(cluster);
                }
                store.mark_updated(&best_id);
                if store.has_parent(&event_id) {
                    store.unlink_child(&event_id);
                }
                if store.is_parent(&event_id) {
                    store.drop_parent_entry(&event_id);
                }
                folded += 1;
            }
            _ => {
                store.insert_cluster(&event_id, cluster);
                installed += 1;
            }
        }
    }
    info!(installed, folded, "merge complete");
}
