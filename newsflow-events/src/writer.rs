//! Write policy: upsert changed events, skip untouched history.

use tracing::info;

use newsflow_core::errors::NewsflowResult;
use newsflow_core::models::EventRecord;
use newsflow_core::traits::{IEventIdSource, IEventStore};
use newsflow_clustering::ClusterStore;

use crate::builder::build_event_record;

/// Outcome counts for one write pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: usize,
    pub skipped: usize,
}

/// Persist every cluster in the store as an event record.
///
/// A pre-existing event that saw no merge this run is skipped; everything
/// else is a full upsert by id. Fresh events get `created` stamped once;
/// every written event gets `updated = start_time`.
pub fn write_events(
    store: &ClusterStore,
    event_store: &dyn IEventStore,
    id_source: &dyn IEventIdSource,
    start_time: &str,
    cos_threshold: f64,
) -> NewsflowResult<WriteSummary> {
    let mut summary = WriteSummary::default();

    for (event_id, cluster) in store.iter() {
        let base = match event_store.query_one_by_id(event_id)? {
            Some(existing) => {
                if !store.is_updated(event_id) {
                    summary.skipped += 1;
                    continue;
                }
                existing
            }
            None => {
                let mut fresh = EventRecord::new(event_id);
                fresh.created = id_source.now_string();
                fresh
            }
        };

        let mut record =
            build_event_record(base, event_id, cluster, store, cos_threshold, start_time);
        record.updated = start_time.to_string();
        event_store.save_item(&record)?;
        summary.written += 1;
    }

    info!(
        written = summary.written,
        skipped = summary.skipped,
        "events persisted"
    );
    Ok(summary)
}
