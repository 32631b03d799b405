//! # newsflow-events
//!
//! Turns the cluster store into persisted event records: keynews
//! selection, scored member lists, decay-weighted entity aggregation,
//! related-event links, and the skip-unchanged write policy.

pub mod aggregate;
pub mod builder;
pub mod writer;

pub use builder::build_event_record;
pub use writer::{write_events, WriteSummary};
