//! Integration tests for event assembly and the write policy.

use newsflow_core::models::{ClosedMark, EventRecord};
use newsflow_core::traits::IEventIdSource;
use newsflow_clustering::{Cluster, ClusterStore};
use newsflow_events::{build_event_record, write_events};
use test_fixtures::{article, article_with_entities, MemoryEventStore, SequenceIdSource};

const START: &str = "2025-01-21 00:00:00";

/// A store with one 3-member cluster whose members sit at slightly
/// different distances from the centroid.
fn three_member_store() -> (ClusterStore, String) {
    let mut store = ClusterStore::new(2);
    store.cache_article(article_with_entities(
        "a1",
        &["quake"],
        "2025-01-20 08:00:00",
        &[("quake", 0.9), ("coast", 0.4)],
        &[("Alice", 2.0, "https://kb/alice")],
    ));
    store.cache_article(article_with_entities(
        "a2",
        &["quake"],
        "2025-01-20 09:00:00",
        &[("quake", 0.8)],
        &[("Alice", 1.0, "https://other/alice"), ("Bob", 3.0, "")],
    ));
    store.cache_article(article_with_entities(
        "a3",
        &["quake"],
        "2025-01-20 10:00:00",
        &[("rescue", 0.7)],
        &[],
    ));
    store.insert_cluster(
        "E1",
        Cluster::from_members(
            vec!["a1".into(), "a2".into(), "a3".into()],
            vec![vec![0.98, 0.05], vec![1.0, 0.0], vec![0.9, 0.2]],
            2,
        ),
    );
    (store, "E1".to_string())
}

#[test]
fn keynews_is_the_member_closest_to_centroid() {
    let (store, id) = three_member_store();
    let cluster = store.cluster(&id).unwrap();
    let record = build_event_record(EventRecord::new(&id), &id, cluster, &store, 0.6, START);

    let keynews = record.keynews.expect("keynews present");
    let best = record
        .articles
        .iter()
        .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap())
        .unwrap();
    assert_eq!(keynews.article.id, best.id);
    assert!(!keynews.abstract_.is_empty());
    assert_eq!(record.count, 3);
}

#[test]
fn member_scores_are_cosines_to_centroid() {
    let (store, id) = three_member_store();
    let cluster = store.cluster(&id).unwrap();
    let record = build_event_record(EventRecord::new(&id), &id, cluster, &store, 0.6, START);

    for (idx, member) in record.articles.iter().enumerate() {
        let expected =
            newsflow_embeddings::math::cosine(&cluster.vectors[idx], &cluster.centroid);
        assert!((member.score - expected).abs() < 1e-9);
    }
}

#[test]
fn keyword_scores_are_normalised_and_label_uses_top_words() {
    let (store, id) = three_member_store();
    let cluster = store.cluster(&id).unwrap();
    let record = build_event_record(EventRecord::new(&id), &id, cluster, &store, 0.6, START);

    let norm: f64 = record
        .keywords
        .iter()
        .map(|k| k.score.parse::<f64>().unwrap().powi(2))
        .sum::<f64>()
        .sqrt();
    assert!((norm - 1.0).abs() < 0.05, "keyword norm {norm}");

    assert_eq!(record.keywords[0].word, "quake");
    assert!(record.label.starts_with("quake"));
    assert_eq!(
        record.label.split(' ').count(),
        record.keywords.len().min(5)
    );
}

#[test]
fn person_aggregation_keeps_first_seen_url() {
    let (store, id) = three_member_store();
    let cluster = store.cluster(&id).unwrap();
    let record = build_event_record(EventRecord::new(&id), &id, cluster, &store, 0.6, START);

    let alice = record
        .persons
        .iter()
        .find(|p| p.mention == "Alice")
        .unwrap();
    assert_eq!(alice.count, "3.00");
    // a1 is closest to the centroid, so its URL wins.
    assert_eq!(alice.linked_url, "https://kb/alice");
}

#[test]
fn related_events_filter_floor_and_exclude_self() {
    let mut store = ClusterStore::new(2);
    // Pairwise centroid cosines: (A,B) ~ 0.8, (A,C) ~ 0.55, (B,C) ~ varies.
    let a = vec![1.0, 0.0];
    let b = vec![0.8, (1.0f32 - 0.8 * 0.8).sqrt()];
    let c = vec![0.55, (1.0f32 - 0.55 * 0.55).sqrt()];
    store.insert_cluster("A", Cluster::seeded("a1", a));
    store.insert_cluster("B", Cluster::seeded("b1", b));
    store.insert_cluster("C", Cluster::seeded("c1", c));
    store.cache_article(article("a1", &["x"], "2025-01-20 08:00:00"));
    store.cache_article(article("b1", &["x"], "2025-01-20 08:00:00"));
    store.cache_article(article("c1", &["x"], "2025-01-20 08:00:00"));

    let cluster = store.cluster("A").unwrap();
    let record = build_event_record(EventRecord::new("A"), "A", cluster, &store, 0.6, START);

    let ids: Vec<&str> = record.related_events.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["B"]);
    assert!((record.related_events[0].score - 0.8).abs() < 1e-3);
}

#[test]
fn parent_with_children_closes_at_start_time() {
    let (mut store, id) = three_member_store();
    store.insert_cluster("E2", Cluster::seeded("a9", vec![0.0, 1.0]));
    store.cache_article(article("a9", &["x"], "2025-01-20 11:00:00"));
    store.link("E2", &id);

    let cluster = store.cluster(&id).unwrap();
    let record = build_event_record(EventRecord::new(&id), &id, cluster, &store, 0.6, START);
    assert_eq!(record.childrens, vec!["E2".to_string()]);
    assert_eq!(record.closed, ClosedMark::At(START.to_string()));
    assert_eq!(record.closed_at.as_deref(), Some(START));

    let child_cluster = store.cluster("E2").unwrap();
    let child = build_event_record(EventRecord::new("E2"), "E2", child_cluster, &store, 0.6, START);
    assert_eq!(child.father.as_deref(), Some(id.as_str()));
    assert!(!child.is_closed());
}

#[test]
fn unchanged_history_event_is_not_rewritten() {
    let (mut store, id) = three_member_store();
    let event_store = MemoryEventStore::default();
    let ids = SequenceIdSource::default();

    // The event already exists and nothing merged into it this run.
    let mut existing = EventRecord::new(&id);
    existing.created = "2025-01-10 00:00:00".to_string();
    existing.updated = "2025-01-15 00:00:00".to_string();
    event_store.seed(existing);
    store.set_updated(&id, false);

    let summary = write_events(&store, &event_store, &ids, START, 0.6).unwrap();
    assert_eq!(summary.written, 0);
    assert_eq!(summary.skipped, 1);
    assert_eq!(event_store.get(&id).unwrap().updated, "2025-01-15 00:00:00");
}

#[test]
fn updated_history_event_is_rewritten_and_keeps_created() {
    let (mut store, id) = three_member_store();
    let event_store = MemoryEventStore::default();
    let ids = SequenceIdSource::default();

    let mut existing = EventRecord::new(&id);
    existing.created = "2025-01-10 00:00:00".to_string();
    existing.updated = "2025-01-15 00:00:00".to_string();
    existing
        .extra
        .insert("editorialNote".to_string(), serde_json::json!("pinned"));
    event_store.seed(existing);
    store.mark_updated(&id);

    let summary = write_events(&store, &event_store, &ids, START, 0.6).unwrap();
    assert_eq!(summary.written, 1);

    let written = event_store.get(&id).unwrap();
    assert_eq!(written.updated, START);
    assert_eq!(written.created, "2025-01-10 00:00:00");
    assert_eq!(written.count, 3);
    // Unknown fields from the stored document ride along.
    assert_eq!(written.extra["editorialNote"], "pinned");
}

#[test]
fn fresh_event_gets_created_stamp() {
    let (store, id) = three_member_store();
    let event_store = MemoryEventStore::default();
    let ids = SequenceIdSource::default();

    let summary = write_events(&store, &event_store, &ids, START, 0.6).unwrap();
    assert_eq!(summary.written, 1);

    let written = event_store.get(&id).unwrap();
    assert_eq!(written.created, ids.now_string());
    assert_eq!(written.updated, START);
    assert_eq!(written.event_id, id);
}
