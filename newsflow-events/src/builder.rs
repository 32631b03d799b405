//! Event record assembly from a cluster and the run store.

use newsflow_core::constants::{LABEL_KEYWORDS, MAX_RELATED_EVENTS, TOP_ENTITIES};
use newsflow_core::models::{
    Article, ClosedMark, EventArticle, EventRecord, KeyNews, RelatedEvent,
};
use newsflow_clustering::{Cluster, ClusterStore};
use newsflow_embeddings::math;

use crate::aggregate;

/// A first-sentence-ish extract used as the keynews abstract.
pub fn simple_abstract(content: &str) -> String {
    const MAX_CHARS: usize = 200;
    let trimmed = content.trim();
    if let Some(pos) = trimmed.find(". ") {
        let sentence = &trimmed[..pos + 1];
        if sentence.chars().count() <= MAX_CHARS {
            return sentence.to_string();
        }
    }
    trimmed.chars().take(MAX_CHARS).collect()
}

fn event_article(article: &Article, score: f64) -> EventArticle {
    EventArticle {
        id: article.id.clone(),
        publisher: article.publisher.clone(),
        category: article.category.clone(),
        title: article.title.clone(),
        url: article.url.clone(),
        publish_time: article.publish_time.clone(),
        image: article.image.clone(),
        score,
    }
}

/// Fill `record` from the cluster's current state: keynews, scored
/// members, hierarchy, closure, related events, entity aggregates, and
/// the label. `record` is either a fresh shell or the previously
/// persisted document (whose unknown fields ride along untouched).
pub fn build_event_record(
    mut record: EventRecord,
    event_id: &str,
    cluster: &Cluster,
    store: &ClusterStore,
    cos_threshold: f64,
    start_time: &str,
) -> EventRecord {
    record.id = event_id.to_string();
    record.event_id = event_id.to_string();

    let sims: Vec<f64> = cluster
        .vectors
        .iter()
        .map(|vector| math::cosine(vector, &cluster.centroid))
        .collect();

    // Keynews: the cached member closest to the centroid.
    let mut key: Option<(usize, f64)> = None;
    for (idx, sim) in sims.iter().enumerate() {
        if store.article(&cluster.article_ids[idx]).is_none() {
            continue;
        }
        if key.map_or(true, |(_, best)| *sim > best) {
            key = Some((idx, *sim));
        }
    }
    record.keynews = key.and_then(|(idx, sim)| {
        store.article(&cluster.article_ids[idx]).map(|article| KeyNews {
            article: event_article(article, sim),
            abstract_: simple_abstract(&article.content),
        })
    });

    record.articles = cluster
        .article_ids
        .iter()
        .enumerate()
        .filter_map(|(idx, article_id)| {
            store
                .article(article_id)
                .map(|article| event_article(article, sims[idx]))
        })
        .collect();
    record.count = record.articles.len();

    // Hierarchy, always rewritten from the store's current maps.
    record.father = store.parent_of(event_id).cloned();
    record.childrens = store.children_of(event_id);
    if !record.childrens.is_empty() {
        // A parent with surviving children takes no further merges.
        record.closed = ClosedMark::At(start_time.to_string());
        record.closed_at = Some(start_time.to_string());
    }

    // Related events: other clusters in this snapshot above the floor.
    let mut related: Vec<RelatedEvent> = store
        .iter()
        .filter(|(other_id, _)| other_id.as_str() != event_id)
        .map(|(other_id, other)| RelatedEvent {
            id: other_id.clone(),
            score: math::cosine(&cluster.centroid, &other.centroid),
        })
        .collect();
    related.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    related.retain(|r| r.score > cos_threshold);
    related.truncate(MAX_RELATED_EVENTS);
    record.related_events = related;

    // Entity aggregates over members in decay order.
    let order = aggregate::decay_order(&sims);
    let members: Vec<&Article> = order
        .iter()
        .filter_map(|&idx| store.article(&cluster.article_ids[idx]))
        .collect();

    let keyword_lists: Vec<&[newsflow_core::models::TermScore]> =
        members.iter().map(|a| a.keywords.as_slice()).collect();
    record.keywords = aggregate::aggregate_terms(&keyword_lists, TOP_ENTITIES);

    let when_lists: Vec<_> = members.iter().map(|a| a.when.as_slice()).collect();
    record.when = aggregate::aggregate_terms(&when_lists, TOP_ENTITIES);
    let where_lists: Vec<_> = members.iter().map(|a| a.where_.as_slice()).collect();
    record.where_ = aggregate::aggregate_terms(&where_lists, TOP_ENTITIES);
    let who_lists: Vec<_> = members.iter().map(|a| a.who.as_slice()).collect();
    record.who = aggregate::aggregate_terms(&who_lists, TOP_ENTITIES);

    let person_lists: Vec<_> = members.iter().map(|a| a.persons.as_slice()).collect();
    record.persons = aggregate::aggregate_mentions(&person_lists, TOP_ENTITIES);
    let location_lists: Vec<_> = members.iter().map(|a| a.locations.as_slice()).collect();
    record.locations = aggregate::aggregate_mentions(&location_lists, TOP_ENTITIES);
    let organization_lists: Vec<_> = members.iter().map(|a| a.organizations.as_slice()).collect();
    record.organizations = aggregate::aggregate_mentions(&organization_lists, TOP_ENTITIES);

    record.label = record
        .keywords
        .iter()
        .take(LABEL_KEYWORDS)
        .map(|k| k.word.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abstract_takes_first_sentence() {
        let content = "Quake hits coast. Rescue teams are on site.";
        assert_eq!(simple_abstract(content), "Quake hits coast.");
    }

    #[test]
    fn abstract_caps_unpunctuated_content() {
        let content = "x".repeat(500);
        assert_eq!(simple_abstract(&content).chars().count(), 200);
    }

    #[test]
    fn abstract_of_empty_content_is_empty() {
        assert_eq!(simple_abstract("   "), "");
    }
}
