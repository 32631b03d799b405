//! History loading: re-materialise recent persisted events as clusters.

use tracing::{debug, info};

use newsflow_core::errors::NewsflowResult;
use newsflow_core::models::EventRecord;
use newsflow_core::traits::IArticleStore;
use newsflow_embeddings::Vectorizer;

use crate::store::{Cluster, ClusterStore};

/// Load recent events into the store: re-vectorise each referenced
/// article, restore the hierarchy, and flag every event as not-updated.
///
/// Articles that are gone from the store, too short, or all out-of-
/// vocabulary are skipped silently; the event survives on its remaining
/// members, down to an empty matrix with a guarded centroid.
pub fn load_history(
    store: &mut ClusterStore,
    events: &[EventRecord],
    article_store: &dyn IArticleStore,
    vectorizer: &Vectorizer<'_>,
) -> NewsflowResult<usize> {
    let mut loaded = 0usize;
    for event in events {
        let mut vectors = Vec::new();
        let mut article_ids = Vec::new();

        for member in &event.articles {
            let article = match article_store.query_one_by_id(&member.id)? {
                Some(article) => article,
                None => {
                    debug!(event = %event.id, article = %member.id, "history article gone, skipping");
                    continue;
                }
            };
            if let Some(vector) = vectorizer.vectorize_article(&article) {
                vectors.push(vector);
                article_ids.push(article.id.clone());
                store.cache_article(article);
            }
        }

        let dim = store.dim();
        let cluster = if article_ids.is_empty() {
            Cluster::empty(dim)
        } else {
            Cluster::from_members(article_ids, vectors, dim)
        };
        store.insert_cluster(&event.id, cluster);
        store.set_updated(&event.id, false);

        for child in &event.childrens {
            store.link(child, &event.id);
        }
        if let Some(father) = &event.father {
            store.link(&event.id, father);
        }
        loaded += 1;
    }

    info!(events = loaded, "history loaded");
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsflow_core::models::EventArticle;

    fn member(id: &str) -> EventArticle {
        EventArticle {
            id: id.to_string(),
            publisher: String::new(),
            category: String::new(),
            title: String::new(),
            url: String::new(),
            publish_time: String::new(),
            image: String::new(),
            score: 0.0,
        }
    }

    fn event(id: &str, members: &[&str]) -> EventRecord {
        let mut record = EventRecord::new(id);
        record.articles = members.iter().map(|m| member(m)).collect();
        record
    }

    #[test]
    fn restores_hierarchy_from_both_directions() {
        let table = test_fixtures::hash_table(&["quake"], 4);
        let vectorizer = Vectorizer::new(&table, 0);
        let articles = test_fixtures::MemoryArticleStore::default();
        let mut store = ClusterStore::new(4);

        let mut parent = event("p", &[]);
        parent.childrens = vec!["c".to_string()];
        let mut child = event("c", &[]);
        child.father = Some("p".to_string());

        load_history(&mut store, &[parent, child], &articles, &vectorizer).unwrap();
        assert_eq!(store.parent_of("c"), Some(&"p".to_string()));
        assert_eq!(store.children_of("p"), vec!["c".to_string()]);
    }

    #[test]
    fn missing_articles_leave_empty_guarded_cluster() {
        let table = test_fixtures::hash_table(&["quake"], 4);
        let vectorizer = Vectorizer::new(&table, 0);
        let articles = test_fixtures::MemoryArticleStore::default();
        let mut store = ClusterStore::new(4);

        load_history(
            &mut store,
            &[event("e1", &["gone1", "gone2"])],
            &articles,
            &vectorizer,
        )
        .unwrap();

        let cluster = store.cluster("e1").unwrap();
        assert!(cluster.is_empty());
        assert_eq!(cluster.centroid, vec![0.0; 4]);
        assert!(!store.is_updated("e1"));
    }
}
