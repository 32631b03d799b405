//! Shared test fixtures for the newsflow workspace: deterministic word
//! tables and id sources, article/event builders, and in-memory stores.
//! Everything here is deterministic so clustering tests reproduce.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use newsflow_core::errors::NewsflowResult;
use newsflow_core::models::{Article, EventRecord};
use newsflow_core::time::{compact_time, window_start};
use newsflow_core::traits::{IArticleStore, IEventIdSource, IEventStore};
use newsflow_embeddings::WordTable;

/// A deterministic word table: each word's vector is derived from its
/// blake3 hash, so similar tests get identical embeddings across runs.
pub fn hash_table(words: &[&str], dim: usize) -> WordTable {
    WordTable::from_pairs(
        words
            .iter()
            .map(|word| (word.to_string(), hash_vector(word, dim))),
        dim,
    )
}

/// The blake3-derived vector for one word, components in [-1, 1].
pub fn hash_vector(word: &str, dim: usize) -> Vec<f32> {
    let hash = blake3::hash(word.as_bytes());
    let bytes = hash.as_bytes();
    (0..dim)
        .map(|i| (bytes[i % 32] as f32 / 255.0) * 2.0 - 1.0)
        .collect()
}

/// Id source minting `S000`, `S001`, ... with a pinned clock. Tests
/// that chain several runs give each run its own prefix so ids never
/// collide the way real timestamp-prefixed ids never do.
#[derive(Debug)]
pub struct SequenceIdSource {
    prefix: String,
    counter: AtomicUsize,
}

impl Default for SequenceIdSource {
    fn default() -> Self {
        Self::with_prefix("S")
    }
}

impl SequenceIdSource {
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            counter: AtomicUsize::new(0),
        }
    }
}

impl IEventIdSource for SequenceIdSource {
    fn mint(&self) -> String {
        format!("{}{:03}", self.prefix, self.counter.fetch_add(1, Ordering::Relaxed))
    }

    fn now_string(&self) -> String {
        "2025-01-01 00:00:00".to_string()
    }
}

/// Build an article whose stemmed content repeats `words` enough times
/// to clear the default short-article threshold.
pub fn article(id: &str, words: &[&str], crawl_time: &str) -> Article {
    let stemmed = words.join(" ");
    let mut content = String::new();
    while content.chars().count() <= 90 {
        content.push_str(&stemmed);
        content.push(' ');
    }
    serde_json::from_value(serde_json::json!({
        "_id": id,
        "title": format!("Title {id}"),
        "content": format!("Full body of {id}. More detail follows."),
        "stemmedTitle": stemmed,
        "stemmedContent": content.trim(),
        "publisher": "wire",
        "category": "world",
        "url": format!("https://news.example/{id}"),
        "image": "",
        "publishTime": crawl_time,
        "crawlTime": crawl_time,
    }))
    .expect("fixture article must deserialize")
}

/// Like [`article`], with extracted keywords and person mentions.
pub fn article_with_entities(
    id: &str,
    words: &[&str],
    crawl_time: &str,
    keywords: &[(&str, f64)],
    persons: &[(&str, f64, &str)],
) -> Article {
    let mut a = article(id, words, crawl_time);
    a.keywords = keywords
        .iter()
        .map(|(word, score)| newsflow_core::models::TermScore {
            word: word.to_string(),
            score: *score,
        })
        .collect();
    a.persons = persons
        .iter()
        .map(|(mention, count, url)| newsflow_core::models::EntityMention {
            mention: mention.to_string(),
            count: *count,
            linked_url: url.to_string(),
        })
        .collect();
    a
}

/// In-memory article store keyed by id, filtering on compact crawl time.
#[derive(Debug, Default)]
pub struct MemoryArticleStore {
    articles: HashMap<String, Article>,
}

impl MemoryArticleStore {
    pub fn with_articles(articles: Vec<Article>) -> Self {
        Self {
            articles: articles.into_iter().map(|a| (a.id.clone(), a)).collect(),
        }
    }

    pub fn insert(&mut self, article: Article) {
        self.articles.insert(article.id.clone(), article);
    }
}

impl IArticleStore for MemoryArticleStore {
    fn query_many_by_time(
        &self,
        start_time: &str,
        end_time: &str,
    ) -> NewsflowResult<Vec<Article>> {
        let start = compact_time(start_time);
        let end = compact_time(end_time);
        let mut hits: Vec<Article> = self
            .articles
            .values()
            .filter(|a| {
                let t = compact_time(&a.crawl_time);
                t.as_str() > start.as_str() && t.as_str() < end.as_str()
            })
            .cloned()
            .collect();
        hits.sort_by(|a, b| a.crawl_time.cmp(&b.crawl_time).then(a.id.cmp(&b.id)));
        Ok(hits)
    }

    fn query_one_by_id(&self, id: &str) -> NewsflowResult<Option<Article>> {
        Ok(self.articles.get(id).cloned())
    }
}

/// In-memory event store with the same window/closing semantics as the
/// SQLite store.
#[derive(Debug)]
pub struct MemoryEventStore {
    events: Mutex<HashMap<String, EventRecord>>,
    window_days: u32,
}

impl Default for MemoryEventStore {
    fn default() -> Self {
        Self::new(10)
    }
}

impl MemoryEventStore {
    pub fn new(window_days: u32) -> Self {
        Self {
            events: Mutex::new(HashMap::new()),
            window_days,
        }
    }

    pub fn seed(&self, event: EventRecord) {
        self.events.lock().unwrap().insert(event.id.clone(), event);
    }

    pub fn get(&self, id: &str) -> Option<EventRecord> {
        self.events.lock().unwrap().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IEventStore for MemoryEventStore {
    fn query_recent_events_by_time(&self, t: &str) -> NewsflowResult<Vec<EventRecord>> {
        let horizon = compact_time(&window_start(t, self.window_days)?);
        let now = compact_time(t);
        let mut events = self.events.lock().unwrap();

        // Close everything that fell out of the window.
        for event in events.values_mut() {
            if !event.is_closed() && compact_time(&event.updated).as_str() < horizon.as_str() {
                event.closed = newsflow_core::models::ClosedMark::Flag(true);
            }
        }

        let mut hits: Vec<EventRecord> = events
            .values()
            .filter(|e| {
                let u = compact_time(&e.updated);
                !e.is_closed() && u.as_str() > horizon.as_str() && u.as_str() <= now.as_str()
            })
            .cloned()
            .collect();
        hits.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(hits)
    }

    fn query_one_by_id(&self, id: &str) -> NewsflowResult<Option<EventRecord>> {
        Ok(self.events.lock().unwrap().get(id).cloned())
    }

    fn save_item(&self, event: &EventRecord) -> NewsflowResult<()> {
        self.events
            .lock()
            .unwrap()
            .insert(event.id.clone(), event.clone());
        Ok(())
    }
}
