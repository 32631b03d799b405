//! Article vectoriser.
//!
//! Maps an article's stemmed text to the unit-weight average of its token
//! embeddings. The divisor is the *total* token count, unknowns included:
//! articles full of out-of-vocabulary tokens come out with a damped
//! magnitude and pull centroids less.

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use tracing::{debug, info};

use newsflow_core::constants::PROGRESS_LOG_EVERY;
use newsflow_core::models::Article;
use newsflow_core::traits::IWordEmbeddings;

/// Turns articles into `(article_id, vector)` pairs.
pub struct Vectorizer<'a> {
    table: &'a dyn IWordEmbeddings,
    short_article_threshold: usize,
}

impl<'a> Vectorizer<'a> {
    pub fn new(table: &'a dyn IWordEmbeddings, short_article_threshold: usize) -> Self {
        Self {
            table,
            short_article_threshold,
        }
    }

    /// Vectorise one stemmed text. Unknown tokens contribute zero but
    /// still count toward the divisor. All-unknown text yields the zero
    /// vector.
    pub fn vectorize_text(&self, text: &str) -> Vec<f32> {
        let dim = self.table.dimensions();
        let mut sums = vec![0.0f64; dim];
        let mut total_tokens = 0usize;

        for token in text.split_whitespace() {
            total_tokens += 1;
            if let Some(vector) = self.table.vector(token) {
                for (sum, v) in sums.iter_mut().zip(vector.iter()) {
                    *sum += *v as f64;
                }
            }
        }

        if total_tokens == 0 {
            return vec![0.0; dim];
        }
        let divisor = total_tokens as f64;
        sums.into_iter().map(|s| (s / divisor) as f32).collect()
    }

    /// Vectorise an article if it is long enough and lands on at least
    /// one in-vocabulary token. Short or all-unknown articles are data
    /// inconsistencies: dropped silently, never fatal.
    pub fn vectorize_article(&self, article: &Article) -> Option<Vec<f32>> {
        if !article.is_clusterable(self.short_article_threshold) {
            return None;
        }
        let vector = self.vectorize_text(&article.stemmed_text());
        if vector.iter().all(|v| *v == 0.0) {
            debug!(id = %article.id, "article vector has zero norm, skipping");
            return None;
        }
        Some(vector)
    }

    /// Vectorise a batch, preserving input order. The per-article work is
    /// pure, so it parallelises; progress is logged on a coarse cadence.
    pub fn vectorize_batch(&self, articles: &[Article]) -> Vec<(String, Vec<f32>)> {
        let done = AtomicUsize::new(0);
        let vectors: Vec<(String, Vec<f32>)> = articles
            .par_iter()
            .filter_map(|article| {
                let pair = self
                    .vectorize_article(article)
                    .map(|vector| (article.id.clone(), vector));
                let n = done.fetch_add(1, Ordering::Relaxed) + 1;
                if n % PROGRESS_LOG_EVERY == 0 {
                    debug!(done = n, total = articles.len(), "vectorising");
                }
                pair
            })
            .collect();

        info!(
            input = articles.len(),
            vectorised = vectors.len(),
            "vectorisation complete"
        );
        vectors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::WordTable;

    fn table() -> WordTable {
        WordTable::from_pairs(
            [
                ("quake".to_string(), vec![1.0, 0.0]),
                ("flood".to_string(), vec![0.0, 1.0]),
            ],
            2,
        )
    }

    fn article(id: &str, stemmed: &str) -> Article {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "stemmedTitle": stemmed,
            "stemmedContent": "x ".repeat(50).trim(),
        }))
        .unwrap()
    }

    #[test]
    fn divisor_counts_unknown_tokens() {
        let table = table();
        let v = Vectorizer::new(&table, 0);
        // One known token out of four total: 1.0 / 4.
        let vector = v.vectorize_text("quake foo bar baz");
        assert!((vector[0] - 0.25).abs() < 1e-6);
        assert_eq!(vector[1], 0.0);
    }

    #[test]
    fn empty_text_gives_zero_vector() {
        let table = table();
        let v = Vectorizer::new(&table, 0);
        assert_eq!(v.vectorize_text(""), vec![0.0, 0.0]);
    }

    #[test]
    fn batch_preserves_input_order() {
        let table = table();
        let v = Vectorizer::new(&table, 10);
        let articles = vec![
            article("a1", "quake"),
            article("a2", "flood"),
            article("a3", "quake flood"),
        ];
        let pairs = v.vectorize_batch(&articles);
        let ids: Vec<&str> = pairs.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2", "a3"]);
    }

    #[test]
    fn batch_skips_short_articles() {
        let table = table();
        let v = Vectorizer::new(&table, 200);
        let pairs = v.vectorize_batch(&[article("a1", "quake")]);
        assert!(pairs.is_empty());
    }

    #[test]
    fn batch_skips_all_unknown_articles() {
        let table = table();
        let v = Vectorizer::new(&table, 10);
        let mut a = article("a1", "totally unknown words only");
        a.stemmed_content = "none of these are in vocabulary ".repeat(4);
        let pairs = v.vectorize_batch(&[a]);
        assert!(pairs.is_empty());
    }
}
