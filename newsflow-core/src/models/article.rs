use serde::{Deserialize, Serialize};

/// Weighted term extracted from an article (keywords / when / where / who).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermScore {
    pub word: String,
    pub score: f64,
}

/// Linked named-entity mention (persons / locations / organizations).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMention {
    pub mention: String,
    pub count: f64,
    #[serde(default, rename = "linkedURL")]
    pub linked_url: String,
}

/// An incoming news article. Immutable within a run; referenced by id
/// throughout and discarded at the end. Unknown fields are preserved in
/// `extra` so upstream consumers never lose data across an upsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub stemmed_title: String,
    #[serde(default)]
    pub stemmed_content: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub publish_time: String,
    #[serde(default)]
    pub crawl_time: String,
    #[serde(default)]
    pub keywords: Vec<TermScore>,
    #[serde(default)]
    pub when: Vec<TermScore>,
    #[serde(default, rename = "where")]
    pub where_: Vec<TermScore>,
    #[serde(default)]
    pub who: Vec<TermScore>,
    #[serde(default)]
    pub persons: Vec<EntityMention>,
    #[serde(default)]
    pub locations: Vec<EntityMention>,
    #[serde(default)]
    pub organizations: Vec<EntityMention>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Article {
    /// The text fed to the vectoriser: stemmed title and content joined
    /// by a single space.
    pub fn stemmed_text(&self) -> String {
        format!("{} {}", self.stemmed_title, self.stemmed_content)
    }

    /// Whether this article participates in clustering. Short articles
    /// (at or below the threshold) are dropped silently.
    pub fn is_clusterable(&self, short_article_threshold: usize) -> bool {
        self.stemmed_text().chars().count() > short_article_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_json() -> serde_json::Value {
        serde_json::json!({
            "_id": "a1",
            "stemmedTitle": "quake strike coast",
            "stemmedContent": "earthquake magnitud seven strike coastal region earli morn",
            "crawlTime": "20250101120000",
            "sourceRank": 3
        })
    }

    #[test]
    fn deserializes_wire_names() {
        let article: Article = serde_json::from_value(minimal_json()).unwrap();
        assert_eq!(article.id, "a1");
        assert_eq!(article.stemmed_title, "quake strike coast");
        assert!(article.keywords.is_empty());
    }

    #[test]
    fn preserves_unknown_fields() {
        let article: Article = serde_json::from_value(minimal_json()).unwrap();
        assert_eq!(article.extra["sourceRank"], 3);
        let back = serde_json::to_value(&article).unwrap();
        assert_eq!(back["sourceRank"], 3);
    }

    #[test]
    fn stemmed_text_joins_with_space() {
        let article: Article = serde_json::from_value(minimal_json()).unwrap();
        assert!(article.stemmed_text().starts_with("quake strike coast earthquake"));
    }

    #[test]
    fn short_article_is_not_clusterable() {
        let mut article: Article = serde_json::from_value(minimal_json()).unwrap();
        article.stemmed_content = "short".to_string();
        assert!(!article.is_clusterable(80));
        assert!(article.is_clusterable(10));
    }

    #[test]
    fn threshold_is_strict() {
        let mut article: Article = serde_json::from_value(minimal_json()).unwrap();
        article.stemmed_title = "a".repeat(39);
        article.stemmed_content = "b".repeat(40);
        // 39 + 1 (joining space) + 40 = 80 exactly: not clusterable.
        assert!(!article.is_clusterable(80));
        article.stemmed_content.push('b');
        assert!(article.is_clusterable(80));
    }
}
