use serde::{Deserialize, Serialize};

/// One member article as persisted inside an event record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventArticle {
    pub id: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub publish_time: String,
    #[serde(default)]
    pub image: String,
    /// Cosine similarity of this member to the cluster centroid.
    #[serde(default)]
    pub score: f64,
}

/// The representative article of an event: the member closest to the
/// centroid, plus a short content extract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyNews {
    #[serde(flatten)]
    pub article: EventArticle,
    #[serde(default, rename = "abstract")]
    pub abstract_: String,
}

/// Aggregated term with its normalised score, formatted two-decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityScore {
    pub word: String,
    pub score: String,
}

/// Aggregated named entity. `count` is the raw summed mention count and
/// `score` the L2-normalised count, both formatted two-decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NerEntity {
    pub mention: String,
    pub count: String,
    pub score: String,
    #[serde(default, rename = "linkedURL")]
    pub linked_url: String,
}

/// Link to a similar event in the same store snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedEvent {
    pub id: String,
    pub score: f64,
}

/// Closure marker. Historic records carry either a boolean or the
/// closure start-time string; both shapes must round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClosedMark {
    Flag(bool),
    At(String),
}

impl ClosedMark {
    pub fn is_closed(&self) -> bool {
        match self {
            ClosedMark::Flag(flag) => *flag,
            ClosedMark::At(_) => true,
        }
    }
}

impl Default for ClosedMark {
    fn default() -> Self {
        ClosedMark::Flag(false)
    }
}

/// `father` serialises as the parent event id, or the number -1 when the
/// event has no parent.
mod father_ref {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        father: &Option<String>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match father {
            Some(id) => serializer.serialize_str(id),
            None => serializer.serialize_i64(-1),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Id(String),
            Sentinel(i64),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Id(id) => Ok(Some(id)),
            Raw::Sentinel(_) => Ok(None),
        }
    }
}

/// A persisted event: a cluster of articles believed to describe one
/// real-world occurrence. Upserted by `_id`; unknown fields survive the
/// round trip through `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// Storage key.
    #[serde(rename = "_id")]
    pub id: String,
    /// Public event id; mirrors `_id`.
    #[serde(rename = "id")]
    pub event_id: String,
    /// Wall-clock of first creation, canonical string form. Preserved
    /// across updates.
    #[serde(default)]
    pub created: String,
    /// Run start_time of the last write.
    #[serde(default)]
    pub updated: String,
    #[serde(default)]
    pub closed: ClosedMark,
    /// Set when a split closes this event; any non-null value means closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<String>,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keynews: Option<KeyNews>,
    #[serde(default)]
    pub articles: Vec<EventArticle>,
    #[serde(default)]
    pub keywords: Vec<EntityScore>,
    #[serde(default)]
    pub when: Vec<EntityScore>,
    #[serde(default, rename = "where")]
    pub where_: Vec<EntityScore>,
    #[serde(default)]
    pub who: Vec<EntityScore>,
    #[serde(default)]
    pub persons: Vec<NerEntity>,
    #[serde(default)]
    pub locations: Vec<NerEntity>,
    #[serde(default)]
    pub organizations: Vec<NerEntity>,
    #[serde(default, with = "father_ref")]
    pub father: Option<String>,
    #[serde(default)]
    pub childrens: Vec<String>,
    #[serde(default)]
    pub related_events: Vec<RelatedEvent>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl EventRecord {
    /// An empty record for a freshly minted event id.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            event_id: id.to_string(),
            created: String::new(),
            updated: String::new(),
            closed: ClosedMark::default(),
            closed_at: None,
            count: 0,
            label: String::new(),
            keynews: None,
            articles: Vec::new(),
            keywords: Vec::new(),
            when: Vec::new(),
            where_: Vec::new(),
            who: Vec::new(),
            persons: Vec::new(),
            locations: Vec::new(),
            organizations: Vec::new(),
            father: None,
            childrens: Vec::new(),
            related_events: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }

    /// Closed under either shape: the union marker or a non-null closedAt.
    pub fn is_closed(&self) -> bool {
        self.closed_at.is_some() || self.closed.is_closed()
    }
}

impl PartialEq for EventRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
