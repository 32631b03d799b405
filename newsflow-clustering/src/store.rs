//! ClusterStore — the authoritative in-memory state for one run.
//!
//! Owns the clusters, the parent/child hierarchy, the per-event updated
//! flags, and the article cache. Every stage reads and writes through
//! this store; a run owns it exclusively, so there is no locking.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use newsflow_core::models::Article;
use newsflow_embeddings::math;

/// One cluster: member vectors row-aligned with member article ids, and
/// the running centroid. Identified by its EventId key in the store.
#[derive(Debug, Clone)]
pub struct Cluster {
    pub vectors: Vec<Vec<f32>>,
    pub article_ids: Vec<String>,
    pub centroid: Vec<f32>,
}

impl Cluster {
    /// An empty cluster with a guarded (zero) centroid. Used when a
    /// historical event loses all of its members.
    pub fn empty(dim: usize) -> Self {
        Self {
            vectors: Vec::new(),
            article_ids: Vec::new(),
            centroid: vec![0.0; dim],
        }
    }

    /// A cluster seeded by a single member; the centroid is the member.
    pub fn seeded(article_id: &str, vector: Vec<f32>) -> Self {
        Self {
            centroid: vector.clone(),
            vectors: vec![vector],
            article_ids: vec![article_id.to_string()],
        }
    }

    /// A cluster over a full member set, centroid computed immediately.
    pub fn from_members(article_ids: Vec<String>, vectors: Vec<Vec<f32>>, dim: usize) -> Self {
        let centroid = math::centroid(&vectors, dim);
        Self {
            vectors,
            article_ids,
            centroid,
        }
    }

    /// Append a member and recompute the centroid.
    pub fn push(&mut self, article_id: &str, vector: Vec<f32>) {
        self.article_ids.push(article_id.to_string());
        self.vectors.push(vector);
        self.recompute_centroid();
    }

    /// Fold another cluster's members into this one and recompute.
    pub fn absorb(&mut self, other: Cluster) {
        self.article_ids.extend(other.article_ids);
        self.vectors.extend(other.vectors);
        self.recompute_centroid();
    }

    /// Recompute the centroid as the batch mean of all members.
    pub fn recompute_centroid(&mut self) {
        let dim = self.centroid.len();
        self.centroid = math::centroid(&self.vectors, dim);
    }

    pub fn len(&self) -> usize {
        self.article_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.article_ids.is_empty()
    }
}

/// Run-scoped cluster state. Clusters and hierarchy use ordered maps so
/// every iteration (and therefore every tie-break) is deterministic by id.
pub struct ClusterStore {
    dim: usize,
    clusters: BTreeMap<String, Cluster>,
    child_to_parent: BTreeMap<String, String>,
    parent_to_children: BTreeMap<String, BTreeSet<String>>,
    updated: HashMap<String, bool>,
    articles: HashMap<String, Article>,
}

impl ClusterStore {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            clusters: BTreeMap::new(),
            child_to_parent: BTreeMap::new(),
            parent_to_children: BTreeMap::new(),
            updated: HashMap::new(),
            articles: HashMap::new(),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    // --- Clusters ---

    pub fn insert_cluster(&mut self, event_id: &str, cluster: Cluster) {
        self.clusters.insert(event_id.to_string(), cluster);
    }

    /// Overwrite an existing cluster in place (split keeps the parent id).
    pub fn replace_cluster(&mut self, event_id: &str, cluster: Cluster) {
        self.clusters.insert(event_id.to_string(), cluster);
    }

    pub fn remove_cluster(&mut self, event_id: &str) -> Option<Cluster> {
        self.clusters.remove(event_id)
    }

    pub fn cluster(&self, event_id: &str) -> Option<&Cluster> {
        self.clusters.get(event_id)
    }

    pub fn cluster_mut(&mut self, event_id: &str) -> Option<&mut Cluster> {
        self.clusters.get_mut(event_id)
    }

    /// Clusters in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Cluster)> {
        self.clusters.iter()
    }

    pub fn cluster_ids(&self) -> Vec<String> {
        self.clusters.keys().cloned().collect()
    }

    pub fn recompute_all_centroids(&mut self) {
        for cluster in self.clusters.values_mut() {
            cluster.recompute_centroid();
        }
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    // --- Hierarchy ---

    /// Register `child` under `parent` in both directions. Idempotent.
    /// The hierarchy is an acyclic forest; linking must never introduce
    /// a cycle or a self-loop.
    pub fn link(&mut self, child: &str, parent: &str) {
        assert_ne!(child, parent, "event {child} cannot parent itself");
        let mut cursor = parent.to_string();
        while let Some(grandparent) = self.child_to_parent.get(&cursor) {
            assert_ne!(
                grandparent, child,
                "linking {child} under {parent} would create a cycle"
            );
            cursor = grandparent.clone();
        }
        self.child_to_parent
            .insert(child.to_string(), parent.to_string());
        self.parent_to_children
            .entry(parent.to_string())
            .or_default()
            .insert(child.to_string());
    }

    /// Remove a child's parent link from both maps. A cluster absorbed by
    /// the merger is no longer a distinct sub-event.
    pub fn unlink_child(&mut self, child: &str) {
        if let Some(parent) = self.child_to_parent.remove(child) {
            if let Some(children) = self.parent_to_children.get_mut(&parent) {
                children.remove(child);
                if children.is_empty() {
                    self.parent_to_children.remove(&parent);
                }
            }
        }
    }

    /// Drop an absorbed parent's entire children entry.
    pub fn drop_parent_entry(&mut self, parent: &str) {
        if let Some(children) = self.parent_to_children.remove(parent) {
            for child in children {
                self.child_to_parent.remove(&child);
            }
        }
    }

    pub fn parent_of(&self, child: &str) -> Option<&String> {
        self.child_to_parent.get(child)
    }

    pub fn has_parent(&self, child: &str) -> bool {
        self.child_to_parent.contains_key(child)
    }

    pub fn is_parent(&self, parent: &str) -> bool {
        self.parent_to_children.contains_key(parent)
    }

    /// Children of `parent` in id order; empty when none.
    pub fn children_of(&self, parent: &str) -> Vec<String> {
        self.parent_to_children
            .get(parent)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Every (child, parent) link, in child-id order.
    pub fn hierarchy_links(&self) -> Vec<(String, String)> {
        self.child_to_parent
            .iter()
            .map(|(child, parent)| (child.clone(), parent.clone()))
            .collect()
    }

    /// Every parent with its children, in parent-id order.
    pub fn parent_entries(&self) -> Vec<(String, Vec<String>)> {
        self.parent_to_children
            .iter()
            .map(|(parent, children)| (parent.clone(), children.iter().cloned().collect()))
            .collect()
    }

    // --- Updated flags ---

    pub fn set_updated(&mut self, event_id: &str, updated: bool) {
        self.updated.insert(event_id.to_string(), updated);
    }

    pub fn mark_updated(&mut self, event_id: &str) {
        self.updated.insert(event_id.to_string(), true);
    }

    pub fn is_updated(&self, event_id: &str) -> bool {
        self.updated.get(event_id).copied().unwrap_or(false)
    }

    // --- Article cache ---

    pub fn cache_article(&mut self, article: Article) {
        self.articles.insert(article.id.clone(), article);
    }

    pub fn article(&self, article_id: &str) -> Option<&Article> {
        self.articles.get(article_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec2(x: f32, y: f32) -> Vec<f32> {
        vec![x, y]
    }

    #[test]
    fn push_keeps_centroid_at_member_mean() {
        let mut cluster = Cluster::seeded("a1", vec2(1.0, 0.0));
        cluster.push("a2", vec2(0.0, 1.0));
        assert_eq!(cluster.centroid, vec2(0.5, 0.5));
        assert_eq!(cluster.article_ids, vec!["a1", "a2"]);
    }

    #[test]
    fn absorb_recomputes_over_all_members() {
        let mut a = Cluster::seeded("a1", vec2(1.0, 0.0));
        let b = Cluster::seeded("a2", vec2(0.0, 1.0));
        a.absorb(b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.centroid, vec2(0.5, 0.5));
    }

    #[test]
    fn empty_cluster_has_zero_centroid() {
        let cluster = Cluster::empty(3);
        assert_eq!(cluster.centroid, vec![0.0, 0.0, 0.0]);
        assert!(cluster.is_empty());
    }

    #[test]
    fn link_is_symmetric_and_idempotent() {
        let mut store = ClusterStore::new(2);
        store.link("c", "p");
        store.link("c", "p");
        assert_eq!(store.parent_of("c"), Some(&"p".to_string()));
        assert_eq!(store.children_of("p"), vec!["c".to_string()]);
    }

    #[test]
    fn unlink_child_clears_both_maps() {
        let mut store = ClusterStore::new(2);
        store.link("c", "p");
        store.unlink_child("c");
        assert!(store.parent_of("c").is_none());
        assert!(store.children_of("p").is_empty());
        assert!(!store.is_parent("p"));
    }

    #[test]
    fn drop_parent_entry_clears_reverse_links() {
        let mut store = ClusterStore::new(2);
        store.link("c1", "p");
        store.link("c2", "p");
        store.drop_parent_entry("p");
        assert!(!store.has_parent("c1"));
        assert!(!store.has_parent("c2"));
        assert!(store.children_of("p").is_empty());
    }

    #[test]
    #[should_panic(expected = "cycle")]
    fn linking_a_cycle_panics() {
        let mut store = ClusterStore::new(2);
        store.link("b", "a");
        store.link("a", "b");
    }

    #[test]
    fn updated_defaults_to_false() {
        let mut store = ClusterStore::new(2);
        assert!(!store.is_updated("e1"));
        store.mark_updated("e1");
        assert!(store.is_updated("e1"));
    }
}
