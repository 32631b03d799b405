//! Word-embedding table: token → fixed-dimension vector.
//!
//! Loads the word2vec text format: an optional `count dim` header line,
//! then one `token v1 … vD` line per token. A missing or malformed table
//! is fatal at construction.

use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use newsflow_core::errors::{EmbeddingError, NewsflowResult};
use newsflow_core::traits::IWordEmbeddings;

/// In-memory token → vector table.
pub struct WordTable {
    vectors: HashMap<String, Vec<f32>>,
    dim: usize,
}

impl WordTable {
    /// Load a table from disk, enforcing the configured dimensionality.
    pub fn load(path: &Path, dim: usize) -> NewsflowResult<Self> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|e| EmbeddingError::TableUnreadable {
            path: display.clone(),
            reason: e.to_string(),
        })?;

        let mut vectors = HashMap::new();
        for (idx, line) in raw.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut parts = line.split_whitespace();
            let token = match parts.next() {
                Some(t) => t,
                None => continue,
            };
            let components: Vec<&str> = parts.collect();

            // word2vec text files open with a `count dim` header line.
            if idx == 0
                && components.len() == 1
                && token.parse::<usize>().is_ok()
                && components[0].parse::<usize>().is_ok()
            {
                continue;
            }

            if components.len() != dim {
                return Err(EmbeddingError::DimensionMismatch {
                    path: display,
                    line: idx + 1,
                    expected: dim,
                    got: components.len(),
                }
                .into());
            }

            let mut vector = Vec::with_capacity(dim);
            for component in components {
                let value: f32 =
                    component
                        .parse()
                        .map_err(|_| EmbeddingError::BadComponent {
                            path: display.clone(),
                            line: idx + 1,
                            value: component.to_string(),
                        })?;
                vector.push(value);
            }
            vectors.insert(token.to_string(), vector);
        }

        if vectors.is_empty() {
            return Err(EmbeddingError::EmptyTable { path: display }.into());
        }

        info!(tokens = vectors.len(), dim, "word table loaded");
        Ok(Self { vectors, dim })
    }

    /// Build a table directly from token/vector pairs (tests, tooling).
    pub fn from_pairs<I>(pairs: I, dim: usize) -> Self
    where
        I: IntoIterator<Item = (String, Vec<f32>)>,
    {
        let vectors: HashMap<String, Vec<f32>> = pairs
            .into_iter()
            .filter(|(_, v)| v.len() == dim)
            .collect();
        Self { vectors, dim }
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

impl IWordEmbeddings for WordTable {
    fn vector(&self, token: &str) -> Option<&[f32]> {
        self.vectors.get(token).map(|v| v.as_slice())
    }

    fn dimensions(&self) -> usize {
        self.dim
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_table(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_plain_table() {
        let file = write_table("cat 1.0 0.0\ndog 0.0 1.0\n");
        let table = WordTable::load(file.path(), 2).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.vector("cat"), Some([1.0f32, 0.0].as_slice()));
        assert_eq!(table.vector("fish"), None);
    }

    #[test]
    fn skips_word2vec_header() {
        let file = write_table("2 2\ncat 1.0 0.0\ndog 0.0 1.0\n");
        let table = WordTable::load(file.path(), 2).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn rejects_dimension_mismatch() {
        let file = write_table("cat 1.0 0.0 0.5\n");
        assert!(WordTable::load(file.path(), 2).is_err());
    }

    #[test]
    fn rejects_unparseable_component() {
        let file = write_table("cat 1.0 abc\n");
        assert!(WordTable::load(file.path(), 2).is_err());
    }

    #[test]
    fn rejects_missing_file() {
        assert!(WordTable::load(Path::new("/nonexistent/words.txt"), 2).is_err());
    }

    #[test]
    fn rejects_empty_table() {
        let file = write_table("\n\n");
        assert!(WordTable::load(file.path(), 2).is_err());
    }
}
