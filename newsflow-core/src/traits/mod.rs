//! Seam traits between the clustering core and its collaborators.

mod embedding;
mod id_source;
mod storage;

pub use embedding::IWordEmbeddings;
pub use id_source::{IEventIdSource, SystemIdSource};
pub use storage::{IArticleStore, IEventStore};
