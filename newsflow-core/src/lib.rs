//! # newsflow-core
//!
//! Foundation crate for the newsflow clustering engine.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod time;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::NewsflowConfig;
pub use errors::{NewsflowError, NewsflowResult};
pub use models::{Article, EventRecord};
pub use traits::{IArticleStore, IEventIdSource, IEventStore, IWordEmbeddings};
