use std::sync::Arc;

use crate::errors::NewsflowResult;
use crate::models::{Article, EventRecord};

/// Read-only article source for a run.
pub trait IArticleStore: Send + Sync {
    /// Articles with crawl time inside `(start_time, end_time)`,
    /// canonical string inputs, returned in crawl-time order.
    fn query_many_by_time(
        &self,
        start_time: &str,
        end_time: &str,
    ) -> NewsflowResult<Vec<Article>>;

    /// Single article lookup, used while re-materialising history.
    fn query_one_by_id(&self, id: &str) -> NewsflowResult<Option<Article>>;
}

/// Event persistence.
pub trait IEventStore: Send + Sync {
    /// Open events updated within the history window ending at `t`.
    /// Events staler than the window are flipped to closed before the
    /// query returns.
    fn query_recent_events_by_time(&self, t: &str) -> NewsflowResult<Vec<EventRecord>>;

    /// Single event lookup by id.
    fn query_one_by_id(&self, id: &str) -> NewsflowResult<Option<EventRecord>>;

    /// Full upsert keyed on the event id.
    fn save_item(&self, event: &EventRecord) -> NewsflowResult<()>;
}

impl<T: IArticleStore + ?Sized> IArticleStore for Arc<T> {
    fn query_many_by_time(
        &self,
        start_time: &str,
        end_time: &str,
    ) -> NewsflowResult<Vec<Article>> {
        self.as_ref().query_many_by_time(start_time, end_time)
    }

    fn query_one_by_id(&self, id: &str) -> NewsflowResult<Option<Article>> {
        self.as_ref().query_one_by_id(id)
    }
}

impl<T: IEventStore + ?Sized> IEventStore for Arc<T> {
    fn query_recent_events_by_time(&self, t: &str) -> NewsflowResult<Vec<EventRecord>> {
        self.as_ref().query_recent_events_by_time(t)
    }

    fn query_one_by_id(&self, id: &str) -> NewsflowResult<Option<EventRecord>> {
        self.as_ref().query_one_by_id(id)
    }

    fn save_item(&self, event: &EventRecord) -> NewsflowResult<()> {
        self.as_ref().save_item(event)
    }
}
