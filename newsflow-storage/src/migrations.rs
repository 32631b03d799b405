//! Schema migrations, applied idempotently on every open.

use rusqlite::Connection;

use newsflow_core::errors::{NewsflowResult, StorageError};

pub fn run_article_migrations(conn: &Connection) -> NewsflowResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS articles (
            id         TEXT PRIMARY KEY,
            crawl_time TEXT NOT NULL,
            doc        TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_articles_crawl_time ON articles (crawl_time);",
    )
    .map_err(|e| {
        StorageError::MigrationFailed {
            version: 1,
            reason: e.to_string(),
        }
        .into()
    })
}

pub fn run_event_migrations(conn: &Connection) -> NewsflowResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS events (
            id      TEXT PRIMARY KEY,
            updated TEXT NOT NULL,
            closed  INTEGER NOT NULL DEFAULT 0,
            doc     TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_events_updated ON events (updated);
        CREATE INDEX IF NOT EXISTS idx_events_closed ON events (closed);",
    )
    .map_err(|e| {
        StorageError::MigrationFailed {
            version: 1,
            reason: e.to_string(),
        }
        .into()
    })
}
