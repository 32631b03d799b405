//! SQLite article store. Read-only from the clustering core's point of
//! view; `insert_item` exists for ingest tooling and tests.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection};

use newsflow_core::errors::{NewsflowResult, StorageError};
use newsflow_core::models::Article;
use newsflow_core::time::compact_time;
use newsflow_core::traits::IArticleStore;

use crate::migrations;
use crate::to_storage_err;

pub struct SqliteArticleStore {
    conn: Mutex<Connection>,
}

impl SqliteArticleStore {
    pub fn open(path: &Path) -> NewsflowResult<Self> {
        let conn = Connection::open(path).map_err(|e| StorageError::Unavailable {
            reason: e.to_string(),
        })?;
        migrations::run_article_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> NewsflowResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| StorageError::Unavailable {
            reason: e.to_string(),
        })?;
        migrations::run_article_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<F, T>(&self, f: F) -> NewsflowResult<T>
    where
        F: FnOnce(&Connection) -> NewsflowResult<T>,
    {
        let conn = self.conn.lock().map_err(|_| StorageError::Unavailable {
            reason: "article store mutex poisoned".to_string(),
        })?;
        f(&conn)
    }

    /// Upsert one article, keyed on `_id`.
    pub fn insert_item(&self, article: &Article) -> NewsflowResult<()> {
        self.with_conn(|conn| {
            let doc = serde_json::to_string(article).map_err(|e| {
                StorageError::MalformedDocument {
                    id: article.id.clone(),
                    reason: e.to_string(),
                }
            })?;
            conn.execute(
                "INSERT INTO articles (id, crawl_time, doc) VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET
                    crawl_time = excluded.crawl_time,
                    doc = excluded.doc",
                params![article.id, compact_time(&article.crawl_time), doc],
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
            Ok(())
        })
    }
}

fn parse_article(id: &str, doc: &str) -> NewsflowResult<Article> {
    serde_json::from_str(doc).map_err(|e| {
        StorageError::MalformedDocument {
            id: id.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

impl IArticleStore for SqliteArticleStore {
    fn query_many_by_time(
        &self,
        start_time: &str,
        end_time: &str,
    ) -> NewsflowResult<Vec<Article>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, doc FROM articles
                     WHERE crawl_time > ?1 AND crawl_time < ?2
                     ORDER BY crawl_time, id",
                )
                .map_err(|e| to_storage_err(e.to_string()))?;

            let rows = stmt
                .query_map(
                    params![compact_time(start_time), compact_time(end_time)],
                    |row| {
                        let id: String = row.get(0)?;
                        let doc: String = row.get(1)?;
                        Ok((id, doc))
                    },
                )
                .map_err(|e| to_storage_err(e.to_string()))?;

            let mut articles = Vec::new();
            for row in rows {
                let (id, doc) = row.map_err(|e| to_storage_err(e.to_string()))?;
                articles.push(parse_article(&id, &doc)?);
            }
            Ok(articles)
        })
    }

    fn query_one_by_id(&self, id: &str) -> NewsflowResult<Option<Article>> {
        self.with_conn(|conn| {
            let doc: Option<String> = conn
                .query_row(
                    "SELECT doc FROM articles WHERE id = ?1",
                    params![id],
                    |row| row.get(0),
                )
                .map(Some)
                .or_else(|e| match e {
                    rusqlite::Error::QueryReturnedNoRows => Ok(None),
                    other => Err(to_storage_err(other.to_string())),
                })?;
            doc.map(|doc| parse_article(id, &doc)).transpose()
        })
    }
}
