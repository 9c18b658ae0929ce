use crate::model::ArticleRecord;
use rusqlite::{Connection, params};
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// SQLite-backed article store. The store is the only owner of persisted
/// records; the scrape pipeline hands it fresh record sets and never mutates
/// rows in place.
pub struct Database {
    conn: Connection,
}

fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

impl Database {
    pub fn exists(path: &Path) -> bool {
        path.exists()
    }

    pub fn drop(path: &Path) -> Result<(), StoreError> {
        fs::remove_file(path)?;
        Ok(())
    }

    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;

        // Optimize for concurrent reads while a cycle writes
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            PRAGMA foreign_keys = ON;
            ",
        )?;

        let db = Database { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS articles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                idx INTEGER NOT NULL,
                site TEXT NOT NULL,
                headline TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                image TEXT,
                author TEXT NOT NULL,
                date TEXT NOT NULL,
                scraped_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_articles_site ON articles(site);
            CREATE INDEX IF NOT EXISTS idx_articles_idx ON articles(idx);
            ",
        )?;
        Ok(())
    }

    /// Delete every record for `site`, then insert `records`, as one
    /// transaction. Readers on this store never observe the half-replaced
    /// state; other sources' rows are untouched. Returns the number of rows
    /// inserted.
    pub fn replace_for_source(
        &mut self,
        site: &str,
        records: &[ArticleRecord],
    ) -> Result<usize, StoreError> {
        let timestamp = current_timestamp();
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM articles WHERE site = ?1", params![site])?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO articles (idx, site, headline, description, image, author, date, scraped_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for record in records {
                stmt.execute(params![
                    record.index,
                    &record.site,
                    &record.headline,
                    &record.description,
                    &record.image,
                    &record.author,
                    &record.date,
                    timestamp,
                ])?;
            }
        }

        tx.commit()?;
        Ok(records.len())
    }

    /// All stored records, ascending by index.
    pub fn list_all(&self) -> Result<Vec<ArticleRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT idx, site, headline, description, image, author, date
             FROM articles ORDER BY idx ASC",
        )?;

        let records = stmt
            .query_map([], |row| {
                Ok(ArticleRecord {
                    index: row.get(0)?,
                    site: row.get(1)?,
                    headline: row.get(2)?,
                    description: row.get(3)?,
                    image: row.get(4)?,
                    author: row.get(5)?,
                    date: row.get(6)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records)
    }

    pub fn count_for_source(&self, site: &str) -> Result<i64, StoreError> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM articles WHERE site = ?1",
            params![site],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
