//! SQLite-backed change ledger.

use std::path::Path;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{FromRow, SqliteConnection};

use crate::error::{Error, Result};
use crate::resource::ResourceKind;

/// Decision for one resource against its ledger record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// No record existed; one was created.
    Unseen,
    /// The record's marker differed; it was updated.
    Stale,
    /// The record's marker matched; nothing changed.
    Fresh,
}

/// One ledger row.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct LedgerRecord {
    pub key: String,
    pub url: String,
    pub marker: String,
    pub kind: String,
    /// Unix timestamp of the last insert or marker change.
    pub updated_at: i64,
}

/// Persistent map from resource key to last-seen change marker.
///
/// Uses a single connection, so each classification runs alone and the
/// check-and-write for a key cannot interleave with another.
#[derive(Clone)]
pub struct Ledger {
    pool: SqlitePool,
}

impl Ledger {
    /// Open the ledger at `path`, creating the file and schema when absent.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    Error::Ledger(format!("Failed to create ledger directory: {}", e))
                })?;
            }
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))
            .map_err(|e| Error::Ledger(format!("Failed to parse ledger path: {}", e)))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| Error::Ledger(format!("Failed to open ledger: {}", e)))?;

        let ledger = Self { pool };
        ledger.run_migrations().await?;

        tracing::debug!("Opened ledger at {}", path.display());
        Ok(ledger)
    }

    async fn run_migrations(&self) -> Result<()> {
        let mut conn = self.pool.acquire().await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY,
                applied_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&mut *conn)
        .await?;

        let current_version: Option<i64> =
            sqlx::query_scalar("SELECT MAX(version) FROM schema_version")
                .fetch_one(&mut *conn)
                .await?;

        if current_version.unwrap_or(0) < 1 {
            Self::migrate_v1(&mut conn).await?;
        }

        Ok(())
    }

    /// Migration v1: ledger table.
    async fn migrate_v1(conn: &mut SqliteConnection) -> Result<()> {
        tracing::info!("Applying ledger migration v1");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS ledger (
                key TEXT PRIMARY KEY NOT NULL,
                url TEXT NOT NULL,
                marker TEXT NOT NULL,
                kind TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&mut *conn)
        .await?;

        sqlx::query("INSERT INTO schema_version (version, applied_at) VALUES (1, ?)")
            .bind(chrono::Utc::now().timestamp())
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    /// Classify a resource and persist the decision.
    ///
    /// `Unseen` inserts a record, `Stale` replaces the marker and URL,
    /// `Fresh` leaves the record untouched.
    pub async fn classify(
        &self,
        key: &str,
        url: &str,
        marker: &str,
        kind: ResourceKind,
    ) -> Result<Classification> {
        let now = chrono::Utc::now().timestamp();
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO ledger (key, url, marker, kind, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(key) DO NOTHING
            "#,
        )
        .bind(key)
        .bind(url)
        .bind(marker)
        .bind(kind.to_string())
        .bind(now)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let classification = if inserted == 1 {
            Classification::Unseen
        } else {
            let updated = sqlx::query(
                r#"
                UPDATE ledger
                SET marker = ?, url = ?, updated_at = ?
                WHERE key = ? AND marker != ?
                "#,
            )
            .bind(marker)
            .bind(url)
            .bind(now)
            .bind(key)
            .bind(marker)
            .execute(&mut *tx)
            .await?
            .rows_affected();

            if updated == 1 {
                Classification::Stale
            } else {
                Classification::Fresh
            }
        };

        tx.commit().await?;

        tracing::trace!("{} -> {:?}", key, classification);
        Ok(classification)
    }

    /// Look up the record for a key.
    pub async fn lookup(&self, key: &str) -> Result<Option<LedgerRecord>> {
        let record = sqlx::query_as::<_, LedgerRecord>(
            "SELECT key, url, marker, kind, updated_at FROM ledger WHERE key = ?",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Number of records.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ledger")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Close the underlying pool, flushing pending writes.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
