//! libSQL backend — async `Store` trait implementation.
//!
//! Supports local file and in-memory databases. `libsql::Connection` is
//! `Send + Sync` and safe for concurrent async use, so a single connection
//! is reused for all operations.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{debug, info};

use crate::error::DatabaseError;
use crate::routines::Routine;
use crate::store::migrations;
use crate::store::traits::Store;

/// libSQL database backend.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Connection(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Connection(format!("Failed to open libSQL database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Connection(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        migrations::run_migrations(backend.conn()).await?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Connection(format!("Failed to create in-memory database: {e}"))
            })?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Connection(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        migrations::run_migrations(backend.conn()).await?;
        Ok(backend)
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }
}

// ── Helper functions ────────────────────────────────────────────────

const ROUTINE_COLUMNS: &str = "id, title, created_at, last_done_date, streak, best_streak";

/// Parse an RFC 3339 datetime string written by this backend.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::CorruptRow(format!("Bad datetime {s:?}: {e}")))
}

/// Parse an optional `YYYY-MM-DD` date column.
fn parse_optional_date(s: Option<String>) -> Result<Option<NaiveDate>, DatabaseError> {
    match s {
        Some(s) => s
            .parse::<NaiveDate>()
            .map(Some)
            .map_err(|e| DatabaseError::CorruptRow(format!("Bad date {s:?}: {e}"))),
        None => Ok(None),
    }
}

/// Convert `Option<NaiveDate>` to a libsql Value.
fn opt_date(d: Option<NaiveDate>) -> libsql::Value {
    match d {
        Some(d) => libsql::Value::Text(d.format("%Y-%m-%d").to_string()),
        None => libsql::Value::Null,
    }
}

/// Map a libsql row to a Routine. Column order matches ROUTINE_COLUMNS.
fn row_to_routine(row: &libsql::Row) -> Result<Routine, DatabaseError> {
    let created_str: String = row
        .get(2)
        .map_err(|e| DatabaseError::CorruptRow(format!("created_at: {e}")))?;
    let last_done_str: Option<String> = row.get(3).ok();

    Ok(Routine {
        id: row
            .get(0)
            .map_err(|e| DatabaseError::CorruptRow(format!("id: {e}")))?,
        title: row
            .get(1)
            .map_err(|e| DatabaseError::CorruptRow(format!("title: {e}")))?,
        created_at: parse_datetime(&created_str)?,
        last_done_date: parse_optional_date(last_done_str)?,
        streak: row.get::<i64>(4).unwrap_or(0).max(0) as u32,
        best_streak: row.get::<i64>(5).unwrap_or(0).max(0) as u32,
    })
}

// ── Trait implementation ────────────────────────────────────────────

#[async_trait]
impl Store for LibSqlBackend {
    async fn create_routine(&self, title: &str) -> Result<Routine, DatabaseError> {
        let conn = self.conn();
        let now = Utc::now();
        conn.execute(
            "INSERT INTO routines (title, created_at, streak, best_streak) VALUES (?1, ?2, 0, 0)",
            params![title, now.to_rfc3339()],
        )
        .await
        .map_err(|e| DatabaseError::Query(format!("create_routine: {e}")))?;

        let id = conn.last_insert_rowid();
        debug!(id, title, "Routine created");

        Ok(Routine {
            id,
            title: title.to_string(),
            created_at: now,
            last_done_date: None,
            streak: 0,
            best_streak: 0,
        })
    }

    async fn get_routine(&self, id: i64) -> Result<Option<Routine>, DatabaseError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                &format!("SELECT {ROUTINE_COLUMNS} FROM routines WHERE id = ?1"),
                params![id],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_routine: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_routine(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_routine: {e}"))),
        }
    }

    async fn list_routines(&self) -> Result<Vec<Routine>, DatabaseError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                &format!("SELECT {ROUTINE_COLUMNS} FROM routines ORDER BY id ASC"),
                (),
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("list_routines: {e}")))?;

        let mut routines = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            match row_to_routine(&row) {
                Ok(r) => routines.push(r),
                Err(e) => tracing::warn!("Skipping routine row: {e}"),
            }
        }
        Ok(routines)
    }

    async fn update_routine(&self, routine: &Routine) -> Result<(), DatabaseError> {
        let conn = self.conn();
        conn.execute(
            "UPDATE routines SET title = ?1, last_done_date = ?2, streak = ?3, best_streak = ?4 WHERE id = ?5",
            params![
                routine.title.clone(),
                opt_date(routine.last_done_date),
                routine.streak as i64,
                routine.best_streak as i64,
                routine.id,
            ],
        )
        .await
        .map_err(|e| DatabaseError::Query(format!("update_routine: {e}")))?;

        debug!(id = routine.id, "Routine updated");
        Ok(())
    }
}
