//! SQLite-backed aggregate store.
//!
//! One generic repository serves every aggregate type; a [`SqliteSchema`]
//! impl per aggregate supplies its tables and column mapping.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use futures::TryStreamExt;
use shop_types::domain::aggregate::Aggregate;
use shop_types::ports::repository::{AggregateRepository, RepoError};
use sqlx::error::ErrorKind;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool, ValueRef};
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::clock::{self, SharedClock};
use crate::reconstruct::Reconstructor;

mod customers;
mod orders;
pub mod schema;

pub use schema::{ChildOf, SqliteQuery, SqliteSchema, Statements};

#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub busy_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
            busy_timeout: Duration::from_secs(5),
        }
    }
}

/// Opens a pool on `database_url`, creating the database file if needed.
pub async fn connect(database_url: &str, settings: &PoolSettings) -> anyhow::Result<SqlitePool> {
    // Ensure on-disk SQLite target directory exists (no-op for in-memory).
    if let Some(path) = database_url.strip_prefix("sqlite://") {
        if path != ":memory:" {
            let p = std::path::Path::new(path);
            if let Some(parent) = p.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }
    }

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(settings.busy_timeout);

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect_with(options)
        .await?;
    Ok(pool)
}

pub struct SqliteRepo<D: SqliteSchema> {
    pool: SqlitePool,
    sql: Arc<Statements>,
    clock: SharedClock,
    _schema: PhantomData<fn() -> D>,
}

impl<D: SqliteSchema> Clone for SqliteRepo<D> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            sql: self.sql.clone(),
            clock: self.clock.clone(),
            _schema: PhantomData,
        }
    }
}

impl<D: SqliteSchema> SqliteRepo<D> {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        Self::with_settings(database_url, &PoolSettings::default()).await
    }

    pub async fn with_settings(database_url: &str, settings: &PoolSettings) -> anyhow::Result<Self> {
        let pool = connect(database_url, settings).await?;
        Self::from_pool(pool).await
    }

    /// Wraps an existing pool and creates the aggregate's tables.
    pub async fn from_pool(pool: SqlitePool) -> anyhow::Result<Self> {
        for ddl in D::MIGRATIONS {
            sqlx::query(ddl).execute(&pool).await?;
        }
        Ok(Self {
            pool,
            sql: Arc::new(Statements::for_schema::<D>()),
            clock: clock::system_clock(),
            _schema: PhantomData,
        })
    }

    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn fold_rows(&self, query: SqliteQuery<'_>) -> Result<Reconstructor<D::Root>, RepoError> {
        let mut rows = query.fetch(&self.pool);
        let mut acc = Reconstructor::new();
        while let Some(row) = rows.try_next().await.map_err(db_err)? {
            let (root, child) = decode_row::<D>(&row)?;
            acc.push(root, child);
        }
        Ok(acc)
    }
}

#[async_trait]
impl<D: SqliteSchema> AggregateRepository<D> for SqliteRepo<D> {
    #[tracing::instrument(skip_all, fields(kind = <D::Root as Aggregate>::KIND))]
    async fn save(&self, draft: D) -> Result<D::Root, RepoError> {
        let id = Uuid::new_v4();
        let at = clock::stamp(self.clock.as_ref());
        let (mut root, children) = draft.into_parts(id, at);

        // Rolled back on drop unless committed below.
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        D::bind_root(sqlx::query(&self.sql.insert_root).bind(id.to_string()), &root)
            .bind(encode_ts(at))
            .bind(encode_ts(at))
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        for child in children {
            let done = D::bind_child(sqlx::query(&self.sql.insert_child).bind(id.to_string()), &child)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
            root.children_mut()
                .push(D::attach_child(child, id, done.last_insert_rowid()));
        }

        tx.commit().await.map_err(db_err)?;
        tracing::debug!(%id, children = root.children().len(), "aggregate saved");
        Ok(root)
    }

    #[tracing::instrument(skip(self), fields(kind = <D::Root as Aggregate>::KIND))]
    async fn find_by_id(&self, id: Uuid) -> Result<D::Root, RepoError> {
        let query = sqlx::query(&self.sql.select_one).bind(id.to_string());
        self.fold_rows(query)
            .await?
            .finish_one()
            .ok_or(RepoError::NotFound {
                kind: <D::Root as Aggregate>::KIND,
                id,
            })
    }

    #[tracing::instrument(skip(self), fields(kind = <D::Root as Aggregate>::KIND))]
    async fn list_all(&self) -> Result<Vec<D::Root>, RepoError> {
        let roots = self
            .fold_rows(sqlx::query(&self.sql.select_all))
            .await?
            .finish();
        tracing::debug!(count = roots.len(), "aggregates listed");
        Ok(roots)
    }
}

/// Splits one joined row into its root and optional child.
pub(crate) fn decode_row<D: SqliteSchema>(
    row: &SqliteRow,
) -> Result<(D::Root, Option<ChildOf<D>>), RepoError> {
    check_segment::<D>(row, "r", D::ROOT_COLUMNS, false)?;
    let id: String = row.try_get("r_id").map_err(db_err)?;
    let id = Uuid::parse_str(&id).map_err(|e| RepoError::Decode(e.to_string()))?;
    let created_at = decode_ts(row, "r_created_at")?;
    let updated_at = decode_ts(row, "r_updated_at")?;
    let root = D::decode_root(row, id, created_at, updated_at).map_err(db_err)?;

    let child = match row.try_get::<Option<i64>, _>("c_id").map_err(db_err)? {
        Some(child_id) => {
            check_segment::<D>(row, "c", D::CHILD_COLUMNS, false)?;
            Some(D::decode_child(row, child_id, id).map_err(db_err)?)
        }
        None => {
            check_segment::<D>(row, "c", D::CHILD_COLUMNS, true)?;
            None
        }
    };
    Ok((root, child))
}

// SQLite decodes NULL into "" or 0 for non-optional types, so the null
// pattern of a segment is checked on the raw values: all NULL or none.
fn check_segment<D: SqliteSchema>(
    row: &SqliteRow,
    prefix: &str,
    columns: &[&str],
    expect_null: bool,
) -> Result<(), RepoError> {
    for column in columns {
        let alias = format!("{prefix}_{column}");
        let raw = row.try_get_raw(alias.as_str()).map_err(db_err)?;
        if raw.is_null() != expect_null {
            let state = if expect_null { "not NULL" } else { "NULL" };
            return Err(RepoError::Decode(format!(
                "{} row: {alias} is {state}",
                <D::Root as Aggregate>::KIND
            )));
        }
    }
    Ok(())
}

fn encode_ts(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_ts(row: &SqliteRow, column: &str) -> Result<DateTime<Utc>, RepoError> {
    let raw: String = row.try_get(column).map_err(db_err)?;
    Ok(DateTime::parse_from_rfc3339(&raw)
        .map_err(|e| RepoError::Decode(format!("{column}: {e}")))?
        .with_timezone(&Utc))
}

pub(crate) fn db_err(e: sqlx::Error) -> RepoError {
    match e {
        sqlx::Error::Database(db) => match db.kind() {
            ErrorKind::UniqueViolation
            | ErrorKind::ForeignKeyViolation
            | ErrorKind::NotNullViolation
            | ErrorKind::CheckViolation => RepoError::Constraint(Box::new(sqlx::Error::Database(db))),
            _ => RepoError::Database(Box::new(sqlx::Error::Database(db))),
        },
        e @ (sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::Decode(_)) => RepoError::Decode(e.to_string()),
        other => RepoError::Database(Box::new(other)),
    }
}
