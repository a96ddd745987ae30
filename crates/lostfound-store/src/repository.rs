// ── SQLite item repository ──
//
// Every trait call opens its own connection on the blocking pool, runs one
// statement set and drops the connection. Nothing is shared between calls,
// so concurrent reconciliation and report writes never contend on a handle.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use async_trait::async_trait;
use chrono::NaiveDate;
use lostfound_core::{Item, ItemId, ItemRepository, ItemStatus, RepoError, SearchQuery};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use tracing::debug;

use crate::error::StoreError;
use crate::schema;

const DATE_FORMAT: &str = "%Y-%m-%d";

const SELECT_COLUMNS: &str = "SELECT item_id, item_name, category, description, item_type, \
     location, contact_info, reported_by, date_reported, status FROM lost_found_items";

const ACTIVE_ORDER: &str = "ORDER BY date_reported DESC, seq ASC";

/// [`ItemRepository`] over a single SQLite database file.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    path: PathBuf,
}

impl SqliteRepository {
    /// Open (creating if needed) the database at `path` and bring its
    /// schema up to date.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let repo = Self { path };
        repo.run(schema::apply_migrations).await?;
        debug!(path = %repo.path.display(), "sqlite repository ready");
        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Change the status of a stored report. Claimed or closed reports
    /// drop out of `list_active` on the next reconciliation.
    pub async fn set_status(&self, id: &ItemId, status: ItemStatus) -> Result<bool, StoreError> {
        let id = id.clone();
        self.run(move |conn| {
            let status: &'static str = status.into();
            let changed = conn.execute(
                "UPDATE lost_found_items SET status = ?1 WHERE item_id = ?2",
                params![status, id.as_str()],
            )?;
            Ok(changed > 0)
        })
        .await
    }

    /// Run `op` against a fresh connection on the blocking pool.
    async fn run<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = schema::connect(&path)?;
            op(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Join(e.to_string()))?
    }
}

#[async_trait]
impl ItemRepository for SqliteRepository {
    async fn insert(&self, item: &Item) -> Result<ItemId, RepoError> {
        let item = item.clone();
        let id = self
            .run(move |conn| {
                let category: &'static str = item.category.into();
                let report_type: &'static str = item.report_type.into();
                let status: &'static str = item.status.into();
                conn.execute(
                    "INSERT INTO lost_found_items (item_id, item_name, category, description, \
                     item_type, location, contact_info, reported_by, date_reported, status) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                    params![
                        item.id.as_str(),
                        item.name,
                        category,
                        item.description,
                        report_type,
                        item.location,
                        item.contact,
                        item.reported_by,
                        item.reported_on.format(DATE_FORMAT).to_string(),
                        status,
                    ],
                )
                .map_err(|e| StoreError::from_insert(e, &item.id))?;
                Ok(item.id)
            })
            .await?;
        debug!(%id, "report stored");
        Ok(id)
    }

    async fn list_active(&self) -> Result<Vec<Item>, RepoError> {
        let items = self
            .run(|conn| {
                let sql = format!("{SELECT_COLUMNS} WHERE status = 'Active' {ACTIVE_ORDER}");
                query_items(conn, &sql, Vec::new())
            })
            .await?;
        Ok(items)
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Item>, RepoError> {
        let (clause, args) = search_clause(query);
        let rows = self
            .run(move |conn| {
                let sql = format!("{SELECT_COLUMNS} WHERE {clause} {ACTIVE_ORDER}");
                query_items(conn, &sql, args)
            })
            .await?;
        Ok(rows.into_iter().filter(|item| query.matches(item)).collect())
    }

    async fn get(&self, id: &ItemId) -> Result<Option<Item>, RepoError> {
        let id = id.clone();
        let item = self
            .run(move |conn| {
                let sql = format!("{SELECT_COLUMNS} WHERE item_id = ?1");
                let raw = conn
                    .query_row(&sql, params![id.as_str()], RawRow::read)
                    .optional()?;
                raw.map(RawRow::into_item).transpose()
            })
            .await?;
        Ok(item)
    }

    async fn max_sequence(&self, prefix: &str) -> Result<u64, RepoError> {
        let prefix = prefix.to_owned();
        let max = self
            .run(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT item_id FROM lost_found_items WHERE substr(item_id, 1, ?1) = ?2",
                )?;
                let len = i64::try_from(prefix.len()).unwrap_or(i64::MAX);
                let ids = stmt.query_map(params![len, prefix], |row| row.get::<_, String>(0))?;
                let mut max = 0;
                for id in ids {
                    if let Some(seq) = ItemId::from(id?).sequence(&prefix) {
                        max = max.max(seq);
                    }
                }
                Ok(max)
            })
            .await?;
        Ok(max)
    }
}

// ── Query helpers ───────────────────────────────────────────────────

/// WHERE clause and positional arguments for the enum filters of a
/// search. Free text is matched on the fetched rows with
/// [`SearchQuery::matches`], since SQLite `LIKE` only folds ASCII case.
fn search_clause(query: &SearchQuery) -> (String, Vec<Value>) {
    let mut clause = String::from("status = 'Active'");
    let mut args = Vec::new();

    if let Some(category) = query.category {
        let category: &'static str = category.into();
        args.push(Value::Text(category.to_owned()));
        clause.push_str(&format!(" AND category = ?{}", args.len()));
    }
    if let Some(report_type) = query.report_type {
        let report_type: &'static str = report_type.into();
        args.push(Value::Text(report_type.to_owned()));
        clause.push_str(&format!(" AND item_type = ?{}", args.len()));
    }
    (clause, args)
}

fn query_items(conn: &Connection, sql: &str, args: Vec<Value>) -> Result<Vec<Item>, StoreError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params_from_iter(args), RawRow::read)?;
    let mut items = Vec::new();
    for raw in rows {
        items.push(raw?.into_item()?);
    }
    Ok(items)
}

/// Row as stored, before the enum and date columns are parsed.
struct RawRow {
    id: String,
    name: String,
    category: String,
    description: String,
    report_type: String,
    location: String,
    contact: String,
    reported_by: String,
    reported_on: String,
    status: String,
}

impl RawRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            category: row.get(2)?,
            description: row.get(3)?,
            report_type: row.get(4)?,
            location: row.get(5)?,
            contact: row.get(6)?,
            reported_by: row.get(7)?,
            reported_on: row.get(8)?,
            status: row.get(9)?,
        })
    }

    fn into_item(self) -> Result<Item, StoreError> {
        let category = parse_column(&self.id, "category", &self.category)?;
        let report_type = parse_column(&self.id, "item_type", &self.report_type)?;
        let status = parse_column(&self.id, "status", &self.status)?;
        let reported_on = NaiveDate::parse_from_str(&self.reported_on, DATE_FORMAT).map_err(|_| {
            StoreError::InvalidRow {
                id: self.id.clone(),
                column: "date_reported",
                value: self.reported_on.clone(),
            }
        })?;
        Ok(Item {
            id: ItemId::from(self.id),
            name: self.name,
            description: self.description,
            category,
            report_type,
            location: self.location,
            contact: self.contact,
            reported_by: self.reported_by,
            reported_on,
            status,
        })
    }
}

fn parse_column<T: FromStr>(id: &str, column: &'static str, value: &str) -> Result<T, StoreError> {
    value.parse().map_err(|_| StoreError::InvalidRow {
        id: id.to_owned(),
        column,
        value: value.to_owned(),
    })
}
