use chrono::{DateTime, Utc};
use shop_types::domain::aggregate::{Aggregate, AggregateDraft};
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::Sqlite;
use uuid::Uuid;

pub type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

pub type ChildOf<D> = <<D as AggregateDraft>::Root as Aggregate>::Child;

/// Table layout and column mapping of one aggregate type.
///
/// The root table is keyed by a TEXT `id` and carries `created_at` /
/// `updated_at` TEXT columns; the child table has an INTEGER PRIMARY KEY `id`
/// and a foreign key to the root. Those columns are handled generically and
/// are left out of `ROOT_COLUMNS` / `CHILD_COLUMNS`.
///
/// In the join query root columns are aliased `r_<column>` and child
/// columns `c_<column>`; the decoders read them under those names.
pub trait SqliteSchema: AggregateDraft {
    const ROOT_TABLE: &'static str;
    /// Scalar root columns in bind order.
    const ROOT_COLUMNS: &'static [&'static str];
    const CHILD_TABLE: &'static str;
    const CHILD_FOREIGN_KEY: &'static str;
    /// Scalar child columns in bind order.
    const CHILD_COLUMNS: &'static [&'static str];
    /// Idempotent DDL, one statement per entry.
    const MIGRATIONS: &'static [&'static str];

    fn bind_root<'q>(query: SqliteQuery<'q>, root: &Self::Root) -> SqliteQuery<'q>;

    fn bind_child<'q>(query: SqliteQuery<'q>, child: &Self::ChildDraft) -> SqliteQuery<'q>;

    /// Decodes the scalar root columns. The returned root has no children.
    fn decode_root(
        row: &SqliteRow,
        id: Uuid,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self::Root, sqlx::Error>;

    /// Decodes a non-null child segment.
    fn decode_child(row: &SqliteRow, id: i64, root_id: Uuid) -> Result<ChildOf<Self>, sqlx::Error>;
}

/// SQL text derived from a schema, built once per repository.
#[derive(Debug, Clone)]
pub struct Statements {
    pub insert_root: String,
    pub insert_child: String,
    pub select_all: String,
    pub select_one: String,
}

impl Statements {
    pub fn for_schema<D: SqliteSchema>() -> Self {
        let root_cols: Vec<&str> = std::iter::once("id")
            .chain(D::ROOT_COLUMNS.iter().copied())
            .chain(["created_at", "updated_at"])
            .collect();
        let child_cols: Vec<&str> = std::iter::once(D::CHILD_FOREIGN_KEY)
            .chain(D::CHILD_COLUMNS.iter().copied())
            .collect();

        let insert_root = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            D::ROOT_TABLE,
            root_cols.join(", "),
            placeholders(root_cols.len())
        );
        let insert_child = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            D::CHILD_TABLE,
            child_cols.join(", "),
            placeholders(child_cols.len())
        );

        let projection: Vec<String> = root_cols
            .iter()
            .map(|c| format!("r.{c} AS r_{c}"))
            .chain(
                std::iter::once("id")
                    .chain(D::CHILD_COLUMNS.iter().copied())
                    .map(|c| format!("c.{c} AS c_{c}")),
            )
            .collect();
        let from = format!(
            "SELECT {} FROM {} r LEFT JOIN {} c ON c.{} = r.id",
            projection.join(", "),
            D::ROOT_TABLE,
            D::CHILD_TABLE,
            D::CHILD_FOREIGN_KEY
        );

        Self {
            insert_root,
            insert_child,
            select_all: format!("{from} ORDER BY r.created_at DESC, r.id ASC, c.id ASC"),
            select_one: format!("{from} WHERE r.id = ? ORDER BY c.id ASC"),
        }
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}
