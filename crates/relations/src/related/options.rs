//! Declarative relationship options.

use serde::{Deserialize, Serialize};

use model_engine_sql::FetchMode;

/// The association kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelatedKind {
    BelongsTo,
    HasOne,
    HasMany,
    HasManyThrough,
}

impl RelatedKind {
    /// Whether the relationship yields many foreign rows per native record.
    pub fn is_many(self) -> bool {
        matches!(self, RelatedKind::HasMany | RelatedKind::HasManyThrough)
    }
}

/// Every recognized relationship option, with defaults applied at load
/// time per the association kind.
///
/// A concrete struct rather than an untyped option map: unknown keys are
/// a type error, not a silent no-op.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelatedOptions {
    /// Explicit foreign model class. Default: resolve the relationship
    /// name through the class resolver.
    pub class: Option<String>,
    /// Columns to fetch, comma-delimited. Default: the foreign model's
    /// declared fetch columns.
    pub cols: Option<String>,
    /// The native column matched against the foreign column.
    pub native_col: Option<String>,
    /// The foreign column matched against the native column.
    pub foreign_col: Option<String>,
    /// Virtual shorthand: fills `native_col` (belongs-to) or `foreign_col`
    /// (has-one/has-many) when neither is set explicitly.
    pub foreign_key: Option<String>,
    /// For has-many-through: the join-table column holding the foreign
    /// key. An explicit value wins over the `foreign_key` shorthand.
    pub through_foreign_col: Option<String>,
    /// Fetch DISTINCT related rows.
    pub distinct: bool,
    /// Extra WHERE predicates, ANDed onto every related fetch.
    #[serde(rename = "where")]
    pub where_: Vec<String>,
    /// Extra GROUP expressions.
    pub group: Vec<String>,
    /// Extra HAVING predicates.
    pub having: Vec<String>,
    /// Extra ORDER expressions. Default: the foreign primary key.
    pub order: Vec<String>,
    /// Rows per page. Default: the foreign model's page size.
    pub paging: Option<u32>,
    /// Fetch mode for related rows. Default: one row for belongs-to and
    /// has-one, all rows otherwise.
    pub fetch: Option<FetchMode>,
}
