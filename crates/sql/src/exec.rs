//! Fetch modes, typed results, and the executor collaborator.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::string::CompiledQuery;
use crate::value::Value;

/// The result shape a caller asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// A raw cursor over the result rows.
    Cursor,
    /// Every row.
    #[default]
    All,
    /// The first row, if any.
    Row,
    /// The first column of every row.
    Col,
    /// The first two columns of every row, as key/value pairs.
    Pairs,
    /// A single scalar.
    Value,
}

/// One fetched row: column name to value, in select-list order.
pub type Row = IndexMap<String, Value>;

/// A cursor pulling rows one at a time.
pub trait RowCursor {
    fn next_row(&mut self) -> Result<Option<Row>, Error>;
}

/// A typed query result, one variant per fetch mode.
pub enum Fetched {
    Cursor(Box<dyn RowCursor>),
    All(Vec<Row>),
    Row(Option<Row>),
    Col(Vec<Value>),
    Pairs(Vec<(Value, Value)>),
    Value(Option<Value>),
}

impl fmt::Debug for Fetched {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fetched::Cursor(_) => f.write_str("Cursor(..)"),
            Fetched::All(rows) => f.debug_tuple("All").field(rows).finish(),
            Fetched::Row(row) => f.debug_tuple("Row").field(row).finish(),
            Fetched::Col(col) => f.debug_tuple("Col").field(col).finish(),
            Fetched::Pairs(pairs) => f.debug_tuple("Pairs").field(pairs).finish(),
            Fetched::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

/// Runs compiled SQL and bound parameters against the underlying storage.
///
/// Implementations map their own failures through [`Error::execution`];
/// this layer never retries or swallows them.
pub trait Executor {
    fn run(&mut self, query: &CompiledQuery, mode: FetchMode) -> Result<Fetched, Error>;
}

/// Row count and page count reported by `Select::count_pages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCount {
    pub count: u64,
    pub pages: u64,
}
