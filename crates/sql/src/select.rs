//! The fluent SELECT composition engine.

use crate::bind::BindSet;
use crate::clause::{
    split_list, ClausePart, ClauseSet, Connective, Join, JoinKind, JoinTarget,
};
use crate::dialect::Dialect;
use crate::error::Error;
use crate::exec::{Executor, FetchMode, Fetched, PageCount};
use crate::paging::Paging;
use crate::string::CompiledQuery;
use crate::value::Value;

/// Accumulates the parts of a SELECT statement and runs it via collaborators.
///
/// ```
/// use model_engine_sql::{AnsiDialect, Connective, Select};
///
/// let mut select = Select::new();
/// select
///     .cols("id,name")
///     .from("users")
///     .where_("age > :min", Connective::And)
///     .bind("min", 21)
///     .set_paging(10)
///     .limit_page(2);
///
/// let query = select.compile(&AnsiDialect).unwrap();
/// assert_eq!(
///     query.sql,
///     "SELECT id,name FROM users WHERE age > :min LIMIT 10 OFFSET 10"
/// );
/// ```
///
/// There is no built/unbuilt state machine: each `exec` reflects the clause
/// state at that moment. A builder owns its clause and bind storage
/// exclusively; cloning yields a fully independent deep copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Select {
    parts: ClauseSet,
    binds: BindSet,
    paging: Paging,
    fetch: FetchMode,
}

impl Select {
    pub fn new() -> Self {
        Select::default()
    }

    /// Read access to the accumulated clause parts.
    pub fn parts(&self) -> &ClauseSet {
        &self.parts
    }

    /// Read access to the bound values.
    pub fn binds(&self) -> &BindSet {
        &self.binds
    }

    pub fn paging(&self) -> Paging {
        self.paging
    }

    pub fn fetch_mode(&self) -> FetchMode {
        self.fetch
    }

    /// Select DISTINCT rows or not.
    pub fn distinct(&mut self, flag: bool) -> &mut Self {
        self.parts.distinct = flag;
        self
    }

    /// Append column expressions from a comma-delimited spec.
    pub fn cols(&mut self, spec: &str) -> &mut Self {
        self.parts.cols.extend(split_list(spec));
        self
    }

    /// Append one pre-formed column expression without comma splitting.
    pub fn col(&mut self, expr: impl Into<String>) -> &mut Self {
        self.parts.cols.push(expr.into());
        self
    }

    /// Append table expressions from a comma-delimited spec.
    pub fn from(&mut self, spec: &str) -> &mut Self {
        self.parts.from.extend(split_list(spec));
        self
    }

    /// Append a join against a table, optionally tagged with a kind.
    pub fn join(&mut self, table: &str, cond: &str, kind: Option<JoinKind>) -> &mut Self {
        self.parts.join.push(Join {
            kind,
            target: JoinTarget::Table(table.to_string()),
            cond: cond.to_string(),
        });
        self
    }

    /// Append a join against a derived subselect under the given alias.
    ///
    /// The inner builder's bound values are merged into this one so its
    /// placeholders resolve when the whole statement is compiled.
    pub fn join_derived(
        &mut self,
        inner: Select,
        alias: &str,
        cond: &str,
        kind: Option<JoinKind>,
    ) -> &mut Self {
        self.binds.merge(&inner.binds);
        self.parts.join.push(Join {
            kind,
            target: JoinTarget::Derived {
                clauses: Box::new(inner.parts),
                alias: alias.to_string(),
            },
            cond: cond.to_string(),
        });
        self
    }

    /// Append a WHERE predicate.
    ///
    /// The connective is dropped for the first predicate and prepended,
    /// upper-cased, for every one after it.
    pub fn where_(&mut self, cond: &str, op: Connective) -> &mut Self {
        if self.parts.where_.is_empty() {
            self.parts.where_.push(cond.to_string());
        } else {
            self.parts.where_.push(format!("{} {}", op.as_str(), cond));
        }
        self
    }

    /// Append grouping expressions from a comma-delimited spec.
    pub fn group(&mut self, spec: &str) -> &mut Self {
        self.parts.group.extend(split_list(spec));
        self
    }

    /// Append a HAVING predicate; connectives behave as in [`Select::where_`].
    pub fn having(&mut self, cond: &str, op: Connective) -> &mut Self {
        if self.parts.having.is_empty() {
            self.parts.having.push(cond.to_string());
        } else {
            self.parts.having.push(format!("{} {}", op.as_str(), cond));
        }
        self
    }

    /// Append order expressions; entries without an explicit ` ASC`/` DESC`
    /// suffix get ` ASC`.
    pub fn order(&mut self, spec: &str) -> &mut Self {
        for entry in split_list(spec) {
            let upper = entry.to_ascii_uppercase();
            if upper.ends_with(" ASC") || upper.ends_with(" DESC") {
                self.parts.order.push(entry);
            } else {
                self.parts.order.push(format!("{entry} ASC"));
            }
        }
        self
    }

    /// Set the limit count and offset directly.
    pub fn limit(&mut self, count: u64, offset: u64) -> &mut Self {
        self.parts.limit.count = count;
        self.parts.limit.offset = offset;
        self
    }

    /// Set the page size, clamped to a floor of 1.
    pub fn set_paging(&mut self, size: u32) -> &mut Self {
        self.paging.set(size);
        self
    }

    /// Set the limit from a 1-based page number; page 0 clears the limit.
    pub fn limit_page(&mut self, page: u32) -> &mut Self {
        self.parts.limit = self.paging.limit_page(page);
        self
    }

    /// Bind one value; rebinding a key overwrites it.
    pub fn bind(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.binds.bind(key, value);
        self
    }

    /// Merge a whole bind set in, last write winning.
    pub fn bind_all(&mut self, other: &BindSet) -> &mut Self {
        self.binds.merge(other);
        self
    }

    /// Remove the given bound keys.
    pub fn unbind(&mut self, keys: &[&str]) -> &mut Self {
        self.binds.unbind(keys);
        self
    }

    /// Remove every bound value.
    pub fn unbind_all(&mut self) -> &mut Self {
        self.binds.clear();
        self
    }

    /// Reset one clause list, or all of them plus the limit.
    pub fn clear(&mut self, part: Option<ClausePart>) -> &mut Self {
        self.parts.clear(part);
        self
    }

    /// Set the fetch mode used by [`Select::exec`].
    pub fn fetch(&mut self, mode: FetchMode) -> &mut Self {
        self.fetch = mode;
        self
    }

    /// Render via the dialect and resolve placeholders against the binds.
    pub fn compile(&self, dialect: &dyn Dialect) -> Result<CompiledQuery, Error> {
        let sql = dialect.render(&self.parts);
        tracing::debug!(sql = %sql, "rendered select");
        CompiledQuery::new(sql, &self.binds)
    }

    /// Compile and run the statement, returning a result typed per the
    /// configured fetch mode. A page number recomputes the limit first.
    pub fn exec(
        &mut self,
        dialect: &dyn Dialect,
        executor: &mut dyn Executor,
        page: Option<u32>,
    ) -> Result<Fetched, Error> {
        if let Some(page) = page {
            self.limit_page(page);
        }
        let query = self.compile(dialect)?;
        executor.run(&query, self.fetch)
    }

    /// Count the rows the current query matches and how many pages they
    /// occupy at the current page size.
    ///
    /// Runs on an independent deep copy with the select list replaced by a
    /// single `COUNT(expr)` column and the limit cleared; the original
    /// builder's state is untouched. A scalar that is not a non-negative
    /// integer is a fetch-shape error, never a zero count.
    pub fn count_pages(
        &self,
        dialect: &dyn Dialect,
        executor: &mut dyn Executor,
        expr: Option<&str>,
    ) -> Result<PageCount, Error> {
        let mut probe = self.clone();
        probe.clear(Some(ClausePart::Cols));
        probe.col(format!("COUNT({})", expr.unwrap_or("*")));
        probe.clear(Some(ClausePart::Limit));
        probe.fetch(FetchMode::Value);

        let count = match probe.exec(dialect, executor, None)? {
            Fetched::Value(Some(value)) => match value.as_i64() {
                Some(n) if n >= 0 => u64::try_from(n).unwrap_or(0),
                _ => {
                    return Err(Error::FetchShape {
                        mode: FetchMode::Value,
                    })
                }
            },
            Fetched::Value(None) => 0,
            _ => {
                return Err(Error::FetchShape {
                    mode: FetchMode::Value,
                })
            }
        };

        let pages = if count > 0 {
            self.paging.pages_for(count)
        } else {
            0
        };
        Ok(PageCount { count, pages })
    }
}
