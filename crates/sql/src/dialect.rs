//! Rendering a clause set into SQL text.

use crate::clause::{ClauseSet, JoinTarget};

/// Renders clause sets into database-specific SQL text.
///
/// The composition engine supplies only numeric count/offset values; the
/// dialect owns the LIMIT syntax entirely.
pub trait Dialect {
    /// Render a full SELECT statement.
    fn render(&self, clauses: &ClauseSet) -> String;

    /// Render the limit suffix for a non-zero count.
    fn render_limit(&self, count: u64, offset: u64) -> String;
}

/// Plain ANSI-style rendering, leaving named `:placeholder` parameters
/// intact for bind resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiDialect;

impl Dialect for AnsiDialect {
    fn render(&self, clauses: &ClauseSet) -> String {
        let mut sql = String::from("SELECT ");
        if clauses.distinct {
            sql.push_str("DISTINCT ");
        }
        if clauses.cols.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&clauses.cols.join(","));
        }
        if !clauses.from.is_empty() {
            sql.push_str(" FROM ");
            sql.push_str(&clauses.from.join(", "));
        }
        for join in &clauses.join {
            sql.push(' ');
            if let Some(kind) = join.kind {
                sql.push_str(kind.as_str());
                sql.push(' ');
            }
            sql.push_str("JOIN ");
            match &join.target {
                JoinTarget::Table(table) => sql.push_str(table),
                JoinTarget::Derived { clauses, alias } => {
                    sql.push('(');
                    sql.push_str(&self.render(clauses));
                    sql.push_str(") AS ");
                    sql.push_str(alias);
                }
            }
            sql.push_str(" ON ");
            sql.push_str(&join.cond);
        }
        if !clauses.where_.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.where_.join(" "));
        }
        if !clauses.group.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&clauses.group.join(", "));
        }
        if !clauses.having.is_empty() {
            sql.push_str(" HAVING ");
            sql.push_str(&clauses.having.join(" "));
        }
        if !clauses.order.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&clauses.order.join(", "));
        }
        if clauses.limit.count > 0 {
            sql.push(' ');
            sql.push_str(&self.render_limit(clauses.limit.count, clauses.limit.offset));
        }
        sql
    }

    fn render_limit(&self, count: u64, offset: u64) -> String {
        if offset > 0 {
            format!("LIMIT {count} OFFSET {offset}")
        } else {
            format!("LIMIT {count}")
        }
    }
}
