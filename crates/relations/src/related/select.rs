//! Building select statements for related rows.

use model_engine_sql::{BindSet, Connective, JoinKind, Row, Select};

use crate::error::Error;
use crate::related::{Related, RelatedKind};

/// What related rows are wanted: those of one owning record, or those of
/// a whole set of owning records described by fetch parameters.
pub enum RelatedSpec<'a> {
    Record(&'a Row),
    Set(FetchParams),
}

/// Parameters describing a set of owning records, used to build the
/// derived subselect over the native table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchParams {
    pub distinct: bool,
    /// Predicates over the native table, ANDed together.
    pub where_: Vec<String>,
    pub group: Vec<String>,
    pub having: Vec<String>,
    pub order: Vec<String>,
    pub paging: Option<u32>,
    /// 1-based page of owning records to cover.
    pub page: Option<u32>,
    /// Values for any placeholders in the predicates above.
    pub binds: BindSet,
}

impl Related {
    /// Produce a fresh select builder for the related rows.
    ///
    /// For a single record, the foreign table is restricted to rows whose
    /// foreign column equals the record's native column value. For a
    /// record set, a derived subselect over the native table projects the
    /// native column and is inner-joined to the foreign table, with the
    /// native id carried forward as `{native_alias}__{native_col}` for
    /// downstream grouping.
    pub fn new_select(&self, spec: &RelatedSpec) -> Result<Select, Error> {
        let mut select = Select::new();

        match spec {
            RelatedSpec::Record(record) => {
                let value = record.get(&self.native_col).cloned().ok_or_else(|| {
                    Error::InvalidSpec {
                        name: self.name.clone(),
                        col: self.native_col.clone(),
                    }
                })?;
                match self.kind {
                    RelatedKind::HasManyThrough => {
                        let (table, alias, native_col, foreign_col) = self.through_wiring();
                        select.join(
                            &format!("{table} AS {alias}"),
                            &format!(
                                "{}.{} = {alias}.{foreign_col}",
                                self.foreign_alias, self.foreign_col
                            ),
                            Some(JoinKind::Inner),
                        );
                        let key = reserved_key(alias, native_col);
                        select.where_(
                            &format!("{alias}.{native_col} = :{key}"),
                            Connective::And,
                        );
                        select.bind(key, value);
                    }
                    _ => {
                        let key = reserved_key(&self.foreign_alias, &self.foreign_col);
                        select.where_(
                            &format!("{}.{} = :{key}", self.foreign_alias, self.foreign_col),
                            Connective::And,
                        );
                        select.bind(key, value);
                    }
                }
            }
            RelatedSpec::Set(params) => {
                let inner = self.native_subselect(params);
                // carry the native id forward for downstream grouping
                select.col(format!(
                    "{na}.{nc} AS {na}__{nc}",
                    na = self.native_alias,
                    nc = self.native_col
                ));
                match self.kind {
                    RelatedKind::HasManyThrough => {
                        let (table, alias, native_col, foreign_col) = self.through_wiring();
                        select.join(
                            &format!("{table} AS {alias}"),
                            &format!(
                                "{}.{} = {alias}.{foreign_col}",
                                self.foreign_alias, self.foreign_col
                            ),
                            Some(JoinKind::Inner),
                        );
                        select.join_derived(
                            inner,
                            &self.native_alias,
                            &format!(
                                "{alias}.{native_col} = {}.{}",
                                self.native_alias, self.native_col
                            ),
                            Some(JoinKind::Inner),
                        );
                    }
                    _ => {
                        select.join_derived(
                            inner,
                            &self.native_alias,
                            &format!(
                                "{}.{} = {}.{}",
                                self.foreign_alias,
                                self.foreign_col,
                                self.native_alias,
                                self.native_col
                            ),
                            Some(JoinKind::Inner),
                        );
                    }
                }
            }
        }

        // select the foreign table under the relationship alias
        select.from(&format!("{} AS {}", self.foreign_table, self.foreign_alias));
        for col in &self.cols {
            select.col(format!("{}.{col}", self.foreign_alias));
        }

        // honor foreign inheritance
        if let (Some(col), Some(val)) =
            (&self.foreign_inherit_col, &self.foreign_inherit_val)
        {
            let key = reserved_key(&self.foreign_alias, col);
            select.where_(
                &format!("{}.{col} = :{key}", self.foreign_alias),
                Connective::And,
            );
            select.bind(key, val.as_str());
        }

        // layer the descriptor's own clauses
        select.distinct(self.distinct);
        for cond in &self.where_ {
            select.where_(cond, Connective::And);
        }
        for expr in &self.group {
            select.group(expr);
        }
        for cond in &self.having {
            select.having(cond, Connective::And);
        }
        for expr in &self.order {
            select.order(expr);
        }
        select.set_paging(self.paging);
        select.fetch(self.fetch);

        Ok(select)
    }

    /// The derived subselect over the native table projecting the native
    /// column, filtered and paged per the given parameters.
    fn native_subselect(&self, params: &FetchParams) -> Select {
        let mut inner = Select::new();
        inner
            .distinct(params.distinct)
            .from(&format!("{} AS {}", self.native_table, self.native_alias))
            .col(format!("{}.{}", self.native_alias, self.native_col));
        for cond in &params.where_ {
            inner.where_(cond, Connective::And);
        }
        for expr in &params.group {
            inner.group(expr);
        }
        for cond in &params.having {
            inner.having(cond, Connective::And);
        }
        for expr in &params.order {
            inner.order(expr);
        }
        inner.bind_all(&params.binds);
        if let Some(paging) = params.paging {
            inner.set_paging(paging);
        }
        if let Some(page) = params.page {
            inner.limit_page(page);
        }
        inner
    }

    /// The through wiring, present by construction for has-many-through.
    fn through_wiring(&self) -> (&str, &str, &str, &str) {
        (
            self.through_table.as_deref().unwrap_or_default(),
            self.through_alias.as_deref().unwrap_or_default(),
            self.through_native_col.as_deref().unwrap_or_default(),
            self.through_foreign_col.as_deref().unwrap_or_default(),
        )
    }
}

/// Placeholder name for an engine-generated bind. The `_rel_` prefix is
/// reserved; caller-supplied binds keep their own namespace.
fn reserved_key(alias: &str, col: &str) -> String {
    format!("_rel_{alias}_{col}")
}
