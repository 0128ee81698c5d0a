//! Relationship descriptors: resolved metadata describing how one model's
//! records relate to another's.

mod options;
mod select;

pub use options::{RelatedKind, RelatedOptions};
pub use select::{FetchParams, RelatedSpec};

use std::collections::BTreeMap;

use model_engine_metadata::{ModelMetadata, ModelsInfo};
use model_engine_sql::{split_list, FetchMode};

use crate::error::Error;
use crate::resolver::ClassResolver;

/// Everything needed to resolve one relationship at model-setup time.
pub struct LoadContext<'a> {
    /// The owning model.
    pub native: &'a ModelMetadata,
    /// The registry of declared models.
    pub models: &'a ModelsInfo,
    /// The class lookup strategy.
    pub resolver: &'a dyn ClassResolver,
    /// Relationships already loaded on the native model; has-many-through
    /// borrows its through wiring from here.
    pub siblings: &'a BTreeMap<String, Related>,
}

/// A resolved relationship.
///
/// Constructed once at model-setup time, immutable thereafter, and reused
/// to build a fresh select builder per call.
#[derive(Debug, Clone, PartialEq)]
pub struct Related {
    pub name: String,
    pub kind: RelatedKind,

    pub native_class: String,
    pub native_table: String,
    pub native_alias: String,
    /// The native column matched against the foreign column.
    pub native_col: String,

    pub foreign_class: String,
    pub foreign_table: String,
    /// The foreign table's alias; defaults to the relationship name.
    pub foreign_alias: String,
    /// The foreign column matched against the native column.
    pub foreign_col: String,
    pub foreign_primary_col: String,
    pub foreign_inherit_col: Option<String>,
    pub foreign_inherit_val: Option<String>,

    /// The sibling relationship mediating a has-many-through.
    pub through: Option<String>,
    pub through_table: Option<String>,
    pub through_alias: Option<String>,
    /// In the through table, the column holding the native value.
    pub through_native_col: Option<String>,
    /// In the through table, the column holding the foreign value.
    pub through_foreign_col: Option<String>,

    pub distinct: bool,
    /// The foreign columns fetched; always contains the foreign primary
    /// key, and the discriminator column under inheritance.
    pub cols: Vec<String>,
    pub where_: Vec<String>,
    pub group: Vec<String>,
    pub having: Vec<String>,
    pub order: Vec<String>,
    pub paging: u32,
    pub fetch: FetchMode,
}

impl Related {
    pub fn belongs_to(name: &str, opts: RelatedOptions, ctx: &LoadContext) -> Result<Self, Error> {
        Self::load(RelatedKind::BelongsTo, name, None, opts, ctx)
    }

    pub fn has_one(name: &str, opts: RelatedOptions, ctx: &LoadContext) -> Result<Self, Error> {
        Self::load(RelatedKind::HasOne, name, None, opts, ctx)
    }

    pub fn has_many(name: &str, opts: RelatedOptions, ctx: &LoadContext) -> Result<Self, Error> {
        Self::load(RelatedKind::HasMany, name, None, opts, ctx)
    }

    pub fn has_many_through(
        name: &str,
        through: &str,
        opts: RelatedOptions,
        ctx: &LoadContext,
    ) -> Result<Self, Error> {
        Self::load(RelatedKind::HasManyThrough, name, Some(through), opts, ctx)
    }

    /// Resolve a relationship definition into its full wiring.
    fn load(
        kind: RelatedKind,
        name: &str,
        through: Option<&str>,
        mut opts: RelatedOptions,
        ctx: &LoadContext,
    ) -> Result<Self, Error> {
        if name.is_empty() {
            return Err(Error::Configuration {
                native: ctx.native.class.clone(),
                name: name.to_string(),
                reason: "relationship name is empty".to_string(),
            });
        }

        // resolve the foreign model: explicit class option, else the
        // relationship name
        let wanted = opts.class.clone().unwrap_or_else(|| name.to_string());
        let foreign_class = ctx
            .resolver
            .resolve(&wanted, ctx.native)
            .ok_or_else(|| Error::UnresolvedRelation {
                native: ctx.native.class.clone(),
                name: name.to_string(),
                class: wanted.clone(),
            })?;
        let foreign = ctx
            .models
            .get(&foreign_class)
            .ok_or_else(|| Error::UnresolvedRelation {
                native: ctx.native.class.clone(),
                name: name.to_string(),
                class: foreign_class.clone(),
            })?;

        // fetch columns: explicit option or the foreign model's defaults,
        // always including the primary key and any discriminator column
        let mut cols = match &opts.cols {
            Some(spec) => split_list(spec),
            None => foreign.fetch_cols.clone(),
        };
        if !cols.contains(&foreign.primary_col) {
            cols.push(foreign.primary_col.clone());
        }
        if let Some(inherit_col) = &foreign.inherit_col {
            if !cols.contains(inherit_col) {
                cols.push(inherit_col.clone());
            }
        }

        // an inheritance-enabled foreign model gets a permanent filter
        let (foreign_inherit_col, foreign_inherit_val) = if foreign.is_inherited() {
            (foreign.inherit_col.clone(), foreign.inherit_val.clone())
        } else {
            (None, None)
        };

        // the virtual foreign_key shorthand applies only when neither side
        // is pinned explicitly
        if opts.native_col.is_none() && opts.foreign_col.is_none() {
            if let Some(key) = opts.foreign_key.take() {
                match kind {
                    RelatedKind::BelongsTo => opts.native_col = Some(key),
                    RelatedKind::HasOne | RelatedKind::HasMany => opts.foreign_col = Some(key),
                    RelatedKind::HasManyThrough => {
                        // explicit through column wins over the shorthand
                        if opts.through_foreign_col.is_none() {
                            opts.through_foreign_col = Some(key);
                        }
                    }
                }
            }
        }

        // kind-specific column wiring
        let (native_col, foreign_col) = match kind {
            RelatedKind::BelongsTo => (
                opts.native_col.unwrap_or_else(|| format!("{name}_id")),
                opts.foreign_col.unwrap_or_else(|| foreign.primary_col.clone()),
            ),
            RelatedKind::HasOne | RelatedKind::HasMany => (
                opts.native_col.unwrap_or_else(|| ctx.native.primary_col.clone()),
                opts.foreign_col
                    .unwrap_or_else(|| format!("{}_id", ctx.native.model_name)),
            ),
            RelatedKind::HasManyThrough => (
                opts.native_col.unwrap_or_else(|| ctx.native.primary_col.clone()),
                opts.foreign_col.unwrap_or_else(|| foreign.primary_col.clone()),
            ),
        };

        // a through relationship borrows the sibling's own wiring to reach
        // the join table
        let (through_table, through_alias, through_native_col, through_foreign_col) =
            match (kind, through) {
                (RelatedKind::HasManyThrough, Some(through_name)) => {
                    let sibling = ctx.siblings.get(through_name).ok_or_else(|| {
                        Error::Configuration {
                            native: ctx.native.class.clone(),
                            name: name.to_string(),
                            reason: format!(
                                "through relationship '{through_name}' is not defined"
                            ),
                        }
                    })?;
                    (
                        Some(sibling.foreign_table.clone()),
                        Some(sibling.foreign_alias.clone()),
                        Some(sibling.foreign_col.clone()),
                        Some(
                            opts.through_foreign_col
                                .clone()
                                .unwrap_or_else(|| format!("{}_id", foreign.model_name)),
                        ),
                    )
                }
                _ => (None, None, None, None),
            };

        let order = if opts.order.is_empty() {
            vec![format!("{name}.{}", foreign.primary_col)]
        } else {
            opts.order.clone()
        };

        let related = Related {
            name: name.to_string(),
            kind,
            native_class: ctx.native.class.clone(),
            native_table: ctx.native.table_name.clone(),
            native_alias: ctx.native.model_name.clone(),
            native_col,
            foreign_class,
            foreign_table: foreign.table_name.clone(),
            foreign_alias: name.to_string(),
            foreign_col,
            foreign_primary_col: foreign.primary_col.clone(),
            foreign_inherit_col,
            foreign_inherit_val,
            through: through.map(ToOwned::to_owned),
            through_table,
            through_alias,
            through_native_col,
            through_foreign_col,
            distinct: opts.distinct,
            cols,
            where_: opts.where_,
            group: opts.group,
            having: opts.having,
            order,
            paging: opts.paging.unwrap_or(foreign.paging).max(1),
            fetch: opts.fetch.unwrap_or(if kind.is_many() {
                FetchMode::All
            } else {
                FetchMode::Row
            }),
        };

        tracing::debug!(
            native = %related.native_class,
            name = %related.name,
            foreign = %related.foreign_class,
            "resolved relationship"
        );
        Ok(related)
    }
}
