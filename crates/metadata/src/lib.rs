//! Metadata describing declared models and where their rows live.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Everything the query layers need to know about one model.
///
/// Built once at model-setup time and treated as immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// The model's class identifier, e.g. `App_Model_Nodes`.
    pub class: String,
    /// The short model name, used as the table alias, e.g. `nodes`.
    pub model_name: String,
    /// The physical table name.
    pub table_name: String,
    /// The primary key column.
    pub primary_col: String,
    /// The columns fetched by default.
    pub fetch_cols: Vec<String>,
    /// The single-table-inheritance discriminator column, if any.
    pub inherit_col: Option<String>,
    /// The discriminator value identifying this model's rows.
    pub inherit_val: Option<String>,
    /// Default rows per page when fetching this model.
    pub paging: u32,
}

impl ModelMetadata {
    /// Whether this model stores several logical subtypes in one table.
    pub fn is_inherited(&self) -> bool {
        self.inherit_col.is_some() && self.inherit_val.is_some()
    }
}

/// The set of declared models, keyed by class identifier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModelsInfo(pub BTreeMap<String, ModelMetadata>);

impl ModelsInfo {
    pub fn empty() -> Self {
        ModelsInfo::default()
    }

    /// Register a model under its class identifier.
    pub fn insert(&mut self, metadata: ModelMetadata) {
        self.0.insert(metadata.class.clone(), metadata);
    }

    pub fn get(&self, class: &str) -> Option<&ModelMetadata> {
        self.0.get(class)
    }

    pub fn contains(&self, class: &str) -> bool {
        self.0.contains_key(class)
    }
}
