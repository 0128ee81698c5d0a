//! The low-level compiled query representation.

use crate::bind::BindSet;
use crate::error::Error;
use crate::value::Value;

/// One resolved placeholder, in order of appearance in the SQL text.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub value: Value,
}

/// Rendered SQL text plus its bind values in placeholder order.
///
/// Transient: produced per execution, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: Vec<Param>,
}

impl CompiledQuery {
    /// Resolve every `:name` placeholder in `sql` against the bind set.
    ///
    /// A placeholder with no bound value is a binding error. A placeholder
    /// appearing twice yields two params, so positional drivers see the
    /// value at each position.
    pub fn new(sql: String, binds: &BindSet) -> Result<CompiledQuery, Error> {
        let mut params = Vec::new();
        for name in placeholders(&sql) {
            let value = binds
                .get(&name)
                .ok_or_else(|| Error::MissingBind(name.clone()))?;
            params.push(Param {
                name,
                value: value.clone(),
            });
        }
        Ok(CompiledQuery { sql, params })
    }
}

/// Scan `:name` placeholders in order of appearance, skipping `::` casts
/// and anything inside single-quoted literals.
fn placeholders(sql: &str) -> Vec<String> {
    let bytes = sql.as_bytes();
    let mut found = Vec::new();
    let mut in_quote = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\'' => {
                in_quote = !in_quote;
                i += 1;
            }
            b':' if !in_quote => {
                if bytes.get(i + 1) == Some(&b':') {
                    // a cast, not a placeholder
                    i += 2;
                    continue;
                }
                let start = i + 1;
                let mut end = start;
                while end < bytes.len()
                    && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_')
                {
                    end += 1;
                }
                if end > start {
                    found.push(sql[start..end].to_string());
                    i = end;
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    found
}
