//! Resolving a relationship name to a foreign model class.

use model_engine_metadata::{ModelMetadata, ModelsInfo};

/// The marker segment separating a class's namespace from its model name,
/// e.g. the `Model_` in `App_Model_Nodes`.
const MODEL_MARKER: &str = "Model_";

/// Resolves a relationship name (or explicit class) to a registered model
/// class identifier.
pub trait ClassResolver {
    fn resolve(&self, class: &str, native: &ModelMetadata) -> Option<String>;
}

/// Resolution against a registry using, in order:
///
/// 1. each prefix of an explicit hierarchy stack, appended with the
///    capitalized name;
/// 2. the namespace parallel to the native class — everything up to and
///    including its last `Model_` segment, appended with the capitalized
///    name;
/// 3. the literal identifier.
pub struct StackResolver<'a> {
    models: &'a ModelsInfo,
    stack: Vec<String>,
}

impl<'a> StackResolver<'a> {
    pub fn new(models: &'a ModelsInfo, stack: Vec<String>) -> Self {
        StackResolver { models, stack }
    }
}

impl ClassResolver for StackResolver<'_> {
    fn resolve(&self, class: &str, native: &ModelMetadata) -> Option<String> {
        let suffix = ucfirst(class);

        for prefix in &self.stack {
            let candidate = format!("{prefix}{suffix}");
            if self.models.contains(&candidate) {
                return Some(candidate);
            }
        }

        if let Some(pos) = native.class.rfind(MODEL_MARKER) {
            let parallel = format!("{}{}", &native.class[..pos + MODEL_MARKER.len()], suffix);
            if self.models.contains(&parallel) {
                return Some(parallel);
            }
        }

        if self.models.contains(class) {
            return Some(class.to_string());
        }

        None
    }
}

/// Upper-case the first character, the way class name segments are written.
fn ucfirst(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
