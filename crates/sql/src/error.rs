//! Errors raised while compiling or running a query.

use thiserror::Error;

use crate::exec::FetchMode;

/// A type for query compilation and execution errors.
#[derive(Debug, Error)]
pub enum Error {
    /// A placeholder appears in the rendered SQL with no bound value.
    #[error("no value bound for placeholder ':{0}'")]
    MissingBind(String),

    /// The executor failed to run the compiled query.
    #[error("query execution failed: {0}")]
    Execution(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The executor answered with a result shape that does not match the
    /// requested fetch mode.
    #[error("fetch mode {mode:?} received an incompatible result")]
    FetchShape { mode: FetchMode },
}

impl Error {
    /// Wrap an underlying storage failure as an execution error.
    pub fn execution(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Error::Execution(Box::new(source))
    }
}
