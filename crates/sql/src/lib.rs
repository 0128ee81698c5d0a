//! SQL select composition: clause accumulation, parameter binding,
//! pagination arithmetic, and the rendering/execution collaborator seams.
//!
//! The central type is [`select::Select`], which owns a [`clause::ClauseSet`]
//! and a [`bind::BindSet`], renders through a [`dialect::Dialect`], and runs
//! through an [`exec::Executor`].

pub mod bind;
pub mod clause;
pub mod dialect;
pub mod error;
pub mod exec;
pub mod paging;
pub mod select;
pub mod string;
pub mod value;

pub use bind::BindSet;
pub use clause::{split_list, ClausePart, ClauseSet, Connective, Join, JoinKind, JoinTarget, Limit};
pub use dialect::{AnsiDialect, Dialect};
pub use error::Error;
pub use exec::{Executor, FetchMode, Fetched, PageCount, Row, RowCursor};
pub use paging::Paging;
pub use select::Select;
pub use string::{CompiledQuery, Param};
pub use value::Value;
