//! Association resolution: relationship descriptors over declared models,
//! compiled into join or subselect fragments for the fetch layer.
//!
//! A [`related::Related`] descriptor is resolved once at model-setup time
//! and reused to build a fresh select builder per call; it never shares
//! mutable state across invocations.

pub mod error;
pub mod related;
pub mod resolver;

pub use error::Error;
pub use related::{FetchParams, LoadContext, Related, RelatedKind, RelatedOptions, RelatedSpec};
pub use resolver::{ClassResolver, StackResolver};
