//! Swell ocean rendering runtime support
//!
//! This crate carries the host-independent plumbing of the Swell ocean
//! renderer: the registry through which world objects feed data into the
//! ocean simulations, and the declarative predicate rules that drive its
//! settings surfaces. Rendering itself stays in the host; everything here
//! is generic over the host's types.

pub mod registry;
pub mod settings;

pub use registry::{InputHandle, InputRegistry, LodInput, LodKind, RegistryError};
pub use settings::{FieldPredicate, FieldValue, PredicateTable};
