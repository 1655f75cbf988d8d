//! Shader variant model and keyword-driven stripping
//!
//! This module provides the data model for compiled shader variants and the
//! pure filter that removes variants relying on keywords no reference
//! material ever enables. Build orchestration and counting live in
//! [`crate::processor`]; this layer has no side effects.

mod filter;
mod material;
mod variant;

pub use filter::*;
pub use material::*;
pub use variant::*;
