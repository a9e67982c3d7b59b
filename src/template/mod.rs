//! Template processing engine
//!
//! This module contains the core template processing components:
//! - `context`: values fixed for one rendering scope
//! - `substitute`: replacement of references in a single line
//! - `block`: BEGIN/END structure of a file and its expansion
//! - `names`: enumeration of the concrete names of a templated entry
//! - `operation`: filesystem changes made while materializing
//! - `processor`: the recursive materialize walk
//! - `listing`: the enumerate-only walk

pub mod block;
pub mod context;
pub mod listing;
pub mod names;
pub mod operation;
pub mod processor;
pub mod substitute;

pub use block::BlockTree;
pub use context::Context;
pub use listing::Listing;
pub use names::{NameEnumerator, NameExpansion};
pub use processor::TemplateProcessor;
