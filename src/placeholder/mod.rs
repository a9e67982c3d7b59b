//! Placeholder model
//!
//! - `grammar`: recognition of references and BEGIN/END markers in text
//! - `value`: the value space of a single placeholder
//! - `definitions`: the ordered set of declared placeholders
//! - `properties` / `loader`: reading definitions from disk

pub mod definitions;
pub mod grammar;
pub mod loader;
pub mod properties;
pub mod value;

pub use definitions::{Definitions, PlaceholderDefinition};
pub use loader::load_definitions;
pub use value::{NumericRange, ValueSpace};
