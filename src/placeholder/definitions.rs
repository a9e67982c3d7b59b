use indexmap::IndexMap;

use crate::constants::{PLACEHOLDER_KEY_PREFIX, PLACEHOLDER_VALUE_KEY_SUFFIX};
use crate::diagnostics::Diagnostics;
use crate::error::Error;

use super::value::ValueSpace;

/// A declared placeholder: its name and parsed value space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderDefinition {
    name: String,
    space: ValueSpace,
}

impl PlaceholderDefinition {
    pub fn new(name: impl Into<String>, declaration: &str) -> Self {
        let name = name.into();
        let space = ValueSpace::parse(declaration);
        log::debug!("Placeholder {name}: {}", space.describe());
        Self { name, space }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn space(&self) -> &ValueSpace {
        &self.space
    }

    pub fn is_single_valued(&self) -> bool {
        self.space.is_single_valued()
    }

    pub fn next_value(&self, current: Option<&str>) -> Option<String> {
        self.space.next_value(current)
    }

    /// Base-number projection of `current`, reporting a value that is not a
    /// member of this placeholder.
    pub fn offset_value(
        &self,
        current: &str,
        base: &str,
        diagnostics: &Diagnostics,
    ) -> Option<String> {
        let projected = self.space.offset_value(current, base);
        if projected.is_none() {
            diagnostics.error(Error::OffsetLookup {
                name: self.name.clone(),
                value: current.to_string(),
                base: base.to_string(),
            });
        }
        projected
    }

    pub(crate) fn unclassified_error(&self) -> Option<Error> {
        match &self.space {
            ValueSpace::Unclassified(declaration) => Some(Error::UnclassifiedDefinition {
                name: self.name.clone(),
                declaration: declaration.clone(),
            }),
            _ => None,
        }
    }
}

/// All placeholders of a run, in declaration order.
///
/// Placeholder 1 is the outermost one. Name enumeration walks the set in
/// reverse ([`Definitions::cycling_order`]), which makes the last declared
/// placeholder the fastest varying.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Definitions {
    entries: IndexMap<String, PlaceholderDefinition>,
}

impl Definitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a placeholder. Redeclaring a name replaces the earlier
    /// definition, which is returned, and moves it to the end of the order.
    pub fn declare(
        &mut self,
        name: impl Into<String>,
        declaration: &str,
    ) -> Option<PlaceholderDefinition> {
        let definition = PlaceholderDefinition::new(name, declaration);
        let replaced = self.entries.shift_remove(definition.name());
        self.entries.insert(definition.name().to_string(), definition);
        replaced
    }

    /// Builds the set from `Placeholder<k>` / `Placeholder<k>Value` pairs,
    /// for k = 1, 2, ... until the first missing `Placeholder<k>`.
    pub fn from_numbered_keys(
        entries: &IndexMap<String, String>,
        diagnostics: &Diagnostics,
    ) -> Self {
        let mut definitions = Self::new();
        for number in 1.. {
            let name_key = format!("{PLACEHOLDER_KEY_PREFIX}{number}");
            let Some(name) = entries.get(&name_key) else {
                break;
            };
            let value_key = format!("{name_key}{PLACEHOLDER_VALUE_KEY_SUFFIX}");
            match entries.get(&value_key) {
                Some(declaration) => {
                    if definitions.declare(name.as_str(), declaration).is_some() {
                        diagnostics.warn(format!(
                            "Placeholder \"{name}\" is declared more than once, {name_key} replaces the earlier declaration"
                        ));
                    }
                    for value in ValueSpace::duplicate_values(declaration) {
                        diagnostics.warn(format!(
                            "Value \"{value}\" is listed more than once for placeholder \"{name}\", only its first position is used"
                        ));
                    }
                }
                None => diagnostics.error(Error::MissingPlaceholderValue { key: name_key }),
            }
        }
        definitions
    }

    pub fn get(&self, name: &str) -> Option<&PlaceholderDefinition> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn declaration_order(&self) -> impl DoubleEndedIterator<Item = &PlaceholderDefinition> {
        self.entries.values()
    }

    /// Last declared first.
    pub fn cycling_order(&self) -> impl Iterator<Item = &PlaceholderDefinition> {
        self.entries.values().rev()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<N: Into<String>, D: AsRef<str>> FromIterator<(N, D)> for Definitions {
    fn from_iter<I: IntoIterator<Item = (N, D)>>(iter: I) -> Self {
        let mut definitions = Self::new();
        for (name, declaration) in iter {
            definitions.declare(name, declaration.as_ref());
        }
        definitions
    }
}
