//! Substitution of every placeholder reference in one line of text.

use crate::diagnostics::Diagnostics;
use crate::error::Error;
use crate::placeholder::grammar::{replace_occurrences, Occurrence};
use crate::placeholder::{Definitions, ValueSpace};

use super::context::Context;

/// Replaces every reference in `line`.
///
/// A reference resolves to, in order of preference, the value fixed in
/// `context`, or the value of a single-valued placeholder. Multi-valued
/// placeholders without a fixed value, unusable declarations and undeclared
/// names are reported and render as an empty string. `# base` references
/// render the ordinal of the resolved value.
pub fn substitute(
    line: &str,
    definitions: &Definitions,
    context: &Context,
    diagnostics: &Diagnostics,
) -> String {
    replace_occurrences(line, |occurrence| {
        Some(resolve(occurrence, definitions, context, diagnostics).unwrap_or_default())
    })
}

fn resolve(
    occurrence: &Occurrence<'_>,
    definitions: &Definitions,
    context: &Context,
    diagnostics: &Diagnostics,
) -> Option<String> {
    let name = occurrence.name;
    let definition = definitions.get(name);

    let value = match (context.get(name), definition) {
        (Some(fixed), _) => fixed.to_string(),
        (None, Some(definition)) => match definition.space() {
            ValueSpace::Single(value) => value.clone(),
            ValueSpace::List(_) | ValueSpace::Range(_) => {
                diagnostics.error(Error::UnboundMultiValue { name: name.to_string() });
                return None;
            }
            ValueSpace::Unclassified(declaration) => {
                diagnostics.error(Error::UnclassifiedDefinition {
                    name: name.to_string(),
                    declaration: declaration.clone(),
                });
                return None;
            }
        },
        (None, None) => {
            diagnostics.error(Error::UndeclaredPlaceholder { name: name.to_string() });
            return None;
        }
    };

    match (occurrence.base, definition) {
        (None, _) => Some(value),
        (Some(base), Some(definition)) => definition.offset_value(&value, base, diagnostics),
        (Some(_), None) => {
            diagnostics.error(Error::UndeclaredPlaceholder { name: name.to_string() });
            None
        }
    }
}
