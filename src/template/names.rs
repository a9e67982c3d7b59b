use std::collections::BTreeSet;
use std::iter::FusedIterator;

use crate::diagnostics::Diagnostics;
use crate::error::Error;
use crate::placeholder::grammar::{occurrences, refers_to, replace_occurrences};
use crate::placeholder::{Definitions, PlaceholderDefinition, ValueSpace};

use super::context::Context;

/// One concrete name produced from a templated name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameExpansion {
    pub name: String,
    /// Inherited values plus the values selected for this name. The entry's
    /// content and children are rendered with it.
    pub context: Context,
}

/// Enumerates the concrete names of a templated file or directory name.
///
/// Every multi-valued placeholder referenced by the name is a digit of an
/// odometer. The last declared placeholder turns fastest and placeholder 1
/// slowest; single-valued placeholders contribute their value once. Values
/// fixed by an enclosing scope never turn.
///
/// ```text
/// B = [b1, b2]  (Placeholder1)
/// A = [a1, a2, a3]  (Placeholder2)
///
/// "{{@B@}}-{{@A@}}" -> b1-a1, b1-a2, b1-a3, b2-a1, b2-a2, b2-a3
/// ```
pub struct NameEnumerator<'a> {
    template: &'a str,
    definitions: &'a Definitions,
    fixed: &'a Context,
    selection: Context,
    first_call: bool,
    exhausted: bool,
    reported: BTreeSet<String>,
    diagnostics: &'a Diagnostics,
}

impl<'a> NameEnumerator<'a> {
    /// # Arguments
    /// * `template` - The templated name, without its template suffix
    /// * `definitions` - All placeholders of the run
    /// * `fixed` - Values chosen by the enclosing scope
    /// * `diagnostics` - Sink for undeclared or unusable placeholders
    pub fn new(
        template: &'a str,
        definitions: &'a Definitions,
        fixed: &'a Context,
        diagnostics: &'a Diagnostics,
    ) -> Self {
        Self {
            template,
            definitions,
            fixed,
            selection: Context::new(),
            first_call: true,
            exhausted: false,
            reported: BTreeSet::new(),
            diagnostics,
        }
    }

    fn advance(&mut self) -> Option<NameExpansion> {
        let mut name = self.template.to_string();
        let mut carrying = true;
        let mut selected_new = false;
        let (definitions, fixed) = (self.definitions, self.fixed);

        for definition in definitions.cycling_order() {
            let placeholder = definition.name();
            if !refers_to(&name, placeholder) {
                continue;
            }

            let value = match fixed.get(placeholder) {
                Some(value) => value.to_string(),
                None => match self.select(definition, &mut carrying, &mut selected_new) {
                    Some(value) => value,
                    None => continue,
                },
            };

            let diagnostics = self.diagnostics;
            name = replace_occurrences(&name, |occurrence| {
                (occurrence.name == placeholder).then(|| match occurrence.base {
                    Some(base) => definition
                        .offset_value(&value, base, diagnostics)
                        .unwrap_or_default(),
                    None => value.clone(),
                })
            });
        }

        if self.first_call {
            self.report_undeclared(&name);
        } else if !selected_new {
            return None;
        }
        self.first_call = false;

        let mut context = fixed.clone();
        for (placeholder, value) in self.selection.iter() {
            context.set(placeholder, value);
        }
        log::trace!("'{}' expands to '{name}'", self.template);
        Some(NameExpansion { name, context })
    }

    /// Decides the value of a placeholder not fixed by the enclosing scope.
    ///
    /// The first multi-valued placeholder holding a value carries: it moves
    /// to its next value, or wraps to its first one and hands the carry on.
    /// Placeholders seen for the first time take their first value.
    fn select(
        &mut self,
        definition: &PlaceholderDefinition,
        carrying: &mut bool,
        selected_new: &mut bool,
    ) -> Option<String> {
        let placeholder = definition.name();
        let current = self.selection.get(placeholder).map(str::to_string);

        let value = match (definition.space(), current) {
            (ValueSpace::Unclassified(_), _) => {
                if self.reported.insert(placeholder.to_string()) {
                    if let Some(err) = definition.unclassified_error() {
                        self.diagnostics.error(err);
                    }
                }
                return None;
            }
            (_, None) => definition.next_value(None)?,
            (ValueSpace::Single(_), Some(current)) => current,
            (_, Some(current)) if *carrying => match definition.next_value(Some(&current)) {
                Some(next) => {
                    *carrying = false;
                    *selected_new = true;
                    next
                }
                None => definition.next_value(None)?,
            },
            (_, Some(current)) => current,
        };

        self.selection.set(placeholder, value.clone());
        Some(value)
    }

    fn report_undeclared(&mut self, name: &str) {
        for occurrence in occurrences(name) {
            if !self.definitions.contains(occurrence.name)
                && self.reported.insert(occurrence.name.to_string())
            {
                self.diagnostics.error(Error::UndeclaredPlaceholder {
                    name: occurrence.name.to_string(),
                });
            }
        }
    }
}

impl Iterator for NameEnumerator<'_> {
    type Item = NameExpansion;

    fn next(&mut self) -> Option<NameExpansion> {
        if self.exhausted {
            return None;
        }
        let expansion = self.advance();
        self.exhausted = expansion.is_none();
        expansion
    }
}

impl FusedIterator for NameEnumerator<'_> {}
