//! The set of values one placeholder can take, parsed from its declaration.
//!
//! | Declaration       | Kind                            |
//! |-------------------|---------------------------------|
//! | `Acme`            | [`ValueSpace::Single`]          |
//! | `[a, b, c]`       | [`ValueSpace::List`]            |
//! | `[001 - 100]`     | [`ValueSpace::Range`]           |
//! | `[100 - 001]`     | [`ValueSpace::Range`], inverted |
//! | `[]`, `[a]`, `[x` | [`ValueSpace::Unclassified`]    |
//!
//! "Next value" queries never wrap: they return `None` once the sequence is
//! exhausted.

use regex::Regex;
use std::sync::LazyLock;

static RANGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+)\s*-\s*(\d+)\s*$").expect("Invalid range declaration regex")
});

/// An integral range such as `[001 - 100]`.
///
/// The digit width of the first bound is the padding width of every member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericRange {
    begin: String,
    end: String,
    first: u64,
    last: u64,
}

impl NumericRange {
    fn parse(begin: &str, end: &str) -> Option<Self> {
        Some(Self {
            begin: begin.to_string(),
            end: end.to_string(),
            first: begin.parse().ok()?,
            last: end.parse().ok()?,
        })
    }

    /// Descending ranges enumerate from the larger bound downwards.
    pub fn is_inverted(&self) -> bool {
        self.first > self.last
    }

    pub fn begin(&self) -> &str {
        &self.begin
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    fn contains(&self, number: u64) -> bool {
        (self.first.min(self.last)..=self.first.max(self.last)).contains(&number)
    }

    fn successor(&self, current: &str) -> Option<String> {
        let number: u64 = current.parse().ok()?;
        let next =
            if self.is_inverted() { number.checked_sub(1)? } else { number.checked_add(1)? };
        self.contains(next).then(|| pad(next, self.begin.len()))
    }

    /// Distance of `current` from the first bound, in enumeration direction.
    fn ordinal(&self, current: &str) -> Option<u64> {
        let number: u64 = current.parse().ok()?;
        if !self.contains(number) {
            return None;
        }
        Some(number.abs_diff(self.first))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSpace {
    Single(String),
    List(Vec<String>),
    Range(NumericRange),
    /// Bracketed declaration that is neither a list nor a range. Defined,
    /// but unusable: every consumer reports it instead of substituting.
    Unclassified(String),
}

impl ValueSpace {
    /// Parses a value declaration.
    ///
    /// Bracketed interiors are tried as a range first, then as a list of at
    /// least two non-empty comma-separated tokens. A list value given twice is
    /// kept at its first position only. Unbracketed declarations are taken
    /// verbatim as a single value.
    pub fn parse(declaration: &str) -> Self {
        let trimmed = declaration.trim();
        let Some(interior) =
            trimmed.strip_prefix('[').and_then(|rest| rest.strip_suffix(']'))
        else {
            return ValueSpace::Single(declaration.to_string());
        };

        if let Some(caps) = RANGE_REGEX.captures(interior) {
            return NumericRange::parse(&caps[1], &caps[2])
                .map(ValueSpace::Range)
                .unwrap_or_else(|| ValueSpace::Unclassified(declaration.to_string()));
        }

        match list_tokens(interior) {
            Some(tokens) => {
                let mut values: Vec<String> = Vec::with_capacity(tokens.len());
                for token in tokens {
                    if !values.iter().any(|value| value == token) {
                        values.push(token.to_string());
                    }
                }
                ValueSpace::List(values)
            }
            None => ValueSpace::Unclassified(declaration.to_string()),
        }
    }

    /// List values given more than once in `declaration`, each named once.
    /// Only the first occurrence of such a value is kept by [`ValueSpace::parse`].
    pub fn duplicate_values(declaration: &str) -> Vec<String> {
        let Some(tokens) = declaration
            .trim()
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .filter(|interior| !RANGE_REGEX.is_match(interior))
            .and_then(list_tokens)
        else {
            return Vec::new();
        };

        let mut duplicates: Vec<String> = Vec::new();
        for (index, token) in tokens.iter().enumerate() {
            if tokens[..index].contains(token) && !duplicates.iter().any(|d| d == token) {
                duplicates.push(token.to_string());
            }
        }
        duplicates
    }

    /// The value following `current`, or the first value when `current` is
    /// `None`. Returns `None` at the end of the sequence.
    pub fn next_value(&self, current: Option<&str>) -> Option<String> {
        match (self, current) {
            (ValueSpace::Single(value), None) => Some(value.clone()),
            (ValueSpace::Single(_), Some(_)) => None,
            (ValueSpace::List(values), None) => values.first().cloned(),
            (ValueSpace::List(values), Some(current)) => {
                let position = values.iter().position(|value| value == current)?;
                values.get(position + 1).cloned()
            }
            (ValueSpace::Range(range), None) => Some(range.begin.clone()),
            (ValueSpace::Range(range), Some(current)) => range.successor(current),
            (ValueSpace::Unclassified(_), _) => None,
        }
    }

    /// Renders `current` as its ordinal counted from `base`, padded to the
    /// digit width of `base`. `None` when `current` is not a member.
    pub fn offset_value(&self, current: &str, base: &str) -> Option<String> {
        let base_number: u64 = base.parse().ok()?;
        let ordinal = match self {
            ValueSpace::Single(_) => return Some(base.to_string()),
            ValueSpace::List(values) => {
                values.iter().position(|value| value == current)? as u64
            }
            ValueSpace::Range(range) => range.ordinal(current)?,
            ValueSpace::Unclassified(_) => return None,
        };
        Some(pad(base_number.checked_add(ordinal)?, base.len()))
    }

    pub fn is_single_valued(&self) -> bool {
        matches!(self, ValueSpace::Single(_))
    }

    pub fn is_unclassified(&self) -> bool {
        matches!(self, ValueSpace::Unclassified(_))
    }

    /// The complete ordered enumeration.
    pub fn values(&self) -> Values<'_> {
        Values { space: self, current: None, exhausted: false }
    }

    /// Human readable kind, used in log messages.
    pub fn describe(&self) -> String {
        match self {
            ValueSpace::Single(value) => format!("single value: {value}"),
            ValueSpace::List(values) => format!("list of {}", values.len()),
            ValueSpace::Range(range) if range.is_inverted() => {
                format!("inverted range from {} to {}", range.begin, range.end)
            }
            ValueSpace::Range(range) => {
                format!("range from {} to {}", range.begin, range.end)
            }
            ValueSpace::Unclassified(declaration) => {
                format!("unclassified declaration {declaration:?}")
            }
        }
    }
}

/// Iterator over a [`ValueSpace`], driven by repeated `next_value` calls.
pub struct Values<'a> {
    space: &'a ValueSpace,
    current: Option<String>,
    exhausted: bool,
}

impl Iterator for Values<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.exhausted {
            return None;
        }
        let next = self.space.next_value(self.current.as_deref());
        self.exhausted = next.is_none();
        self.current = next.clone();
        next
    }
}

/// Non-empty comma separated tokens of a bracketed interior, or `None` when
/// there are fewer than two. `[a, b,]` declares two values.
fn list_tokens(interior: &str) -> Option<Vec<&str>> {
    let tokens: Vec<&str> =
        interior.split(',').map(str::trim).filter(|token| !token.is_empty()).collect();
    (tokens.len() >= 2).then_some(tokens)
}

fn pad(number: u64, width: usize) -> String {
    format!("{number:0width$}")
}
