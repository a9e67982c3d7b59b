//! Recognition of `{{@NAME@}}` references and `{{@NAME # BEGIN@}}` /
//! `{{@NAME # END@}}` block markers in free text.
//!
//! NAME is the shortest run of characters that does not itself open a new
//! `{{@`, so `{{@A@}}{{@B@}}` yields `A` and `B`, and `{{@x{{@A@}}y@}}`
//! yields `A`.

use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::LazyLock;

const OPEN: &str = r"\{\{@";
const CLOSE: &str = r"@\}\}";
const NAME: &str = r"((?:[^{]|\{[^{]|\{\{[^@])*?)";

static REFERENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&[OPEN, NAME, r"(?:\s*#\s*base\s*(\d+))?", CLOSE].concat())
        .expect("Invalid placeholder reference regex")
});

static BEGIN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&[OPEN, NAME, r"\s*#\s*BEGIN\s*", CLOSE].concat())
        .expect("Invalid placeholder BEGIN regex")
});

static END_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&[OPEN, NAME, r"\s*#\s*END\s*", CLOSE].concat())
        .expect("Invalid placeholder END regex")
});

/// One `{{@NAME@}}` or `{{@NAME # base B@}}` found in a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence<'t> {
    pub name: &'t str,
    /// Digits after `# base`; the occurrence renders the value's ordinal
    /// counted from this number instead of the value itself.
    pub base: Option<&'t str>,
    pub span: Range<usize>,
}

impl<'t> Occurrence<'t> {
    fn from_captures(caps: &Captures<'t>) -> Self {
        let whole = caps.get(0).map(|m| m.range()).unwrap_or_default();
        Self {
            name: caps.get(1).map_or("", |m| m.as_str()),
            base: caps.get(2).map(|m| m.as_str()),
            span: whole,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Begin,
    End,
}

/// A line holding a block marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker<'t> {
    pub kind: MarkerKind,
    pub name: &'t str,
    /// The line carries more than the marker; the extra text is dropped.
    pub extraneous: bool,
}

/// Iterates over every placeholder reference in `text`, left to right.
pub fn occurrences(text: &str) -> impl Iterator<Item = Occurrence<'_>> + '_ {
    REFERENCE_REGEX.captures_iter(text).map(|caps| Occurrence::from_captures(&caps))
}

/// Classifies `line` as a BEGIN or END marker line. END wins when a line
/// carries both.
pub fn parse_marker(line: &str) -> Option<Marker<'_>> {
    [(MarkerKind::End, &*END_REGEX), (MarkerKind::Begin, &*BEGIN_REGEX)]
        .into_iter()
        .find_map(|(kind, regex)| {
            let caps = regex.captures(line)?;
            let whole = caps.get(0)?;
            let extraneous = !line[..whole.start()].trim().is_empty()
                || !line[whole.end()..].trim().is_empty();
            Some(Marker { kind, name: caps.get(1)?.as_str(), extraneous })
        })
}

/// Rebuilds `text`, replacing each occurrence for which `replacement`
/// returns a value and keeping the others verbatim.
pub fn replace_occurrences<F>(text: &str, mut replacement: F) -> String
where
    F: FnMut(&Occurrence<'_>) -> Option<String>,
{
    let mut rendered = String::with_capacity(text.len() + 30);
    let mut uncopied = 0;
    for occurrence in occurrences(text) {
        if let Some(value) = replacement(&occurrence) {
            rendered.push_str(&text[uncopied..occurrence.span.start]);
            rendered.push_str(&value);
            uncopied = occurrence.span.end;
        }
    }
    rendered.push_str(&text[uncopied..]);
    rendered
}

/// Names of all placeholders a line refers to, marker names included.
pub fn referenced_names(line: &str) -> Vec<&str> {
    match parse_marker(line) {
        Some(marker) => vec![marker.name],
        None => occurrences(line).map(|occurrence| occurrence.name).collect(),
    }
}

/// Whether `text` holds at least one reference to `name`.
pub fn refers_to(text: &str, name: &str) -> bool {
    occurrences(text).any(|occurrence| occurrence.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_adjacent_references_separately() {
        let names: Vec<_> =
            occurrences("{{@PH1@}}{{@PH2@}}").map(|o| o.name).collect();
        assert_eq!(names, vec!["PH1", "PH2"]);
    }

    #[test]
    fn innermost_reference_wins_inside_unbalanced_delimiters() {
        let names: Vec<_> =
            occurrences("{{@abc{{@PH1@}}xyz@}}").map(|o| o.name).collect();
        assert_eq!(names, vec!["PH1"]);
    }

    #[test]
    fn base_number_is_split_from_the_name() {
        let found: Vec<_> = occurrences("file-{{@N # base 001@}}.txt").collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "N");
        assert_eq!(found[0].base, Some("001"));
        assert_eq!(found[0].span, 5..23);
    }

    #[test]
    fn base_number_tolerates_missing_whitespace() {
        let found: Vec<_> = occurrences("{{@N#base7@}}").collect();
        assert_eq!(found[0].name, "N");
        assert_eq!(found[0].base, Some("7"));
    }

    #[test]
    fn recognises_begin_and_end_markers() {
        let begin = parse_marker("{{@SITE # BEGIN@}}").unwrap();
        assert_eq!(begin.kind, MarkerKind::Begin);
        assert_eq!(begin.name, "SITE");
        assert!(!begin.extraneous);

        let end = parse_marker("  {{@SITE#END@}}  ").unwrap();
        assert_eq!(end.kind, MarkerKind::End);
        assert_eq!(end.name, "SITE");
        assert!(!end.extraneous);
    }

    #[test]
    fn marker_keyword_is_case_sensitive() {
        assert!(parse_marker("{{@SITE # begin@}}").is_none());
    }

    #[test]
    fn flags_content_around_a_marker() {
        let marker = parse_marker("<!-- {{@SITE # BEGIN@}} -->").unwrap();
        assert!(marker.extraneous);
    }

    #[test]
    fn plain_reference_is_not_a_marker() {
        assert!(parse_marker("Hello {{@SITE@}}").is_none());
    }

    #[test]
    fn replaces_only_selected_occurrences() {
        let rendered = replace_occurrences("{{@A@}}-{{@B@}}-{{@A@}}", |o| {
            (o.name == "A").then(|| "x".to_string())
        });
        assert_eq!(rendered, "x-{{@B@}}-x");
    }

    #[test]
    fn referenced_names_reports_marker_names() {
        assert_eq!(referenced_names("{{@LOOP # BEGIN@}}"), vec!["LOOP"]);
        assert_eq!(referenced_names("{{@A@}} and {{@B # base 1@}}"), vec!["A", "B"]);
    }
}
