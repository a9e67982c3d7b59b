//! Reader for Java-properties style definition files.
//!
//! Supported: `key = value`, `key: value` and `key value` pairs, `#` and `!`
//! comment lines, backslash line continuation and the `\t \n \r \f \uXXXX`
//! escapes (any other escaped character stands for itself). A key given
//! twice keeps its first position and its last value.

use indexmap::IndexMap;

pub fn parse_properties(content: &str) -> IndexMap<String, String> {
    logical_lines(content)
        .iter()
        .map(|line| split_key_value(line))
        .map(|(key, value)| (unescape(key), unescape(value)))
        .collect()
}

fn logical_lines(content: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut natural = content.lines();
    while let Some(line) = natural.next() {
        let line = line.trim_start();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let mut logical = line.to_string();
        while ends_with_continuation(&logical) {
            logical.pop();
            match natural.next() {
                Some(next) => logical.push_str(next.trim_start()),
                None => break,
            }
        }
        lines.push(logical);
    }
    lines
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn split_key_value(line: &str) -> (&str, &str) {
    let mut key_end = line.len();
    let mut escaped = false;
    for (index, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = index;
                break;
            }
            c if c.is_whitespace() => {
                key_end = index;
                break;
            }
            _ => {}
        }
    }

    let rest = line[key_end..].trim_start();
    let value = rest.strip_prefix(['=', ':']).map_or(rest, str::trim_start);
    (&line[..key_end], value)
}

fn unescape(text: &str) -> String {
    let mut unescaped = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => unescaped.push('\t'),
            Some('n') => unescaped.push('\n'),
            Some('r') => unescaped.push('\r'),
            Some('f') => unescaped.push('\u{0C}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => unescaped.push(decoded),
                    None => {
                        unescaped.push_str("\\u");
                        unescaped.push_str(&hex);
                    }
                }
            }
            Some(other) => unescaped.push(other),
            None => {}
        }
    }
    unescaped
}
