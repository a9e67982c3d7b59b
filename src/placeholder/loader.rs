//! Definitions file loading
//!
//! The file format is chosen by extension: `.json` and `.yaml`/`.yml` are
//! flat maps of `Placeholder<k>` / `Placeholder<k>Value` keys, everything
//! else is read as a Java-properties file.
//!
//! Files that are not valid UTF-8 are read as ISO-8859-1, the encoding of
//! Java-properties files.
//!
//! In YAML and JSON a value may also be a sequence, so `[de, en]` or
//! `["001 - 100"]` declare a list or range without quoting. YAML reads an
//! unquoted `007` as the number 7; quote zero-padded single values.

use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

use crate::constants::definitions_format;
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::ioutils::read_text;

use super::definitions::Definitions;
use super::properties::parse_properties;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
    Sequence(Vec<Scalar>),
}

impl Scalar {
    fn into_declaration(self) -> String {
        match self {
            Scalar::Text(text) => text,
            Scalar::Integer(number) => number.to_string(),
            Scalar::Float(number) => number.to_string(),
            Scalar::Flag(flag) => flag.to_string(),
            Scalar::Sequence(items) => {
                let items: Vec<_> = items.into_iter().map(Scalar::into_declaration).collect();
                format!("[{}]", items.join(", "))
            }
        }
    }
}

fn into_entries(map: IndexMap<String, Scalar>) -> IndexMap<String, String> {
    map.into_iter().map(|(key, value)| (key, value.into_declaration())).collect()
}

/// Reads the raw key/value entries of a definitions file.
pub fn read_entries<P: AsRef<Path>>(path: P) -> Result<IndexMap<String, String>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::DefinitionsParseError {
            path: path.display().to_string(),
            reason: "file not found".to_string(),
        });
    }

    let (content, _) = read_text(path)?;
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();

    let entries = if extension.eq_ignore_ascii_case(definitions_format::JSON) {
        into_entries(serde_json::from_str(&content)?)
    } else if definitions_format::YAML.iter().any(|e| extension.eq_ignore_ascii_case(e)) {
        into_entries(serde_yaml::from_str(&content)?)
    } else {
        parse_properties(&content)
    };

    log::debug!("Read {} entries from '{}'", entries.len(), path.display());
    Ok(entries)
}

/// Loads the placeholder definitions of a run.
pub fn load_definitions<P: AsRef<Path>>(
    path: P,
    diagnostics: &Diagnostics,
) -> Result<Definitions> {
    let path = path.as_ref();
    let entries = read_entries(path)?;
    let definitions = Definitions::from_numbered_keys(&entries, diagnostics);
    log::info!(
        "Loaded {} placeholder definition(s) from '{}'",
        definitions.len(),
        path.display()
    );
    Ok(definitions)
}
