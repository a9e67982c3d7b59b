//! Enumerate-only mode: collects the placeholder names a template tree
//! refers to without writing anything.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::ioutils::read_text;
use crate::placeholder::grammar::referenced_names;
use crate::placeholder::Definitions;

/// Placeholder names found in a template tree, each with the paths that
/// refer to it. Names are sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    references: BTreeMap<String, BTreeSet<PathBuf>>,
}

impl Listing {
    /// Scans `root` and everything below it.
    ///
    /// Directory names are scanned whether or not they carry the template
    /// suffix; files are scanned, name and content, only when they do. A
    /// file that cannot be read is reported and skipped.
    pub fn scan<P: AsRef<Path>>(root: P, config: &Config, diagnostics: &Diagnostics) -> Result<Self> {
        let root = root.as_ref();
        if !root.exists() {
            return Err(Error::TemplateDoesNotExistsError {
                template_dir: root.display().to_string(),
            });
        }

        let mut listing = Listing::default();
        for dir_entry in WalkDir::new(root).sort_by_file_name() {
            let dir_entry = match dir_entry {
                Ok(dir_entry) => dir_entry,
                Err(e) => {
                    diagnostics.error(e.into());
                    continue;
                }
            };
            let path = dir_entry.path();
            let Some(file_name) = dir_entry.file_name().to_str() else {
                diagnostics.error(Error::InvalidPathEncoding { path: path.display().to_string() });
                continue;
            };
            let template_name = config.template_name(file_name);

            if dir_entry.file_type().is_dir() {
                listing.record_line(template_name.unwrap_or(file_name), path);
            } else if let Some(template_name) = template_name {
                listing.record_line(template_name, path);
                if let Err(e) = listing.record_content(path) {
                    diagnostics.error(e);
                }
            }
        }

        log::info!("Found {} placeholder name(s) below '{}'", listing.len(), root.display());
        Ok(listing)
    }

    /// Scans line by line, as replacement substitutes. Lines ending in a
    /// backslash are not joined with the next one.
    fn record_content(&mut self, path: &Path) -> Result<()> {
        let (content, _) = read_text(path)?;
        for line in content.lines() {
            self.record_line(line, path);
        }
        Ok(())
    }

    fn record_line(&mut self, line: &str, path: &Path) {
        for name in referenced_names(line) {
            self.references.entry(name.to_string()).or_default().insert(path.to_path_buf());
        }
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.references.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.references.keys().map(String::as_str)
    }

    /// Paths referring to `name`, sorted.
    pub fn paths(&self, name: &str) -> impl Iterator<Item = &Path> {
        self.references.get(name).into_iter().flatten().map(PathBuf::as_path)
    }

    /// Referenced names without a definition.
    pub fn undeclared<'l>(&'l self, definitions: &Definitions) -> Vec<&'l str> {
        self.names().filter(|name| !definitions.contains(name)).collect()
    }

    /// Defined names that nothing refers to, in declaration order.
    pub fn unused<'d>(&self, definitions: &'d Definitions) -> Vec<&'d str> {
        definitions.names().filter(|name| !self.contains(name)).collect()
    }
}
