use std::fs;
use std::path::{Path, MAIN_SEPARATOR};

use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::ext::PathExt;
use crate::ioutils::{read_text, sorted_entries, TextEncoding};
use crate::placeholder::Definitions;

use super::block::BlockTree;
use super::context::Context;
use super::names::{NameEnumerator, NameExpansion};
use super::operation::TemplateOperation;

/// Materializes templated entries next to their templates.
///
/// For every entry whose name carries the template suffix, one concrete
/// sibling is produced per name the [`NameEnumerator`] yields. Files are
/// rendered through a [`BlockTree`]; directories are copied and their copy
/// is processed with the selected values fixed. Entries without the suffix
/// are left alone, though directories are still descended into.
pub struct TemplateProcessor<'a> {
    definitions: &'a Definitions,
    config: &'a Config,
    diagnostics: &'a Diagnostics,
}

impl<'a> TemplateProcessor<'a> {
    pub fn new(
        definitions: &'a Definitions,
        config: &'a Config,
        diagnostics: &'a Diagnostics,
    ) -> Self {
        Self { definitions, config, diagnostics }
    }

    /// Processes every entry of `dir`. A failing entry is reported and its
    /// siblings are processed regardless.
    ///
    /// # Arguments
    /// * `dir` - The directory whose entries are processed
    /// * `context` - Values fixed by the enclosing scope
    /// * `in_copy` - Whether `dir` is a copy, in which templated entries are
    ///   removed once their variants exist
    pub fn process_dir_content(&self, dir: &Path, context: &Context, in_copy: bool) -> Result<()> {
        for entry in sorted_entries(dir)? {
            if let Err(e) = self.process_entry(&entry, context, in_copy) {
                self.diagnostics.error(e);
            }
        }
        Ok(())
    }

    /// Processes a single file or directory.
    ///
    /// # Arguments
    /// * `entry` - The entry to process
    /// * `context` - Values fixed by the enclosing scope
    /// * `in_copy` - Whether the entry lives in a copy made by this run
    ///
    /// # Returns
    /// * `Result<()>` - Errors that stop processing of this entry
    pub fn process_entry(&self, entry: &Path, context: &Context, in_copy: bool) -> Result<()> {
        if fs::symlink_metadata(entry).is_err() {
            return Err(Error::SourceMissing { path: entry.display().to_string() });
        }

        let file_name = entry.file_name_checked()?;
        match self.config.template_name(file_name) {
            Some(template_name) => self.expand_entry(entry, template_name, context, in_copy),
            None if entry.is_dir() => {
                log::debug!("Descending into '{}'", entry.display());
                self.process_dir_content(entry, context, in_copy)
            }
            None => {
                log::debug!("Leaving '{}' unchanged", entry.display());
                Ok(())
            }
        }
    }

    /// Writes one variant per concrete name of a templated entry.
    fn expand_entry(
        &self,
        source: &Path,
        template_name: &str,
        context: &Context,
        in_copy: bool,
    ) -> Result<()> {
        // Files are parsed up front so a malformed one produces no output.
        let tree = if source.is_dir() {
            None
        } else {
            let (content, encoding) = read_text(source)?;
            let tree = BlockTree::parse(content.lines(), self.diagnostics).map_err(|e| {
                Error::ProcessError { source_path: source.display().to_string(), e: e.to_string() }
            })?;
            Some((tree, encoding))
        };

        let mut produced = 0;
        let names = NameEnumerator::new(template_name, self.definitions, context, self.diagnostics);
        for expansion in names {
            produced += 1;
            if let Err(e) = self.materialize(source, &expansion, tree.as_ref()) {
                self.diagnostics.error(e);
            }
        }
        log::debug!("'{}' expanded to {produced} name(s)", source.display());

        if in_copy && produced > 0 {
            let operation = TemplateOperation::Remove { target: source.to_path_buf() };
            operation.execute()?;
            log::info!("{}", operation.get_message());
        }
        Ok(())
    }

    fn materialize(
        &self,
        source: &Path,
        expansion: &NameExpansion,
        tree: Option<&(BlockTree, TextEncoding)>,
    ) -> Result<()> {
        validate_rendered_name(source, &expansion.name)?;
        let target = source.with_file_name(&expansion.name);
        let target_exists = fs::symlink_metadata(&target).is_ok();
        if target_exists {
            self.diagnostics.warn(format!(
                "'{}' already exists and is replaced by a variant of '{}'",
                target.display(),
                source.display()
            ));
        }

        let operation = match tree {
            Some((tree, encoding)) => TemplateOperation::Write {
                source: source.to_path_buf(),
                target: target.clone(),
                content: self.encode(
                    source,
                    tree.render(self.definitions, &expansion.context, self.diagnostics),
                    *encoding,
                ),
                target_exists,
            },
            None => TemplateOperation::CopyDirectory {
                source: source.to_path_buf(),
                target: target.clone(),
                target_exists,
            },
        };
        operation.execute()?;
        log::info!("{}", operation.get_message());

        if tree.is_none() {
            self.process_dir_content(&target, &expansion.context, true)?;
        }
        Ok(())
    }

    /// Writes variants in the encoding their template was read in. Content
    /// that encoding cannot hold falls back to UTF-8.
    fn encode(&self, source: &Path, content: String, encoding: TextEncoding) -> Vec<u8> {
        match encoding.encode(&content) {
            Some(bytes) => bytes,
            None => {
                self.diagnostics.warn(format!(
                    "A variant of '{}' holds characters outside ISO-8859-1 and is written as UTF-8",
                    source.display()
                ));
                content.into_bytes()
            }
        }
    }
}

/// Rejects names that would escape the template's directory or could not
/// name an entry at all.
fn validate_rendered_name(template: &Path, name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains(MAIN_SEPARATOR);
    if invalid {
        return Err(Error::InvalidRenderedName {
            template: template.display().to_string(),
            name: name.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use tempfile::TempDir;

    use super::*;

    fn definitions() -> Definitions {
        [("SITE", "Acme"), ("LANG", "[de, en]"), ("N", "[1-2]")].into_iter().collect()
    }

    fn process(root: &Path, definitions: &Definitions, in_copy: bool) -> Diagnostics {
        let (config, diagnostics) = (Config::default(), Diagnostics::new());
        TemplateProcessor::new(definitions, &config, &diagnostics)
            .process_dir_content(root, &Context::new(), in_copy)
            .unwrap();
        diagnostics
    }

    fn read(path: &Path) -> String {
        fs::read_to_string(path).unwrap()
    }

    /// The template structure
    /// template_root/
    ///   {{@LANG@}}.txt.filetemplate
    ///
    /// Expected output
    /// template_root/
    ///   {{@LANG@}}.txt.filetemplate
    ///   de.txt
    ///   en.txt
    #[test]
    fn templated_file_is_written_once_per_value() {
        let root = TempDir::new().unwrap();
        let template = root.path().join("{{@LANG@}}.txt.filetemplate");
        fs::write(&template, "{{@SITE@}} speaks {{@LANG@}}\n").unwrap();

        let diagnostics = process(root.path(), &definitions(), false);

        assert_eq!(read(&root.path().join("de.txt")), "Acme speaks de\n");
        assert_eq!(read(&root.path().join("en.txt")), "Acme speaks en\n");
        assert!(template.exists());
        assert!(!diagnostics.has_errors());
    }

    /// The template structure
    /// template_root/
    ///   site-{{@N@}}.filetemplate/
    ///     {{@LANG@}}.filetemplate
    ///
    /// Expected output (in a copy)
    /// template_root/
    ///   site-1/de, site-1/en, site-2/de, site-2/en
    #[test]
    fn templated_directory_fixes_values_for_its_content() {
        let root = TempDir::new().unwrap();
        let template_dir = root.path().join("site-{{@N@}}.filetemplate");
        fs::create_dir_all(&template_dir).unwrap();
        fs::write(template_dir.join("{{@LANG@}}.filetemplate"), "{{@N@}}/{{@LANG@}}\n").unwrap();

        let diagnostics = process(root.path(), &definitions(), true);

        assert_eq!(read(&root.path().join("site-1/de")), "1/de\n");
        assert_eq!(read(&root.path().join("site-2/en")), "2/en\n");
        assert!(!root.path().join("site-1/{{@LANG@}}.filetemplate").exists());
        assert!(!template_dir.exists());
        assert!(!diagnostics.has_errors());
    }

    #[test]
    fn untemplated_entries_are_left_alone() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("plain")).unwrap();
        fs::write(root.path().join("plain/{{@SITE@}}.txt"), "{{@SITE@}}").unwrap();
        fs::write(root.path().join("plain/name.filetemplate"), "{{@SITE@}}\n").unwrap();

        let diagnostics = process(root.path(), &definitions(), false);

        assert_eq!(read(&root.path().join("plain/{{@SITE@}}.txt")), "{{@SITE@}}");
        assert_eq!(read(&root.path().join("plain/name")), "Acme\n");
        assert!(!diagnostics.has_errors());
    }

    #[test]
    fn latin1_template_is_written_in_latin1() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("{{@SITE@}}.txt.filetemplate"), b"Gr\xfc\xdfe {{@SITE@}}\n")
            .unwrap();

        let diagnostics = process(root.path(), &definitions(), false);

        assert_eq!(fs::read(root.path().join("Acme.txt")).unwrap(), b"Gr\xfc\xdfe Acme\n");
        assert!(!diagnostics.has_errors());
    }

    #[test]
    fn latin1_template_with_wider_values_falls_back_to_utf8() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("price.filetemplate"), b"\xa3 {{@CUR@}}\n").unwrap();

        let definitions: Definitions = [("CUR", "€")].into_iter().collect();
        let diagnostics = process(root.path(), &definitions, false);

        assert_eq!(read(&root.path().join("price")), "£ €\n");
        assert_eq!(diagnostics.warning_count(), 1);
        assert!(!diagnostics.has_errors());
    }

    #[test]
    fn existing_target_is_replaced_with_a_warning() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("{{@SITE@}}.filetemplate"), "new\n").unwrap();
        fs::write(root.path().join("Acme"), "old").unwrap();

        let diagnostics = process(root.path(), &definitions(), false);

        assert_eq!(read(&root.path().join("Acme")), "new\n");
        assert_eq!(diagnostics.warning_count(), 1);
    }

    #[test]
    fn malformed_file_produces_no_output() {
        let root = TempDir::new().unwrap();
        fs::write(
            root.path().join("{{@SITE@}}.filetemplate"),
            "{{@A@#BEGIN@}} line {{@B@#END@}}\n",
        )
        .unwrap();
        fs::write(root.path().join("ok.filetemplate"), "fine\n").unwrap();

        let diagnostics = process(root.path(), &definitions(), false);

        assert!(!root.path().join("Acme").exists());
        assert_eq!(read(&root.path().join("ok")), "fine\n");
        assert_eq!(diagnostics.error_count(), 1);
    }

    #[test]
    fn rendered_name_with_separator_is_rejected() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("{{@P@}}.filetemplate"), "x\n").unwrap();

        let definitions: Definitions = [("P", "../escape")].into_iter().collect();
        let diagnostics = process(root.path(), &definitions, true);

        let errors = diagnostics.take_errors();
        assert!(matches!(&errors[..], [Error::InvalidRenderedName { name, .. }] if name == "../escape"));
        assert!(!root.path().parent().unwrap().join("escape").exists());
    }

    #[test]
    fn missing_entry_is_an_error() {
        let root = TempDir::new().unwrap();
        let (definitions, config, diagnostics) =
            (definitions(), Config::default(), Diagnostics::new());
        let processor = TemplateProcessor::new(&definitions, &config, &diagnostics);
        let result =
            processor.process_entry(&root.path().join("gone"), &Context::new(), false);
        assert!(matches!(result, Err(Error::SourceMissing { .. })));
    }

    #[test]
    fn validates_rendered_names() {
        let template = Path::new("t.filetemplate");
        assert!(validate_rendered_name(template, "ok.txt").is_ok());
        for name in ["", ".", "..", "a/b"] {
            assert!(validate_rendered_name(template, name).is_err(), "{name:?}");
        }
    }
}
