use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::ioutils::{deep_copy, remove_path, write_file};

/// A single filesystem change made while materializing templates.
#[derive(Debug)]
pub enum TemplateOperation {
    /// Writes the rendered content of a templated file, already encoded.
    Write { source: PathBuf, target: PathBuf, content: Vec<u8>, target_exists: bool },
    /// Copies a templated directory to one of its concrete names.
    CopyDirectory { source: PathBuf, target: PathBuf, target_exists: bool },
    /// Deletes a templated entry once all of its variants exist.
    Remove { target: PathBuf },
}

impl TemplateOperation {
    /// Returns the target path for this operation, used for error context.
    pub fn target_path(&self) -> &Path {
        match self {
            TemplateOperation::Write { target, .. }
            | TemplateOperation::CopyDirectory { target, .. }
            | TemplateOperation::Remove { target } => target,
        }
    }

    /// Returns a brief description of this operation for error messages.
    ///
    /// # Returns
    /// * `String` - A concise description including the operation type and paths
    pub fn error_context(&self) -> String {
        match self {
            TemplateOperation::Write { source, target, .. } => {
                format!("write '{}' -> '{}'", source.display(), target.display())
            }
            TemplateOperation::CopyDirectory { source, target, .. } => {
                format!("copy directory '{}' -> '{}'", source.display(), target.display())
            }
            TemplateOperation::Remove { target } => {
                format!("remove '{}'", target.display())
            }
        }
    }

    /// Gets a message describing the operation and its status.
    ///
    /// # Returns
    /// * `String` - A descriptive message about the operation
    pub fn get_message(&self) -> String {
        match self {
            TemplateOperation::Write { source, target, target_exists, .. } => {
                if *target_exists {
                    format!(
                        "Writing '{}' from '{}' (replacing existing entry)",
                        target.display(),
                        source.display()
                    )
                } else {
                    format!("Writing '{}' from '{}'", target.display(), source.display())
                }
            }

            TemplateOperation::CopyDirectory { source, target, target_exists } => {
                if *target_exists {
                    format!(
                        "Copying directory '{}' to '{}' (replacing existing entry)",
                        source.display(),
                        target.display()
                    )
                } else {
                    format!(
                        "Copying directory '{}' to '{}'",
                        source.display(),
                        target.display()
                    )
                }
            }

            TemplateOperation::Remove { target } => {
                format!("Removing template '{}'", target.display())
            }
        }
    }

    /// Performs the operation. An existing target is deleted first.
    ///
    /// I/O failures carry both the template path and the target path.
    pub fn execute(&self) -> Result<()> {
        log::debug!("Executing operation: {}", self.error_context());
        match self {
            TemplateOperation::Write { source, target, content, target_exists } => {
                replace_target(source, target, *target_exists, |target| {
                    write_file(content, target)
                })
            }
            TemplateOperation::CopyDirectory { source, target, target_exists } => {
                replace_target(source, target, *target_exists, |target| {
                    deep_copy(source, target)
                })
            }
            TemplateOperation::Remove { target } => remove_path(target),
        }
    }
}

fn replace_target<F>(source: &Path, target: &Path, target_exists: bool, create: F) -> Result<()>
where
    F: FnOnce(&Path) -> Result<()>,
{
    let result = if target_exists {
        remove_path(target).and_then(|()| create(target))
    } else {
        create(target)
    };
    result.map_err(|err| match err {
        Error::IoError(e) => Error::WriteError {
            source_path: source.display().to_string(),
            target_path: target.display().to_string(),
            e,
        },
        other => other,
    })
}
