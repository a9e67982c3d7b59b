use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Ensures the output directory is safe to materialize into.
///
/// An existing directory is refused unless `force` is set, in which case it
/// is deleted. A directory inside the template tree is always refused, since
/// copying the tree into it would recurse.
pub fn get_output_dir<P: AsRef<Path>, T: AsRef<Path>>(
    output_dir: P,
    template_dir: T,
    force: bool,
) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    let template_dir = template_dir.as_ref();

    let template_abs = std::fs::canonicalize(template_dir)?;
    if absolute(output_dir).starts_with(&template_abs) {
        return Err(Error::OutputInsideTemplate {
            output_dir: output_dir.display().to_string(),
            template_dir: template_dir.display().to_string(),
        });
    }

    if output_dir.exists() {
        if !force {
            return Err(Error::OutputDirectoryExistsError {
                output_dir: output_dir.display().to_string(),
            });
        }
        log::warn!("Removing existing output directory '{}'", output_dir.display());
        remove_path(output_dir)?;
    }
    Ok(output_dir.to_path_buf())
}

/// Best-effort absolute form of a path that may not exist yet.
fn absolute(path: &Path) -> PathBuf {
    if let Ok(resolved) = std::fs::canonicalize(path) {
        return resolved;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
            absolute(parent).join(name)
        }
        _ => std::env::current_dir().unwrap_or_default().join(path),
    }
}

pub fn create_dir_all<P: AsRef<Path>>(dest_path: P) -> Result<()> {
    let dest_path = dest_path.as_ref();
    std::fs::create_dir_all(dest_path).map_err(Error::IoError)
}

pub fn write_file<C: AsRef<[u8]>, P: AsRef<Path>>(content: C, dest_path: P) -> Result<()> {
    let dest_path = dest_path.as_ref();
    if let Some(parent) = dest_path.parent() {
        create_dir_all(parent)?;
    }
    std::fs::write(dest_path, content).map_err(Error::IoError)
}

/// Character encoding a text file was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    /// ISO-8859-1, assumed for any content that is not valid UTF-8.
    Latin1,
}

impl TextEncoding {
    /// Encodes `text` back into this encoding. `None` when a character has
    /// no ISO-8859-1 code point.
    pub fn encode(self, text: &str) -> Option<Vec<u8>> {
        match self {
            TextEncoding::Utf8 => Some(text.as_bytes().to_vec()),
            TextEncoding::Latin1 => text.chars().map(|c| u8::try_from(c).ok()).collect(),
        }
    }
}

/// Reads a whole text file. Content that is not valid UTF-8 is decoded as
/// ISO-8859-1, which maps every byte to one character and never fails.
pub fn read_text<P: AsRef<Path>>(path: P) -> Result<(String, TextEncoding)> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| Error::ProcessError {
        source_path: path.display().to_string(),
        e: e.to_string(),
    })?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok((text, TextEncoding::Utf8)),
        Err(err) => {
            log::debug!("'{}' is not valid UTF-8, reading it as ISO-8859-1", path.display());
            let text = err.into_bytes().into_iter().map(char::from).collect();
            Ok((text, TextEncoding::Latin1))
        }
    }
}

/// Copies `source_path` and everything below it to `dest_path`.
pub fn deep_copy<P: AsRef<Path>, Q: AsRef<Path>>(source_path: P, dest_path: Q) -> Result<()> {
    let source_path = source_path.as_ref();
    let dest_path = dest_path.as_ref();

    for dir_entry in WalkDir::new(source_path).sort_by_file_name() {
        let dir_entry = dir_entry?;
        let relative = dir_entry.path().strip_prefix(source_path).map_err(|e| {
            Error::ProcessError {
                source_path: dir_entry.path().display().to_string(),
                e: e.to_string(),
            }
        })?;
        let target = dest_path.join(relative);

        if dir_entry.file_type().is_dir() {
            create_dir_all(&target)?;
        } else {
            std::fs::copy(dir_entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Deletes a file or a whole directory tree.
pub fn remove_path<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if path.is_dir() {
        std::fs::remove_dir_all(path).map_err(Error::IoError)
    } else {
        std::fs::remove_file(path).map_err(Error::IoError)
    }
}

/// Lists the entries of a directory sorted by file name.
///
/// The listing is taken before any entry is processed, so variants written
/// next to their template are never picked up as new entries.
pub fn sorted_entries<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut entries = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();
    Ok(entries)
}
