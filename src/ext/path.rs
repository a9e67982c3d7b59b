use std::path::Path;

use crate::error::{Error, Result};

/// Extension trait for Path to provide checked string conversions
pub trait PathExt {
    /// Converts a path to a string slice, returning an error if the path contains invalid Unicode characters.
    ///
    /// # Returns
    /// * `Ok(&str)` - A string slice representing the path
    /// * `Err(Error)` - If the path contains invalid Unicode characters
    ///
    /// # Examples
    /// ```
    /// use filetemplate::ext::PathExt;
    /// use std::path::Path;
    ///
    /// let path = Path::new("test");
    /// assert_eq!(path.to_str_checked().unwrap(), "test");
    /// ```
    fn to_str_checked(&self) -> Result<&str>;

    /// The last component of the path as a string slice.
    ///
    /// Fails for paths without a final component (`/`, `..`) as well as
    /// for names that are not valid Unicode.
    ///
    /// # Examples
    /// ```
    /// use filetemplate::ext::PathExt;
    /// use std::path::Path;
    ///
    /// let path = Path::new("site/{{@LANG@}}.filetemplate");
    /// assert_eq!(path.file_name_checked().unwrap(), "{{@LANG@}}.filetemplate");
    /// ```
    fn file_name_checked(&self) -> Result<&str>;
}

impl PathExt for Path {
    fn to_str_checked(&self) -> Result<&str> {
        self.to_str()
            .ok_or_else(|| Error::InvalidPathEncoding { path: self.display().to_string() })
    }

    fn file_name_checked(&self) -> Result<&str> {
        self.file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| Error::InvalidPathEncoding { path: self.display().to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_to_str_checked_valid() {
        let path = Path::new("valid_path");
        assert_eq!(path.to_str_checked().unwrap(), "valid_path");
    }

    #[test]
    fn test_file_name_checked() {
        let path = Path::new("root/dir/{{@A@}}.filetemplate");
        assert_eq!(path.file_name_checked().unwrap(), "{{@A@}}.filetemplate");
    }

    #[test]
    fn test_file_name_checked_without_name() {
        let path = Path::new("/");
        assert!(matches!(
            path.file_name_checked(),
            Err(Error::InvalidPathEncoding { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_to_str_checked_invalid_unicode() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new(OsStr::from_bytes(b"bad\xffname"));
        assert!(path.to_str_checked().is_err());
        assert!(path.file_name_checked().is_err());
    }
}
