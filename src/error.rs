use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}.")]
    IoError(#[from] std::io::Error),

    #[error("Failed to walk the template tree. Original error: {0}")]
    WalkDirError(#[from] walkdir::Error),

    #[error("Failed to parse JSON definitions. Original error: {0}")]
    JSONParseError(#[from] serde_json::Error),

    #[error("Failed to parse YAML definitions. Original error: {0}")]
    YAMLParseError(#[from] serde_yaml::Error),

    #[error("Definitions file '{path}' is invalid: {reason}.")]
    DefinitionsParseError { path: String, reason: String },

    #[error("Configuration error: {0}.")]
    ConfigValidation(String),

    /// `Placeholder<k>` is declared but `Placeholder<k>Value` is missing.
    #[error("No {key}Value found for {key}.")]
    MissingPlaceholderValue { key: String },

    #[error("END of placeholder \"{name}\" at line {line} has no matching BEGIN.")]
    UnmatchedEnd { name: String, line: usize },

    #[error("Found END of placeholder \"{found}\" at line {line} where END of placeholder \"{expected}\" was expected.")]
    MismatchedEnd { expected: String, found: String, line: usize },

    #[error("Missing END for placeholder \"{name}\".")]
    UnterminatedBlock { name: String },

    #[error("BEGIN of placeholder \"{name}\" at line {line} exceeds the nesting limit of {limit}.")]
    NestingTooDeep { name: String, line: usize, limit: usize },

    #[error("Placeholder \"{name}\" is not defined, ignoring it.")]
    UndeclaredPlaceholder { name: String },

    #[error("No definition for used placeholder \"{name}\".")]
    UndeclaredBlockPlaceholder { name: String },

    #[error("Placeholder \"{name}\" has multiple values and is used outside a BEGIN/END section without a fixed value, ignoring it.")]
    UnboundMultiValue { name: String },

    #[error("Placeholder \"{name}\" has an unusable value declaration: {declaration:?}.")]
    UnclassifiedDefinition { name: String, declaration: String },

    #[error("Value \"{value}\" is not a member of placeholder \"{name}\", cannot number it from base {base}.")]
    OffsetLookup { name: String, value: String, base: String },

    #[error("Cannot proceed: template directory '{template_dir}' does not exist.")]
    TemplateDoesNotExistsError { template_dir: String },

    #[error("File or directory '{path}' does not exist.")]
    SourceMissing { path: String },

    #[error("Cannot proceed: output directory '{output_dir}' already exists. Use --force to overwrite it.")]
    OutputDirectoryExistsError { output_dir: String },

    #[error("Cannot proceed: output directory '{output_dir}' lies inside template directory '{template_dir}'.")]
    OutputInsideTemplate { output_dir: String, template_dir: String },

    #[error("Path '{path}' contains invalid Unicode characters.")]
    InvalidPathEncoding { path: String },

    #[error("Template '{template}' expands to the invalid name \"{name}\".")]
    InvalidRenderedName { template: String, name: String },

    #[error("'{source_path}' --> '{target_path}': {e}")]
    WriteError { source_path: String, target_path: String, e: std::io::Error },

    #[error("Cannot process the source path: '{source_path}'. Original error: {e}")]
    ProcessError { source_path: String, e: String },

    #[error("Template expansion finished with {errors} error(s).")]
    CompletedWithErrors { errors: usize },
}

/// Convenience type alias for Results with filetemplate's Error as the error type.
///
/// # Type Parameters
/// * `T` - The type of the success value
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the error stems from BEGIN/END structure of a file rather than
    /// from definitions or the filesystem.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Error::UnmatchedEnd { .. }
                | Error::MismatchedEnd { .. }
                | Error::UnterminatedBlock { .. }
                | Error::NestingTooDeep { .. }
        )
    }
}

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{}", err);
    std::process::exit(crate::constants::exit_codes::FAILURE);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_errors_are_classified() {
        let unmatched = Error::UnmatchedEnd { name: "A".into(), line: 3 };
        let undeclared = Error::UndeclaredPlaceholder { name: "A".into() };
        assert!(unmatched.is_structural());
        assert!(!undeclared.is_structural());
    }

    #[test]
    fn mismatched_end_message_names_both_placeholders() {
        let err = Error::MismatchedEnd {
            expected: "A".into(),
            found: "B".into(),
            line: 7,
        };
        let message = err.to_string();
        assert!(message.contains("\"B\""));
        assert!(message.contains("\"A\""));
        assert!(message.contains("line 7"));
    }
}
