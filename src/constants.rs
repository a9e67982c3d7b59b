//! Constants used throughout the filetemplate application

/// Suffix marking a file or directory as a template
pub const DEFAULT_TEMPLATE_SUFFIX: &str = ".filetemplate";

/// Key prefix of a placeholder name in a definitions file (`Placeholder1`, `Placeholder2`, ...)
pub const PLACEHOLDER_KEY_PREFIX: &str = "Placeholder";

/// Key suffix of a placeholder value declaration (`Placeholder1Value`, ...)
pub const PLACEHOLDER_VALUE_KEY_SUFFIX: &str = "Value";

/// Deepest BEGIN/END nesting accepted in a single file
pub const MAX_BLOCK_NESTING: usize = 128;

/// Definitions file extensions handled by serde instead of the properties reader
pub mod definitions_format {
    pub const JSON: &str = "json";
    pub const YAML: &[&str] = &["yaml", "yml"];
}

/// Exit codes
pub mod exit_codes {
    pub const FAILURE: i32 = 1;
}

/// Verbosity levels
pub mod verbosity {
    pub const OFF: u8 = 0;
    pub const INFO: u8 = 1;
    pub const DEBUG: u8 = 2;
    pub const TRACE: u8 = 3;
}
