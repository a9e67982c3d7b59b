use filetemplate::cli::{Cli, Commands, ReplaceArgs, Runner};
use filetemplate::constants::DEFAULT_TEMPLATE_SUFFIX;
use log::debug;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Relative paths of all files below `dir`, sorted.
fn relative_files(dir: &Path) -> BTreeSet<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().strip_prefix(dir).unwrap().to_path_buf())
        .collect()
}

/// Prints a diff of files and their contents between two directories.
/// Shows files only present in one directory and content differences for files present in both.
///
/// # Arguments
/// * `actual` - The produced output directory.
/// * `expected` - The directory with the expected output.
pub fn print_dir_diff(actual: &Path, expected: &Path) {
    let actual_files = relative_files(actual);
    let expected_files = relative_files(expected);

    println!("\n=== Directory Comparison ===");
    println!("Actual output:   {}", actual.display());
    println!("Expected output: {}", expected.display());

    for file in actual_files.difference(&expected_files) {
        println!("  + {}", file.display());
    }
    for file in expected_files.difference(&actual_files) {
        println!("  - {}", file.display());
    }
    for file in actual_files.intersection(&expected_files) {
        let produced = fs::read_to_string(actual.join(file)).unwrap_or_default();
        let wanted = fs::read_to_string(expected.join(file)).unwrap_or_default();
        if produced != wanted {
            println!("\n  File: {}", file.display());
            println!("  --- Actual content:\n{produced}");
            println!("  --- Expected content:\n{wanted}");
        }
    }
    println!("=== End of Comparison ===\n");
}

/// Runs a replace with the given template and definitions into a fresh output directory,
/// compares the output to the expected directory, prints any differences, and asserts that
/// the directories are identical.
///
/// # Arguments
/// * `template` - Path to the template directory.
/// * `definitions` - Path to the definitions file.
/// * `expected_dir` - Path to the directory with expected output.
pub fn run_and_assert(template: &str, definitions: &str, expected_dir: &str) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let output_dir = tmp_dir.path().join("out");
    run_replace(template, definitions, Some(output_dir.clone())).unwrap();

    let result = dir_diff::is_different(&output_dir, expected_dir);
    match result {
        Ok(different) => {
            if different {
                print_dir_diff(&output_dir, expected_dir.as_ref());
                panic!("Directories differ. See above for details.");
            }
        }
        Err(e) => {
            debug!("Error comparing directories: {e}");
        }
    }
    assert!(!dir_diff::is_different(&output_dir, expected_dir).unwrap());
}

/// Runs a replace and returns the run result together with everything it printed.
pub fn run_replace(
    template: impl AsRef<Path>,
    definitions: impl AsRef<Path>,
    output_dir: Option<PathBuf>,
) -> filetemplate::error::Result<String> {
    let cli = Cli {
        command: Commands::Replace(ReplaceArgs {
            directory: template.as_ref().to_path_buf(),
            definitions: definitions.as_ref().to_path_buf(),
            output_dir,
            force: false,
        }),
        verbose: 2,
        suffix: DEFAULT_TEMPLATE_SUFFIX.to_string(),
    };
    let mut out = Vec::new();
    Runner::new(cli).run_with_output(&mut out)?;
    Ok(String::from_utf8(out).unwrap())
}
