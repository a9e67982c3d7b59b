/// Handles argument parsing and command dispatch.
pub mod cli;

/// Run configuration.
pub mod config;

/// Constants used throughout the application.
pub mod constants;

/// The reporting sink shared by a run.
pub mod diagnostics;

/// Defines custom error types.
pub mod error;

/// Extension traits for standard library types.
pub mod ext;

/// A set of helpers for working with the file system.
pub mod ioutils;

/// Placeholder grammar, value spaces and definitions.
pub mod placeholder;

/// Core template processing.
pub mod template;
