//! The reporting sink shared by every stage of a run.
//!
//! Nothing reported here aborts processing: the stage that reports stops
//! working on the current file or branch, and its siblings carry on.

use std::cell::{Cell, RefCell};
use std::fmt::Display;

use crate::error::Error;

/// Collects warnings and errors while forwarding them to the `log` facade.
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: RefCell<Vec<Error>>,
    warnings: Cell<usize>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&self, message: impl Display) {
        log::warn!("{message}");
        self.warnings.set(self.warnings.get() + 1);
    }

    pub fn error(&self, err: Error) {
        log::error!("{err}");
        self.errors.borrow_mut().push(err);
    }

    pub fn error_count(&self) -> usize {
        self.errors.borrow().len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.get()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.borrow().is_empty()
    }

    /// Drains the errors reported so far.
    pub fn take_errors(&self) -> Vec<Error> {
        self.errors.take()
    }
}
