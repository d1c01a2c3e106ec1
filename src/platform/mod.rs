//! Platform detection utilities for the entire application.
//!
//! Path-separator and executable-extension handling is parameterized on an
//! environment snapshot so the search logic stays testable on every host.

pub mod file_ops;

mod constants;

pub use constants::{
    comspec, executable_extensions, has_batch_extension, has_native_extension, is_windows,
    path_separator, strip_quotes,
};
