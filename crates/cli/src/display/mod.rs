pub mod formatter;

pub use formatter::{print_diagnostics, print_issues, print_targets, print_targets_json};
