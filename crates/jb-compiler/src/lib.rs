//! JennieBrowser Filter List Compiler
//!
//! This crate turns filter-list text and files into rule sources for the
//! core filter set.

pub mod error;
pub mod loader;
pub mod parser;

pub use error::LoadError;
pub use loader::{bundled_source, load_list, load_lists, load_lists_partial, read_list_text};
pub use parser::{parse_filter_list, parse_filter_list_with_report, parse_line, LineOutcome, ParseReport, SkippedLine};
