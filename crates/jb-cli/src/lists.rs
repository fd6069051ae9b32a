use std::path::{Path, PathBuf};

use jb_compiler::{parse_filter_list_with_report, read_list_text, LoadError, ParseReport};
use jb_engine::{EngineOptions, FilterEngine, DEFAULT_FILTERS};

/// Build an engine from the default list and the given user lists.
///
/// Unreadable user lists are reported and left out; the bundled list is
/// always active.
pub fn build_engine(inputs: &[PathBuf], enabled: bool) -> FilterEngine {
    let (engine, errors) = FilterEngine::initialize_lenient(DEFAULT_FILTERS, inputs, EngineOptions { enabled });
    for e in &errors {
        eprintln!("Warning: {e}");
    }
    engine
}

/// Parse one list file for linting.
pub fn read_report(path: &Path) -> Result<ParseReport, LoadError> {
    let content = read_list_text(path)?;
    Ok(parse_filter_list_with_report(&content))
}
