//! Filter list loading
//!
//! Reads user-supplied list files and parses them into [`RuleSource`]s.
//! Path resolution is the caller's job; every path handed in is read as is.

use std::fs;
use std::path::Path;

use jb_core::types::{Provenance, RuleSource};

use crate::error::LoadError;
use crate::parser::parse_filter_list_with_report;

/// Parse the embedded default list.
pub fn bundled_source(text: &str) -> RuleSource {
    parse_source(text, Provenance::Bundled)
}

/// Read a list file as UTF-8 text without parsing it.
pub fn read_list_text(path: &Path) -> Result<String, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|source| LoadError::Encoding {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and parse one user list.
pub fn load_list(path: &Path) -> Result<RuleSource, LoadError> {
    let text = read_list_text(path)?;
    Ok(parse_source(&text, Provenance::User(path.to_path_buf())))
}

/// Read every list, failing on the first one that cannot be loaded.
pub fn load_lists<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<RuleSource>, LoadError> {
    paths.iter().map(|p| load_list(p.as_ref())).collect()
}

/// Read every list that can be read and return the failures separately.
pub fn load_lists_partial<P: AsRef<Path>>(paths: &[P]) -> (Vec<RuleSource>, Vec<LoadError>) {
    let mut sources = Vec::with_capacity(paths.len());
    let mut errors = Vec::new();

    for path in paths {
        match load_list(path.as_ref()) {
            Ok(source) => sources.push(source),
            Err(e) => errors.push(e),
        }
    }

    (sources, errors)
}

fn parse_source(text: &str, provenance: Provenance) -> RuleSource {
    let report = parse_filter_list_with_report(text);

    log::debug!(
        "parsed {}: {} lines, {} rules, {} malformed",
        provenance,
        report.lines,
        report.rules.len(),
        report.skipped.len()
    );
    for skipped in &report.skipped {
        log::debug!("{}:{}: skipped '{}'", provenance, skipped.line_number, skipped.text);
    }

    RuleSource::new(provenance, report.rules)
}
