//! JennieBrowser Core Library
//!
//! This crate provides the rule model and URL matching engine for the
//! JennieBrowser content filter.
//!
//! # Architecture
//!
//! Filter lists are parsed elsewhere into [`Rule`]s and assembled here into an
//! immutable [`FilterSet`]. The [`Matcher`] classifies URLs against a set
//! without mutating it, so one set can be shared by every request thread.
//!
//! # Modules
//!
//! - `types`: Rule, provenance, request and verdict types
//! - `url`: Host/path extraction and separator checks
//! - `filter_set`: Deduplicating filter set assembly
//! - `matcher`: Core request matching engine

pub mod filter_set;
pub mod matcher;
pub mod types;
pub mod url;

// Re-export commonly used types
pub use filter_set::{BuildStats, FilterSet, SetStats};
pub use matcher::{classify, Matcher};
pub use types::{Provenance, RequestContext, RequestType, Rule, RuleKind, RuleSource, Verdict};
