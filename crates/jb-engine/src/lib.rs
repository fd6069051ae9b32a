//! JennieBrowser Filter Engine
//!
//! The facade handed to the request-interception layer. It owns the active
//! filter set and the enabled flag and exposes initialize, reload, toggle
//! and classify.

mod engine;

pub use engine::{EngineOptions, FilterEngine, DEFAULT_FILTERS};
pub use jb_compiler::LoadError;
pub use jb_core::{BuildStats, FilterSet, Provenance, RequestContext, RequestType, Rule, SetStats, Verdict};
