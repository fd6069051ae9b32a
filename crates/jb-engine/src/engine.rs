use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use jb_compiler::{bundled_source, load_lists, load_lists_partial, LoadError};
use jb_core::{BuildStats, FilterSet, Matcher, Provenance, RequestContext, Rule, RuleSource, SetStats, Verdict};

/// Default filter list compiled into the binary.
pub const DEFAULT_FILTERS: &str = include_str!("../resources/default_filters.txt");

#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// Whether classification blocks at all. Defaults to true.
    pub enabled: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Owns the active filter set and the enabled flag.
///
/// The active set is an immutable snapshot. `classify` loads it without
/// locking; `reload` builds a complete replacement and publishes it with a
/// single swap, so in-flight calls finish against the set they started with.
pub struct FilterEngine {
    active: ArcSwap<FilterSet>,
    enabled: AtomicBool,
    bundled: RuleSource,
}

impl FilterEngine {
    /// Build an engine from the bundled list text plus user list files.
    pub fn initialize<P: AsRef<Path>>(bundled_text: &str, user_paths: &[P]) -> Result<Self, LoadError> {
        Self::initialize_with_options(bundled_text, user_paths, EngineOptions::default())
    }

    pub fn initialize_with_options<P: AsRef<Path>>(
        bundled_text: &str,
        user_paths: &[P],
        options: EngineOptions,
    ) -> Result<Self, LoadError> {
        let user = load_lists(user_paths)?;
        Ok(Self::from_sources(bundled_source(bundled_text), user, options))
    }

    /// Build an engine from the embedded default list plus user list files.
    pub fn with_default_list<P: AsRef<Path>>(user_paths: &[P]) -> Result<Self, LoadError> {
        Self::initialize(DEFAULT_FILTERS, user_paths)
    }

    /// Build an engine from the bundled list and every readable user list.
    ///
    /// Lists that cannot be read are returned instead of failing the whole
    /// engine, so a bad user file never turns blocking off.
    pub fn initialize_lenient<P: AsRef<Path>>(
        bundled_text: &str,
        user_paths: &[P],
        options: EngineOptions,
    ) -> (Self, Vec<LoadError>) {
        let (user, errors) = load_lists_partial(user_paths);
        for e in &errors {
            log::warn!("{e}; continuing without it");
        }
        (Self::from_sources(bundled_source(bundled_text), user, options), errors)
    }

    fn from_sources(bundled: RuleSource, user: Vec<RuleSource>, options: EngineOptions) -> Self {
        let set = assemble(&bundled, user);
        log::info!(
            "filter engine initialized with {} rules (enabled: {})",
            set.len(),
            options.enabled
        );

        Self {
            active: ArcSwap::from_pointee(set),
            enabled: AtomicBool::new(options.enabled),
            bundled,
        }
    }

    /// Re-read the user lists and replace the active set.
    ///
    /// All-or-nothing: if any path fails, the previous set stays active.
    pub fn reload<P: AsRef<Path>>(&self, user_paths: &[P]) -> Result<(), LoadError> {
        let user = load_lists(user_paths)?;
        let set = assemble(&self.bundled, user);
        log::info!("filter engine reloaded with {} rules", set.len());
        self.active.store(Arc::new(set));
        Ok(())
    }

    /// Enable or disable blocking. Takes effect on the next classification.
    pub fn toggle(&self, enabled: bool) {
        let previous = self.enabled.swap(enabled, Ordering::Relaxed);
        if previous != enabled {
            log::info!("filter engine {}", if enabled { "enabled" } else { "disabled" });
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Classify a URL against the active set.
    pub fn classify(&self, url: &str) -> Verdict {
        if !self.is_enabled() {
            return Verdict::Allow;
        }
        let set = self.active.load();
        Matcher::new(&set).classify(url)
    }

    /// Classify a request, honoring media and speculation exemptions.
    pub fn classify_request(&self, ctx: &RequestContext<'_>) -> Verdict {
        if !self.is_enabled() {
            return Verdict::Allow;
        }
        let set = self.active.load();
        Matcher::new(&set).match_request(ctx)
    }

    /// The rule that would block `url`, regardless of the enabled flag.
    pub fn explain(&self, url: &str) -> Option<(Rule, Provenance)> {
        let set = self.active.load();
        Matcher::new(&set)
            .find_match(url)
            .map(|(rule, provenance)| (rule.clone(), provenance.clone()))
    }

    /// The active set. Stays valid even if a reload replaces it.
    pub fn snapshot(&self) -> Arc<FilterSet> {
        self.active.load_full()
    }

    pub fn stats(&self) -> SetStats {
        self.active.load().stats()
    }

    /// Deduplication counters of the active set.
    pub fn build_stats(&self) -> BuildStats {
        self.active.load().build_stats()
    }

    /// Number of user lists in the active set, not counting the bundled list.
    pub fn user_list_count(&self) -> usize {
        self.build_stats().sources.saturating_sub(1)
    }
}

fn assemble(bundled: &RuleSource, user: Vec<RuleSource>) -> FilterSet {
    FilterSet::build(std::iter::once(bundled.clone()).chain(user))
}
