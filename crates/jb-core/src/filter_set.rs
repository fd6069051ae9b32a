//! Filter Set assembly
//!
//! A [`FilterSet`] is built once from an ordered list of [`RuleSource`]s and
//! never mutated afterwards. Duplicate rules are removed, keeping the
//! provenance of their first occurrence. Domain rules are indexed by domain;
//! the remaining kinds are kept in per-kind lists.

use std::collections::{HashMap, HashSet};

use crate::types::{Provenance, Rule, RuleKind, RuleSource};

/// Counters produced while assembling a set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Sources fed in, including ones that contributed no rules
    pub sources: usize,
    pub before: usize,
    pub after: usize,
    pub deduped: usize,
    pub dropped_empty: usize,
}

/// Rule counts per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetStats {
    pub domain: usize,
    pub prefix: usize,
    pub substring: usize,
    pub separator: usize,
}

impl SetStats {
    pub fn total(&self) -> usize {
        self.domain + self.prefix + self.substring + self.separator
    }

    pub fn count(&self, kind: RuleKind) -> usize {
        match kind {
            RuleKind::DomainAnchor => self.domain,
            RuleKind::PrefixAnchor => self.prefix,
            RuleKind::Substring => self.substring,
            RuleKind::SeparatorSuffix => self.separator,
        }
    }
}

/// Immutable, deduplicated collection of rules.
#[derive(Debug, Default)]
pub struct FilterSet {
    /// Unique rules with an index into `provenances`
    entries: Vec<(Rule, usize)>,
    provenances: Vec<Provenance>,
    /// domain -> entry index
    domains: HashMap<String, usize>,
    prefixes: Vec<usize>,
    substrings: Vec<usize>,
    separators: Vec<usize>,
    build_stats: BuildStats,
}

impl FilterSet {
    /// An empty set. Matches nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Assemble a set from sources, in order.
    pub fn build<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = RuleSource>,
    {
        Self::build_with_stats(sources).0
    }

    /// Assemble a set and report what deduplication did.
    pub fn build_with_stats<I>(sources: I) -> (Self, BuildStats)
    where
        I: IntoIterator<Item = RuleSource>,
    {
        let mut set = Self::default();
        let mut stats = BuildStats::default();
        let mut seen: HashSet<Rule> = HashSet::new();

        for source in sources {
            stats.sources += 1;
            let provenance_idx = set.provenances.len();
            let mut used = false;

            for rule in source.rules {
                stats.before += 1;
                if rule.pattern().is_empty() {
                    stats.dropped_empty += 1;
                    continue;
                }
                if seen.contains(&rule) {
                    stats.deduped += 1;
                    continue;
                }
                seen.insert(rule.clone());
                set.push(rule, provenance_idx);
                used = true;
            }

            // Sources that contribute nothing are not kept
            if used {
                set.provenances.push(source.provenance);
            }
        }

        stats.after = set.entries.len();
        log::debug!(
            "filter set built: {} -> {} rules ({} duplicates, {} empty)",
            stats.before,
            stats.after,
            stats.deduped,
            stats.dropped_empty
        );

        set.build_stats = stats;
        (set, stats)
    }

    fn push(&mut self, rule: Rule, provenance_idx: usize) {
        let idx = self.entries.len();
        match &rule {
            Rule::DomainAnchor(domain) => {
                self.domains.insert(domain.clone(), idx);
            }
            Rule::PrefixAnchor(_) => self.prefixes.push(idx),
            Rule::Substring(_) => self.substrings.push(idx),
            Rule::SeparatorSuffix(_) => self.separators.push(idx),
        }
        self.entries.push((rule, provenance_idx));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, rule: &Rule) -> bool {
        self.position(rule).is_some()
    }

    /// Provenance of the first occurrence of `rule`.
    pub fn provenance_of(&self, rule: &Rule) -> Option<&Provenance> {
        self.position(rule).map(|idx| self.entry(idx).1)
    }

    /// All rules with their provenance, in assembly order.
    pub fn rules(&self) -> impl Iterator<Item = (&Rule, &Provenance)> + '_ {
        self.entries
            .iter()
            .map(move |(rule, p)| (rule, &self.provenances[*p]))
    }

    /// What deduplication did when this set was assembled.
    pub fn build_stats(&self) -> BuildStats {
        self.build_stats
    }

    pub fn stats(&self) -> SetStats {
        SetStats {
            domain: self.domains.len(),
            prefix: self.prefixes.len(),
            substring: self.substrings.len(),
            separator: self.separators.len(),
        }
    }

    fn position(&self, rule: &Rule) -> Option<usize> {
        match rule {
            Rule::DomainAnchor(domain) => self.domains.get(domain).copied(),
            Rule::PrefixAnchor(_) => self.find_in(&self.prefixes, rule),
            Rule::Substring(_) => self.find_in(&self.substrings, rule),
            Rule::SeparatorSuffix(_) => self.find_in(&self.separators, rule),
        }
    }

    fn find_in(&self, indices: &[usize], rule: &Rule) -> Option<usize> {
        indices.iter().copied().find(|&idx| self.entries[idx].0 == *rule)
    }

    // =========================================================================
    // Matcher access
    // =========================================================================

    pub(crate) fn entry(&self, idx: usize) -> (&Rule, &Provenance) {
        let (rule, p) = &self.entries[idx];
        (rule, &self.provenances[*p])
    }

    pub(crate) fn domain_entry(&self, domain: &str) -> Option<usize> {
        self.domains.get(domain).copied()
    }

    pub(crate) fn prefix_entries(&self) -> &[usize] {
        &self.prefixes
    }

    pub(crate) fn substring_entries(&self) -> &[usize] {
        &self.substrings
    }

    pub(crate) fn separator_entries(&self) -> &[usize] {
        &self.separators
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn source(provenance: Provenance, rules: &[Rule]) -> RuleSource {
        RuleSource::new(provenance, rules.to_vec())
    }

    #[test]
    fn empty_build_is_valid() {
        let (set, stats) = FilterSet::build_with_stats(Vec::new());
        assert!(set.is_empty());
        assert_eq!(stats, BuildStats::default());
        assert_eq!(set.stats().total(), 0);
    }

    #[test]
    fn dedup_keeps_first_provenance() {
        let user = Provenance::User(PathBuf::from("/tmp/user.txt"));
        let ads = Rule::DomainAnchor("ads.example.com".into());
        let track = Rule::Substring("track".into());

        let (set, stats) = FilterSet::build_with_stats(vec![
            source(Provenance::Bundled, &[ads.clone(), ads.clone()]),
            source(user.clone(), &[ads.clone(), track.clone()]),
        ]);

        assert_eq!(set.len(), 2);
        assert_eq!(stats.sources, 2);
        assert_eq!(set.build_stats(), stats);
        assert_eq!(stats.before, 4);
        assert_eq!(stats.after, 2);
        assert_eq!(stats.deduped, 2);
        assert_eq!(set.provenance_of(&ads), Some(&Provenance::Bundled));
        assert_eq!(set.provenance_of(&track), Some(&user));
    }

    #[test]
    fn same_text_different_kind_is_kept() {
        let set = FilterSet::build(vec![source(
            Provenance::Bundled,
            &[
                Rule::Substring("ads".into()),
                Rule::SeparatorSuffix("ads".into()),
                Rule::PrefixAnchor("ads".into()),
            ],
        )]);
        assert_eq!(set.len(), 3);
        let stats = set.stats();
        assert_eq!(stats.substring, 1);
        assert_eq!(stats.separator, 1);
        assert_eq!(stats.prefix, 1);
        assert_eq!(stats.count(RuleKind::DomainAnchor), 0);
    }

    #[test]
    fn empty_patterns_are_dropped() {
        let (set, stats) = FilterSet::build_with_stats(vec![source(
            Provenance::Bundled,
            &[Rule::Substring(String::new()), Rule::Substring("x".into())],
        )]);
        assert_eq!(set.len(), 1);
        assert_eq!(stats.dropped_empty, 1);
        assert!(!set.contains(&Rule::Substring(String::new())));
    }

    #[test]
    fn rules_iterates_in_assembly_order() {
        let set = FilterSet::build(vec![source(
            Provenance::Bundled,
            &[Rule::Substring("b".into()), Rule::DomainAnchor("a.com".into())],
        )]);
        let rendered: Vec<String> = set.rules().map(|(r, _)| r.to_string()).collect();
        assert_eq!(rendered, vec!["*b", "||a.com"]);
    }

    #[test]
    fn source_and_rule_order_do_not_change_verdicts() {
        let user = Provenance::User(PathBuf::from("/tmp/user.txt"));
        let bundled_rules = vec![
            Rule::DomainAnchor("ads.example.com".into()),
            Rule::PrefixAnchor("http://cdn.tracker.net/".into()),
            Rule::Substring("track".into()),
            Rule::SeparatorSuffix("pixel".into()),
        ];
        let user_rules = vec![
            Rule::SeparatorSuffix("pixel".into()),
            Rule::DomainAnchor("metrics.org".into()),
            Rule::Substring("track".into()),
            Rule::PrefixAnchor("https://beacon.".into()),
        ];
        let reversed = |rules: &[Rule]| rules.iter().rev().cloned().collect::<Vec<_>>();

        let builds = [
            FilterSet::build(vec![
                source(Provenance::Bundled, &bundled_rules),
                source(user.clone(), &user_rules),
            ]),
            FilterSet::build(vec![
                source(Provenance::Bundled, &bundled_rules),
                source(user.clone(), &user_rules),
            ]),
            FilterSet::build(vec![
                source(user.clone(), &user_rules),
                source(Provenance::Bundled, &bundled_rules),
            ]),
            FilterSet::build(vec![
                source(user.clone(), &reversed(&user_rules)),
                source(Provenance::Bundled, &reversed(&bundled_rules)),
            ]),
        ];

        let urls = [
            "http://ads.example.com/a",
            "http://sub.ads.example.com/a",
            "http://evil-ads.example.com.net/a",
            "http://cdn.tracker.net/lib.js",
            "https://cdn.tracker.net/lib.js",
            "http://x.com/track/y",
            "http://x.com/pixel?id=1",
            "http://x.com/pixels",
            "https://stats.metrics.org/collect",
            "https://notmetrics.org/",
            "https://beacon.site.io/b",
            "https://www.rust-lang.org/",
            "garbage",
        ];

        for set in &builds {
            assert_eq!(set.len(), 6);
        }
        for url in urls {
            let expected = crate::matcher::classify(url, &builds[0]);
            for set in &builds[1..] {
                assert_eq!(crate::matcher::classify(url, set), expected, "{url}");
            }
        }
    }
}
