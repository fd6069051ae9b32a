//! Core Matching Engine
//!
//! This is the hot path - every request goes through here.
//! The matcher only reads the filter set; any number of threads may
//! classify against the same set at once.

use crate::filter_set::FilterSet;
use crate::types::{Provenance, RequestContext, RequestType, Rule, Verdict};
use crate::url::{contains_before_separator, extract_host_lowercase, extract_path, walk_host_suffixes};

/// Path marker of speculation-rule prefetches, which are never blocked.
const SPECULATION_PATH: &str = "/cdn-cgi/speculation";

// =============================================================================
// Matcher
// =============================================================================

/// The core matching engine.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a> {
    set: &'a FilterSet,
}

impl<'a> Matcher<'a> {
    /// Create a new matcher over the given filter set.
    pub fn new(set: &'a FilterSet) -> Self {
        Self { set }
    }

    /// Classify a URL. Any single matching rule blocks.
    pub fn classify(&self, url: &str) -> Verdict {
        if self.find_match(url).is_some() {
            Verdict::Block
        } else {
            Verdict::Allow
        }
    }

    /// Classify a request, applying the request-level exemptions first.
    pub fn match_request(&self, ctx: &RequestContext<'_>) -> Verdict {
        if is_exempt(ctx) {
            return Verdict::Allow;
        }
        self.classify(ctx.url)
    }

    /// Find a rule that blocks `url`, if any.
    pub fn find_match(&self, url: &str) -> Option<(&'a Rule, &'a Provenance)> {
        if self.set.is_empty() {
            return None;
        }

        // Step 1: Domain rules via host suffix lookup
        if let Some(idx) = self.match_domain(url) {
            return Some(self.set.entry(idx));
        }

        // Step 2: Linear scan of the pattern rules
        let set = self.set;
        set.prefix_entries()
            .iter()
            .chain(set.substring_entries())
            .chain(set.separator_entries())
            .copied()
            .find(|&idx| rule_matches(set.entry(idx).0, url))
            .map(|idx| set.entry(idx))
    }

    fn match_domain(&self, url: &str) -> Option<usize> {
        let host = extract_host_lowercase(url)?;
        walk_host_suffixes(&host).find_map(|suffix| self.set.domain_entry(suffix))
    }
}

/// Classify `url` against `set`.
pub fn classify(url: &str, set: &FilterSet) -> Verdict {
    Matcher::new(set).classify(url)
}

/// True for requests that are never blocked: speculation-rule prefetches and
/// media or plugin loads.
pub fn is_exempt(ctx: &RequestContext<'_>) -> bool {
    if ctx.request_type.intersects(RequestType::EXEMPT) {
        return true;
    }
    extract_path(ctx.url).contains(SPECULATION_PATH)
}

/// Per-rule match predicate.
pub fn rule_matches(rule: &Rule, url: &str) -> bool {
    match rule {
        Rule::DomainAnchor(domain) => match extract_host_lowercase(url) {
            Some(host) => host_matches_domain(&host, domain),
            None => false,
        },
        Rule::PrefixAnchor(prefix) => url.starts_with(prefix.as_str()),
        Rule::Substring(needle) => url.contains(needle.as_str()),
        Rule::SeparatorSuffix(needle) => contains_before_separator(url, needle),
    }
}

/// Host equals `domain` or is a subdomain of it at a dot boundary.
pub fn host_matches_domain(host: &str, domain: &str) -> bool {
    if host == domain {
        return true;
    }
    host.len() > domain.len()
        && host.ends_with(domain)
        && host.as_bytes()[host.len() - domain.len() - 1] == b'.'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RuleKind, RuleSource};

    fn set_of(rules: &[(RuleKind, &str)]) -> FilterSet {
        let rules = rules
            .iter()
            .filter_map(|(kind, text)| Rule::new(*kind, *text))
            .collect();
        FilterSet::build(vec![RuleSource::new(Provenance::Bundled, rules)])
    }

    #[test]
    fn concrete_scenario() {
        let set = set_of(&[
            (RuleKind::DomainAnchor, "ads.example.com"),
            (RuleKind::Substring, "track"),
            (RuleKind::SeparatorSuffix, "pixel"),
        ]);
        let matcher = Matcher::new(&set);

        assert_eq!(matcher.classify("http://ads.example.com/a"), Verdict::Block);
        assert_eq!(matcher.classify("http://ads.example.com.evil.com/a"), Verdict::Allow);
        assert_eq!(matcher.classify("http://x.com/track/y"), Verdict::Block);
        assert_eq!(matcher.classify("http://x.com/pixel?id=1"), Verdict::Block);
        assert_eq!(matcher.classify("http://x.com/pixels"), Verdict::Allow);
    }

    #[test]
    fn domain_anchor_respects_dot_boundary() {
        let set = set_of(&[(RuleKind::DomainAnchor, "d.com")]);
        assert_eq!(classify("http://d.com/x", &set), Verdict::Block);
        assert_eq!(classify("http://sub.d.com/x", &set), Verdict::Block);
        assert_eq!(classify("http://a.b.d.com:8080/x", &set), Verdict::Block);
        assert_eq!(classify("http://evil-d.com/x", &set), Verdict::Allow);
        assert_eq!(classify("http://notd.com/x", &set), Verdict::Allow);
        assert_eq!(classify("http://d.com.evil/x", &set), Verdict::Allow);
    }

    #[test]
    fn domain_anchor_lowercases_host() {
        let set = set_of(&[(RuleKind::DomainAnchor, "ads.example.com")]);
        assert_eq!(classify("HTTPS://ADS.Example.Com/banner", &set), Verdict::Block);
    }

    #[test]
    fn domain_anchor_ignores_malformed_urls() {
        let set = set_of(&[(RuleKind::DomainAnchor, "ads.example.com")]);
        assert_eq!(classify("ads.example.com", &set), Verdict::Allow);
        assert_eq!(classify("http:///ads.example.com", &set), Verdict::Allow);
    }

    #[test]
    fn prefix_anchor_is_case_sensitive() {
        let set = set_of(&[(RuleKind::PrefixAnchor, "http://ads.")]);
        assert_eq!(classify("http://ads.example.com/x", &set), Verdict::Block);
        assert_eq!(classify("HTTP://ads.example.com/x", &set), Verdict::Allow);
        assert_eq!(classify("https://ads.example.com/x", &set), Verdict::Allow);
    }

    #[test]
    fn substring_is_literal() {
        let set = set_of(&[(RuleKind::Substring, "ad*s")]);
        assert_eq!(classify("http://x.com/ad*s", &set), Verdict::Block);
        assert_eq!(classify("http://x.com/adXs", &set), Verdict::Allow);
        assert_eq!(classify("http://x.com/AD*S", &set), Verdict::Allow);
    }

    #[test]
    fn separator_suffix_followers() {
        let set = set_of(&[(RuleKind::SeparatorSuffix, "banner")]);
        for url in [
            "http://x.com/banner",
            "http://x.com/banner?a",
            "http://x.com/banner/",
            "http://x.com/banner&a",
            "http://x.com/?banner=1",
            "http://x.com/banner:1",
            "http://x.com/banner;x",
            "http://x.com/banner#top",
        ] {
            assert_eq!(classify(url, &set), Verdict::Block, "{url}");
        }
        assert_eq!(classify("http://x.com/bannerz", &set), Verdict::Allow);
        assert_eq!(classify("http://x.com/banner.png", &set), Verdict::Allow);
    }

    #[test]
    fn empty_set_allows_everything() {
        let set = FilterSet::empty();
        assert_eq!(classify("http://ads.example.com/", &set), Verdict::Allow);
        assert!(Matcher::new(&set).find_match("http://ads.example.com/").is_none());
    }

    #[test]
    fn find_match_reports_rule() {
        let set = set_of(&[(RuleKind::Substring, "track"), (RuleKind::DomainAnchor, "x.com")]);
        let (rule, provenance) = Matcher::new(&set)
            .find_match("http://y.com/track")
            .expect("should match");
        assert_eq!(rule, &Rule::Substring("track".into()));
        assert_eq!(provenance, &Provenance::Bundled);
    }

    #[test]
    fn indexed_lookup_agrees_with_rule_predicate() {
        let rules = [
            Rule::DomainAnchor("ads.example.com".into()),
            Rule::PrefixAnchor("https://cdn.".into()),
            Rule::Substring("/beacon".into()),
            Rule::SeparatorSuffix("pixel".into()),
        ];
        let set = FilterSet::build(vec![RuleSource::new(Provenance::Bundled, rules.to_vec())]);
        let matcher = Matcher::new(&set);

        for url in [
            "http://ads.example.com/",
            "http://xads.example.com/",
            "https://cdn.site.org/lib.js",
            "http://site.org/beacon?x",
            "http://site.org/pixel",
            "http://site.org/pixelated",
            "garbage",
        ] {
            let expected = rules.iter().any(|r| rule_matches(r, url));
            assert_eq!(matcher.classify(url).is_block(), expected, "{url}");
        }
    }

    #[test]
    fn request_exemptions() {
        let set = set_of(&[(RuleKind::Substring, "ads")]);
        let matcher = Matcher::new(&set);

        let media = RequestContext::new("http://ads.com/video.mp4", RequestType::MEDIA);
        assert_eq!(matcher.match_request(&media), Verdict::Allow);

        let plugin = RequestContext::new("http://ads.com/flash.swf", RequestType::OBJECT);
        assert_eq!(matcher.match_request(&plugin), Verdict::Allow);

        let speculation = RequestContext::new(
            "https://ads.com/cdn-cgi/speculation",
            RequestType::OTHER,
        );
        assert_eq!(matcher.match_request(&speculation), Verdict::Allow);

        let script = RequestContext::new("http://ads.com/a.js", RequestType::SCRIPT);
        assert_eq!(matcher.match_request(&script), Verdict::Block);
    }
}
