//! Core type definitions for the JennieBrowser content filter
//!
//! These types are shared by the parser, the filter set and the matcher.

use std::fmt;
use std::path::PathBuf;

// =============================================================================
// Rules
// =============================================================================

/// Kind of a filter rule, without its pattern text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// `||domain` - host is the domain or one of its subdomains
    DomainAnchor,
    /// `|prefix` - URL starts with the literal prefix
    PrefixAnchor,
    /// `*needle` or a bare pattern - URL contains the needle
    Substring,
    /// `needle^` - needle followed by a separator or end of URL
    SeparatorSuffix,
}

impl RuleKind {
    pub const ALL: [RuleKind; 4] = [
        RuleKind::DomainAnchor,
        RuleKind::PrefixAnchor,
        RuleKind::Substring,
        RuleKind::SeparatorSuffix,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::DomainAnchor => "domain",
            RuleKind::PrefixAnchor => "prefix",
            RuleKind::Substring => "substring",
            RuleKind::SeparatorSuffix => "separator",
        }
    }
}

/// One parsed filter-list entry.
///
/// The pattern text never contains the anchor markers. Two rules are equal
/// when both kind and text are equal, which is what deduplication keys on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Rule {
    DomainAnchor(String),
    PrefixAnchor(String),
    Substring(String),
    SeparatorSuffix(String),
}

impl Rule {
    /// Build a rule, refusing an empty pattern.
    pub fn new(kind: RuleKind, pattern: impl Into<String>) -> Option<Self> {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return None;
        }
        Some(match kind {
            RuleKind::DomainAnchor => Rule::DomainAnchor(pattern),
            RuleKind::PrefixAnchor => Rule::PrefixAnchor(pattern),
            RuleKind::Substring => Rule::Substring(pattern),
            RuleKind::SeparatorSuffix => Rule::SeparatorSuffix(pattern),
        })
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            Rule::DomainAnchor(_) => RuleKind::DomainAnchor,
            Rule::PrefixAnchor(_) => RuleKind::PrefixAnchor,
            Rule::Substring(_) => RuleKind::Substring,
            Rule::SeparatorSuffix(_) => RuleKind::SeparatorSuffix,
        }
    }

    pub fn pattern(&self) -> &str {
        match self {
            Rule::DomainAnchor(p)
            | Rule::PrefixAnchor(p)
            | Rule::Substring(p)
            | Rule::SeparatorSuffix(p) => p,
        }
    }
}

impl fmt::Display for Rule {
    /// Renders the rule back in filter-list syntax.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::DomainAnchor(d) => write!(f, "||{d}"),
            Rule::PrefixAnchor(p) => write!(f, "|{p}"),
            Rule::Substring(s) => write!(f, "*{s}"),
            Rule::SeparatorSuffix(s) => write!(f, "{s}^"),
        }
    }
}

// =============================================================================
// Provenance
// =============================================================================

/// Where a rule came from. Used for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Provenance {
    /// The list embedded in the binary
    Bundled,
    /// A user-supplied list file
    User(PathBuf),
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Bundled => f.write_str("bundled"),
            Provenance::User(path) => write!(f, "{}", path.display()),
        }
    }
}

/// The rules parsed from one filter list.
#[derive(Debug, Clone)]
pub struct RuleSource {
    pub provenance: Provenance,
    pub rules: Vec<Rule>,
}

impl RuleSource {
    pub fn new(provenance: Provenance, rules: Vec<Rule>) -> Self {
        Self { provenance, rules }
    }
}

// =============================================================================
// Request Types (bit mask for exemptions)
// =============================================================================

bitflags::bitflags! {
    /// Request type bit mask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RequestType: u32 {
        const OTHER = 1 << 0;
        const SCRIPT = 1 << 1;
        const IMAGE = 1 << 2;
        const STYLESHEET = 1 << 3;
        const OBJECT = 1 << 4;       // plugins and plugin resources
        const SUBDOCUMENT = 1 << 5;  // iframe/frame
        const MAIN_FRAME = 1 << 6;   // main document
        const XMLHTTPREQUEST = 1 << 7;
        const WEBSOCKET = 1 << 8;
        const FONT = 1 << 9;
        const MEDIA = 1 << 10;       // audio and video
        const PING = 1 << 11;
        const FETCH = 1 << 12;

        /// Types that are never blocked
        const EXEMPT = Self::MEDIA.bits() | Self::OBJECT.bits();
    }
}

impl RequestType {
    /// Parse from browser request type string.
    pub fn from_str(s: &str) -> Self {
        match s {
            "main_frame" | "document" => Self::MAIN_FRAME,
            "sub_frame" | "subdocument" => Self::SUBDOCUMENT,
            "stylesheet" => Self::STYLESHEET,
            "script" => Self::SCRIPT,
            "image" => Self::IMAGE,
            "font" => Self::FONT,
            "object" | "plugin" | "plugin_resource" => Self::OBJECT,
            "xmlhttprequest" | "xhr" => Self::XMLHTTPREQUEST,
            "ping" => Self::PING,
            "media" | "video" | "audio" => Self::MEDIA,
            "websocket" => Self::WEBSOCKET,
            "fetch" => Self::FETCH,
            _ => Self::OTHER,
        }
    }
}

// =============================================================================
// Request Context
// =============================================================================

/// A request handed over by the interception layer.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    /// Full request URL
    pub url: &'a str,
    /// Request type
    pub request_type: RequestType,
}

impl<'a> RequestContext<'a> {
    pub fn new(url: &'a str, request_type: RequestType) -> Self {
        Self { url, request_type }
    }
}

// =============================================================================
// Verdict
// =============================================================================

/// Outcome of classifying a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Verdict {
    /// No blocking rule matched, or filtering is disabled
    #[default]
    Allow,
    /// At least one rule matched
    Block,
}

impl Verdict {
    pub fn is_block(&self) -> bool {
        matches!(self, Verdict::Block)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Allow => f.write_str("ALLOW"),
            Verdict::Block => f.write_str("BLOCK"),
        }
    }
}
