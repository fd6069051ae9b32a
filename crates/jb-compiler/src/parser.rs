use jb_core::types::{Rule, RuleKind};

/// Outcome of parsing a single filter-list line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Rule(Rule),
    Blank,
    Comment,
    /// The line reduced to an empty pattern
    Malformed,
}

/// A malformed line that was left out of the rule set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based
    pub line_number: usize,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub rules: Vec<Rule>,
    pub lines: usize,
    pub blank: usize,
    pub comments: usize,
    pub skipped: Vec<SkippedLine>,
}

pub fn parse_filter_list(text: &str) -> Vec<Rule> {
    parse_filter_list_with_report(text).rules
}

pub fn parse_filter_list_with_report(text: &str) -> ParseReport {
    let mut report = ParseReport::default();

    for (line_number, raw_line) in split_lines(text) {
        report.lines += 1;
        match parse_line(raw_line) {
            LineOutcome::Rule(rule) => report.rules.push(rule),
            LineOutcome::Blank => report.blank += 1,
            LineOutcome::Comment => report.comments += 1,
            LineOutcome::Malformed => report.skipped.push(SkippedLine {
                line_number,
                text: raw_line.trim().to_string(),
            }),
        }
    }

    report
}

pub fn parse_line(raw_line: &str) -> LineOutcome {
    let line = raw_line.trim();
    if line.is_empty() {
        return LineOutcome::Blank;
    }
    if is_comment_line(line) {
        return LineOutcome::Comment;
    }

    let rule = if let Some(rest) = line.strip_prefix("||") {
        parse_host_anchor_rule(rest)
    } else if let Some(rest) = line.strip_prefix('|') {
        Rule::new(RuleKind::PrefixAnchor, rest)
    } else if let Some(rest) = line.strip_prefix('*') {
        Rule::new(RuleKind::Substring, rest)
    } else if let Some(rest) = line.strip_suffix('^') {
        Rule::new(RuleKind::SeparatorSuffix, rest)
    } else {
        Rule::new(RuleKind::Substring, line)
    };

    match rule {
        Some(rule) => LineOutcome::Rule(rule),
        None => LineOutcome::Malformed,
    }
}

fn is_comment_line(line: &str) -> bool {
    line.starts_with('!') || line.starts_with('#')
}

fn parse_host_anchor_rule(rest: &str) -> Option<Rule> {
    let domain = rest.trim_end_matches(['^', '*']);
    Rule::new(RuleKind::DomainAnchor, domain.to_lowercase())
}

/// Lines with their 1-based numbers. Accepts `\n`, `\r\n` and lone `\r`.
fn split_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    text.lines()
        .flat_map(|line| line.split('\r'))
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
}
