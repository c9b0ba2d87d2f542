use std::sync::LazyLock;

use regex::Regex;

use crate::blocks::{self, Fence};

static JIRA_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*h([1-6])\.(?:\s+(.*))?$").expect("invalid jira heading regex")
});

// Marker runs mix `#` and `*` (`#*` is a bullet nested in a numbered item);
// a lone `-` is also a bullet.
static JIRA_LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([#*]+|-)(?:\s+(.*))?$").expect("invalid jira list regex")
});

static JIRA_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*-{4,}\s*$").expect("invalid jira rule regex"));

// Org headings only count at column zero.
static ORG_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\*+)\s+(.*)$").expect("invalid org heading regex"));

static ORG_LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([ \t]*)([-+*]|\d+[.)])(?:\s+(.*))?$").expect("invalid org list regex")
});

static ORG_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*-{5,}\s*$").expect("invalid org rule regex"));

// `# comment`, a bare `#`, and `#+KEYWORD` lines.
static ORG_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#(?:\s.*|\+.*)?$").expect("invalid org comment regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Ordered,
    Unordered,
}

impl ListKind {
    pub fn jira_marker(self) -> char {
        match self {
            ListKind::Ordered => '#',
            ListKind::Unordered => '*',
        }
    }
}

/// One classified input line. Text slices borrow from the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    Blank,
    /// `level` is the Jira level for Jira input and the raw asterisk count
    /// for Org input.
    Heading { level: usize, text: &'a str },
    ListItem {
        kind: ListKind,
        depth: usize,
        text: &'a str,
    },
    FenceOpen { fence: Fence<'a>, rest: &'a str },
    Rule,
    /// Org comment or keyword line; never produced for Jira input.
    Comment,
    Text(&'a str),
}

/// Classifies a Jira line. Marker runs are always list depth: Jira has no
/// asterisk headings, so `*** item` is a third-level bullet.
pub fn classify_jira(line: &str) -> Line<'_> {
    if line.trim().is_empty() {
        return Line::Blank;
    }
    if let Some((fence, rest)) = blocks::parse_jira_open(line) {
        return Line::FenceOpen { fence, rest };
    }
    if let Some(caps) = JIRA_HEADING.captures(line) {
        let level = caps[1].parse::<usize>().unwrap_or(1);
        let text = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        return Line::Heading { level, text };
    }
    if JIRA_RULE.is_match(line) {
        return Line::Rule;
    }
    if let Some(caps) = JIRA_LIST_ITEM.captures(line) {
        let marker = &caps[1];
        let kind = match marker.chars().last() {
            Some('#') => ListKind::Ordered,
            _ => ListKind::Unordered,
        };
        return Line::ListItem {
            kind,
            depth: marker.chars().count(),
            text: caps.get(2).map(|m| m.as_str()).unwrap_or(""),
        };
    }
    Line::Text(line)
}

/// Classifies an Org line. List depth comes from indentation, two columns
/// per level.
pub fn classify_org(line: &str) -> Line<'_> {
    if line.trim().is_empty() {
        return Line::Blank;
    }
    if let Some(fence) = blocks::parse_org_open(line) {
        return Line::FenceOpen { fence, rest: "" };
    }
    if let Some(caps) = ORG_HEADING.captures(line) {
        return Line::Heading {
            level: caps[1].len(),
            text: caps.get(2).map(|m| m.as_str()).unwrap_or(""),
        };
    }
    if ORG_COMMENT.is_match(line) {
        return Line::Comment;
    }
    if ORG_RULE.is_match(line) {
        return Line::Rule;
    }
    if let Some(caps) = ORG_LIST_ITEM.captures(line) {
        let indent = indent_width(&caps[1]);
        let kind = if caps[2].starts_with(|c: char| c.is_ascii_digit()) {
            ListKind::Ordered
        } else {
            ListKind::Unordered
        };
        return Line::ListItem {
            kind,
            depth: indent / 2 + 1,
            text: caps.get(3).map(|m| m.as_str()).unwrap_or(""),
        };
    }
    Line::Text(line)
}

fn indent_width(indent: &str) -> usize {
    indent
        .chars()
        .map(|c| if c == '\t' { 8 } else { 1 })
        .sum()
}
