//! Inline emphasis, code and link conversion.
//!
//! Each line is scanned once, left to right. Protected regions (links, bare
//! URLs) and the valid closing delimiters of every rule are found up front,
//! so an opener looks up its closer with a cursor that only moves forward.
//! A matched span is written with the target delimiters and its content
//! converted in place, so output delimiters are never scanned again.

use crate::links;

/// The dialect of the text being scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Jira,
    Org,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Bold,
    Italic,
    Underline,
    Strike,
    Code,
}

#[derive(Debug)]
struct Rule {
    style: Style,
    open: &'static str,
    close: &'static str,
    out_open: &'static str,
    out_close: &'static str,
    /// Single-character delimiters only count at word boundaries.
    bounded: bool,
}

impl Rule {
    const fn new(
        style: Style,
        delims: (&'static str, &'static str),
        out: (&'static str, &'static str),
        bounded: bool,
    ) -> Self {
        Self {
            style,
            open: delims.0,
            close: delims.1,
            out_open: out.0,
            out_close: out.1,
            bounded,
        }
    }
}

const JIRA_RULES: &[Rule] = &[
    Rule::new(Style::Code, ("{{", "}}"), ("~", "~"), false),
    Rule::new(Style::Bold, ("*", "*"), ("*", "*"), true),
    Rule::new(Style::Italic, ("_", "_"), ("/", "/"), true),
    Rule::new(Style::Underline, ("+", "+"), ("_", "_"), true),
    Rule::new(Style::Strike, ("-", "-"), ("+", "+"), true),
];

const ORG_RULES: &[Rule] = &[
    Rule::new(Style::Code, ("~", "~"), ("{{", "}}"), true),
    Rule::new(Style::Code, ("=", "="), ("{{", "}}"), true),
    Rule::new(Style::Bold, ("*", "*"), ("*", "*"), true),
    Rule::new(Style::Italic, ("/", "/"), ("_", "_"), true),
    Rule::new(Style::Underline, ("_", "_"), ("+", "+"), true),
    Rule::new(Style::Strike, ("+", "+"), ("-", "-"), true),
];

/// A region copied through without emphasis matching.
#[derive(Debug, Clone, Copy)]
struct Shield {
    start: usize,
    end: usize,
    kind: ShieldKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShieldKind {
    Verbatim,
    OrgLink,
}

/// Converts inline markup from one dialect to the other and counts the spans
/// it rewrote.
#[derive(Debug)]
pub struct InlineConverter {
    source: Dialect,
    spans: usize,
}

impl InlineConverter {
    pub fn new(source: Dialect) -> Self {
        Self { source, spans: 0 }
    }

    pub fn spans(&self) -> usize {
        self.spans
    }

    pub fn convert(&mut self, text: &str) -> String {
        let mut scanner = Scanner::new(text, self.source);
        let mut out = String::with_capacity(text.len());
        scanner.convert_range(0, text.len(), &mut out);
        self.spans += scanner.spans;
        out
    }
}

struct Scanner<'t> {
    text: &'t str,
    source: Dialect,
    rules: &'static [Rule],
    shields: Vec<Shield>,
    next_shield: usize,
    /// Valid closer offsets per rule, ascending.
    closers: Vec<Vec<usize>>,
    /// Per rule, index of the first closer not yet passed by an opener.
    cursors: Vec<usize>,
    spans: usize,
}

impl<'t> Scanner<'t> {
    fn new(text: &'t str, source: Dialect) -> Self {
        let rules = match source {
            Dialect::Jira => JIRA_RULES,
            Dialect::Org => ORG_RULES,
        };
        let shields = find_shields(text, source);
        let closers = rules
            .iter()
            .map(|rule| find_closers(text, rule, &shields))
            .collect();
        Self {
            text,
            source,
            rules,
            shields,
            next_shield: 0,
            closers,
            cursors: vec![0; rules.len()],
            spans: 0,
        }
    }

    fn convert_range(&mut self, start: usize, end: usize, out: &mut String) {
        let text = self.text;
        let mut pos = start;

        while pos < end {
            if let Some(shield) = self.shield_at(pos) {
                let shield_end = shield.end.min(end);
                match shield.kind {
                    ShieldKind::Verbatim => out.push_str(&text[pos..shield_end]),
                    ShieldKind::OrgLink => self.push_org_link(&text[pos..shield_end], out),
                }
                pos = shield_end;
                continue;
            }

            if let Some((rule, close_at)) = self.match_span(pos, end) {
                let content_start = pos + rule.open.len();
                out.push_str(rule.out_open);
                if rule.style == Style::Code {
                    out.push_str(&text[content_start..close_at]);
                } else {
                    self.convert_range(content_start, close_at, out);
                }
                out.push_str(rule.out_close);
                self.spans += 1;
                pos = close_at + rule.close.len();
                continue;
            }

            let Some(ch) = text[pos..].chars().next() else {
                break;
            };
            out.push(ch);
            pos += ch.len_utf8();
        }
    }

    fn shield_at(&mut self, pos: usize) -> Option<Shield> {
        while self
            .shields
            .get(self.next_shield)
            .is_some_and(|shield| shield.start < pos)
        {
            self.next_shield += 1;
        }
        self.shields
            .get(self.next_shield)
            .copied()
            .filter(|shield| shield.start == pos)
    }

    fn push_org_link(&mut self, raw: &str, out: &mut String) {
        let Some((link, _)) = links::parse_org_link(raw) else {
            out.push_str(raw);
            return;
        };
        let description = link.description.map(|d| {
            let mut inner = Scanner::new(d, self.source);
            let mut converted = String::with_capacity(d.len());
            inner.convert_range(0, d.len(), &mut converted);
            self.spans += inner.spans;
            converted
        });
        out.push_str(&links::render_jira_link(link.target, description.as_deref()));
        self.spans += 1;
    }

    /// Finds the shortest span opening at `pos` that closes before `end`,
    /// returning the rule and the offset of its closing delimiter.
    fn match_span(&mut self, pos: usize, end: usize) -> Option<(&'static Rule, usize)> {
        let text = self.text;
        let rest = &text[pos..];
        for (idx, rule) in self.rules.iter().enumerate() {
            if !rest.starts_with(rule.open) {
                continue;
            }
            if rule.bounded && !opens_at(text, pos, rule.open) {
                continue;
            }
            let content_start = pos + rule.open.len();
            let closers = &self.closers[idx];
            let cursor = &mut self.cursors[idx];
            while closers.get(*cursor).is_some_and(|&at| at <= content_start) {
                *cursor += 1;
            }
            if let Some(&at) = closers.get(*cursor) {
                if at + rule.close.len() <= end {
                    return Some((rule, at));
                }
            }
        }
        None
    }
}

fn find_shields(text: &str, source: Dialect) -> Vec<Shield> {
    let mut shields = Vec::new();
    let mut pos = 0;
    while pos < text.len() {
        let rest = &text[pos..];
        let found = match source {
            Dialect::Jira => links::jira_link_len(rest).map(|len| (len, ShieldKind::Verbatim)),
            Dialect::Org => links::parse_org_link(rest).map(|(_, len)| (len, ShieldKind::OrgLink)),
        }
        .or_else(|| links::bare_url_len(rest).map(|len| (len, ShieldKind::Verbatim)));

        if let Some((len, kind)) = found {
            shields.push(Shield {
                start: pos,
                end: pos + len,
                kind,
            });
            pos += len;
            continue;
        }
        pos += rest.chars().next().map_or(1, char::len_utf8);
    }
    shields
}

/// Offsets where `rule` may close. Emphasis never closes inside a shield;
/// code spans ignore shields since their content is verbatim anyway.
fn find_closers(text: &str, rule: &Rule, shields: &[Shield]) -> Vec<usize> {
    let mut shield_idx = 0;
    text.match_indices(rule.close)
        .map(|(at, _)| at)
        .filter(|&at| !rule.bounded || closes_at(text, at, rule.close))
        .filter(|&at| {
            if rule.style == Style::Code {
                return true;
            }
            while shields.get(shield_idx).is_some_and(|s| s.end <= at) {
                shield_idx += 1;
            }
            !shields.get(shield_idx).is_some_and(|s| s.start <= at)
        })
        .collect()
}

/// An opener follows a non-alphanumeric character (or line start) and is
/// followed by a character that is neither whitespace nor the delimiter.
fn opens_at(text: &str, pos: usize, delim: &str) -> bool {
    let before_ok = text[..pos]
        .chars()
        .next_back()
        .map_or(true, |c| !c.is_alphanumeric());
    let after_ok = text[pos + delim.len()..]
        .chars()
        .next()
        .is_some_and(|c| !c.is_whitespace() && !delim.starts_with(c));
    before_ok && after_ok
}

/// A closer follows a character that is neither whitespace nor the
/// delimiter, and precedes a non-alphanumeric character (or line end).
fn closes_at(text: &str, pos: usize, delim: &str) -> bool {
    let before_ok = text[..pos]
        .chars()
        .next_back()
        .is_some_and(|c| !c.is_whitespace() && !delim.ends_with(c));
    let after_ok = text[pos + delim.len()..]
        .chars()
        .next()
        .map_or(true, |c| !c.is_alphanumeric());
    before_ok && after_ok
}
