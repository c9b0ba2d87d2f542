use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static JIRA_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\{(code|noformat|quote)(?::([^}]*))?\}(.*)$")
        .expect("invalid jira fence regex")
});

static ORG_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*#\+begin_(src|example|quote)(?:\s+(\S+))?.*$")
        .expect("invalid org fence regex")
});

static ORG_CLOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*#\+end_(src|example|quote)\s*$").expect("invalid org fence regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FenceKind {
    /// Jira `{code}`, Org `#+begin_src`.
    Code,
    /// Jira `{noformat}`, Org `#+begin_example`.
    Example,
    /// Jira `{quote}`, Org `#+begin_quote`. The body is regular markup.
    Quote,
}

impl FenceKind {
    /// Whether body lines are copied without any conversion.
    pub fn is_verbatim(self) -> bool {
        !matches!(self, FenceKind::Quote)
    }

    fn jira_tag(self) -> &'static str {
        match self {
            FenceKind::Code => "code",
            FenceKind::Example => "noformat",
            FenceKind::Quote => "quote",
        }
    }

    fn org_name(self) -> &'static str {
        match self {
            FenceKind::Code => "src",
            FenceKind::Example => "example",
            FenceKind::Quote => "quote",
        }
    }

    fn from_jira_tag(tag: &str) -> Option<Self> {
        match tag {
            "code" => Some(FenceKind::Code),
            "noformat" => Some(FenceKind::Example),
            "quote" => Some(FenceKind::Quote),
            _ => None,
        }
    }

    fn from_org_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "src" => Some(FenceKind::Code),
            "example" => Some(FenceKind::Example),
            "quote" => Some(FenceKind::Quote),
            _ => None,
        }
    }
}

impl fmt::Display for FenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.org_name())
    }
}

/// An opening fence with its optional language tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fence<'a> {
    pub kind: FenceKind,
    pub language: Option<&'a str>,
}

/// Recognizes `{code}`, `{code:lang}`, `{noformat}` and `{quote}` at the start
/// of a line. Returns the fence and whatever text follows the opening tag.
pub fn parse_jira_open(line: &str) -> Option<(Fence<'_>, &str)> {
    let caps = JIRA_OPEN.captures(line)?;
    let kind = FenceKind::from_jira_tag(caps.get(1)?.as_str())?;
    let language = match kind {
        FenceKind::Code => caps.get(2).and_then(|m| jira_language(m.as_str())),
        _ => None,
    };
    let rest = caps.get(3).map(|m| m.as_str()).unwrap_or("");
    Some((Fence { kind, language }, rest))
}

/// Picks the language out of `{code:...}` parameters: either a bare first
/// parameter (`java|title=x`) or an explicit `language=java`.
fn jira_language(params: &str) -> Option<&str> {
    for param in params.split('|').map(str::trim) {
        if let Some(value) = param.strip_prefix("language=") {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value);
            }
        }
    }
    params
        .split('|')
        .map(str::trim)
        .next()
        .filter(|first| !first.is_empty() && !first.contains('='))
}

/// If `line` ends with the closing tag for `kind`, returns the text before it.
pub fn split_jira_close(line: &str, kind: FenceKind) -> Option<&str> {
    let tag = format!("{{{}}}", kind.jira_tag());
    line.trim_end().strip_suffix(tag.as_str())
}

pub fn parse_org_open(line: &str) -> Option<Fence<'_>> {
    let caps = ORG_OPEN.captures(line)?;
    let kind = FenceKind::from_org_name(caps.get(1)?.as_str())?;
    let language = match kind {
        FenceKind::Code => caps
            .get(2)
            .map(|m| m.as_str())
            .filter(|lang| !lang.starts_with('-') && !lang.starts_with(':')),
        _ => None,
    };
    Some(Fence { kind, language })
}

pub fn is_org_close(line: &str, kind: FenceKind) -> bool {
    ORG_CLOSE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| FenceKind::from_org_name(m.as_str()))
        == Some(kind)
}

pub fn render_org_open(fence: &Fence<'_>) -> String {
    match fence.language {
        Some(lang) => format!("#+begin_{} {}", fence.kind.org_name(), lang),
        None => format!("#+begin_{}", fence.kind.org_name()),
    }
}

pub fn render_org_close(kind: FenceKind) -> String {
    format!("#+end_{}", kind.org_name())
}

pub fn render_jira_open(fence: &Fence<'_>) -> String {
    match fence.language {
        Some(lang) => format!("{{{}:{}}}", fence.kind.jira_tag(), lang),
        None => format!("{{{}}}", fence.kind.jira_tag()),
    }
}

pub fn render_jira_close(kind: FenceKind) -> String {
    format!("{{{}}}", kind.jira_tag())
}
