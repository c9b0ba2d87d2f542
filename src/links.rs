/// An Org link: `[[target][description]]` or `[[target]]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrgLink<'a> {
    pub target: &'a str,
    pub description: Option<&'a str>,
}

/// Parses an Org link at the start of `text`, returning it with the number of
/// bytes it spans.
pub fn parse_org_link(text: &str) -> Option<(OrgLink<'_>, usize)> {
    let body = text.strip_prefix("[[")?;
    let target_end = body.find(is_bracket)?;
    let target = &body[..target_end];
    if target.trim().is_empty() {
        return None;
    }
    let after_target = &body[target_end..];
    if after_target.starts_with("]]") {
        return Some((
            OrgLink {
                target,
                description: None,
            },
            target_end + 4,
        ));
    }

    let desc_body = after_target.strip_prefix("][")?;
    let desc_end = desc_body.find(is_bracket)?;
    if !desc_body[desc_end..].starts_with("]]") {
        return None;
    }
    let description = Some(&desc_body[..desc_end]).filter(|d| !d.trim().is_empty());
    Some((
        OrgLink {
            target,
            description,
        },
        target_end + desc_end + 6,
    ))
}

/// `[description|target]`, or `[target]` without a description. The
/// description must already be in Jira markup.
pub fn render_jira_link(target: &str, description: Option<&str>) -> String {
    match description {
        Some(description) => format!("[{description}|{target}]"),
        None => format!("[{target}]"),
    }
}

/// Length of a Jira link or mention at the start of `text`. Jira links are
/// copied through unchanged so their URLs never pick up emphasis.
pub fn jira_link_len(text: &str) -> Option<usize> {
    let body = text.strip_prefix('[')?;
    let end = body.find(is_bracket)?;
    let inner = &body[..end];
    if inner.is_empty() || !body[end..].starts_with(']') {
        return None;
    }
    let is_link = inner.contains('|')
        || inner.starts_with('~')
        || inner.starts_with('^')
        || inner.starts_with('#')
        || inner.starts_with("mailto:")
        || inner.contains("://");
    is_link.then_some(end + 2)
}

// Link bodies end at the next bracket, so scanning a line stays linear.
fn is_bracket(c: char) -> bool {
    c == '[' || c == ']'
}

/// Length of a bare `http://` or `https://` URL at the start of `text`.
/// Trailing sentence punctuation is left out of the URL.
pub fn bare_url_len(text: &str) -> Option<usize> {
    if !(text.starts_with("http://") || text.starts_with("https://")) {
        return None;
    }
    let end = text.find(char::is_whitespace).unwrap_or(text.len());
    let url = text[..end].trim_end_matches(|c: char| ".,;:!?)]'\"".contains(c));
    let scheme_len = if text.starts_with("https://") { 8 } else { 7 };
    (url.len() > scheme_len).then_some(url.len())
}
