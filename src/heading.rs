use serde::{Deserialize, Serialize};

/// Fewest Org asterisks that still convert; three asterisks map to `h1.`.
pub const MIN_ORG_STARS: usize = 3;
pub const MAX_LEVEL: usize = 6;

/// What to do with Org headings deeper than `h6.`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingPolicy {
    /// Render as `h6.`.
    #[default]
    Clamp,
    /// Leave the line untouched.
    Passthrough,
}

impl std::str::FromStr for HeadingPolicy {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "clamp" => Ok(HeadingPolicy::Clamp),
            "passthrough" => Ok(HeadingPolicy::Passthrough),
            other => Err(format!(
                "unknown heading policy '{other}', expected clamp or passthrough"
            )),
        }
    }
}

/// Semantic level of a heading line in Jira→Org output. `offset` is the byte
/// offset of the line start in the converted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeadingMark {
    pub offset: usize,
    pub level: usize,
}

/// Maps an Org asterisk count to a Jira heading level, or `None` when the
/// line should pass through unchanged.
pub fn jira_level_for_stars(stars: usize, policy: HeadingPolicy) -> Option<usize> {
    if stars < MIN_ORG_STARS {
        return None;
    }
    let level = stars - (MIN_ORG_STARS - 1);
    if level <= MAX_LEVEL {
        return Some(level);
    }
    match policy {
        HeadingPolicy::Clamp => Some(MAX_LEVEL),
        HeadingPolicy::Passthrough => None,
    }
}

pub fn render_jira(level: usize, text: &str) -> String {
    format!("h{level}. {text}")
}

/// Asterisk run for a heading of `level` under an outline whose base depth is
/// `base_level`.
pub fn org_stars(base_level: usize, level: usize) -> String {
    "*".repeat(base_level + level)
}

/// Prefixes every marked heading line of `text` with its asterisk run.
pub fn materialize(text: &str, headings: &[HeadingMark], base_level: usize) -> String {
    let mut marks: Vec<&HeadingMark> = headings.iter().collect();
    marks.sort_by_key(|mark| mark.offset);

    let mut out = String::with_capacity(text.len() + headings.len() * (base_level + 4));
    let mut cursor = 0;
    for mark in marks {
        if mark.offset < cursor || mark.offset > text.len() {
            continue;
        }
        out.push_str(&text[cursor..mark.offset]);
        out.push_str(&org_stars(base_level, mark.level));
        let title_empty = text[mark.offset..]
            .chars()
            .next()
            .map_or(true, |c| c == '\n');
        if !title_empty {
            out.push(' ');
        }
        cursor = mark.offset;
    }
    out.push_str(&text[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_stars_is_level_one() {
        assert_eq!(jira_level_for_stars(3, HeadingPolicy::Clamp), Some(1));
        assert_eq!(jira_level_for_stars(8, HeadingPolicy::Clamp), Some(6));
    }

    #[test]
    fn shallow_headings_are_not_converted() {
        assert_eq!(jira_level_for_stars(1, HeadingPolicy::Clamp), None);
        assert_eq!(jira_level_for_stars(2, HeadingPolicy::Passthrough), None);
    }

    #[test]
    fn deep_headings_follow_policy() {
        assert_eq!(jira_level_for_stars(9, HeadingPolicy::Clamp), Some(6));
        assert_eq!(jira_level_for_stars(12, HeadingPolicy::Clamp), Some(6));
        assert_eq!(jira_level_for_stars(9, HeadingPolicy::Passthrough), None);
    }

    #[test]
    fn parses_policy_names() {
        assert_eq!("Clamp".parse::<HeadingPolicy>(), Ok(HeadingPolicy::Clamp));
        assert_eq!(
            "passthrough".parse::<HeadingPolicy>(),
            Ok(HeadingPolicy::Passthrough)
        );
        assert!("round".parse::<HeadingPolicy>().is_err());
    }

    #[test]
    fn renders_jira_heading_with_single_space() {
        assert_eq!(render_jira(2, "Details"), "h2. Details");
    }

    #[test]
    fn materializes_headings_at_base_level() {
        let text = "Title\nbody\nSub";
        let headings = [
            HeadingMark {
                offset: 0,
                level: 1,
            },
            HeadingMark {
                offset: 11,
                level: 2,
            },
        ];
        assert_eq!(materialize(text, &headings, 2), "*** Title\nbody\n**** Sub");
        assert_eq!(materialize(text, &headings, 0), "* Title\nbody\n** Sub");
    }

    #[test]
    fn empty_heading_title_has_no_trailing_space() {
        let headings = [HeadingMark {
            offset: 0,
            level: 1,
        }];
        assert_eq!(materialize("\nnext", &headings, 1), "**\nnext");
    }
}
