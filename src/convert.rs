//! The two conversion pipelines.
//!
//! Both walk the input line by line. Fence state is checked before anything
//! else so block bodies are never classified, then each line is classified
//! and rendered in the other dialect. Every call builds its own state.

use std::fmt;

use serde::Serialize;

use crate::blocks::{self, FenceKind};
use crate::heading::{self, HeadingMark, HeadingPolicy};
use crate::inline::{Dialect, InlineConverter};
use crate::line::{self, Line};
use crate::lists::{JiraListRenderer, OrgListRenderer};
use crate::metrics::ConversionStats;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    pub heading_policy: HeadingPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Input ended inside a block opened on `line` (1-based). The closing
    /// fence was added to the output.
    UnterminatedBlock { line: usize, fence: FenceKind },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnterminatedBlock { line, fence } => {
                write!(f, "unterminated {fence} block opened on line {line}")
            }
        }
    }
}

/// Result of a conversion. For Jira→Org output, heading lines hold only
/// their title and `headings` records their semantic level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Conversion {
    pub text: String,
    pub headings: Vec<HeadingMark>,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: ConversionStats,
}

impl Conversion {
    /// Semantic level of the heading line starting at byte `offset`.
    pub fn heading_level_at(&self, offset: usize) -> Option<usize> {
        self.headings
            .iter()
            .find(|mark| mark.offset == offset)
            .map(|mark| mark.level)
    }

    /// Renders the text with concrete Org headings under an outline whose
    /// depth is `base_level`; a Jira `h1.` becomes `base_level + 1` asterisks.
    pub fn render_headings(&self, base_level: usize) -> String {
        heading::materialize(&self.text, &self.headings, base_level)
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Debug, Default)]
struct LineWriter {
    buf: String,
    lines: usize,
}

impl LineWriter {
    /// Appends a line and returns the byte offset where it starts.
    fn push(&mut self, line: &str) -> usize {
        if self.lines > 0 {
            self.buf.push('\n');
        }
        let offset = self.buf.len();
        self.buf.push_str(line);
        self.lines += 1;
        offset
    }

    fn finish(mut self, trailing_newline: bool) -> String {
        if trailing_newline && self.lines > 0 {
            self.buf.push('\n');
        }
        self.buf
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenBlock {
    kind: FenceKind,
    line: usize,
}

/// Converts Jira markup to Org markup with heading levels as metadata.
pub fn jira_to_org(text: &str) -> Conversion {
    let mut pipeline = JiraToOrg::new();
    for (idx, raw) in text.lines().enumerate() {
        pipeline.line(idx + 1, raw);
    }
    pipeline.finish(text.ends_with('\n'))
}

/// Converts Org markup to Jira markup, clamping headings deeper than `h6.`.
pub fn org_to_jira(text: &str) -> String {
    org_to_jira_with(text, &ConvertOptions::default()).text
}

pub fn org_to_jira_with(text: &str, options: &ConvertOptions) -> Conversion {
    let mut pipeline = OrgToJira::new(*options);
    for (idx, raw) in text.lines().enumerate() {
        pipeline.line(idx + 1, raw);
    }
    pipeline.finish(text.ends_with('\n'))
}

struct JiraToOrg {
    out: LineWriter,
    lists: OrgListRenderer,
    inline: InlineConverter,
    verbatim: Option<OpenBlock>,
    quote: Option<OpenBlock>,
    headings: Vec<HeadingMark>,
    diagnostics: Vec<Diagnostic>,
    stats: ConversionStats,
}

impl JiraToOrg {
    fn new() -> Self {
        Self {
            out: LineWriter::default(),
            lists: OrgListRenderer::new(),
            inline: InlineConverter::new(Dialect::Jira),
            verbatim: None,
            quote: None,
            headings: Vec::new(),
            diagnostics: Vec::new(),
            stats: ConversionStats::new(),
        }
    }

    fn line(&mut self, number: usize, raw: &str) {
        self.stats.inc_line();

        if let Some(block) = self.verbatim {
            match blocks::split_jira_close(raw, block.kind) {
                Some(before) => self.close_verbatim(block.kind, before),
                None => {
                    self.out.push(raw);
                }
            }
            return;
        }

        if self.quote.is_some() {
            if let Some(before) = blocks::split_jira_close(raw, FenceKind::Quote) {
                if !before.trim().is_empty() {
                    self.markup_line(number, before);
                }
                self.close_quote();
                return;
            }
        }

        self.markup_line(number, raw);
    }

    fn markup_line(&mut self, number: usize, raw: &str) {
        match line::classify_jira(raw) {
            Line::Blank => {
                self.lists.blank();
                self.out.push("");
            }
            Line::FenceOpen { fence, rest } => {
                self.lists.reset();
                self.stats.inc_block();
                self.out.push(&blocks::render_org_open(&fence));
                let block = OpenBlock {
                    kind: fence.kind,
                    line: number,
                };
                if fence.kind.is_verbatim() {
                    match blocks::split_jira_close(rest, fence.kind) {
                        Some(before) => self.close_verbatim(fence.kind, before),
                        None => {
                            if !rest.trim().is_empty() {
                                self.out.push(rest);
                            }
                            self.verbatim = Some(block);
                        }
                    }
                } else {
                    self.quote = Some(block);
                    match blocks::split_jira_close(rest, FenceKind::Quote) {
                        Some(before) => {
                            if !before.trim().is_empty() {
                                self.text_line(before);
                            }
                            self.close_quote();
                        }
                        None if !rest.trim().is_empty() => self.text_line(rest),
                        None => {}
                    }
                }
            }
            // Org has no headings inside a quote block.
            Line::Heading { text, .. } if self.quote.is_some() => self.text_line(text),
            Line::Heading { level, text } => {
                self.lists.reset();
                self.stats.inc_heading();
                let title = self.inline.convert(text);
                let offset = self.out.push(&title);
                self.headings.push(HeadingMark { offset, level });
            }
            Line::ListItem { kind, depth, text } => {
                self.stats.inc_list_item();
                let marker = self.lists.item(kind, depth);
                let body = self.inline.convert(text);
                self.out.push(&format!("{marker}{body}"));
            }
            Line::Rule => {
                self.lists.reset();
                self.out.push("-----");
            }
            Line::Comment => {}
            Line::Text(text) => self.text_line(text),
        }
    }

    fn text_line(&mut self, text: &str) {
        self.lists.reset();
        let converted = self.inline.convert(text);
        self.out.push(&converted);
    }

    fn close_verbatim(&mut self, kind: FenceKind, before: &str) {
        if !before.trim().is_empty() {
            self.out.push(before);
        }
        self.out.push(&blocks::render_org_close(kind));
        self.verbatim = None;
    }

    fn close_quote(&mut self) {
        self.lists.reset();
        self.out.push(&blocks::render_org_close(FenceKind::Quote));
        self.quote = None;
    }

    fn finish(mut self, trailing_newline: bool) -> Conversion {
        if let Some(block) = self.verbatim.take() {
            self.out.push(&blocks::render_org_close(block.kind));
            self.diagnostics.push(Diagnostic::UnterminatedBlock {
                line: block.line,
                fence: block.kind,
            });
        }
        if let Some(block) = self.quote.take() {
            self.out.push(&blocks::render_org_close(block.kind));
            self.diagnostics.push(Diagnostic::UnterminatedBlock {
                line: block.line,
                fence: block.kind,
            });
        }
        self.stats.inline_spans = self.inline.spans();
        Conversion {
            text: self.out.finish(trailing_newline),
            headings: self.headings,
            diagnostics: self.diagnostics,
            stats: self.stats,
        }
    }
}

struct OrgToJira {
    options: ConvertOptions,
    out: LineWriter,
    lists: JiraListRenderer,
    inline: InlineConverter,
    verbatim: Option<OpenBlock>,
    quote: Option<OpenBlock>,
    diagnostics: Vec<Diagnostic>,
    stats: ConversionStats,
}

impl OrgToJira {
    fn new(options: ConvertOptions) -> Self {
        Self {
            options,
            out: LineWriter::default(),
            lists: JiraListRenderer::new(),
            inline: InlineConverter::new(Dialect::Org),
            verbatim: None,
            quote: None,
            diagnostics: Vec::new(),
            stats: ConversionStats::new(),
        }
    }

    fn line(&mut self, number: usize, raw: &str) {
        self.stats.inc_line();

        if let Some(block) = self.verbatim {
            if blocks::is_org_close(raw, block.kind) {
                self.out.push(&blocks::render_jira_close(block.kind));
                self.verbatim = None;
            } else {
                self.out.push(raw);
            }
            return;
        }

        if self.quote.is_some() && blocks::is_org_close(raw, FenceKind::Quote) {
            self.lists.reset();
            self.out.push(&blocks::render_jira_close(FenceKind::Quote));
            self.quote = None;
            return;
        }

        match line::classify_org(raw) {
            Line::Blank => {
                self.out.push("");
            }
            Line::FenceOpen { fence, .. } => {
                self.lists.reset();
                self.stats.inc_block();
                self.out.push(&blocks::render_jira_open(&fence));
                let block = OpenBlock {
                    kind: fence.kind,
                    line: number,
                };
                if fence.kind.is_verbatim() {
                    self.verbatim = Some(block);
                } else {
                    self.quote = Some(block);
                }
            }
            Line::Heading { level: stars, text } => {
                self.lists.reset();
                match heading::jira_level_for_stars(stars, self.options.heading_policy) {
                    Some(level) => {
                        self.stats.inc_heading();
                        let title = self.inline.convert(text);
                        self.out.push(&heading::render_jira(level, &title));
                    }
                    None => {
                        self.out.push(raw);
                    }
                }
            }
            Line::ListItem { kind, depth, text } => {
                self.stats.inc_list_item();
                let marker = self.lists.item(kind, depth);
                let body = self.inline.convert(text);
                self.out.push(&format!("{marker}{body}"));
            }
            Line::Rule => {
                self.lists.reset();
                self.out.push("----");
            }
            // Org comments and keywords are not exported.
            Line::Comment => {}
            Line::Text(text) => {
                self.lists.reset();
                let converted = self.inline.convert(text);
                self.out.push(&converted);
            }
        }
    }

    fn finish(mut self, trailing_newline: bool) -> Conversion {
        for block in [self.verbatim.take(), self.quote.take()].into_iter().flatten() {
            self.out.push(&blocks::render_jira_close(block.kind));
            self.diagnostics.push(Diagnostic::UnterminatedBlock {
                line: block.line,
                fence: block.kind,
            });
        }
        self.stats.inline_spans = self.inline.spans();
        Conversion {
            text: self.out.finish(trailing_newline),
            headings: Vec::new(),
            diagnostics: self.diagnostics,
            stats: self.stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_nested_jira_list() {
        let input = "# Item 1\n# Item 2\n# Item 3 with sub-items:\n#* Sub-item A\n#* Sub-item B\n# Item 4";
        let expected = "1. Item 1\n2. Item 2\n3. Item 3 with sub-items:\n  - Sub-item A\n  - Sub-item B\n4. Item 4";
        assert_eq!(jira_to_org(input).text, expected);
    }

    #[test]
    fn three_asterisk_jira_item_is_a_deep_bullet() {
        let conversion = jira_to_org("* Item\n** Sub-item\n*** Sub-sub-item");
        assert_eq!(conversion.text, "- Item\n  - Sub-item\n    - Sub-sub-item");
        assert!(!conversion.text.contains("***"));
        assert!(conversion.headings.is_empty());
    }

    #[test]
    fn numbering_restarts_after_text_or_blank() {
        let input = "# a\n# b\n\n# c\nplain\n# d";
        assert_eq!(jira_to_org(input).text, "1. a\n2. b\n\n1. c\nplain\n1. d");
    }

    #[test]
    fn jira_headings_carry_levels_as_metadata() {
        let conversion = jira_to_org("h1. Summary\nText with *bold*\nh3. Deep _one_");
        assert_eq!(conversion.text, "Summary\nText with *bold*\nDeep /one/");
        assert_eq!(conversion.heading_level_at(0), Some(1));
        assert_eq!(conversion.heading_level_at(25), Some(3));
        assert_eq!(conversion.heading_level_at(8), None);
        assert_eq!(
            conversion.render_headings(2),
            "*** Summary\nText with *bold*\n***** Deep /one/"
        );
    }

    #[test]
    fn jira_code_block_body_is_verbatim() {
        let input = "{code:python}\n* not a bullet *\nh1. not a heading\n{code}\n_after_";
        let conversion = jira_to_org(input);
        assert_eq!(
            conversion.text,
            "#+begin_src python\n* not a bullet *\nh1. not a heading\n#+end_src\n/after/"
        );
        assert!(conversion.headings.is_empty());
        assert_eq!(conversion.stats.blocks, 1);
    }

    #[test]
    fn jira_noformat_and_single_line_code() {
        assert_eq!(
            jira_to_org("{noformat}\n# raw\n{noformat}").text,
            "#+begin_example\n# raw\n#+end_example"
        );
        assert_eq!(
            jira_to_org("{code}let x = 1;{code}").text,
            "#+begin_src\nlet x = 1;\n#+end_src"
        );
        assert_eq!(
            jira_to_org("{code:sh}ls -la\necho done{code}").text,
            "#+begin_src sh\nls -la\necho done\n#+end_src"
        );
    }

    #[test]
    fn unterminated_jira_block_keeps_content_and_reports() {
        let conversion = jira_to_org("before\n{code}\n*x*\n");
        assert_eq!(conversion.text, "before\n#+begin_src\n*x*\n#+end_src\n");
        assert_eq!(
            conversion.diagnostics,
            vec![Diagnostic::UnterminatedBlock {
                line: 2,
                fence: FenceKind::Code
            }]
        );
        assert_eq!(
            conversion.diagnostics[0].to_string(),
            "unterminated src block opened on line 2"
        );
    }

    #[test]
    fn jira_quote_body_is_converted() {
        assert_eq!(
            jira_to_org("{quote}\n* _said_\n{quote}").text,
            "#+begin_quote\n- /said/\n#+end_quote"
        );
        assert_eq!(
            jira_to_org("{quote}short *one*{quote}").text,
            "#+begin_quote\nshort *one*\n#+end_quote"
        );
    }

    #[test]
    fn jira_heading_inside_quote_is_plain_text() {
        let conversion = jira_to_org("{quote}\nh2. Inside _it_\n{quote}\nh1. After");
        assert_eq!(
            conversion.text,
            "#+begin_quote\nInside /it/\n#+end_quote\nAfter"
        );
        assert_eq!(conversion.headings.len(), 1);
        assert_eq!(conversion.headings[0].level, 1);
        assert_eq!(conversion.stats.headings, 1);
    }

    #[test]
    fn jira_rule_and_links_pass_through() {
        assert_eq!(
            jira_to_org("----\n[Home|https://x.io/a_b]").text,
            "-----\n[Home|https://x.io/a_b]"
        );
    }

    #[test]
    fn trailing_newline_and_crlf_are_handled() {
        assert_eq!(jira_to_org("# a\r\n# b\r\n").text, "1. a\n2. b\n");
        assert_eq!(jira_to_org("").text, "");
        assert!(jira_to_org("   \n").is_blank());
    }

    #[test]
    fn converts_nested_org_list() {
        assert_eq!(
            org_to_jira("1. First\n  1. Sub first\n  2. Sub second"),
            "# First\n## Sub first\n## Sub second"
        );
        assert_eq!(
            org_to_jira("1. Item\n  - Bullet\n    - Deeper\n2. Next"),
            "# Item\n#* Bullet\n#** Deeper\n# Next"
        );
    }

    #[test]
    fn org_headings_map_from_three_asterisks() {
        assert_eq!(
            org_to_jira("*** Top\n**** Second /it/\n* Shallow"),
            "h1. Top\nh2. Second _it_\n* Shallow"
        );
    }

    #[test]
    fn deep_org_headings_clamp_by_default() {
        assert_eq!(org_to_jira("********* Nine"), "h6. Nine");
        let options = ConvertOptions {
            heading_policy: HeadingPolicy::Passthrough,
        };
        let conversion = org_to_jira_with("********* Nine\n******** Eight", &options);
        assert_eq!(conversion.text, "********* Nine\nh6. Eight");
        assert_eq!(conversion.stats.headings, 1);
    }

    #[test]
    fn org_blocks_convert_with_verbatim_bodies() {
        assert_eq!(
            org_to_jira("#+BEGIN_SRC rust\n* not a bullet *\n/keep/\n#+END_SRC"),
            "{code:rust}\n* not a bullet *\n/keep/\n{code}"
        );
        assert_eq!(
            org_to_jira("#+begin_example\n- raw\n#+end_example"),
            "{noformat}\n- raw\n{noformat}"
        );
        assert_eq!(
            org_to_jira("#+begin_quote\n/said/\n#+end_quote"),
            "{quote}\n_said_\n{quote}"
        );
    }

    #[test]
    fn unterminated_org_block_is_closed() {
        let conversion = org_to_jira_with("#+begin_src\nx", &ConvertOptions::default());
        assert_eq!(conversion.text, "{code}\nx\n{code}");
        assert_eq!(conversion.diagnostics.len(), 1);
    }

    #[test]
    fn org_links_comments_and_rules() {
        assert_eq!(
            org_to_jira("#+TITLE: Notes\n# private\nSee [[https://example.com][Example]]\n-----"),
            "See [Example|https://example.com]\n----"
        );
    }

    #[test]
    fn conversion_is_deterministic() {
        let input = "h2. T\n# a\n#* b\n{code}\nx\n{code}\n+u+ -s- {{c}}";
        assert_eq!(jira_to_org(input), jira_to_org(input));
    }
}
