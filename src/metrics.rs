use serde::Serialize;

/// Counters collected during a single conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    pub lines: usize,
    pub headings: usize,
    pub list_items: usize,
    pub blocks: usize,
    pub inline_spans: usize,
}

impl ConversionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_line(&mut self) {
        self.lines += 1;
    }

    pub fn inc_heading(&mut self) {
        self.headings += 1;
    }

    pub fn inc_list_item(&mut self) {
        self.list_items += 1;
    }

    pub fn inc_block(&mut self) {
        self.blocks += 1;
    }

    pub fn summary(&self) -> String {
        format!(
            "metrics lines={} headings={} list_items={} blocks={} inline_spans={}",
            self.lines, self.headings, self.list_items, self.blocks, self.inline_spans
        )
    }
}
