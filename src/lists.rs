use crate::line::ListKind;

#[derive(Debug, Clone, Copy)]
struct Level {
    kind: ListKind,
    count: usize,
}

/// Renders Jira list items as Org items, numbering each depth on its own.
#[derive(Debug, Default)]
pub struct OrgListRenderer {
    levels: Vec<Level>,
    after_blank: bool,
}

impl OrgListRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the indentation and marker for the next item, e.g. `"  2. "`.
    pub fn item(&mut self, kind: ListKind, depth: usize) -> String {
        let depth = depth.max(1);
        if depth == 1 && self.after_blank {
            self.levels.clear();
        }
        self.after_blank = false;

        self.levels.truncate(depth);
        while self.levels.len() < depth {
            self.levels.push(Level { kind, count: 0 });
        }
        let level = &mut self.levels[depth - 1];
        if level.kind != kind {
            *level = Level { kind, count: 0 };
        }
        level.count += 1;

        let indent = "  ".repeat(depth - 1);
        match kind {
            ListKind::Ordered => format!("{indent}{}. ", level.count),
            ListKind::Unordered => format!("{indent}- "),
        }
    }

    /// A blank line keeps nesting state, but the next top-level item opens a
    /// fresh list.
    pub fn blank(&mut self) {
        if !self.levels.is_empty() {
            self.after_blank = true;
        }
    }

    pub fn reset(&mut self) {
        self.levels.clear();
        self.after_blank = false;
    }
}

/// Renders Org list items as Jira marker runs. Each depth remembers its kind
/// so a bullet under a numbered item becomes `#*`.
#[derive(Debug, Default)]
pub struct JiraListRenderer {
    kinds: Vec<ListKind>,
}

impl JiraListRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the marker run followed by a space, e.g. `"#* "`.
    pub fn item(&mut self, kind: ListKind, depth: usize) -> String {
        let depth = depth.max(1);
        self.kinds.truncate(depth);
        while self.kinds.len() < depth {
            self.kinds.push(kind);
        }
        self.kinds[depth - 1] = kind;

        let mut marker: String = self.kinds.iter().map(|k| k.jira_marker()).collect();
        marker.push(' ');
        marker
    }

    pub fn reset(&mut self) {
        self.kinds.clear();
    }
}
