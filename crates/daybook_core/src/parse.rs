//! Parser: markdown text → ordered day records.
//!
//! Parsing is position-independent and never fails: malformed input
//! degrades silently to a less specific category or is dropped, so
//! arbitrary hand-edited documents always produce a usable model.
//!
//! A document is split into day blocks at `# <date>` header lines. Within
//! a block, every non-header line is classified in priority order:
//! checkbox task, plain list item, free text. Section headers (`## name`)
//! flush the open section and open a new one.

use chrono::NaiveDate;

use crate::date;
use crate::entry::{
    DayEntry, GOALS_SECTION, NOTES_SECTION, REFLECTIONS_SECTION, Section, SectionKind, Task,
    parse_checkbox,
};

/// Parse a whole document into day records, in document order.
///
/// Unmatched leading material before the first day header is discarded.
/// Blocks whose header fails strict `YYYY-MM-DD` parsing are dropped
/// entirely.
pub fn parse(text: &str) -> Vec<DayEntry> {
    let mut entries = Vec::new();
    // None both before the first header and inside a dropped block: lines
    // are discarded either way.
    let mut block: Option<BlockParser> = None;

    for line in text.lines() {
        match header_date(line) {
            Some(date) => {
                if let Some(prev) = block.take() {
                    entries.push(prev.finish());
                }
                if date.is_none() {
                    log::debug!("dropping day block with unparsable header: {}", line);
                }
                block = date.map(BlockParser::new);
            }
            None => {
                if let Some(block) = block.as_mut() {
                    block.push_line(line);
                }
            }
        }
    }
    if let Some(prev) = block.take() {
        entries.push(prev.finish());
    }

    entries
}

/// Classify a day header line.
///
/// Returns `None` for non-header lines, `Some(None)` for a `#` header
/// whose first token is not a strict date (the block is dropped), and
/// `Some(Some(date))` for a valid day boundary. Trailing text after the
/// date token (e.g. a weekday name) is ignored.
fn header_date(line: &str) -> Option<Option<NaiveDate>> {
    let rest = line.strip_prefix('#')?;
    // A second '#' means a section header; anything else glued to the '#'
    // is ordinary text.
    if !rest.starts_with(' ') && !rest.starts_with('\t') {
        return None;
    }
    Some(rest.split_whitespace().next().and_then(date::parse_strict))
}

/// Explicit per-line parser state: which section (if any) is open, and
/// what its content so far implies about its kind.
enum SectionState {
    /// No `##` header seen yet in this block.
    NoSection,
    /// Open section containing only plain items so far.
    List { name: String, items: Vec<String> },
    /// Open section containing at least one checkbox line.
    Tasks { name: String, items: Vec<String> },
    /// Open "Reflections" section: free text, preserved verbatim.
    Text { name: String, items: Vec<String> },
}

struct BlockParser {
    entry: DayEntry,
    state: SectionState,
    /// Free text seen before any section header; becomes the legacy
    /// `reflections` field only if the block never opens an explicit
    /// Reflections section.
    preamble: Vec<String>,
    saw_reflections: bool,
}

impl BlockParser {
    fn new(date: NaiveDate) -> Self {
        Self {
            entry: DayEntry::new(date),
            state: SectionState::NoSection,
            preamble: Vec::new(),
            saw_reflections: false,
        }
    }

    fn push_line(&mut self, raw: &str) {
        let line = raw.trim_end();
        let trimmed = line.trim_start();

        // Blank lines are skipped everywhere except inside a Reflections
        // section, where they preserve paragraph breaks.
        if trimmed.is_empty() {
            if let SectionState::Text { items, .. } = &mut self.state {
                items.push(String::new());
            }
            return;
        }

        // Section header: flush the open section, open a new one.
        if let Some(name) = trimmed.strip_prefix("## ") {
            let name = name.trim().to_string();
            self.flush_section();
            self.state = if name.eq_ignore_ascii_case(REFLECTIONS_SECTION) {
                self.saw_reflections = true;
                SectionState::Text {
                    name,
                    items: Vec::new(),
                }
            } else {
                SectionState::List {
                    name,
                    items: Vec::new(),
                }
            };
            return;
        }

        // Legacy horizontal rules are separators, not content. Inside a
        // Reflections section they fall through and are kept verbatim.
        if !matches!(self.state, SectionState::Text { .. })
            && trimmed.len() >= 3
            && trimmed.bytes().all(|b| b == b'-')
        {
            return;
        }

        // 1. Checkbox task
        if let Some(cb) = parse_checkbox(trimmed) {
            // Empty-title placeholders stay section scaffolding only.
            if !cb.title.is_empty() {
                self.entry.tasks.push(Task {
                    title: cb.title,
                    hours: cb.hours,
                    completed: cb.completed,
                    completed_at: None,
                });
            }
            self.push_checkbox_item(trimmed);
            return;
        }

        // 2. Plain list item
        if let Some(item) = strip_list_marker(trimmed) {
            self.push_plain_item(item);
            return;
        }

        // 3. Free text
        self.push_free_text(line);
    }

    /// Append a checkbox line verbatim to the open section, upgrading a
    /// plain-list section to a tasks section.
    ///
    /// With no section open the task stays in the flat list only: it will
    /// not be attached to any section, and vanishes from section-based
    /// writer output on the next structured save. Preserved as observed.
    fn push_checkbox_item(&mut self, line: &str) {
        let state = std::mem::replace(&mut self.state, SectionState::NoSection);
        self.state = match state {
            SectionState::NoSection => SectionState::NoSection,
            // A checkbox upgrades a plain-list section to a tasks section.
            SectionState::List { name, mut items } | SectionState::Tasks { name, mut items } => {
                items.push(line.to_string());
                SectionState::Tasks { name, items }
            }
            SectionState::Text { name, mut items } => {
                items.push(line.to_string());
                SectionState::Text { name, items }
            }
        };
    }

    fn push_plain_item(&mut self, item: &str) {
        match &mut self.state {
            SectionState::NoSection => {
                // No open section: plain items default into legacy notes.
                self.entry.notes.push(item.to_string());
            }
            SectionState::List { name, items }
            | SectionState::Tasks { name, items }
            | SectionState::Text { name, items } => {
                items.push(item.to_string());
                if name.eq_ignore_ascii_case(GOALS_SECTION) {
                    self.entry.goals.push(item.to_string());
                } else if name.eq_ignore_ascii_case(NOTES_SECTION) {
                    self.entry.notes.push(item.to_string());
                } else if name.eq_ignore_ascii_case(REFLECTIONS_SECTION) {
                    self.entry.reflections.push(item.to_string());
                }
            }
        }
    }

    fn push_free_text(&mut self, line: &str) {
        match &mut self.state {
            SectionState::NoSection => {
                self.preamble.push(line.trim_start().to_string());
            }
            SectionState::Text { items, .. } => {
                items.push(line.to_string());
                self.entry.reflections.push(line.trim_start().to_string());
            }
            SectionState::List { items, .. } | SectionState::Tasks { items, .. } => {
                // Stray prose inside a structured section is kept as a raw
                // item; the writer re-serializes it with a forced "- "
                // prefix. Known round-trip quirk, preserved.
                items.push(line.trim_start().to_string());
            }
        }
    }

    fn flush_section(&mut self) {
        let section = match std::mem::replace(&mut self.state, SectionState::NoSection) {
            SectionState::NoSection => return,
            SectionState::List { name, items } => Section {
                name,
                items,
                kind: SectionKind::List,
            },
            SectionState::Tasks { name, items } => Section {
                name,
                items,
                kind: SectionKind::Tasks,
            },
            SectionState::Text { name, mut items } => {
                // Blank lines between the section body and the next day
                // header are structural, not content.
                while items.last().is_some_and(|i| i.is_empty()) {
                    items.pop();
                }
                Section {
                    name,
                    items,
                    kind: SectionKind::Text,
                }
            }
        };
        self.entry.sections.push(section);
    }

    fn finish(mut self) -> DayEntry {
        self.flush_section();
        if !self.saw_reflections && self.entry.reflections.is_empty() {
            self.entry.reflections = self.preamble;
        }
        self.entry
    }
}

/// Strip a plain list marker: `- `, `* `, `+ `, or a numbered `N. `.
fn strip_list_marker(line: &str) -> Option<&str> {
    for marker in ["- ", "* ", "+ "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return Some(rest.trim_start());
        }
    }
    // Numbered item: one or more digits, then ". "
    let digits = line.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits > 0
        && let Some(rest) = line[digits..].strip_prefix(". ")
    {
        return Some(rest.trim_start());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::SectionKind;

    #[test]
    fn test_two_headers_two_entries() {
        let text = "# 2026-01-05 Monday\n- [ ] A\n# 2026-01-06 Tuesday\n- [ ] B\n";
        let entries = parse(text);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].tasks[0].title, "A");
        assert_eq!(entries[1].tasks[0].title, "B");
    }

    #[test]
    fn test_bad_header_drops_whole_block() {
        let text = "# not-a-date\n- [ ] lost\n# 2026-01-05\n- [ ] kept\n";
        let entries = parse(text);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].tasks.len(), 1);
        assert_eq!(entries[0].tasks[0].title, "kept");
    }

    #[test]
    fn test_leading_material_discarded() {
        let text = "stray prose\n- floating item\n# 2026-01-05\n";
        let entries = parse(text);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].tasks.is_empty());
    }

    #[test]
    fn test_header_trailing_text_ignored() {
        let entries = parse("# 2026-01-05 Monday extra words\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].date,
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
        );
    }

    #[test]
    fn test_e2e_tasks_section() {
        let text =
            "# 2026-01-05 Monday\n\n## Tasks\n- [x] Design homepage | 2.0h\n- [ ] Client meeting | 1.0h\n";
        let entries = parse(text);
        assert_eq!(entries.len(), 1);

        let entry = &entries[0];
        assert_eq!(entry.tasks.len(), 2);
        assert!(entry.tasks[0].completed);
        assert_eq!(entry.tasks[0].hours, 2.0);
        assert!(!entry.tasks[1].completed);
        assert_eq!(entry.tasks[1].hours, 1.0);

        assert_eq!(entry.sections.len(), 1);
        assert_eq!(entry.sections[0].name, "Tasks");
        assert_eq!(entry.sections[0].kind, SectionKind::Tasks);
        assert_eq!(entry.sections[0].items.len(), 2);
    }

    #[test]
    fn test_section_kind_inference() {
        let text = "# 2026-01-05\n\n## Mixed\n- plain one\n- [ ] boxed | 1.0h\n\n## Plain\n- a\n- b\n\n## REFLECTIONS\n- [ ] even with a checkbox\n";
        let entry = &parse(text)[0];

        assert_eq!(entry.sections[0].kind, SectionKind::Tasks);
        assert_eq!(entry.sections[1].kind, SectionKind::List);
        // Reserved name wins regardless of content
        assert_eq!(entry.sections[2].kind, SectionKind::Text);
        // ...but the checkbox inside it still reaches the flat task list
        assert!(entry.task("even with a checkbox").is_some());
    }

    #[test]
    fn test_checkbox_before_any_section() {
        let text = "# 2026-01-05\n- [ ] orphan | 2.0h\n\n## Tasks\n- [ ] attached\n";
        let entry = &parse(text)[0];

        // Recorded in the flat list, but attached to no section.
        assert_eq!(entry.tasks.len(), 2);
        assert_eq!(entry.tasks[0].title, "orphan");
        assert_eq!(entry.sections.len(), 1);
        assert_eq!(entry.sections[0].items, vec!["- [ ] attached"]);
    }

    #[test]
    fn test_goals_notes_mirroring() {
        let text = "# 2026-01-05\n\n## Goals\n- ship the release\n\n## Notes\n1. first\n2. second\n* starred\n";
        let entry = &parse(text)[0];

        assert_eq!(entry.goals, vec!["ship the release"]);
        assert_eq!(entry.notes, vec!["first", "second", "starred"]);
        assert_eq!(entry.sections[1].items, vec!["first", "second", "starred"]);
    }

    #[test]
    fn test_plain_item_without_section_goes_to_notes() {
        let text = "# 2026-01-05\n- loose thought\n";
        let entry = &parse(text)[0];
        assert_eq!(entry.notes, vec!["loose thought"]);
        assert!(entry.sections.is_empty());
    }

    #[test]
    fn test_reflections_preserves_blank_lines() {
        let text = "# 2026-01-05\n\n## Reflections\nfirst paragraph\n\nsecond paragraph\n";
        let entry = &parse(text)[0];
        let section = &entry.sections[0];
        assert_eq!(
            section.items,
            vec!["first paragraph", "", "second paragraph"]
        );
        assert_eq!(entry.reflections, vec!["first paragraph", "second paragraph"]);
    }

    #[test]
    fn test_preamble_becomes_reflections_when_no_section() {
        let text = "# 2026-01-05\nwoke up early\nfelt good\n";
        let entry = &parse(text)[0];
        assert_eq!(entry.reflections, vec!["woke up early", "felt good"]);
    }

    #[test]
    fn test_preamble_dropped_when_reflections_section_exists() {
        let text = "# 2026-01-05\nbuffered text\n\n## Reflections\nthe real thing\n";
        let entry = &parse(text)[0];
        assert_eq!(entry.reflections, vec!["the real thing"]);
    }

    #[test]
    fn test_free_text_in_structured_section_kept_as_raw_item() {
        let text = "# 2026-01-05\n\n## Tasks\n- [ ] real | 1.0h\n> a blockquote\n";
        let entry = &parse(text)[0];
        assert_eq!(
            entry.sections[0].items,
            vec!["- [ ] real | 1.0h", "> a blockquote"]
        );
    }

    #[test]
    fn test_malformed_checkbox_degrades_to_list_item() {
        let text = "# 2026-01-05\n\n## Tasks\n- [y] not a box\n";
        let entry = &parse(text)[0];
        assert!(entry.tasks.is_empty());
        assert_eq!(entry.sections[0].kind, SectionKind::List);
        assert_eq!(entry.sections[0].items, vec!["[y] not a box"]);
    }

    #[test]
    fn test_empty_placeholder_kept_in_section_not_in_tasks() {
        let text = "# 2026-01-05\n\n## Tasks\n- [ ] | 1.0h\n";
        let entry = &parse(text)[0];
        assert!(entry.tasks.is_empty());
        assert_eq!(entry.sections[0].kind, SectionKind::Tasks);
        assert_eq!(entry.sections[0].items, vec!["- [ ] | 1.0h"]);
    }

    #[test]
    fn test_horizontal_rule_ignored() {
        let text = "# 2026-01-05\n\n## Tasks\n- [ ] a | 1.0h\n---\n\n# 2026-01-04\n";
        let entries = parse(text);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].sections[0].items, vec!["- [ ] a | 1.0h"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n\n").is_empty());
    }
}
