//! Writer: day records → canonical markdown text.
//!
//! Output is the canonical form: blocks sorted newest-date-first, single
//! blank lines between sections and between day blocks, checkbox items
//! re-resolved against the live task list. Writing never fails.

use crate::date;
use crate::entry::{DayEntry, Section, SectionKind, Task, format_checkbox, parse_checkbox};

/// Serialize day records to document text.
///
/// Input order is irrelevant: blocks are emitted descending by date.
pub fn write(entries: &[DayEntry]) -> String {
    let mut sorted: Vec<&DayEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    let blocks: Vec<String> = sorted.iter().map(|e| write_entry(e)).collect();
    let mut out = blocks.join("\n\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

fn write_entry(entry: &DayEntry) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(date::format_header(entry.date));

    if entry.sections.is_empty() {
        write_legacy_layout(entry, &mut lines);
    } else {
        for section in &entry.sections {
            lines.push(String::new());
            write_section(section, &entry.tasks, &mut lines);
        }
    }

    lines.join("\n")
}

/// Fallback layout for entries built without explicit sections: a Tasks
/// section from the flat list, then the non-empty legacy fields.
fn write_legacy_layout(entry: &DayEntry, lines: &mut Vec<String>) {
    lines.push(String::new());
    lines.push("## Tasks".to_string());
    for task in &entry.tasks {
        lines.push(format_checkbox(task));
    }

    if !entry.goals.is_empty() {
        lines.push(String::new());
        lines.push("## Goals".to_string());
        for goal in &entry.goals {
            lines.push(format!("- {}", goal));
        }
    }

    if !entry.notes.is_empty() {
        lines.push(String::new());
        lines.push("## Notes".to_string());
        for note in &entry.notes {
            lines.push(format!("- {}", note));
        }
    }

    if !entry.reflections.is_empty() {
        lines.push(String::new());
        lines.push("## Reflections".to_string());
        for line in &entry.reflections {
            lines.push(line.clone());
        }
    }
}

fn write_section(section: &Section, tasks: &[Task], lines: &mut Vec<String>) {
    lines.push(format!("## {}", section.name));

    match section.kind {
        SectionKind::Text => {
            // Free text is emitted verbatim, blank items included.
            for item in &section.items {
                lines.push(item.clone());
            }
        }
        SectionKind::List | SectionKind::Tasks => {
            for item in &section.items {
                write_item(item, tasks, lines);
            }
        }
    }
}

/// Emit one stored item of a list/tasks section.
///
/// Checkbox-looking items are re-resolved against the flat task list by
/// title and re-emitted from the live task state, so toggling a task
/// updates its checkbox text even though the stored item string is stale.
fn write_item(item: &str, tasks: &[Task], lines: &mut Vec<String>) {
    let item = item.trim();
    if item.is_empty() {
        return;
    }

    match parse_checkbox(item) {
        Some(cb) => {
            if let Some(task) = tasks.iter().find(|t| t.title == cb.title) {
                lines.push(format_checkbox(task));
            } else if cb.title.is_empty() {
                // Empty placeholder from template scaffolding: dropped.
            } else {
                // Checkbox with no matching task: emitted unchanged.
                lines.push(item.to_string());
            }
        }
        None => lines.push(format!("- {}", item)),
    }
}
