//! Document entities: day records, sections, and tasks.
//!
//! These are transient value types: they are reconstructed fresh on every
//! parse, and the markdown text itself is the only persisted state.
//! Callers mutate the in-memory records, then re-serialize the whole
//! document via [`crate::write`].

mod checkbox;
mod duration;

pub use checkbox::{CheckboxLine, format_checkbox, parse_checkbox};
pub use duration::{format_duration, parse_duration};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Reserved section name (case-insensitive) whose body is free text.
pub const REFLECTIONS_SECTION: &str = "Reflections";

/// Section name mirrored into the legacy `goals` field.
pub const GOALS_SECTION: &str = "Goals";

/// Section name mirrored into the legacy `notes` field.
pub const NOTES_SECTION: &str = "Notes";

/// The section name used by the legacy no-sections writer fallback.
pub const TASKS_SECTION: &str = "Tasks";

/// How a section's items are interpreted and re-serialized.
///
/// The kind is inferred from content on parse and is never tagged in the
/// text format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Plain bullet list items.
    List,
    /// Free text, preserved verbatim (the reserved "Reflections" section).
    Text,
    /// At least one item is a well-formed checkbox line.
    Tasks,
}

/// A `##`-introduced, ordered sub-region of a day block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Display name. Identity is case-insensitive only for the reserved
    /// "Reflections" name.
    pub name: String,
    /// Raw item strings in document order. Checkbox items are stored
    /// verbatim; plain list items are stored with their marker stripped.
    pub items: Vec<String>,
    /// Inferred kind.
    pub kind: SectionKind,
}

impl Section {
    /// Create an empty section of the given kind.
    pub fn new(name: impl Into<String>, kind: SectionKind) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
            kind,
        }
    }

    /// Whether this section's name is the reserved free-text name.
    pub fn is_reflections(&self) -> bool {
        self.name.eq_ignore_ascii_case(REFLECTIONS_SECTION)
    }
}

/// A single task, keyed by its title.
///
/// No persisted identifier survives a parse; titles are the only
/// cross-reference between a task and the checkbox line embedded in its
/// section's items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Title (key field).
    pub title: String,
    /// Duration in hours.
    pub hours: f64,
    /// Completion flag.
    pub completed: bool,
    /// When the task was completed, if known. In-memory only; the text
    /// format does not persist timestamps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create an incomplete task with the default 1.0h duration.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            hours: 1.0,
            completed: false,
            completed_at: None,
        }
    }

    /// Create an incomplete task with an explicit duration.
    pub fn with_hours(title: impl Into<String>, hours: f64) -> Self {
        Self {
            hours,
            ..Self::new(title)
        }
    }

    /// Mark the task completed as of now.
    pub fn complete(&mut self) {
        self.completed = true;
        self.completed_at = Some(Utc::now());
    }

    /// Mark the task incomplete, clearing the completion timestamp.
    pub fn reopen(&mut self) {
        self.completed = false;
        self.completed_at = None;
    }
}

/// One day's record: a date, ordered sections, and a flat task list.
///
/// The legacy `goals` / `notes` / `reflections` fields mirror same-named
/// sections for backward compatibility with pre-section data and are also
/// what the no-sections writer fallback emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayEntry {
    /// Calendar date (no time component).
    pub date: NaiveDate,
    /// Sections in document order.
    pub sections: Vec<Section>,
    /// Flat task list, in document order.
    pub tasks: Vec<Task>,
    /// Legacy mirror of a "Goals" section.
    #[serde(default)]
    pub goals: Vec<String>,
    /// Legacy mirror of a "Notes" section.
    #[serde(default)]
    pub notes: Vec<String>,
    /// Legacy mirror of a "Reflections" section (or of free text preceding
    /// any section, when no explicit Reflections section exists).
    #[serde(default)]
    pub reflections: Vec<String>,
}

impl DayEntry {
    /// Create an empty record for a date.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            sections: Vec::new(),
            tasks: Vec::new(),
            goals: Vec::new(),
            notes: Vec::new(),
            reflections: Vec::new(),
        }
    }

    /// Look up a task by exact title. Duplicate titles resolve to the
    /// first match in flat-list order.
    pub fn task(&self, title: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.title == title)
    }

    /// Mutable variant of [`DayEntry::task`], same first-match tie-break.
    pub fn task_mut(&mut self, title: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.title == title)
    }

    /// Find a section by name. The reserved "Reflections" name matches
    /// case-insensitively; all other names match exactly.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| {
            if name.eq_ignore_ascii_case(REFLECTIONS_SECTION) {
                s.is_reflections()
            } else {
                s.name == name
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_complete_reopen() {
        let mut task = Task::with_hours("Write report", 2.0);
        assert!(!task.completed);
        assert!(task.completed_at.is_none());

        task.complete();
        assert!(task.completed);
        assert!(task.completed_at.is_some());

        task.reopen();
        assert!(!task.completed);
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn test_first_match_tie_break() {
        let mut entry = DayEntry::new(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
        entry.tasks.push(Task::with_hours("Review", 1.0));
        entry.tasks.push(Task::with_hours("Review", 3.0));

        // Duplicate titles resolve to the first task in document order.
        assert_eq!(entry.task("Review").unwrap().hours, 1.0);
        entry.task_mut("Review").unwrap().completed = true;
        assert!(entry.tasks[0].completed);
        assert!(!entry.tasks[1].completed);
    }

    #[test]
    fn test_reflections_lookup_is_case_insensitive() {
        let mut entry = DayEntry::new(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
        entry
            .sections
            .push(Section::new("reflections", SectionKind::Text));

        assert!(entry.section("Reflections").is_some());
        assert!(entry.section("REFLECTIONS").is_some());
    }
}
