//! Checkbox item syntax: `- [ ]`/`- [x]`/`- [X]` + title + optional
//! ` | <number><m|h>?` duration suffix.

use super::Task;
use super::duration::{DEFAULT_HOURS, format_duration, parse_duration};

/// A checkbox line decomposed into its parts.
///
/// The title may be empty: `- [ ] | 1.0h` is the "empty placeholder" form
/// used for template scaffolding. Placeholders never become tasks, and the
/// writer drops them when no task matches.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckboxLine {
    /// Task title; may be empty for placeholders.
    pub title: String,
    /// `[x]` / `[X]` → true, `[ ]` → false.
    pub completed: bool,
    /// Duration in hours; defaults to 1.0 when the suffix is absent or
    /// unparsable.
    pub hours: f64,
}

/// Parse a checkbox line. Returns `None` unless the line starts with
/// exactly `- [ ]`, `- [x]`, or `- [X]` — any other bracket content fails.
pub fn parse_checkbox(line: &str) -> Option<CheckboxLine> {
    let rest = line.strip_prefix("- [")?;
    let mut chars = rest.chars();
    let completed = match chars.next()? {
        ' ' => false,
        'x' | 'X' => true,
        _ => return None,
    };
    if chars.next()? != ']' {
        return None;
    }
    let body = chars.as_str();
    // Require a separator (or nothing at all) after the brackets, so
    // "- [x]ish" is not a checkbox.
    if !body.is_empty() && !body.starts_with(' ') {
        return None;
    }

    // Split on the last pipe: the duration suffix sits at the end, and a
    // title is allowed to contain '|' itself.
    let (title, hours) = match body.rsplit_once('|') {
        Some((title, suffix)) => (
            title.trim(),
            parse_duration(suffix).unwrap_or(DEFAULT_HOURS),
        ),
        None => (body.trim(), DEFAULT_HOURS),
    };

    Some(CheckboxLine {
        title: title.to_string(),
        completed,
        hours,
    })
}

/// Render a task as a canonical checkbox line.
pub fn format_checkbox(task: &Task) -> String {
    format!(
        "- [{}] {} | {}",
        if task.completed { 'x' } else { ' ' },
        task.title,
        format_duration(task.hours)
    )
}
