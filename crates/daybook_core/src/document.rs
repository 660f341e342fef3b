//! Derived document operations.
//!
//! There is no targeted in-place text patch: every operation re-parses
//! the whole document, mutates the logical record list, and re-serializes
//! through [`crate::write`], so each update re-sorts and re-canonicalizes
//! the entire document.

use chrono::NaiveDate;

use crate::entry::DayEntry;
use crate::parse::parse;
use crate::write::write;

/// Serialize a single day record to canonical text.
pub fn write_day(entry: &DayEntry) -> String {
    write(std::slice::from_ref(entry))
}

/// Append a record to the document.
///
/// The writer re-sorts, so "append" is positional only in the logical
/// list; a duplicate date yields two blocks for that date.
pub fn append_day(text: &str, entry: DayEntry) -> String {
    let mut entries = parse(text);
    entries.push(entry);
    write(&entries)
}

/// Replace the record for `entry.date`, or append it if the document has
/// none. With duplicate dates, the first block in document order is the
/// one replaced.
pub fn update_day(text: &str, entry: DayEntry) -> String {
    let mut entries = parse(text);
    match entries.iter_mut().find(|e| e.date == entry.date) {
        Some(slot) => *slot = entry,
        None => entries.push(entry),
    }
    write(&entries)
}

/// Remove all records for a date.
pub fn remove_day(text: &str, date: NaiveDate) -> String {
    let mut entries = parse(text);
    entries.retain(|e| e.date != date);
    write(&entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Task;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_append_then_update_then_remove() {
        let mut entry = DayEntry::new(date(2026, 1, 5));
        entry.tasks.push(Task::new("Plan sprint"));
        let text = append_day("", entry);
        assert!(text.contains("# 2026-01-05 Monday"));
        assert!(text.contains("- [ ] Plan sprint | 1.0h"));

        let mut updated = parse(&text).remove(0);
        updated.task_mut("Plan sprint").unwrap().complete();
        let text = update_day(&text, updated);
        assert!(text.contains("- [x] Plan sprint | 1.0h"));
        // Still a single block for the date
        assert_eq!(text.matches("# 2026-01-05").count(), 1);

        let text = remove_day(&text, date(2026, 1, 5));
        assert_eq!(text, "");
    }

    #[test]
    fn test_update_missing_date_appends() {
        let existing = write_day(&DayEntry::new(date(2026, 1, 5)));
        let text = update_day(&existing, DayEntry::new(date(2026, 1, 7)));
        assert!(text.contains("# 2026-01-07"));
        assert!(text.contains("# 2026-01-05"));
        // Newest first after the re-canonicalization
        assert!(text.find("# 2026-01-07").unwrap() < text.find("# 2026-01-05").unwrap());
    }

    #[test]
    fn test_append_re_canonicalizes_order() {
        let text = append_day("", DayEntry::new(date(2026, 1, 5)));
        let text = append_day(&text, DayEntry::new(date(2026, 1, 7)));
        assert!(text.find("# 2026-01-07").unwrap() < text.find("# 2026-01-05").unwrap());
    }
}
