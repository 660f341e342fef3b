//! Journal command handlers (add, done, show, list, remove).

use std::sync::Arc;

use daybook_core::config::Config;
use daybook_core::date;
use daybook_core::document::write_day;
use daybook_core::entry::{DayEntry, Section, SectionKind, Task, TASKS_SECTION, format_checkbox};
use daybook_core::fs::RealFileSystem;
use daybook_core::journal::JournalStore;

/// Business rule enforced here, not in the parser/writer: a day holds at
/// most this many tasks.
const MAX_TASKS_PER_DAY: usize = 7;

fn store(config: &Config) -> JournalStore<RealFileSystem> {
    JournalStore::new(Arc::new(RealFileSystem), config.journal.path.clone())
}

fn load_day(
    store: &JournalStore<RealFileSystem>,
    date_str: &str,
) -> Result<(chrono::NaiveDate, Option<DayEntry>), String> {
    let date = date::parse_input(date_str).map_err(|e| e.to_string())?;
    let entries = store.load().map_err(|e| e.to_string())?;
    let entry = entries.into_iter().find(|e| e.date == date);
    Ok((date, entry))
}

pub fn handle_add(config: &Config, title: &str, hours: f64, date_str: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("task title must not be empty".into());
    }
    if !(hours.is_finite() && hours > 0.0) {
        return Err("duration must be a positive number of hours".into());
    }

    let store = store(config);
    let (date, entry) = load_day(&store, date_str)?;
    let mut entry = entry.unwrap_or_else(|| DayEntry::new(date));

    if entry.task(title).is_some() {
        return Err(format!("a task titled '{}' already exists on {}", title, date));
    }
    if entry.tasks.len() >= MAX_TASKS_PER_DAY {
        return Err(format!("{} already has {} tasks", date, MAX_TASKS_PER_DAY));
    }

    let task = Task::with_hours(title, hours);

    // With explicit sections present, the checkbox line must live in a
    // section or it would vanish on the next structured write.
    if !entry.sections.is_empty() {
        match entry
            .sections
            .iter_mut()
            .find(|s| s.name.eq_ignore_ascii_case(TASKS_SECTION))
        {
            Some(section) => {
                section.items.push(format_checkbox(&task));
                section.kind = SectionKind::Tasks;
            }
            None => {
                let mut section = Section::new(TASKS_SECTION, SectionKind::Tasks);
                section.items.push(format_checkbox(&task));
                entry.sections.push(section);
            }
        }
    }
    entry.tasks.push(task);

    store.update_day(entry).map_err(|e| e.to_string())?;
    println!("Added '{}' to {}", title, date);
    Ok(())
}

pub fn handle_done(config: &Config, title: &str, date_str: &str) -> Result<(), String> {
    let store = store(config);
    let (date, entry) = load_day(&store, date_str)?;
    let Some(mut entry) = entry else {
        return Err(format!("no record for {}", date));
    };

    // First match wins on duplicate titles; the writer re-resolves the
    // checkbox line from this live task state.
    let Some(task) = entry.task_mut(title) else {
        return Err(format!("no task titled '{}' on {}", title, date));
    };
    task.complete();

    store.update_day(entry).map_err(|e| e.to_string())?;
    println!("Completed '{}'", title);
    Ok(())
}

pub fn handle_show(config: &Config, date_str: &str, json: bool) -> Result<(), String> {
    let store = store(config);
    let (date, entry) = load_day(&store, date_str)?;
    match entry {
        Some(entry) if json => {
            let out = serde_json::to_string_pretty(&entry).map_err(|e| e.to_string())?;
            println!("{}", out);
        }
        Some(entry) => print!("{}", write_day(&entry)),
        None => println!("No record for {}", date),
    }
    Ok(())
}

pub fn handle_list(config: &Config, json: bool) -> Result<(), String> {
    let store = store(config);
    let entries = store.load().map_err(|e| e.to_string())?;
    if json {
        let out = serde_json::to_string_pretty(&entries).map_err(|e| e.to_string())?;
        println!("{}", out);
        return Ok(());
    }
    if entries.is_empty() {
        println!("No records in {}", store.path().display());
        return Ok(());
    }

    for entry in &entries {
        let done = entry.tasks.iter().filter(|t| t.completed).count();
        println!(
            "{} {:<9} {} tasks ({} done)",
            entry.date,
            date::weekday_name(entry.date),
            entry.tasks.len(),
            done
        );
    }
    Ok(())
}

pub fn handle_remove(config: &Config, date_str: &str) -> Result<(), String> {
    let store = store(config);
    let (date, entry) = load_day(&store, date_str)?;
    if entry.is_none() {
        return Err(format!("no record for {}", date));
    }
    store.remove_day(date).map_err(|e| e.to_string())?;
    println!("Removed {}", date);
    Ok(())
}
