//! Presentation derived from the raw task list: search, completion filter,
//! grouping by date and duration formatting.

use std::fmt;

use clap::ValueEnum;
use indexmap::IndexMap;

use crate::models::Task;

/// Which tasks to show by completion state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FilterMode {
    #[default]
    All,
    Complete,
    Active,
}

impl FilterMode {
    pub fn admits(self, task: &Task) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Complete => task.is_done,
            FilterMode::Active => !task.is_done,
        }
    }

    /// All -> Complete -> Active -> All.
    pub fn next(self) -> FilterMode {
        match self {
            FilterMode::All => FilterMode::Complete,
            FilterMode::Complete => FilterMode::Active,
            FilterMode::Active => FilterMode::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterMode::All => "All",
            FilterMode::Complete => "Complete Tasks",
            FilterMode::Active => "Active Tasks",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Case-insensitive substring match over code, project and completion date.
pub fn matches_search(task: &Task, term: &str) -> bool {
    let term = term.to_lowercase();
    [&task.code, &task.project, &task.complete_date]
        .iter()
        .any(|field| field.to_lowercase().contains(&term))
}

/// Tasks passing both the search term and the filter mode, in source order.
pub fn filter_tasks<'a>(tasks: &'a [Task], term: &str, mode: FilterMode) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| matches_search(t, term) && mode.admits(t))
        .collect()
}

/// Groups tasks by exact `completeDate`.
///
/// Groups appear in the order their first task appears, not by date.
pub fn group_by_date<'a, I>(tasks: I) -> IndexMap<&'a str, Vec<&'a Task>>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut groups: IndexMap<&'a str, Vec<&'a Task>> = IndexMap::new();
    for task in tasks {
        groups.entry(task.complete_date.as_str()).or_default().push(task);
    }
    groups
}

/// Renders `HH:MM` as `<H>h <MM>m`: the hour drops its padding, the minutes
/// are shown as stored.
pub fn format_task_time(tasktime: &str) -> String {
    if tasktime.is_empty() {
        return String::new();
    }
    match tasktime.split_once(':') {
        Some((hours, minutes)) => {
            let hours = hours.parse::<u64>().map(|h| h.to_string()).unwrap_or_else(|_| hours.to_string());
            format!("{hours}h {minutes}m")
        }
        None => tasktime.to_string(),
    }
}
