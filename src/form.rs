//! State of the modal task editor.
//!
//! The form keeps every field as the raw text the user typed. Duration is
//! edited as separate hour and minute fields and only recombined into the
//! stored `HH:MM` form on submit.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{Project, Task, TaskPatch};

/// Reasons a form cannot be submitted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("description is required")]
    MissingDescription,
    #[error("project is required")]
    MissingProject,
    #[error("complete date is required")]
    MissingDate,
    #[error("complete date '{0}' is not a valid YYYY-MM-DD date")]
    InvalidDate(String),
    #[error("hours '{0}' is not a number")]
    InvalidHours(String),
    #[error("minutes '{0}' is not a number")]
    InvalidMinutes(String),
    #[error("minutes must be between 0 and 59, got {0}")]
    MinutesOutOfRange(u64),
}

/// Editable fields, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Code,
    Description,
    Hours,
    Minutes,
    Project,
    NewProject,
    CompleteDate,
}

impl FormField {
    pub const ORDER: [FormField; 7] = [
        FormField::Code,
        FormField::Description,
        FormField::Hours,
        FormField::Minutes,
        FormField::Project,
        FormField::NewProject,
        FormField::CompleteDate,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> FormField {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn previous(self) -> FormField {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Code => "Task Code",
            FormField::Description => "Description",
            FormField::Hours => "Hours",
            FormField::Minutes => "Minutes",
            FormField::Project => "Project",
            FormField::NewProject => "New Project",
            FormField::CompleteDate => "Complete Date",
        }
    }

    /// Whether typing `c` into this field is allowed. Duration fields are numeric.
    pub fn accepts(self, c: char) -> bool {
        match self {
            FormField::Hours | FormField::Minutes => c.is_ascii_digit(),
            FormField::Project => false,
            _ => true,
        }
    }
}

/// What a valid form produces: an id when editing, and the full body to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPayload {
    pub id: Option<u64>,
    pub fields: TaskPatch,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub id: Option<u64>,
    pub code: String,
    pub description: String,
    pub hours: String,
    pub minutes: String,
    pub project: String,
    pub complete_date: String,
    pub is_done: bool,
    /// Inline "add project" input; not part of the task.
    pub new_project: String,
}

/// Splits stored `HH:MM` into its hour and minute text. Empty gives two empty strings.
pub fn split_tasktime(tasktime: &str) -> (String, String) {
    if tasktime.is_empty() {
        return (String::new(), String::new());
    }
    match tasktime.split_once(':') {
        Some((h, m)) => (h.to_string(), m.to_string()),
        None => (tasktime.to_string(), String::new()),
    }
}

/// Reads one duration input. Blank is 0; anything else must be a whole number.
fn parse_duration_part(text: &str) -> Option<u64> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0);
    }
    text.parse().ok()
}

/// Recombines hours and minutes as zero-padded `HH:MM`; both zero gives an
/// empty duration.
pub fn compose_tasktime(hours: u64, minutes: u64) -> String {
    if hours == 0 && minutes == 0 {
        String::new()
    } else {
        format!("{hours:02}:{minutes:02}")
    }
}

impl TaskForm {
    /// Loads `task` for editing, or starts a blank form.
    pub fn open(task: Option<&Task>) -> TaskForm {
        match task {
            Some(t) => {
                let (hours, minutes) = split_tasktime(&t.tasktime);
                TaskForm {
                    id: Some(t.id),
                    code: t.code.clone(),
                    description: t.description.clone(),
                    hours,
                    minutes,
                    project: t.project.clone(),
                    complete_date: t.complete_date.clone(),
                    is_done: t.is_done,
                    new_project: String::new(),
                }
            }
            None => TaskForm::default(),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.id.is_some()
    }

    /// Text buffer backing `field`. The project picker is edited through
    /// [`TaskForm::cycle_project`] instead, but still exposes its value here.
    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Code => &mut self.code,
            FormField::Description => &mut self.description,
            FormField::Hours => &mut self.hours,
            FormField::Minutes => &mut self.minutes,
            FormField::Project => &mut self.project,
            FormField::NewProject => &mut self.new_project,
            FormField::CompleteDate => &mut self.complete_date,
        }
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Code => &self.code,
            FormField::Description => &self.description,
            FormField::Hours => &self.hours,
            FormField::Minutes => &self.minutes,
            FormField::Project => &self.project,
            FormField::NewProject => &self.new_project,
            FormField::CompleteDate => &self.complete_date,
        }
    }

    /// Moves the project selection one step through `projects`.
    pub fn cycle_project(&mut self, projects: &[Project], forward: bool) {
        if projects.is_empty() {
            self.project.clear();
            return;
        }
        let len = projects.len();
        let next = match projects.iter().position(|p| p.name == self.project) {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None if forward => 0,
            None => len - 1,
        };
        self.project = projects[next].name.clone();
    }

    /// Validates the form and builds the body to save.
    pub fn submit(&self) -> Result<TaskPayload, FormError> {
        if self.description.trim().is_empty() {
            return Err(FormError::MissingDescription);
        }
        if self.project.is_empty() {
            return Err(FormError::MissingProject);
        }
        let date = self.complete_date.trim();
        if date.is_empty() {
            return Err(FormError::MissingDate);
        }
        if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            return Err(FormError::InvalidDate(date.to_string()));
        }
        let hours = parse_duration_part(&self.hours)
            .ok_or_else(|| FormError::InvalidHours(self.hours.trim().to_string()))?;
        let minutes = parse_duration_part(&self.minutes)
            .ok_or_else(|| FormError::InvalidMinutes(self.minutes.trim().to_string()))?;
        if minutes > 59 {
            return Err(FormError::MinutesOutOfRange(minutes));
        }

        Ok(TaskPayload {
            id: self.id,
            fields: TaskPatch {
                code: Some(self.code.clone()),
                description: Some(self.description.clone()),
                tasktime: Some(compose_tasktime(hours, minutes)),
                project: Some(self.project.clone()),
                complete_date: Some(date.to_string()),
                is_done: Some(self.is_done),
            },
        })
    }
}
