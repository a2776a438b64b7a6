//! Request body checks shared by the task and project handlers.

use super::error::ValidationError;
use crate::models::{NewProject, TaskPatch};

/// True for `""` or `HH:MM` with at least two hour digits and exactly two minute digits.
pub fn is_valid_tasktime(value: &str) -> bool {
    if value.is_empty() {
        return true;
    }
    match value.split_once(':') {
        Some((hours, minutes)) => {
            hours.len() >= 2
                && minutes.len() == 2
                && hours.chars().all(|c| c.is_ascii_digit())
                && minutes.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

fn check_fields(patch: &TaskPatch, errors: &mut ValidationError) {
    if let Some(description) = &patch.description {
        if description.trim().is_empty() {
            errors.push("description", "description must not be blank");
        }
    }
    if let Some(tasktime) = &patch.tasktime {
        if !is_valid_tasktime(tasktime) {
            errors.push("tasktime", "tasktime must be empty or HH:MM");
        }
    }
}

/// A create body must carry a description; everything else is optional.
pub fn validate_new_task(patch: &TaskPatch) -> Result<(), ValidationError> {
    let mut errors = ValidationError::default();
    if patch.description.is_none() {
        errors.push("description", "description is required");
    }
    check_fields(patch, &mut errors);
    errors.into_result()
}

/// An update body may omit anything, but what it carries must be well-formed.
pub fn validate_task_patch(patch: &TaskPatch) -> Result<(), ValidationError> {
    let mut errors = ValidationError::default();
    check_fields(patch, &mut errors);
    errors.into_result()
}

/// Returns the trimmed project name, or the validation failure.
pub fn validate_new_project(body: NewProject) -> Result<String, ValidationError> {
    let mut errors = ValidationError::default();
    match body.name.map(|n| n.trim().to_string()) {
        Some(name) if !name.is_empty() => Ok(name),
        Some(_) => {
            errors.push("name", "name must not be blank");
            Err(errors)
        }
        None => {
            errors.push("name", "name is required");
            Err(errors)
        }
    }
}
