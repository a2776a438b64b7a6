use serde::{Deserialize, Serialize};

/// A single unit of work as stored and served by the API.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Server-assigned identifier.
    pub id: u64,
    /// Short free-form code, e.g. a ticket reference.
    #[serde(default)]
    pub code: String,
    /// What needs doing.
    #[serde(default)]
    pub description: String,
    /// Planned duration as zero-padded `HH:MM`, or empty.
    #[serde(default)]
    pub tasktime: String,
    /// Name of the owning project. Empty when the task has no project.
    #[serde(default)]
    pub project: String,
    /// Target date, `YYYY-MM-DD` when entered through the form.
    #[serde(default)]
    pub complete_date: String,
    /// Whether the task has been completed.
    #[serde(default)]
    pub is_done: bool,
}

/// A named bucket tasks refer to by name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: u64,
    pub name: String,
}

/// Partial task body used for create and update requests.
///
/// Absent fields are left untouched on update and default to empty on create.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasktime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_done: Option<bool>,
}

/// Body of `POST /projects`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct NewProject {
    #[serde(default)]
    pub name: Option<String>,
}

impl Task {
    /// Builds a fresh task from a create body.
    pub fn from_patch(id: u64, patch: TaskPatch) -> Task {
        Task {
            id,
            code: patch.code.unwrap_or_default(),
            description: patch.description.unwrap_or_default(),
            tasktime: patch.tasktime.unwrap_or_default(),
            project: patch.project.unwrap_or_default(),
            complete_date: patch.complete_date.unwrap_or_default(),
            is_done: patch.is_done.unwrap_or(false),
        }
    }

    /// Merges the fields present in `patch` into this task.
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(code) = patch.code { self.code = code; }
        if let Some(description) = patch.description { self.description = description; }
        if let Some(tasktime) = patch.tasktime { self.tasktime = tasktime; }
        if let Some(project) = patch.project { self.project = project; }
        if let Some(date) = patch.complete_date { self.complete_date = date; }
        if let Some(done) = patch.is_done { self.is_done = done; }
    }
}

impl From<&Task> for TaskPatch {
    /// Full body for a task, the shape clients send when saving a whole object.
    fn from(task: &Task) -> Self {
        TaskPatch {
            code: Some(task.code.clone()),
            description: Some(task.description.clone()),
            tasktime: Some(task.tasktime.clone()),
            project: Some(task.project.clone()),
            complete_date: Some(task.complete_date.clone()),
            is_done: Some(task.is_done),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_uses_camel_case_wire_names() {
        let task = Task::from_patch(7, TaskPatch {
            description: Some("Write report".into()),
            complete_date: Some("2024-05-01".into()),
            ..TaskPatch::default()
        });
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["completeDate"], "2024-05-01");
        assert_eq!(json["isDone"], false);
        assert_eq!(json["id"], 7);
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let mut task = Task::from_patch(1, TaskPatch {
            code: Some("A-1".into()),
            description: Some("first".into()),
            project: Some("Home".into()),
            ..TaskPatch::default()
        });
        task.apply(TaskPatch { is_done: Some(true), ..TaskPatch::default() });
        assert!(task.is_done);
        assert_eq!(task.code, "A-1");
        assert_eq!(task.project, "Home");
    }

    #[test]
    fn patch_ignores_unknown_fields_like_id() {
        let patch: TaskPatch = serde_json::from_str(r#"{"id": 3, "_id": "x", "isDone": true}"#).unwrap();
        assert_eq!(patch.is_done, Some(true));
        assert_eq!(patch.description, None);
    }
}
