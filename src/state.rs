//! Client-side application state and the actions that change it.
//!
//! Views never call the API directly: they build an [`Action`] and hand it to
//! [`ClientState::dispatch`]. Task mutations always refetch the full task
//! list afterwards; project mutations patch the local list in place.

use indexmap::IndexMap;

use crate::client::{ApiClient, ClientError};
use crate::form::{TaskForm, TaskPayload};
use crate::models::{Project, Task, TaskPatch};
use crate::view::{FilterMode, filter_tasks, group_by_date};

/// Everything a view can ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Fetch tasks and projects.
    Load,
    SetSearch(String),
    SetFilter(FilterMode),
    /// Open the modal on a blank form.
    OpenNew,
    /// Open the modal on the task with this id.
    OpenEdit(u64),
    CloseModal,
    /// Validate the open form and save it.
    SubmitForm,
    SaveTask(TaskPayload),
    DeleteTask(u64),
    ToggleTask(u64),
    AddProject(String),
    DeleteProject(u64),
}

#[derive(Debug, Default)]
pub struct ClientState {
    pub tasks: Vec<Task>,
    pub projects: Vec<Project>,
    pub search: String,
    pub filter: FilterMode,
    /// Task the modal was opened on; `None` while adding.
    pub editing: Option<Task>,
    pub modal_open: bool,
    pub form: TaskForm,
    /// Message of the last failed action, cleared by the next success.
    pub last_error: Option<String>,
}

impl ClientState {
    pub fn new() -> ClientState {
        ClientState::default()
    }

    /// Filtered tasks grouped by completion date, in display order.
    pub fn visible_groups(&self) -> IndexMap<&str, Vec<&Task>> {
        group_by_date(filter_tasks(&self.tasks, &self.search, self.filter))
    }

    pub fn task(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Applies `action`. Failures are logged and kept in `last_error`;
    /// the rest of the state stays as it was.
    pub async fn dispatch(&mut self, api: &ApiClient, action: Action) {
        let context = describe(&action);
        match self.apply(api, action).await {
            Ok(()) => self.last_error = None,
            Err(message) => {
                tracing::error!(action = context, error = %message, "action failed");
                self.last_error = Some(format!("{context}: {message}"));
            }
        }
    }

    async fn apply(&mut self, api: &ApiClient, action: Action) -> Result<(), String> {
        match action {
            Action::Load => {
                self.fetch_tasks(api).await.map_err(stringify)?;
                self.projects = api.list_projects().await.map_err(stringify)?;
            }
            Action::SetSearch(term) => self.search = term,
            Action::SetFilter(mode) => self.filter = mode,
            Action::OpenNew => {
                self.editing = None;
                self.form = TaskForm::open(None);
                self.modal_open = true;
            }
            Action::OpenEdit(id) => {
                let task = self.task(id).cloned().ok_or_else(|| format!("task {id} is not loaded"))?;
                self.form = TaskForm::open(Some(&task));
                self.editing = Some(task);
                self.modal_open = true;
            }
            Action::CloseModal => self.close_modal(),
            Action::SubmitForm => {
                let payload = self.form.submit().map_err(|e| e.to_string())?;
                self.save_task(api, payload).await.map_err(stringify)?;
            }
            Action::SaveTask(payload) => self.save_task(api, payload).await.map_err(stringify)?,
            Action::DeleteTask(id) => {
                api.delete_task(id).await.map_err(stringify)?;
                self.fetch_tasks(api).await.map_err(stringify)?;
            }
            Action::ToggleTask(id) => {
                let task = self.task(id).ok_or_else(|| format!("task {id} is not loaded"))?;
                let mut body = TaskPatch::from(task);
                body.is_done = Some(!task.is_done);
                api.update_task(id, &body).await.map_err(stringify)?;
                self.fetch_tasks(api).await.map_err(stringify)?;
            }
            Action::AddProject(name) => {
                let name = name.trim();
                if name.is_empty() {
                    return Ok(());
                }
                let project = api.create_project(name).await.map_err(stringify)?;
                self.projects.push(project);
                self.form.new_project.clear();
            }
            Action::DeleteProject(id) => {
                api.delete_project(id).await.map_err(stringify)?;
                self.projects.retain(|p| p.id != id);
            }
        }
        Ok(())
    }

    async fn fetch_tasks(&mut self, api: &ApiClient) -> Result<(), ClientError> {
        self.tasks = api.list_tasks().await?;
        Ok(())
    }

    /// PUT when the payload carries an id, POST otherwise; then refetch and close.
    async fn save_task(&mut self, api: &ApiClient, payload: TaskPayload) -> Result<(), ClientError> {
        match payload.id {
            Some(id) => api.update_task(id, &payload.fields).await?,
            None => api.create_task(&payload.fields).await?,
        };
        self.fetch_tasks(api).await?;
        self.close_modal();
        Ok(())
    }

    fn close_modal(&mut self) {
        self.modal_open = false;
        self.editing = None;
    }
}

fn stringify(error: ClientError) -> String {
    error.to_string()
}

fn describe(action: &Action) -> &'static str {
    match action {
        Action::Load => "Error fetching data",
        Action::SetSearch(_) | Action::SetFilter(_) => "Error updating view",
        Action::OpenNew | Action::OpenEdit(_) | Action::CloseModal => "Error opening task",
        Action::SubmitForm | Action::SaveTask(_) => "Error saving task",
        Action::DeleteTask(_) => "Error deleting task",
        Action::ToggleTask(_) => "Error updating task status",
        Action::AddProject(_) => "Error adding new project",
        Action::DeleteProject(_) => "Error deleting project",
    }
}
