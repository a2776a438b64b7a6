use chrono::Local;
use clap::Args;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::client::ApiClient;
use crate::form::TaskForm;
use crate::state::{Action, ClientState};
use crate::view::{format_task_time, FilterMode};

/// Task fields shared by `add` and `edit`.
#[derive(Args, Debug, Default, Clone)]
pub struct TaskArgs {
    /// Task code
    #[arg(short, long)]
    pub code: Option<String>,
    /// Project name
    #[arg(short, long)]
    pub project: Option<String>,
    /// Planned hours
    #[arg(short = 'H', long)]
    pub hours: Option<u32>,
    /// Planned minutes (0-59)
    #[arg(short, long)]
    pub minutes: Option<u32>,
    /// Completion date in YYYY-MM-DD
    #[arg(short, long)]
    pub date: Option<String>,
}

impl TaskArgs {
    fn fill(self, form: &mut TaskForm) {
        if let Some(c) = self.code { form.code = c; }
        if let Some(p) = self.project { form.project = p; }
        if let Some(h) = self.hours { form.hours = h.to_string(); }
        if let Some(m) = self.minutes { form.minutes = m.to_string(); }
        if let Some(d) = self.date { form.complete_date = d; }
    }
}

/// Prints the last action's error, if any. Returns true when there was one.
fn failed(state: &ClientState, silent: bool) -> bool {
    match &state.last_error {
        Some(e) => {
            if !silent { eprintln!("{}", e); }
            true
        }
        None => false,
    }
}

/// Prints either the last action's error or `success`.
fn report(state: &ClientState, success: &str, silent: bool) {
    if !failed(state, silent) && !silent {
        println!("{}", success);
    }
}

/// Adds a new task. The completion date defaults to today.
pub async fn cmd_add(api: &ApiClient, description: String, fields: TaskArgs, silent: bool) {
    let mut form = TaskForm::open(None);
    form.description = description;
    form.complete_date = Local::now().date_naive().format("%Y-%m-%d").to_string();
    fields.fill(&mut form);

    let payload = match form.submit() {
        Ok(p) => p,
        Err(e) => {
            if !silent { eprintln!("Invalid task: {}", e); }
            return;
        }
    };
    let mut state = ClientState::new();
    state.dispatch(api, Action::SaveTask(payload)).await;
    report(&state, "Task added.", silent);
}

/// Edits an existing task; fields not given keep their value.
pub async fn cmd_edit(api: &ApiClient, id: u64, description: Option<String>, fields: TaskArgs, silent: bool) {
    let mut state = ClientState::new();
    state.dispatch(api, Action::Load).await;
    if failed(&state, silent) {
        return;
    }
    state.dispatch(api, Action::OpenEdit(id)).await;
    if state.last_error.is_some() {
        if !silent { eprintln!("Task {} not found.", id); }
        return;
    }
    if let Some(d) = description { state.form.description = d; }
    fields.fill(&mut state.form);

    state.dispatch(api, Action::SubmitForm).await;
    report(&state, &format!("Task {} updated.", id), silent);
}

/// Loads, then toggles. Stops after a failed load so its error is the one kept.
async fn toggle(api: &ApiClient, id: u64) -> ClientState {
    let mut state = ClientState::new();
    state.dispatch(api, Action::Load).await;
    if state.last_error.is_none() {
        state.dispatch(api, Action::ToggleTask(id)).await;
    }
    state
}

/// Flips the completion flag of a task.
pub async fn cmd_toggle(api: &ApiClient, id: u64, silent: bool) {
    let state = toggle(api, id).await;
    if failed(&state, silent) {
        return;
    }
    let done = state.task(id).map(|t| t.is_done).unwrap_or(false);
    if !silent {
        if done { println!("Task {} marked as complete.", id) } else { println!("Task {} marked as active.", id) }
    }
}

/// Removes a task by ID.
pub async fn cmd_remove(api: &ApiClient, id: u64, silent: bool) {
    let mut state = ClientState::new();
    state.dispatch(api, Action::DeleteTask(id)).await;
    report(&state, &format!("Task {} removed.", id), silent);
}

/// Lists tasks as one table per completion date.
pub async fn cmd_list(api: &ApiClient, search: Option<String>, filter: FilterMode) {
    let mut state = ClientState::new();
    state.dispatch(api, Action::Load).await;
    if failed(&state, false) {
        return;
    }
    state.dispatch(api, Action::SetSearch(search.unwrap_or_default())).await;
    state.dispatch(api, Action::SetFilter(filter)).await;

    let groups = state.visible_groups();
    if groups.is_empty() {
        println!("No tasks found.");
        return;
    }

    for (date, tasks) in groups {
        println!("{}", if date.is_empty() { "(no date)" } else { date });

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("ID").add_attribute(Attribute::Bold),
                Cell::new("Code").add_attribute(Attribute::Bold),
                Cell::new("Description").add_attribute(Attribute::Bold),
                Cell::new("Task Time").add_attribute(Attribute::Bold),
                Cell::new("Project").add_attribute(Attribute::Bold),
                Cell::new("Status").add_attribute(Attribute::Bold),
            ]);

        for t in tasks {
            let (status, color) = if t.is_done { ("Done", Color::Green) } else { ("Active", Color::Red) };
            table.add_row(vec![
                Cell::new(t.id),
                Cell::new(&t.code),
                Cell::new(&t.description),
                Cell::new(format_task_time(&t.tasktime)),
                Cell::new(&t.project),
                Cell::new(status).fg(color),
            ]);
        }
        println!("{table}\n");
    }
}

/// Adds a new project.
pub async fn cmd_project_add(api: &ApiClient, name: String, silent: bool) {
    if name.trim().is_empty() {
        if !silent { eprintln!("Project name cannot be empty."); }
        return;
    }
    let mut state = ClientState::new();
    state.dispatch(api, Action::AddProject(name.clone())).await;
    report(&state, &format!("Project '{}' added.", name.trim()), silent);
}

/// Lists projects with how many tasks reference each.
pub async fn cmd_project_list(api: &ApiClient) {
    let mut state = ClientState::new();
    state.dispatch(api, Action::Load).await;
    if failed(&state, false) {
        return;
    }
    if state.projects.is_empty() {
        println!("No projects found.");
        return;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["ID", "Name", "Tasks"]);
    for p in &state.projects {
        let count = state.tasks.iter().filter(|t| t.project == p.name).count();
        table.add_row(vec![p.id.to_string(), p.name.clone(), count.to_string()]);
    }
    println!("{table}");
}

/// Removes a project; its tasks keep existing without a project.
pub async fn cmd_project_remove(api: &ApiClient, id: u64, silent: bool) {
    let mut state = ClientState::new();
    state.dispatch(api, Action::DeleteProject(id)).await;
    report(&state, &format!("Project {} removed.", id), silent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn toggle_keeps_the_load_error() {
        let api = ApiClient::new("http://127.0.0.1:1/api");
        let state = toggle(&api, 7).await;
        let error = state.last_error.unwrap();
        assert!(error.starts_with("Error fetching data"), "{error}");
    }
}
