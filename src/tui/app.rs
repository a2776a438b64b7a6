use ratatui::widgets::TableState;
use tokio::runtime::Handle;

use crate::client::ApiClient;
use crate::form::FormField;
use crate::state::{Action, ClientState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Form,
}

/// One line of the task table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayItem {
    DateHeader(String, usize), // date, count
    Task(u64),
}

pub struct App {
    pub state: ClientState,
    api: ApiClient,
    runtime: Handle,
    pub table_state: TableState,
    pub display_items: Vec<DisplayItem>,
    pub input_mode: InputMode,
    /// Focused field while the form is open.
    pub focus: FormField,
}

impl App {
    /// Creates the app and loads the initial data.
    pub fn new(api: ApiClient, runtime: Handle) -> App {
        let mut app = App {
            state: ClientState::new(),
            api,
            runtime,
            table_state: TableState::default(),
            display_items: Vec::new(),
            input_mode: InputMode::Normal,
            focus: FormField::default(),
        };
        app.dispatch(Action::Load);
        app
    }

    /// Runs one action to completion, then rebuilds the table.
    pub fn dispatch(&mut self, action: Action) {
        self.runtime.block_on(self.state.dispatch(&self.api, action));
        self.rebuild();
    }

    /// Re-derives the display list from state, keeping the selection in range.
    pub fn rebuild(&mut self) {
        self.display_items.clear();
        for (date, tasks) in self.state.visible_groups() {
            self.display_items.push(DisplayItem::DateHeader(date.to_string(), tasks.len()));
            self.display_items.extend(tasks.iter().map(|t| DisplayItem::Task(t.id)));
        }

        if self.display_items.is_empty() {
            self.table_state.select(None);
        } else if let Some(i) = self.table_state.selected() {
            if i >= self.display_items.len() {
                self.table_state.select(Some(self.display_items.len() - 1));
            }
        } else {
            self.table_state.select(Some(0));
        }
    }

    pub fn selected_task_id(&self) -> Option<u64> {
        match self.table_state.selected().and_then(|i| self.display_items.get(i)) {
            Some(DisplayItem::Task(id)) => Some(*id),
            _ => None,
        }
    }

    pub fn next(&mut self) {
        if self.display_items.is_empty() { return; }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < self.display_items.len() => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.display_items.is_empty() { return; }
        let i = match self.table_state.selected() {
            Some(0) | None => self.display_items.len() - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    pub fn reload(&mut self) {
        self.dispatch(Action::Load);
    }

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_task_id() {
            self.dispatch(Action::ToggleTask(id));
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_task_id() {
            self.dispatch(Action::DeleteTask(id));
        }
    }

    pub fn cycle_filter(&mut self) {
        let next = self.state.filter.next();
        self.dispatch(Action::SetFilter(next));
    }

    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Search;
    }

    pub fn search_push(&mut self, c: char) {
        let mut term = self.state.search.clone();
        term.push(c);
        self.dispatch(Action::SetSearch(term));
    }

    pub fn search_pop(&mut self) {
        let mut term = self.state.search.clone();
        term.pop();
        self.dispatch(Action::SetSearch(term));
    }

    /// Opens the form on a blank task.
    pub fn start_add(&mut self) {
        self.dispatch(Action::OpenNew);
        self.enter_form();
    }

    /// Opens the form on the selected task.
    pub fn start_edit(&mut self) {
        if let Some(id) = self.selected_task_id() {
            self.dispatch(Action::OpenEdit(id));
            self.enter_form();
        }
    }

    fn enter_form(&mut self) {
        if self.state.modal_open {
            self.input_mode = InputMode::Form;
            self.focus = FormField::default();
        }
    }

    fn leave_form_if_closed(&mut self) {
        if !self.state.modal_open {
            self.input_mode = InputMode::Normal;
        }
    }

    pub fn form_next_field(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn form_previous_field(&mut self) {
        self.focus = self.focus.previous();
    }

    pub fn form_input(&mut self, c: char) {
        if self.focus.accepts(c) {
            self.state.form.field_mut(self.focus).push(c);
        }
    }

    pub fn form_backspace(&mut self) {
        if self.focus != FormField::Project {
            self.state.form.field_mut(self.focus).pop();
        }
    }

    /// Left/Right on the project picker.
    pub fn form_cycle_project(&mut self, forward: bool) {
        if self.focus == FormField::Project {
            let projects = &self.state.projects;
            self.state.form.cycle_project(projects, forward);
        }
    }

    /// Deletes the project currently shown in the picker, keeping the form open.
    pub fn form_delete_project(&mut self) {
        if self.focus != FormField::Project { return; }
        let selected = self.state.form.project.clone();
        let Some(id) = self.state.projects.iter().find(|p| p.name == selected).map(|p| p.id) else {
            return;
        };
        self.dispatch(Action::DeleteProject(id));
        if self.state.last_error.is_none() {
            self.state.form.project.clear();
        }
    }

    /// Enter: adds the typed project on the "New Project" field, submits otherwise.
    pub fn form_enter(&mut self) {
        if self.focus == FormField::NewProject {
            let name = self.state.form.new_project.clone();
            self.dispatch(Action::AddProject(name));
        } else {
            self.dispatch(Action::SubmitForm);
            self.leave_form_if_closed();
        }
    }

    pub fn form_cancel(&mut self) {
        self.dispatch(Action::CloseModal);
        self.leave_form_if_closed();
    }
}
