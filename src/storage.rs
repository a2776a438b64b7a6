use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::{Project, Task, TaskPatch};

/// Errors raised by the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: u64 },

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database file is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Both collections, persisted together as one JSON document.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl Database {
    pub fn next_task_id(&self) -> u64 {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    pub fn next_project_id(&self) -> u64 {
        self.projects.iter().map(|p| p.id).max().unwrap_or(0) + 1
    }

    /// Clears the project reference on every task pointing at `name`.
    /// Returns how many tasks were orphaned.
    pub fn orphan_tasks_of(&mut self, name: &str) -> usize {
        let mut orphaned = 0;
        for t in self.tasks.iter_mut().filter(|t| t.project == name) {
            t.project.clear();
            orphaned += 1;
        }
        orphaned
    }
}

/// Returns the default location of the database file.
///
/// `~/.local/share/todolist/todolist.json` on Linux, `./todolist.json` when no
/// data directory is known.
pub fn default_db_path() -> PathBuf {
    match dirs::data_local_dir() {
        Some(mut p) => {
            p.push("todolist");
            p.push("todolist.json");
            p
        }
        None => PathBuf::from("todolist.json"),
    }
}

/// Handle to the task and project collections.
///
/// Cheap to clone; all clones share the same data. Every mutation holds the
/// write lock across modify and persist, and only becomes visible once the
/// file write succeeded.
#[derive(Debug, Clone)]
pub struct Store {
    db: Arc<RwLock<Database>>,
    path: Option<Arc<PathBuf>>,
}

impl Store {
    /// A store that lives only as long as the process.
    pub fn in_memory() -> Store {
        Store { db: Arc::new(RwLock::new(Database::default())), path: None }
    }

    /// Opens (or starts) the JSON file at `path`.
    ///
    /// A missing file yields an empty database; an unreadable or corrupt one
    /// is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Store, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let db = load_database(&path)?;
        tracing::debug!(path = %path.display(), tasks = db.tasks.len(), projects = db.projects.len(), "database loaded");
        Ok(Store { db: Arc::new(RwLock::new(db)), path: Some(Arc::new(path)) })
    }

    /// Runs `f` against a copy of the database, persists the copy, then swaps it in.
    async fn mutate<T>(
        &self,
        f: impl FnOnce(&mut Database) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut db = self.db.write().await;
        let mut next = db.clone();
        let out = f(&mut next)?;
        if let Some(path) = &self.path {
            let path = Arc::clone(path);
            next = tokio::task::spawn_blocking(move || save_database(&path, &next).map(|()| next))
                .await
                .map_err(|e| StoreError::Io(std::io::Error::other(e)))??;
        }
        *db = next;
        Ok(out)
    }

    pub async fn list_tasks(&self) -> Vec<Task> {
        self.db.read().await.tasks.clone()
    }

    pub async fn find_task(&self, id: u64) -> Option<Task> {
        self.db.read().await.tasks.iter().find(|t| t.id == id).cloned()
    }

    /// Inserts a new task built from `patch` and returns it with its id.
    pub async fn create_task(&self, patch: TaskPatch) -> Result<Task, StoreError> {
        self.mutate(|db| {
            let task = Task::from_patch(db.next_task_id(), patch);
            db.tasks.push(task.clone());
            Ok(task)
        })
        .await
    }

    /// Merges `patch` into the task with `id`.
    pub async fn update_task(&self, id: u64, patch: TaskPatch) -> Result<Task, StoreError> {
        self.mutate(|db| {
            let task = db
                .tasks
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or(StoreError::NotFound { kind: "task", id })?;
            task.apply(patch);
            Ok(task.clone())
        })
        .await
    }

    pub async fn delete_task(&self, id: u64) -> Result<Task, StoreError> {
        self.mutate(|db| {
            let idx = db
                .tasks
                .iter()
                .position(|t| t.id == id)
                .ok_or(StoreError::NotFound { kind: "task", id })?;
            Ok(db.tasks.remove(idx))
        })
        .await
    }

    pub async fn list_projects(&self) -> Vec<Project> {
        self.db.read().await.projects.clone()
    }

    pub async fn find_project(&self, id: u64) -> Option<Project> {
        self.db.read().await.projects.iter().find(|p| p.id == id).cloned()
    }

    pub async fn create_project(&self, name: String) -> Result<Project, StoreError> {
        self.mutate(|db| {
            let project = Project { id: db.next_project_id(), name };
            db.projects.push(project.clone());
            Ok(project)
        })
        .await
    }

    /// Deletes a project and orphans every task that referenced it by name,
    /// as one atomic change. Returns the removed project and the orphan count.
    pub async fn delete_project(&self, id: u64) -> Result<(Project, usize), StoreError> {
        self.mutate(|db| {
            let idx = db
                .projects
                .iter()
                .position(|p| p.id == id)
                .ok_or(StoreError::NotFound { kind: "project", id })?;
            let project = db.projects.remove(idx);
            let orphaned = db.orphan_tasks_of(&project.name);
            Ok((project, orphaned))
        })
        .await
    }
}

fn load_database(path: &Path) -> Result<Database, StoreError> {
    if !path.exists() {
        return Ok(Database::default());
    }
    let mut f = OpenOptions::new().read(true).open(path)?;
    let mut s = String::new();
    f.read_to_string(&mut s)?;
    if s.trim().is_empty() {
        return Ok(Database::default());
    }
    Ok(serde_json::from_str(&s)?)
}

/// Writes the database via a temp file and rename so readers never see a partial file.
fn save_database(path: &Path, db: &Database) -> Result<(), StoreError> {
    let tmp = path.with_extension("json.tmp");
    let data = serde_json::to_string_pretty(db)?;
    let mut f = File::create(&tmp)?;
    f.write_all(data.as_bytes())?;
    f.flush()?;
    fs::rename(tmp, path)?;
    Ok(())
}
