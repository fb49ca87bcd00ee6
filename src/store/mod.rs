//! Storage abstraction.
//!
//! The service never touches process-wide state directly: handlers go
//! through the [`UserStore`] and [`TaskStore`] traits, injected via
//! [`AppState`]. Two backends implement the same contract: an in-memory
//! store and a PostgreSQL store.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::{NewTask, Task, TaskPatch, TaskStats, UserRecord};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Credential storage: lookup and insert. Users are never updated or
/// deleted in this system.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Login lookup.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError>;

    /// Registration conflict check: true if any user already holds the
    /// email or the username.
    async fn user_identity_taken(&self, email: &str, username: &str) -> Result<bool, AppError>;

    /// Stores a new user and returns the record with its assigned id.
    async fn insert_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord, AppError>;
}

/// Task storage. The `owner` argument is the caller's owner scope:
/// `Some(id)` restricts every operation to that user's tasks, `None`
/// applies no ownership filter (the open profile).
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list_tasks(&self, owner: Option<i64>) -> Result<Vec<Task>, AppError>;

    /// Stores a new task with defaults applied and returns the full record.
    async fn insert_task(&self, owner: Option<i64>, input: NewTask) -> Result<Task, AppError>;

    /// Applies a partial update. `Ok(None)` means no task with that id is
    /// visible in the owner scope.
    async fn update_task(
        &self,
        owner: Option<i64>,
        id: i64,
        patch: TaskPatch,
    ) -> Result<Option<Task>, AppError>;

    /// Removes a task. `Ok(false)` means nothing matched the owner scope.
    async fn delete_task(&self, owner: Option<i64>, id: i64) -> Result<bool, AppError>;

    /// Derived counters, recomputed on every call.
    async fn task_stats(&self, owner: Option<i64>) -> Result<TaskStats, AppError>;
}

/// The full storage contract a backend must satisfy.
pub trait Store: UserStore + TaskStore {}

impl<T: UserStore + TaskStore> Store for T {}

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// State over a fresh in-memory store. Used by the memory deployment
    /// profile and throughout the test suites.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }
}
