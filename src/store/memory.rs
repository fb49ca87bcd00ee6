//! In-memory storage backend.
//!
//! Flat vectors owned by the store, never process-wide globals. A single
//! lock guards both tables; it is only held across synchronous sections,
//! never across an await point. Ids are sequential, starting at 1. Tasks
//! come back in insertion order; no sort is guaranteed.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::RwLock;

use crate::error::AppError;
use crate::models::{NewTask, Task, TaskPatch, TaskPriority, TaskStats, UserRecord};
use crate::store::{TaskStore, UserStore};

struct Inner {
    users: Vec<UserRecord>,
    tasks: Vec<Task>,
    next_user_id: i64,
    next_task_id: i64,
}

pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                users: Vec::new(),
                tasks: Vec::new(),
                next_user_id: 1,
                next_task_id: 1,
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn in_scope(task: &Task, owner: Option<i64>) -> bool {
    match owner {
        Some(id) => task.owner_id == Some(id),
        None => true,
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        let inner = self.inner.read().unwrap();
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn user_identity_taken(&self, email: &str, username: &str) -> Result<bool, AppError> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .users
            .iter()
            .any(|u| u.email == email || u.username == username))
    }

    async fn insert_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord, AppError> {
        let mut inner = self.inner.write().unwrap();
        let record = UserRecord {
            id: inner.next_user_id,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        inner.next_user_id += 1;
        inner.users.push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list_tasks(&self, owner: Option<i64>) -> Result<Vec<Task>, AppError> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .tasks
            .iter()
            .filter(|t| in_scope(t, owner))
            .cloned()
            .collect())
    }

    async fn insert_task(&self, owner: Option<i64>, input: NewTask) -> Result<Task, AppError> {
        let mut inner = self.inner.write().unwrap();
        let mut task = Task::new(input, owner);
        task.id = inner.next_task_id;
        inner.next_task_id += 1;
        inner.tasks.push(task.clone());
        Ok(task)
    }

    async fn update_task(
        &self,
        owner: Option<i64>,
        id: i64,
        patch: TaskPatch,
    ) -> Result<Option<Task>, AppError> {
        let mut inner = self.inner.write().unwrap();
        match inner
            .tasks
            .iter_mut()
            .find(|t| t.id == id && in_scope(t, owner))
        {
            Some(task) => {
                task.apply(patch);
                Ok(Some(task.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_task(&self, owner: Option<i64>, id: i64) -> Result<bool, AppError> {
        let mut inner = self.inner.write().unwrap();
        let before = inner.tasks.len();
        inner.tasks.retain(|t| !(t.id == id && in_scope(t, owner)));
        Ok(inner.tasks.len() < before)
    }

    async fn task_stats(&self, owner: Option<i64>) -> Result<TaskStats, AppError> {
        let inner = self.inner.read().unwrap();
        let scoped: Vec<&Task> = inner.tasks.iter().filter(|t| in_scope(t, owner)).collect();
        let total = scoped.len() as i64;
        let completed = scoped.iter().filter(|t| t.completed).count() as i64;
        Ok(TaskStats {
            total,
            completed,
            pending: total - completed,
            high_priority: scoped
                .iter()
                .filter(|t| t.priority == TaskPriority::High)
                .count() as i64,
        })
    }
}
