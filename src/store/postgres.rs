//! PostgreSQL storage backend.
//!
//! All access goes through parameterized queries; `schema.sql` at the
//! repository root holds the DDL, including the `task_priority` enum the
//! model maps onto. Tasks list newest-first by `created_at`.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::{NewTask, Task, TaskPatch, TaskStats, UserRecord};
use crate::store::{TaskStore, UserStore};

const TASK_COLUMNS: &str =
    "id, owner_id, title, description, priority, completed, created_at, updated_at";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        let user = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn user_identity_taken(&self, email: &str, username: &str) -> Result<bool, AppError> {
        let existing = sqlx::query_as::<_, (i64,)>(
            "SELECT id FROM users WHERE email = $1 OR username = $2",
        )
        .bind(email)
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(existing.is_some())
    }

    async fn insert_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord, AppError> {
        let user = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (username, email, password_hash)
             VALUES ($1, $2, $3)
             RETURNING id, username, email, password_hash, created_at",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn list_tasks(&self, owner: Option<i64>) -> Result<Vec<Task>, AppError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM todos
             WHERE ($1::BIGINT IS NULL OR owner_id = $1)
             ORDER BY created_at DESC",
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    async fn insert_task(&self, owner: Option<i64>, input: NewTask) -> Result<Task, AppError> {
        let task = Task::new(input, owner);
        let task = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO todos (owner_id, title, description, priority, completed, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {TASK_COLUMNS}",
        ))
        .bind(task.owner_id)
        .bind(task.title)
        .bind(task.description)
        .bind(task.priority)
        .bind(task.completed)
        .bind(task.created_at)
        .bind(task.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(task)
    }

    async fn update_task(
        &self,
        owner: Option<i64>,
        id: i64,
        patch: TaskPatch,
    ) -> Result<Option<Task>, AppError> {
        // COALESCE keeps stored values for fields absent from the patch.
        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE todos
             SET title = COALESCE($1, title),
                 description = COALESCE($2, description),
                 priority = COALESCE($3, priority),
                 completed = COALESCE($4, completed),
                 updated_at = NOW()
             WHERE id = $5 AND ($6::BIGINT IS NULL OR owner_id = $6)
             RETURNING {TASK_COLUMNS}",
        ))
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.priority)
        .bind(patch.completed)
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn delete_task(&self, owner: Option<i64>, id: i64) -> Result<bool, AppError> {
        let result =
            sqlx::query("DELETE FROM todos WHERE id = $1 AND ($2::BIGINT IS NULL OR owner_id = $2)")
                .bind(id)
                .bind(owner)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn task_stats(&self, owner: Option<i64>) -> Result<TaskStats, AppError> {
        let (total, completed, high_priority) = sqlx::query_as::<_, (i64, i64, i64)>(
            "SELECT COUNT(*),
                    COUNT(*) FILTER (WHERE completed),
                    COUNT(*) FILTER (WHERE priority = 'high')
             FROM todos WHERE ($1::BIGINT IS NULL OR owner_id = $1)",
        )
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;

        Ok(TaskStats {
            total,
            completed,
            pending: total - completed,
            high_priority,
        })
    }
}
