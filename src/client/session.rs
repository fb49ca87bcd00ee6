use std::time::{Duration, Instant};

use crate::client::api::{ApiClient, ClientError};
use crate::client::storage::SessionStorage;
use crate::models::{NewTask, Task, TaskPatch, TaskStats, User};

/// How long a failure banner stays visible before it auto-dismisses.
pub const BANNER_TTL: Duration = Duration::from_secs(5);

/// Client-side view filter. Applied to the cached list only; switching
/// filters never touches the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFilter {
    All,
    Pending,
    Completed,
}

impl TaskFilter {
    fn keeps(self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Pending => !task.completed,
            TaskFilter::Completed => task.completed,
        }
    }
}

#[derive(Debug)]
struct Banner {
    message: String,
    shown_at: Instant,
}

/// The client session: a two-state machine (signed out / signed in) over
/// a best-effort mirror of the server's task list.
///
/// Synchronization discipline: every successful mutation triggers a full
/// re-fetch of the list and stats; a failed call leaves the cache
/// untouched and raises a transient banner.
pub struct Session {
    api: ApiClient,
    storage: SessionStorage,
    user: Option<User>,
    tasks: Vec<Task>,
    stats: Option<TaskStats>,
    filter: TaskFilter,
    banner: Option<Banner>,
}

impl Session {
    pub fn new(api: ApiClient, storage: SessionStorage) -> Self {
        Self {
            api,
            storage,
            user: None,
            tasks: Vec::new(),
            stats: None,
            filter: TaskFilter::All,
            banner: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn stats(&self) -> Option<TaskStats> {
        self.stats
    }

    pub fn filter(&self) -> TaskFilter {
        self.filter
    }

    /// Local only: never refetches.
    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.filter = filter;
    }

    /// The cached tasks the current filter keeps visible.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| self.filter.keeps(t)).collect()
    }

    /// The whole cached list, unfiltered.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The current banner message, or `None` once it has expired.
    pub fn banner(&self) -> Option<&str> {
        self.banner_with_ttl(BANNER_TTL)
    }

    fn banner_with_ttl(&self, ttl: Duration) -> Option<&str> {
        self.banner
            .as_ref()
            .filter(|b| b.shown_at.elapsed() < ttl)
            .map(|b| b.message.as_str())
    }

    fn show_banner(&mut self, err: &ClientError) {
        let message = match err {
            ClientError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        };
        self.banner = Some(Banner {
            message,
            shown_at: Instant::now(),
        });
    }

    fn enter_authenticated(&mut self, token: String, user: User) -> Result<(), ClientError> {
        self.storage.save(&token, &user)?;
        self.api.set_token(token);
        self.user = Some(user);
        Ok(())
    }

    /// Registers a new account and signs in.
    pub async fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ClientError> {
        match self.api.register(username, email, password).await {
            Ok(auth) => {
                self.enter_authenticated(auth.token, auth.user)?;
                self.refresh().await
            }
            Err(e) => {
                self.show_banner(&e);
                Err(e)
            }
        }
    }

    /// Signs in with existing credentials.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ClientError> {
        match self.api.login(email, password).await {
            Ok(auth) => {
                self.enter_authenticated(auth.token, auth.user)?;
                self.refresh().await
            }
            Err(e) => {
                self.show_banner(&e);
                Err(e)
            }
        }
    }

    /// Restores the signed-in state from durable storage, so a restart
    /// does not re-prompt for credentials. Returns whether a session was
    /// restored. A token the server no longer accepts clears the stored
    /// session and leaves the machine signed out.
    pub async fn restore(&mut self) -> Result<bool, ClientError> {
        let (token, user) = match self.storage.load() {
            Some(stored) => stored,
            None => return Ok(false),
        };

        self.api.set_token(token);
        self.user = Some(user);

        match self.refresh().await {
            Ok(()) => Ok(true),
            Err(e) if e.is_auth_failure() => {
                self.logout()?;
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Signs out: clears durable storage and every cache. The server keeps
    /// no session state, so the old token simply ages out.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.storage.clear()?;
        self.api.clear_token();
        self.user = None;
        self.tasks.clear();
        self.stats = None;
        Ok(())
    }

    /// Re-fetches the task list and stats, replacing the caches wholesale.
    /// On failure the previous caches stay as they were.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let tasks = self.api.list_todos().await;
        let stats = self.api.stats().await;
        match (tasks, stats) {
            (Ok(tasks), Ok(stats)) => {
                self.tasks = tasks;
                self.stats = Some(stats);
                Ok(())
            }
            (Err(e), _) | (_, Err(e)) => {
                self.show_banner(&e);
                Err(e)
            }
        }
    }

    pub async fn create_task(&mut self, input: NewTask) -> Result<Task, ClientError> {
        match self.api.create_todo(&input).await {
            Ok(task) => {
                self.refresh().await?;
                Ok(task)
            }
            Err(e) => {
                self.show_banner(&e);
                Err(e)
            }
        }
    }

    pub async fn update_task(&mut self, id: i64, patch: TaskPatch) -> Result<Task, ClientError> {
        match self.api.update_todo(id, &patch).await {
            Ok(task) => {
                self.refresh().await?;
                Ok(task)
            }
            Err(e) => {
                self.show_banner(&e);
                Err(e)
            }
        }
    }

    /// Convenience for the checkbox interaction.
    pub async fn toggle_task(&mut self, id: i64) -> Result<Task, ClientError> {
        let completed = self
            .tasks
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.completed)
            .unwrap_or(false);
        self.update_task(
            id,
            TaskPatch {
                completed: Some(!completed),
                ..TaskPatch::default()
            },
        )
        .await
    }

    pub async fn delete_task(&mut self, id: i64) -> Result<(), ClientError> {
        match self.api.delete_todo(id).await {
            Ok(_) => self.refresh().await,
            Err(e) => {
                self.show_banner(&e);
                Err(e)
            }
        }
    }
}
