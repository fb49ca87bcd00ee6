pub mod task;
pub mod user;

pub use task::{NewTask, Task, TaskPatch, TaskPriority, TaskStats};
pub use user::{User, UserRecord};
