//! Typed client for the todohub API.
//!
//! [`ApiClient`] covers the HTTP calls, [`Session`] holds the
//! authenticated user, the cached task list and stats, the local
//! all/pending/completed filter, and the transient error banner, and
//! [`SessionStorage`] persists the bearer token and user profile so a
//! restart restores the signed-in state.

pub mod api;
pub mod session;
pub mod storage;

pub use api::{ApiClient, ClientError};
pub use session::{Session, TaskFilter, BANNER_TTL};
pub use storage::SessionStorage;
