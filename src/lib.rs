#![doc = "The `todohub` library crate."]
#![doc = ""]
#![doc = "This crate contains the domain models, authentication mechanisms, storage"]
#![doc = "backends, routing configuration, and error handling for the todohub service,"]
#![doc = "plus the typed client used to drive it. The main binary (`main.rs`) uses it"]
#![doc = "to construct and run the application."]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

pub use crate::error::AppError;
pub use crate::store::AppState;
