pub mod auth;
pub mod health;
pub mod todos;

use actix_web::web;

/// Mounts every route of the external contract. The caller wraps the
/// parent `/api` scope with `AuthMiddleware`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::register)
        .service(auth::login)
        .service(health::health)
        .service(todos::list_todos)
        .service(todos::create_todo)
        .service(todos::update_todo)
        .service(todos::delete_todo)
        .service(todos::stats);
}
