use crate::{
    auth::Identity,
    error::AppError,
    models::{NewTask, TaskPatch},
    store::{AppState, TaskStore},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Confirmation body for a successful delete.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Lists the caller's tasks. In the open profile (anonymous identity)
/// every task is returned.
#[get("/todos")]
pub async fn list_todos(
    state: web::Data<AppState>,
    identity: Identity,
) -> Result<impl Responder, AppError> {
    let tasks = state.store.list_tasks(identity.owner_id()).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task for the caller.
///
/// Title is required and non-empty; description defaults to an empty
/// string and priority to medium.
#[post("/todos")]
pub async fn create_todo(
    state: web::Data<AppState>,
    identity: Identity,
    task_data: web::Json<NewTask>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = state
        .store
        .insert_task(identity.owner_id(), task_data.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(task))
}

/// Partially updates a task the caller owns.
///
/// Supplied fields overwrite stored values, omitted fields are preserved,
/// and `updated_at` always advances. A task outside the caller's scope is
/// indistinguishable from a missing one: both are 404.
#[put("/todos/{id}")]
pub async fn update_todo(
    state: web::Data<AppState>,
    identity: Identity,
    task_id: web::Path<i64>,
    task_data: web::Json<TaskPatch>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = state
        .store
        .update_task(identity.owner_id(), task_id.into_inner(), task_data.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Todo not found".into()))?;

    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task the caller owns. Returns a confirmation body.
#[delete("/todos/{id}")]
pub async fn delete_todo(
    state: web::Data<AppState>,
    identity: Identity,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let deleted = state
        .store
        .delete_task(identity.owner_id(), task_id.into_inner())
        .await?;

    if !deleted {
        return Err(AppError::NotFound("Todo not found".into()));
    }

    Ok(HttpResponse::Ok().json(DeleteResponse {
        message: "Todo deleted successfully".into(),
    }))
}

/// Per-owner counters, recomputed on every call.
#[get("/stats")]
pub async fn stats(
    state: web::Data<AppState>,
    identity: Identity,
) -> Result<impl Responder, AppError> {
    let stats = state.store.task_stats(identity.owner_id()).await?;
    Ok(HttpResponse::Ok().json(stats))
}
