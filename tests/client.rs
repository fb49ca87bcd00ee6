use actix_web::{rt, web, App, HttpServer};
use pretty_assertions::assert_eq;
use std::net::TcpListener;

use todohub::auth::AuthMiddleware;
use todohub::client::{ApiClient, Session, SessionStorage, TaskFilter};
use todohub::config::AuthMode;
use todohub::error;
use todohub::models::{NewTask, TaskPatch};
use todohub::routes;
use todohub::store::AppState;

fn set_jwt_secret() {
    std::env::set_var("JWT_SECRET", "client-test-secret");
}

// Binds an ephemeral port and serves the app from a background task for
// the duration of the test runtime.
async fn spawn_server(state: AppState, mode: AuthMode) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware::new(mode))
                    .configure(routes::config),
            )
    })
    .workers(1)
    .listen(listener)
    .expect("Failed to listen")
    .run();

    let _ = rt::spawn(server);

    // Give the server a moment to start
    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

    format!("http://{}", addr)
}

fn new_task(title: &str) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: None,
        priority: None,
    }
}

#[actix_rt::test]
async fn test_session_sign_in_and_crud_flow() {
    set_jwt_secret();
    let base = spawn_server(AppState::in_memory(), AuthMode::Required).await;
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::new(ApiClient::new(base.clone()), SessionStorage::new(dir.path()));

    assert!(!session.is_authenticated());

    session
        .register("alice", "a@x.com", "pw123")
        .await
        .expect("registration should succeed");
    assert!(session.is_authenticated());
    assert_eq!(session.user().unwrap().username, "alice");

    // Create: the cache refills from the server after the mutation.
    let created = session.create_task(new_task("buy milk")).await.unwrap();
    assert_eq!(session.tasks().len(), 1);
    let stats = session.stats().unwrap();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.pending, 1);

    // Toggle, then check the filters against the refreshed cache.
    session.toggle_task(created.id).await.unwrap();
    assert!(session.tasks()[0].completed);

    session.set_filter(TaskFilter::Completed);
    assert_eq!(session.visible_tasks().len(), 1);
    session.set_filter(TaskFilter::Pending);
    assert_eq!(session.visible_tasks().len(), 0);
    // The filter is a view: the cache itself is untouched.
    assert_eq!(session.tasks().len(), 1);
    session.set_filter(TaskFilter::All);

    session.delete_task(created.id).await.unwrap();
    assert!(session.tasks().is_empty());
    assert_eq!(session.stats().unwrap().total, 0);

    // Logout clears everything client-side.
    session.logout().unwrap();
    assert!(!session.is_authenticated());
    assert!(session.tasks().is_empty());

    let mut fresh = Session::new(ApiClient::new(base.clone()), SessionStorage::new(dir.path()));
    assert!(!fresh.restore().await.unwrap());
}

#[actix_rt::test]
async fn test_restore_across_sessions() {
    set_jwt_secret();
    let base = spawn_server(AppState::in_memory(), AuthMode::Required).await;
    let dir = tempfile::tempdir().unwrap();

    let mut first = Session::new(ApiClient::new(base.clone()), SessionStorage::new(dir.path()));
    first.register("alice", "a@x.com", "pw123").await.unwrap();
    first.create_task(new_task("persisted")).await.unwrap();
    drop(first);

    // A new session over the same storage restores without credentials.
    let mut second = Session::new(ApiClient::new(base.clone()), SessionStorage::new(dir.path()));
    assert!(second.restore().await.unwrap());
    assert!(second.is_authenticated());
    assert_eq!(second.user().unwrap().email, "a@x.com");
    assert_eq!(second.tasks().len(), 1);
    assert_eq!(second.tasks()[0].title, "persisted");
}

#[actix_rt::test]
async fn test_failed_mutation_preserves_cache() {
    set_jwt_secret();
    let base = spawn_server(AppState::in_memory(), AuthMode::Required).await;
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::new(ApiClient::new(base.clone()), SessionStorage::new(dir.path()));

    session.register("alice", "a@x.com", "pw123").await.unwrap();
    session.create_task(new_task("keep me")).await.unwrap();
    let cached_before: Vec<i64> = session.tasks().iter().map(|t| t.id).collect();

    let err = session
        .update_task(
            9999,
            TaskPatch {
                completed: Some(true),
                ..TaskPatch::default()
            },
        )
        .await
        .expect_err("update of a missing id must fail");
    assert!(err.to_string().contains("Todo not found"));

    // The cache is exactly as it was, and the failure is surfaced as a
    // transient banner.
    let cached_after: Vec<i64> = session.tasks().iter().map(|t| t.id).collect();
    assert_eq!(cached_before, cached_after);
    assert_eq!(session.banner(), Some("Todo not found"));
}

#[actix_rt::test]
async fn test_login_failure_shows_banner() {
    set_jwt_secret();
    let base = spawn_server(AppState::in_memory(), AuthMode::Required).await;
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::new(ApiClient::new(base.clone()), SessionStorage::new(dir.path()));

    session.register("alice", "a@x.com", "pw123").await.unwrap();
    session.logout().unwrap();

    let result = session.login("a@x.com", "wrong").await;
    assert!(result.is_err());
    assert!(!session.is_authenticated());
    assert_eq!(session.banner(), Some("Invalid credentials"));
}

#[actix_rt::test]
async fn test_restore_with_stale_token_signs_out() {
    set_jwt_secret();
    let base = spawn_server(AppState::in_memory(), AuthMode::Required).await;
    let dir = tempfile::tempdir().unwrap();

    let mut first = Session::new(ApiClient::new(base.clone()), SessionStorage::new(dir.path()));
    first.register("alice", "a@x.com", "pw123").await.unwrap();
    let profile = first.user().unwrap().clone();
    drop(first);

    // Corrupt the stored token; the profile entry stays valid.
    SessionStorage::new(dir.path())
        .save("not-a-jwt", &profile)
        .unwrap();

    let mut session = Session::new(ApiClient::new(base.clone()), SessionStorage::new(dir.path()));
    assert!(!session.restore().await.unwrap());
    assert!(!session.is_authenticated());
    // The rejected session was cleared from storage.
    assert!(SessionStorage::new(dir.path()).load().is_none());
}
