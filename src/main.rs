use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use std::sync::Arc;

use todohub::auth::AuthMiddleware;
use todohub::config::Config;
use todohub::error;
use todohub::routes;
use todohub::store::{AppState, PgStore};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    let state = match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url)
                .await
                .expect("Failed to connect to database");
            log::info!("using postgres store");
            AppState::new(Arc::new(store))
        }
        None => {
            log::info!("DATABASE_URL not set, using in-memory store");
            AppState::in_memory()
        }
    };

    let auth_mode = config.auth_mode;
    log::info!(
        "Starting todohub server at {} ({:?} auth profile)",
        config.server_url(),
        auth_mode
    );

    let host = config.server_host.clone();
    let port = config.server_port;

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware::new(auth_mode))
                    .configure(routes::config),
            )
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
