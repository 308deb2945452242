use actix_cors::Cors;
use actix_web::{
    http::header,
    middleware::{Logger, NormalizePath},
    web, App, HttpServer,
};

use quiz_planner_server::{app_state::AppState, config::Config, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    if std::env::var("APP_ENV").as_deref() == Ok("production") {
        config.validate_for_production();
    }

    let host = config.web_server_host.clone();
    let port = config.web_server_port;
    let allowed_origin = config.cors_allowed_origin.clone();

    let state = AppState::new(config)
        .await
        .map_err(|e| std::io::Error::other(format!("Failed to initialize application: {}", e)))?;

    log::info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&allowed_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
            .supports_credentials();

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(NormalizePath::trim())
            .wrap(Logger::default())
            .wrap(cors)
            .configure(handlers::health_handler::configure)
            .configure(handlers::auth_handler::configure)
            .configure(handlers::material_handler::configure)
            .configure(handlers::quiz_handler::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
