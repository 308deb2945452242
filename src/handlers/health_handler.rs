use actix_web::{get, web, HttpResponse};

use crate::app_state::AppState;

#[get("/api/health")]
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[get("/api/health/ready")]
async fn health_check_ready(state: web::Data<AppState>) -> HttpResponse {
    let db_health = state.db.health_check().await;

    let status = if db_health.is_ok() { "ready" } else { "not_ready" };

    HttpResponse::Ok().json(serde_json::json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "dependencies": {
            "mongodb": if db_health.is_ok() { "ok" } else { "error" }
        }
    }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check).service(health_check_ready);
}
