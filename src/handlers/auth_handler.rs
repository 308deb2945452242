use actix_web::{get, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{AuthenticatedUser, AuthMiddleware},
    errors::AppError,
    models::dto::request::{LoginRequest, RegisterRequest, UpdateProfileRequest},
};

#[post("/register")]
async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state.auth_service.register(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

#[post("/login")]
async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state.auth_service.login(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/me")]
async fn current_user(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user = state.auth_service.profile(auth.user_id()).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[put("/update")]
async fn update_profile(
    state: web::Data<AppState>,
    request: web::Json<UpdateProfileRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user = state
        .auth_service
        .update_profile(auth.user_id(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Auth routes. Register and login are public; the profile routes sit in
/// a nested scope behind the token middleware.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .service(register)
            .service(login)
            .service(
                web::scope("")
                    .wrap(AuthMiddleware)
                    .service(current_user)
                    .service(update_profile),
            ),
    );
}
