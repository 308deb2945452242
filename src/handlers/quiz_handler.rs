use actix_web::{delete, get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::{GenerateQuizRequest, SubmitAttemptRequest},
};

/// Generate a quiz from a study material owned by the caller.
#[post("/generate")]
async fn generate_quiz(
    state: web::Data<AppState>,
    request: web::Json<GenerateQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let response = state
        .quiz_service
        .generate_quiz(auth.user_id(), request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(response))
}

#[get("")]
async fn get_all_quizzes(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quizzes = state.quiz_service.list_quizzes(auth.user_id()).await?;
    Ok(HttpResponse::Ok().json(quizzes))
}

/// All quiz attempts for the current user, without the per-question results.
#[get("/attempts")]
async fn get_user_attempts(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let attempts = state.quiz_service.list_attempts(auth.user_id()).await?;
    Ok(HttpResponse::Ok().json(attempts))
}

#[get("/dashboard")]
async fn get_quiz_dashboard(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    log::debug!("Building quiz dashboard for user {}", auth.user_id());

    let dashboard = state.quiz_service.dashboard(auth.user_id()).await?;
    Ok(HttpResponse::Ok().json(dashboard))
}

/// All attempts against one quiz, most recent first.
#[get("/attempts/{quiz_id}")]
async fn get_quiz_attempts(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let attempts = state
        .quiz_service
        .list_attempts_for_quiz(auth.user_id(), &quiz_id)
        .await?;
    Ok(HttpResponse::Ok().json(attempts))
}

#[get("/{quiz_id}")]
async fn get_quiz(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    log::debug!("Fetching quiz {} for user {}", quiz_id, auth.user_id());

    let quiz = state.quiz_service.get_quiz(auth.user_id(), &quiz_id).await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[delete("/{quiz_id}")]
async fn delete_quiz(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let response = state
        .quiz_service
        .delete_quiz(auth.user_id(), &quiz_id)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Grade a submission and store it as an immutable attempt record.
#[post("/{quiz_id}/attempt")]
async fn submit_quiz_attempt(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    request: web::Json<SubmitAttemptRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    log::debug!(
        "Submitting attempt on quiz {} for user {}",
        quiz_id,
        auth.user_id()
    );

    let response = state
        .quiz_service
        .submit_attempt(auth.user_id(), &quiz_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(response))
}

/// Quiz routes. Literal paths are registered before the `{quiz_id}`
/// matchers so `/attempts` and `/dashboard` are never parsed as ids.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/quizzes")
            .wrap(crate::auth::AuthMiddleware)
            .service(generate_quiz)
            .service(get_all_quizzes)
            .service(get_user_attempts)
            .service(get_quiz_dashboard)
            .service(get_quiz_attempts)
            .service(get_quiz)
            .service(delete_quiz)
            .service(submit_quiz_attempt),
    );
}
