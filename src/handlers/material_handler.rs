use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{AuthenticatedUser, AuthMiddleware},
    errors::AppError,
    models::dto::request::{CreateMaterialRequest, UpdateMaterialRequest},
};

#[get("")]
async fn get_all_materials(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let materials = state
        .material_service
        .list_materials(auth.user_id())
        .await?;
    Ok(HttpResponse::Ok().json(materials))
}

#[post("")]
async fn create_material(
    state: web::Data<AppState>,
    request: web::Json<CreateMaterialRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let response = state
        .material_service
        .create_material(auth.user_id(), request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(response))
}

#[get("/{material_id}")]
async fn get_material(
    state: web::Data<AppState>,
    material_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let material = state
        .material_service
        .get_material(auth.user_id(), &material_id)
        .await?;
    Ok(HttpResponse::Ok().json(material))
}

#[put("/{material_id}")]
async fn update_material(
    state: web::Data<AppState>,
    material_id: web::Path<String>,
    request: web::Json<UpdateMaterialRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let response = state
        .material_service
        .update_material(auth.user_id(), &material_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[delete("/{material_id}")]
async fn delete_material(
    state: web::Data<AppState>,
    material_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let response = state
        .material_service
        .delete_material(auth.user_id(), &material_id)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/materials")
            .wrap(AuthMiddleware)
            .service(get_all_materials)
            .service(create_material)
            .service(get_material)
            .service(update_material)
            .service(delete_material),
    );
}
