use std::sync::Arc;

use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::StudyMaterial,
        dto::{
            request::{CreateMaterialRequest, UpdateMaterialRequest},
            response::{
                CreateMaterialResponse, MaterialDetailDto, MaterialSummaryDto, MessageResponse,
            },
        },
    },
    repositories::MaterialRepository,
};

pub struct MaterialService {
    materials: Arc<dyn MaterialRepository>,
}

impl MaterialService {
    pub fn new(materials: Arc<dyn MaterialRepository>) -> Self {
        Self { materials }
    }

    pub async fn create_material(
        &self,
        user_id: &str,
        request: CreateMaterialRequest,
    ) -> AppResult<CreateMaterialResponse> {
        request.validate()?;

        let material = StudyMaterial::new(&request.title, &request.content, user_id);
        let material_id = self.materials.insert(material).await?;
        log::info!("Created material {} for user {}", material_id.to_hex(), user_id);

        Ok(CreateMaterialResponse {
            message: "Study material created successfully".to_string(),
            material_id: material_id.to_hex(),
        })
    }

    pub async fn list_materials(&self, user_id: &str) -> AppResult<Vec<MaterialSummaryDto>> {
        let materials = self.materials.list_for_user(user_id).await?;
        Ok(materials.into_iter().map(MaterialSummaryDto::from).collect())
    }

    pub async fn get_material(
        &self,
        user_id: &str,
        material_id: &str,
    ) -> AppResult<MaterialDetailDto> {
        let id = parse_material_id(material_id)?;

        let material = self
            .materials
            .find_for_user(&id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Study material not found".to_string()))?;

        Ok(MaterialDetailDto::from(material))
    }

    pub async fn update_material(
        &self,
        user_id: &str,
        material_id: &str,
        request: UpdateMaterialRequest,
    ) -> AppResult<MessageResponse> {
        request.validate()?;
        let id = parse_material_id(material_id)?;

        let mut material = self
            .materials
            .find_for_user(&id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Study material not found".to_string()))?;

        if let Some(title) = request.title {
            material.title = title;
        }
        if let Some(content) = request.content {
            material.content = content;
        }
        material.updated_at = Some(Utc::now());

        let matched = self
            .materials
            .replace_for_user(&id, user_id, material)
            .await?;
        if matched == 0 {
            return Err(AppError::NotFound("Study material not found".to_string()));
        }

        Ok(MessageResponse {
            message: "Study material updated successfully".to_string(),
        })
    }

    pub async fn delete_material(
        &self,
        user_id: &str,
        material_id: &str,
    ) -> AppResult<MessageResponse> {
        let id = parse_material_id(material_id)?;

        let deleted = self.materials.delete_for_user(&id, user_id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound("Study material not found".to_string()));
        }

        Ok(MessageResponse {
            message: "Study material deleted successfully".to_string(),
        })
    }
}

fn parse_material_id(material_id: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(material_id)
        .map_err(|_| AppError::ValidationError("Invalid material ID".to_string()))
}
