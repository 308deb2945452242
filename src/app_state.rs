use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        MongoMaterialRepository, MongoQuizAttemptRepository, MongoQuizRepository,
        MongoUserRepository,
    },
    services::{
        auth_service::AuthService, generator::OpenAiQuestionGenerator,
        generator::QuestionGenerator, material_service::MaterialService,
        quiz_service::QuizService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub auth_service: Arc<AuthService>,
    pub material_service: Arc<MaterialService>,
    pub quiz_service: Arc<QuizService>,
    pub jwt_service: Arc<JwtService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let jwt_service = Arc::new(JwtService::new(
            &config.jwt_secret,
            config.jwt_expiration_hours,
        ));

        let user_repository = Arc::new(MongoUserRepository::new(&db));
        user_repository.ensure_indexes().await?;
        let auth_service = Arc::new(AuthService::new(
            user_repository,
            Arc::clone(&jwt_service),
        ));

        let material_repository = Arc::new(MongoMaterialRepository::new(&db));
        material_repository.ensure_indexes().await?;
        let material_service = Arc::new(MaterialService::new(Arc::clone(&material_repository)
            as Arc<dyn crate::repositories::MaterialRepository>));

        let quiz_repository = Arc::new(MongoQuizRepository::new(&db));
        quiz_repository.ensure_indexes().await?;
        let attempt_repository = Arc::new(MongoQuizAttemptRepository::new(&db));
        attempt_repository.ensure_indexes().await?;

        // The generator is optional process-wide state. Without an API key
        // the server still runs; the generation endpoint answers 500.
        let generator: Option<Arc<dyn QuestionGenerator>> = match &config.openai_api_key {
            Some(api_key) => {
                log::info!("Question generator initialized (model: {})", config.openai_model);
                Some(Arc::new(OpenAiQuestionGenerator::new(
                    api_key,
                    config.openai_model.clone(),
                )))
            }
            None => {
                log::warn!("OPENAI_API_KEY not set; quiz generation is disabled");
                None
            }
        };

        let quiz_service = Arc::new(QuizService::new(
            quiz_repository,
            attempt_repository,
            material_repository,
            generator,
        ));

        Ok(Self {
            db,
            auth_service,
            material_service,
            quiz_service,
            jwt_service,
            config: Arc::new(config),
        })
    }
}
