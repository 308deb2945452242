pub mod auth_service;
pub mod generator;
pub mod material_service;
pub mod quiz_attempt_service;
pub mod quiz_service;

pub use auth_service::AuthService;
pub use generator::{OpenAiQuestionGenerator, QuestionGenerator};
pub use material_service::MaterialService;
pub use quiz_attempt_service::QuizAttemptService;
pub use quiz_service::QuizService;
