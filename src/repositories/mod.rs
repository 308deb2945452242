pub mod material_repository;
pub mod quiz_attempt_repository;
pub mod quiz_repository;
pub mod user_repository;

pub use material_repository::{MaterialRepository, MongoMaterialRepository};
pub use quiz_attempt_repository::{MongoQuizAttemptRepository, QuizAttemptRepository};
pub use quiz_repository::{MongoQuizRepository, QuizRepository};
pub use user_repository::{MongoUserRepository, UserRepository};
