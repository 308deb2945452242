pub mod material;
pub mod question;
pub mod quiz;
pub mod quiz_attempt;
pub mod user;

pub use material::StudyMaterial;
pub use question::{AnswerValue, Question, QuestionType};
pub use quiz::Quiz;
pub use quiz_attempt::{QuestionResult, QuizAttempt};
pub use user::User;
