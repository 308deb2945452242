use std::collections::HashMap;
use std::sync::Arc;

use mongodb::bson::oid::ObjectId;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Quiz, QuizAttempt},
        dto::{
            request::{GenerateQuizRequest, SubmitAttemptRequest},
            response::{
                AttemptDetailDto, AttemptResponse, AttemptSummaryDto, DashboardAttemptDto,
                DashboardResponse, DashboardStats, GenerateQuizResponse, MessageResponse,
                QuizDetailDto, QuizSummaryDto,
            },
        },
    },
    repositories::{MaterialRepository, QuizAttemptRepository, QuizRepository},
    services::{generator::QuestionGenerator, quiz_attempt_service::QuizAttemptService},
};

pub struct QuizService {
    quizzes: Arc<dyn QuizRepository>,
    attempts: Arc<dyn QuizAttemptRepository>,
    materials: Arc<dyn MaterialRepository>,
    generator: Option<Arc<dyn QuestionGenerator>>,
}

impl QuizService {
    pub fn new(
        quizzes: Arc<dyn QuizRepository>,
        attempts: Arc<dyn QuizAttemptRepository>,
        materials: Arc<dyn MaterialRepository>,
        generator: Option<Arc<dyn QuestionGenerator>>,
    ) -> Self {
        Self {
            quizzes,
            attempts,
            materials,
            generator,
        }
    }

    pub async fn generate_quiz(
        &self,
        user_id: &str,
        request: GenerateQuizRequest,
    ) -> AppResult<GenerateQuizResponse> {
        let generator = self.generator.as_ref().ok_or_else(|| {
            AppError::DependencyUnavailable("Question generator not available".to_string())
        })?;

        request.validate()?;
        let material_id = parse_object_id(&request.material_id, "material")?;

        let material = self
            .materials
            .find_for_user(&material_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Study material not found".to_string()))?;

        let questions = generator
            .generate_questions(
                &material.content,
                request.num_questions(),
                &request.question_types(),
            )
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to generate quiz: {}", e)))?;

        let title = request
            .title
            .clone()
            .unwrap_or_else(|| format!("Quiz on {}", material.title));
        let description = request
            .description
            .clone()
            .unwrap_or_else(|| format!("Generated quiz based on {}", material.title));

        let num_questions = questions.len();
        let quiz = Quiz::new(
            title.clone(),
            description,
            questions,
            user_id,
            &request.material_id,
        );

        let quiz_id = self.quizzes.insert(quiz).await?;
        log::info!("Generated quiz {} for user {}", quiz_id.to_hex(), user_id);

        Ok(GenerateQuizResponse {
            message: "Quiz generated successfully".to_string(),
            quiz_id: quiz_id.to_hex(),
            title,
            num_questions,
        })
    }

    pub async fn list_quizzes(&self, user_id: &str) -> AppResult<Vec<QuizSummaryDto>> {
        let quizzes = self.quizzes.list_for_user(user_id).await?;
        Ok(quizzes.into_iter().map(QuizSummaryDto::from).collect())
    }

    pub async fn get_quiz(&self, user_id: &str, quiz_id: &str) -> AppResult<QuizDetailDto> {
        let id = parse_object_id(quiz_id, "quiz")?;

        let quiz = self
            .quizzes
            .find_for_user(&id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

        Ok(QuizDetailDto::from(quiz))
    }

    pub async fn delete_quiz(&self, user_id: &str, quiz_id: &str) -> AppResult<MessageResponse> {
        let id = parse_object_id(quiz_id, "quiz")?;

        let deleted = self.quizzes.delete_for_user(&id, user_id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound(
                "Quiz not found or not owned by user".to_string(),
            ));
        }

        log::info!("Deleted quiz {} for user {}", quiz_id, user_id);
        Ok(MessageResponse {
            message: "Quiz deleted successfully".to_string(),
        })
    }

    pub async fn submit_attempt(
        &self,
        user_id: &str,
        quiz_id: &str,
        request: SubmitAttemptRequest,
    ) -> AppResult<AttemptResponse> {
        let id = parse_object_id(quiz_id, "quiz")?;

        let quiz = self
            .quizzes
            .find_for_user(&id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

        let (score, results) = QuizAttemptService::grade(&quiz.questions, &request.answers);
        let total_questions = quiz.questions.len() as i32;
        let percentage = QuizAttemptService::percentage(score, total_questions);

        let attempt = QuizAttempt::new(
            quiz_id,
            user_id,
            request.answers,
            score,
            total_questions,
            percentage,
            results.clone(),
        );

        let attempt_id = self.attempts.insert(attempt).await?;
        log::debug!(
            "Attempt {} on quiz {}: {}/{} correct",
            attempt_id.to_hex(),
            quiz_id,
            score,
            total_questions
        );

        Ok(AttemptResponse {
            message: "Quiz attempt submitted successfully".to_string(),
            attempt_id: attempt_id.to_hex(),
            score,
            total_questions,
            percentage,
            results,
        })
    }

    pub async fn list_attempts(&self, user_id: &str) -> AppResult<Vec<AttemptSummaryDto>> {
        let attempts = self.attempts.list_for_user(user_id).await?;
        Ok(attempts.into_iter().map(AttemptSummaryDto::from).collect())
    }

    pub async fn list_attempts_for_quiz(
        &self,
        user_id: &str,
        quiz_id: &str,
    ) -> AppResult<Vec<AttemptDetailDto>> {
        let attempts = self.attempts.list_for_quiz(user_id, quiz_id).await?;
        Ok(attempts.into_iter().map(AttemptDetailDto::from).collect())
    }

    pub async fn dashboard(&self, user_id: &str) -> AppResult<DashboardResponse> {
        let attempts = self.attempts.list_recent_for_user(user_id).await?;
        let quizzes = self.quizzes.list_for_user(user_id).await?;

        let (attempts, stats) = build_dashboard(attempts, &quizzes);
        Ok(DashboardResponse { attempts, stats })
    }
}

fn parse_object_id(id: &str, entity: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(id)
        .map_err(|_| AppError::ValidationError(format!("Invalid {} ID", entity)))
}

/// Join attempts with their quizzes and compute aggregate stats. Attempts
/// whose quiz has since been deleted get a placeholder title. The heavy
/// `results` and `answers` fields are not part of the dashboard row.
fn build_dashboard(
    attempts: Vec<QuizAttempt>,
    quizzes: &[Quiz],
) -> (Vec<DashboardAttemptDto>, DashboardStats) {
    let quiz_map: HashMap<String, &Quiz> = quizzes
        .iter()
        .filter_map(|quiz| quiz.id.map(|oid| (oid.to_hex(), quiz)))
        .collect();

    let rows: Vec<DashboardAttemptDto> = attempts
        .into_iter()
        .map(|attempt| {
            let (quiz_title, quiz_description) = match quiz_map.get(&attempt.quiz_id) {
                Some(quiz) => (quiz.title.clone(), quiz.description.clone()),
                None => ("Quiz Not Found".to_string(), String::new()),
            };

            DashboardAttemptDto {
                id: attempt.id.map(|oid| oid.to_hex()).unwrap_or_default(),
                quiz_id: attempt.quiz_id,
                user_id: attempt.user_id,
                score: attempt.score,
                total_questions: attempt.total_questions,
                percentage: attempt.percentage,
                created_at: attempt
                    .created_at
                    .map(|dt| dt.to_rfc3339())
                    .unwrap_or_default(),
                quiz_title,
                quiz_description,
            }
        })
        .collect();

    let total_attempts = rows.len();
    let average_score = if total_attempts == 0 {
        0.0
    } else {
        let sum: f64 = rows.iter().map(|row| row.percentage).sum();
        round_two_decimals(sum / total_attempts as f64)
    };

    (
        rows,
        DashboardStats {
            total_attempts,
            average_score,
        },
    )
}

fn round_two_decimals(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
