//! End-to-end service flows over in-memory repositories: generation,
//! grading, dashboard aggregation, and owner scoping, without a MongoDB
//! instance.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use quiz_planner_server::{
    errors::{AppError, AppResult},
    models::{
        domain::{
            question::{AnswerValue, Question, QuestionType},
            Quiz, QuizAttempt, StudyMaterial,
        },
        dto::request::{GenerateQuizRequest, SubmitAttemptRequest},
    },
    repositories::{MaterialRepository, QuizAttemptRepository, QuizRepository},
    services::{generator::QuestionGenerator, QuizService},
};

struct InMemoryQuizRepository {
    quizzes: RwLock<HashMap<String, Quiz>>,
}

impl InMemoryQuizRepository {
    fn new() -> Self {
        Self {
            quizzes: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn insert(&self, mut quiz: Quiz) -> AppResult<ObjectId> {
        let id = ObjectId::new();
        quiz.id = Some(id);
        self.quizzes.write().await.insert(id.to_hex(), quiz);
        Ok(id)
    }

    async fn find_for_user(&self, id: &ObjectId, user_id: &str) -> AppResult<Option<Quiz>> {
        let quizzes = self.quizzes.read().await;
        Ok(quizzes
            .get(&id.to_hex())
            .filter(|quiz| quiz.user_id == user_id)
            .cloned())
    }

    async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<Quiz>> {
        let quizzes = self.quizzes.read().await;
        Ok(quizzes
            .values()
            .filter(|quiz| quiz.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete_for_user(&self, id: &ObjectId, user_id: &str) -> AppResult<u64> {
        let mut quizzes = self.quizzes.write().await;
        let key = id.to_hex();
        match quizzes.get(&key) {
            Some(quiz) if quiz.user_id == user_id => {
                quizzes.remove(&key);
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

struct InMemoryAttemptRepository {
    attempts: RwLock<Vec<QuizAttempt>>,
}

impl InMemoryAttemptRepository {
    fn new() -> Self {
        Self {
            attempts: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl QuizAttemptRepository for InMemoryAttemptRepository {
    async fn insert(&self, mut attempt: QuizAttempt) -> AppResult<ObjectId> {
        let id = ObjectId::new();
        attempt.id = Some(id);
        self.attempts.write().await.push(attempt);
        Ok(id)
    }

    async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<QuizAttempt>> {
        let attempts = self.attempts.read().await;
        Ok(attempts
            .iter()
            .filter(|attempt| attempt.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_recent_for_user(&self, user_id: &str) -> AppResult<Vec<QuizAttempt>> {
        let mut attempts = self.list_for_user(user_id).await?;
        attempts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(attempts)
    }

    async fn list_for_quiz(&self, user_id: &str, quiz_id: &str) -> AppResult<Vec<QuizAttempt>> {
        let mut attempts = self.list_for_user(user_id).await?;
        attempts.retain(|attempt| attempt.quiz_id == quiz_id);
        attempts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(attempts)
    }
}

struct InMemoryMaterialRepository {
    materials: RwLock<HashMap<String, StudyMaterial>>,
}

impl InMemoryMaterialRepository {
    fn new() -> Self {
        Self {
            materials: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl MaterialRepository for InMemoryMaterialRepository {
    async fn insert(&self, mut material: StudyMaterial) -> AppResult<ObjectId> {
        let id = ObjectId::new();
        material.id = Some(id);
        self.materials.write().await.insert(id.to_hex(), material);
        Ok(id)
    }

    async fn find_for_user(
        &self,
        id: &ObjectId,
        user_id: &str,
    ) -> AppResult<Option<StudyMaterial>> {
        let materials = self.materials.read().await;
        Ok(materials
            .get(&id.to_hex())
            .filter(|material| material.user_id == user_id)
            .cloned())
    }

    async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<StudyMaterial>> {
        let materials = self.materials.read().await;
        Ok(materials
            .values()
            .filter(|material| material.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn replace_for_user(
        &self,
        id: &ObjectId,
        user_id: &str,
        material: StudyMaterial,
    ) -> AppResult<u64> {
        let mut materials = self.materials.write().await;
        let key = id.to_hex();
        match materials.get(&key) {
            Some(existing) if existing.user_id == user_id => {
                materials.insert(key, material);
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn delete_for_user(&self, id: &ObjectId, user_id: &str) -> AppResult<u64> {
        let mut materials = self.materials.write().await;
        let key = id.to_hex();
        match materials.get(&key) {
            Some(existing) if existing.user_id == user_id => {
                materials.remove(&key);
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

/// Generator that returns a fixed question list and counts invocations,
/// so tests can assert it was never reached on early failures.
struct StubGenerator {
    questions: Vec<Question>,
    calls: AtomicUsize,
}

impl StubGenerator {
    fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl QuestionGenerator for StubGenerator {
    async fn generate_questions(
        &self,
        _content: &str,
        _num_questions: u32,
        _question_types: &[QuestionType],
    ) -> AppResult<Vec<Question>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.questions.clone())
    }
}

struct FailingGenerator;

#[async_trait]
impl QuestionGenerator for FailingGenerator {
    async fn generate_questions(
        &self,
        _content: &str,
        _num_questions: u32,
        _question_types: &[QuestionType],
    ) -> AppResult<Vec<Question>> {
        Err(AppError::InternalError(
            "model endpoint unreachable".to_string(),
        ))
    }
}

fn true_false_question() -> Question {
    Question {
        question_type: QuestionType::TrueFalse,
        question: "Cells contain a nucleus.".to_string(),
        options: None,
        correct_answer: AnswerValue::Bool(true),
        explanation: "Eukaryotic cells have a nucleus.".to_string(),
    }
}

fn short_answer_question() -> Question {
    Question {
        question_type: QuestionType::ShortAnswer,
        question: "What organelle produces ATP?".to_string(),
        options: None,
        correct_answer: AnswerValue::Text("Mitochondria".to_string()),
        explanation: "Mitochondria are the site of respiration.".to_string(),
    }
}

struct TestContext {
    service: QuizService,
    materials: Arc<InMemoryMaterialRepository>,
}

fn build_service(generator: Option<Arc<dyn QuestionGenerator>>) -> TestContext {
    let materials = Arc::new(InMemoryMaterialRepository::new());
    let service = QuizService::new(
        Arc::new(InMemoryQuizRepository::new()),
        Arc::new(InMemoryAttemptRepository::new()),
        Arc::clone(&materials) as Arc<dyn MaterialRepository>,
        generator,
    );
    TestContext { service, materials }
}

async fn seed_material(ctx: &TestContext, user_id: &str) -> String {
    let material = StudyMaterial::new("Cell Biology", "Cells contain a nucleus.", user_id);
    ctx.materials.insert(material).await.unwrap().to_hex()
}

fn generate_request(material_id: &str) -> GenerateQuizRequest {
    serde_json::from_value(serde_json::json!({ "material_id": material_id })).unwrap()
}

fn answers(pairs: &[(&str, AnswerValue)]) -> SubmitAttemptRequest {
    SubmitAttemptRequest {
        answers: pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
    }
}

#[actix_web::test]
async fn generate_quiz_defaults_title_from_material() {
    let generator = Arc::new(StubGenerator::new(vec![
        true_false_question(),
        short_answer_question(),
    ]));
    let ctx = build_service(Some(Arc::clone(&generator) as Arc<dyn QuestionGenerator>));
    let material_id = seed_material(&ctx, "user-1").await;

    let response = ctx
        .service
        .generate_quiz("user-1", generate_request(&material_id))
        .await
        .unwrap();

    assert_eq!(response.title, "Quiz on Cell Biology");
    assert_eq!(response.num_questions, 2);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);

    let quiz = ctx
        .service
        .get_quiz("user-1", &response.quiz_id)
        .await
        .unwrap();
    assert_eq!(quiz.description, "Generated quiz based on Cell Biology");
    assert_eq!(quiz.questions.len(), 2);
    assert_eq!(quiz.material_id, material_id);
}

#[actix_web::test]
async fn generate_quiz_without_generator_is_unavailable() {
    let ctx = build_service(None);
    let material_id = seed_material(&ctx, "user-1").await;

    let err = ctx
        .service
        .generate_quiz("user-1", generate_request(&material_id))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::DependencyUnavailable(_)));
}

#[actix_web::test]
async fn generate_quiz_rejects_malformed_material_id() {
    let generator = Arc::new(StubGenerator::new(vec![true_false_question()]));
    let ctx = build_service(Some(Arc::clone(&generator) as Arc<dyn QuestionGenerator>));

    let err = ctx
        .service
        .generate_quiz("user-1", generate_request("not-an-object-id"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ValidationError(_)));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn generate_quiz_for_foreign_material_is_not_found_before_generator_call() {
    let generator = Arc::new(StubGenerator::new(vec![true_false_question()]));
    let ctx = build_service(Some(Arc::clone(&generator) as Arc<dyn QuestionGenerator>));
    let material_id = seed_material(&ctx, "someone-else").await;

    let err = ctx
        .service
        .generate_quiz("user-1", generate_request(&material_id))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn generator_failure_surfaces_as_internal_error() {
    let ctx = build_service(Some(Arc::new(FailingGenerator)));
    let material_id = seed_material(&ctx, "user-1").await;

    let err = ctx
        .service
        .generate_quiz("user-1", generate_request(&material_id))
        .await
        .unwrap_err();

    match err {
        AppError::InternalError(message) => {
            assert!(message.contains("Failed to generate quiz"));
        }
        other => panic!("expected InternalError, got {:?}", other),
    }
}

#[actix_web::test]
async fn submit_attempt_grades_and_persists() {
    let ctx = build_service(Some(Arc::new(StubGenerator::new(vec![
        true_false_question(),
        short_answer_question(),
    ]))));
    let material_id = seed_material(&ctx, "user-1").await;

    let generated = ctx
        .service
        .generate_quiz("user-1", generate_request(&material_id))
        .await
        .unwrap();

    let response = ctx
        .service
        .submit_attempt(
            "user-1",
            &generated.quiz_id,
            answers(&[
                ("0", AnswerValue::Text("true".to_string())),
                ("1", AnswerValue::Text("mitochondria".to_string())),
            ]),
        )
        .await
        .unwrap();

    assert_eq!(response.score, 2);
    assert_eq!(response.total_questions, 2);
    assert_eq!(response.percentage, 100.0);
    assert!(response.results.iter().all(|result| result.correct));

    let attempts = ctx.service.list_attempts("user-1").await.unwrap();
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].score, 2);
}

#[actix_web::test]
async fn unanswered_questions_keep_feedback_in_results() {
    let ctx = build_service(Some(Arc::new(StubGenerator::new(vec![
        true_false_question(),
        short_answer_question(),
    ]))));
    let material_id = seed_material(&ctx, "user-1").await;

    let generated = ctx
        .service
        .generate_quiz("user-1", generate_request(&material_id))
        .await
        .unwrap();

    let response = ctx
        .service
        .submit_attempt(
            "user-1",
            &generated.quiz_id,
            answers(&[("0", AnswerValue::Bool(true))]),
        )
        .await
        .unwrap();

    assert_eq!(response.score, 1);
    assert_eq!(response.percentage, 50.0);
    assert!(!response.results[1].correct);
    assert_eq!(
        response.results[1].correct_answer,
        AnswerValue::Text("Mitochondria".to_string())
    );
    assert!(!response.results[1].explanation.is_empty());
}

#[actix_web::test]
async fn cross_user_access_is_not_found_never_forbidden() {
    let ctx = build_service(Some(Arc::new(StubGenerator::new(vec![
        true_false_question(),
    ]))));
    let material_id = seed_material(&ctx, "owner").await;

    let generated = ctx
        .service
        .generate_quiz("owner", generate_request(&material_id))
        .await
        .unwrap();

    let get_err = ctx
        .service
        .get_quiz("intruder", &generated.quiz_id)
        .await
        .unwrap_err();
    let delete_err = ctx
        .service
        .delete_quiz("intruder", &generated.quiz_id)
        .await
        .unwrap_err();
    let attempt_err = ctx
        .service
        .submit_attempt("intruder", &generated.quiz_id, answers(&[]))
        .await
        .unwrap_err();

    for err in [get_err, delete_err, attempt_err] {
        assert!(matches!(err, AppError::NotFound(_)), "got {:?}", err);
        assert_eq!(
            actix_web::ResponseError::status_code(&err),
            actix_web::http::StatusCode::NOT_FOUND
        );
    }

    // The intruder sees no attempts for the quiz either
    let attempts = ctx
        .service
        .list_attempts_for_quiz("intruder", &generated.quiz_id)
        .await
        .unwrap();
    assert!(attempts.is_empty());

    // The quiz is still there for its owner
    assert!(ctx.service.get_quiz("owner", &generated.quiz_id).await.is_ok());
}

#[actix_web::test]
async fn delete_quiz_removes_it_for_owner() {
    let ctx = build_service(Some(Arc::new(StubGenerator::new(vec![
        true_false_question(),
    ]))));
    let material_id = seed_material(&ctx, "user-1").await;

    let generated = ctx
        .service
        .generate_quiz("user-1", generate_request(&material_id))
        .await
        .unwrap();

    let response = ctx
        .service
        .delete_quiz("user-1", &generated.quiz_id)
        .await
        .unwrap();
    assert_eq!(response.message, "Quiz deleted successfully");

    let err = ctx
        .service
        .get_quiz("user-1", &generated.quiz_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[actix_web::test]
async fn dashboard_joins_quizzes_and_averages_scores() {
    let ctx = build_service(Some(Arc::new(StubGenerator::new(vec![
        true_false_question(),
        short_answer_question(),
    ]))));
    let material_id = seed_material(&ctx, "user-1").await;

    let generated = ctx
        .service
        .generate_quiz("user-1", generate_request(&material_id))
        .await
        .unwrap();

    // 100%
    ctx.service
        .submit_attempt(
            "user-1",
            &generated.quiz_id,
            answers(&[
                ("0", AnswerValue::Bool(true)),
                ("1", AnswerValue::Text("Mitochondria".to_string())),
            ]),
        )
        .await
        .unwrap();

    // 50%
    ctx.service
        .submit_attempt(
            "user-1",
            &generated.quiz_id,
            answers(&[("0", AnswerValue::Bool(true))]),
        )
        .await
        .unwrap();

    let dashboard = ctx.service.dashboard("user-1").await.unwrap();

    assert_eq!(dashboard.stats.total_attempts, 2);
    assert_eq!(dashboard.stats.average_score, 75.0);
    assert_eq!(dashboard.attempts.len(), 2);
    assert!(dashboard
        .attempts
        .iter()
        .all(|row| row.quiz_title == "Quiz on Cell Biology"));
}

#[actix_web::test]
async fn dashboard_over_no_attempts_is_empty_with_zero_average() {
    let ctx = build_service(None);

    let dashboard = ctx.service.dashboard("user-1").await.unwrap();

    assert!(dashboard.attempts.is_empty());
    assert_eq!(dashboard.stats.total_attempts, 0);
    assert_eq!(dashboard.stats.average_score, 0.0);
}

#[actix_web::test]
async fn dashboard_shows_placeholder_for_deleted_quiz() {
    let ctx = build_service(Some(Arc::new(StubGenerator::new(vec![
        true_false_question(),
    ]))));
    let material_id = seed_material(&ctx, "user-1").await;

    let generated = ctx
        .service
        .generate_quiz("user-1", generate_request(&material_id))
        .await
        .unwrap();
    ctx.service
        .submit_attempt(
            "user-1",
            &generated.quiz_id,
            answers(&[("0", AnswerValue::Bool(true))]),
        )
        .await
        .unwrap();
    ctx.service
        .delete_quiz("user-1", &generated.quiz_id)
        .await
        .unwrap();

    let dashboard = ctx.service.dashboard("user-1").await.unwrap();

    assert_eq!(dashboard.attempts.len(), 1);
    assert_eq!(dashboard.attempts[0].quiz_title, "Quiz Not Found");
    assert_eq!(dashboard.attempts[0].quiz_description, "");
    // The attempt record itself survives the quiz deletion
    assert_eq!(dashboard.stats.average_score, 100.0);
}

#[actix_web::test]
async fn quiz_attempts_are_listed_most_recent_first() {
    let ctx = build_service(Some(Arc::new(StubGenerator::new(vec![
        true_false_question(),
    ]))));
    let material_id = seed_material(&ctx, "user-1").await;

    let generated = ctx
        .service
        .generate_quiz("user-1", generate_request(&material_id))
        .await
        .unwrap();

    let first = ctx
        .service
        .submit_attempt(
            "user-1",
            &generated.quiz_id,
            answers(&[("0", AnswerValue::Bool(false))]),
        )
        .await
        .unwrap();

    // Keep the created_at timestamps strictly ordered
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let second = ctx
        .service
        .submit_attempt(
            "user-1",
            &generated.quiz_id,
            answers(&[("0", AnswerValue::Bool(true))]),
        )
        .await
        .unwrap();

    let attempts = ctx
        .service
        .list_attempts_for_quiz("user-1", &generated.quiz_id)
        .await
        .unwrap();

    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0].id, second.attempt_id);
    assert_eq!(attempts[1].id, first.attempt_id);
    // Per-quiz listings carry the full result list
    assert_eq!(attempts[0].results.len(), 1);
}
