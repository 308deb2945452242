use std::collections::HashMap;

use crate::models::domain::question::{AnswerValue, Question, QuestionType};
use crate::models::domain::quiz_attempt::QuestionResult;

pub struct QuizAttemptService;

impl QuizAttemptService {
    /// Grade a submission against a quiz's question list. Answer keys are
    /// question indices as strings; a missing key means unanswered, which
    /// grades as incorrect but still records the correct answer and
    /// explanation for the client.
    pub fn grade(
        questions: &[Question],
        answers: &HashMap<String, AnswerValue>,
    ) -> (i32, Vec<QuestionResult>) {
        let mut score = 0;
        let mut results = Vec::with_capacity(questions.len());

        for (i, question) in questions.iter().enumerate() {
            let correct = match answers.get(&i.to_string()) {
                None => false,
                Some(submitted) => Self::is_correct(question, submitted),
            };

            if correct {
                score += 1;
            }

            results.push(QuestionResult {
                question_id: i as i32,
                correct,
                correct_answer: question.correct_answer.clone(),
                explanation: question.explanation.clone(),
            });
        }

        (score, results)
    }

    /// Grade an individual answer based on the question type.
    fn is_correct(question: &Question, submitted: &AnswerValue) -> bool {
        match question.question_type {
            // Exact, case-sensitive match against the stored option
            QuestionType::MultipleChoice => submitted == &question.correct_answer,

            QuestionType::TrueFalse => match (submitted, &question.correct_answer) {
                // Text submissions are normalized: "True"/"true" match a
                // stored true, "False"/"false" a stored false.
                (AnswerValue::Text(text), AnswerValue::Bool(expected)) => {
                    let token = text.to_lowercase();
                    (token == "true" && *expected) || (token == "false" && !*expected)
                }
                (AnswerValue::Text(_), _) => false,
                _ => submitted == &question.correct_answer,
            },

            QuestionType::ShortAnswer => match (submitted, &question.correct_answer) {
                (AnswerValue::Text(a), AnswerValue::Text(b)) => {
                    a.to_lowercase() == b.to_lowercase()
                }
                _ => submitted == &question.correct_answer,
            },
        }
    }

    /// Score as a percentage of the question count. A quiz with no
    /// questions grades to 0, not a division error.
    pub fn percentage(score: i32, total_questions: i32) -> f64 {
        if total_questions == 0 {
            0.0
        } else {
            (score as f64 / total_questions as f64) * 100.0
        }
    }
}
