use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::{
    constants::prompts::QUESTION_GENERATOR_PROMPT,
    errors::{AppError, AppResult},
    models::domain::question::{Question, QuestionType},
};

/// The external question-generation collaborator. Implementations take
/// the material text and the requested shape and return Question records,
/// which the caller trusts as-is.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate_questions(
        &self,
        content: &str,
        num_questions: u32,
        question_types: &[QuestionType],
    ) -> AppResult<Vec<Question>>;
}

pub struct OpenAiQuestionGenerator {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiQuestionGenerator {
    pub fn new(api_key: &SecretString, model: String) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key.expose_secret());
        Self {
            client: Client::with_config(config),
            model,
        }
    }

    fn type_label(question_type: &QuestionType) -> &'static str {
        match question_type {
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::TrueFalse => "true_false",
            QuestionType::ShortAnswer => "short_answer",
        }
    }
}

/// Models wrap JSON in markdown fences often enough that stripping them
/// here is cheaper than failing the request.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let inner = inner.strip_prefix("json").unwrap_or(inner);
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    inner.trim()
}

#[async_trait]
impl QuestionGenerator for OpenAiQuestionGenerator {
    async fn generate_questions(
        &self,
        content: &str,
        num_questions: u32,
        question_types: &[QuestionType],
    ) -> AppResult<Vec<Question>> {
        let allowed_types = question_types
            .iter()
            .map(Self::type_label)
            .collect::<Vec<_>>()
            .join(", ");

        let user_prompt = format!(
            "Generate {} questions. Allowed question types: {}.\n\nStudy material:\n{}",
            num_questions, allowed_types, content
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(QUESTION_GENERATOR_PROMPT)
                    .build()
                    .map_err(|e| AppError::InternalError(e.to_string()))?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user_prompt)
                    .build()
                    .map_err(|e| AppError::InternalError(e.to_string()))?
                    .into(),
            ])
            .build()
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            AppError::InternalError(format!("Question generation request failed: {}", e))
        })?;

        let completion = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| {
                AppError::InternalError("Question generator returned no content".to_string())
            })?;

        let questions: Vec<Question> = serde_json::from_str(strip_code_fences(&completion))
            .map_err(|e| {
                log::error!("Unparseable generator output: {}", completion);
                AppError::InternalError(format!("Question generator returned invalid JSON: {}", e))
            })?;

        Ok(questions)
    }
}
