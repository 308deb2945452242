use serde::{Deserialize, Serialize};

/// A single quiz question. Questions are embedded in their quiz document
/// and never change once the quiz has been created.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub correct_answer: AnswerValue,
    pub explanation: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
}

/// An answer value as submitted by a client or stored on a question.
/// Multiple-choice and short-answer questions carry text, true/false
/// questions carry a boolean. The untagged representation keeps the
/// wire format identical to the raw JSON the frontend sends.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Text(String),
}

impl AnswerValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AnswerValue::Bool(b) => Some(*b),
            AnswerValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Bool(_) => None,
            AnswerValue::Text(s) => Some(s.as_str()),
        }
    }
}
