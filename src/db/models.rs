use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::PrimitiveDateTime;

/// One selectable answer within a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct AnswerOption {
    pub(crate) id: i32,
    pub(crate) text: String,
}

/// A multiple-choice question embedded in a quiz document. The correct
/// option id never leaves the server except through grading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Question {
    pub(crate) id: String,
    pub(crate) text: String,
    pub(crate) options: Vec<AnswerOption>,
    pub(crate) correct_option_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Quiz {
    pub(crate) id: String,
    pub(crate) topic: String,
    pub(crate) owner_id: String,
    pub(crate) questions: Json<Vec<Question>>,
    pub(crate) created_at: PrimitiveDateTime,
}

/// Human-readable grading row, denormalized at submission time. Stored and
/// served with the same wire names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnswerReview {
    pub(crate) question_text: String,
    pub(crate) user_answer_text: String,
    pub(crate) correct_answer_text: String,
    pub(crate) is_correct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Submission {
    pub(crate) id: String,
    pub(crate) quiz_id: String,
    pub(crate) user_id: String,
    pub(crate) score: i32,
    pub(crate) total: i32,
    pub(crate) results: Json<Vec<AnswerReview>>,
    pub(crate) created_at: PrimitiveDateTime,
}

impl Question {
    pub(crate) fn option_text(&self, option_id: Option<i32>) -> Option<&str> {
        let option_id = option_id?;
        self.options.iter().find(|option| option.id == option_id).map(|option| option.text.as_str())
    }
}
