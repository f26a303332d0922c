use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::models::Question;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuizCreate {
    #[serde(default)]
    #[validate(length(min = 1, message = "topic must not be empty"))]
    pub(crate) topic: Option<String>,
    #[serde(default)]
    #[validate(range(min = 1, message = "count must be positive"))]
    pub(crate) count: Option<i64>,
    #[serde(default)]
    pub(crate) difficulty: Option<String>,
    #[serde(default)]
    pub(crate) audience: Option<String>,
    #[serde(default, alias = "userId")]
    pub(crate) user_id: Option<String>,
}

/// Client-facing question shape. Deliberately has no field for the correct
/// option, so serialization cannot leak answers.
#[derive(Debug, Serialize)]
pub(crate) struct RedactedQuestion {
    pub(crate) id: String,
    pub(crate) text: String,
    pub(crate) options: Vec<RedactedOption>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RedactedOption {
    pub(crate) id: i32,
    pub(crate) text: String,
}

impl From<&Question> for RedactedQuestion {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id.clone(),
            text: question.text.clone(),
            options: question
                .options
                .iter()
                .map(|option| RedactedOption { id: option.id, text: option.text.clone() })
                .collect(),
        }
    }
}

pub(crate) fn redact_questions(questions: &[Question]) -> Vec<RedactedQuestion> {
    questions.iter().map(RedactedQuestion::from).collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuizCreatedResponse {
    pub(crate) quiz_id: String,
    pub(crate) questions: Vec<RedactedQuestion>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuizResponse {
    pub(crate) quiz_id: String,
    pub(crate) topic: String,
    pub(crate) questions: Vec<RedactedQuestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) is_sample: Option<bool>,
    pub(crate) created_at: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HistoryEntry {
    pub(crate) quiz_id: String,
    pub(crate) topic: String,
    pub(crate) question_count: i64,
    pub(crate) created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::AnswerOption;

    fn question() -> Question {
        Question {
            id: "q-1".to_string(),
            text: "What covers most of the Earth?".to_string(),
            options: vec![
                AnswerOption { id: 1, text: "Land".to_string() },
                AnswerOption { id: 2, text: "Ocean".to_string() },
            ],
            correct_option_id: 2,
        }
    }

    #[test]
    fn redacted_questions_never_serialize_the_answer() {
        let response = QuizResponse {
            quiz_id: "quiz-1".to_string(),
            topic: "Oceans".to_string(),
            questions: redact_questions(&[question()]),
            is_sample: None,
            created_at: "2025-01-02T10:20:30Z".to_string(),
        };

        let json = serde_json::to_string(&response).expect("serialize");
        assert!(!json.contains("correct"));
        assert!(json.contains("\"quizId\":\"quiz-1\""));
        assert!(json.contains("\"options\""));
        assert!(!json.contains("isSample"));
    }

    #[test]
    fn created_response_never_serializes_the_answer() {
        let response = QuizCreatedResponse {
            quiz_id: "quiz-1".to_string(),
            questions: redact_questions(&[question()]),
        };

        let json = serde_json::to_string(&response).expect("serialize");
        assert!(!json.contains("correct"));
    }

    #[test]
    fn sample_flag_serializes_when_present() {
        let response = QuizResponse {
            quiz_id: "quiz-1".to_string(),
            topic: "Oceans".to_string(),
            questions: Vec::new(),
            is_sample: Some(true),
            created_at: "2025-01-02T10:20:30Z".to_string(),
        };

        let json = serde_json::to_string(&response).expect("serialize");
        assert!(json.contains("\"isSample\":true"));
    }

    #[test]
    fn quiz_create_accepts_camel_case_user_id() {
        let payload: QuizCreate =
            serde_json::from_str("{\"topic\":\"Oceans\",\"count\":3,\"userId\":\"u-1\"}")
                .expect("deserialize");
        assert_eq!(payload.user_id.as_deref(), Some("u-1"));
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn quiz_create_validation_rejects_empty_topic_and_zero_count() {
        let payload: QuizCreate =
            serde_json::from_str("{\"topic\":\"\",\"count\":0}").expect("deserialize");
        assert!(payload.validate().is_err());
    }
}
