use std::collections::HashSet;
use std::time::Duration;

use anyhow::Context;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::core::config::Settings;

const GENERATION_SYSTEM_PROMPT: &str = r#"You are a quiz author. You will receive a JSON object describing a multiple-choice quiz to generate.

Your output must be a single, raw JSON object. Do not include any surrounding text, explanations, or markdown formatting.

The JSON object must strictly adhere to the following structure:
{
  "questions": [
    {
      "text": "The full text of the question.",
      "options": [
        { "id": 1, "text": "Text for the first option." },
        { "id": 2, "text": "Text for the second option." },
        { "id": 3, "text": "Text for the third option." },
        { "id": 4, "text": "Text for the fourth option." }
      ],
      "correct_option_id": 3
    }
  ]
}

Ensure the 'correct_option_id' for each question correctly corresponds to the 'id' of one of its options."#;

/// Parameters forwarded verbatim to the generation service.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct QuizSpec {
    pub(crate) topic: String,
    pub(crate) count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) difficulty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) audience: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeneratedSet {
    questions: Vec<GeneratedQuestion>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GeneratedQuestion {
    pub(crate) text: String,
    pub(crate) options: Vec<GeneratedOption>,
    #[serde(alias = "correctOptionId")]
    pub(crate) correct_option_id: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GeneratedOption {
    pub(crate) id: i32,
    pub(crate) text: String,
}

#[derive(Debug, Error)]
pub(crate) enum GenerationError {
    #[error("question generation request failed: {0}")]
    Upstream(String),
    #[error("question generation service returned no content")]
    MissingContent,
    #[error("failed to parse generated questions: {0}")]
    Parse(String),
    #[error("generated questions failed validation: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone)]
pub(crate) struct QuestionGenerator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl QuestionGenerator {
    pub(crate) fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(settings.ai().ai_request_timeout);
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key: settings.ai().openai_api_key.clone(),
            base_url: settings.ai().openai_base_url.trim_end_matches('/').to_string(),
            model: settings.ai().ai_model.clone(),
            max_tokens: settings.ai().ai_max_tokens,
            temperature: settings.ai().ai_temperature,
        })
    }

    pub(crate) async fn generate(
        &self,
        spec: &QuizSpec,
    ) -> Result<Vec<GeneratedQuestion>, GenerationError> {
        let spec_json =
            serde_json::to_string(spec).map_err(|err| GenerationError::Parse(err.to_string()))?;
        let user_prompt = format!(
            "Generate a multiple-choice quiz based on the specifications in the following JSON object:\n{spec_json}"
        );

        let payload = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": GENERATION_SYSTEM_PROMPT},
                {"role": "user", "content": user_prompt}
            ],
            "max_completion_tokens": self.max_tokens,
            "temperature": self.temperature,
            "response_format": {"type": "json_object"}
        });

        tracing::info!(topic = %spec.topic, count = spec.count, "Sending question generation request");

        let url = format!("{}/chat/completions", self.base_url);

        // A failed generation is terminal for the request; no retry loop.
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    GenerationError::Upstream("question generation timed out".to_string())
                } else {
                    GenerationError::Upstream(err.to_string())
                }
            })?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        if !status.is_success() {
            tracing::error!(status = %status, body = %body, "Question generation API error");
            return Err(GenerationError::Upstream(format!(
                "generation service returned {status}"
            )));
        }

        let content = body
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|value| value.as_str())
            .ok_or(GenerationError::MissingContent)?;

        parse_question_payload(content)
    }
}

/// Parses the model's text output into a validated question set. The raw
/// payload is preserved in server-side logs only.
pub(crate) fn parse_question_payload(
    raw: &str,
) -> Result<Vec<GeneratedQuestion>, GenerationError> {
    let cleaned = strip_code_fences(raw);

    let set: GeneratedSet = serde_json::from_str(cleaned).map_err(|err| {
        tracing::error!(error = %err, raw = %raw, "Failed to parse generated question payload");
        GenerationError::Parse(err.to_string())
    })?;

    validate_questions(&set.questions).map_err(GenerationError::Invalid)?;
    Ok(set.questions)
}

fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

fn validate_questions(questions: &[GeneratedQuestion]) -> Result<(), String> {
    if questions.is_empty() {
        return Err("questions array is empty".to_string());
    }

    for (index, question) in questions.iter().enumerate() {
        if question.text.trim().is_empty() {
            return Err(format!("question {index} has empty text"));
        }
        if question.options.len() < 2 {
            return Err(format!("question {index} has fewer than two options"));
        }

        let mut seen = HashSet::new();
        for option in &question.options {
            if option.id <= 0 {
                return Err(format!("question {index} has non-positive option id {}", option.id));
            }
            if !seen.insert(option.id) {
                return Err(format!("question {index} has duplicate option id {}", option.id));
            }
        }

        if !seen.contains(&question.correct_option_id) {
            return Err(format!(
                "question {index} correct_option_id {} does not match any option",
                question.correct_option_id
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_PAYLOAD: &str = r#"{
        "questions": [
            {
                "text": "What covers most of the Earth?",
                "options": [
                    {"id": 1, "text": "Land"},
                    {"id": 2, "text": "Ocean"}
                ],
                "correct_option_id": 2
            }
        ]
    }"#;

    #[test]
    fn strips_json_code_fences() {
        let fenced = format!("```json\n{VALID_PAYLOAD}\n```");
        assert_eq!(strip_code_fences(&fenced), VALID_PAYLOAD.trim());
    }

    #[test]
    fn strips_bare_code_fences() {
        let fenced = format!("```\n{VALID_PAYLOAD}\n```");
        assert_eq!(strip_code_fences(&fenced), VALID_PAYLOAD.trim());
    }

    #[test]
    fn leaves_unfenced_payloads_alone() {
        assert_eq!(strip_code_fences(VALID_PAYLOAD), VALID_PAYLOAD.trim());
    }

    #[test]
    fn parses_fenced_payload() {
        let fenced = format!("```json\n{VALID_PAYLOAD}\n```");
        let questions = parse_question_payload(&fenced).expect("questions");
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_option_id, 2);
        assert_eq!(questions[0].options.len(), 2);
    }

    #[test]
    fn rejects_payload_without_questions_field() {
        let err = parse_question_payload("{\"items\": []}").expect_err("parse error");
        assert!(matches!(err, GenerationError::Parse(_)));
    }

    #[test]
    fn rejects_payload_that_is_not_json() {
        let err = parse_question_payload("Sorry, I cannot help with that.").expect_err("parse");
        assert!(matches!(err, GenerationError::Parse(_)));
    }

    #[test]
    fn rejects_empty_question_set() {
        let err = parse_question_payload("{\"questions\": []}").expect_err("invalid");
        assert!(matches!(err, GenerationError::Invalid(_)));
    }

    #[test]
    fn rejects_question_with_single_option() {
        let payload = r#"{"questions": [{"text": "Q", "options": [{"id": 1, "text": "A"}], "correct_option_id": 1}]}"#;
        let err = parse_question_payload(payload).expect_err("invalid");
        assert!(matches!(err, GenerationError::Invalid(_)));
    }

    #[test]
    fn rejects_question_with_duplicate_option_ids() {
        let payload = r#"{"questions": [{"text": "Q", "options": [{"id": 1, "text": "A"}, {"id": 1, "text": "B"}], "correct_option_id": 1}]}"#;
        let err = parse_question_payload(payload).expect_err("invalid");
        assert!(matches!(err, GenerationError::Invalid(_)));
    }

    #[test]
    fn rejects_dangling_correct_option_id() {
        let payload = r#"{"questions": [{"text": "Q", "options": [{"id": 1, "text": "A"}, {"id": 2, "text": "B"}], "correct_option_id": 9}]}"#;
        let err = parse_question_payload(payload).expect_err("invalid");
        assert!(matches!(err, GenerationError::Invalid(_)));
    }

    #[test]
    fn quiz_spec_serializes_without_absent_fields() {
        let spec = QuizSpec {
            topic: "Oceans".to_string(),
            count: 3,
            difficulty: None,
            audience: None,
        };
        let json = serde_json::to_string(&spec).expect("spec json");
        assert_eq!(json, "{\"topic\":\"Oceans\",\"count\":3}");
    }
}
