use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::db::models::AnswerReview;
use crate::services::grading::AnswerMap;

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitRequest {
    #[serde(default, deserialize_with = "deserialize_answers")]
    pub(crate) answers: Option<AnswerMap>,
    #[serde(default, alias = "userId")]
    pub(crate) user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmitResponse {
    pub(crate) message: &'static str,
    pub(crate) score: i32,
    pub(crate) total: i32,
    pub(crate) results: Vec<AnswerReview>,
}

// Clients send option ids as JSON numbers or numeric strings. Values that do
// not coerce stay in the map as unanswered entries.
fn deserialize_answers<'de, D>(deserializer: D) -> Result<Option<AnswerMap>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<HashMap<String, Value>>::deserialize(deserializer)?;
    Ok(raw.map(|entries| {
        entries
            .into_iter()
            .map(|(question_id, value)| (question_id, coerce_option_id(&value)))
            .collect()
    }))
}

fn coerce_option_id(value: &Value) -> Option<i32> {
    match value {
        Value::Number(number) => number.as_i64().and_then(|id| i32::try_from(id).ok()),
        Value::String(raw) => raw.trim().parse::<i32>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_accept_numbers_and_numeric_strings() {
        let request: SubmitRequest = serde_json::from_str(
            "{\"answers\":{\"q1\":2,\"q2\":\"3\",\"q3\":\"nope\"},\"userId\":\"u-1\"}",
        )
        .expect("deserialize");

        let answers = request.answers.expect("answers");
        assert_eq!(answers.get("q1"), Some(&Some(2)));
        assert_eq!(answers.get("q2"), Some(&Some(3)));
        assert_eq!(answers.get("q3"), Some(&None));
        assert_eq!(request.user_id.as_deref(), Some("u-1"));
    }

    #[test]
    fn missing_answers_deserialize_to_none() {
        let request: SubmitRequest = serde_json::from_str("{}").expect("deserialize");
        assert!(request.answers.is_none());
        assert!(request.user_id.is_none());
    }

    #[test]
    fn snake_case_user_id_is_also_accepted() {
        let request: SubmitRequest =
            serde_json::from_str("{\"answers\":{\"q1\":1},\"user_id\":\"u-2\"}")
                .expect("deserialize");
        assert_eq!(request.user_id.as_deref(), Some("u-2"));
    }
}
