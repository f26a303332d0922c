use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::errors::ApiError;
use crate::api::identity::{Caller, Identity};
use crate::core::state::AppState;
use crate::core::time::format_primitive;
use crate::schemas::quiz::HistoryEntry;
use crate::services::quiz_lifecycle;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/history", get(quiz_history))
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct HistoryParams {
    #[serde(default, alias = "userId")]
    user_id: Option<String>,
}

/// Lists the caller's quizzes, newest first. The user id is taken from the
/// bearer token, then the optional body, then the query string.
async fn quiz_history(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Query(query): Query<HistoryParams>,
    body: Option<Json<HistoryParams>>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    let body_user_id = body.as_ref().and_then(|Json(params)| params.user_id.as_deref());
    let identity = Identity::resolve(caller, body_user_id.or(query.user_id.as_deref()));

    let rows = quiz_lifecycle::list_history(&state, &identity).await?;

    let history = rows
        .into_iter()
        .map(|row| HistoryEntry {
            quiz_id: row.id,
            topic: row.topic,
            question_count: row.question_count,
            created_at: format_primitive(row.created_at),
        })
        .collect();

    Ok(Json(history))
}
