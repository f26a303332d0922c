use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::identity::{Caller, Identity};
use crate::core::state::AppState;
use crate::core::time::format_primitive;
use crate::schemas::quiz::{redact_questions, QuizCreate, QuizCreatedResponse, QuizResponse};
use crate::schemas::submission::{SubmitRequest, SubmitResponse};
use crate::services::quiz_lifecycle::{self, CreateQuizInput};
use crate::services::grading;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_quiz))
        .route("/sample", get(sample_quiz))
        .route("/:quiz_id", get(get_quiz))
        .route("/:quiz_id/submit", post(submit_quiz))
}

async fn create_quiz(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Json(payload): Json<QuizCreate>,
) -> Result<(StatusCode, Json<QuizCreatedResponse>), ApiError> {
    let identity = Identity::resolve(caller, payload.user_id.as_deref());
    if identity.is_anonymous() {
        tracing::warn!("Quiz creation requested without a caller identity");
    }

    if payload.topic.is_none() || payload.count.is_none() {
        return Err(ApiError::BadRequest("Topic and count are required.".to_string()));
    }
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let quiz = quiz_lifecycle::create_quiz(
        &state,
        CreateQuizInput {
            topic: payload.topic,
            count: payload.count,
            difficulty: payload.difficulty,
            audience: payload.audience,
        },
        &identity,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(QuizCreatedResponse {
            quiz_id: quiz.id,
            questions: redact_questions(&quiz.questions.0),
        }),
    ))
}

async fn get_quiz(
    Path(quiz_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<QuizResponse>, ApiError> {
    let quiz = quiz_lifecycle::get_quiz(&state, &quiz_id).await?;

    Ok(Json(QuizResponse {
        quiz_id: quiz.id,
        topic: quiz.topic,
        questions: redact_questions(&quiz.questions.0),
        is_sample: None,
        created_at: format_primitive(quiz.created_at),
    }))
}

async fn sample_quiz(State(state): State<AppState>) -> Result<Json<QuizResponse>, ApiError> {
    let quiz = quiz_lifecycle::get_or_create_sample_quiz(&state).await?;

    Ok(Json(QuizResponse {
        quiz_id: quiz.id,
        topic: quiz.topic,
        questions: redact_questions(&quiz.questions.0),
        is_sample: Some(true),
        created_at: format_primitive(quiz.created_at),
    }))
}

async fn submit_quiz(
    Path(quiz_id): Path<String>,
    Caller(caller): Caller,
    State(state): State<AppState>,
    Json(payload): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let identity = Identity::resolve(caller, payload.user_id.as_deref());

    let outcome = grading::submit(&state, &quiz_id, payload.answers, &identity).await?;

    Ok(Json(SubmitResponse {
        message: "Quiz submitted successfully!",
        score: outcome.score,
        total: outcome.total,
        results: outcome.results,
    }))
}
