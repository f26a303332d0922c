use sqlx::types::Json;
use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::{Question, Quiz};

const COLUMNS: &str = "id, topic, owner_id, questions, created_at";

pub(crate) struct CreateQuiz<'a> {
    pub(crate) id: &'a str,
    pub(crate) topic: &'a str,
    pub(crate) owner_id: &'a str,
    pub(crate) questions: Vec<Question>,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct HistoryRow {
    pub(crate) id: String,
    pub(crate) topic: String,
    pub(crate) question_count: i64,
    pub(crate) created_at: PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateQuiz<'_>) -> Result<Quiz, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!(
        "INSERT INTO quizzes (id, topic, owner_id, questions, created_at)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.topic)
    .bind(params.owner_id)
    .bind(Json(params.questions))
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

/// Insert that loses gracefully: relies on the partial unique index over
/// `(owner_id, topic) WHERE owner_id = 'system'`, so concurrent first
/// requests for the sample quiz converge on a single row.
pub(crate) async fn create_system_if_absent(
    pool: &PgPool,
    params: CreateQuiz<'_>,
) -> Result<Option<Quiz>, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!(
        "INSERT INTO quizzes (id, topic, owner_id, questions, created_at)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (owner_id, topic) WHERE owner_id = 'system' DO NOTHING
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.topic)
    .bind(params.owner_id)
    .bind(Json(params.questions))
    .bind(params.created_at)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Quiz>, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!("SELECT {COLUMNS} FROM quizzes WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_owner_topic(
    pool: &PgPool,
    owner_id: &str,
    topic: &str,
) -> Result<Option<Quiz>, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!(
        "SELECT {COLUMNS} FROM quizzes WHERE owner_id = $1 AND topic = $2"
    ))
    .bind(owner_id)
    .bind(topic)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_history_by_owner(
    pool: &PgPool,
    owner_id: &str,
) -> Result<Vec<HistoryRow>, sqlx::Error> {
    sqlx::query_as::<_, HistoryRow>(
        "SELECT id, topic, jsonb_array_length(questions)::BIGINT AS question_count, created_at
         FROM quizzes
         WHERE owner_id = $1
         ORDER BY created_at DESC",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await
}
