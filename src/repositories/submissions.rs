use sqlx::types::Json;
use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::{AnswerReview, Submission};

const COLUMNS: &str = "id, quiz_id, user_id, score, total, results, created_at";

pub(crate) struct CreateSubmission<'a> {
    pub(crate) id: &'a str,
    pub(crate) quiz_id: &'a str,
    pub(crate) user_id: &'a str,
    pub(crate) score: i32,
    pub(crate) total: i32,
    pub(crate) results: Vec<AnswerReview>,
    pub(crate) created_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateSubmission<'_>,
) -> Result<Submission, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "INSERT INTO submissions (id, quiz_id, user_id, score, total, results, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.quiz_id)
    .bind(params.user_id)
    .bind(params.score)
    .bind(params.total)
    .bind(Json(params.results))
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}
