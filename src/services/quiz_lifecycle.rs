use thiserror::Error;
use uuid::Uuid;

use crate::api::identity::Identity;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::{AnswerOption, Question, Quiz};
use crate::repositories;
use crate::repositories::quizzes::{CreateQuiz, HistoryRow};
use crate::services::question_gen::{GenerationError, QuizSpec};
use crate::services::sample_quiz;

/// Owner sentinel of the shared sample quiz.
pub(crate) const SYSTEM_OWNER: &str = "system";

/// Owner recorded for quizzes created without any caller identity.
pub(crate) const ANONYMOUS_OWNER: &str = "guest";

#[derive(Debug, Error)]
pub(crate) enum QuizError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("quiz not found")]
    NotFound,
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Persistence(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
pub(crate) struct CreateQuizInput {
    pub(crate) topic: Option<String>,
    pub(crate) count: Option<i64>,
    pub(crate) difficulty: Option<String>,
    pub(crate) audience: Option<String>,
}

/// Generates and persists a new quiz. Input preconditions are checked before
/// the generator is invoked.
pub(crate) async fn create_quiz(
    state: &AppState,
    input: CreateQuizInput,
    identity: &Identity,
) -> Result<Quiz, QuizError> {
    let topic = input.topic.as_deref().map(str::trim).unwrap_or("");
    let count = input.count.unwrap_or(0);
    if topic.is_empty() || count <= 0 {
        return Err(QuizError::Validation("Topic and count are required.".to_string()));
    }

    let spec = QuizSpec {
        topic: topic.to_string(),
        count: count as u32,
        difficulty: input.difficulty,
        audience: input.audience,
    };
    let generated = state.generator().generate(&spec).await?;

    let questions: Vec<Question> = generated
        .into_iter()
        .map(|question| Question {
            id: Uuid::new_v4().to_string(),
            text: question.text,
            options: question
                .options
                .into_iter()
                .map(|option| AnswerOption { id: option.id, text: option.text })
                .collect(),
            correct_option_id: question.correct_option_id,
        })
        .collect();

    let quiz_id = Uuid::new_v4().to_string();
    let quiz = repositories::quizzes::create(
        state.db(),
        CreateQuiz {
            id: &quiz_id,
            topic,
            owner_id: identity.user_id().unwrap_or(ANONYMOUS_OWNER),
            questions,
            created_at: primitive_now_utc(),
        },
    )
    .await?;

    tracing::info!(
        quiz_id = %quiz.id,
        topic = %quiz.topic,
        owner_id = %quiz.owner_id,
        question_count = quiz.questions.0.len(),
        "Quiz created"
    );

    Ok(quiz)
}

pub(crate) async fn get_quiz(state: &AppState, quiz_id: &str) -> Result<Quiz, QuizError> {
    repositories::quizzes::find_by_id(state.db(), quiz_id).await?.ok_or(QuizError::NotFound)
}

/// Idempotent get-or-create of the sample quiz. The insert races through the
/// partial unique index, so concurrent first requests converge on one row.
pub(crate) async fn get_or_create_sample_quiz(state: &AppState) -> Result<Quiz, QuizError> {
    if let Some(existing) = repositories::quizzes::find_by_owner_topic(
        state.db(),
        SYSTEM_OWNER,
        sample_quiz::SAMPLE_TOPIC,
    )
    .await?
    {
        return Ok(existing);
    }

    let quiz_id = Uuid::new_v4().to_string();
    let inserted = repositories::quizzes::create_system_if_absent(
        state.db(),
        CreateQuiz {
            id: &quiz_id,
            topic: sample_quiz::SAMPLE_TOPIC,
            owner_id: SYSTEM_OWNER,
            questions: sample_quiz::sample_questions(),
            created_at: primitive_now_utc(),
        },
    )
    .await?;

    match inserted {
        Some(quiz) => {
            tracing::info!(quiz_id = %quiz.id, "Sample quiz created");
            Ok(quiz)
        }
        // Lost the insert race; the winning row is already committed.
        None => repositories::quizzes::find_by_owner_topic(
            state.db(),
            SYSTEM_OWNER,
            sample_quiz::SAMPLE_TOPIC,
        )
        .await?
        .ok_or(QuizError::NotFound),
    }
}

pub(crate) async fn list_history(
    state: &AppState,
    identity: &Identity,
) -> Result<Vec<HistoryRow>, QuizError> {
    let Some(user_id) = identity.user_id() else {
        return Err(QuizError::Unauthorized("User not authenticated."));
    };

    Ok(repositories::quizzes::list_history_by_owner(state.db(), user_id).await?)
}
