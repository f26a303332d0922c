use std::collections::HashMap;

use uuid::Uuid;

use crate::api::identity::Identity;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::{AnswerReview, Question};
use crate::repositories;
use crate::repositories::submissions::CreateSubmission;
use crate::services::quiz_lifecycle::{QuizError, SYSTEM_OWNER};

/// Submissions from this sentinel identity are graded but never recorded.
pub(crate) const GUEST_USER: &str = "guest";

const NOT_ANSWERED: &str = "Not Answered";

/// Submitted answers keyed by question id. `None` marks a value the client
/// sent but that did not coerce to an option id; it never matches.
pub(crate) type AnswerMap = HashMap<String, Option<i32>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GradingOutcome {
    pub(crate) score: i32,
    pub(crate) total: i32,
    pub(crate) results: Vec<AnswerReview>,
}

/// Pure grading pass over the quiz's questions in stored order.
pub(crate) fn grade(questions: &[Question], answers: &AnswerMap) -> GradingOutcome {
    let mut score = 0;
    let mut results = Vec::with_capacity(questions.len());

    for question in questions {
        let submitted = answers.get(&question.id).copied().flatten();
        let is_correct = submitted == Some(question.correct_option_id);
        if is_correct {
            score += 1;
        }

        results.push(AnswerReview {
            question_text: question.text.clone(),
            user_answer_text: option_text_or_default(question, submitted),
            correct_answer_text: option_text_or_default(question, Some(question.correct_option_id)),
            is_correct,
        });
    }

    GradingOutcome { score, total: questions.len() as i32, results }
}

fn option_text_or_default(question: &Question, option_id: Option<i32>) -> String {
    question.option_text(option_id).unwrap_or(NOT_ANSWERED).to_string()
}

/// A submission is recorded only for an identified, non-guest user.
fn recorded_user(identity: &Identity) -> Option<&str> {
    identity.user_id().filter(|id| *id != GUEST_USER)
}

/// Grades a submission against the stored quiz and records it for identified
/// non-guest users. Guests may only submit to the sample quiz.
pub(crate) async fn submit(
    state: &AppState,
    quiz_id: &str,
    answers: Option<AnswerMap>,
    identity: &Identity,
) -> Result<GradingOutcome, QuizError> {
    let quiz = repositories::quizzes::find_by_id(state.db(), quiz_id)
        .await?
        .ok_or(QuizError::NotFound)?;

    let is_sample = quiz.owner_id == SYSTEM_OWNER;
    if identity.is_anonymous() && !is_sample {
        return Err(QuizError::Unauthorized("Authentication required to submit quiz"));
    }

    let answers = answers.unwrap_or_default();
    if answers.is_empty() {
        return Err(QuizError::Validation("Answers are required.".to_string()));
    }

    let outcome = grade(&quiz.questions.0, &answers);

    if let Some(user_id) = recorded_user(identity) {
        let submission_id = Uuid::new_v4().to_string();
        repositories::submissions::create(
            state.db(),
            CreateSubmission {
                id: &submission_id,
                quiz_id: &quiz.id,
                user_id,
                score: outcome.score,
                total: outcome.total,
                results: outcome.results.clone(),
                created_at: primitive_now_utc(),
            },
        )
        .await?;

        tracing::info!(
            quiz_id = %quiz.id,
            user_id = %user_id,
            score = outcome.score,
            total = outcome.total,
            "Submission recorded"
        );
    }

    Ok(outcome)
}
