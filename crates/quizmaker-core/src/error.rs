//! Error types for the quiz engine and its persistence contract.
//!
//! `StoreError` lives here rather than in `quizmaker-store` so that callers of
//! the [`QuizStore`](crate::traits::QuizStore) trait can downcast and classify
//! failures without depending on a concrete store.

use thiserror::Error;

use crate::model::{QuestionId, TestId};
use crate::report::QuizResult;

/// Errors raised by test assembly and answer capture.
#[derive(Debug, Error)]
pub enum QuizError {
    /// The test has no questions, so there is nothing to run.
    #[error("test '{test_id}' has no questions")]
    EmptyPool { test_id: TestId },

    /// An attempt must ask for at least one question.
    #[error("question count must be at least 1")]
    InvalidQuestionCount,

    /// A position outside the assembled test was addressed.
    #[error("position {position} out of range (test has {len} questions)")]
    PositionOutOfRange { position: usize, len: usize },
}

/// Errors that can occur when talking to a store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("test not found: {0}")]
    TestNotFound(TestId),

    #[error("question not found: {0}")]
    QuestionNotFound(QuestionId),

    #[error("result not found: {0}")]
    ResultNotFound(String),

    /// The question refers to a test that does not exist.
    #[error("question '{question_id}' refers to unknown test '{test_id}'")]
    OrphanQuestion {
        question_id: QuestionId,
        test_id: TestId,
    },

    /// The question ID is already used by a question of another test.
    #[error("question '{question_id}' already belongs to test '{owner}', not '{test_id}'")]
    QuestionOwnedElsewhere {
        question_id: QuestionId,
        owner: TestId,
        test_id: TestId,
    },

    /// The backing storage could not be read or written.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Returns `true` for lookups of records that do not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::TestNotFound(_)
                | StoreError::QuestionNotFound(_)
                | StoreError::ResultNotFound(_)
        )
    }
}

/// Submitting an attempt failed after scoring.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Scoring succeeded but the store rejected the result. The packaged
    /// result is kept so the caller can show it and retry.
    #[error("test was scored ({}/{}) but saving the result failed: {source}", .result.score, .result.total)]
    Persist {
        result: Box<QuizResult>,
        #[source]
        source: anyhow::Error,
    },
}

impl SubmitError {
    /// The scored result that could not be saved.
    pub fn result(&self) -> &QuizResult {
        match self {
            SubmitError::Persist { result, .. } => result,
        }
    }
}
