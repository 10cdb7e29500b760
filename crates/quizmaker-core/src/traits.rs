//! Core trait definitions for persistence.
//!
//! The engine never reaches into global state: whoever starts an attempt or
//! submits one passes a `QuizStore` explicitly. Implementations live in the
//! `quizmaker-store` crate.

use async_trait::async_trait;
use uuid::Uuid;

use crate::model::{Question, QuestionId, Test, TestId};
use crate::report::QuizResult;

/// Trait for backends that keep tests, questions, and results.
///
/// Errors for missing records should be [`StoreError`](crate::error::StoreError)
/// values so callers can classify them with `downcast_ref`.
#[async_trait]
pub trait QuizStore: Send + Sync {
    /// Human-readable backend name (e.g. "json").
    fn name(&self) -> &str;

    /// All tests, in creation order.
    async fn load_tests(&self) -> anyhow::Result<Vec<Test>>;

    async fn load_test(&self, test_id: &TestId) -> anyhow::Result<Test>;

    /// Questions of a test, in authoring order.
    async fn load_question_pool(&self, test_id: &TestId) -> anyhow::Result<Vec<Question>>;

    /// A single question, whichever test owns it.
    async fn load_question(&self, question_id: &QuestionId) -> anyhow::Result<Question>;

    /// Insert or replace a test.
    async fn upsert_test(&self, test: &Test) -> anyhow::Result<()>;

    /// Remove a test together with its questions.
    async fn remove_test(&self, test_id: &TestId) -> anyhow::Result<()>;

    /// Insert or replace a question, options included. A question ID owned by
    /// another test is rejected with `StoreError::QuestionOwnedElsewhere`.
    async fn upsert_question(&self, question: &Question) -> anyhow::Result<()>;

    async fn remove_question(&self, question_id: &QuestionId) -> anyhow::Result<()>;

    /// Record a submitted attempt. Either the whole result is stored or none
    /// of it.
    async fn persist_result(&self, result: &QuizResult) -> anyhow::Result<()>;

    /// Results recorded for a test, oldest first.
    async fn load_results(&self, test_id: &TestId) -> anyhow::Result<Vec<QuizResult>>;

    async fn load_result(&self, result_id: &Uuid) -> anyhow::Result<QuizResult>;
}
