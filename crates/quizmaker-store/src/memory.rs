//! In-memory store for tests and short-lived sessions.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use quizmaker_core::error::StoreError;
use quizmaker_core::model::{Question, QuestionId, Test, TestId};
use quizmaker_core::report::QuizResult;
use quizmaker_core::traits::QuizStore;

use crate::data::StoreData;

/// A store that keeps everything in process memory.
///
/// Result persistence can be switched to fail, to exercise retry paths.
#[derive(Default)]
pub struct InMemoryStore {
    data: Mutex<StoreData>,
    /// When set, `persist_result` fails with `StoreError::Unavailable`.
    fail_results: AtomicBool,
    /// Number of `persist_result` calls, failed ones included.
    persist_calls: AtomicU32,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with `data`.
    pub fn with_data(data: StoreData) -> Self {
        Self {
            data: Mutex::new(data),
            ..Self::default()
        }
    }

    /// Make subsequent `persist_result` calls fail (or succeed again).
    pub fn set_fail_results(&self, fail: bool) {
        self.fail_results.store(fail, Ordering::Relaxed);
    }

    pub fn persist_calls(&self) -> u32 {
        self.persist_calls.load(Ordering::Relaxed)
    }

    /// A copy of everything currently stored.
    pub fn snapshot(&self) -> anyhow::Result<StoreData> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'_, StoreData>> {
        self.data
            .lock()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".into()).into())
    }
}

#[async_trait]
impl QuizStore for InMemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load_tests(&self) -> anyhow::Result<Vec<Test>> {
        Ok(self.lock()?.tests.clone())
    }

    async fn load_test(&self, test_id: &TestId) -> anyhow::Result<Test> {
        Ok(self.lock()?.test(test_id)?.clone())
    }

    async fn load_question_pool(&self, test_id: &TestId) -> anyhow::Result<Vec<Question>> {
        Ok(self.lock()?.question_pool(test_id)?)
    }

    async fn load_question(&self, question_id: &QuestionId) -> anyhow::Result<Question> {
        Ok(self.lock()?.question(question_id)?.clone())
    }

    async fn upsert_test(&self, test: &Test) -> anyhow::Result<()> {
        self.lock()?.upsert_test(test);
        Ok(())
    }

    async fn remove_test(&self, test_id: &TestId) -> anyhow::Result<()> {
        self.lock()?.remove_test(test_id)?;
        Ok(())
    }

    async fn upsert_question(&self, question: &Question) -> anyhow::Result<()> {
        Ok(self.lock()?.upsert_question(question)?)
    }

    async fn remove_question(&self, question_id: &QuestionId) -> anyhow::Result<()> {
        Ok(self.lock()?.remove_question(question_id)?)
    }

    async fn persist_result(&self, result: &QuizResult) -> anyhow::Result<()> {
        self.persist_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_results.load(Ordering::Relaxed) {
            return Err(StoreError::Unavailable("result persistence disabled".into()).into());
        }
        self.lock()?.push_result(result);
        Ok(())
    }

    async fn load_results(&self, test_id: &TestId) -> anyhow::Result<Vec<QuizResult>> {
        Ok(self.lock()?.results_for(test_id))
    }

    async fn load_result(&self, result_id: &Uuid) -> anyhow::Result<QuizResult> {
        Ok(self.lock()?.result(result_id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizmaker_core::report::package;

    fn test(id: &str) -> Test {
        Test {
            id: id.into(),
            name: "Geography".into(),
            description: String::new(),
            student_count: 3,
        }
    }

    #[tokio::test]
    async fn failure_injection_toggles() {
        let store = InMemoryStore::new();
        store.upsert_test(&test("t1")).await.unwrap();
        let result = package(None, &"t1".into(), 1.0, 1, vec![]);

        store.set_fail_results(true);
        let err = store.persist_result(&result).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::Unavailable(_))
        ));
        assert!(store.load_results(&"t1".into()).await.unwrap().is_empty());

        store.set_fail_results(false);
        store.persist_result(&result).await.unwrap();
        assert_eq!(store.persist_calls(), 2);
        assert_eq!(store.load_result(&result.id).await.unwrap(), result);
    }

    #[tokio::test]
    async fn not_found_is_downcastable() {
        let store = InMemoryStore::new();
        let err = store.load_test(&"missing".into()).await.unwrap_err();
        assert!(err.downcast_ref::<StoreError>().unwrap().is_not_found());
    }

    #[tokio::test]
    async fn with_data_prefills() {
        let mut data = StoreData::default();
        data.upsert_test(&test("t1"));
        let store = InMemoryStore::with_data(data.clone());
        assert_eq!(store.load_tests().await.unwrap().len(), 1);
        assert_eq!(store.snapshot().unwrap(), data);
    }
}
