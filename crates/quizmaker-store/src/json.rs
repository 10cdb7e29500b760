//! Single-file JSON store.
//!
//! The whole record set lives in one JSON document. Every mutation writes a
//! complete new document to a sibling temp file and renames it over the
//! original, so a crash leaves either the old or the new state on disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use quizmaker_core::error::StoreError;
use quizmaker_core::model::{Question, QuestionId, Test, TestId};
use quizmaker_core::report::QuizResult;
use quizmaker_core::traits::QuizStore;

use crate::data::StoreData;

pub struct JsonFileStore {
    path: PathBuf,
    data: Mutex<StoreData>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store; it is
    /// created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read store: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("failed to parse store: {}", path.display()))?
        } else {
            tracing::debug!("store file {} does not exist yet", path.display());
            StoreData::default()
        };

        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `edit` to a copy of the data, write it out, then swap it in.
    /// Nothing changes in memory if the write fails.
    async fn mutate<T>(
        &self,
        edit: impl FnOnce(&mut StoreData) -> Result<T, StoreError>,
    ) -> Result<T> {
        let mut guard = self.data.lock().await;
        let mut next = guard.clone();
        let out = edit(&mut next)?;
        self.write(&next).await?;
        *guard = next;
        Ok(out)
    }

    async fn write(&self, data: &StoreData) -> Result<()> {
        let json = serde_json::to_vec_pretty(data).context("failed to serialize store")?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| unavailable("create directory", parent, e))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| unavailable("write", &tmp, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| unavailable("replace", &self.path, e))?;
        Ok(())
    }
}

fn unavailable(action: &str, path: &Path, e: std::io::Error) -> StoreError {
    StoreError::Unavailable(format!("failed to {action} {}: {e}", path.display()))
}

#[async_trait]
impl QuizStore for JsonFileStore {
    fn name(&self) -> &str {
        "json"
    }

    async fn load_tests(&self) -> Result<Vec<Test>> {
        Ok(self.data.lock().await.tests.clone())
    }

    async fn load_test(&self, test_id: &TestId) -> Result<Test> {
        Ok(self.data.lock().await.test(test_id)?.clone())
    }

    async fn load_question_pool(&self, test_id: &TestId) -> Result<Vec<Question>> {
        Ok(self.data.lock().await.question_pool(test_id)?)
    }

    async fn load_question(&self, question_id: &QuestionId) -> Result<Question> {
        Ok(self.data.lock().await.question(question_id)?.clone())
    }

    async fn upsert_test(&self, test: &Test) -> Result<()> {
        self.mutate(|data| {
            data.upsert_test(test);
            Ok(())
        })
        .await
    }

    async fn remove_test(&self, test_id: &TestId) -> Result<()> {
        let removed = self.mutate(|data| data.remove_test(test_id)).await?;
        tracing::info!("removed test {test_id} and {removed} questions");
        Ok(())
    }

    async fn upsert_question(&self, question: &Question) -> Result<()> {
        self.mutate(|data| data.upsert_question(question)).await
    }

    async fn remove_question(&self, question_id: &QuestionId) -> Result<()> {
        self.mutate(|data| data.remove_question(question_id)).await
    }

    async fn persist_result(&self, result: &QuizResult) -> Result<()> {
        self.mutate(|data| {
            data.push_result(result);
            Ok(())
        })
        .await
    }

    async fn load_results(&self, test_id: &TestId) -> Result<Vec<QuizResult>> {
        Ok(self.data.lock().await.results_for(test_id))
    }

    async fn load_result(&self, result_id: &Uuid) -> Result<QuizResult> {
        Ok(self.data.lock().await.result(result_id)?)
    }
}
