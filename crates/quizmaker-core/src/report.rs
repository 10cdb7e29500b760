//! Result packaging with JSON persistence and plain-text summaries.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::evaluation::ResultDetail;
use crate::model::TestId;

/// A submitted attempt. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    /// Unique result identifier.
    pub id: Uuid,
    /// Where the student wants results sent, if anywhere.
    #[serde(default)]
    pub student_email: Option<String>,
    pub test_id: TestId,
    /// Number of correct questions.
    pub score: f64,
    /// Number of questions asked.
    pub total: usize,
    /// When the attempt was submitted.
    pub created_at: DateTime<Utc>,
    /// Per-question outcome, in question order.
    pub details: Vec<ResultDetail>,
}

impl QuizResult {
    /// Score as a fraction of the total, `0.0` for an empty attempt.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.score / self.total as f64
        }
    }

    /// The plain-text summary shown on screen and sent by email.
    pub fn summary(&self) -> String {
        format_summary(self.score, self.total, &self.details)
    }

    /// Save the result as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize result")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write result to {}", path.display()))?;
        Ok(())
    }

    /// Load a result from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read result from {}", path.display()))?;
        let result: QuizResult =
            serde_json::from_str(&content).context("failed to parse result JSON")?;
        Ok(result)
    }
}

/// Build the persistence-ready record for an attempt, stamped with the
/// current UTC time. A blank email is stored as `None`.
pub fn package(
    student_email: Option<&str>,
    test_id: &TestId,
    score: f64,
    total: usize,
    details: Vec<ResultDetail>,
) -> QuizResult {
    let student_email = student_email
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string);

    QuizResult {
        id: Uuid::new_v4(),
        student_email,
        test_id: test_id.clone(),
        score,
        total,
        created_at: Utc::now(),
        details,
    }
}

/// Format the score line followed by one block per question.
pub fn format_summary(score: f64, total: usize, details: &[ResultDetail]) -> String {
    let mut out = format!("Score: {score} / {total}\n");
    for (i, detail) in details.iter().enumerate() {
        let mark = if detail.was_correct { "OK" } else { "Wrong" };
        let _ = write!(
            out,
            "\nQuestion {}: {mark}\nAnswer: {}\n",
            i + 1,
            detail.user_answer
        );
    }
    out
}
