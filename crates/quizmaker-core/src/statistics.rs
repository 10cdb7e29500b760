//! Aggregate statistics over stored results of one test.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{QuestionId, TestId};
use crate::report::QuizResult;

/// How students did on one question across attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionStats {
    pub question_id: QuestionId,
    /// Attempts in which the question was asked.
    pub attempts: usize,
    pub correct: usize,
    /// `correct / attempts`.
    pub rate: f64,
}

/// Summary of all attempts on a test. Percentages are in `0.0..=100.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestStats {
    pub test_id: TestId,
    pub attempts: usize,
    pub mean_percentage: f64,
    pub best_percentage: f64,
    pub worst_percentage: f64,
    /// Ordered by question id.
    pub per_question: Vec<QuestionStats>,
}

/// Summarize `results`. Results recorded for other tests are ignored.
pub fn summarize_results(test_id: &TestId, results: &[QuizResult]) -> TestStats {
    let relevant: Vec<&QuizResult> = results.iter().filter(|r| &r.test_id == test_id).collect();

    let percentages: Vec<f64> = relevant.iter().map(|r| r.ratio() * 100.0).collect();
    let attempts = percentages.len();
    let (mean, best, worst) = if attempts == 0 {
        (0.0, 0.0, 0.0)
    } else {
        (
            percentages.iter().sum::<f64>() / attempts as f64,
            percentages.iter().copied().fold(f64::MIN, f64::max),
            percentages.iter().copied().fold(f64::MAX, f64::min),
        )
    };

    let mut tally: BTreeMap<&QuestionId, (usize, usize)> = BTreeMap::new();
    for detail in relevant.iter().flat_map(|r| &r.details) {
        let entry = tally.entry(&detail.question_id).or_default();
        entry.0 += 1;
        if detail.was_correct {
            entry.1 += 1;
        }
    }

    let per_question = tally
        .into_iter()
        .map(|(question_id, (asked, correct))| QuestionStats {
            question_id: question_id.clone(),
            attempts: asked,
            correct,
            rate: correct as f64 / asked as f64,
        })
        .collect();

    TestStats {
        test_id: test_id.clone(),
        attempts,
        mean_percentage: mean,
        best_percentage: best,
        worst_percentage: worst,
        per_question,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::ResultDetail;
    use crate::report::package;

    fn result(test_id: &str, outcomes: &[(&str, bool)]) -> QuizResult {
        let details: Vec<ResultDetail> = outcomes
            .iter()
            .map(|(id, ok)| ResultDetail {
                question_id: (*id).into(),
                was_correct: *ok,
                user_answer: String::new(),
            })
            .collect();
        let score = details.iter().filter(|d| d.was_correct).count() as f64;
        package(None, &test_id.into(), score, details.len(), details)
    }

    #[test]
    fn no_results() {
        let stats = summarize_results(&"t1".into(), &[]);
        assert_eq!(stats.attempts, 0);
        assert_eq!(stats.mean_percentage, 0.0);
        assert!(stats.per_question.is_empty());
    }

    #[test]
    fn percentages_and_per_question_rates() {
        let results = vec![
            result("t1", &[("q2", true), ("q1", true)]),
            result("t1", &[("q1", false), ("q3", true)]),
            result("t2", &[("q1", false)]),
        ];
        let stats = summarize_results(&"t1".into(), &results);

        assert_eq!(stats.attempts, 2);
        assert!((stats.mean_percentage - 75.0).abs() < 1e-9);
        assert!((stats.best_percentage - 100.0).abs() < 1e-9);
        assert!((stats.worst_percentage - 50.0).abs() < 1e-9);

        let ids: Vec<&str> = stats.per_question.iter().map(|q| q.question_id.as_str()).collect();
        assert_eq!(ids, vec!["q1", "q2", "q3"]);

        let q1 = &stats.per_question[0];
        assert_eq!((q1.attempts, q1.correct), (2, 1));
        assert!((q1.rate - 0.5).abs() < 1e-9);
    }
}
