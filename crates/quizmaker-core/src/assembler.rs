//! Randomized test assembly.
//!
//! Picks a random subset of a test's question pool (sampling without
//! replacement) and a fresh presentation order for each question's options.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::model::{AnswerOption, Question, TestId};

/// The questions of one attempt, in the order they are asked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssembledTest {
    pub test_id: TestId,
    pub questions: Vec<Question>,
    /// `option_orders[i]` is a permutation of the option indices of
    /// `questions[i]`, used for presentation only. Empty for text questions.
    pub option_orders: Vec<Vec<usize>>,
}

impl AssembledTest {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn question(&self, position: usize) -> Result<&Question, QuizError> {
        self.questions
            .get(position)
            .ok_or(QuizError::PositionOutOfRange {
                position,
                len: self.questions.len(),
            })
    }

    /// Options of the question at `position`, in presentation order.
    pub fn presented_options(&self, position: usize) -> Result<Vec<&AnswerOption>, QuizError> {
        let question = self.question(position)?;
        Ok(self.option_orders[position]
            .iter()
            .filter_map(|&idx| question.options.get(idx))
            .collect())
    }
}

/// Assemble an attempt using the thread-local RNG.
///
/// Every call draws a fresh subset and fresh option orders.
pub fn assemble(
    test_id: &TestId,
    pool: &[Question],
    requested_count: usize,
) -> Result<AssembledTest, QuizError> {
    assemble_with_rng(test_id, pool, requested_count, &mut rand::thread_rng())
}

/// Assemble an attempt with a caller-supplied RNG.
pub fn assemble_with_rng<R: Rng + ?Sized>(
    test_id: &TestId,
    pool: &[Question],
    requested_count: usize,
    rng: &mut R,
) -> Result<AssembledTest, QuizError> {
    if requested_count == 0 {
        return Err(QuizError::InvalidQuestionCount);
    }
    if pool.is_empty() {
        return Err(QuizError::EmptyPool {
            test_id: test_id.clone(),
        });
    }

    let mut indices: Vec<usize> = (0..pool.len()).collect();
    indices.shuffle(rng);
    indices.truncate(requested_count.min(pool.len()));

    let questions: Vec<Question> = indices.iter().map(|&i| pool[i].clone()).collect();
    let option_orders = questions
        .iter()
        .map(|q| {
            if q.question_type.is_choice() {
                let mut order: Vec<usize> = (0..q.options.len()).collect();
                order.shuffle(rng);
                order
            } else {
                Vec::new()
            }
        })
        .collect();

    tracing::debug!(
        "assembled test {test_id}: {} of {} questions",
        questions.len(),
        pool.len()
    );

    Ok(AssembledTest {
        test_id: test_id.clone(),
        questions,
        option_orders,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::model::QuestionType;

    pub(crate) fn choice_question(
        id: &str,
        kind: QuestionType,
        options: &[(&str, bool)],
    ) -> Question {
        Question {
            id: id.into(),
            test_id: "t1".into(),
            text: format!("Question {id}"),
            question_type: kind,
            options: options
                .iter()
                .enumerate()
                .map(|(i, (text, correct))| AnswerOption {
                    id: format!("{id}-o{i}").into(),
                    text: text.to_string(),
                    is_correct: *correct,
                })
                .collect(),
            expected_text: String::new(),
        }
    }

    pub(crate) fn text_question(id: &str, expected: &str) -> Question {
        Question {
            id: id.into(),
            test_id: "t1".into(),
            text: format!("Question {id}"),
            question_type: QuestionType::TextAnswer,
            options: vec![],
            expected_text: expected.into(),
        }
    }

    fn pool(size: usize) -> Vec<Question> {
        (0..size)
            .map(|i| {
                if i % 3 == 2 {
                    text_question(&format!("q{i}"), "answer")
                } else {
                    choice_question(
                        &format!("q{i}"),
                        QuestionType::MultipleChoice,
                        &[("A", true), ("B", false), ("C", true), ("D", false)],
                    )
                }
            })
            .collect()
    }

    #[test]
    fn subset_size_is_min_of_requested_and_pool() {
        let test_id = TestId::from("t1");
        let mut rng = StdRng::seed_from_u64(7);
        for pool_size in 1..8 {
            let pool = pool(pool_size);
            for requested in 1..10 {
                let assembled = assemble_with_rng(&test_id, &pool, requested, &mut rng).unwrap();
                assert_eq!(assembled.len(), requested.min(pool_size));

                let ids: HashSet<_> = assembled.questions.iter().map(|q| &q.id).collect();
                assert_eq!(ids.len(), assembled.len(), "duplicate question drawn");
                assert!(assembled
                    .questions
                    .iter()
                    .all(|q| pool.iter().any(|p| p.id == q.id)));
            }
        }
    }

    #[test]
    fn option_orders_are_permutations() {
        let pool = pool(6);
        let assembled = assemble(&"t1".into(), &pool, 6).unwrap();
        for (question, order) in assembled.questions.iter().zip(&assembled.option_orders) {
            if question.question_type.is_choice() {
                let mut sorted = order.clone();
                sorted.sort_unstable();
                assert_eq!(sorted, (0..question.options.len()).collect::<Vec<_>>());
            } else {
                assert!(order.is_empty());
            }
        }
    }

    #[test]
    fn presented_options_follow_order() {
        let pool = vec![choice_question(
            "q0",
            QuestionType::SingleChoice,
            &[("A", false), ("B", true), ("C", false)],
        )];
        let mut assembled = assemble(&"t1".into(), &pool, 1).unwrap();
        assembled.option_orders[0] = vec![2, 0, 1];
        let texts: Vec<_> = assembled
            .presented_options(0)
            .unwrap()
            .iter()
            .map(|o| o.text.as_str())
            .collect();
        assert_eq!(texts, vec!["C", "A", "B"]);
    }

    #[test]
    fn empty_pool_is_rejected() {
        let err = assemble(&"t1".into(), &[], 3).unwrap_err();
        assert!(matches!(err, QuizError::EmptyPool { .. }));
    }

    #[test]
    fn zero_count_is_rejected() {
        let err = assemble(&"t1".into(), &pool(3), 0).unwrap_err();
        assert!(matches!(err, QuizError::InvalidQuestionCount));
    }

    #[test]
    fn pool_is_not_mutated() {
        let pool = pool(5);
        let before = pool.clone();
        let _ = assemble(&"t1".into(), &pool, 3).unwrap();
        assert_eq!(pool, before);
    }

    #[test]
    fn repeated_assembly_varies() {
        // 10! orderings; two identical draws in a row would be a fixed seed.
        let pool = pool(10);
        let orders: HashSet<Vec<String>> = (0..5)
            .map(|_| {
                assemble(&"t1".into(), &pool, 10)
                    .unwrap()
                    .questions
                    .iter()
                    .map(|q| q.id.to_string())
                    .collect()
            })
            .collect();
        assert!(orders.len() > 1);
    }
}
