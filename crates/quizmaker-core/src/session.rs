//! One student attempt.
//!
//! Owns the assembled test and its answer store, tracks the current
//! position, and submits the scored result to a store. Dropping a session
//! cancels the attempt; nothing is written before `submit`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::answers::{AnswerStore, StoredAnswer, UiSelection};
use crate::assembler::{assemble_with_rng, AssembledTest};
use crate::error::{QuizError, SubmitError};
use crate::evaluation::{evaluate, Evaluation};
use crate::model::{Question, Test, TestId};
use crate::report::{package, QuizResult};
use crate::traits::QuizStore;

/// An attempt in progress.
#[derive(Debug, Clone)]
pub struct QuizSession {
    test: Test,
    assembled: AssembledTest,
    answers: AnswerStore,
    position: usize,
}

impl QuizSession {
    /// Wrap an already assembled test. An attempt needs at least one
    /// question.
    pub fn new(test: Test, assembled: AssembledTest) -> Result<Self, QuizError> {
        if assembled.is_empty() {
            return Err(QuizError::EmptyPool { test_id: test.id });
        }
        let answers = AnswerStore::new(&assembled);
        Ok(Self {
            test,
            assembled,
            answers,
            position: 0,
        })
    }

    /// Load a test and its pool from `store` and assemble an attempt.
    ///
    /// `count` overrides the test's own `student_count`.
    pub async fn start(
        store: &dyn QuizStore,
        test_id: &TestId,
        count: Option<usize>,
    ) -> anyhow::Result<Self> {
        let (test, pool) = Self::load(store, test_id).await?;
        let mut rng = rand::thread_rng();
        Self::from_pool(test, &pool, count, &mut rng)
    }

    /// Like [`QuizSession::start`], with question and option order fixed by
    /// `seed`.
    pub async fn start_seeded(
        store: &dyn QuizStore,
        test_id: &TestId,
        count: Option<usize>,
        seed: u64,
    ) -> anyhow::Result<Self> {
        let (test, pool) = Self::load(store, test_id).await?;
        let mut rng = StdRng::seed_from_u64(seed);
        Self::from_pool(test, &pool, count, &mut rng)
    }

    async fn load(
        store: &dyn QuizStore,
        test_id: &TestId,
    ) -> anyhow::Result<(Test, Vec<Question>)> {
        let test = store.load_test(test_id).await?;
        let pool = store.load_question_pool(test_id).await?;
        Ok((test, pool))
    }

    fn from_pool<R: Rng + ?Sized>(
        test: Test,
        pool: &[Question],
        count: Option<usize>,
        rng: &mut R,
    ) -> anyhow::Result<Self> {
        let requested = count.unwrap_or(test.student_count);
        let assembled = assemble_with_rng(&test.id, pool, requested, rng)?;

        tracing::info!(
            "started attempt on '{}' with {} of {} questions",
            test.name,
            assembled.len(),
            pool.len()
        );
        Ok(Self::new(test, assembled)?)
    }

    pub fn test(&self) -> &Test {
        &self.test
    }

    pub fn assembled(&self) -> &AssembledTest {
        &self.assembled
    }

    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    pub fn len(&self) -> usize {
        self.assembled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assembled.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn current_question(&self) -> &Question {
        &self.assembled.questions[self.position]
    }

    /// The answer stored for the current question, for re-populating input.
    pub fn current_answer(&self) -> &StoredAnswer {
        self.answers.slot(self.position)
    }

    /// Record the current input for the question on screen.
    pub fn record_current(&mut self, selection: &UiSelection) -> Result<(), QuizError> {
        let question = &self.assembled.questions[self.position];
        self.answers.record(self.position, question, selection)
    }

    /// Move forward. Returns `false` when already on the last question.
    pub fn next(&mut self) -> bool {
        if self.position + 1 < self.len() {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Move back. Returns `false` when already on the first question.
    pub fn previous(&mut self) -> bool {
        if self.position > 0 {
            self.position -= 1;
            true
        } else {
            false
        }
    }

    pub fn go_to(&mut self, position: usize) -> Result<(), QuizError> {
        if position >= self.len() {
            return Err(QuizError::PositionOutOfRange {
                position,
                len: self.len(),
            });
        }
        self.position = position;
        Ok(())
    }

    /// Score the attempt without saving anything.
    pub fn evaluate(&self) -> Evaluation {
        evaluate(&self.assembled, &self.answers)
    }

    /// Score the attempt and package it for persistence.
    pub fn package(&self, student_email: Option<&str>) -> QuizResult {
        let evaluation = self.evaluate();
        package(
            student_email,
            &self.test.id,
            evaluation.score,
            self.len(),
            evaluation.details,
        )
    }

    /// Score, package, and persist the attempt.
    ///
    /// On a store failure the session is left untouched, so the caller can
    /// retry with [`QuizSession::save`] without re-answering.
    pub async fn submit(
        &self,
        store: &dyn QuizStore,
        student_email: Option<&str>,
    ) -> Result<QuizResult, SubmitError> {
        let result = self.package(student_email);
        Self::save(store, result).await
    }

    /// Persist an already packaged result.
    pub async fn save(
        store: &dyn QuizStore,
        result: QuizResult,
    ) -> Result<QuizResult, SubmitError> {
        match store.persist_result(&result).await {
            Ok(()) => {
                tracing::info!(
                    "saved result {} for test {}: {}/{}",
                    result.id,
                    result.test_id,
                    result.score,
                    result.total
                );
                Ok(result)
            }
            Err(source) => {
                tracing::error!("failed to save result {}: {source:#}", result.id);
                Err(SubmitError::Persist {
                    result: Box::new(result),
                    source,
                })
            }
        }
    }
}
