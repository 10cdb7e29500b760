//! The record set both backends keep, and the edits applied to it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quizmaker_core::error::StoreError;
use quizmaker_core::model::{Question, QuestionId, Test, TestId};
use quizmaker_core::report::QuizResult;

/// Everything a store holds. Serialized as-is by the JSON backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default)]
    pub tests: Vec<Test>,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub results: Vec<QuizResult>,
}

impl StoreData {
    pub fn test(&self, test_id: &TestId) -> Result<&Test, StoreError> {
        self.tests
            .iter()
            .find(|t| &t.id == test_id)
            .ok_or_else(|| StoreError::TestNotFound(test_id.clone()))
    }

    /// Questions of `test_id` in insertion order. Unknown tests are an error,
    /// an empty pool is not.
    pub fn question_pool(&self, test_id: &TestId) -> Result<Vec<Question>, StoreError> {
        self.test(test_id)?;
        Ok(self
            .questions
            .iter()
            .filter(|q| &q.test_id == test_id)
            .cloned()
            .collect())
    }

    pub fn upsert_test(&mut self, test: &Test) {
        match self.tests.iter_mut().find(|t| t.id == test.id) {
            Some(existing) => *existing = test.clone(),
            None => self.tests.push(test.clone()),
        }
    }

    /// Remove a test and every question it owns. Results are history and
    /// stay.
    pub fn remove_test(&mut self, test_id: &TestId) -> Result<usize, StoreError> {
        self.test(test_id)?;
        self.tests.retain(|t| &t.id != test_id);
        let before = self.questions.len();
        self.questions.retain(|q| &q.test_id != test_id);
        Ok(before - self.questions.len())
    }

    pub fn question(&self, question_id: &QuestionId) -> Result<&Question, StoreError> {
        self.questions
            .iter()
            .find(|q| &q.id == question_id)
            .ok_or_else(|| StoreError::QuestionNotFound(question_id.clone()))
    }

    /// Insert or replace a question. A question never moves between tests:
    /// an ID already owned by another test is rejected.
    pub fn upsert_question(&mut self, question: &Question) -> Result<(), StoreError> {
        if self.test(&question.test_id).is_err() {
            return Err(StoreError::OrphanQuestion {
                question_id: question.id.clone(),
                test_id: question.test_id.clone(),
            });
        }
        match self.questions.iter_mut().find(|q| q.id == question.id) {
            Some(existing) if existing.test_id != question.test_id => {
                return Err(StoreError::QuestionOwnedElsewhere {
                    question_id: question.id.clone(),
                    owner: existing.test_id.clone(),
                    test_id: question.test_id.clone(),
                });
            }
            Some(existing) => *existing = question.clone(),
            None => self.questions.push(question.clone()),
        }
        Ok(())
    }

    pub fn remove_question(&mut self, question_id: &QuestionId) -> Result<(), StoreError> {
        let before = self.questions.len();
        self.questions.retain(|q| &q.id != question_id);
        if self.questions.len() == before {
            return Err(StoreError::QuestionNotFound(question_id.clone()));
        }
        Ok(())
    }

    pub fn push_result(&mut self, result: &QuizResult) {
        self.results.push(result.clone());
    }

    pub fn results_for(&self, test_id: &TestId) -> Vec<QuizResult> {
        self.results
            .iter()
            .filter(|r| &r.test_id == test_id)
            .cloned()
            .collect()
    }

    pub fn result(&self, result_id: &Uuid) -> Result<QuizResult, StoreError> {
        self.results
            .iter()
            .find(|r| &r.id == result_id)
            .cloned()
            .ok_or_else(|| StoreError::ResultNotFound(result_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizmaker_core::model::{AnswerOption, QuestionType};

    fn test(id: &str) -> Test {
        Test {
            id: id.into(),
            name: format!("Test {id}"),
            description: String::new(),
            student_count: 2,
        }
    }

    fn question(id: &str, test_id: &str) -> Question {
        Question {
            id: id.into(),
            test_id: test_id.into(),
            text: format!("Question {id}"),
            question_type: QuestionType::SingleChoice,
            options: vec![AnswerOption::new("Yes", true), AnswerOption::new("No", false)],
            expected_text: String::new(),
        }
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut data = StoreData::default();
        data.upsert_test(&test("t1"));
        data.upsert_test(&test("t2"));

        let mut renamed = test("t1");
        renamed.name = "Renamed".into();
        data.upsert_test(&renamed);

        assert_eq!(data.tests.len(), 2);
        assert_eq!(data.tests[0].name, "Renamed");
    }

    #[test]
    fn questions_need_an_owner() {
        let mut data = StoreData::default();
        let err = data.upsert_question(&question("q1", "ghost")).unwrap_err();
        assert!(matches!(err, StoreError::OrphanQuestion { .. }));

        data.upsert_test(&test("t1"));
        data.upsert_question(&question("q1", "t1")).unwrap();
        data.upsert_question(&question("q1", "t1")).unwrap();
        assert_eq!(data.question_pool(&"t1".into()).unwrap().len(), 1);
    }

    #[test]
    fn question_ids_stay_with_their_test() {
        let mut data = StoreData::default();
        data.upsert_test(&test("geo"));
        data.upsert_test(&test("ita"));
        data.upsert_question(&question("capital", "geo")).unwrap();

        let err = data.upsert_question(&question("capital", "ita")).unwrap_err();
        assert!(matches!(
            &err,
            StoreError::QuestionOwnedElsewhere { owner, .. } if owner.as_str() == "geo"
        ));
        assert_eq!(data.question_pool(&"geo".into()).unwrap().len(), 1);
        assert!(data.question_pool(&"ita".into()).unwrap().is_empty());
        assert_eq!(data.question(&"capital".into()).unwrap().test_id.as_str(), "geo");
    }

    #[test]
    fn remove_test_cascades_to_questions() {
        let mut data = StoreData::default();
        data.upsert_test(&test("t1"));
        data.upsert_test(&test("t2"));
        data.upsert_question(&question("q1", "t1")).unwrap();
        data.upsert_question(&question("q2", "t1")).unwrap();
        data.upsert_question(&question("q3", "t2")).unwrap();

        assert_eq!(data.remove_test(&"t1".into()).unwrap(), 2);
        assert_eq!(data.questions.len(), 1);
        assert!(data.test(&"t1".into()).unwrap_err().is_not_found());
        assert!(data.remove_test(&"t1".into()).is_err());
    }

    #[test]
    fn missing_records_are_not_found() {
        let data = StoreData::default();
        assert!(data.question_pool(&"t1".into()).unwrap_err().is_not_found());
        assert!(data.result(&Uuid::new_v4()).unwrap_err().is_not_found());

        let mut data = data;
        assert!(data.remove_question(&"q1".into()).unwrap_err().is_not_found());
    }
}
