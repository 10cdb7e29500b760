//! Turning edited fields into validated records.
//!
//! Whatever collects the fields (a form, a bank file, CLI flags) hands them
//! over as a draft; `apply_*_edits` either returns a record that is safe to
//! store or explains what is wrong with it.

use std::collections::HashSet;

use thiserror::Error;

use crate::model::{
    AnswerOption, OptionId, Question, QuestionId, QuestionType, Test, TestId,
    DEFAULT_STUDENT_COUNT,
};

/// Why a draft was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthoringError {
    #[error("test name is empty")]
    EmptyTestName,

    #[error("student count must be at least 1")]
    ZeroStudentCount,

    #[error("question text is empty")]
    EmptyQuestionText,

    #[error("a {0} question needs at least one option")]
    NoOptions(QuestionType),

    #[error("option {0} has no text")]
    EmptyOptionText(usize),

    #[error("option text '{0}' appears more than once")]
    DuplicateOptionText(String),

    #[error("a single choice question needs exactly one correct option, found {0}")]
    SingleChoiceCorrectCount(usize),
}

/// Edited fields of a test.
#[derive(Debug, Clone, Default)]
pub struct TestDraft {
    pub id: Option<TestId>,
    pub name: String,
    pub description: String,
    pub student_count: Option<usize>,
}

/// Edited fields of one option row.
#[derive(Debug, Clone, Default)]
pub struct OptionDraft {
    pub id: Option<OptionId>,
    pub text: String,
    pub is_correct: bool,
}

/// Edited fields of a question.
#[derive(Debug, Clone, Default)]
pub struct QuestionDraft {
    pub id: Option<QuestionId>,
    pub test_id: TestId,
    pub text: String,
    pub question_type: QuestionType,
    pub options: Vec<OptionDraft>,
    pub expected_text: String,
}

impl From<&Test> for TestDraft {
    fn from(test: &Test) -> Self {
        Self {
            id: Some(test.id.clone()),
            name: test.name.clone(),
            description: test.description.clone(),
            student_count: Some(test.student_count),
        }
    }
}

impl From<&Question> for QuestionDraft {
    fn from(question: &Question) -> Self {
        Self {
            id: Some(question.id.clone()),
            test_id: question.test_id.clone(),
            text: question.text.clone(),
            question_type: question.question_type,
            options: question
                .options
                .iter()
                .map(|o| OptionDraft {
                    id: Some(o.id.clone()),
                    text: o.text.clone(),
                    is_correct: o.is_correct,
                })
                .collect(),
            expected_text: question.expected_text.clone(),
        }
    }
}

pub fn apply_test_edits(draft: TestDraft) -> Result<Test, AuthoringError> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(AuthoringError::EmptyTestName);
    }
    let student_count = draft.student_count.unwrap_or(DEFAULT_STUDENT_COUNT);
    if student_count == 0 {
        return Err(AuthoringError::ZeroStudentCount);
    }

    Ok(Test {
        id: draft.id.unwrap_or_else(TestId::generate),
        name: name.to_string(),
        description: draft.description.trim().to_string(),
        student_count,
    })
}

/// Validate a question draft.
///
/// Option texts are trimmed and must be unique within the question, since
/// students pick options by their label. Options of text questions are
/// discarded. An empty expected text is allowed; such a question can never
/// be answered correctly.
pub fn apply_question_edits(draft: QuestionDraft) -> Result<Question, AuthoringError> {
    let text = draft.text.trim();
    if text.is_empty() {
        return Err(AuthoringError::EmptyQuestionText);
    }

    let options = if draft.question_type.is_choice() {
        if draft.options.is_empty() {
            return Err(AuthoringError::NoOptions(draft.question_type));
        }

        let mut seen = HashSet::new();
        let mut options = Vec::with_capacity(draft.options.len());
        for (i, option) in draft.options.into_iter().enumerate() {
            let option_text = option.text.trim().to_string();
            if option_text.is_empty() {
                return Err(AuthoringError::EmptyOptionText(i + 1));
            }
            if !seen.insert(option_text.clone()) {
                return Err(AuthoringError::DuplicateOptionText(option_text));
            }
            options.push(AnswerOption {
                id: option.id.unwrap_or_else(OptionId::generate),
                text: option_text,
                is_correct: option.is_correct,
            });
        }

        if draft.question_type == QuestionType::SingleChoice {
            let correct = options.iter().filter(|o| o.is_correct).count();
            if correct != 1 {
                return Err(AuthoringError::SingleChoiceCorrectCount(correct));
            }
        }
        options
    } else {
        Vec::new()
    };

    let expected_text = match draft.question_type {
        QuestionType::TextAnswer => draft.expected_text.trim().to_string(),
        _ => String::new(),
    };

    Ok(Question {
        id: draft.id.unwrap_or_else(QuestionId::generate),
        test_id: draft.test_id,
        text: text.to_string(),
        question_type: draft.question_type,
        options,
        expected_text,
    })
}

/// A starter test for the authoring screen.
pub fn new_test() -> Test {
    Test {
        id: TestId::generate(),
        name: "New test".into(),
        description: String::new(),
        student_count: DEFAULT_STUDENT_COUNT,
    }
}

/// A starter single choice question with two options, the first correct.
pub fn new_question(test_id: &TestId) -> Question {
    Question {
        id: QuestionId::generate(),
        test_id: test_id.clone(),
        text: "New question".into(),
        question_type: QuestionType::SingleChoice,
        options: vec![
            AnswerOption::new("Option 1", true),
            AnswerOption::new("Option 2", false),
        ],
        expected_text: String::new(),
    }
}
