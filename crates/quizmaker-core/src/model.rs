//! Core data model types for quizmaker.
//!
//! These are the records the whole system shares: tests, the questions they
//! own, and the answer options of each question.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Generate a fresh random identifier.
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Identifier of a [`Test`].
    TestId
);
string_id!(
    /// Identifier of a [`Question`].
    QuestionId
);
string_id!(
    /// Stable identifier of an [`AnswerOption`], assigned at authoring time.
    OptionId
);

/// How a question is answered and evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QuestionType {
    #[default]
    #[serde(rename = "single")]
    SingleChoice,
    #[serde(rename = "multiple")]
    MultipleChoice,
    #[serde(rename = "text")]
    TextAnswer,
}

impl QuestionType {
    /// Whether answers are picked from a list of options.
    pub fn is_choice(self) -> bool {
        !matches!(self, QuestionType::TextAnswer)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::SingleChoice => write!(f, "single"),
            QuestionType::MultipleChoice => write!(f, "multiple"),
            QuestionType::TextAnswer => write!(f, "text"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" | "single_choice" | "0" => Ok(QuestionType::SingleChoice),
            "multiple" | "multiple_choice" | "1" => Ok(QuestionType::MultipleChoice),
            "text" | "text_answer" | "2" => Ok(QuestionType::TextAnswer),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// One selectable answer of a choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Stable identifier, kept across edits of the option text.
    pub id: OptionId,
    /// Label shown to the student.
    pub text: String,
    /// Whether picking this option counts towards a correct answer.
    #[serde(default)]
    pub is_correct: bool,
}

impl AnswerOption {
    pub fn new(text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            id: OptionId::generate(),
            text: text.into(),
            is_correct,
        }
    }
}

/// A question belonging to a test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique question identifier.
    pub id: QuestionId,
    /// The test whose pool this question belongs to.
    pub test_id: TestId,
    /// The question as shown to the student.
    pub text: String,
    /// How the question is answered and evaluated.
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Options in authoring order. Empty for text questions.
    #[serde(default)]
    pub options: Vec<AnswerOption>,
    /// Expected answer for text questions.
    #[serde(default)]
    pub expected_text: String,
}

impl Question {
    /// Options flagged correct, in authoring order.
    pub fn correct_options(&self) -> impl Iterator<Item = &AnswerOption> {
        self.options.iter().filter(|o| o.is_correct)
    }

    pub fn option(&self, id: &OptionId) -> Option<&AnswerOption> {
        self.options.iter().find(|o| &o.id == id)
    }
}

/// A named collection of questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Test {
    /// Unique test identifier.
    pub id: TestId,
    /// Display name.
    pub name: String,
    /// Free-form notes for the author.
    #[serde(default)]
    pub description: String,
    /// How many questions a student gets per attempt.
    #[serde(default = "default_student_count")]
    pub student_count: usize,
}

pub const DEFAULT_STUDENT_COUNT: usize = 10;

fn default_student_count() -> usize {
    DEFAULT_STUDENT_COUNT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_type_display_and_parse() {
        assert_eq!(QuestionType::SingleChoice.to_string(), "single");
        assert_eq!(QuestionType::TextAnswer.to_string(), "text");
        assert_eq!(
            "multiple".parse::<QuestionType>().unwrap(),
            QuestionType::MultipleChoice
        );
        assert_eq!(
            "Single_Choice".parse::<QuestionType>().unwrap(),
            QuestionType::SingleChoice
        );
        assert_eq!("2".parse::<QuestionType>().unwrap(), QuestionType::TextAnswer);
        assert!("essay".parse::<QuestionType>().is_err());
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(OptionId::generate(), OptionId::generate());
    }

    #[test]
    fn test_defaults_student_count() {
        let test: Test = serde_json::from_str(r#"{"id": "t1", "name": "Geo"}"#).unwrap();
        assert_eq!(test.student_count, DEFAULT_STUDENT_COUNT);
        assert!(test.description.is_empty());
    }

    #[test]
    fn question_serde_uses_type_key() {
        let q = Question {
            id: "q1".into(),
            test_id: "t1".into(),
            text: "Capital?".into(),
            question_type: QuestionType::TextAnswer,
            options: vec![],
            expected_text: "Paris".into(),
        };
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["id"], "q1");
    }
}
