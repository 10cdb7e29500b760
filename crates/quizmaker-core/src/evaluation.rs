//! Answer evaluation.
//!
//! Scores every question of an assembled test against the captured answers.
//! One point per correct question, no partial credit.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::answers::{AnswerStore, StoredAnswer};
use crate::assembler::AssembledTest;
use crate::model::{OptionId, Question, QuestionId, QuestionType};

/// Separator between selected option texts in the displayed answer.
pub const ANSWER_DELIMITER: &str = "; ";

/// Outcome for a single question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultDetail {
    pub question_id: QuestionId,
    pub was_correct: bool,
    /// The student's answer as shown to humans.
    pub user_answer: String,
}

/// Score and per-question details, in question order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub score: f64,
    pub details: Vec<ResultDetail>,
}

impl Evaluation {
    pub fn total(&self) -> usize {
        self.details.len()
    }
}

/// Score an attempt.
///
/// Pure: the same test and answers always give the same evaluation.
pub fn evaluate(test: &AssembledTest, answers: &AnswerStore) -> Evaluation {
    let empty = StoredAnswer::default();
    let details: Vec<ResultDetail> = test
        .questions
        .iter()
        .enumerate()
        .map(|(position, question)| {
            let answer = answers.restore(position).unwrap_or(&empty);
            evaluate_question(question, answer)
        })
        .collect();

    let score = details.iter().filter(|d| d.was_correct).count() as f64;
    Evaluation { score, details }
}

/// Score a single question.
pub fn evaluate_question(question: &Question, answer: &StoredAnswer) -> ResultDetail {
    let (was_correct, user_answer) = match question.question_type {
        QuestionType::TextAnswer => {
            let given = answer.free_text.trim();
            (text_matches(given, &question.expected_text), given.to_string())
        }
        QuestionType::SingleChoice => {
            // First correct option by authoring order decides.
            let correct = question
                .correct_options()
                .next()
                .is_some_and(|o| answer.selected.contains(&o.id));
            (correct, selected_display(question, answer))
        }
        QuestionType::MultipleChoice => {
            let expected: BTreeSet<&OptionId> = question.correct_options().map(|o| &o.id).collect();
            let selected: BTreeSet<&OptionId> = answer.selected.iter().collect();
            (expected == selected, selected_display(question, answer))
        }
    };

    ResultDetail {
        question_id: question.id.clone(),
        was_correct,
        user_answer,
    }
}

/// Case-insensitive comparison of trimmed texts. An empty expectation never
/// matches.
fn text_matches(given: &str, expected: &str) -> bool {
    let expected = expected.trim();
    !expected.is_empty() && given.trim().to_lowercase() == expected.to_lowercase()
}

fn selected_display(question: &Question, answer: &StoredAnswer) -> String {
    answer
        .selected
        .iter()
        .filter_map(|id| question.option(id))
        .map(|o| o.text.as_str())
        .collect::<Vec<_>>()
        .join(ANSWER_DELIMITER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::UiSelection;
    use crate::assembler::tests::{choice_question, text_question};

    fn answer_labels(question: &Question, labels: &[&str]) -> StoredAnswer {
        StoredAnswer::capture(
            question,
            &UiSelection::Labels(labels.iter().map(|s| s.to_string()).collect()),
        )
    }

    fn answer_text(question: &Question, text: &str) -> StoredAnswer {
        StoredAnswer::capture(question, &UiSelection::Text(text.into()))
    }

    #[test]
    fn text_answer_is_case_insensitive() {
        let q = text_question("q1", "Paris");
        for given in ["paris", "PARIS", " Paris "] {
            let detail = evaluate_question(&q, &answer_text(&q, given));
            assert!(detail.was_correct, "'{given}' should match");
            assert_eq!(detail.user_answer, given.trim());
        }
        assert!(!evaluate_question(&q, &answer_text(&q, "London")).was_correct);
    }

    #[test]
    fn empty_expected_text_never_matches() {
        let q = text_question("q1", "");
        assert!(!evaluate_question(&q, &answer_text(&q, "")).was_correct);
        assert!(!evaluate_question(&q, &answer_text(&q, "anything")).was_correct);

        let blank = text_question("q2", "   ");
        assert!(!evaluate_question(&blank, &answer_text(&blank, "")).was_correct);
    }

    #[test]
    fn multiple_choice_is_set_equality() {
        let q = choice_question(
            "q1",
            QuestionType::MultipleChoice,
            &[("A", true), ("B", true), ("C", false)],
        );
        assert!(evaluate_question(&q, &answer_labels(&q, &["B", "A"])).was_correct);
        assert!(evaluate_question(&q, &answer_labels(&q, &["A", "B", "A"])).was_correct);
        assert!(!evaluate_question(&q, &answer_labels(&q, &["A"])).was_correct);
        assert!(!evaluate_question(&q, &answer_labels(&q, &["A", "B", "C"])).was_correct);
    }

    #[test]
    fn multiple_choice_without_correct_options() {
        let q = choice_question(
            "q1",
            QuestionType::MultipleChoice,
            &[("A", false), ("B", false)],
        );
        assert!(evaluate_question(&q, &answer_labels(&q, &[])).was_correct);
        assert!(!evaluate_question(&q, &answer_labels(&q, &["A"])).was_correct);
    }

    #[test]
    fn single_choice_matching() {
        let q = choice_question(
            "q1",
            QuestionType::SingleChoice,
            &[("A", false), ("B", true), ("C", false)],
        );
        assert!(evaluate_question(&q, &answer_labels(&q, &["B"])).was_correct);
        assert!(!evaluate_question(&q, &answer_labels(&q, &["A"])).was_correct);
        assert!(!evaluate_question(&q, &answer_labels(&q, &[])).was_correct);
    }

    #[test]
    fn single_choice_ambiguity_uses_first_correct_option() {
        let many = choice_question(
            "q1",
            QuestionType::SingleChoice,
            &[("A", false), ("B", true), ("C", true)],
        );
        assert!(evaluate_question(&many, &answer_labels(&many, &["B"])).was_correct);
        assert!(!evaluate_question(&many, &answer_labels(&many, &["C"])).was_correct);

        let none = choice_question(
            "q2",
            QuestionType::SingleChoice,
            &[("A", false), ("B", false)],
        );
        assert!(!evaluate_question(&none, &answer_labels(&none, &["A"])).was_correct);
    }

    #[test]
    fn duplicate_option_texts_stay_distinct() {
        let q = choice_question(
            "q1",
            QuestionType::SingleChoice,
            &[("Same", false), ("Same", true)],
        );
        let picked_correct = StoredAnswer::capture(
            &q,
            &UiSelection::Options(vec![q.options[1].id.clone()]),
        );
        let picked_wrong = StoredAnswer::capture(
            &q,
            &UiSelection::Options(vec![q.options[0].id.clone()]),
        );
        assert!(evaluate_question(&q, &picked_correct).was_correct);
        assert!(!evaluate_question(&q, &picked_wrong).was_correct);
    }

    #[test]
    fn display_keeps_selection_order() {
        let q = choice_question(
            "q1",
            QuestionType::MultipleChoice,
            &[("A", true), ("B", false), ("C", true)],
        );
        let detail = evaluate_question(&q, &answer_labels(&q, &["C", "A"]));
        assert_eq!(detail.user_answer, "C; A");
    }

    #[test]
    fn evaluation_is_deterministic() {
        let pool = vec![
            choice_question(
                "q1",
                QuestionType::SingleChoice,
                &[("A", true), ("B", false)],
            ),
            text_question("q2", "Paris"),
            choice_question(
                "q3",
                QuestionType::MultipleChoice,
                &[("X", true), ("Y", true)],
            ),
        ];
        let test = crate::assembler::assemble(&"t1".into(), &pool, 3).unwrap();
        let mut answers = AnswerStore::new(&test);
        for (position, question) in test.questions.iter().enumerate() {
            let selection = match question.question_type {
                QuestionType::TextAnswer => UiSelection::Text("paris".into()),
                _ => UiSelection::Labels(vec!["A".into(), "X".into()]),
            };
            answers.record(position, question, &selection).unwrap();
        }

        let first = evaluate(&test, &answers);
        let second = evaluate(&test, &answers);
        assert_eq!(first, second);
        assert_eq!(first.total(), 3);
        assert_eq!(first.score, 2.0);
    }
}
