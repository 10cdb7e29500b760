//! Per-attempt answer storage.
//!
//! One slot per assembled position. The presentation layer records what is
//! currently selected or typed before leaving a question, and restores it
//! when the question is shown again.

use serde::{Deserialize, Serialize};

use crate::assembler::AssembledTest;
use crate::error::QuizError;
use crate::model::{OptionId, Question, QuestionId};

/// What the presentation layer reports as the current input for a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiSelection {
    /// Labels of the checked options, as displayed.
    Labels(Vec<String>),
    /// Identifiers of the checked options.
    Options(Vec<OptionId>),
    /// Typed answer of a text question.
    Text(String),
    /// Nothing selected or typed.
    Empty,
}

/// The captured answer for one position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAnswer {
    pub question_id: Option<QuestionId>,
    /// Selected options in selection order, without duplicates.
    #[serde(default)]
    pub selected: Vec<OptionId>,
    /// Trimmed free text.
    #[serde(default)]
    pub free_text: String,
}

impl StoredAnswer {
    /// Capture a selection against `question`.
    ///
    /// Labels resolve to the first option with exactly that text; labels that
    /// match nothing are dropped.
    pub fn capture(question: &Question, selection: &UiSelection) -> Self {
        let mut answer = StoredAnswer {
            question_id: Some(question.id.clone()),
            ..Default::default()
        };

        match selection {
            UiSelection::Text(text) => answer.free_text = text.trim().to_string(),
            UiSelection::Options(ids) => {
                for id in ids {
                    answer.push_selected(id.clone());
                }
            }
            UiSelection::Labels(labels) => {
                for label in labels {
                    match question.options.iter().find(|o| &o.text == label) {
                        Some(option) => answer.push_selected(option.id.clone()),
                        None => tracing::debug!(
                            "question {}: no option labelled '{label}', ignoring",
                            question.id
                        ),
                    }
                }
            }
            UiSelection::Empty => {}
        }

        answer
    }

    fn push_selected(&mut self, id: OptionId) {
        if !self.selected.contains(&id) {
            self.selected.push(id);
        }
    }

    /// True when nothing was selected or typed.
    pub fn is_blank(&self) -> bool {
        self.selected.is_empty() && self.free_text.is_empty()
    }
}

/// Fixed-size store of answers for one assembled test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerStore {
    slots: Vec<StoredAnswer>,
}

impl AnswerStore {
    /// An empty slot for every question of `test`.
    pub fn new(test: &AssembledTest) -> Self {
        Self {
            slots: vec![StoredAnswer::default(); test.len()],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Overwrite the slot at `position` with the current selection.
    ///
    /// Recording the same selection twice leaves the same state.
    pub fn record(
        &mut self,
        position: usize,
        question: &Question,
        selection: &UiSelection,
    ) -> Result<(), QuizError> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(position)
            .ok_or(QuizError::PositionOutOfRange { position, len })?;
        *slot = StoredAnswer::capture(question, selection);
        Ok(())
    }

    /// The answer previously recorded at `position`, or the empty default.
    pub fn restore(&self, position: usize) -> Result<&StoredAnswer, QuizError> {
        self.slots.get(position).ok_or(QuizError::PositionOutOfRange {
            position,
            len: self.slots.len(),
        })
    }

    pub(crate) fn slot(&self, position: usize) -> &StoredAnswer {
        &self.slots[position]
    }

    pub fn answered_count(&self) -> usize {
        self.slots.iter().filter(|a| !a.is_blank()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StoredAnswer> {
        self.slots.iter()
    }
}
