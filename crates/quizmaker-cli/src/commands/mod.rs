pub mod add_question;
pub mod add_test;
pub mod edit_question;
pub mod export;
pub mod import;
pub mod init;
pub mod list;
pub mod remove;
pub mod results;
pub mod share;
pub mod show;
pub mod take;
pub mod validate;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use uuid::Uuid;

use quizmaker_core::authoring::{OptionDraft, QuestionDraft};
use quizmaker_core::error::StoreError;
use quizmaker_core::model::QuestionType;
use quizmaker_core::traits::QuizStore;
use quizmaker_store::{create_store, load_config_from, QuizmakerConfig};

/// Load the configuration and open the store it names.
pub fn open_store(config_path: Option<PathBuf>) -> Result<(QuizmakerConfig, Box<dyn QuizStore>)> {
    let config = load_config_from(config_path.as_deref())?;
    let store = create_store(&config.store)?;
    tracing::debug!("using {} store", store.name());
    Ok((config, store))
}

pub fn parse_result_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).with_context(|| format!("invalid result ID: {raw}"))
}

/// Question fields given on the command line. Fields left out keep their
/// current value.
#[derive(Debug, Default, Args)]
pub struct QuestionFields {
    /// Question text
    #[arg(long)]
    pub text: Option<String>,

    /// Question type: single, multiple, text
    #[arg(long = "type")]
    pub question_type: Option<QuestionType>,

    /// Answer option, repeatable; a leading `*` marks it correct. Replaces
    /// all existing options.
    #[arg(long = "option")]
    pub options: Vec<String>,

    /// Expected answer of a text question
    #[arg(long)]
    pub expected: Option<String>,
}

impl QuestionFields {
    /// Overwrite the given fields of `draft`. Options whose text the draft
    /// already has keep their ids.
    pub fn apply_to(self, draft: &mut QuestionDraft) {
        if let Some(text) = self.text {
            draft.text = text;
        }
        if let Some(question_type) = self.question_type {
            draft.question_type = question_type;
        }
        if let Some(expected) = self.expected {
            draft.expected_text = expected;
        }
        if !self.options.is_empty() {
            let existing = std::mem::take(&mut draft.options);
            draft.options = self
                .options
                .iter()
                .map(|entry| option_draft(entry, &existing))
                .collect();
        }
    }
}

fn option_draft(entry: &str, existing: &[OptionDraft]) -> OptionDraft {
    let entry = entry.trim();
    let (text, is_correct) = match entry.strip_prefix('*') {
        Some(rest) => (rest.trim(), true),
        None => (entry, false),
    };
    OptionDraft {
        id: existing
            .iter()
            .find(|o| o.text == text)
            .and_then(|o| o.id.clone()),
        text: text.to_string(),
        is_correct,
    }
}

/// Turn a missing-record error into `None`. Any other store error, such as
/// an unreadable store file, is passed through.
pub fn not_found_as_none<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.downcast_ref::<StoreError>().is_some_and(StoreError::is_not_found) => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_replace_options_and_keep_known_ids() {
        let mut draft = QuestionDraft {
            text: "Largest ocean?".into(),
            options: vec![
                OptionDraft {
                    id: Some("o-atlantic".into()),
                    text: "Atlantic".into(),
                    is_correct: true,
                },
                OptionDraft {
                    id: Some("o-pacific".into()),
                    text: "Pacific".into(),
                    is_correct: false,
                },
            ],
            ..Default::default()
        };

        QuestionFields {
            options: vec!["Atlantic".into(), " * Pacific ".into(), "Indian".into()],
            ..Default::default()
        }
        .apply_to(&mut draft);

        assert_eq!(draft.text, "Largest ocean?");
        let ids: Vec<_> = draft.options.iter().map(|o| o.id.clone()).collect();
        assert_eq!(ids, vec![Some("o-atlantic".into()), Some("o-pacific".into()), None]);
        let correct: Vec<_> = draft.options.iter().map(|o| o.is_correct).collect();
        assert_eq!(correct, vec![false, true, false]);
        assert_eq!(draft.options[1].text, "Pacific");
    }

    #[test]
    fn empty_fields_change_nothing() {
        let mut draft = QuestionDraft {
            text: "Q".into(),
            question_type: QuestionType::TextAnswer,
            expected_text: "x".into(),
            ..Default::default()
        };
        QuestionFields::default().apply_to(&mut draft);
        assert_eq!(draft.text, "Q");
        assert_eq!(draft.question_type, QuestionType::TextAnswer);
        assert_eq!(draft.expected_text, "x");
    }

    #[test]
    fn only_missing_records_become_none() {
        let missing: Result<u8> = Err(StoreError::TestNotFound("geo".into()).into());
        assert!(not_found_as_none(missing).unwrap().is_none());

        let found: Result<u8> = Ok(7);
        assert_eq!(not_found_as_none(found).unwrap(), Some(7));

        let broken: Result<u8> = Err(StoreError::Unavailable("disk gone".into()).into());
        let err = not_found_as_none(broken).unwrap_err();
        assert!(err.to_string().contains("disk gone"));

        let other: Result<u8> = Err(anyhow::anyhow!("parse failure"));
        assert!(not_found_as_none(other).is_err());
    }
}
