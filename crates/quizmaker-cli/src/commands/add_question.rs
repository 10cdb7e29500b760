//! The `quizmaker add-question` command.

use std::path::PathBuf;

use anyhow::Result;

use quizmaker_core::authoring::{apply_question_edits, new_question, QuestionDraft};
use quizmaker_core::model::TestId;

use super::{open_store, QuestionFields};

/// Add a question to a test. Fields not given come from the starter
/// question: single choice, two options, the first one correct.
pub async fn execute(
    test_id: String,
    fields: QuestionFields,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (_, store) = open_store(config_path)?;
    let test = store.load_test(&TestId::from(test_id)).await?;

    let mut draft = QuestionDraft::from(&new_question(&test.id));
    fields.apply_to(&mut draft);
    let question = apply_question_edits(draft)?;

    store.upsert_question(&question).await?;
    println!(
        "Added question {} to '{}' ({}, {} option(s))",
        question.id,
        test.name,
        question.question_type,
        question.options.len()
    );
    Ok(())
}
