//! The `quizmaker edit-question` command.

use std::path::PathBuf;

use anyhow::Result;

use quizmaker_core::authoring::{apply_question_edits, QuestionDraft};
use quizmaker_core::model::QuestionId;

use super::{open_store, QuestionFields};

pub async fn execute(
    question_id: String,
    fields: QuestionFields,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (_, store) = open_store(config_path)?;
    let question = store.load_question(&QuestionId::from(question_id)).await?;

    let mut draft = QuestionDraft::from(&question);
    fields.apply_to(&mut draft);
    let edited = apply_question_edits(draft)?;
    if edited == question {
        println!("Nothing to change.");
        return Ok(());
    }

    store.upsert_question(&edited).await?;
    println!(
        "Updated question {} ({}, {} option(s))",
        edited.id,
        edited.question_type,
        edited.options.len()
    );
    Ok(())
}
