//! The `quizmaker remove` command.

use std::path::PathBuf;

use anyhow::Result;

use quizmaker_core::model::{QuestionId, TestId};

use super::open_store;

pub async fn execute(
    test_id: Option<String>,
    question_id: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (_, store) = open_store(config_path)?;

    if let Some(test_id) = test_id {
        let test_id = TestId::from(test_id);
        let questions = store.load_question_pool(&test_id).await?.len();
        store.remove_test(&test_id).await?;
        println!("Removed test {test_id} and {questions} question(s).");
    }

    if let Some(question_id) = question_id {
        let question_id = QuestionId::from(question_id);
        store.remove_question(&question_id).await?;
        println!("Removed question {question_id}.");
    }

    Ok(())
}
