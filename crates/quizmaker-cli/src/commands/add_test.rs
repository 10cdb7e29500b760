//! The `quizmaker add-test` command.

use std::path::PathBuf;

use anyhow::Result;

use quizmaker_core::authoring::{apply_test_edits, new_test, TestDraft};
use quizmaker_core::model::TestId;

use super::{not_found_as_none, open_store};

/// Create a test, starting from the starter record for any field not given.
pub async fn execute(
    id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    student_count: Option<usize>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (_, store) = open_store(config_path)?;

    let mut draft = TestDraft::from(&new_test());
    if let Some(id) = id {
        draft.id = Some(TestId::from(id));
    }
    if let Some(name) = name {
        draft.name = name;
    }
    if let Some(description) = description {
        draft.description = description;
    }
    if student_count.is_some() {
        draft.student_count = student_count;
    }

    let test = apply_test_edits(draft)?;
    if not_found_as_none(store.load_test(&test.id).await)?.is_some() {
        anyhow::bail!("test {} already exists; use edit-test to change it", test.id);
    }

    store.upsert_test(&test).await?;
    println!(
        "Added '{}' [{}]: {} per attempt",
        test.name, test.id, test.student_count
    );
    Ok(())
}
