//! The `quizmaker share` command.

use std::path::PathBuf;

use anyhow::Result;

use quizmaker_report::compose_email_with_subject;

use super::{not_found_as_none, open_store, parse_result_id};

pub async fn execute(
    result_id: String,
    to: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (config, store) = open_store(config_path)?;
    let result = store.load_result(&parse_result_id(&result_id)?).await?;
    let test_name = not_found_as_none(store.load_test(&result.test_id).await)?.map(|t| t.name);

    let recipient = to.as_deref().or(result.student_email.as_deref());
    let draft = compose_email_with_subject(
        &config.email_subject,
        recipient,
        test_name.as_deref(),
        &result,
    );

    println!("{}", draft.mailto_url()?);
    Ok(())
}
