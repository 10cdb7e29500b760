//! The `quizmaker export` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizmaker_report::write_html_report;

use super::{not_found_as_none, open_store, parse_result_id};

pub async fn execute(
    result_id: String,
    format: String,
    output: PathBuf,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (_, store) = open_store(config_path)?;
    let result = store.load_result(&parse_result_id(&result_id)?).await?;

    match format.as_str() {
        "json" => result.save_json(&output)?,
        "html" => {
            // the test may have been removed since; export without its texts
            let test = not_found_as_none(store.load_test(&result.test_id).await)?;
            let questions = not_found_as_none(store.load_question_pool(&result.test_id).await)?
                .unwrap_or_default();
            write_html_report(&result, test.as_ref(), &questions, &output)?;
        }
        "text" => {
            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&output, result.summary())
                .with_context(|| format!("failed to write {}", output.display()))?;
        }
        other => anyhow::bail!("unknown format: {other} (expected json, html or text)"),
    }

    println!("Result {} exported to {}", result.id, output.display());
    Ok(())
}
