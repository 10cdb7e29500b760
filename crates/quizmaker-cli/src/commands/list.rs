//! The `quizmaker list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use super::open_store;

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let (_, store) = open_store(config_path)?;
    let tests = store.load_tests().await?;

    if tests.is_empty() {
        println!("No tests stored. Run `quizmaker import --bank <path>` to add some.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Questions", "Per attempt", "Results"]);

    for test in &tests {
        let pool = store.load_question_pool(&test.id).await?;
        let results = store.load_results(&test.id).await?;
        table.add_row(vec![
            Cell::new(&test.id),
            Cell::new(&test.name),
            Cell::new(pool.len()),
            Cell::new(test.student_count.min(pool.len())),
            Cell::new(results.len()),
        ]);
    }

    println!("{table}");
    Ok(())
}
