//! The `quizmaker results` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizmaker_core::model::TestId;
use quizmaker_core::statistics::summarize_results;

use super::open_store;

pub async fn execute(test_id: String, format: String, config_path: Option<PathBuf>) -> Result<()> {
    let (_, store) = open_store(config_path)?;
    let test_id = TestId::from(test_id);
    let test = store.load_test(&test_id).await?;
    let results = store.load_results(&test_id).await?;
    let stats = summarize_results(&test_id, &results);

    match format.as_str() {
        "json" => {
            let out = serde_json::json!({
                "test": test,
                "statistics": stats,
                "results": results,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        "text" => {
            println!("{} [{}]: {} attempt(s)", test.name, test.id, stats.attempts);
            if results.is_empty() {
                return Ok(());
            }

            let mut table = Table::new();
            table.set_header(vec!["Result", "Student", "Score", "Submitted"]);
            for r in &results {
                table.add_row(vec![
                    Cell::new(r.id),
                    Cell::new(r.student_email.as_deref().unwrap_or("-")),
                    Cell::new(format!("{} / {}", r.score, r.total)),
                    Cell::new(r.created_at.format("%Y-%m-%d %H:%M:%S")),
                ]);
            }
            println!("{table}");

            println!(
                "Mean {:.1}% | best {:.1}% | worst {:.1}%",
                stats.mean_percentage, stats.best_percentage, stats.worst_percentage
            );

            let mut per_question = Table::new();
            per_question.set_header(vec!["Question", "Asked", "Correct", "Rate"]);
            for q in &stats.per_question {
                per_question.add_row(vec![
                    Cell::new(&q.question_id),
                    Cell::new(q.attempts),
                    Cell::new(q.correct),
                    Cell::new(format!("{:.1}%", q.rate * 100.0)),
                ]);
            }
            println!("{per_question}");
        }
        other => anyhow::bail!("unknown format: {other} (expected text or json)"),
    }

    Ok(())
}
