//! The `quizmaker validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizmaker_core::parser::{load_banks, validate_bank, validate_question_ownership};

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let banks = load_banks(&bank_path)?;

    let mut total_warnings = 0;

    for bank in &banks {
        println!(
            "Test: {} [{}] ({} questions, {} per attempt)",
            bank.test.name,
            bank.test.id,
            bank.questions.len(),
            bank.test.student_count
        );

        let warnings = validate_bank(bank);
        for w in &warnings {
            let prefix = w
                .question_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    let shared = validate_question_ownership(&banks);
    for w in &shared {
        println!("WARNING: {}", w.message);
    }
    total_warnings += shared.len();

    if total_warnings == 0 {
        println!("All test banks valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
