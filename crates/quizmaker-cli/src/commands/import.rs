//! The `quizmaker import` command.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};

use quizmaker_core::error::StoreError;
use quizmaker_core::parser::{load_banks, validate_bank, validate_question_ownership, TestBank};
use quizmaker_core::traits::QuizStore;

use super::{not_found_as_none, open_store};

pub async fn execute(bank_path: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let banks = load_banks(&bank_path)?;
    if banks.is_empty() {
        anyhow::bail!("no test banks found in {}", bank_path.display());
    }

    let shared = validate_question_ownership(&banks);
    if !shared.is_empty() {
        let messages: Vec<_> = shared.iter().map(|w| w.message.as_str()).collect();
        anyhow::bail!("{}", messages.join("; "));
    }

    let (_, store) = open_store(config_path)?;

    // nothing is written unless every bank can be stored
    for bank in &banks {
        check_ownership(store.as_ref(), bank).await?;
    }

    for bank in &banks {
        for w in validate_bank(bank) {
            tracing::warn!("{}: {}", bank.test.id, w.message);
        }
        let removed = import_bank(store.as_ref(), bank).await?;

        print!(
            "Imported '{}' [{}]: {} questions",
            bank.test.name,
            bank.test.id,
            bank.questions.len()
        );
        if removed > 0 {
            print!(", {removed} removed");
        }
        println!();
    }

    Ok(())
}

/// Fail if a question of `bank` is already stored under another test.
async fn check_ownership(store: &dyn QuizStore, bank: &TestBank) -> Result<()> {
    for question in &bank.questions {
        let stored = not_found_as_none(store.load_question(&question.id).await)?;
        if let Some(stored) = stored.filter(|q| q.test_id != bank.test.id) {
            return Err(StoreError::QuestionOwnedElsewhere {
                question_id: question.id.clone(),
                owner: stored.test_id,
                test_id: bank.test.id.clone(),
            }
            .into());
        }
    }
    Ok(())
}

/// Store the bank's test and questions. The stored pool is replaced: questions
/// the bank no longer lists are removed. Returns how many were removed.
async fn import_bank(store: &dyn QuizStore, bank: &TestBank) -> Result<usize> {
    let existing = not_found_as_none(store.load_question_pool(&bank.test.id).await)?
        .unwrap_or_default();

    store
        .upsert_test(&bank.test)
        .await
        .with_context(|| format!("failed to store test {}", bank.test.id))?;

    let keep: HashSet<_> = bank.questions.iter().map(|q| &q.id).collect();
    let mut removed = 0;
    for stale in existing.iter().filter(|q| !keep.contains(&q.id)) {
        store.remove_question(&stale.id).await?;
        removed += 1;
    }

    for question in &bank.questions {
        store
            .upsert_question(question)
            .await
            .with_context(|| format!("failed to store question {}", question.id))?;
    }

    tracing::info!(
        "imported test {} into {} store",
        bank.test.id,
        store.name()
    );
    Ok(removed)
}
