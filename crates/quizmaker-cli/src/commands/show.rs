//! The `quizmaker show` command.

use std::path::PathBuf;

use anyhow::Result;

use quizmaker_core::model::{QuestionType, TestId};

use super::open_store;

pub async fn execute(test_id: String, config_path: Option<PathBuf>) -> Result<()> {
    let (_, store) = open_store(config_path)?;
    let test_id = TestId::from(test_id);
    let test = store.load_test(&test_id).await?;
    let pool = store.load_question_pool(&test_id).await?;

    println!("{} [{}]", test.name, test.id);
    if !test.description.is_empty() {
        println!("{}", test.description);
    }
    println!(
        "{} questions, {} per attempt",
        pool.len(),
        test.student_count.min(pool.len())
    );

    for (i, question) in pool.iter().enumerate() {
        println!(
            "\n{}. ({}) {} [{}]",
            i + 1,
            question.question_type,
            question.text,
            question.id
        );
        match question.question_type {
            QuestionType::TextAnswer => println!("   expected: {}", question.expected_text),
            _ => {
                for option in &question.options {
                    let mark = if option.is_correct { "x" } else { " " };
                    println!("   [{mark}] {}", option.text);
                }
            }
        }
    }

    Ok(())
}
