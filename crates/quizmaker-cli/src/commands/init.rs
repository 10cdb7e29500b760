//! The `quizmaker init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create quizmaker.toml
    if std::path::Path::new("quizmaker.toml").exists() {
        println!("quizmaker.toml already exists, skipping.");
    } else {
        std::fs::write("quizmaker.toml", SAMPLE_CONFIG)?;
        println!("Created quizmaker.toml");
    }

    // Create example bank
    std::fs::create_dir_all("banks")?;
    let example_path = std::path::Path::new("banks/example.toml");
    if example_path.exists() {
        println!("banks/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_BANK)?;
        println!("Created banks/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: quizmaker validate --bank banks/example.toml");
    println!("  2. Run: quizmaker import --bank banks");
    println!("  3. Run: quizmaker take --test example");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizmaker configuration

email_subject = "Test result"

[store]
type = "json"
path = "./quizmaker-data.json"
"#;

const EXAMPLE_BANK: &str = r#"[test]
id = "example"
name = "Example Test"
description = "A small test to get started"
student_count = 3

[[questions]]
text = "What is the capital of France?"
type = "text"
expected = "Paris"

[[questions]]
text = "Which of these numbers are prime?"
type = "multiple"
options = [
  { text = "2", correct = true },
  { text = "4" },
  { text = "5", correct = true },
  { text = "9" },
]

[[questions]]
text = "Which is the largest ocean?"
type = "single"
options = [
  { text = "Atlantic" },
  { text = "Pacific", correct = true },
  { text = "Indian" },
]

[[questions]]
text = "How many sides does a hexagon have?"
type = "text"
expected = "6"
"#;
