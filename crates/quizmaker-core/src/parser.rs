//! TOML test bank parser.
//!
//! Loads tests and their question pools from TOML files and directories, and
//! validates them.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::authoring::{
    apply_question_edits, apply_test_edits, OptionDraft, QuestionDraft, TestDraft,
};
use crate::model::{OptionId, Question, QuestionId, QuestionType, Test, TestId};

/// A test together with its question pool.
#[derive(Debug, Clone)]
pub struct TestBank {
    pub test: Test,
    pub questions: Vec<Question>,
}

/// Intermediate TOML structure for parsing bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    test: TomlTestHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlTestHeader {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    student_count: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    #[serde(default)]
    id: Option<String>,
    text: String,
    #[serde(rename = "type", default)]
    question_type: QuestionType,
    #[serde(default)]
    options: Vec<TomlOption>,
    #[serde(default)]
    expected: String,
}

#[derive(Debug, Deserialize)]
struct TomlOption {
    text: String,
    #[serde(default)]
    correct: bool,
}

/// Parse a single TOML file into a `TestBank`.
pub fn parse_test_bank(path: &Path) -> Result<TestBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read test bank file: {}", path.display()))?;

    parse_test_bank_str(&content, path)
}

/// Parse a TOML string into a `TestBank`.
///
/// Missing ids are derived from the content: the test id from the file stem,
/// question ids from the test id and the question text, option ids from the
/// question id and the option text. Inserting or reordering questions keeps
/// every other id, so results recorded before a re-import still point at the
/// question they were given for.
pub fn parse_test_bank_str(content: &str, source_path: &Path) -> Result<TestBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let test_id = match parsed.test.id {
        Some(id) => TestId::from(id),
        None => source_path
            .file_stem()
            .map(|s| TestId::from(s.to_string_lossy().into_owned()))
            .unwrap_or_else(TestId::generate),
    };

    let test = apply_test_edits(TestDraft {
        id: Some(test_id.clone()),
        name: parsed.test.name,
        description: parsed.test.description,
        student_count: parsed.test.student_count,
    })
    .with_context(|| format!("invalid test header in {}", source_path.display()))?;

    // explicit ids win over derived ones
    let mut taken: HashSet<String> = parsed
        .questions
        .iter()
        .filter_map(|q| q.id.clone())
        .collect();

    let questions = parsed
        .questions
        .into_iter()
        .enumerate()
        .map(|(i, q)| {
            let question_id = QuestionId::from(match q.id {
                Some(id) => id,
                None => derive_id(test_id.as_str(), &q.text, "question", &mut taken),
            });

            let mut option_ids = HashSet::new();
            let options = q
                .options
                .into_iter()
                .map(|o| OptionDraft {
                    id: Some(OptionId::from(derive_id(
                        question_id.as_str(),
                        &o.text,
                        "option",
                        &mut option_ids,
                    ))),
                    text: o.text,
                    is_correct: o.correct,
                })
                .collect();

            apply_question_edits(QuestionDraft {
                id: Some(question_id),
                test_id: test_id.clone(),
                text: q.text,
                question_type: q.question_type,
                options,
                expected_text: q.expected,
            })
            .with_context(|| {
                format!("question {} in {} is invalid", i + 1, source_path.display())
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TestBank { test, questions })
}

const MAX_SLUG_LEN: usize = 40;

/// Lowercase alphanumeric words of `text` joined by `-`.
fn slug(text: &str) -> String {
    let mut out = String::new();
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        if out.chars().count() >= MAX_SLUG_LEN {
            break;
        }
        if !out.is_empty() {
            out.push('-');
        }
        out.extend(word.chars().flat_map(char::to_lowercase));
    }
    out
}

/// `<prefix>-<slug of text>`, suffixed with `-2`, `-3`, ... until it is not
/// in `taken`. The result is added to `taken`.
fn derive_id(prefix: &str, text: &str, fallback: &str, taken: &mut HashSet<String>) -> String {
    let slug = slug(text);
    let base = format!("{prefix}-{}", if slug.is_empty() { fallback } else { slug.as_str() });

    let mut candidate = base.clone();
    let mut n = 2;
    while taken.contains(&candidate) {
        candidate = format!("{base}-{n}");
        n += 1;
    }
    taken.insert(candidate.clone());
    candidate
}

/// Recursively load all `.toml` bank files from a directory.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<TestBank>> {
    let mut banks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            banks.extend(load_bank_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_test_bank(&path) {
                Ok(bank) => banks.push(bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(banks)
}

/// Load a single bank file, or every bank under a directory.
pub fn load_banks(path: &Path) -> Result<Vec<TestBank>> {
    if path.is_dir() {
        load_bank_directory(path)
    } else {
        Ok(vec![parse_test_bank(path)?])
    }
}

/// A warning from bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<QuestionId>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn question(question: &Question, message: impl Into<String>) -> Self {
        Self {
            question_id: Some(question.id.clone()),
            message: message.into(),
        }
    }
}

/// Find question IDs used by more than one bank. A question belongs to
/// exactly one test, so such banks cannot be stored side by side.
pub fn validate_question_ownership(banks: &[TestBank]) -> Vec<ValidationWarning> {
    let mut owners: HashMap<&QuestionId, &TestId> = HashMap::new();
    let mut warnings = Vec::new();

    for bank in banks {
        for question in &bank.questions {
            match owners.get(&question.id) {
                Some(owner) if *owner != &bank.test.id => {
                    warnings.push(ValidationWarning::question(
                        question,
                        format!(
                            "question ID {} is used by both test {} and test {}",
                            question.id, owner, bank.test.id
                        ),
                    ));
                }
                Some(_) => {}
                None => {
                    owners.insert(&question.id, &bank.test.id);
                }
            }
        }
    }

    warnings
}

/// Validate a bank for problems that make questions unanswerable or attempts
/// smaller than configured.
pub fn validate_bank(bank: &TestBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if bank.questions.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "test has no questions; no attempt can be started".into(),
        });
    } else if bank.test.student_count > bank.questions.len() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: format!(
                "student_count is {} but the pool only has {} questions",
                bank.test.student_count,
                bank.questions.len()
            ),
        });
    }

    let mut seen_ids = HashSet::new();
    for question in &bank.questions {
        if !seen_ids.insert(&question.id) {
            warnings.push(ValidationWarning::question(
                question,
                format!("duplicate question ID: {}", question.id),
            ));
        }
    }

    for question in &bank.questions {
        let mut seen_texts = HashSet::new();
        for option in &question.options {
            if !seen_texts.insert(option.text.as_str()) {
                warnings.push(ValidationWarning::question(
                    question,
                    format!("option text '{}' appears more than once", option.text),
                ));
            }
        }

        let correct = question.correct_options().count();
        match question.question_type {
            QuestionType::TextAnswer if question.expected_text.trim().is_empty() => {
                warnings.push(ValidationWarning::question(
                    question,
                    "expected answer is empty; the question can never be answered correctly",
                ));
            }
            QuestionType::SingleChoice if correct != 1 => {
                warnings.push(ValidationWarning::question(
                    question,
                    format!("single choice question has {correct} correct options"),
                ));
            }
            QuestionType::MultipleChoice if correct == 0 => {
                warnings.push(ValidationWarning::question(
                    question,
                    "multiple choice question has no correct option",
                ));
            }
            _ => {}
        }
    }

    warnings
}
