//! The `quizmaker take` command.
//!
//! Student mode on stdin. Each question is printed with numbered options in
//! presentation order; an answer line records the answer and moves on. The
//! words `:back`, `:next`, `:submit` and `:quit` are commands; anything else
//! is an answer, and a leading `\` is dropped so `\:quit` can be typed as a
//! text answer. End of input submits.

use std::path::PathBuf;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use quizmaker_core::answers::UiSelection;
use quizmaker_core::error::SubmitError;
use quizmaker_core::model::{AnswerOption, QuestionType, TestId};
use quizmaker_core::report::QuizResult;
use quizmaker_core::session::QuizSession;
use quizmaker_core::traits::QuizStore;
use quizmaker_report::compose_email_with_subject;

use super::open_store;

const HELP: &str = "Commands: :back, :next, :submit, :quit (empty line keeps the answer)";

/// One line of student input.
#[derive(Debug, PartialEq)]
enum Input<'a> {
    Quit,
    Submit,
    Back,
    Next,
    Answer(&'a str),
}

fn classify(line: &str) -> Input<'_> {
    match line.trim() {
        ":quit" => Input::Quit,
        ":submit" => Input::Submit,
        ":back" => Input::Back,
        ":next" | "" => Input::Next,
        answer => Input::Answer(answer.strip_prefix('\\').unwrap_or(answer)),
    }
}

pub async fn execute(
    test_id: String,
    count: Option<usize>,
    email: Option<String>,
    seed: Option<u64>,
    mailto: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (config, store) = open_store(config_path)?;
    let test_id = TestId::from(test_id);

    let mut session = match seed {
        Some(seed) => QuizSession::start_seeded(store.as_ref(), &test_id, count, seed).await?,
        None => QuizSession::start(store.as_ref(), &test_id, count).await?,
    };

    println!(
        "{}: {} question(s). {HELP}",
        session.test().name,
        session.len()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    if !answer_questions(&mut session, &mut lines).await? {
        println!("Attempt cancelled, nothing was saved.");
        return Ok(());
    }

    let result = match session.submit(store.as_ref(), email.as_deref()).await {
        Ok(result) => result,
        Err(SubmitError::Persist { result, source }) => {
            retry_save(store.as_ref(), *result, source, &mut lines).await?
        }
    };

    println!("\nResult saved [{}]", result.id);
    print!("{}", result.summary());

    if mailto {
        let draft = compose_email_with_subject(
            &config.email_subject,
            result.student_email.as_deref(),
            Some(&session.test().name),
            &result,
        );
        println!("\n{}", draft.mailto_url()?);
    }

    Ok(())
}

/// Run the question loop. Returns `false` when the student quits.
async fn answer_questions(
    session: &mut QuizSession,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<bool> {
    print_question(session)?;

    loop {
        let Some(line) = lines.next_line().await? else {
            println!("\nEnd of input, submitting.");
            return Ok(true);
        };

        match classify(&line) {
            Input::Quit => return Ok(false),
            Input::Submit => return Ok(true),
            Input::Back => {
                if !session.previous() {
                    println!("Already at the first question.");
                    continue;
                }
            }
            Input::Next => {
                if !session.next() {
                    println!("This is the last question. Type :submit to finish.");
                    continue;
                }
            }
            Input::Answer(input) => {
                let question_type = session.current_question().question_type;
                if question_type.is_choice() && input.starts_with(':') {
                    println!("Unknown command {input}. {HELP}");
                    continue;
                }
                let parsed = {
                    let options = session.assembled().presented_options(session.position())?;
                    parse_answer(question_type, &options, input)
                };
                match parsed {
                    Ok(selection) => session.record_current(&selection)?,
                    Err(message) => {
                        println!("{message}");
                        continue;
                    }
                }
                if !session.next() {
                    println!(
                        "All questions visited ({} answered). Type :submit to finish or :back to review.",
                        session.answers().answered_count()
                    );
                    continue;
                }
            }
        }

        print_question(session)?;
    }
}

/// Turn an input line into a selection. Option numbers refer to the order
/// the options were printed in.
fn parse_answer(
    question_type: QuestionType,
    options: &[&AnswerOption],
    input: &str,
) -> Result<UiSelection, String> {
    if question_type == QuestionType::TextAnswer {
        return Ok(UiSelection::Text(input.to_string()));
    }

    let picks = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| match s.parse::<usize>() {
            Ok(n) if (1..=options.len()).contains(&n) => Ok(options[n - 1].id.clone()),
            _ => Err(format!(
                "'{s}' is not an option number between 1 and {}",
                options.len()
            )),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if question_type == QuestionType::SingleChoice && picks.len() > 1 {
        return Err("Pick exactly one option.".to_string());
    }
    Ok(UiSelection::Options(picks))
}

fn print_question(session: &QuizSession) -> Result<()> {
    let question = session.current_question();
    let answer = session.current_answer();

    println!(
        "\nQuestion {}/{}: {}",
        session.position() + 1,
        session.len(),
        question.text
    );

    match question.question_type {
        QuestionType::TextAnswer => {
            if !answer.free_text.is_empty() {
                println!("  (current answer: {})", answer.free_text);
            }
            println!("Type your answer:");
        }
        question_type => {
            let options = session.assembled().presented_options(session.position())?;
            for (i, option) in options.iter().enumerate() {
                let mark = if answer.selected.contains(&option.id) {
                    "x"
                } else {
                    " "
                };
                println!("  [{mark}] {}) {}", i + 1, option.text);
            }
            if question_type == QuestionType::SingleChoice {
                println!("Pick one option number:");
            } else {
                println!("Pick option numbers, separated by commas or spaces:");
            }
        }
    }

    Ok(())
}

/// Keep offering to save a scored result until it is stored or the student
/// gives up.
async fn retry_save(
    store: &dyn QuizStore,
    mut result: QuizResult,
    mut error: anyhow::Error,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<QuizResult> {
    println!("\n{}", result.summary());

    loop {
        println!("Saving the result failed: {error:#}");
        println!("Press Enter to retry, or type :quit to discard the result.");

        match lines.next_line().await? {
            Some(line) if line.trim() != ":quit" => {}
            _ => anyhow::bail!("result was not saved: {error:#}"),
        }

        match QuizSession::save(store, result).await {
            Ok(saved) => return Ok(saved),
            Err(SubmitError::Persist {
                result: failed,
                source,
            }) => {
                result = *failed;
                error = source;
            }
        }
    }
}
