//! quizmaker CLI: authoring, test taking, and result export.

use std::path::PathBuf;
use std::process;

use clap::{ArgGroup, Parser, Subcommand};

mod commands;

use commands::QuestionFields;

#[derive(Parser)]
#[command(name = "quizmaker", version, about = "Randomized tests with automatic scoring")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create starter config and example test bank
    Init,

    /// Validate test bank TOML files
    Validate {
        /// Path to bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// Import test banks into the store
    Import {
        /// Path to bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// List stored tests
    List,

    /// Show a test with its questions and correct answers
    Show {
        /// Test ID
        #[arg(long)]
        test: String,
    },

    /// Create an empty test
    AddTest {
        /// Test ID (default: generated)
        #[arg(long)]
        id: Option<String>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Questions per attempt
        #[arg(long)]
        student_count: Option<usize>,
    },

    /// Add a question to a stored test
    AddQuestion {
        /// Test ID
        #[arg(long)]
        test: String,

        #[command(flatten)]
        fields: QuestionFields,
    },

    /// Edit a stored question
    EditQuestion {
        /// Question ID
        #[arg(long)]
        question: String,

        #[command(flatten)]
        fields: QuestionFields,
    },

    /// Edit the fields of a stored test
    EditTest {
        /// Test ID
        #[arg(long)]
        test: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Questions per attempt
        #[arg(long)]
        student_count: Option<usize>,
    },

    /// Remove a test (with its questions) or a single question
    #[command(group(ArgGroup::new("target").required(true).args(["test", "question"])))]
    Remove {
        /// Test ID
        #[arg(long)]
        test: Option<String>,

        /// Question ID
        #[arg(long)]
        question: Option<String>,
    },

    /// Take a test, answering on stdin
    Take {
        /// Test ID
        #[arg(long)]
        test: String,

        /// Number of questions (default: the test's own setting)
        #[arg(long)]
        count: Option<usize>,

        /// Email address stored with the result
        #[arg(long)]
        email: Option<String>,

        /// Seed for question and option order
        #[arg(long)]
        seed: Option<u64>,

        /// Print a mailto link for the result after saving
        #[arg(long)]
        mailto: bool,
    },

    /// Show stored results and statistics for a test
    Results {
        /// Test ID
        #[arg(long)]
        test: String,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Export one result to a file
    Export {
        /// Result ID
        #[arg(long)]
        result: String,

        /// Output format: json, html, text
        #[arg(long, default_value = "json")]
        format: String,

        /// Output file
        #[arg(long)]
        output: PathBuf,
    },

    /// Print a mailto link that shares a result
    Share {
        /// Result ID
        #[arg(long)]
        result: String,

        /// Recipient (default: the student's email)
        #[arg(long)]
        to: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizmaker=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Import { bank } => commands::import::execute(bank, config).await,
        Commands::List => commands::list::execute(config).await,
        Commands::Show { test } => commands::show::execute(test, config).await,
        Commands::AddTest {
            id,
            name,
            description,
            student_count,
        } => commands::add_test::execute(id, name, description, student_count, config).await,
        Commands::AddQuestion { test, fields } => {
            commands::add_question::execute(test, fields, config).await
        }
        Commands::EditQuestion { question, fields } => {
            commands::edit_question::execute(question, fields, config).await
        }
        Commands::EditTest {
            test,
            name,
            description,
            student_count,
        } => commands::edit_test::execute(test, name, description, student_count, config).await,
        Commands::Remove { test, question } => {
            commands::remove::execute(test, question, config).await
        }
        Commands::Take {
            test,
            count,
            email,
            seed,
            mailto,
        } => commands::take::execute(test, count, email, seed, mailto, config).await,
        Commands::Results { test, format } => {
            commands::results::execute(test, format, config).await
        }
        Commands::Export {
            result,
            format,
            output,
        } => commands::export::execute(result, format, output, config).await,
        Commands::Share { result, to } => commands::share::execute(result, to, config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
