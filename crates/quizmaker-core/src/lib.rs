//! quizmaker-core: Test assembly, answer capture, and scoring.
//!
//! This crate defines the data model, the persistence trait, and the attempt
//! engine that the rest of quizmaker builds on: a random subset of a test's
//! pool is assembled per student, answers are captured per position, and the
//! attempt is scored and packaged into a [`report::QuizResult`].

pub mod answers;
pub mod assembler;
pub mod authoring;
pub mod error;
pub mod evaluation;
pub mod model;
pub mod parser;
pub mod report;
pub mod session;
pub mod statistics;
pub mod traits;
