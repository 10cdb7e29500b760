//! quizmaker-store: Persistence backends.
//!
//! Implements the `QuizStore` trait over a single JSON file and over process
//! memory, plus the configuration that picks between them.

pub mod config;
pub mod data;
pub mod json;
pub mod memory;

pub use config::{create_store, load_config, load_config_from, QuizmakerConfig, StoreConfig};
pub use data::StoreData;
pub use json::JsonFileStore;
pub use memory::InMemoryStore;
