// src/config/mod.rs

//! Configuration loading and compilation for watchhook.
//!
//! Responsibilities:
//! - Read and parse the YAML document (`loader.rs`).
//! - Check the document's structure (`validate.rs`).
//! - Define typed fragments for each entry (`model.rs`).
//! - Build the callback registry, task list and logging sinks (`compile.rs`).

pub mod compile;
pub mod loader;
pub mod model;
pub mod validate;

pub use compile::{compile, compile_callbacks, compile_logging, compile_tasks, CompiledConfig};
pub use loader::{load_and_compile, load_document, parse_document};
pub use model::{LogFileSection, LogJournalSection, LogStderrSection, LoggingConfig};
