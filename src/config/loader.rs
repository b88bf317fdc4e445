// src/config/loader.rs

use std::fs;
use std::path::Path;

use serde_yaml::Value;
use tracing::debug;

use crate::callbacks::CallbackContext;
use crate::config::compile::{compile, CompiledConfig};
use crate::errors::Result;

/// Load a configuration file and return the raw document tree.
///
/// This only performs YAML parsing; it does **not** check structure or build
/// any entity. Use [`load_and_compile`] for that.
pub fn load_document(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    debug!(?path, "loading config document");
    let contents = fs::read_to_string(path)?;
    parse_document(&contents)
}

/// Parse YAML text into a document tree.
///
/// Parse errors carry the line/column of the problem.
pub fn parse_document(contents: &str) -> Result<Value> {
    let doc: Value = serde_yaml::from_str(contents)?;
    Ok(doc)
}

/// Load a configuration file and compile it into callbacks, tasks and
/// logging sinks, using the production command runner.
pub fn load_and_compile(path: impl AsRef<Path>) -> Result<CompiledConfig> {
    let doc = load_document(path)?;
    compile(&doc, &CallbackContext::default())
}
