// texfix core library
//
// Deterministic rewrite rules for a LaTeX report source. Reads the document
// once, runs the configured rule pipeline over the text, writes it back once.

pub mod config;
pub mod error;
pub mod processor;
pub mod rules;
pub mod storage;
pub mod types;

// Re-export main types and functions for easy use
pub use config::RewriteConfig;
pub use error::{Result, RewriteError};
pub use processor::DocumentRewriter;
pub use storage::{content_digest, DocumentStore, DryRunStore, FileStore};
pub use types::*;
