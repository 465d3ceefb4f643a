// All rewrite functionality is in texfix-core
// This CLI acts as a thin wrapper around the core library

// CLI-specific modules
pub mod cli;
pub mod output;

// Re-export core types for convenience
pub use texfix_core::*;

// Re-export CLI utilities
pub use cli::{default_log_filter, resolve_input, run, Args};
pub use output::{save_report, save_stages};
