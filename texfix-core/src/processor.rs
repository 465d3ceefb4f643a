use crate::config::RewriteConfig;
use crate::error::Result;
use crate::rules::RuleEngine;
use crate::storage::{content_digest, DocumentStore, DryRunStore, FileStore};
use crate::types::*;
use std::path::Path;
use std::time::Instant;

/// Loads a document, runs the rule pipeline over it and writes it back in place.
pub struct DocumentRewriter {
    store: Box<dyn DocumentStore>,
    rule_engine: RuleEngine,
}

impl DocumentRewriter {
    /// Create a rewriter with an explicit store
    pub fn new_with_store(store: Box<dyn DocumentStore>, config: &RewriteConfig) -> Result<Self> {
        Ok(Self {
            store,
            rule_engine: RuleEngine::new(config)?,
        })
    }

    /// Rewriter that overwrites files on disk
    pub fn new(config: &RewriteConfig) -> Result<Self> {
        Self::new_with_store(Box::new(FileStore::new()), config)
    }

    /// Rewriter that reads files but never writes them
    pub fn new_dry_run(config: &RewriteConfig) -> Result<Self> {
        Self::new_with_store(Box::new(DryRunStore::new()), config)
    }

    pub fn load(&self, path: &Path) -> Result<Document> {
        Ok(Document::new(path, self.store.load(path)?))
    }

    /// Apply the pipeline to in-memory text
    pub fn rewrite_str(&self, text: &str) -> Result<(String, Vec<RuleOutcome>)> {
        self.rule_engine.apply_rules(text)
    }

    /// Read `path` once, apply every enabled rule, write the result back once.
    ///
    /// The write happens even when no rule matched. Any read, encoding or
    /// write failure aborts the run; a rule that finds nothing is not a failure.
    pub fn rewrite_file(&self, path: &Path) -> Result<RewriteReport> {
        let start_time = Instant::now();
        let document = self.load(path)?;
        tracing::info!(path = %path.display(), bytes = document.content.len() as u64, "loaded document");

        let (rewritten, rules) = self.rewrite_str(&document.content)?;

        self.store.save(&document.path, &rewritten)?;
        let written = self.store.persists();

        let report = RewriteReport {
            target: document.path,
            input_sha256: content_digest(&document.content),
            output_sha256: content_digest(&rewritten),
            changed: rewritten != document.content,
            rules,
            written,
        };
        tracing::info!(
            path = %report.target.display(),
            substitutions = report.total_substitutions() as u64,
            changed = report.changed,
            written = report.written,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "rewrite finished"
        );
        Ok(report)
    }

    /// Run the pipeline on `path` without writing, keeping every intermediate text
    pub fn capture_stages(&self, path: &Path) -> Result<PipelineStages> {
        let document = self.load(path)?;
        self.rule_engine.apply_rules_capturing(&document.content)
    }
}
