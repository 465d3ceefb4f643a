use crate::config::{
    PipelineConfig, RewriteConfig, ATTRIBUTE_FLIP, FIGURE_REWRITE, PACKAGE_INSERTION,
};
use crate::error::{Result, RewriteError};
use crate::types::{PipelineStages, RuleOutcome};
use regex::Regex;
use std::time::Instant;

use super::attribute_flip::AttributeFlipRule;
use super::figure_rewrite::FigureRewriteRule;
use super::package_insertion::PackageInsertionRule;

/// Text produced by one rule, and how many places it changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    pub substitutions: usize,
}

impl Rewrite {
    pub fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_string(),
            substitutions: 0,
        }
    }

    pub fn applied(&self) -> bool {
        self.substitutions > 0
    }
}

// Sequential rule pipeline infrastructure
pub trait RewriteRule {
    fn apply(&self, text: &str) -> Result<Rewrite>;
    fn name(&self) -> &str;
}

pub(crate) fn compile_pattern(rule: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| RewriteError::Pattern {
        rule: rule.to_string(),
        source,
    })
}

/// Runs the configured rules over a document, in order, each on the previous one's output
pub struct RuleEngine {
    pipeline: PipelineConfig,
    package_insertion: PackageInsertionRule,
    figure_rewrite: FigureRewriteRule,
    attribute_flip: AttributeFlipRule,
}

impl RuleEngine {
    pub fn new(config: &RewriteConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            pipeline: config.pipeline.clone(),
            package_insertion: PackageInsertionRule::new(&config.package_insertion),
            figure_rewrite: FigureRewriteRule::new(&config.figure_rewrite)?,
            attribute_flip: AttributeFlipRule::new(&config.attribute_flip),
        })
    }

    fn rule_by_name(&self, name: &str) -> Option<&dyn RewriteRule> {
        match name {
            PACKAGE_INSERTION => Some(&self.package_insertion),
            FIGURE_REWRITE => Some(&self.figure_rewrite),
            ATTRIBUTE_FLIP => Some(&self.attribute_flip),
            _ => None,
        }
    }

    /// Apply every enabled rule and return the final text
    pub fn apply_rules(&self, text: &str) -> Result<(String, Vec<RuleOutcome>)> {
        self.run(text, |_, _| {})
    }

    /// Apply every enabled rule, keeping the text after each one
    pub fn apply_rules_capturing(&self, text: &str) -> Result<PipelineStages> {
        let mut after_rule = Vec::new();
        let (_, outcomes) = self.run(text, |rule, stage| {
            after_rule.push((rule.to_string(), stage.to_string()))
        })?;

        Ok(PipelineStages {
            original: text.to_string(),
            after_rule,
            outcomes,
        })
    }

    fn run<F>(&self, text: &str, mut on_stage: F) -> Result<(String, Vec<RuleOutcome>)>
    where
        F: FnMut(&str, &str),
    {
        let mut current = text.to_string();
        let mut outcomes = Vec::new();

        for rule_config in &self.pipeline.rules {
            if !rule_config.enabled {
                tracing::debug!(rule = %rule_config.name, "skipping disabled rule");
                continue;
            }

            let Some(rule) = self.rule_by_name(&rule_config.name) else {
                tracing::warn!(rule = %rule_config.name, "unknown rule, skipping");
                continue;
            };

            let rule_start = Instant::now();
            let rewrite = rule.apply(&current)?;
            let elapsed_us = rule_start.elapsed().as_micros() as u64;

            if rewrite.applied() {
                tracing::info!(
                    rule = rule.name(),
                    substitutions = rewrite.substitutions as u64,
                    elapsed_us,
                    "rule applied"
                );
            } else {
                tracing::debug!(rule = rule.name(), "no match, text unchanged");
            }

            outcomes.push(RuleOutcome {
                rule: rule.name().to_string(),
                substitutions: rewrite.substitutions,
                elapsed_us,
            });
            current = rewrite.text;
            on_stage(rule.name(), &current);
        }

        Ok((current, outcomes))
    }
}
