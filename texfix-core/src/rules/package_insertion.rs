use super::engine::{Rewrite, RewriteRule};
use crate::config::{PackageInsertionConfig, PACKAGE_INSERTION};
use crate::error::Result;

// PackageInsertionRule - puts a \usepackage directive in front of an anchor directive
pub struct PackageInsertionRule {
    directive: String,
    anchor: String,
}

impl PackageInsertionRule {
    pub fn new(config: &PackageInsertionConfig) -> Self {
        Self {
            directive: config.directive.clone(),
            anchor: config.anchor.clone(),
        }
    }
}

impl RewriteRule for PackageInsertionRule {
    fn apply(&self, text: &str) -> Result<Rewrite> {
        // Presence anywhere counts, so re-running never inserts twice
        if text.contains(&self.directive) {
            return Ok(Rewrite::unchanged(text));
        }

        let substitutions = text.matches(&self.anchor).count();
        if substitutions == 0 {
            return Ok(Rewrite::unchanged(text));
        }

        let prefixed = format!("{}\n{}", self.directive, self.anchor);
        Ok(Rewrite {
            text: text.replace(&self.anchor, &prefixed),
            substitutions,
        })
    }

    fn name(&self) -> &str {
        PACKAGE_INSERTION
    }
}
