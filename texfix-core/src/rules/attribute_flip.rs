use super::engine::{Rewrite, RewriteRule};
use crate::config::{AttributeFlipConfig, LiteralReplacement, ATTRIBUTE_FLIP};
use crate::error::Result;

// AttributeFlipRule - exact, byte-for-byte literal replacement (no pattern syntax)
pub struct AttributeFlipRule {
    replacements: Vec<LiteralReplacement>,
}

impl AttributeFlipRule {
    pub fn new(config: &AttributeFlipConfig) -> Self {
        Self {
            replacements: config.replacements.clone(),
        }
    }
}

impl RewriteRule for AttributeFlipRule {
    fn apply(&self, text: &str) -> Result<Rewrite> {
        let mut current = text.to_string();
        let mut substitutions = 0;

        for replacement in &self.replacements {
            let count = current.matches(&replacement.from).count();
            if count > 0 {
                current = current.replace(&replacement.from, &replacement.to);
                substitutions += count;
            }
        }

        Ok(Rewrite {
            text: current,
            substitutions,
        })
    }

    fn name(&self) -> &str {
        ATTRIBUTE_FLIP
    }
}
