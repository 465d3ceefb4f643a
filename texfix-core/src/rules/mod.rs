// Rewrite rules - each rule is a standalone text transformation:
// - engine.rs: RuleEngine, the RewriteRule trait and shared helpers
// - package_insertion.rs: add a \usepackage directive ahead of an anchor directive
// - figure_rewrite.rs: center + tikzpicture + captionof -> figure float
// - attribute_flip.rs: exact literal replacements (tikz node positioning)

pub mod attribute_flip;
pub mod engine;
pub mod figure_rewrite;
pub mod package_insertion;

pub use engine::*;
