use crate::error::{Result, RewriteError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const PACKAGE_INSERTION: &str = "PackageInsertion";
pub const FIGURE_REWRITE: &str = "FigureRewrite";
pub const ATTRIBUTE_FLIP: &str = "AttributeFlip";

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_target() -> PathBuf {
    PathBuf::from("midTermReport.tex")
}

fn default_directive() -> String {
    r"\usepackage{float}".to_string()
}

fn default_anchor() -> String {
    r"\usepackage{caption}".to_string()
}

fn default_placement() -> String {
    "H".to_string()
}

fn default_replacements() -> Vec<LiteralReplacement> {
    vec![LiteralReplacement {
        from: r"\node[attr, below=0.5cm of performance, align=center]".to_string(),
        to: r"\node[attr, above=0.5cm of performance, align=center]".to_string(),
    }]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteConfig {
    /// Document rewritten in place when no path is given on the command line
    #[serde(default = "default_target")]
    pub target: PathBuf,
    /// Which rules run, and in what order
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub package_insertion: PackageInsertionConfig,
    #[serde(default)]
    pub figure_rewrite: FigureRewriteConfig,
    #[serde(default)]
    pub attribute_flip: AttributeFlipConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// List of rules to run in order
    pub rules: Vec<RuleConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Name of the rule
    pub name: String,
    /// Whether this rule is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl RuleConfig {
    pub fn enabled(name: &str) -> Self {
        Self {
            name: name.to_string(),
            enabled: true,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            rules: vec![
                RuleConfig::enabled(PACKAGE_INSERTION),
                RuleConfig::enabled(FIGURE_REWRITE),
                RuleConfig::enabled(ATTRIBUTE_FLIP),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageInsertionConfig {
    /// Directive inserted when it does not already appear anywhere in the document
    #[serde(default = "default_directive")]
    pub directive: String,
    /// Existing directive the new one is placed in front of
    #[serde(default = "default_anchor")]
    pub anchor: String,
}

impl Default for PackageInsertionConfig {
    fn default() -> Self {
        Self {
            directive: default_directive(),
            anchor: default_anchor(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureRewriteConfig {
    /// Float placement specifier written as `\begin{figure}[<placement>]`
    #[serde(default = "default_placement")]
    pub placement: String,
}

impl Default for FigureRewriteConfig {
    fn default() -> Self {
        Self {
            placement: default_placement(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeFlipConfig {
    /// Exact literals to replace, applied in order
    #[serde(default = "default_replacements")]
    pub replacements: Vec<LiteralReplacement>,
}

impl Default for AttributeFlipConfig {
    fn default() -> Self {
        Self {
            replacements: default_replacements(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralReplacement {
    pub from: String,
    pub to: String,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            target: default_target(),
            pipeline: PipelineConfig::default(),
            package_insertion: PackageInsertionConfig::default(),
            figure_rewrite: FigureRewriteConfig::default(),
            attribute_flip: AttributeFlipConfig::default(),
        }
    }
}

impl RewriteConfig {
    /// Load and validate a YAML config file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| RewriteError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: RewriteConfig =
            serde_yaml::from_str(&content).map_err(|source| RewriteError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise use the built-in defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let insertion = &self.package_insertion;
        if insertion.directive.is_empty() || insertion.anchor.is_empty() {
            return Err(RewriteError::InvalidConfig(
                "package_insertion.directive and package_insertion.anchor must be non-empty"
                    .to_string(),
            ));
        }
        if self.figure_rewrite.placement.contains(']') {
            return Err(RewriteError::InvalidConfig(format!(
                "figure_rewrite.placement `{}` may not contain `]`",
                self.figure_rewrite.placement
            )));
        }
        if let Some(index) = self
            .attribute_flip
            .replacements
            .iter()
            .position(|r| r.from.is_empty())
        {
            return Err(RewriteError::InvalidConfig(format!(
                "attribute_flip.replacements[{index}].from must be non-empty"
            )));
        }
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| RewriteError::InvalidConfig(format!("cannot serialize config: {e}")))
    }
}
