use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use texfix_core::{PipelineStages, RewriteReport};

/// Write the run report as pretty JSON
pub fn save_report(report: &RewriteReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(output_path, json)
        .with_context(|| format!("failed to write report to {}", output_path.display()))?;
    tracing::info!(path = %output_path.display(), "report saved");
    Ok(())
}

/// Dump every pipeline stage into `output_dir`, plus a `summary.json`.
///
/// Files are numbered in pipeline order: `stage0_original.tex`,
/// `stage1_<Rule>.tex`, and so on. Returns the paths written.
pub fn save_stages(stages: &PipelineStages, output_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    let mut written = Vec::new();

    let original_path = output_dir.join("stage0_original.tex");
    fs::write(&original_path, &stages.original)?;
    written.push(original_path);

    for (index, (rule, text)) in stages.after_rule.iter().enumerate() {
        let stage_path = output_dir.join(format!("stage{}_{}.tex", index + 1, rule));
        fs::write(&stage_path, text)?;
        written.push(stage_path);
    }

    // Summary file: quick reference for which rule touched what
    let summary = serde_json::json!({
        "original_bytes": stages.original.len(),
        "final_bytes": stages.final_text().len(),
        "rules": stages.outcomes,
    });
    let summary_path = output_dir.join("summary.json");
    fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)?;
    written.push(summary_path);

    for path in &written {
        tracing::info!(path = %path.display(), "stage saved");
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use texfix_core::RuleOutcome;

    fn sample_stages() -> PipelineStages {
        PipelineStages {
            original: "below".to_string(),
            after_rule: vec![
                ("PackageInsertion".to_string(), "below".to_string()),
                ("AttributeFlip".to_string(), "above".to_string()),
            ],
            outcomes: vec![
                RuleOutcome {
                    rule: "PackageInsertion".to_string(),
                    substitutions: 0,
                    elapsed_us: 3,
                },
                RuleOutcome {
                    rule: "AttributeFlip".to_string(),
                    substitutions: 1,
                    elapsed_us: 5,
                },
            ],
        }
    }

    #[test]
    fn test_save_stages_writes_numbered_files() {
        let dir = tempfile::tempdir().unwrap();
        let written = save_stages(&sample_stages(), dir.path()).unwrap();

        let names: Vec<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "stage0_original.tex",
                "stage1_PackageInsertion.tex",
                "stage2_AttributeFlip.tex",
                "summary.json"
            ]
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("stage2_AttributeFlip.tex")).unwrap(),
            "above"
        );

        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("summary.json")).unwrap())
                .unwrap();
        assert_eq!(summary["rules"][1]["substitutions"], 1);
        assert_eq!(summary["final_bytes"], 5);
    }

    #[test]
    fn test_save_report_is_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = RewriteReport {
            target: PathBuf::from("midTermReport.tex"),
            rules: sample_stages().outcomes,
            input_sha256: "aa".to_string(),
            output_sha256: "bb".to_string(),
            changed: true,
            written: false,
        };

        save_report(&report, &path).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["target"], "midTermReport.tex");
        assert_eq!(value["written"], false);
        assert_eq!(value["rules"].as_array().unwrap().len(), 2);
    }
}
