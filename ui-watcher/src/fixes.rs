//! Mapping audit issues to priority fixes and applying them.

use anyhow::{Context, Result};
use mcp_vision_core::analysis::UiIssue;
use serde::Serialize;
use std::path::Path;

/// A fix the watcher intends to apply to the local file.
#[derive(Debug, Clone, Serialize)]
pub struct PriorityFix {
    /// CSS selector or description of the affected element.
    pub element: String,
    /// What is wrong.
    pub issue: String,
    /// The recommended change.
    pub fix: String,
    /// Severity it was derived from.
    pub priority: String,
}

/// Derive priority fixes from the audit: only high and critical issues
/// qualify.
pub fn from_issues(issues: &[UiIssue]) -> Vec<PriorityFix> {
    issues
        .iter()
        .filter(|issue| issue.is_high_priority())
        .map(|issue| PriorityFix {
            element: issue
                .affected_elements
                .as_ref()
                .and_then(|elements| elements.first().cloned())
                .unwrap_or_default(),
            issue: issue.title.clone(),
            fix: issue.recommendation.clone(),
            priority: issue.severity.clone(),
        })
        .collect()
}

/// Record the fixes against the local file.
///
/// Verifies the target exists, loads it, and logs each fix to be made.
/// TODO: parse the stylesheet and rewrite the affected rules in place.
pub fn apply_fixes(local_dir: &Path, filename: &str, fixes: &[PriorityFix]) -> Result<usize> {
    let path = local_dir.join(filename);

    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    tracing::debug!(bytes = content.len(), "loaded target file");

    for fix in fixes {
        if fix.element.is_empty() || fix.fix.is_empty() {
            continue;
        }
        tracing::info!(element = %fix.element, fix = %fix.fix, "applying fix");
    }

    tracing::info!(count = fixes.len(), filename, "fixes recorded");
    Ok(fixes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn issue(severity: &str, element: Option<&str>) -> UiIssue {
        serde_json::from_value(serde_json::json!({
            "category": "visual-design",
            "severity": severity,
            "title": "Inconsistent padding",
            "description": "Sections use different paddings",
            "recommendation": "padding: 60px 20px;",
            "affected_elements": element.map(|e| vec![e]),
        }))
        .unwrap()
    }

    #[test]
    fn test_only_high_priority_issues_become_fixes() {
        let issues = vec![
            issue("low", Some(".footer")),
            issue("high", Some(".hero-section")),
            issue("critical", Some(".cta")),
            issue("medium", None),
        ];

        let fixes = from_issues(&issues);
        assert_eq!(fixes.len(), 2);
        assert_eq!(fixes[0].element, ".hero-section");
        assert_eq!(fixes[1].priority, "critical");
    }

    #[test]
    fn test_fix_without_elements_gets_empty_selector() {
        let fixes = from_issues(&[issue("high", None)]);
        assert_eq!(fixes.len(), 1);
        assert!(fixes[0].element.is_empty());
    }

    #[test]
    fn test_apply_fixes_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = apply_fixes(dir.path(), "missing.html", &[]).unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn test_apply_fixes_counts_fixes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        writeln!(
            std::fs::File::create(&path).unwrap(),
            "<html><body class=\"hero-section\"></body></html>"
        )
        .unwrap();

        let fixes = from_issues(&[issue("high", Some(".hero-section"))]);
        let applied = apply_fixes(dir.path(), "index.html", &fixes).unwrap();
        assert_eq!(applied, 1);
    }
}
