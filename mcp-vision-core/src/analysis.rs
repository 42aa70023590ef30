//! Prompts and post-processing for vision analysis responses.
//!
//! The free-text review returns the model's prose untouched. The structured
//! audit asks for a JSON block and best-effort parses it; anything
//! unparsable falls back to the raw text as a summary with a neutral score.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// DOM preview cap appended to the audit prompt.
pub const MAX_DOM_PREVIEW_CHARS: usize = 2000;

/// Raw-text fallback summary cap.
pub const MAX_FALLBACK_SUMMARY_CHARS: usize = 500;

/// Score reported when the model's JSON couldn't be parsed.
pub const FALLBACK_SCORE: i64 = 50;

pub const REVIEW_SYSTEM_PROMPT: &str =
    "You are a UI/UX expert who provides detailed analysis of user interface screenshots.";

/// Free-text review prompt.
pub const REVIEW_PROMPT: &str = r#"Analyze this user interface screenshot comprehensively and provide a thorough analysis with specific examples and actionable recommendations.

Please analyze this interface image and provide:

1. **ISSUES IDENTIFIED:**
   - List specific problems, inconsistencies, or pain points you can see
   - Rate severity (High/Medium/Low)
   - Include specific elements, colors, spacing, or layout issues

2. **RECOMMENDED FIXES:**
   - Specific, actionable solutions for each identified issue
   - Implementation priority
   - Suggested changes to improve the current design

3. **IMPROVEMENT SUGGESTIONS:**
   - Enhancements to improve user experience
   - Best practices recommendations
   - Modern UI/UX trends that could be applied
   - Accessibility improvements

4. **OVERALL ASSESSMENT:**
   - Summary of the current state
   - Key areas for immediate attention
   - Overall design quality rating

Focus on practical, implementable feedback that a developer or designer could act upon.
Be specific about what you observe in the image."#;

pub const AUDIT_SYSTEM_PROMPT: &str = r#"You are a senior UI/UX consultant and accessibility expert. Analyze the provided screenshot and identify specific issues and improvement opportunities.

Focus on:
1. Visual hierarchy and information architecture
2. Accessibility compliance (WCAG guidelines)
3. User experience and usability patterns
4. Mobile responsiveness indicators
5. Conversion optimization opportunities
6. Common UI/UX anti-patterns
7. Design consistency and branding
8. Performance and loading indicators

Provide specific, actionable recommendations with clear priorities."#;

/// Structured audit prompt, with an optional DOM preview for context.
pub fn audit_prompt(dom_content: Option<&str>) -> String {
    let dom_text = dom_content
        .map(|dom| format!("\nDOM Content Preview:\n{}", truncate_dom(dom)))
        .unwrap_or_default();

    format!(
        r#"Please analyze this UI screenshot and provide detailed feedback.{}

Return your analysis in this exact JSON format:
{{
    "overall_score": <number 1-100>,
    "summary": "<brief overall assessment>",
    "issues": [
        {{
            "category": "<category like 'accessibility', 'usability', 'visual-design', 'performance', 'mobile', 'content'>",
            "severity": "<low|medium|high|critical>",
            "title": "<brief issue title>",
            "description": "<detailed description>",
            "recommendation": "<specific fix recommendation>",
            "affected_elements": ["<css selector or description>"]
        }}
    ],
    "strengths": ["<positive aspects>"],
    "priority_recommendations": ["<top 3-5 priority fixes>"]
}}"#,
        dom_text
    )
}

fn default_category() -> String {
    "general".to_string()
}

fn default_severity() -> String {
    "medium".to_string()
}

fn default_issue_title() -> String {
    "UI Issue".to_string()
}

/// A specific issue identified in the audit.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UiIssue {
    /// Issue category (accessibility, usability, visual-design, ...)
    #[serde(default = "default_category")]
    pub category: String,

    /// Severity: low, medium, high, critical
    #[serde(default = "default_severity")]
    pub severity: String,

    /// Brief issue title
    #[serde(default = "default_issue_title")]
    pub title: String,

    /// Detailed description
    #[serde(default)]
    pub description: String,

    /// Specific recommendation to fix the issue
    #[serde(default)]
    pub recommendation: String,

    /// CSS selectors or descriptions of affected elements
    #[serde(default)]
    pub affected_elements: Option<Vec<String>>,
}

impl UiIssue {
    /// True for the severities the watcher acts on.
    pub fn is_high_priority(&self) -> bool {
        matches!(self.severity.as_str(), "high" | "critical")
    }
}

fn default_score() -> i64 {
    FALLBACK_SCORE
}

fn default_summary() -> String {
    "UI analysis completed".to_string()
}

/// Result of a structured UI audit.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UiAnalysis {
    /// Overall UI/UX score from 1-100 (0 on failure)
    #[serde(default = "default_score")]
    pub overall_score: i64,

    /// Brief summary of the analysis
    #[serde(default = "default_summary")]
    pub summary: String,

    /// Identified issues
    #[serde(default)]
    pub issues: Vec<UiIssue>,

    /// Positive aspects of the UI
    #[serde(default)]
    pub strengths: Vec<String>,

    /// Top priority recommendations
    #[serde(default)]
    pub priority_recommendations: Vec<String>,

    /// Error message if the audit failed
    #[serde(default)]
    pub error: Option<String>,
}

impl UiAnalysis {
    /// A failed audit: score 0, empty lists, the error string set.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            overall_score: 0,
            summary: "Analysis failed".to_string(),
            issues: Vec::new(),
            strengths: Vec::new(),
            priority_recommendations: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Best-effort JSON extraction: a ```json fenced block if present, else the
/// first `{` through the last `}`.
pub fn extract_json_block(text: &str) -> Option<&str> {
    if let Some(start) = text.find("```json") {
        let rest = &text[start + "```json".len()..];
        if let Some(end) = rest.find("```") {
            return Some(rest[..end].trim());
        }
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end >= start).then(|| &text[start..=end])
}

/// Parse the model's audit text into a `UiAnalysis`. Never errors: anything
/// unparsable becomes a raw-text summary with the fallback score.
pub fn parse_analysis(text: &str) -> UiAnalysis {
    if let Some(block) = extract_json_block(text) {
        if let Ok(analysis) = serde_json::from_str::<UiAnalysis>(block) {
            return analysis;
        }
    }

    tracing::warn!("could not parse analysis JSON, returning raw text as summary");

    UiAnalysis {
        overall_score: FALLBACK_SCORE,
        summary: truncate_chars(text, MAX_FALLBACK_SUMMARY_CHARS),
        issues: Vec::new(),
        strengths: vec!["Analysis completed but parsing failed".to_string()],
        priority_recommendations: vec![
            "Review the full analysis in the summary field".to_string()
        ],
        error: None,
    }
}

/// Truncate the DOM preview passed to the model.
pub fn truncate_dom(dom: &str) -> String {
    truncate_chars(dom, MAX_DOM_PREVIEW_CHARS)
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_fenced_json() {
        let text = "Here you go:\n```json\n{\"overall_score\": 80}\n```\nDone.";
        assert_eq!(extract_json_block(text), Some("{\"overall_score\": 80}"));
    }

    #[test]
    fn test_extract_bare_object() {
        let text = "Sure. {\"overall_score\": 80} Hope that helps.";
        assert_eq!(extract_json_block(text), Some("{\"overall_score\": 80}"));
    }

    #[test]
    fn test_extract_nothing() {
        assert_eq!(extract_json_block("no json here"), None);
    }

    #[test]
    fn test_parse_full_analysis() {
        let text = r#"```json
{
    "overall_score": 72,
    "summary": "Decent layout with contrast problems",
    "issues": [
        {
            "category": "accessibility",
            "severity": "high",
            "title": "Low contrast CTA",
            "description": "The primary button fails WCAG AA",
            "recommendation": "Darken the button background",
            "affected_elements": [".cta-primary"]
        }
    ],
    "strengths": ["Clear navigation"],
    "priority_recommendations": ["Fix the CTA contrast"]
}
```"#;

        let analysis = parse_analysis(text);
        assert_eq!(analysis.overall_score, 72);
        assert_eq!(analysis.issues.len(), 1);
        assert!(analysis.issues[0].is_high_priority());
        assert_eq!(analysis.issues[0].category, "accessibility");
        assert!(analysis.error.is_none());
    }

    #[test]
    fn test_parse_fills_missing_issue_fields() {
        let text = r#"{"overall_score": 60, "issues": [{"description": "something is off"}]}"#;
        let analysis = parse_analysis(text);
        assert_eq!(analysis.issues[0].category, "general");
        assert_eq!(analysis.issues[0].severity, "medium");
        assert_eq!(analysis.issues[0].title, "UI Issue");
        assert!(!analysis.issues[0].is_high_priority());
    }

    #[test]
    fn test_parse_garbage_falls_back() {
        let analysis = parse_analysis("The UI looks fine to me, nothing structured.");
        assert_eq!(analysis.overall_score, FALLBACK_SCORE);
        assert!(analysis.summary.contains("looks fine"));
        assert!(analysis.issues.is_empty());
        assert!(analysis.error.is_none());
    }

    #[test]
    fn test_fallback_summary_is_truncated() {
        let long = "x".repeat(1000);
        let analysis = parse_analysis(&long);
        assert_eq!(
            analysis.summary.chars().count(),
            MAX_FALLBACK_SUMMARY_CHARS + 3
        );
        assert!(analysis.summary.ends_with("..."));
    }

    #[test]
    fn test_truncate_is_char_safe() {
        let text = "é".repeat(600);
        let out = truncate_chars(&text, MAX_FALLBACK_SUMMARY_CHARS);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), MAX_FALLBACK_SUMMARY_CHARS + 3);
    }

    #[test]
    fn test_truncate_dom_short_passthrough() {
        assert_eq!(truncate_dom("<html></html>"), "<html></html>");
    }

    #[test]
    fn test_audit_prompt_includes_dom_preview() {
        let prompt = audit_prompt(Some("<body>hello</body>"));
        assert!(prompt.contains("DOM Content Preview"));
        assert!(prompt.contains("<body>hello</body>"));

        let prompt = audit_prompt(None);
        assert!(!prompt.contains("DOM Content Preview"));
    }

    #[test]
    fn test_failure_shape() {
        let analysis = UiAnalysis::failure("Analysis error: boom");
        assert_eq!(analysis.overall_score, 0);
        assert!(analysis.issues.is_empty());
        assert_eq!(analysis.error.as_deref(), Some("Analysis error: boom"));
    }
}
