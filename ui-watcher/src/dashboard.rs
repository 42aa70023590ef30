//! Client for the dashboard endpoint the watcher polls.

use serde::Deserialize;

/// Latest-analysis record served by the dashboard (camelCase on the wire).
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardAnalysis {
    #[serde(default)]
    pub success: bool,

    #[serde(rename = "analyzedAt")]
    pub analyzed_at: Option<String>,

    pub filename: Option<String>,

    #[serde(default)]
    pub data: Option<DashboardData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardData {
    #[serde(default)]
    pub analysis: Option<TechnicalAnalysis>,
}

/// The dashboard's own static-analysis numbers, echoed into our logs next
/// to the visual score.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TechnicalAnalysis {
    #[serde(rename = "scorePercentage", default)]
    pub score_percentage: f64,

    #[serde(default)]
    pub summary: Option<AnalysisSummary>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisSummary {
    #[serde(rename = "totalIssues", default)]
    pub total_issues: u64,
}

impl DashboardAnalysis {
    /// Technical score reported by the dashboard, 0 when absent.
    pub fn technical_score(&self) -> f64 {
        self.data
            .as_ref()
            .and_then(|d| d.analysis.as_ref())
            .map(|a| a.score_percentage)
            .unwrap_or(0.0)
    }

    pub fn total_issues(&self) -> u64 {
        self.data
            .as_ref()
            .and_then(|d| d.analysis.as_ref())
            .and_then(|a| a.summary.as_ref())
            .map(|s| s.total_issues)
            .unwrap_or(0)
    }
}

pub struct DashboardClient {
    http: reqwest::Client,
    base_url: String,
}

impl DashboardClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL under which the dashboard serves the local file being analyzed.
    pub fn local_page_url(&self, filename: &str) -> String {
        format!("{}/local/{}", self.base_url, filename)
    }

    /// True when the dashboard answers its health endpoint with 200.
    pub async fn health(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.http.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::error!(error = %e, "dashboard health check failed");
                false
            }
        }
    }

    /// Fetch the latest analysis; `None` on any failure or when the
    /// dashboard reports `success: false`.
    pub async fn latest_analysis(&self) -> Option<DashboardAnalysis> {
        let url = format!("{}/dashboard", self.base_url);

        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch analysis");
                return None;
            }
        };

        if !response.status().is_success() {
            return None;
        }

        match response.json::<DashboardAnalysis>().await {
            Ok(analysis) if analysis.success => Some(analysis),
            Ok(_) => None,
            Err(e) => {
                tracing::error!(error = %e, "failed to decode analysis");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_camel_case_fields() {
        let json = r#"{
            "success": true,
            "analyzedAt": "2025-06-01T12:00:00Z",
            "filename": "index.html",
            "data": {
                "analysis": {
                    "scorePercentage": 82.5,
                    "summary": {"totalIssues": 7}
                }
            }
        }"#;

        let analysis: DashboardAnalysis = serde_json::from_str(json).unwrap();
        assert!(analysis.success);
        assert_eq!(analysis.analyzed_at.as_deref(), Some("2025-06-01T12:00:00Z"));
        assert_eq!(analysis.filename.as_deref(), Some("index.html"));
        assert_eq!(analysis.technical_score(), 82.5);
        assert_eq!(analysis.total_issues(), 7);
    }

    #[test]
    fn test_missing_data_defaults_to_zero() {
        let analysis: DashboardAnalysis =
            serde_json::from_str(r#"{"success": true, "analyzedAt": null, "filename": null}"#)
                .unwrap();
        assert_eq!(analysis.technical_score(), 0.0);
        assert_eq!(analysis.total_issues(), 0);
    }

    #[test]
    fn test_local_page_url() {
        let client = DashboardClient::new("http://localhost:3002");
        assert_eq!(
            client.local_page_url("index.html"),
            "http://localhost:3002/local/index.html"
        );
    }

    #[tokio::test]
    async fn test_health_follows_status() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        assert!(DashboardClient::new(server.uri()).health().await);

        let down = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&down)
            .await;

        assert!(!DashboardClient::new(down.uri()).health().await);
    }

    #[tokio::test]
    async fn test_latest_analysis_gates_on_success_flag() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dashboard"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": false,
                "analyzedAt": "2025-06-01T12:00:00Z",
                "filename": "index.html"
            })))
            .mount(&server)
            .await;

        assert!(DashboardClient::new(server.uri())
            .latest_analysis()
            .await
            .is_none());

        let ok = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dashboard"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "analyzedAt": "2025-06-01T12:00:00Z",
                "filename": "index.html"
            })))
            .mount(&ok)
            .await;

        let analysis = DashboardClient::new(ok.uri()).latest_analysis().await.unwrap();
        assert_eq!(analysis.filename.as_deref(), Some("index.html"));
    }
}
