use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

/// Issue severity, totally ordered by risk (critical outranks info).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    /// Rank by risk: 0 is the most severe. Used for escalation and ordering.
    pub fn rank(self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
            Self::Info => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
            Self::Info => "INFO",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The concern axis an agent reviews along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Security,
    Performance,
    Style,
    Orchestrator,
}

impl AgentKind {
    /// Lowercase concern name as it appears on the wire and in prompts.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Security => "security",
            Self::Performance => "performance",
            Self::Style => "style",
            Self::Orchestrator => "orchestrator",
        }
    }

    /// Title-case name recorded in `found_by` provenance and summaries.
    pub fn title(self) -> &'static str {
        match self {
            Self::Security => "Security",
            Self::Performance => "Performance",
            Self::Style => "Style",
            Self::Orchestrator => "Orchestrator",
        }
    }
}

/// Lifecycle of one agent review. Transitions are one-way;
/// completed and failed are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

/// A single finding. Created by an agent's parse step with singleton
/// provenance; mutated only by the deduplicator (severity escalation,
/// suggestion concatenation, found_by append).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReviewIssue {
    pub severity: Severity,
    /// Line the issue refers to, when the model could localize it.
    #[serde(default)]
    pub line_number: Option<u32>,
    pub issue: String,
    pub suggestion: String,
    /// Agents that reported this issue, in discovery order.
    #[serde(default)]
    pub found_by: Vec<String>,
}

/// One concern area's review, owned by its agent until terminal.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AgentReview {
    pub agent_type: AgentKind,
    pub status: AgentStatus,
    #[serde(default)]
    pub issues: Vec<ReviewIssue>,
    #[serde(default)]
    pub summary: String,
    /// Free-form model rationale, may be empty.
    #[serde(default)]
    pub thinking: String,
}

/// Inbound review request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CodeReviewRequest {
    pub code: String,
    #[serde(default = "default_language")]
    pub language: String,
    /// Optional caller-supplied context about what the code does.
    #[serde(default)]
    pub context: Option<String>,
}

fn default_language() -> String {
    "python".to_string()
}

/// Letter grade derived from a numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn label(self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Composite quality scores, each in [0, 100] with one decimal.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CodeQualityScore {
    pub overall_score: f64,
    pub security_score: f64,
    pub performance_score: f64,
    pub style_score: f64,
    pub grade: Grade,
    /// Score assuming all critical/high issues per concern are resolved.
    #[serde(default)]
    pub projected_score: Option<f64>,
    #[serde(default)]
    pub projected_grade: Option<Grade>,
}

/// Final assembled response; never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CodeReviewResponse {
    pub review_id: String,
    pub agent_reviews: Vec<AgentReview>,
    pub overall_summary: String,
    /// Raw issue count across all agents, pre-dedup.
    pub total_issues: usize,
    /// Deduplicated issues, sorted by severity then line.
    #[serde(default)]
    pub unique_issues: Vec<ReviewIssue>,
    #[serde(default)]
    pub quality_score: Option<CodeQualityScore>,
}

/// A fire-and-forget progress notification from an agent or the orchestrator.
#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdate {
    pub agent: String,
    pub message: String,
}

/// Optional injected notification sink. Per-sender ordering only; callers
/// must not assume ordering between different agents' notifications.
pub type StatusSender = UnboundedSender<StatusUpdate>;

/// Send a status update if a sink is present. Delivery failures are ignored:
/// a closed receiver must never disturb a running review.
pub fn notify(status: Option<&StatusSender>, agent: &str, message: impl Into<String>) {
    if let Some(tx) = status {
        let _ = tx.send(StatusUpdate {
            agent: agent.to_string(),
            message: message.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_rank_orders_by_risk() {
        assert!(Severity::Critical.rank() < Severity::High.rank());
        assert!(Severity::High.rank() < Severity::Medium.rank());
        assert!(Severity::Medium.rank() < Severity::Low.rank());
        assert!(Severity::Low.rank() < Severity::Info.rank());
    }

    #[test]
    fn severity_wire_format_is_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Critical).unwrap(), "\"critical\"");
        let parsed: Severity = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(parsed, Severity::High);
        assert!(serde_json::from_str::<Severity>("\"catastrophic\"").is_err());
    }

    #[test]
    fn request_language_defaults_to_python() {
        let request: CodeReviewRequest = serde_json::from_str(r#"{"code": "x = 1"}"#).unwrap();
        assert_eq!(request.language, "python");
        assert_eq!(request.context, None);
    }

    #[test]
    fn grade_wire_format_keeps_plus_sign() {
        assert_eq!(serde_json::to_string(&Grade::APlus).unwrap(), "\"A+\"");
        assert_eq!(Grade::APlus.to_string(), "A+");
    }

    #[test]
    fn agent_status_wire_format_is_snake_case() {
        assert_eq!(
            serde_json::to_string(&AgentStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
    }
}
