use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info};
use uuid::Uuid;

use crate::agent::ReviewAgent;
use crate::config::LlmConfig;
use crate::llm::ChatClient;
use crate::profile::AgentProfile;
use crate::review::{dedupe, score};
use crate::types::{
    AgentReview, AgentStatus, CodeQualityScore, CodeReviewRequest, CodeReviewResponse,
    StatusSender, notify,
};

const ORCHESTRATOR_NAME: &str = "Orchestrator";

/// Coordinates the three concern agents over one submission: concurrent
/// fan-out, fan-in, dedup, scoring, and summary composition.
pub struct Orchestrator {
    agents: Vec<ReviewAgent>,
}

impl Orchestrator {
    /// Build the review team. All agents share one chat client; each call
    /// through it is independent, so no coordination is needed between them.
    pub fn new(client: Arc<dyn ChatClient>, config: &LlmConfig) -> Self {
        let agents = vec![
            ReviewAgent::new(AgentProfile::security(), client.clone(), config),
            ReviewAgent::new(AgentProfile::performance(), client.clone(), config),
            ReviewAgent::new(AgentProfile::style(), client, config),
        ];
        Self { agents }
    }

    /// Run the full review. Total over any combination of completed and
    /// failed agents, including all-failed; never errors. Agents run
    /// concurrently and are joined without short-circuiting: one agent's
    /// failure neither cancels nor blocks the others.
    pub async fn review_code(
        &self,
        request: &CodeReviewRequest,
        status: Option<StatusSender>,
    ) -> CodeReviewResponse {
        let review_id = Uuid::new_v4().to_string();
        debug!("Starting review {review_id} ({} bytes)", request.code.len());

        notify(
            status.as_ref(),
            ORCHESTRATOR_NAME,
            "Initializing code review team...",
        );

        let context = request.context.as_deref().unwrap_or("");
        let agent_reviews = join_all(self.agents.iter().map(|agent| {
            agent.review(&request.code, &request.language, context, status.as_ref())
        }))
        .await;

        notify(
            status.as_ref(),
            ORCHESTRATOR_NAME,
            "Deduplicating and merging findings...",
        );
        let unique_issues = dedupe::dedupe_issues(&agent_reviews);

        let quality_score = score::calculate_quality_score(&unique_issues);

        // Failed agents always carry zero issues, so this equals the sum
        // over completed agents.
        let total_issues = agent_reviews.iter().map(|review| review.issues.len()).sum();

        notify(
            status.as_ref(),
            ORCHESTRATOR_NAME,
            "Generating final summary...",
        );
        let overall_summary = generate_summary(&agent_reviews, unique_issues.len(), &quality_score);

        info!(
            "Review {review_id} complete: {} unique of {} raw issues",
            unique_issues.len(),
            total_issues
        );
        notify(
            status.as_ref(),
            ORCHESTRATOR_NAME,
            format!("Review complete! Found {} unique issues.", unique_issues.len()),
        );

        CodeReviewResponse {
            review_id,
            agent_reviews,
            overall_summary,
            total_issues,
            unique_issues,
            quality_score: Some(quality_score),
        }
    }
}

/// Compose the overall summary. All-failed reviews get a failure banner and
/// per-agent errors with no scoring commentary; otherwise a status line with
/// grade and score, issue-tier counts, warnings for failed agents, and one
/// result line per agent.
fn generate_summary(
    agent_reviews: &[AgentReview],
    unique_count: usize,
    quality: &CodeQualityScore,
) -> String {
    let failed: Vec<&AgentReview> = agent_reviews
        .iter()
        .filter(|review| review.status == AgentStatus::Failed)
        .collect();
    let successful: Vec<&AgentReview> = agent_reviews
        .iter()
        .filter(|review| review.status == AgentStatus::Completed)
        .collect();

    if failed.len() == agent_reviews.len() {
        let mut parts = vec![
            "⚠️ **Review Failed**: All agents encountered errors.\n".to_string(),
            "**Errors:**".to_string(),
        ];
        for review in agent_reviews {
            parts.push(format!(
                "- **{}**: {}",
                review.agent_type.title(),
                review.summary
            ));
        }
        return parts.join("\n");
    }

    let status = if failed.is_empty() {
        "Complete"
    } else {
        "Partially Complete"
    };
    let mut parts = vec![
        format!(
            "**Code Review {status}** | Grade: **{}** ({}/100)",
            quality.grade, quality.overall_score
        ),
        format!(
            "{unique_count} unique issues identified from {}/{} agents.\n",
            successful.len(),
            agent_reviews.len()
        ),
    ];

    if !failed.is_empty() {
        let failed_names: Vec<&str> = failed
            .iter()
            .map(|review| review.agent_type.title())
            .collect();
        parts.push(format!(
            "⚠️ **Warning**: {} agent(s) failed: {}\n",
            failed.len(),
            failed_names.join(", ")
        ));
    }

    // Tier counts over the successful agents' raw findings.
    let mut critical = 0usize;
    let mut high = 0usize;
    let mut medium = 0usize;
    let mut low = 0usize;
    for review in &successful {
        for issue in &review.issues {
            match issue.severity {
                crate::types::Severity::Critical => critical += 1,
                crate::types::Severity::High => high += 1,
                crate::types::Severity::Medium => medium += 1,
                crate::types::Severity::Low => low += 1,
                crate::types::Severity::Info => {}
            }
        }
    }

    if critical > 0 {
        parts.push(format!(
            "🚨 **{critical} Critical** issues require immediate attention."
        ));
    }
    if high > 0 {
        parts.push(format!("⚠️ **{high} High** priority issues found."));
    }
    if medium > 0 {
        parts.push(format!(
            "📋 **{medium} Medium** priority improvements suggested."
        ));
    }
    if low > 0 {
        parts.push(format!("💡 **{low} Low** priority suggestions."));
    }

    if unique_count == 0 && !successful.is_empty() {
        parts.push("✅ **No issues found** - code looks good!".to_string());
    }

    parts.push("\n**Agent Results:**".to_string());
    for review in agent_reviews {
        let icon = if review.status == AgentStatus::Completed {
            "✓"
        } else {
            "✗"
        };
        parts.push(format!(
            "- {icon} **{}**: {}",
            review.agent_type.title(),
            review.summary
        ));
    }

    parts.join("\n")
}
