use std::sync::Arc;

use anyhow::{Context, anyhow};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::LlmConfig;
use crate::llm::{ChatClient, ChatMessage, LlmError};
use crate::profile::AgentProfile;
use crate::types::{
    AgentReview, AgentStatus, ReviewIssue, Severity, StatusSender, notify,
};

/// Shape the model's payload must parse as. Top-level fields default to
/// empty when absent; anything else is a shape fault.
#[derive(Deserialize)]
struct ModelFindings {
    #[serde(default)]
    thinking: String,
    #[serde(default)]
    issues: Vec<ModelIssue>,
    #[serde(default)]
    summary: String,
}

#[derive(Deserialize)]
struct ModelIssue {
    severity: Severity,
    #[serde(default)]
    line_number: Option<u32>,
    issue: String,
    suggestion: String,
}

/// One concern-specific reviewer. The three variants differ only in their
/// profile; behavior is identical.
pub struct ReviewAgent {
    profile: AgentProfile,
    client: Arc<dyn ChatClient>,
    models: Vec<String>,
    max_retries: u32,
    temperature: f32,
}

impl ReviewAgent {
    pub fn new(profile: AgentProfile, client: Arc<dyn ChatClient>, config: &LlmConfig) -> Self {
        Self {
            profile,
            client,
            models: config.models.clone(),
            max_retries: config.max_retries,
            temperature: config.temperature,
        }
    }

    /// Review the given code. Never fails toward the caller: every fault is
    /// folded into the returned review as status FAILED plus a summary.
    pub async fn review(
        &self,
        code: &str,
        language: &str,
        context: &str,
        status: Option<&StatusSender>,
    ) -> AgentReview {
        let mut review = AgentReview {
            agent_type: self.profile.kind,
            status: AgentStatus::InProgress,
            issues: Vec::new(),
            summary: String::new(),
            thinking: String::new(),
        };

        notify(
            status,
            self.profile.display_name,
            format!("Starting {} analysis...", self.profile.kind.as_str()),
        );

        match self.run(code, language, context, status).await {
            Ok(findings) => {
                review.thinking = findings.thinking;
                review.summary = findings.summary;
                review.issues = findings
                    .issues
                    .into_iter()
                    .map(|issue| ReviewIssue {
                        severity: issue.severity,
                        line_number: issue.line_number,
                        issue: issue.issue,
                        suggestion: issue.suggestion,
                        found_by: vec![self.profile.kind.title().to_string()],
                    })
                    .collect();
                review.status = AgentStatus::Completed;
                info!(
                    "[{}] Review complete: {} issues",
                    self.profile.display_name,
                    review.issues.len()
                );
                notify(
                    status,
                    self.profile.display_name,
                    format!("✓ Complete: Found {} issues", review.issues.len()),
                );
            }
            Err(error) => {
                warn!("[{}] Review failed: {}", self.profile.display_name, error);
                review.status = AgentStatus::Failed;
                review.summary = format!("Agent failed: {error}");
                notify(
                    status,
                    self.profile.display_name,
                    format!("✗ Failed: {error}"),
                );
            }
        }

        review
    }

    async fn run(
        &self,
        code: &str,
        language: &str,
        context: &str,
        status: Option<&StatusSender>,
    ) -> anyhow::Result<ModelFindings> {
        let user_prompt = self.build_user_prompt(code, language, context);

        notify(status, self.profile.display_name, "Analyzing code...");

        let messages = [
            ChatMessage::system(self.profile.instructions),
            ChatMessage::user(user_prompt),
        ];

        let payload = self.invoke_model(&messages, status).await?;

        let findings: ModelFindings = serde_json::from_str(&payload)
            .context("Model response did not match the expected review schema")?;
        Ok(findings)
    }

    fn build_user_prompt(&self, code: &str, language: &str, context: &str) -> String {
        let context_section = if context.is_empty() {
            String::new()
        } else {
            format!("Context: {context}\n\n")
        };

        format!(
            r#"Review the following {language} code for {concern} issues.

{context_section}Code:
```{language}
{code}
```

Provide your analysis in the following JSON format:
{{
    "thinking": "Your detailed reasoning process",
    "issues": [
        {{
            "severity": "critical|high|medium|low|info",
            "line_number": <line number or null>,
            "issue": "Description of the issue",
            "suggestion": "How to fix it"
        }}
    ],
    "summary": "Overall summary of your findings"
}}"#,
            concern = self.profile.kind.as_str(),
        )
    }

    /// Call the service with model fallback and bounded retries.
    ///
    /// Connection and generic API faults retry the same model up to the
    /// budget. A rate limit or an unavailable model abandons the model
    /// immediately without consuming a retry. When every model/retry
    /// combination is exhausted, the last observed error is reported.
    async fn invoke_model(
        &self,
        messages: &[ChatMessage],
        status: Option<&StatusSender>,
    ) -> anyhow::Result<String> {
        let mut last_error = String::new();

        for model in &self.models {
            for attempt in 0..self.max_retries {
                if attempt > 0 {
                    notify(
                        status,
                        self.profile.display_name,
                        format!(
                            "Retrying with {model} (attempt {}/{})...",
                            attempt + 1,
                            self.max_retries
                        ),
                    );
                }

                match self
                    .client
                    .complete(model, messages, self.temperature)
                    .await
                {
                    Ok(payload) => return Ok(payload),
                    Err(error) => {
                        last_error = error.to_string();
                        match error {
                            LlmError::RateLimited(_) => {
                                debug!(
                                    "[{}] {} rate limited, switching models",
                                    self.profile.display_name, model
                                );
                                notify(
                                    status,
                                    self.profile.display_name,
                                    "Rate limited, trying next model...",
                                );
                                break;
                            }
                            LlmError::ModelUnavailable(_) => {
                                debug!(
                                    "[{}] {} unavailable, switching models",
                                    self.profile.display_name, model
                                );
                                notify(
                                    status,
                                    self.profile.display_name,
                                    format!("Model {model} not available, trying fallback..."),
                                );
                                break;
                            }
                            LlmError::Connection(_) | LlmError::Api(_) => {
                                debug!(
                                    "[{}] Attempt {}/{} on {} failed: {}",
                                    self.profile.display_name,
                                    attempt + 1,
                                    self.max_retries,
                                    model,
                                    last_error
                                );
                            }
                        }
                    }
                }
            }
        }

        Err(anyhow!("All models failed. Last error: {last_error}"))
    }
}
