use crate::types::{AgentReview, AgentStatus, ReviewIssue};
use crate::util::similarity;

/// Two issue descriptions above this similarity are the same finding.
const MATCH_THRESHOLD: f64 = 0.70;
/// Below this similarity, a duplicate's suggestion is kept as an alternative.
const SUGGESTION_THRESHOLD: f64 = 0.80;

/// Line-number sentinel that sorts issues without a line after all others.
const UNSET_LINE: u32 = u32::MAX;

/// Merge near-duplicate issues found by different agents into unique issues
/// with provenance. Pure function of the input; completed agents only.
///
/// Matching is greedy: each issue merges into the first accepted unique
/// issue it matches, in acceptance order. Output is sorted by severity rank,
/// then line number, unset lines last.
pub fn dedupe_issues(agent_reviews: &[AgentReview]) -> Vec<ReviewIssue> {
    let mut unique_issues: Vec<ReviewIssue> = Vec::new();

    for review in agent_reviews {
        if review.status != AgentStatus::Completed {
            continue;
        }
        let agent_name = review.agent_type.title();

        for issue in &review.issues {
            match unique_issues.iter_mut().find(|unique| is_duplicate(issue, unique)) {
                Some(existing) => merge_into(existing, issue, agent_name),
                None => {
                    let mut fresh = issue.clone();
                    fresh.found_by = vec![agent_name.to_string()];
                    unique_issues.push(fresh);
                }
            }
        }
    }

    unique_issues.sort_by_key(|issue| {
        (issue.severity.rank(), issue.line_number.unwrap_or(UNSET_LINE))
    });
    unique_issues
}

/// Issues are duplicates when both carry the same specified line number, or
/// when their descriptions are sufficiently similar.
fn is_duplicate(issue: &ReviewIssue, unique: &ReviewIssue) -> bool {
    let same_line = matches!(
        (issue.line_number, unique.line_number),
        (Some(a), Some(b)) if a == b
    );
    same_line || similarity(&issue.issue, &unique.issue) > MATCH_THRESHOLD
}

fn merge_into(existing: &mut ReviewIssue, issue: &ReviewIssue, agent_name: &str) {
    if !existing.found_by.iter().any(|name| name == agent_name) {
        existing.found_by.push(agent_name.to_string());
    }

    // Escalate to the stricter severity.
    if issue.severity.rank() < existing.severity.rank() {
        existing.severity = issue.severity;
    }

    if similarity(&issue.suggestion, &existing.suggestion) < SUGGESTION_THRESHOLD {
        existing
            .suggestion
            .push_str(&format!(" | Alternative: {}", issue.suggestion));
    }
}
