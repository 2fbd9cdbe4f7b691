use crate::types::CodeReviewResponse;

/// Render a finished review as Markdown for console or file output.
pub fn format_report(response: &CodeReviewResponse) -> String {
    let mut output = String::new();

    output.push_str(&format!("# Code Review {}\n\n", response.review_id));
    output.push_str(&response.overall_summary);
    output.push('\n');

    if let Some(quality) = &response.quality_score {
        output.push_str("\n## Scores\n\n");
        output.push_str(&format!(
            "- Overall: {}/100 ({})\n",
            quality.overall_score, quality.grade
        ));
        output.push_str(&format!("- Security: {}/100\n", quality.security_score));
        output.push_str(&format!("- Performance: {}/100\n", quality.performance_score));
        output.push_str(&format!("- Style: {}/100\n", quality.style_score));
        if let (Some(projected), Some(grade)) =
            (quality.projected_score, quality.projected_grade)
        {
            output.push_str(&format!(
                "- Projected after fixing critical/high issues: {}/100 ({})\n",
                projected, grade
            ));
        }
    }

    if !response.unique_issues.is_empty() {
        output.push_str(&format!(
            "\n## Unique Issues ({} of {} raw findings)\n\n",
            response.unique_issues.len(),
            response.total_issues
        ));
        for issue in &response.unique_issues {
            let location = match issue.line_number {
                Some(line) => format!("line {line}"),
                None => "no line".to_string(),
            };
            output.push_str(&format!(
                "- [{}] {}: {} (found by {})\n",
                issue.severity.label(),
                location,
                issue.issue,
                issue.found_by.join(", ")
            ));
            output.push_str(&format!("  Fix: {}\n", issue.suggestion));
        }
    }

    output.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        AgentKind, AgentReview, AgentStatus, CodeQualityScore, Grade, ReviewIssue, Severity,
    };

    fn sample_response() -> CodeReviewResponse {
        CodeReviewResponse {
            review_id: "rid-1".to_string(),
            agent_reviews: vec![AgentReview {
                agent_type: AgentKind::Security,
                status: AgentStatus::Completed,
                issues: Vec::new(),
                summary: "One issue".to_string(),
                thinking: String::new(),
            }],
            overall_summary: "**Code Review Complete** | Grade: **B** (84.4/100)".to_string(),
            total_issues: 2,
            unique_issues: vec![ReviewIssue {
                severity: Severity::Critical,
                line_number: Some(5),
                issue: "SQL injection via string interpolation".to_string(),
                suggestion: "Use parameterized queries".to_string(),
                found_by: vec!["Security".to_string(), "Style".to_string()],
            }],
            quality_score: Some(CodeQualityScore {
                overall_score: 84.4,
                security_score: 61.0,
                performance_score: 100.0,
                style_score: 100.0,
                grade: Grade::B,
                projected_score: Some(100.0),
                projected_grade: Some(Grade::APlus),
            }),
        }
    }

    #[test]
    fn report_carries_scores_issues_and_provenance() {
        let report = format_report(&sample_response());
        assert!(report.contains("# Code Review rid-1"));
        assert!(report.contains("- Overall: 84.4/100 (B)"));
        assert!(report.contains("[CRITICAL] line 5: SQL injection via string interpolation"));
        assert!(report.contains("(found by Security, Style)"));
        assert!(report.contains("Fix: Use parameterized queries"));
        assert!(report.contains("Projected after fixing critical/high issues: 100/100 (A+)"));
    }

    #[test]
    fn report_without_issues_omits_the_issue_section() {
        let mut response = sample_response();
        response.unique_issues.clear();
        let report = format_report(&response);
        assert!(!report.contains("## Unique Issues"));
    }
}
