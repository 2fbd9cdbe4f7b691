use crate::types::{CodeQualityScore, Grade, ReviewIssue, Severity};

// Base deduction weights per severity tier. Empirically chosen alongside the
// dedup thresholds; changing any of them requires re-validating the scoring
// scenarios in the tests below.
const CRITICAL_WEIGHT: f64 = 30.0;
const HIGH_WEIGHT: f64 = 15.0;
const MEDIUM_WEIGHT: f64 = 6.0;
const LOW_WEIGHT: f64 = 2.0;
const INFO_WEIGHT: f64 = 1.0;

// Concern shares of the overall score. Security carries the most weight.
const SECURITY_SHARE: f64 = 0.40;
const PERFORMANCE_SHARE: f64 = 0.35;
const STYLE_SHARE: f64 = 0.25;

/// Deduction cap: keeps the displayed score from going negative.
const MAX_DEDUCTION: f64 = 100.0;

#[derive(Default)]
struct SeverityCounts {
    critical: usize,
    high: usize,
    medium: usize,
    low: usize,
    info: usize,
}

impl SeverityCounts {
    fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
            Severity::Info => self.info += 1,
        }
    }
}

/// Log-scaled deduction: one critical lands near −39 and must dominate the
/// score, while further issues of the same tier compound sub-linearly.
/// Medium and below deduct linearly. Capped at 100.
fn weighted_deduction(counts: &SeverityCounts) -> f64 {
    let mut deduction = 0.0;

    if counts.critical > 0 {
        let count = counts.critical as f64;
        deduction += CRITICAL_WEIGHT * count * (1.0 + (count + 1.0).log10());
    }
    if counts.high > 0 {
        let count = counts.high as f64;
        deduction += HIGH_WEIGHT * count * (1.0 + 0.5 * (count + 1.0).log10());
    }
    deduction += MEDIUM_WEIGHT * counts.medium as f64;
    deduction += LOW_WEIGHT * counts.low as f64;
    deduction += INFO_WEIGHT * counts.info as f64;

    deduction.min(MAX_DEDUCTION)
}

/// Issues attributed to a concern via `found_by`, case-insensitive.
fn attributed<'a>(
    unique_issues: &'a [ReviewIssue],
    concern: &'a str,
) -> impl Iterator<Item = &'a ReviewIssue> {
    unique_issues.iter().filter(move |issue| {
        issue
            .found_by
            .iter()
            .any(|name| name.eq_ignore_ascii_case(concern))
    })
}

fn concern_score(unique_issues: &[ReviewIssue], concern: &str) -> f64 {
    let mut counts = SeverityCounts::default();
    let mut any = false;
    for issue in attributed(unique_issues, concern) {
        any = true;
        counts.add(issue.severity);
    }
    if !any {
        return 100.0;
    }
    (100.0 - weighted_deduction(&counts)).max(0.0)
}

/// Score for a concern assuming its critical and high issues are resolved:
/// only medium/low/info issues are counted.
fn projected_concern_score(unique_issues: &[ReviewIssue], concern: &str) -> f64 {
    let mut counts = SeverityCounts::default();
    let mut any = false;
    for issue in attributed(unique_issues, concern) {
        any = true;
        if matches!(issue.severity, Severity::Medium | Severity::Low | Severity::Info) {
            counts.add(issue.severity);
        }
    }
    if !any {
        return 100.0;
    }
    (100.0 - weighted_deduction(&counts)).max(0.0)
}

fn grade_for(score: f64) -> Grade {
    if score >= 95.0 {
        Grade::APlus
    } else if score >= 90.0 {
        Grade::A
    } else if score >= 80.0 {
        Grade::B
    } else if score >= 70.0 {
        Grade::C
    } else if score >= 60.0 {
        Grade::D
    } else {
        Grade::F
    }
}

fn round_one_decimal(score: f64) -> f64 {
    (score * 10.0).round() / 10.0
}

/// Convert the deduplicated issue list into per-concern scores, an overall
/// weighted score with grade, and the projected score after fixing all
/// critical/high issues. Grades derive from unrounded scores; stored values
/// carry one decimal.
pub fn calculate_quality_score(unique_issues: &[ReviewIssue]) -> CodeQualityScore {
    let security = concern_score(unique_issues, "security");
    let performance = concern_score(unique_issues, "performance");
    let style = concern_score(unique_issues, "style");

    let overall =
        security * SECURITY_SHARE + performance * PERFORMANCE_SHARE + style * STYLE_SHARE;

    let projected_security = projected_concern_score(unique_issues, "security");
    let projected_performance = projected_concern_score(unique_issues, "performance");
    let projected_style = projected_concern_score(unique_issues, "style");

    let projected = projected_security * SECURITY_SHARE
        + projected_performance * PERFORMANCE_SHARE
        + projected_style * STYLE_SHARE;

    CodeQualityScore {
        overall_score: round_one_decimal(overall),
        security_score: round_one_decimal(security),
        performance_score: round_one_decimal(performance),
        style_score: round_one_decimal(style),
        grade: grade_for(overall),
        projected_score: Some(round_one_decimal(projected)),
        projected_grade: Some(grade_for(projected)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(severity: Severity, found_by: &[&str]) -> ReviewIssue {
        ReviewIssue {
            severity,
            line_number: None,
            issue: "issue".to_string(),
            suggestion: "fix".to_string(),
            found_by: found_by.iter().map(|name| name.to_string()).collect(),
        }
    }

    #[test]
    fn no_issues_is_a_perfect_score() {
        let score = calculate_quality_score(&[]);
        assert_eq!(score.overall_score, 100.0);
        assert_eq!(score.security_score, 100.0);
        assert_eq!(score.performance_score, 100.0);
        assert_eq!(score.style_score, 100.0);
        assert_eq!(score.grade, Grade::APlus);
        assert_eq!(score.projected_score, Some(100.0));
        assert_eq!(score.projected_grade, Some(Grade::APlus));
    }

    #[test]
    fn one_critical_dominates_a_concern() {
        // 100 − 30·1·(1+log10(2)) ≈ 60.97, stored as 61.0.
        let issues = vec![issue(Severity::Critical, &["Security"])];
        let score = calculate_quality_score(&issues);

        assert!((score.security_score - 61.0).abs() < 1e-9);
        assert_eq!(score.performance_score, 100.0);
        assert_eq!(score.style_score, 100.0);
        // Overall reflects the 0.4 security share: ≈ 84.4, grade B.
        assert!((score.overall_score - 84.4).abs() < 1e-9);
        assert_eq!(score.grade, Grade::B);
        // Fixing the critical restores a perfect projection.
        assert_eq!(score.projected_score, Some(100.0));
        assert_eq!(score.projected_grade, Some(Grade::APlus));
    }

    #[test]
    fn criticals_compound_sublinearly_and_cap_at_zero() {
        let one = concern_score(&[issue(Severity::Critical, &["Security"])], "security");
        let two = concern_score(
            &vec![issue(Severity::Critical, &["Security"]); 2],
            "security",
        );
        let three = concern_score(
            &vec![issue(Severity::Critical, &["Security"]); 3],
            "security",
        );

        // 1 critical ≈ 61, 2 ≈ 11, 3+ floor at 0.
        assert!(one > two);
        assert!(two > three);
        assert_eq!(three, 0.0);
    }

    #[test]
    fn adding_a_critical_never_raises_a_score() {
        let mut issues = vec![
            issue(Severity::Medium, &["Performance"]),
            issue(Severity::Low, &["Performance"]),
        ];
        let before = concern_score(&issues, "performance");
        issues.push(issue(Severity::Critical, &["Performance"]));
        let after = concern_score(&issues, "performance");
        assert!(after <= before);
    }

    #[test]
    fn linear_tiers_cap_at_one_hundred() {
        // 20 medium issues deduct 120 uncapped; the cap floors the score at 0.
        let issues = vec![issue(Severity::Medium, &["Style"]); 20];
        assert_eq!(concern_score(&issues, "style"), 0.0);
    }

    #[test]
    fn attribution_is_case_insensitive_and_shared() {
        // An issue found by two agents counts against both concerns.
        let issues = vec![issue(Severity::High, &["security", "Style"])];
        let score = calculate_quality_score(&issues);
        assert!(score.security_score < 100.0);
        assert!(score.style_score < 100.0);
        assert_eq!(score.performance_score, 100.0);
    }

    #[test]
    fn projection_keeps_medium_and_below() {
        let issues = vec![
            issue(Severity::Critical, &["Security"]),
            issue(Severity::Medium, &["Security"]),
        ];
        let score = calculate_quality_score(&issues);
        // Projected security: only the medium remains, 100 − 6 = 94.
        // Weighted: 0.4·94 + 0.6·100 = 97.6.
        assert_eq!(score.projected_score, Some(97.6));
        assert_eq!(score.projected_grade, Some(Grade::APlus));
    }

    #[test]
    fn grade_boundaries_are_inclusive() {
        assert_eq!(grade_for(95.0), Grade::APlus);
        assert_eq!(grade_for(94.9), Grade::A);
        assert_eq!(grade_for(90.0), Grade::A);
        assert_eq!(grade_for(80.0), Grade::B);
        assert_eq!(grade_for(70.0), Grade::C);
        assert_eq!(grade_for(60.0), Grade::D);
        assert_eq!(grade_for(59.9), Grade::F);
    }
}
