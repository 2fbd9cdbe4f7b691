/// Case-insensitive sequence-alignment similarity between two strings,
/// on a 0.0–1.0 scale where 1.0 means identical. Computed as twice the
/// total length of matching blocks over the summed lengths, the classic
/// diff ratio.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_total(&a, &b) as f64 / total as f64
}

/// Total length of matching blocks: the longest common run, plus matches
/// recursively found to its left and right.
fn matching_total(a: &[char], b: &[char]) -> usize {
    let (i, j, len) = longest_common_run(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_total(&a[..i], &b[..j]) + matching_total(&a[i + len..], &b[j + len..])
}

/// Longest common contiguous run between `a` and `b`, returned as
/// (start in a, start in b, length). Ties resolve to the earliest run.
fn longest_common_run(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    if a.is_empty() || b.is_empty() {
        return best;
    }

    // Rolling row: run_len[j] = length of the common run ending at (i, j).
    let mut prev = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        for (j, &cb) in b.iter().enumerate() {
            if ca == cb {
                let len = prev[j] + 1;
                current[j + 1] = len;
                if len > best.2 {
                    best = (i + 1 - len, j + 1 - len, len);
                }
            } else {
                current[j + 1] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut current);
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_one() {
        assert_eq!(similarity("sql injection", "sql injection"), 1.0);
    }

    #[test]
    fn comparison_is_case_insensitive() {
        assert_eq!(similarity("SQL Injection", "sql injection"), 1.0);
    }

    #[test]
    fn empty_strings_score_one() {
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn one_empty_string_scores_zero() {
        assert_eq!(similarity("abc", ""), 0.0);
    }

    #[test]
    fn disjoint_strings_score_zero() {
        assert_eq!(similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn near_duplicate_descriptions_exceed_match_threshold() {
        let score = similarity(
            "SQL injection via string formatting",
            "SQL injection risk via string formatting",
        );
        assert!(score > 0.7, "expected > 0.7, got {score}");
    }

    #[test]
    fn reworded_descriptions_can_fall_below_match_threshold() {
        // Distinct wordings of the same finding only merge on text when the
        // ratio clears 0.7; this pair relies on line-number matching instead.
        let score = similarity(
            "SQL injection via string interpolation",
            "SQL injection risk using string formatting",
        );
        assert!((score - 0.625).abs() < 1e-9);
    }

    #[test]
    fn unrelated_descriptions_stay_below_match_threshold() {
        let score = similarity(
            "Unbounded memory growth in request cache",
            "Missing docstring on public function",
        );
        assert!(score < 0.7, "expected < 0.7, got {score}");
    }

    #[test]
    fn partial_overlap_scores_between_zero_and_one() {
        let score = similarity("abcd", "bcde");
        // Matching block "bcd" of length 3: 2*3 / 8.
        assert!((score - 0.75).abs() < 1e-9);
    }
}
