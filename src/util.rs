//! Small shared helpers

/// Find the candidate name closest to `target` by edit distance, for
/// did-you-mean suggestions in contract-violation hints.
///
/// Returns `None` when no candidate is reasonably close (distance > half the
/// target length) or when the closest candidate is the target itself.
pub fn closest_name<'a>(target: &str, candidates: &'a [String]) -> Option<&'a str> {
    let max_distance = (target.len() / 2).max(1) as u32;

    let mut best: Option<(&str, u32)> = None;
    for candidate in candidates {
        if candidate == target {
            continue;
        }
        let distance = triple_accel::levenshtein(target.as_bytes(), candidate.as_bytes());
        if distance <= max_distance && best.map(|(_, d)| distance < d).unwrap_or(true) {
            best = Some((candidate, distance));
        }
    }

    best.map(|(name, _)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closest_name_finds_typo() {
        let candidates = vec!["Pattient".to_string(), "Gehege".to_string()];
        assert_eq!(closest_name("Patient", &candidates), Some("Pattient"));
    }

    #[test]
    fn test_closest_name_rejects_unrelated() {
        let candidates = vec!["Gehege".to_string()];
        assert_eq!(closest_name("Patient", &candidates), None);
    }

    #[test]
    fn test_closest_name_empty_candidates() {
        assert_eq!(closest_name("Patient", &[]), None);
    }
}
