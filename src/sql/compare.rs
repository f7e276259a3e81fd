//! Row-set comparison
//!
//! Exact, order-sensitive comparison of the observed grid against the
//! authored expectation. Exercises that accept any ordering say so in their
//! expected query with an ORDER BY; the comparator itself never sorts.

use crate::sql::sandbox::RowSet;

/// `true` iff the grids match cell-for-cell: same row count, every row the
/// same width, every cell textually identical.
pub fn rowsets_equal(actual: &RowSet, expected: &RowSet) -> bool {
    if actual.len() != expected.len() {
        return false;
    }
    for (actual_row, expected_row) in actual.iter().zip(expected) {
        // Width mismatch fails the row before any cell comparison, so a
        // learner selecting too few columns never passes on a prefix match.
        if actual_row.len() != expected_row.len() {
            return false;
        }
        if actual_row != expected_row {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> RowSet {
        data.iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_equal_grids_match() {
        let a = rows(&[&["Faust", "9.95"], &["Die Verwandlung", "7.5"]]);
        assert!(rowsets_equal(&a, &a.clone()));
    }

    #[test]
    fn test_row_count_mismatch_fails() {
        let actual = rows(&[&["Faust"]]);
        let expected = rows(&[&["Faust"], &["Die Verwandlung"]]);
        assert!(!rowsets_equal(&actual, &expected));
    }

    #[test]
    fn test_width_mismatch_fails_even_on_prefix_match() {
        // Learner selected only Titel; expectation carries Titel and Preis.
        let actual = rows(&[&["Faust"]]);
        let expected = rows(&[&["Faust", "9.95"]]);
        assert!(!rowsets_equal(&actual, &expected));
    }

    #[test]
    fn test_order_matters() {
        let actual = rows(&[&["B"], &["A"]]);
        let expected = rows(&[&["A"], &["B"]]);
        assert!(!rowsets_equal(&actual, &expected));
    }

    #[test]
    fn test_empty_grids_match() {
        assert!(rowsets_equal(&RowSet::new(), &RowSet::new()));
    }
}
