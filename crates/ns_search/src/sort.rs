use std::cmp::Ordering;

use ns_core::{Article, SortCriterion};

/// Reorders `results` in place, newest date or highest title first.
///
/// Dates are compared as raw strings, which only orders correctly while
/// upstream keeps a single timestamp format. The sort is stable, so items
/// with equal keys keep their relative order across re-sorts.
pub fn sort(results: &mut [Article], criterion: SortCriterion) {
    results.sort_by(|a, b| compare(a, b, criterion));
}

fn compare(a: &Article, b: &Article, criterion: SortCriterion) -> Ordering {
    match criterion {
        SortCriterion::ByDate => b.published_at.cmp(&a.published_at),
        SortCriterion::ByTitle => b.title.cmp(&a.title),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn article(title: &str, date: &str) -> Article {
        Article::new(title, format!("https://example.com/{}", title), date)
    }

    fn sorted(mut results: Vec<Article>, criterion: SortCriterion) -> Vec<Article> {
        sort(&mut results, criterion);
        results
    }

    fn titles(results: &[Article]) -> Vec<&str> {
        results.iter().map(|a| a.title.as_str()).collect()
    }

    #[test]
    fn test_by_date_descending() {
        let results = sorted(
            vec![
                article("b", "2024-05-01T00:00:00Z"),
                article("a", "2024-05-03T00:00:00Z"),
                article("c", "2024-05-02T00:00:00Z"),
            ],
            SortCriterion::ByDate,
        );
        assert_eq!(titles(&results), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_by_title_descending() {
        let results = sorted(
            vec![article("Apollo", "1"), article("Gemini", "2"), article("Mercury", "3")],
            SortCriterion::ByTitle,
        );
        assert_eq!(titles(&results), vec!["Mercury", "Gemini", "Apollo"]);
    }

    #[test]
    fn test_equal_keys_keep_order() {
        let results = sorted(
            vec![
                article("first", "2024-05-01T00:00:00Z"),
                article("newer", "2024-06-01T00:00:00Z"),
                article("second", "2024-05-01T00:00:00Z"),
                article("third", "2024-05-01T00:00:00Z"),
            ],
            SortCriterion::ByDate,
        );
        assert_eq!(titles(&results), vec!["newer", "first", "second", "third"]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let once = sorted(
            vec![article("x", "2"), article("y", "3"), article("z", "2"), article("w", "1")],
            SortCriterion::ByDate,
        );
        let twice = sorted(once.clone(), SortCriterion::ByDate);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_dates_compare_as_strings() {
        // Mixed formats do not order chronologically.
        let results = sorted(
            vec![article("iso", "2024-05-01T00:00:00Z"), article("us", "5/2/2024")],
            SortCriterion::ByDate,
        );
        assert_eq!(titles(&results), vec!["us", "iso"]);
    }
}
