use tracing::{debug, warn};

use crate::domain::models::{CatalogEntry, MovieMatch};
use crate::error::LookupError;

/// Title search against an external metadata service. Results come back in
/// the service's own ranking order.
pub trait TitleSearch {
    fn search(&self, title: &str) -> Result<Vec<MovieMatch>, LookupError>;
}

#[derive(Debug, Default)]
pub struct MatchOutcome {
    pub entries: Vec<CatalogEntry>,
    pub lookup_errors: usize,
}

/// Looks every entry up by title, one request at a time and in order, and
/// attaches the first candidate. Failures leave the entry unmatched.
pub fn match_entries(search: &dyn TitleSearch, entries: Vec<CatalogEntry>) -> MatchOutcome {
    let mut lookup_errors = 0;
    let entries = entries
        .into_iter()
        .map(|mut entry| {
            match search.search(&entry.title) {
                Ok(candidates) => match candidates.into_iter().next() {
                    Some(best) => {
                        debug!("Matched {:?} to {:?} ({})", entry.title, best.title, best.imdb_id);
                        entry.matched = Some(best);
                    }
                    None => debug!("No match for {:?}", entry.title),
                },
                Err(e) => {
                    warn!("Error fetching movie: {e}");
                    lookup_errors += 1;
                }
            }
            entry
        })
        .collect();

    MatchOutcome {
        entries,
        lookup_errors,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Canned answers keyed by title. Unknown titles fail like a dropped
    /// connection would.
    #[derive(Default)]
    pub(crate) struct FakeSearch {
        answers: HashMap<String, Vec<MovieMatch>>,
        pub queries: RefCell<Vec<String>>,
    }

    impl FakeSearch {
        pub fn answer(mut self, title: &str, posters: &[&str]) -> Self {
            let candidates = posters
                .iter()
                .enumerate()
                .map(|(i, poster)| MovieMatch {
                    title: format!("{title} #{i}"),
                    poster: poster.to_string(),
                    ..MovieMatch::default()
                })
                .collect();
            self.answers.insert(title.to_string(), candidates);
            self
        }
    }

    impl TitleSearch for FakeSearch {
        fn search(&self, title: &str) -> Result<Vec<MovieMatch>, LookupError> {
            self.queries.borrow_mut().push(title.to_string());
            self.answers
                .get(title)
                .cloned()
                .ok_or_else(|| LookupError::Status {
                    title: title.to_string(),
                    status: 504,
                })
        }
    }

    #[test]
    fn test_first_candidate_wins() {
        let search = FakeSearch::default().answer("Heat", &["p0", "p1"]);
        let outcome = match_entries(&search, vec![CatalogEntry::file("Heat", "/m/Heat.mkv")]);

        let matched = outcome.entries[0].matched.as_ref().unwrap();
        assert_eq!(matched.title, "Heat #0");
        assert_eq!(matched.poster, "p0");
        assert_eq!(outcome.lookup_errors, 0);
    }

    #[test]
    fn test_empty_result_leaves_entry_unmatched() {
        let search = FakeSearch::default().answer("Nothing", &[]);
        let outcome = match_entries(&search, vec![CatalogEntry::file("Nothing", "/m/n.mkv")]);

        assert_eq!(outcome.entries.len(), 1);
        assert!(outcome.entries[0].matched.is_none());
        assert_eq!(outcome.lookup_errors, 0);
    }

    #[test]
    fn test_failure_does_not_stop_the_rest() {
        let search = FakeSearch::default()
            .answer("Before", &["p"])
            .answer("After", &["p"]);
        let entries = vec![
            CatalogEntry::file("Before", "/m/1.mkv"),
            CatalogEntry::file("Broken", "/m/2.mkv"),
            CatalogEntry::file("After", "/m/3.mkv"),
        ];

        let outcome = match_entries(&search, entries);
        assert_eq!(*search.queries.borrow(), ["Before", "Broken", "After"]);
        assert!(outcome.entries[0].matched.is_some());
        assert!(outcome.entries[1].matched.is_none());
        assert!(outcome.entries[2].matched.is_some());
        assert_eq!(outcome.lookup_errors, 1);
    }

    #[test]
    fn test_searches_by_normalized_title_not_path() {
        let search = FakeSearch::default().answer("Inception", &["p"]);
        let bundle = CatalogEntry::bundle(
            "Inception",
            "/movies/Inception",
            vec![CatalogEntry::file("movie.mkv", "/movies/Inception/movie.mkv")],
        );

        let outcome = match_entries(&search, vec![bundle]);
        assert_eq!(*search.queries.borrow(), ["Inception"]);
        // Members are never looked up themselves.
        assert!(outcome.entries[0].members[0].matched.is_none());
    }
}
