use tracing::info;

use super::classifier::Classifier;
use super::matcher::{match_entries, TitleSearch};
use super::walker::{walk, DEFAULT_MAX_ENTRIES};
use crate::domain::models::CatalogEntry;
use crate::infra::remote::RemoteFs;

#[derive(Debug, Clone)]
pub struct AssembleOptions {
    pub root: String,
    pub max_entries: usize,
    pub classifier: Classifier,
}

impl AssembleOptions {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            max_entries: DEFAULT_MAX_ENTRIES,
            classifier: Classifier::default(),
        }
    }
}

/// What happened along the way. Not part of the published catalog.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AssemblyReport {
    pub walked: usize,
    pub matched: usize,
    pub published: usize,
    pub listing_errors: usize,
    pub lookup_errors: usize,
}

#[derive(Debug)]
pub struct Catalog {
    pub entries: Vec<CatalogEntry>,
    pub report: AssemblyReport,
}

/// Keeps only entries with a usable match, in their original order.
pub fn publishable(entries: Vec<CatalogEntry>) -> Vec<CatalogEntry> {
    entries.into_iter().filter(CatalogEntry::is_publishable).collect()
}

/// Walks the tree, looks every entry up and keeps the ones that matched.
pub fn assemble(fs: &dyn RemoteFs, search: &dyn TitleSearch, options: &AssembleOptions) -> Catalog {
    info!("Walking {} (up to {} entries)", options.root, options.max_entries);
    let walked = walk(fs, &options.root, &options.classifier, options.max_entries);
    let walked_count = walked.entries.len();

    info!("Looking up {walked_count} title(s)");
    let matched = match_entries(search, walked.entries);
    let matched_count = matched.entries.iter().filter(|e| e.matched.is_some()).count();

    let entries = publishable(matched.entries);
    let report = AssemblyReport {
        walked: walked_count,
        matched: matched_count,
        published: entries.len(),
        listing_errors: walked.listing_errors,
        lookup_errors: matched.lookup_errors,
    };
    info!(
        "Catalog ready: {} published of {} found ({} listing error(s), {} lookup error(s))",
        report.published, report.walked, report.listing_errors, report.lookup_errors
    );

    Catalog { entries, report }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::MovieMatch;
    use crate::workflows::matcher::tests::FakeSearch;
    use crate::workflows::walker::tests::FakeFs;

    fn with_poster(path: &str, poster: Option<&str>) -> CatalogEntry {
        let mut entry = CatalogEntry::file(path, path);
        entry.matched = poster.map(|p| MovieMatch {
            poster: p.to_string(),
            ..MovieMatch::default()
        });
        entry
    }

    #[test]
    fn test_publishable_filters_and_keeps_order() {
        let entries = vec![
            with_poster("a", Some("pa")),
            with_poster("b", None),
            with_poster("c", Some("")),
            with_poster("d", Some("pd")),
        ];
        let kept: Vec<_> = publishable(entries)
            .into_iter()
            .map(|e| e.full_path)
            .collect();
        assert_eq!(kept, ["a", "d"]);
    }

    #[test]
    fn test_assemble_end_to_end() {
        let fs = FakeFs::new()
            .file("/movies", "The.Matrix.1999.BluRay.x264-GROUP.mkv")
            .dir("/movies", "Inception")
            .file("/movies/Inception", "movie.mkv")
            .file("/movies/Inception", "movie.srt")
            .dir("/movies", "Subs")
            .file("/movies/Subs", "a.srt")
            .file("/movies", "Unknown.Film.mkv")
            .file("/movies", "Timeout.mkv")
            .file("/movies", "Heat.1995.mkv");
        let search = FakeSearch::default()
            .answer("The Matrix 1999", &["matrix.jpg"])
            .answer("Inception", &["inception.jpg"])
            .answer("Unknown Film", &[])
            .answer("Heat 1995", &["heat.jpg"]);

        let catalog = assemble(&fs, &search, &AssembleOptions::new("/movies"));

        let published: Vec<_> = catalog
            .entries
            .iter()
            .map(|e| e.full_path.as_str())
            .collect();
        assert_eq!(
            published,
            [
                "/movies/The.Matrix.1999.BluRay.x264-GROUP.mkv",
                "/movies/Inception",
                "/movies/Heat.1995.mkv"
            ]
        );
        assert_eq!(
            catalog.report,
            AssemblyReport {
                walked: 5,
                matched: 3,
                published: 3,
                listing_errors: 0,
                lookup_errors: 1,
            }
        );
        assert_eq!(catalog.entries[1].members.len(), 2);
    }

    #[test]
    fn test_assemble_respects_cap() {
        let fs = FakeFs::new()
            .file("/movies", "A.mkv")
            .file("/movies", "B.mkv")
            .file("/movies", "C.mkv");
        let search = FakeSearch::default()
            .answer("A", &["a"])
            .answer("B", &["b"])
            .answer("C", &["c"]);
        let options = AssembleOptions {
            max_entries: 2,
            ..AssembleOptions::new("/movies")
        };

        let catalog = assemble(&fs, &search, &options);
        assert_eq!(catalog.entries.len(), 2);
        assert_eq!(*search.queries.borrow(), ["A", "B"]);
    }
}
