use tracing::{debug, warn};

use super::classifier::Classifier;
use crate::domain::models::{CatalogEntry, RemoteNode};
use crate::error::ListingError;
use crate::infra::remote::RemoteFs;

pub const DEFAULT_MAX_ENTRIES: usize = 10;

/// Pre-order stepper over a remote tree, in listing order.
///
/// The root is yielded first. A yielded directory is expanded on the next
/// step unless [`Walker::skip_subtree`] is called in between. A failed listing
/// is yielded as an error and the walk carries on with the next sibling.
pub struct Walker<'a> {
    fs: &'a dyn RemoteFs,
    root: Option<String>,
    descend: Option<String>,
    stack: Vec<RemoteNode>,
}

impl<'a> Walker<'a> {
    pub fn new(fs: &'a dyn RemoteFs, root: &str) -> Self {
        Self {
            fs,
            root: Some(root.to_string()),
            descend: None,
            stack: Vec::new(),
        }
    }

    /// Prunes the directory most recently yielded.
    pub fn skip_subtree(&mut self) {
        self.descend = None;
    }

    fn yielded(&mut self, node: RemoteNode) -> RemoteNode {
        self.descend = node.is_dir.then(|| node.path.clone());
        node
    }
}

impl Iterator for Walker<'_> {
    type Item = Result<RemoteNode, ListingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(root) = self.root.take() {
            return Some(self.fs.stat(&root).map(|node| self.yielded(node)));
        }

        if let Some(dir) = self.descend.take() {
            match self.fs.read_dir(&dir) {
                Ok(children) => self.stack.extend(children.into_iter().rev()),
                Err(e) => return Some(Err(e)),
            }
        }

        let node = self.stack.pop()?;
        Some(Ok(self.yielded(node)))
    }
}

#[derive(Debug, Default)]
pub struct WalkOutcome {
    pub entries: Vec<CatalogEntry>,
    pub listing_errors: usize,
}

/// Collects up to `max_entries` catalog entries from the tree under `root`.
///
/// Every directory below the root is inspected one level deep and then
/// pruned, whether or not it turned into a bundle.
pub fn walk(
    fs: &dyn RemoteFs,
    root: &str,
    classifier: &Classifier,
    max_entries: usize,
) -> WalkOutcome {
    let mut outcome = WalkOutcome::default();
    if max_entries == 0 {
        return outcome;
    }

    let mut walker = Walker::new(fs, root);
    while let Some(step) = walker.next() {
        let mut node = match step {
            Ok(node) => node,
            Err(e) => {
                warn!("Skipping {}: {e}", e.path());
                outcome.listing_errors += 1;
                continue;
            }
        };

        if node.path == root {
            continue;
        }

        if node.is_dir {
            walker.skip_subtree();
            match fs.read_dir(&node.path) {
                Ok(children) => node = node.with_children(children),
                Err(e) => {
                    warn!("Error reading dir {}, skipping: {e}", node.path);
                    outcome.listing_errors += 1;
                    continue;
                }
            }
        }

        let Some(entry) = classifier.classify(&node, root).into_entry() else {
            debug!("Skipped {} ({:?} bytes)", node.path, node.meta.size);
            continue;
        };
        debug!("Found {:?} at {}", entry.title, entry.full_path);
        outcome.entries.push(entry);
        if outcome.entries.len() >= max_entries {
            break;
        }
    }

    outcome
}
