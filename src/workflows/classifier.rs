use crate::domain::models::{base_name, join_remote, CatalogEntry, RemoteNode};
use crate::domain::title::normalize;

pub const VIDEO_EXTENSION: &str = ".mkv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Skip,
    SingleFile(CatalogEntry),
    BundleDir(CatalogEntry),
}

impl Classification {
    pub fn into_entry(self) -> Option<CatalogEntry> {
        match self {
            Self::Skip => None,
            Self::SingleFile(entry) | Self::BundleDir(entry) => Some(entry),
        }
    }
}

/// Decides what a single remote node contributes to the catalog.
#[derive(Debug, Clone)]
pub struct Classifier {
    video_extension: String,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(VIDEO_EXTENSION)
    }
}

impl Classifier {
    pub fn new(video_extension: impl Into<String>) -> Self {
        Self {
            video_extension: video_extension.into(),
        }
    }

    /// Case-sensitive comparison of the suffix after the last `.` of the base
    /// name, dot included.
    pub fn is_video(&self, name: &str) -> bool {
        let name = base_name(name);
        name.rfind('.')
            .is_some_and(|i| name[i..] == self.video_extension)
    }

    /// Classifies `node`. A directory is judged by its immediate `children`
    /// only; nothing below them is looked at.
    pub fn classify(&self, node: &RemoteNode, root: &str) -> Classification {
        if node.path == root {
            return Classification::Skip;
        }

        if node.is_dir {
            if !node.children.iter().any(|child| self.is_video(&child.name)) {
                return Classification::Skip;
            }
            let members = node
                .children
                .iter()
                .map(|child| {
                    CatalogEntry::file(child.name.clone(), join_remote(&node.path, &child.name))
                })
                .collect();
            return Classification::BundleDir(CatalogEntry::bundle(
                normalize(&node.path),
                node.path.clone(),
                members,
            ));
        }

        if self.is_video(&node.path) {
            return Classification::SingleFile(CatalogEntry::file(
                normalize(&node.path),
                node.path.clone(),
            ));
        }

        Classification::Skip
    }
}
