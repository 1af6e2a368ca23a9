use davpanel_core::DirectoryEntry;
use panel_logging::panel_debug;

use crate::ListingClient;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Expansion {
    /// Leaf files in discovery order.
    pub files: Vec<DirectoryEntry>,
    /// Directories listed, including the root.
    pub directories_visited: usize,
}

/// Flattens a remote directory tree into its leaf files.
///
/// Traversal uses an explicit stack of pending child lists, so output order is
/// depth-first with children before later siblings. The tree is assumed to be
/// acyclic; a subtree whose listing fails simply contributes nothing.
pub struct FolderExpander<'a> {
    listing: &'a dyn ListingClient,
}

impl<'a> FolderExpander<'a> {
    pub fn new(listing: &'a dyn ListingClient) -> Self {
        Self { listing }
    }

    pub async fn expand(&self, folder_path: &str) -> Vec<DirectoryEntry> {
        self.expand_with_report(folder_path).await.files
    }

    pub async fn expand_with_report(&self, folder_path: &str) -> Expansion {
        let mut expansion = Expansion {
            files: Vec::new(),
            directories_visited: 1,
        };
        let root = self.listing.list(folder_path).await;
        let mut pending = vec![root.into_iter()];

        while let Some(frame) = pending.last_mut() {
            match frame.next() {
                None => {
                    pending.pop();
                }
                Some(entry) if entry.is_directory => {
                    panel_debug!("descending into {}", entry.path);
                    expansion.directories_visited += 1;
                    let children = self.listing.list(&entry.path).await;
                    pending.push(children.into_iter());
                }
                Some(entry) => expansion.files.push(entry),
            }
        }

        panel_debug!(
            "expanded {}: {} files across {} directories",
            folder_path,
            expansion.files.len(),
            expansion.directories_visited
        );
        expansion
    }
}
