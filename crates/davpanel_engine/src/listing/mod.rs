//! Directory listing: the client contract and the three parse strategies.
mod anchors;
mod propfind;
mod regex_scan;

use davpanel_core::{
    decode_path, last_segment, normalize_path, DirectoryEntry, UrlBuilder,
};
use panel_logging::{panel_trace, panel_warn};

use crate::{EntryError, ParseError};

pub(crate) use anchors::parse_anchor_listing;
pub(crate) use propfind::parse_multistatus;
pub(crate) use regex_scan::scan_multistatus;

/// Lists the immediate children of a remote directory.
///
/// Implementations never fail: a listing that cannot be obtained is logged
/// and reported as empty.
#[async_trait::async_trait]
pub trait ListingClient: Send + Sync {
    async fn list(&self, path: &str) -> Vec<DirectoryEntry>;
}

/// Which parser produced a listing, in the order they are attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingStrategy {
    Structured,
    Regex,
    PlainLink,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub strategy: ListingStrategy,
    pub entries: Vec<DirectoryEntry>,
}

/// Raw fields pulled out of one listing item before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct EntryDraft {
    pub href: String,
    /// `Some(is_collection)` when the item carried a resource-type field.
    pub resource_type: Option<bool>,
    pub content_length: Option<String>,
    pub last_modified: Option<String>,
    pub display_name: Option<String>,
}

/// Parse a PROPFIND body, trying the structured parser before the regex scan.
pub(crate) fn parse_propfind_body(
    body: &str,
) -> Result<(ListingStrategy, Vec<EntryDraft>), ParseError> {
    match parse_multistatus(body) {
        Ok(drafts) => Ok((ListingStrategy::Structured, drafts)),
        Err(err) => {
            panel_warn!("structured listing parse failed: {}; trying regex scan", err);
            scan_multistatus(body).map(|drafts| (ListingStrategy::Regex, drafts))
        }
    }
}

/// Validates drafts against the queried directory and builds entries.
pub(crate) struct EntryAssembler<'a> {
    urls: &'a UrlBuilder,
    self_key: String,
}

impl<'a> EntryAssembler<'a> {
    pub fn new(urls: &'a UrlBuilder, queried_reference: &str) -> Self {
        let self_key = urls
            .resource_key(queried_reference)
            .unwrap_or_else(|_| normalize_path(queried_reference));
        Self { urls, self_key }
    }

    /// Builds entries in order, skipping the self-entry, invalid drafts and repeated paths.
    pub fn assemble(&self, strategy: ListingStrategy, drafts: Vec<EntryDraft>) -> Listing {
        let mut entries: Vec<DirectoryEntry> = Vec::with_capacity(drafts.len());
        for draft in drafts {
            match self.finish(draft) {
                Ok(Some(entry)) => {
                    if entries.iter().all(|existing| existing.path != entry.path) {
                        entries.push(entry);
                    }
                }
                Ok(None) => {}
                Err(err) => panel_warn!("skipping listing entry: {}", err),
            }
        }
        Listing { strategy, entries }
    }

    fn finish(&self, draft: EntryDraft) -> Result<Option<DirectoryEntry>, EntryError> {
        let href = draft.href.trim();
        if href.is_empty() {
            return Err(EntryError::MissingHref);
        }
        let url = self.urls.resolve(href)?;
        let fetch_reference = url.path().to_string();
        let path = decode_path(&fetch_reference)
            .map_err(|_| EntryError::Undecodable(href.to_string()))?;
        if normalize_path(&path) == self.self_key {
            panel_trace!("dropping self entry {}", path);
            return Ok(None);
        }

        let name = draft
            .display_name
            .as_deref()
            .map(|name| name.trim().trim_end_matches('/'))
            .filter(|name| !name.is_empty())
            .or_else(|| last_segment(&path))
            .ok_or_else(|| EntryError::NoName(href.to_string()))?
            .to_string();

        // Without a resource-type field, only a trailing separator marks a directory.
        let is_directory = draft
            .resource_type
            .unwrap_or_else(|| fetch_reference.ends_with('/'));
        let size = if is_directory {
            0
        } else {
            draft
                .content_length
                .as_deref()
                .and_then(|raw| raw.trim().parse::<u64>().ok())
                .unwrap_or(0)
        };

        Ok(Some(DirectoryEntry {
            name,
            path,
            is_directory,
            size,
            modified: draft.last_modified.unwrap_or_default().trim().to_string(),
            fetch_reference,
        }))
    }
}
