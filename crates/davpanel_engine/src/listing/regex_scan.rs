use std::sync::OnceLock;

use regex::Regex;

use super::EntryDraft;
use crate::ParseError;

static RESPONSE_OPEN_RE: OnceLock<Regex> = OnceLock::new();
static HREF_RE: OnceLock<Regex> = OnceLock::new();
static LENGTH_RE: OnceLock<Regex> = OnceLock::new();
static MODIFIED_RE: OnceLock<Regex> = OnceLock::new();
static RESOURCE_TYPE_RE: OnceLock<Regex> = OnceLock::new();
static COLLECTION_RE: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("listing regex"))
}

fn element_text(cell: &'static OnceLock<Regex>, pattern: &str, block: &str) -> Option<String> {
    compiled(cell, pattern)
        .captures(block)
        .and_then(|caps| caps.get(1))
        .map(|m| unescape(m.as_str().trim()))
}

fn unescape(raw: &str) -> String {
    quick_xml::escape::unescape(raw)
        .map(|text| text.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// Best-effort scan of a malformed multistatus body.
///
/// The body is cut into blocks at each opening `response` tag, so a missing
/// closing tag only affects its own block.
pub(crate) fn scan_multistatus(body: &str) -> Result<Vec<EntryDraft>, ParseError> {
    let starts: Vec<usize> = compiled(&RESPONSE_OPEN_RE, r"(?i)<(?:[a-z0-9_.-]+:)?response[\s>]")
        .find_iter(body)
        .map(|m| m.start())
        .collect();

    let mut drafts = Vec::new();
    for (index, start) in starts.iter().enumerate() {
        let end = starts.get(index + 1).copied().unwrap_or(body.len());
        let block = &body[*start..end];

        let Some(href) = element_text(
            &HREF_RE,
            r"(?is)<(?:[a-z0-9_.-]+:)?href[^>]*>(.*?)</(?:[a-z0-9_.-]+:)?href\s*>",
            block,
        ) else {
            continue;
        };

        let resource_type = compiled(&RESOURCE_TYPE_RE, r"(?i)<(?:[a-z0-9_.-]+:)?resourcetype\b")
            .is_match(block)
            .then(|| {
                compiled(&COLLECTION_RE, r"(?i)<(?:[a-z0-9_.-]+:)?collection\b").is_match(block)
            });

        drafts.push(EntryDraft {
            href,
            resource_type,
            content_length: element_text(
                &LENGTH_RE,
                r"(?is)<(?:[a-z0-9_.-]+:)?getcontentlength[^>]*>(.*?)</",
                block,
            ),
            last_modified: element_text(
                &MODIFIED_RE,
                r"(?is)<(?:[a-z0-9_.-]+:)?getlastmodified[^>]*>(.*?)</",
                block,
            ),
            display_name: None,
        });
    }

    if drafts.is_empty() {
        return Err(ParseError::NoResponses);
    }
    Ok(drafts)
}
