use davpanel_core::{decode_path, normalize_path};
use scraper::{Html, Selector};
use url::Url;

use super::EntryDraft;

const SKIPPED_HREFS: &[&str] = &["..", "../", ".", "./"];

/// Extract child links from an HTML index page served for `directory`.
///
/// Parent/self links, in-page links, links to other hosts and links that do not
/// point below `directory` are dropped. Hrefs are resolved against `directory`,
/// which must end with `/`.
pub(crate) fn parse_anchor_listing(html: &str, directory: &Url) -> Vec<EntryDraft> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?.trim();
            let url = resolve_child(href, directory)?;
            let text = anchor.text().collect::<String>();
            let text = text.trim().trim_end_matches('/').trim();
            Some(EntryDraft {
                href: url.to_string(),
                resource_type: None,
                content_length: None,
                last_modified: None,
                display_name: (!text.is_empty()).then(|| text.to_string()),
            })
        })
        .collect()
}

fn resolve_child(href: &str, directory: &Url) -> Option<Url> {
    if href.is_empty() || SKIPPED_HREFS.contains(&href) {
        return None;
    }
    let lower = href.to_ascii_lowercase();
    if lower.starts_with('#')
        || lower.starts_with('?')
        || lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
    {
        return None;
    }

    let mut url = directory.join(href).ok()?;
    url.set_fragment(None);
    url.set_query(None);
    if url.scheme() != directory.scheme()
        || url.host_str() != directory.host_str()
        || url.port_or_known_default() != directory.port_or_known_default()
    {
        return None;
    }
    is_below(url.path(), directory.path()).then_some(url)
}

/// Compares decoded, normalized paths so equivalent percent-encodings match.
fn is_below(path: &str, directory: &str) -> bool {
    let (Ok(path), Ok(directory)) = (decode_path(path), decode_path(directory)) else {
        return false;
    };
    let path = normalize_path(&path);
    let directory = normalize_path(&directory);
    if path == directory {
        return false;
    }
    directory == "/" || path.starts_with(&format!("{directory}/"))
}
