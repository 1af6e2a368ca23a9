use davpanel_core::{encode_path, DirectoryEntry, UrlBuilder};
use panel_logging::{panel_debug, panel_error, panel_info, panel_warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, Response};
use url::Url;

use crate::decode::decode_body_lossy;
use crate::listing::{
    parse_anchor_listing, parse_propfind_body, EntryAssembler, Listing, ListingClient,
    ListingStrategy,
};
use crate::{ClientSettings, ConnectError, ListingError, RequestError};

const PROPFIND_BODY: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<D:propfind xmlns:D="DAV:">
    <D:allprop/>
</D:propfind>"#;

/// WebDAV listing client with structured, regex and plain-link fallbacks.
#[derive(Debug, Clone)]
pub struct WebDavClient {
    http: reqwest::Client,
    urls: UrlBuilder,
}

impl WebDavClient {
    pub fn new(urls: UrlBuilder, settings: &ClientSettings) -> Result<Self, ConnectError> {
        Ok(Self {
            http: settings.build_client()?,
            urls,
        })
    }

    pub fn url_builder(&self) -> &UrlBuilder {
        &self.urls
    }

    /// Checks that the server answers at the base URL, via PROPFIND or plain GET.
    pub async fn probe(&self) -> Result<(), ConnectError> {
        let base = self.urls.base_url().clone();
        let propfind = match self.propfind(base.clone(), "0").await {
            Ok(_) => return Ok(()),
            Err(err) => err,
        };
        panel_debug!("probe PROPFIND failed ({}), trying GET", propfind);
        match self.get(base).await {
            Ok(_) => Ok(()),
            Err(get) => Err(ConnectError::RemoteUnreachable(format!(
                "propfind: {propfind}; get: {get}"
            ))),
        }
    }

    /// Lists `path` (percent-decoded) and reports which strategy produced the result.
    pub async fn fetch_listing(&self, path: &str) -> Result<Listing, ListingError> {
        let reference = request_reference(path);
        let assembler = EntryAssembler::new(&self.urls, &reference);
        let url = self.urls.resolve(&reference).map_err(|err| ListingError {
            propfind: err.to_string(),
            plain: "not attempted".to_string(),
        })?;

        let propfind_failure = match self.propfind(url.clone(), "1").await {
            Ok(body) => match parse_propfind_body(&body) {
                Ok((strategy, drafts)) => return Ok(assembler.assemble(strategy, drafts)),
                Err(err) => err.to_string(),
            },
            Err(err) => err.to_string(),
        };
        panel_warn!(
            "PROPFIND listing of {} unusable ({}); trying plain index page",
            path,
            propfind_failure
        );

        let directory = directory_url(url);
        match self.get(directory.clone()).await {
            Ok(html) => {
                let drafts = parse_anchor_listing(&html, &directory);
                Ok(assembler.assemble(ListingStrategy::PlainLink, drafts))
            }
            Err(err) => Err(ListingError {
                propfind: propfind_failure,
                plain: err.to_string(),
            }),
        }
    }

    async fn propfind(&self, url: Url, depth: &'static str) -> Result<String, RequestError> {
        let method = Method::from_bytes(b"PROPFIND")
            .map_err(|err| RequestError::Network(err.to_string()))?;
        let request = self
            .http
            .request(method, url)
            .header("Depth", depth)
            .header(CONTENT_TYPE, "application/xml")
            .body(PROPFIND_BODY);
        let response = self.authorize(request).send().await.map_err(network)?;
        read_body(response).await
    }

    async fn get(&self, url: Url) -> Result<String, RequestError> {
        let response = self
            .authorize(self.http.get(url))
            .send()
            .await
            .map_err(network)?;
        read_body(response).await
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.urls.credentials() {
            Some(credentials) => {
                request.basic_auth(&credentials.username, Some(&credentials.password))
            }
            None => request,
        }
    }
}

#[async_trait::async_trait]
impl ListingClient for WebDavClient {
    async fn list(&self, path: &str) -> Vec<DirectoryEntry> {
        match self.fetch_listing(path).await {
            Ok(listing) => {
                panel_info!(
                    "listed {} entries under {} ({:?})",
                    listing.entries.len(),
                    path,
                    listing.strategy
                );
                listing.entries
            }
            Err(err) => {
                panel_error!("listing {} failed: {}", path, err);
                Vec::new()
            }
        }
    }
}

/// Decoded paths are re-encoded for the request; absolute URLs pass through.
fn request_reference(path: &str) -> String {
    let trimmed = path.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        encode_path(trimmed)
    }
}

fn directory_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

async fn read_body(response: Response) -> Result<String, RequestError> {
    let status = response.status();
    if !status.is_success() {
        return Err(RequestError::HttpStatus(status.as_u16()));
    }
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());
    let bytes = response.bytes().await.map_err(network)?;
    Ok(decode_body_lossy(&bytes, content_type.as_deref()))
}

fn network(err: reqwest::Error) -> RequestError {
    RequestError::Network(err.to_string())
}
