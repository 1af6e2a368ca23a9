use std::fmt;

use thiserror::Error;
use url::Url;

use crate::remote_path::{decode_path, normalize_path};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("invalid base url {url}: {message}")]
    InvalidBase { url: String, message: String },
    #[error("unsupported scheme {0}, expected http or https")]
    UnsupportedScheme(String),
    #[error("cannot resolve reference {reference}: {message}")]
    InvalidReference { reference: String, message: String },
    #[error("credentials cannot be embedded into this url")]
    CannotEmbedCredentials,
}

/// Username/password pair for the remote server.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Returns `None` unless both parts are non-empty.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Option<Self> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() || password.is_empty() {
            return None;
        }
        Some(Self { username, password })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Resolves remote references against the server base URL and embeds credentials
/// into download URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBuilder {
    base: Url,
    credentials: Option<Credentials>,
}

impl UrlBuilder {
    pub fn new(base_url: &str, credentials: Option<Credentials>) -> Result<Self, UrlError> {
        let trimmed = base_url.trim();
        let mut base = Url::parse(trimmed).map_err(|err| UrlError::InvalidBase {
            url: trimmed.to_string(),
            message: err.to_string(),
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(UrlError::UnsupportedScheme(base.scheme().to_string()));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.set_query(None);
        base.set_fragment(None);
        // Userinfo typed into the base URL is ignored; credentials travel separately.
        let _ = base.set_password(None);
        let _ = base.set_username("");
        Ok(Self { base, credentials })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Unauthenticated absolute URL for a reference.
    ///
    /// Absolute URLs are taken as-is, server-absolute paths under the base path are
    /// joined as absolute, anything else is relative to the base (so `/` is the base).
    pub fn resolve(&self, reference: &str) -> Result<Url, UrlError> {
        let reference = reference.trim();
        let invalid = |err: url::ParseError| UrlError::InvalidReference {
            reference: reference.to_string(),
            message: err.to_string(),
        };

        let lower = reference.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Url::parse(reference).map_err(invalid);
        }
        if normalize_path(reference) == normalize_path(self.base.path()) {
            return Ok(self.base.clone());
        }
        if reference.starts_with(self.base.path()) {
            return self.base.join(reference).map_err(invalid);
        }
        let relative = reference.trim_start_matches('/');
        self.base.join(&format!("./{relative}")).map_err(invalid)
    }

    /// Absolute download URL with `username:password` embedded when configured.
    pub fn build(&self, reference: &str) -> Result<String, UrlError> {
        let mut url = self.resolve(reference)?;
        if let Some(credentials) = &self.credentials {
            url.set_username(&credentials.username)
                .map_err(|_| UrlError::CannotEmbedCredentials)?;
            url.set_password(Some(&credentials.password))
                .map_err(|_| UrlError::CannotEmbedCredentials)?;
        }
        Ok(url.to_string())
    }

    /// Decoded, normalized server path a reference points at; used to compare
    /// references that spell the same resource differently.
    pub fn resource_key(&self, reference: &str) -> Result<String, UrlError> {
        let url = self.resolve(reference)?;
        let decoded = decode_path(url.path()).unwrap_or_else(|_| url.path().to_string());
        Ok(normalize_path(&decoded))
    }
}
