use std::fmt;

use davpanel_core::UrlError;
use thiserror::Error;

/// The structured (or regex) parser did not recognise the listing body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed xml: {0}")]
    MalformedXml(String),
    #[error("no multistatus element in response")]
    NotMultistatus,
    #[error("no response blocks with an href")]
    NoResponses,
}

/// A single listing entry that could not be turned into a `DirectoryEntry`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("response block has no href")]
    MissingHref,
    #[error("href is not valid utf-8 once decoded: {0}")]
    Undecodable(String),
    #[error(transparent)]
    Reference(#[from] UrlError),
    #[error("cannot derive a name from {0}")]
    NoName(String),
}

/// Transport-level failure of one listing request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("network error: {0}")]
    Network(String),
    #[error("http status {0}")]
    HttpStatus(u16),
}

/// Every listing strategy failed for a path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("listing failed (propfind: {propfind}; plain listing: {plain})")]
pub struct ListingError {
    pub propfind: String,
    pub plain: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] UrlError),
    #[error("invalid endpoint {endpoint}: {message}")]
    InvalidEndpoint { endpoint: String, message: String },
    #[error("http client setup failed: {0}")]
    Client(String),
    #[error("remote server unreachable: {0}")]
    RemoteUnreachable(String),
    #[error("queue manager unreachable: {0}")]
    QueueUnreachable(QueueError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Remote,
    QueueManager,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Remote => write!(f, "remote server"),
            Component::QueueManager => write!(f, "queue manager"),
        }
    }
}

/// Rejection raised before an operation starts any work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PanelError {
    #[error("{0} is not connected")]
    NotConnected(Component),
}
