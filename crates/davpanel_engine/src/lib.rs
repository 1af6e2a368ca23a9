//! Davpanel engine: WebDAV listing, folder expansion, aria2 queueing and the panel facade.
mod aria2;
mod client;
mod decode;
mod expand;
mod listing;
mod panel;
mod queue;
mod session;
mod submit;
mod types;
mod webdav;

pub use aria2::{normalize_endpoint, Aria2Client};
pub use client::ClientSettings;
pub use decode::{decode_body, DecodeError, DecodedBody};
pub use expand::{Expansion, FolderExpander};
pub use listing::{Listing, ListingClient, ListingStrategy};
pub use panel::{ConnectionStatus, ControlPanel, PanelReply, QueueStatus};
pub use queue::{JobFile, JobId, JobSummary, QueueManager, VersionInfo};
pub use session::{PanelSession, RemoteConnection, SessionStore};
pub use submit::BatchSubmitter;
pub use types::{
    Component, ConnectError, EntryError, ListingError, PanelError, ParseError, QueueError,
    RequestError,
};
pub use webdav::WebDavClient;
