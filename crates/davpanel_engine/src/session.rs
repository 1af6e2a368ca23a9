use std::sync::{Arc, RwLock};

use davpanel_core::UrlBuilder;

use crate::{ListingClient, QueueManager, WebDavClient};

/// A connected remote server: how to list it and how to address its files.
pub struct RemoteConnection {
    pub listing: Arc<dyn ListingClient>,
    pub urls: UrlBuilder,
}

impl RemoteConnection {
    pub fn new(listing: Arc<dyn ListingClient>, urls: UrlBuilder) -> Self {
        Self { listing, urls }
    }

    pub fn webdav(client: WebDavClient) -> Self {
        let urls = client.url_builder().clone();
        Self::new(Arc::new(client), urls)
    }
}

/// Connection state seen by one operation; never mutated once published.
#[derive(Clone, Default)]
pub struct PanelSession {
    pub remote: Option<Arc<RemoteConnection>>,
    pub queue: Option<Arc<dyn QueueManager>>,
}

/// Holds the current session and swaps it wholesale on reconnect.
#[derive(Default)]
pub struct SessionStore {
    current: RwLock<Arc<PanelSession>>,
}

impl SessionStore {
    pub fn snapshot(&self) -> Arc<PanelSession> {
        let guard = self
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    pub fn replace_remote(&self, remote: RemoteConnection) {
        self.update(|session| session.remote = Some(Arc::new(remote)));
    }

    pub fn replace_queue(&self, queue: Arc<dyn QueueManager>) {
        self.update(|session| session.queue = Some(queue));
    }

    fn update(&self, change: impl FnOnce(&mut PanelSession)) {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut next = PanelSession::clone(&guard);
        change(&mut next);
        *guard = Arc::new(next);
    }
}
