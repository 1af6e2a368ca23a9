use std::sync::Arc;

use davpanel_core::{
    Credentials, DirectoryEntry, FilterPolicy, Selection, SubmissionOutcome, UrlBuilder,
};
use panel_logging::{panel_info, panel_warn};

use crate::session::{PanelSession, RemoteConnection, SessionStore};
use crate::{
    Aria2Client, BatchSubmitter, ClientSettings, Component, ConnectError, JobSummary,
    PanelError, QueueError, QueueManager, VersionInfo, WebDavClient,
};

/// Outcome of a panel action that reports rather than raises failures.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelReply<T> {
    pub success: bool,
    pub message: String,
    pub payload: Option<T>,
}

impl<T> PanelReply<T> {
    pub fn ok(message: impl Into<String>, payload: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            payload: Some(payload),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            payload: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionStatus {
    pub remote_connected: bool,
    /// Only true when the queue manager answered just now.
    pub queue_connected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueStatus {
    pub connected: bool,
    pub version: Option<VersionInfo>,
}

/// Every user-facing operation of the panel, over one shared session.
///
/// Each operation takes a single session snapshot up front, so a concurrent
/// reconnect never changes the connection a running operation uses.
pub struct ControlPanel {
    sessions: SessionStore,
    settings: ClientSettings,
}

impl ControlPanel {
    pub fn new(settings: ClientSettings) -> Self {
        Self {
            sessions: SessionStore::default(),
            settings,
        }
    }

    pub fn session(&self) -> Arc<PanelSession> {
        self.sessions.snapshot()
    }

    /// Install an already-built remote connection.
    pub fn attach_remote(&self, remote: RemoteConnection) {
        self.sessions.replace_remote(remote);
    }

    /// Install an already-built queue manager.
    pub fn attach_queue_manager(&self, queue: Arc<dyn QueueManager>) {
        self.sessions.replace_queue(queue);
    }

    /// Connect to a WebDAV server. The previous connection stays in place on failure.
    pub async fn connect_remote(
        &self,
        base_url: &str,
        username: &str,
        password: &str,
    ) -> PanelReply<()> {
        match self.open_remote(base_url, username, password).await {
            Ok(client) => {
                panel_info!(
                    "remote server connected at {}",
                    client.url_builder().base_url()
                );
                self.attach_remote(RemoteConnection::webdav(client));
                PanelReply::ok("remote server connected", ())
            }
            Err(err) => {
                panel_warn!("remote connect failed: {}", err);
                PanelReply::failed(format!("remote connect failed: {err}"))
            }
        }
    }

    async fn open_remote(
        &self,
        base_url: &str,
        username: &str,
        password: &str,
    ) -> Result<WebDavClient, ConnectError> {
        let urls = UrlBuilder::new(base_url, Credentials::new(username, password))?;
        let client = WebDavClient::new(urls, &self.settings)?;
        client.probe().await?;
        Ok(client)
    }

    pub async fn connect_queue_manager(&self, endpoint: &str, secret: &str) -> PanelReply<()> {
        match Aria2Client::connect(endpoint, secret, &self.settings).await {
            Ok(client) => {
                self.attach_queue_manager(Arc::new(client));
                PanelReply::ok("queue manager connected", ())
            }
            Err(err) => {
                panel_warn!("queue manager connect failed: {}", err);
                PanelReply::failed(format!("queue manager connect failed: {err}"))
            }
        }
    }

    pub async fn connection_status(&self) -> ConnectionStatus {
        let session = self.session();
        let queue_connected = match &session.queue {
            Some(queue) => queue.version().await.is_ok(),
            None => false,
        };
        ConnectionStatus {
            remote_connected: session.remote.is_some(),
            queue_connected,
        }
    }

    pub async fn list_path(&self, path: &str) -> Result<Vec<DirectoryEntry>, PanelError> {
        let remote = self
            .session()
            .remote
            .clone()
            .ok_or(PanelError::NotConnected(Component::Remote))?;
        let path = if path.trim().is_empty() { "/" } else { path };
        Ok(remote.listing.list(path).await)
    }

    pub async fn submit_batch(
        &self,
        selections: &[Selection],
        policy: FilterPolicy,
    ) -> Result<Vec<SubmissionOutcome>, PanelError> {
        let session = self.session();
        let remote = session
            .remote
            .as_ref()
            .ok_or(PanelError::NotConnected(Component::Remote))?;
        let queue = session
            .queue
            .as_ref()
            .ok_or(PanelError::NotConnected(Component::QueueManager))?;

        let submitter =
            BatchSubmitter::new(remote.listing.as_ref(), &remote.urls, queue.as_ref());
        Ok(submitter.submit(selections, policy).await)
    }

    pub async fn queue_status(&self) -> QueueStatus {
        let Some(queue) = self.session().queue.clone() else {
            return QueueStatus {
                connected: false,
                version: None,
            };
        };
        match queue.version().await {
            Ok(version) => QueueStatus {
                connected: true,
                version: Some(version),
            },
            Err(err) => {
                panel_warn!("queue manager status check failed: {}", err);
                QueueStatus {
                    connected: false,
                    version: None,
                }
            }
        }
    }

    pub async fn list_jobs(&self) -> Result<PanelReply<Vec<JobSummary>>, PanelError> {
        let queue = self.queue()?;
        Ok(match queue.list().await {
            Ok(jobs) => PanelReply::ok(format!("{} jobs", jobs.len()), jobs),
            Err(err) => {
                panel_warn!("listing jobs failed: {}", err);
                PanelReply::failed(format!("listing jobs failed: {err}"))
            }
        })
    }

    pub async fn pause_job(&self, job_id: &str) -> Result<PanelReply<()>, PanelError> {
        let queue = self.queue()?;
        Ok(job_reply("pause", job_id, queue.pause(job_id).await))
    }

    pub async fn resume_job(&self, job_id: &str) -> Result<PanelReply<()>, PanelError> {
        let queue = self.queue()?;
        Ok(job_reply("resume", job_id, queue.resume(job_id).await))
    }

    pub async fn remove_job(&self, job_id: &str) -> Result<PanelReply<()>, PanelError> {
        let queue = self.queue()?;
        Ok(job_reply("remove", job_id, queue.remove(job_id).await))
    }

    fn queue(&self) -> Result<Arc<dyn QueueManager>, PanelError> {
        self.session()
            .queue
            .clone()
            .ok_or(PanelError::NotConnected(Component::QueueManager))
    }
}

fn job_reply(action: &str, job_id: &str, result: Result<(), QueueError>) -> PanelReply<()> {
    match result {
        Ok(()) => {
            panel_info!("{} of job {} succeeded", action, job_id);
            PanelReply::ok(format!("{action} succeeded"), ())
        }
        Err(err) => {
            panel_warn!("{} of job {} failed: {}", action, job_id, err);
            PanelReply::failed(format!("{action} failed: {err}"))
        }
    }
}
