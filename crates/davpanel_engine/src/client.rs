use std::time::Duration;

use crate::ConnectError;

/// HTTP client knobs shared by the WebDAV and queue manager clients.
///
/// Timeouts are unset by default so the transport defaults apply.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub connect_timeout: Option<Duration>,
    pub request_timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            connect_timeout: None,
            request_timeout: None,
            user_agent: format!("davpanel/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientSettings {
    pub(crate) fn build_client(&self) -> Result<reqwest::Client, ConnectError> {
        let mut builder = reqwest::Client::builder().user_agent(self.user_agent.clone());
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|err| ConnectError::Client(err.to_string()))
    }
}
