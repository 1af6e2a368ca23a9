use std::sync::atomic::{AtomicU64, Ordering};

use panel_logging::{panel_debug, panel_info, panel_warn};
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use crate::queue::{JobFile, JobId, JobSummary, QueueManager, VersionInfo};
use crate::{ClientSettings, ConnectError, QueueError};

const DEFAULT_RPC_PORT: u16 = 6800;
const DEFAULT_RPC_PATH: &str = "/jsonrpc";
const LIST_PAGE_SIZE: u64 = 1000;
const STATUS_KEYS: &[&str] = &[
    "gid",
    "status",
    "totalLength",
    "completedLength",
    "downloadSpeed",
    "files",
    "bittorrent",
];

/// Normalizes a user-typed aria2 endpoint: adds `http://` when no scheme is
/// given, port 6800 when none is given and `/jsonrpc` when the path is empty.
pub fn normalize_endpoint(raw: &str) -> Result<Url, ConnectError> {
    let trimmed = raw.trim();
    let invalid = |message: String| ConnectError::InvalidEndpoint {
        endpoint: trimmed.to_string(),
        message,
    };
    if trimmed.is_empty() {
        return Err(invalid("endpoint is empty".to_string()));
    }

    let lower = trimmed.to_ascii_lowercase();
    let with_scheme = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };
    let mut url = Url::parse(&with_scheme).map_err(|err| invalid(err.to_string()))?;
    if url.host_str().is_none() {
        return Err(invalid("endpoint has no host".to_string()));
    }
    if url.port().is_none() && !has_explicit_port(&with_scheme) {
        url.set_port(Some(DEFAULT_RPC_PORT))
            .map_err(|_| invalid("cannot set port".to_string()))?;
    }
    if url.path().is_empty() || url.path() == "/" {
        url.set_path(DEFAULT_RPC_PATH);
    }
    Ok(url)
}

// `Url::port` hides ports equal to the scheme default, e.g. `http://host:80`.
fn has_explicit_port(with_scheme: &str) -> bool {
    let after_scheme = with_scheme.split_once("://").map_or(with_scheme, |(_, rest)| rest);
    let authority = after_scheme.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit('@').next().unwrap_or_default();
    host_port
        .rsplit_once(':')
        .is_some_and(|(_, port)| port.parse::<u16>().is_ok())
}

/// aria2 JSON-RPC client.
pub struct Aria2Client {
    http: reqwest::Client,
    endpoint: Url,
    secret: Option<String>,
    next_id: AtomicU64,
}

impl Aria2Client {
    pub fn new(
        endpoint: &str,
        secret: &str,
        settings: &ClientSettings,
    ) -> Result<Self, ConnectError> {
        let endpoint = normalize_endpoint(endpoint)?;
        let secret = Some(secret.trim().to_string()).filter(|secret| !secret.is_empty());
        Ok(Self {
            http: settings.build_client()?,
            endpoint,
            secret,
            next_id: AtomicU64::new(1),
        })
    }

    /// Builds a client and checks it can reach aria2.
    pub async fn connect(
        endpoint: &str,
        secret: &str,
        settings: &ClientSettings,
    ) -> Result<Self, ConnectError> {
        let client = Self::new(endpoint, secret, settings)?;
        let version = client
            .version()
            .await
            .map_err(ConnectError::QueueUnreachable)?;
        panel_info!(
            "connected to aria2 {} at {}",
            version.version,
            client.endpoint
        );
        Ok(client)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, QueueError> {
        let mut all_params = Vec::with_capacity(params.len() + 1);
        if let Some(secret) = &self.secret {
            all_params.push(Value::String(format!("token:{secret}")));
        }
        all_params.extend(params);

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = json!({
            "jsonrpc": "2.0",
            "id": format!("davpanel-{id}"),
            "method": method,
            "params": all_params,
        });
        panel_debug!("aria2 rpc {} id={}", method, id);

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|err| QueueError::Transport(err.to_string()))?;
        let status = response.status();
        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(_) if !status.is_success() => return Err(QueueError::HttpStatus(status.as_u16())),
            Err(err) => return Err(QueueError::InvalidResponse(err.to_string())),
        };

        if let Some(error) = body.get("error") {
            return Err(QueueError::Rpc {
                code: error.get("code").and_then(Value::as_i64).unwrap_or_default(),
                message: error
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error")
                    .to_string(),
            });
        }
        if !status.is_success() {
            return Err(QueueError::HttpStatus(status.as_u16()));
        }
        body.get("result")
            .cloned()
            .ok_or_else(|| QueueError::InvalidResponse("response has no result".to_string()))
    }

    async fn tell(&self, method: &str, mut params: Vec<Value>) -> Result<Vec<JobSummary>, QueueError> {
        params.push(json!(STATUS_KEYS));
        let result = self.call(method, params).await?;
        let raw: Vec<RawStatus> = serde_json::from_value(result)
            .map_err(|err| QueueError::InvalidResponse(err.to_string()))?;
        Ok(raw.into_iter().map(JobSummary::from).collect())
    }
}

#[async_trait::async_trait]
impl QueueManager for Aria2Client {
    async fn version(&self) -> Result<VersionInfo, QueueError> {
        let result = self.call("aria2.getVersion", Vec::new()).await?;
        let raw: RawVersion = serde_json::from_value(result)
            .map_err(|err| QueueError::InvalidResponse(err.to_string()))?;
        Ok(VersionInfo {
            version: raw.version,
            enabled_features: raw.enabled_features,
        })
    }

    async fn enqueue(&self, url: &str, filename: &str) -> Result<JobId, QueueError> {
        let result = self
            .call(
                "aria2.addUri",
                vec![json!([url]), json!({ "out": filename })],
            )
            .await?;
        result
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| QueueError::InvalidResponse(format!("expected gid, got {result}")))
    }

    async fn list(&self) -> Result<Vec<JobSummary>, QueueError> {
        let mut jobs = self.tell("aria2.tellActive", Vec::new()).await?;
        jobs.extend(
            self.tell("aria2.tellWaiting", vec![json!(0), json!(LIST_PAGE_SIZE)])
                .await?,
        );
        jobs.extend(
            self.tell("aria2.tellStopped", vec![json!(0), json!(LIST_PAGE_SIZE)])
                .await?,
        );
        Ok(jobs)
    }

    async fn pause(&self, job_id: &str) -> Result<(), QueueError> {
        self.call("aria2.pause", vec![json!(job_id)]).await.map(|_| ())
    }

    async fn resume(&self, job_id: &str) -> Result<(), QueueError> {
        self.call("aria2.unpause", vec![json!(job_id)])
            .await
            .map(|_| ())
    }

    /// Removes an active or waiting job; finished jobs only have a result to drop.
    async fn remove(&self, job_id: &str) -> Result<(), QueueError> {
        match self.call("aria2.remove", vec![json!(job_id)]).await {
            Ok(_) => Ok(()),
            Err(err @ QueueError::Rpc { .. }) => {
                panel_warn!("aria2.remove {} failed ({}); dropping result instead", job_id, err);
                self.call("aria2.removeDownloadResult", vec![json!(job_id)])
                    .await
                    .map(|_| ())
                    .map_err(|_| err)
            }
            Err(err) => Err(err),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVersion {
    version: String,
    #[serde(default)]
    enabled_features: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStatus {
    gid: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    total_length: String,
    #[serde(default)]
    completed_length: String,
    #[serde(default)]
    download_speed: String,
    #[serde(default)]
    files: Vec<RawFile>,
    #[serde(default)]
    bittorrent: Option<RawBittorrent>,
}

#[derive(Debug, Deserialize)]
struct RawFile {
    #[serde(default)]
    path: String,
    #[serde(default)]
    uris: Vec<RawUri>,
}

#[derive(Debug, Deserialize)]
struct RawUri {
    uri: String,
}

#[derive(Debug, Deserialize)]
struct RawBittorrent {
    #[serde(default)]
    info: Option<RawTorrentInfo>,
}

#[derive(Debug, Deserialize)]
struct RawTorrentInfo {
    name: String,
}

impl From<RawStatus> for JobSummary {
    fn from(raw: RawStatus) -> Self {
        let total_length = raw.total_length.parse().unwrap_or(0);
        let completed_length = raw.completed_length.parse().unwrap_or(0);
        let progress = if total_length > 0 {
            completed_length as f64 / total_length as f64 * 100.0
        } else {
            0.0
        };
        let files: Vec<JobFile> = raw
            .files
            .into_iter()
            .map(|file| JobFile {
                path: file.path,
                uris: file.uris.into_iter().map(|uri| redact_uri(&uri.uri)).collect(),
            })
            .collect();
        let name = raw
            .bittorrent
            .and_then(|bt| bt.info)
            .map(|info| info.name)
            .filter(|name| !name.is_empty())
            .or_else(|| files.iter().find_map(|file| file_name(&file.path)))
            .or_else(|| {
                files
                    .iter()
                    .flat_map(|file| file.uris.iter())
                    .find_map(|uri| uri_file_name(uri))
            })
            .unwrap_or_else(|| "unknown file".to_string());

        Self {
            id: raw.gid,
            status: raw.status,
            name,
            total_length,
            completed_length,
            download_speed: raw.download_speed.parse().unwrap_or(0),
            progress,
            files,
        }
    }
}

fn file_name(path: &str) -> Option<String> {
    davpanel_core::last_segment(&path.replace('\\', "/")).map(str::to_string)
}

fn uri_file_name(uri: &str) -> Option<String> {
    let url = Url::parse(uri).ok()?;
    let segment = davpanel_core::last_segment(url.path())?;
    davpanel_core::decode_path(segment).ok()
}

/// Download URIs may carry `user:password@`; never hand those back out.
fn redact_uri(uri: &str) -> String {
    match Url::parse(uri) {
        Ok(mut url) if !url.username().is_empty() || url.password().is_some() => {
            let _ = url.set_password(None);
            let _ = url.set_username("");
            url.to_string()
        }
        _ => uri.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_defaults_are_filled_in() {
        assert_eq!(
            normalize_endpoint("localhost").unwrap().as_str(),
            "http://localhost:6800/jsonrpc"
        );
        assert_eq!(
            normalize_endpoint("https://seedbox.example:6801/rpc").unwrap().as_str(),
            "https://seedbox.example:6801/rpc"
        );
        assert_eq!(
            normalize_endpoint("http://10.0.0.2:80").unwrap().as_str(),
            "http://10.0.0.2/jsonrpc"
        );
        assert!(normalize_endpoint("   ").is_err());
    }

    #[test]
    fn status_is_summarized_without_credentials() {
        let raw: RawStatus = serde_json::from_value(json!({
            "gid": "2089b05ecca3d829",
            "status": "active",
            "totalLength": "400",
            "completedLength": "100",
            "downloadSpeed": "25",
            "files": [{
                "path": "/downloads/clip.mp4",
                "uris": [{"uri": "http://alice:pw@nas.local/movies/clip.mp4", "status": "used"}]
            }]
        }))
        .unwrap();

        let job = JobSummary::from(raw);
        assert_eq!(job.name, "clip.mp4");
        assert_eq!(job.progress, 25.0);
        assert_eq!(job.download_speed, 25);
        assert_eq!(job.files[0].uris, vec!["http://nas.local/movies/clip.mp4"]);
    }

    #[test]
    fn name_falls_back_to_uri_when_path_is_pending() {
        let raw: RawStatus = serde_json::from_value(json!({
            "gid": "a1",
            "status": "waiting",
            "totalLength": "0",
            "completedLength": "0",
            "downloadSpeed": "0",
            "files": [{"path": "", "uris": [{"uri": "http://nas.local/a%20b.mkv"}]}]
        }))
        .unwrap();

        let job = JobSummary::from(raw);
        assert_eq!(job.name, "a b.mkv");
        assert_eq!(job.progress, 0.0);
    }
}
