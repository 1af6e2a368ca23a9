use davpanel_core::{FilterPolicy, Selection};
use davpanel_engine::{
    ClientSettings, Component, ConnectionStatus, ControlPanel, PanelError,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ROOT_MULTISTATUS: &str = r#"<d:multistatus xmlns:d="DAV:">
  <d:response><d:href>/dav/</d:href><d:propstat><d:prop><d:resourcetype><d:collection/></d:resourcetype></d:prop></d:propstat></d:response>
  <d:response><d:href>/dav/film.mkv</d:href><d:propstat><d:prop><d:resourcetype/><d:getcontentlength>734003200</d:getcontentlength></d:prop></d:propstat></d:response>
</d:multistatus>"#;

async fn webdav_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("PROPFIND"))
        .and(path("/dav/"))
        .respond_with(
            ResponseTemplate::new(207).set_body_raw(ROOT_MULTISTATUS, "application/xml"),
        )
        .mount(&server)
        .await;
    server
}

async fn aria2_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "aria2.getVersion"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"jsonrpc": "2.0", "id": "1", "result": {"version": "1.37.0", "enabledFeatures": []}}),
        ))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "aria2.addUri"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"jsonrpc": "2.0", "id": "2", "result": "cafe0001"})),
        )
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn operations_need_their_connections() {
    let panel = ControlPanel::new(ClientSettings::default());

    assert_eq!(
        panel.list_path("/").await,
        Err(PanelError::NotConnected(Component::Remote))
    );
    assert_eq!(
        panel
            .submit_batch(&[Selection::file("/a.mp4", 1)], FilterPolicy::default())
            .await,
        Err(PanelError::NotConnected(Component::Remote))
    );
    assert_eq!(
        panel.pause_job("a1").await.unwrap_err(),
        PanelError::NotConnected(Component::QueueManager)
    );
    assert_eq!(
        panel.list_jobs().await.unwrap_err().to_string(),
        "queue manager is not connected"
    );
    assert!(!panel.queue_status().await.connected);
    assert_eq!(
        panel.connection_status().await,
        ConnectionStatus {
            remote_connected: false,
            queue_connected: false
        }
    );
}

#[tokio::test]
async fn failed_connect_keeps_panel_disconnected() {
    let panel = ControlPanel::new(ClientSettings::default());

    let reply = panel.connect_remote("ftp://nas.local/", "", "").await;
    assert!(!reply.success);
    assert!(reply.message.contains("unsupported scheme ftp"));

    let reply = panel.connect_queue_manager("", "").await;
    assert!(!reply.success);
    assert!(!panel.connection_status().await.remote_connected);
}

#[tokio::test]
async fn connected_panel_lists_and_submits() {
    let webdav = webdav_server().await;
    let aria2 = aria2_server().await;
    let panel = ControlPanel::new(ClientSettings::default());

    let reply = panel
        .connect_remote(&format!("{}/dav", webdav.uri()), "alice", "pw")
        .await;
    assert!(reply.success, "{}", reply.message);

    let reply = panel.connect_queue_manager(&aria2.uri(), "").await;
    assert!(reply.success, "{}", reply.message);
    assert_eq!(
        panel.connection_status().await,
        ConnectionStatus {
            remote_connected: true,
            queue_connected: true
        }
    );

    let entries = panel.list_path("/").await.expect("connected");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, "/dav/film.mkv");

    let outcomes = panel
        .submit_batch(
            &[Selection::file(&entries[0].path, entries[0].size)],
            FilterPolicy::new(true, 300),
        )
        .await
        .expect("connected");
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].success);
    assert_eq!(outcomes[0].job_id.as_deref(), Some("cafe0001"));

    let status = panel.queue_status().await;
    assert_eq!(status.version.map(|v| v.version).as_deref(), Some("1.37.0"));
}
