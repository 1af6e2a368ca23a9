use davpanel_core::{Credentials, DirectoryEntry, UrlBuilder};
use davpanel_engine::{ClientSettings, ListingClient, ListingStrategy, WebDavClient};
use pretty_assertions::assert_eq;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MOVIES_MULTISTATUS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<D:multistatus xmlns:D="DAV:">
  <D:response>
    <D:href>/movies/</D:href>
    <D:propstat><D:prop>
      <D:resourcetype><D:collection/></D:resourcetype>
    </D:prop><D:status>HTTP/1.1 200 OK</D:status></D:propstat>
  </D:response>
  <D:response>
    <D:href>/movies/Action/</D:href>
    <D:propstat><D:prop>
      <D:resourcetype><D:collection/></D:resourcetype>
      <D:getlastmodified>Mon, 12 Jan 2026 10:00:00 GMT</D:getlastmodified>
    </D:prop><D:status>HTTP/1.1 200 OK</D:status></D:propstat>
  </D:response>
  <D:response>
    <D:href>/movies/clip.mp4</D:href>
    <D:propstat><D:prop>
      <D:resourcetype/>
      <D:getcontentlength>419430400</D:getcontentlength>
      <D:getlastmodified>Tue, 13 Jan 2026 08:30:00 GMT</D:getlastmodified>
    </D:prop><D:status>HTTP/1.1 200 OK</D:status></D:propstat>
  </D:response>
</D:multistatus>"#;

fn client_for(server: &MockServer, credentials: Option<Credentials>) -> WebDavClient {
    panel_logging::initialize_for_tests();
    let urls = UrlBuilder::new(&server.uri(), credentials).expect("base url");
    WebDavClient::new(urls, &ClientSettings::default()).expect("client")
}

fn multistatus(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(207).set_body_raw(body, "application/xml; charset=utf-8")
}

fn expected_movies() -> Vec<DirectoryEntry> {
    vec![
        DirectoryEntry::directory("/movies/Action/")
            .with_modified("Mon, 12 Jan 2026 10:00:00 GMT"),
        DirectoryEntry::file("/movies/clip.mp4", 419_430_400)
            .with_modified("Tue, 13 Jan 2026 08:30:00 GMT"),
    ]
}

#[tokio::test]
async fn propfind_listing_skips_self_entry() {
    let server = MockServer::start().await;
    Mock::given(method("PROPFIND"))
        .and(path("/movies"))
        .and(header("Depth", "1"))
        .respond_with(multistatus(MOVIES_MULTISTATUS))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let listing = client.fetch_listing("/movies").await.expect("listing");

    assert_eq!(listing.strategy, ListingStrategy::Structured);
    assert_eq!(listing.entries, expected_movies());
    assert_eq!(listing.entries[1].name, "clip.mp4");
    assert_eq!(listing.entries[1].fetch_reference, "/movies/clip.mp4");
}

#[tokio::test]
async fn listing_requests_carry_basic_auth() {
    let server = MockServer::start().await;
    Mock::given(method("PROPFIND"))
        .and(path("/movies"))
        .and(header_exists("Authorization"))
        .respond_with(multistatus(MOVIES_MULTISTATUS))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Credentials::new("alice", "secret"));
    assert_eq!(client.list("/movies").await.len(), 2);
}

#[tokio::test]
async fn malformed_multistatus_falls_back_to_regex_scan() {
    let server = MockServer::start().await;
    let body = r#"<D:multistatus xmlns:D="DAV:">
<D:response><D:href>/movies/</D:href><D:resourcetype><D:collection/></D:resourcetype>
<D:response><D:href>/movies/Action/</D:href><D:resourcetype><D:collection/></D:resourcetype>
<D:response><D:href>/movies/clip.mp4</D:href><D:getcontentlength>419430400</D:getcontentlength>"#;
    Mock::given(method("PROPFIND"))
        .and(path("/movies"))
        .respond_with(multistatus(body))
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let listing = client.fetch_listing("/movies").await.expect("listing");

    assert_eq!(listing.strategy, ListingStrategy::Regex);
    let names: Vec<&str> = listing.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Action", "clip.mp4"]);
    assert!(listing.entries[0].is_directory);
    assert_eq!(listing.entries[1].size, 419_430_400);
}

#[tokio::test]
async fn rejected_propfind_falls_back_to_index_page() {
    let server = MockServer::start().await;
    Mock::given(method("PROPFIND"))
        .respond_with(ResponseTemplate::new(405))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/movies/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><body><h1>Index of /movies</h1>
               <a href="../">Parent Directory</a>
               <a href="Action/">Action/</a>
               <a href="clip.mp4">clip.mp4</a>
               </body></html>"#,
            "text/html; charset=utf-8",
        ))
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let listing = client.fetch_listing("/movies").await.expect("listing");

    assert_eq!(listing.strategy, ListingStrategy::PlainLink);
    let summary: Vec<(&str, &str, bool)> = listing
        .entries
        .iter()
        .map(|e| (e.name.as_str(), e.path.as_str(), e.is_directory))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Action", "/movies/Action/", true),
            ("clip.mp4", "/movies/clip.mp4", false),
        ]
    );
}

#[tokio::test]
async fn index_page_links_match_despite_different_escaping() {
    let server = MockServer::start().await;
    Mock::given(method("PROPFIND"))
        .respond_with(ResponseTemplate::new(405))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Movies%20%282020%29/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<a href="/Movies%20(2020)/">Movies (2020)</a>
               <a href="/Movies%20(2020)/clip.mp4">clip.mp4</a>
               <a href="/Movies%20(2020)/Extras/">Extras/</a>"#,
            "text/html",
        ))
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let listing = client
        .fetch_listing("/Movies (2020)")
        .await
        .expect("listing");

    assert_eq!(listing.strategy, ListingStrategy::PlainLink);
    let summary: Vec<(&str, &str, bool)> = listing
        .entries
        .iter()
        .map(|e| (e.name.as_str(), e.path.as_str(), e.is_directory))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("clip.mp4", "/Movies (2020)/clip.mp4", false),
            ("Extras", "/Movies (2020)/Extras/", true),
        ]
    );
}

#[tokio::test]
async fn strategies_agree_on_paths_and_kinds() {
    let structured = MockServer::start().await;
    Mock::given(method("PROPFIND"))
        .respond_with(multistatus(MOVIES_MULTISTATUS))
        .mount(&structured)
        .await;

    let plain = MockServer::start().await;
    Mock::given(method("PROPFIND"))
        .respond_with(ResponseTemplate::new(501))
        .mount(&plain)
        .await;
    Mock::given(method("GET"))
        .and(path("/movies/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<a href="/movies/Action/">Action</a><a href="/movies/clip.mp4">clip.mp4</a>"#,
            "text/html",
        ))
        .mount(&plain)
        .await;

    let key = |entries: Vec<DirectoryEntry>| -> Vec<(String, bool)> {
        entries
            .into_iter()
            .map(|e| (e.path, e.is_directory))
            .collect()
    };
    let from_structured = key(client_for(&structured, None).list("/movies").await);
    let from_plain = key(client_for(&plain, None).list("/movies").await);
    assert_eq!(from_structured, from_plain);
}

#[tokio::test]
async fn unreachable_listing_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("PROPFIND"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    assert!(client.fetch_listing("/gone").await.is_err());
    assert_eq!(client.list("/gone").await, Vec::<DirectoryEntry>::new());
}

#[tokio::test]
async fn probe_accepts_servers_without_propfind() {
    let server = MockServer::start().await;
    Mock::given(method("PROPFIND"))
        .respond_with(ResponseTemplate::new(405))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("index"))
        .mount(&server)
        .await;

    client_for(&server, None).probe().await.expect("probe ok");
}

#[tokio::test]
async fn probe_reports_unreachable_server() {
    let server = MockServer::start().await;
    Mock::given(method("PROPFIND"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    assert!(client_for(&server, None).probe().await.is_err());
}
