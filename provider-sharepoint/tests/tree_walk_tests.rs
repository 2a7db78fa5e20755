//! Integration tests for the drive walk and the connector built on it
//!
//! These tests drive the public API against a routed fake Graph service:
//! - Pre-order flattening across pages and nested folders
//! - File counts for generated trees
//! - Sibling branches surviving a failed folder
//! - Earlier pages surviving a failed continuation page
//! - Drive id learning before a download

use async_trait::async_trait;
use bridge_traits::{error::BridgeError, HttpClient, HttpRequest, HttpResponse};
use core_runtime::SharePointConfig;
use provider_sharepoint::{DriveId, GraphSession, SharePointConnector};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const BASE: &str = "https://graph.example.com/v1.0";
const AUTHORITY: &str = "https://login.example.com";
const SITE: &str = "contoso.sharepoint.com,1111,2222";
const DRIVE: &str = "b!contracts";

// ============================================================================
// Fake Graph service
// ============================================================================

/// Serves canned responses by exact URL and records every request URL.
///
/// The token endpoint always succeeds; unrouted URLs answer 404.
#[derive(Default)]
struct FakeGraph {
    routes: Mutex<HashMap<String, (u16, Vec<u8>)>>,
    requests: Mutex<Vec<String>>,
}

impl FakeGraph {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn route_json(&self, url: impl Into<String>, status: u16, body: Value) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.into(), (status, body.to_string().into_bytes()));
    }

    fn route_bytes(&self, url: impl Into<String>, body: &[u8]) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.into(), (200, body.to_vec()));
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn count_matching(&self, url: &str) -> usize {
        self.requests().iter().filter(|r| r.as_str() == url).count()
    }

    fn token_requests(&self) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.ends_with("/oauth2/v2.0/token"))
            .count()
    }
}

#[async_trait]
impl HttpClient for FakeGraph {
    async fn execute(&self, request: HttpRequest) -> bridge_traits::error::Result<HttpResponse> {
        self.requests.lock().unwrap().push(request.url.clone());

        if request.url.ends_with("/oauth2/v2.0/token") {
            return Ok(HttpResponse::new(
                200,
                json!({ "token_type": "Bearer", "expires_in": 3599, "access_token": "fake-token" })
                    .to_string(),
            ));
        }

        if request.header_value("Authorization") != Some("Bearer fake-token") {
            return Err(BridgeError::OperationFailed(format!(
                "unauthenticated request to {}",
                request.url
            )));
        }

        let routes = self.routes.lock().unwrap();
        Ok(match routes.get(&request.url) {
            Some((status, body)) => HttpResponse::new(*status, body.clone()),
            None => HttpResponse::new(
                404,
                json!({ "error": { "code": "itemNotFound", "message": "no route" } }).to_string(),
            ),
        })
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn connector(fake: &Arc<FakeGraph>) -> SharePointConnector {
    let config = SharePointConfig::builder()
        .client_id("client")
        .client_secret("secret")
        .tenant_id("tenant")
        .site_id(SITE)
        .graph_base_url(BASE)
        .authority_url(AUTHORITY)
        .build()
        .unwrap();
    let http: Arc<dyn HttpClient> = fake.clone();
    SharePointConnector::from_config(&config, http)
}

fn root_url() -> String {
    format!("{}/drives/{}/root/children", BASE, DRIVE)
}

fn children(item_id: &str) -> String {
    format!("{}/drives/{}/items/{}/children", BASE, DRIVE, item_id)
}

fn site_children() -> String {
    format!("{}/sites/{}/drive/root/children", BASE, SITE)
}

fn file(id: &str) -> Value {
    json!({
        "id": id,
        "name": format!("{}.pdf", id),
        "file": { "mimeType": "application/pdf" },
        "parentReference": { "driveId": DRIVE }
    })
}

fn folder(id: &str) -> Value {
    json!({ "id": id, "name": id, "folder": { "childCount": 1 }, "parentReference": { "driveId": DRIVE } })
}

/// Route `items` for `url`, split into pages of `page_size`.
fn route_paged(fake: &FakeGraph, url: &str, items: Vec<Value>, page_size: usize) {
    let chunks: Vec<Vec<Value>> = items.chunks(page_size.max(1)).map(|c| c.to_vec()).collect();
    if chunks.is_empty() {
        fake.route_json(url, 200, json!({ "value": [] }));
        return;
    }

    let page_url = |n: usize| {
        if n == 0 {
            url.to_string()
        } else {
            format!("{}?$skiptoken={}", url, n)
        }
    };

    for (n, chunk) in chunks.iter().enumerate() {
        let mut body = json!({ "value": chunk });
        if n + 1 < chunks.len() {
            body["@odata.nextLink"] = Value::String(page_url(n + 1));
        }
        fake.route_json(page_url(n), 200, body);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_folder_contents_precede_next_page() {
    let fake = FakeGraph::new();
    let page2 = format!("{}?$skiptoken=2", root_url());

    fake.route_json(
        root_url(),
        200,
        json!({ "value": [{ "id": "f1" }, { "id": "folder1", "folder": {} }], "@odata.nextLink": page2 }),
    );
    fake.route_json(page2.clone(), 200, json!({ "value": [{ "id": "f2" }] }));
    fake.route_json(children("folder1"), 200, json!({ "value": [{ "id": "f3" }] }));

    let connector = connector(&fake);
    let mut session = GraphSession::new();

    let listing = connector
        .list_drive_files(&mut session, &DriveId::new(DRIVE))
        .await;

    assert_eq!(listing.file_ids(), vec!["f1", "f3", "f2"]);
    assert!(listing.is_complete());

    let graph_requests: Vec<String> = fake
        .requests()
        .into_iter()
        .filter(|r| r.starts_with(BASE))
        .collect();
    assert_eq!(graph_requests, vec![root_url(), children("folder1"), page2]);
    assert_eq!(fake.token_requests(), 1);
}

#[tokio::test]
async fn test_generated_tree_lists_every_file() {
    // Three folders of 7 files each, plus 5 files at the root, served in
    // pages of 3.
    let fake = FakeGraph::new();
    let mut root_items = Vec::new();
    let mut expected = Vec::new();

    for n in 0..3 {
        let folder_id = format!("folder-{}", n);
        let files: Vec<String> = (0..7).map(|i| format!("{}-file-{}", folder_id, i)).collect();
        route_paged(&fake, &children(&folder_id), files.iter().map(|id| file(id)).collect(), 3);

        root_items.push(folder(&folder_id));
        expected.extend(files);
    }
    for i in 0..5 {
        let id = format!("root-file-{}", i);
        root_items.push(file(&id));
        expected.push(id);
    }
    route_paged(&fake, &root_url(), root_items, 3);

    let connector = connector(&fake);
    let mut session = GraphSession::new();

    let listing = connector
        .list_drive_files(&mut session, &DriveId::new(DRIVE))
        .await;

    assert_eq!(listing.files.len(), 26);
    assert!(listing.files.iter().all(|f| !f.is_folder()));
    assert_eq!(listing.file_ids(), expected.iter().map(String::as_str).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_failed_branch_keeps_siblings() {
    let fake = FakeGraph::new();

    fake.route_json(
        root_url(),
        200,
        json!({ "value": [folder("left"), folder("broken"), folder("right"), file("top")] }),
    );
    fake.route_json(children("left"), 200, json!({ "value": [file("left-1"), file("left-2")] }));
    fake.route_json(
        children("broken"),
        503,
        json!({ "error": { "code": "serviceNotAvailable", "message": "try later" } }),
    );
    fake.route_json(children("right"), 200, json!({ "value": [file("right-1")] }));

    let connector = connector(&fake);
    let mut session = GraphSession::new();

    let listing = connector
        .list_drive_files(&mut session, &DriveId::new(DRIVE))
        .await;

    assert_eq!(listing.file_ids(), vec!["left-1", "left-2", "right-1", "top"]);
    assert_eq!(listing.warnings.len(), 1);
    assert_eq!(listing.warnings[0].url, children("broken"));
}

#[tokio::test]
async fn test_failed_continuation_page_keeps_earlier_pages() {
    let fake = FakeGraph::new();
    let page2 = format!("{}?$skiptoken=2", root_url());

    fake.route_json(
        root_url(),
        200,
        json!({ "value": [file("p1a"), folder("sub")], "@odata.nextLink": page2 }),
    );
    fake.route_json(children("sub"), 200, json!({ "value": [file("s1")] }));
    fake.route_json(
        page2.clone(),
        500,
        json!({ "error": { "code": "generalException", "message": "page lost" } }),
    );

    let connector = connector(&fake);
    let mut session = GraphSession::new();

    let listing = connector
        .list_drive_files(&mut session, &DriveId::new(DRIVE))
        .await;

    assert_eq!(listing.file_ids(), vec!["p1a", "s1"]);
    assert_eq!(listing.warnings.len(), 1);
    assert_eq!(listing.warnings[0].url, page2);
    assert!(listing.warnings[0].message.contains("page lost"));
}

#[tokio::test]
async fn test_site_listing_learns_drive_once() {
    let fake = FakeGraph::new();

    fake.route_json(site_children(), 200, json!({ "value": [file("a")] }));
    fake.route_json(root_url(), 200, json!({ "value": [file("a")] }));

    let connector = connector(&fake);
    let mut session = GraphSession::new();

    let first = connector.list_site_files(&mut session).await.unwrap();
    let second = connector.list_site_files(&mut session).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(session.drive_id(), Some(&DriveId::new(DRIVE)));
    assert_eq!(fake.count_matching(&site_children()), 1);
    assert_eq!(fake.count_matching(&root_url()), 2);
}

#[tokio::test]
async fn test_download_without_cached_drive_lists_first() {
    let fake = FakeGraph::new();
    let content_url = format!("{}/drives/{}/items/doc-1/content", BASE, DRIVE);

    fake.route_json(site_children(), 200, json!({ "value": [file("doc-1")] }));
    fake.route_json(root_url(), 200, json!({ "value": [file("doc-1")] }));
    fake.route_bytes(content_url.clone(), b"%PDF-1.7");

    let connector = connector(&fake);
    let mut session = GraphSession::new();

    let data = connector.download(&mut session, "doc-1").await.unwrap();

    assert_eq!(&data[..], b"%PDF-1.7");

    let graph_requests: Vec<String> = fake
        .requests()
        .into_iter()
        .filter(|r| r.starts_with(BASE))
        .collect();
    assert_eq!(graph_requests, vec![site_children(), root_url(), content_url]);
}

#[tokio::test]
async fn test_download_with_cached_drive_skips_listing() {
    let fake = FakeGraph::new();
    let content_url = format!("{}/drives/{}/items/doc-1/content", BASE, DRIVE);
    fake.route_bytes(content_url.clone(), b"bytes");

    let connector = connector(&fake);
    let mut session = GraphSession::new().with_drive_id(DriveId::new(DRIVE));

    connector.download(&mut session, "doc-1").await.unwrap();

    assert_eq!(fake.count_matching(&site_children()), 0);
    assert_eq!(fake.count_matching(&root_url()), 0);
    assert_eq!(fake.count_matching(&content_url), 1);
}
