//! Depth-first drive walk
//!
//! Flattens a drive's folder tree into the files it contains. Folders are
//! expanded where they are encountered (pre-order) and a folder's
//! continuation pages are processed after everything on the current page,
//! including nested folders. For page 1 `[f1, folder1]` with a next link to
//! page 2 `[f2]` and `folder1 = [f3]`, the result is `[f1, f3, f2]`.
//!
//! A failed fetch drops only that branch (or the remaining pages of that
//! folder); it is logged and recorded as a [`TraversalWarning`], and the walk
//! continues. Each page URL is fetched at most once per walk, so a next link
//! pointing back at an earlier page ends that folder instead of looping.

use futures::future::BoxFuture;
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

use crate::graph::GraphClient;
use crate::session::GraphSession;
use crate::types::{DriveId, Traversal, TraversalWarning};

/// `{base}/drives/{drive}/root/children`
pub fn drive_root_url(base_url: &str, drive_id: &DriveId) -> String {
    format!("{}/drives/{}/root/children", base_url, drive_id)
}

/// `{base}/drives/{drive}/items/{item}/children`
pub fn children_url(base_url: &str, drive_id: &DriveId, item_id: &str) -> String {
    format!("{}/drives/{}/items/{}/children", base_url, drive_id, item_id)
}

/// Walk the tree starting at `root_url`, a driveItem collection URL.
///
/// Never fails: branches that could not be fetched show up in
/// [`Traversal::warnings`].
#[instrument(skip(graph, session, drive_id), fields(drive_id = %drive_id))]
pub async fn walk_drive(
    graph: &GraphClient,
    session: &mut GraphSession,
    drive_id: &DriveId,
    root_url: &str,
) -> Traversal {
    let mut traversal = Traversal::default();
    let mut visited = HashSet::new();

    walk_folder(
        graph,
        session,
        drive_id,
        root_url.to_string(),
        &mut visited,
        &mut traversal,
    )
    .await;

    info!(
        files = traversal.files.len(),
        skipped_branches = traversal.warnings.len(),
        "Drive walk finished"
    );

    traversal
}

fn walk_folder<'a>(
    graph: &'a GraphClient,
    session: &'a mut GraphSession,
    drive_id: &'a DriveId,
    url: String,
    visited: &'a mut HashSet<String>,
    out: &'a mut Traversal,
) -> BoxFuture<'a, ()> {
    Box::pin(async move {
        let mut next = Some(url);

        while let Some(page_url) = next.take() {
            if !visited.insert(page_url.clone()) {
                warn!(url = %page_url, "Page already visited, stopping pagination");
                out.warnings.push(TraversalWarning {
                    url: page_url,
                    message: "page already visited in this walk".to_string(),
                });
                return;
            }

            let page = match graph.get_page(session, &page_url).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(url = %page_url, error = %e, "Skipping branch after failed fetch");
                    out.warnings.push(TraversalWarning {
                        url: page_url,
                        message: e.to_string(),
                    });
                    return;
                }
            };

            debug!(
                url = %page_url,
                items = page.value.len(),
                has_next = page.next_link.is_some(),
                "Fetched page"
            );

            for item in page.value {
                if item.is_folder() {
                    let folder_url = children_url(graph.base_url(), drive_id, &item.id);
                    walk_folder(graph, session, drive_id, folder_url, visited, out).await;
                } else {
                    out.files.push(item);
                }
            }

            next = page.next_link;
        }
    })
}
