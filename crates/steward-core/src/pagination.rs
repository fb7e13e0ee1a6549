//! Paginated collection.
//!
//! Drains a cursor-based list call into memory. A remote that hands back a
//! cursor it already issued during the same drain fails with
//! [`LifecycleError::Protocol`] instead of looping.

use std::collections::{BTreeSet, HashSet};
use std::future::Future;

use steward_gateway::{Page, RemoteError, RemoteGateway};
use tracing::debug;

use crate::error::{LifecycleError, Result};

/// Calls `fetch` with each continuation cursor (starting with `None`) until a
/// page without one comes back, and returns every item in page order.
pub async fn collect_pages<T, F, Fut>(what: &str, mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = std::result::Result<Page<T>, RemoteError>>,
{
    let mut items = Vec::new();
    let mut issued: HashSet<String> = HashSet::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = fetch(cursor.take()).await?;
        pages += 1;
        let next = page.continuation().map(String::from);
        items.extend(page.items);

        match next {
            None => break,
            Some(next) => {
                if !issued.insert(next.clone()) {
                    return Err(LifecycleError::protocol(format!(
                        "{what} listing returned cursor {next} twice"
                    )));
                }
                cursor = Some(next);
            }
        }
    }

    debug!(what, pages, items = items.len(), "Collected paginated listing");
    Ok(items)
}

/// Reads the complete membership set of a parent.
pub async fn collect_membership(gateway: &dyn RemoteGateway, id: &str) -> Result<BTreeSet<String>> {
    let items = collect_pages("membership", move |cursor| async move {
        gateway.list_membership(id, cursor.as_deref()).await
    })
    .await?;
    Ok(items.into_iter().collect())
}
