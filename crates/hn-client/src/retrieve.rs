//! Bounded fan-out retrieval of many items, one request per ID.
//!
//! Results come back in the caller's ID order regardless of completion order.
//! Items upstream reports as absent are dropped. The first fatal error
//! cancels every other fetch and is returned alone.

use std::fmt;
use std::sync::Arc;

use hn_core::{Item, ItemId, ItemKind};
use reqwest::Method;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::cancel::CancellationToken;
use crate::config::WorkerLimit;
use crate::error::{ClientError, ClientResult};
use crate::fetch::{fetch, Transport};

/// Read-only predicate deciding whether a fetched item is kept.
///
/// Runs concurrently on the fetching tasks.
#[derive(Clone)]
pub struct ItemFilter(Arc<dyn Fn(&Item) -> bool + Send + Sync>);

impl ItemFilter {
    pub fn new(predicate: impl Fn(&Item) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(predicate))
    }

    /// Keeps items tagged `kind`.
    #[must_use]
    pub fn kind(kind: ItemKind) -> Self {
        Self::new(move |item| item.is(kind))
    }

    #[must_use]
    pub fn matches(&self, item: &Item) -> bool {
        (self.0)(item)
    }
}

impl fmt::Debug for ItemFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ItemFilter(..)")
    }
}

pub(crate) fn item_path(id: ItemId) -> String {
    format!("/item/{id}")
}

#[derive(Clone)]
pub struct Retriever {
    transport: Arc<dyn Transport>,
    limit: WorkerLimit,
}

impl fmt::Debug for Retriever {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retriever").field("limit", &self.limit).finish_non_exhaustive()
    }
}

impl Retriever {
    /// A retriever with no worker limit.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport, limit: WorkerLimit::Unbounded }
    }

    #[must_use]
    pub fn with_limit(mut self, limit: WorkerLimit) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn limit(&self) -> WorkerLimit {
        self.limit
    }

    /// Fetch every ID in `ids` and return the kept items in input order.
    ///
    /// An item is kept iff it exists upstream and either no filter is given
    /// or the filter returns true for it. Duplicate IDs are fetched and kept
    /// once per occurrence.
    ///
    /// # Errors
    /// Returns the first fatal error any fetch reports (transport, status,
    /// decode, a panicked task) or [`ClientError::Cancelled`] when `cancel`
    /// fires first. No partial result is returned in either case.
    pub async fn retrieve(
        &self,
        ids: &[ItemId],
        filter: Option<&ItemFilter>,
        cancel: &CancellationToken,
    ) -> ClientResult<Vec<Item>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        debug!(count = ids.len(), limit = %self.limit, "retrieving items");
        // A limit at or above the task count never blocks anyone.
        let permits = self
            .limit
            .get()
            .filter(|&limit| limit < ids.len())
            .map(|limit| Arc::new(Semaphore::new(limit)));
        let scope = cancel.child_token();

        let mut tasks = JoinSet::new();
        for (slot, &id) in ids.iter().enumerate() {
            let transport = Arc::clone(&self.transport);
            let permits = permits.clone();
            let scope = scope.clone();
            let filter = filter.cloned();
            tasks.spawn(async move {
                let outcome =
                    fetch_one(transport.as_ref(), permits, &scope, filter.as_ref(), id).await;
                (slot, outcome)
            });
        }

        let mut slots: Vec<Option<Item>> = vec![None; ids.len()];
        let mut first_error: Option<ClientError> = None;
        while let Some(joined) = tasks.join_next().await {
            let outcome = match joined {
                Ok((slot, outcome)) => outcome.map(|kept| (slot, kept)),
                Err(err) => Err(ClientError::Task(err.to_string())),
            };
            match outcome {
                Ok((slot, Some(item))) => {
                    if first_error.is_none() {
                        slots[slot] = Some(item);
                    }
                }
                Ok((_, None)) => {}
                Err(err) => {
                    if first_error.is_none() {
                        warn!(error = %err, "item retrieval failed, cancelling remaining fetches");
                        scope.cancel();
                        first_error = Some(err);
                    } else {
                        debug!(error = %err, "discarding error after cancellation");
                    }
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(slots.into_iter().flatten().collect()),
        }
    }
}

/// `Ok(None)` means the ID was absent upstream or rejected by the filter.
async fn fetch_one(
    transport: &dyn Transport,
    permits: Option<Arc<Semaphore>>,
    scope: &CancellationToken,
    filter: Option<&ItemFilter>,
    id: ItemId,
) -> ClientResult<Option<Item>> {
    let _permit = match permits {
        Some(permits) => tokio::select! {
            biased;
            () = scope.cancelled() => return Err(ClientError::Cancelled),
            permit = permits.acquire_owned() => Some(permit.map_err(|_| ClientError::Cancelled)?),
        },
        None => None,
    };

    let path = item_path(id);
    let fetched = tokio::select! {
        biased;
        () = scope.cancelled() => return Err(ClientError::Cancelled),
        fetched = fetch::<Item, _>(transport, Method::GET, &path) => fetched,
    };

    match fetched {
        Ok(item) => {
            let item = item.unescaped();
            let keep = match filter {
                None => true,
                Some(filter) => filter.matches(&item),
            };
            if keep {
                Ok(Some(item))
            } else {
                debug!(id, "item excluded by filter");
                Ok(None)
            }
        }
        Err(err) if err.is_not_found() => {
            debug!(id, "item absent upstream");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
