use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use hn_core::{project, Item, ItemId, Variant};
use reqwest::Method;

use crate::cancel::CancellationToken;
use crate::config::WorkerLimit;
use crate::error::ClientResult;
use crate::fetch::{fetch, Transport};
use crate::retrieve::{item_path, ItemFilter, Retriever};

/// Item lookups by ID.
#[derive(Clone)]
pub struct ItemService {
    transport: Arc<dyn Transport>,
    max_workers: Arc<AtomicUsize>,
}

impl std::fmt::Debug for ItemService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemService")
            .field("max_workers", &self.max_workers())
            .finish_non_exhaustive()
    }
}

impl ItemService {
    pub(crate) fn new(transport: Arc<dyn Transport>, max_workers: Arc<AtomicUsize>) -> Self {
        Self { transport, max_workers }
    }

    #[must_use]
    pub fn max_workers(&self) -> WorkerLimit {
        WorkerLimit::from_raw(self.max_workers.load(Ordering::SeqCst))
    }

    /// Applies to retrievals started after this call. Shared with every
    /// service of the same client.
    pub fn set_max_workers(&self, limit: WorkerLimit) {
        self.max_workers.store(limit.to_raw(), Ordering::SeqCst);
    }

    /// A retriever pinned to the current worker limit.
    #[must_use]
    pub fn retriever(&self) -> Retriever {
        Retriever::new(Arc::clone(&self.transport)).with_limit(self.max_workers())
    }

    /// Fetch one item with HTML entities in `text` and `title` decoded.
    ///
    /// # Errors
    /// [`crate::ClientError::NotFound`] when upstream has no such item, or
    /// any transport or decode failure.
    pub async fn get(&self, id: ItemId) -> ClientResult<Item> {
        let item: Item = fetch(self.transport.as_ref(), Method::GET, &item_path(id)).await?;
        Ok(item.unescaped())
    }

    /// Fetch one item and narrow it to `V`.
    ///
    /// # Errors
    /// Everything [`ItemService::get`] returns, plus
    /// [`crate::ClientError::Projection`] when the item is not a `V`.
    pub async fn get_as<V: Variant>(&self, id: ItemId) -> ClientResult<V> {
        let item = self.get(id).await?;
        Ok(project(item)?)
    }

    /// Fetch many items with the client's current worker limit.
    ///
    /// # Errors
    /// See [`Retriever::retrieve`].
    pub async fn list(
        &self,
        ids: &[ItemId],
        filter: Option<&ItemFilter>,
        cancel: &CancellationToken,
    ) -> ClientResult<Vec<Item>> {
        self.retriever().retrieve(ids, filter, cancel).await
    }

    /// Fetch many items with an explicit worker limit.
    ///
    /// # Errors
    /// See [`Retriever::retrieve`].
    pub async fn list_with_limit(
        &self,
        ids: &[ItemId],
        filter: Option<&ItemFilter>,
        limit: WorkerLimit,
        cancel: &CancellationToken,
    ) -> ClientResult<Vec<Item>> {
        Retriever::new(Arc::clone(&self.transport))
            .with_limit(limit)
            .retrieve(ids, filter, cancel)
            .await
    }
}
