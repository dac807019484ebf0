use std::sync::Arc;

use hn_core::{project_all, Ask, Item, ItemId, Job, Story, Update, Variant};
use reqwest::Method;

use crate::cancel::CancellationToken;
use crate::error::ClientResult;
use crate::fetch::{fetch, Transport};
use crate::items::ItemService;
use crate::retrieve::ItemFilter;

const MAX_ITEM_PATH: &str = "/maxitem";
const UPDATES_PATH: &str = "/updates";

/// Ranked story lists published upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoryList {
    Top,
    New,
    Best,
    Ask,
    Show,
    Job,
}

impl StoryList {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Top => "/topstories",
            Self::New => "/newstories",
            Self::Best => "/beststories",
            Self::Ask => "/askstories",
            Self::Show => "/showstories",
            Self::Job => "/jobstories",
        }
    }
}

/// Live data: newest item, ranked lists and recent changes.
#[derive(Clone)]
pub struct LiveService {
    transport: Arc<dyn Transport>,
    items: ItemService,
}

impl std::fmt::Debug for LiveService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveService").field("items", &self.items).finish_non_exhaustive()
    }
}

impl LiveService {
    pub(crate) fn new(transport: Arc<dyn Transport>, items: ItemService) -> Self {
        Self { transport, items }
    }

    /// ID of the most recently published item.
    ///
    /// # Errors
    /// Any transport or decode failure.
    pub async fn max_id(&self) -> ClientResult<ItemId> {
        fetch(self.transport.as_ref(), Method::GET, MAX_ITEM_PATH).await
    }

    /// The newest `offset + 1` items, oldest first.
    ///
    /// # Errors
    /// Failure to read the max ID, or any fatal retrieval error.
    pub async fn recent(&self, offset: u64, cancel: &CancellationToken) -> ClientResult<Vec<Item>> {
        let latest = self.max_id().await?;
        let ids: Vec<ItemId> = (latest.saturating_sub(offset)..=latest).collect();
        self.items.list(&ids, None, cancel).await
    }

    /// IDs on one ranked list, in rank order.
    ///
    /// # Errors
    /// Any transport or decode failure.
    pub async fn ids(&self, list: StoryList) -> ClientResult<Vec<ItemId>> {
        fetch(self.transport.as_ref(), Method::GET, list.path()).await
    }

    /// Items on one ranked list, in rank order.
    ///
    /// # Errors
    /// See [`LiveService::ids`] and [`crate::Retriever::retrieve`].
    pub async fn list(
        &self,
        list: StoryList,
        filter: Option<&ItemFilter>,
        cancel: &CancellationToken,
    ) -> ClientResult<Vec<Item>> {
        let ids = self.ids(list).await?;
        self.items.list(&ids, filter, cancel).await
    }

    async fn list_as<V: Variant>(
        &self,
        list: StoryList,
        filter: Option<&ItemFilter>,
        cancel: &CancellationToken,
    ) -> ClientResult<Vec<V>> {
        Ok(project_all(self.list(list, filter, cancel).await?))
    }

    /// # Errors
    /// Any transport or decode failure.
    pub async fn top_ids(&self) -> ClientResult<Vec<ItemId>> {
        self.ids(StoryList::Top).await
    }

    /// # Errors
    /// Any transport or decode failure.
    pub async fn new_ids(&self) -> ClientResult<Vec<ItemId>> {
        self.ids(StoryList::New).await
    }

    /// # Errors
    /// Any transport or decode failure.
    pub async fn best_ids(&self) -> ClientResult<Vec<ItemId>> {
        self.ids(StoryList::Best).await
    }

    /// # Errors
    /// Any transport or decode failure.
    pub async fn ask_ids(&self) -> ClientResult<Vec<ItemId>> {
        self.ids(StoryList::Ask).await
    }

    /// # Errors
    /// Any transport or decode failure.
    pub async fn show_ids(&self) -> ClientResult<Vec<ItemId>> {
        self.ids(StoryList::Show).await
    }

    /// # Errors
    /// Any transport or decode failure.
    pub async fn job_ids(&self) -> ClientResult<Vec<ItemId>> {
        self.ids(StoryList::Job).await
    }

    /// # Errors
    /// See [`LiveService::list`].
    pub async fn top_list(
        &self,
        filter: Option<&ItemFilter>,
        cancel: &CancellationToken,
    ) -> ClientResult<Vec<Item>> {
        self.list(StoryList::Top, filter, cancel).await
    }

    /// # Errors
    /// See [`LiveService::list`].
    pub async fn new_list(
        &self,
        filter: Option<&ItemFilter>,
        cancel: &CancellationToken,
    ) -> ClientResult<Vec<Item>> {
        self.list(StoryList::New, filter, cancel).await
    }

    /// # Errors
    /// See [`LiveService::list`].
    pub async fn best_list(
        &self,
        filter: Option<&ItemFilter>,
        cancel: &CancellationToken,
    ) -> ClientResult<Vec<Item>> {
        self.list(StoryList::Best, filter, cancel).await
    }

    /// Items on the ask list tagged `ask`; others are dropped.
    ///
    /// # Errors
    /// See [`LiveService::list`].
    pub async fn ask_list(
        &self,
        filter: Option<&ItemFilter>,
        cancel: &CancellationToken,
    ) -> ClientResult<Vec<Ask>> {
        self.list_as(StoryList::Ask, filter, cancel).await
    }

    /// # Errors
    /// See [`LiveService::list`].
    pub async fn show_list(
        &self,
        filter: Option<&ItemFilter>,
        cancel: &CancellationToken,
    ) -> ClientResult<Vec<Story>> {
        self.list_as(StoryList::Show, filter, cancel).await
    }

    /// # Errors
    /// See [`LiveService::list`].
    pub async fn job_list(
        &self,
        filter: Option<&ItemFilter>,
        cancel: &CancellationToken,
    ) -> ClientResult<Vec<Job>> {
        self.list_as(StoryList::Job, filter, cancel).await
    }

    /// # Errors
    /// Any transport or decode failure.
    pub async fn updates(&self) -> ClientResult<Update> {
        fetch(self.transport.as_ref(), Method::GET, UPDATES_PATH).await
    }

    /// The items named in the latest update batch.
    ///
    /// # Errors
    /// See [`LiveService::updates`] and [`crate::Retriever::retrieve`].
    pub async fn update_list(
        &self,
        filter: Option<&ItemFilter>,
        cancel: &CancellationToken,
    ) -> ClientResult<Vec<Item>> {
        let update = self.updates().await?;
        self.items.list(&update.items, filter, cancel).await
    }
}
