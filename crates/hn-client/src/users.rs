use std::sync::Arc;

use hn_core::{project_all, Ask, Comment, Item, Job, Poll, PollOption, Story, User, Variant};
use reqwest::Method;

use crate::cancel::CancellationToken;
use crate::error::ClientResult;
use crate::fetch::{fetch, Transport};
use crate::items::ItemService;
use crate::retrieve::ItemFilter;

/// User profiles and their submissions.
#[derive(Clone)]
pub struct UserService {
    transport: Arc<dyn Transport>,
    items: ItemService,
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService").field("items", &self.items).finish_non_exhaustive()
    }
}

impl UserService {
    pub(crate) fn new(transport: Arc<dyn Transport>, items: ItemService) -> Self {
        Self { transport, items }
    }

    /// # Errors
    /// [`crate::ClientError::NotFound`] for an unknown user, or any transport
    /// or decode failure.
    pub async fn get(&self, name: &str) -> ClientResult<User> {
        fetch(self.transport.as_ref(), Method::GET, &format!("/user/{name}")).await
    }

    /// Every item the user submitted, most recent first, optionally filtered.
    ///
    /// # Errors
    /// Failure to load the profile, or any fatal retrieval error.
    pub async fn items(
        &self,
        name: &str,
        filter: Option<&ItemFilter>,
        cancel: &CancellationToken,
    ) -> ClientResult<Vec<Item>> {
        let user = self.get(name).await?;
        self.items.list(&user.submitted, filter, cancel).await
    }

    async fn submissions<V: Variant>(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> ClientResult<Vec<V>> {
        let filter = ItemFilter::kind(V::KIND);
        let items = self.items(name, Some(&filter), cancel).await?;
        Ok(project_all(items))
    }

    /// # Errors
    /// See [`UserService::items`].
    pub async fn stories(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> ClientResult<Vec<Story>> {
        self.submissions(name, cancel).await
    }

    /// # Errors
    /// See [`UserService::items`].
    pub async fn comments(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> ClientResult<Vec<Comment>> {
        self.submissions(name, cancel).await
    }

    /// # Errors
    /// See [`UserService::items`].
    pub async fn asks(&self, name: &str, cancel: &CancellationToken) -> ClientResult<Vec<Ask>> {
        self.submissions(name, cancel).await
    }

    /// # Errors
    /// See [`UserService::items`].
    pub async fn jobs(&self, name: &str, cancel: &CancellationToken) -> ClientResult<Vec<Job>> {
        self.submissions(name, cancel).await
    }

    /// # Errors
    /// See [`UserService::items`].
    pub async fn polls(&self, name: &str, cancel: &CancellationToken) -> ClientResult<Vec<Poll>> {
        self.submissions(name, cancel).await
    }

    /// # Errors
    /// See [`UserService::items`].
    pub async fn poll_options(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> ClientResult<Vec<PollOption>> {
        self.submissions(name, cancel).await
    }
}
