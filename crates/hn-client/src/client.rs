use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use crate::config::{ClientConfig, WorkerLimit};
use crate::error::ClientResult;
use crate::fetch::{HttpTransport, Transport};
use crate::items::ItemService;
use crate::live::LiveService;
use crate::users::UserService;

/// Entry point bundling the item, user and live services.
///
/// All three services share one transport and one worker limit.
#[derive(Debug, Clone)]
pub struct Client {
    pub items: ItemService,
    pub users: UserService,
    pub live: LiveService,
}

impl Client {
    /// Client over HTTPS configured by `config`.
    ///
    /// # Errors
    /// Returns [`crate::ClientError::InvalidConfig`] when the HTTP client
    /// cannot be built.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(Arc::new(transport), config))
    }

    /// Client over a caller-supplied transport. Only `config.max_workers`
    /// is used; the rest configures [`HttpTransport`].
    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>, config: &ClientConfig) -> Self {
        let max_workers = Arc::new(AtomicUsize::new(config.max_workers.to_raw()));
        let items = ItemService::new(Arc::clone(&transport), max_workers);
        let users = UserService::new(Arc::clone(&transport), items.clone());
        let live = LiveService::new(transport, items.clone());
        Self { items, users, live }
    }

    #[must_use]
    pub fn max_workers(&self) -> WorkerLimit {
        self.items.max_workers()
    }

    /// Applies to retrievals started after this call.
    pub fn set_max_workers(&self, limit: WorkerLimit) {
        self.items.set_max_workers(limit);
    }
}
