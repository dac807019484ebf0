use std::fmt::{Display, Formatter};
use std::num::NonZeroUsize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

pub const BASE_URL_ENV: &str = "HN_BASE_URL";
pub const USER_AGENT_ENV: &str = "HN_USER_AGENT";
pub const TIMEOUT_MS_ENV: &str = "HN_TIMEOUT_MS";
pub const MAX_WORKERS_ENV: &str = "HN_MAX_WORKERS";

const MIN_TIMEOUT_MS: u64 = 100;
const MAX_TIMEOUT_MS: u64 = 120_000;

/// Maximum number of item fetches a single retrieval keeps in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WorkerLimit {
    #[default]
    Unbounded,
    Bounded(NonZeroUsize),
}

impl WorkerLimit {
    /// Any non-positive value means unbounded.
    #[must_use]
    pub fn from_signed(value: i64) -> Self {
        usize::try_from(value)
            .ok()
            .and_then(NonZeroUsize::new)
            .map_or(Self::Unbounded, Self::Bounded)
    }

    #[must_use]
    pub fn get(self) -> Option<usize> {
        match self {
            Self::Unbounded => None,
            Self::Bounded(limit) => Some(limit.get()),
        }
    }

    /// `0` encodes [`WorkerLimit::Unbounded`]; used for atomic storage.
    pub(crate) fn to_raw(self) -> usize {
        self.get().unwrap_or(0)
    }

    pub(crate) fn from_raw(raw: usize) -> Self {
        NonZeroUsize::new(raw).map_or(Self::Unbounded, Self::Bounded)
    }
}

impl Display for WorkerLimit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unbounded => f.write_str("unbounded"),
            Self::Bounded(limit) => write!(f, "{limit}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub max_workers: WorkerLimit,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: default_user_agent(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_workers: WorkerLimit::Unbounded,
        }
    }
}

impl ClientConfig {
    /// Defaults overlaid with the `HN_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`ClientConfig::from_env`] but reading variables through `lookup`.
    /// Malformed values keep the default.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(base_url) = lookup(BASE_URL_ENV).and_then(|value| normalize_base_url(&value)) {
            config.base_url = base_url;
        }
        if let Some(user_agent) = lookup(USER_AGENT_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
        {
            config.user_agent = user_agent;
        }
        if let Some(timeout_ms) =
            lookup(TIMEOUT_MS_ENV).and_then(|value| value.trim().parse::<u64>().ok())
        {
            config.timeout = clamp_timeout(timeout_ms);
        }
        if let Some(workers) =
            lookup(MAX_WORKERS_ENV).and_then(|value| value.trim().parse::<i64>().ok())
        {
            config.max_workers = WorkerLimit::from_signed(workers);
        }
        config
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        if let Some(base_url) = normalize_base_url(base_url) {
            self.base_url = base_url;
        }
        self
    }

    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout = clamp_timeout(timeout_ms);
        self
    }

    #[must_use]
    pub fn with_max_workers(mut self, max_workers: WorkerLimit) -> Self {
        self.max_workers = max_workers;
        self
    }
}

fn default_user_agent() -> String {
    format!("hn-client/{}", env!("CARGO_PKG_VERSION"))
}

fn normalize_base_url(value: &str) -> Option<String> {
    Some(value.trim().trim_end_matches('/').to_string()).filter(|value| !value.is_empty())
}

fn clamp_timeout(timeout_ms: u64) -> Duration {
    Duration::from_millis(timeout_ms.clamp(MIN_TIMEOUT_MS, MAX_TIMEOUT_MS))
}
