//! Async client for the Hacker News API.
//!
//! [`Client`] bundles three services: [`ItemService`] for item lookups and
//! bounded fan-out retrieval, [`UserService`] for profiles and submissions,
//! and [`LiveService`] for ranked lists and updates.

mod cancel;
mod client;
mod config;
mod error;
mod fetch;
mod items;
mod live;
mod retrieve;
mod users;

pub use cancel::CancellationToken;
pub use client::Client;
pub use config::{
    ClientConfig, WorkerLimit, BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS, MAX_WORKERS_ENV,
    TIMEOUT_MS_ENV, USER_AGENT_ENV,
};
pub use error::{ClientError, ClientResult, ErrorCategory};
pub use fetch::{fetch, HttpTransport, Transport};
pub use items::ItemService;
pub use live::{LiveService, StoryList};
pub use retrieve::{ItemFilter, Retriever};
pub use users::UserService;

pub use reqwest::Method;
