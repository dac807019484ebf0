//! Record model, tagged projection and stable sorting for the Hacker News item graph.

mod model;
mod projection;
mod sort;
mod text;
mod timestamp;

pub use model::{
    Ask, Comment, Item, ItemBase, ItemId, ItemKind, Job, Poll, PollOption, Sortable, Story,
    Update, User, ASK_TYPE, COMMENT_TYPE, JOB_TYPE, POLL_OPTION_TYPE, POLL_TYPE, STORY_TYPE,
};
pub use projection::{project, project_all, TypedItem, Variant};
pub use sort::{sort, sort_by, sort_by_code, Direction, SortKey};
pub use text::unescape_html;
pub use timestamp::Timestamp;

#[derive(Debug, Clone, thiserror::Error, Eq, PartialEq)]
pub enum ProjectionError {
    #[error("type mismatch: expected {expected}, got {actual:?}")]
    TypeMismatch { expected: ItemKind, actual: String },
    #[error("unsupported item type tag {0:?}")]
    UnsupportedTag(String),
}

#[derive(Debug, Clone, thiserror::Error, Eq, PartialEq)]
pub enum SortError {
    #[error("invalid sort direction: {0}")]
    InvalidDirection(String),
    #[error("invalid sort key: {0}")]
    InvalidKey(String),
}
