use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::text::unescape_html;
use crate::Timestamp;

/// Numeric identifier of an item. Upstream IDs are positive and dense.
pub type ItemId = u64;

pub const STORY_TYPE: &str = "story";
pub const COMMENT_TYPE: &str = "comment";
pub const ASK_TYPE: &str = "ask";
pub const JOB_TYPE: &str = "job";
pub const POLL_TYPE: &str = "poll";
pub const POLL_OPTION_TYPE: &str = "pollopt";

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero_u64(value: &u64) -> bool {
    *value == 0
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero_i64(value: &i64) -> bool {
    *value == 0
}

/// The closed set of type tags an item can carry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Story,
    Comment,
    Ask,
    Job,
    Poll,
    #[serde(rename = "pollopt")]
    PollOption,
}

impl ItemKind {
    pub const ALL: [Self; 6] =
        [Self::Story, Self::Comment, Self::Ask, Self::Job, Self::Poll, Self::PollOption];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Story => STORY_TYPE,
            Self::Comment => COMMENT_TYPE,
            Self::Ask => ASK_TYPE,
            Self::Job => JOB_TYPE,
            Self::Poll => POLL_TYPE,
            Self::PollOption => POLL_OPTION_TYPE,
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            STORY_TYPE => Some(Self::Story),
            COMMENT_TYPE => Some(Self::Comment),
            ASK_TYPE => Some(Self::Ask),
            JOB_TYPE => Some(Self::Job),
            POLL_TYPE => Some(Self::Poll),
            POLL_OPTION_TYPE => Some(Self::PollOption),
            _ => None,
        }
    }
}

impl Display for ItemKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields shared by every item kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct ItemBase {
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub id: ItemId,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub by: String,
    #[serde(default, skip_serializing_if = "is_zero_i64")]
    pub score: i64,
    #[serde(default, skip_serializing_if = "Timestamp::is_unset")]
    pub time: Timestamp,
    /// Raw type tag as sent upstream. Use [`ItemBase::item_kind`] for the parsed form.
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

impl ItemBase {
    #[must_use]
    pub fn item_kind(&self) -> Option<ItemKind> {
        ItemKind::parse(&self.kind)
    }
}

/// Generic record carrying the union of every field used by any item kind.
///
/// Only the subset relevant to the record's type tag is populated; the rest
/// keep their zero value and are omitted when serialized. Narrow it with
/// [`crate::project`] or [`crate::TypedItem`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct Item {
    #[serde(flatten)]
    pub base: ItemBase,
    #[serde(default, skip_serializing_if = "is_zero_i64")]
    pub descendants: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<ItemId>,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub parent: ItemId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kids: Vec<ItemId>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub poll: ItemId,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
}

impl Item {
    #[must_use]
    pub fn item_kind(&self) -> Option<ItemKind> {
        self.base.item_kind()
    }

    #[must_use]
    pub fn is(&self, kind: ItemKind) -> bool {
        self.base.kind == kind.as_str()
    }

    /// Decode HTML entities in `text` and `title`.
    #[must_use]
    pub fn unescaped(mut self) -> Self {
        if !self.text.is_empty() {
            self.text = unescape_html(&self.text).into_owned();
        }
        if !self.title.is_empty() {
            self.title = unescape_html(&self.title).into_owned();
        }
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct Story {
    #[serde(flatten)]
    pub base: ItemBase,
    #[serde(default, skip_serializing_if = "is_zero_i64")]
    pub descendants: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kids: Vec<ItemId>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct Comment {
    #[serde(flatten)]
    pub base: ItemBase,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kids: Vec<ItemId>,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub parent: ItemId,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct Ask {
    #[serde(flatten)]
    pub base: ItemBase,
    #[serde(default, skip_serializing_if = "is_zero_i64")]
    pub descendants: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kids: Vec<ItemId>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct Job {
    #[serde(flatten)]
    pub base: ItemBase,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct Poll {
    #[serde(flatten)]
    pub base: ItemBase,
    #[serde(default, skip_serializing_if = "is_zero_i64")]
    pub descendants: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kids: Vec<ItemId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<ItemId>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct PollOption {
    #[serde(flatten)]
    pub base: ItemBase,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub poll: ItemId,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
}

/// Comparison keys exposed by the generic record and every variant.
pub trait Sortable {
    fn base(&self) -> &ItemBase;

    fn id(&self) -> ItemId {
        self.base().id
    }

    fn by(&self) -> &str {
        &self.base().by
    }

    fn score(&self) -> i64 {
        self.base().score
    }

    fn time(&self) -> Timestamp {
        self.base().time
    }

    fn type_tag(&self) -> &str {
        &self.base().kind
    }
}

impl Sortable for ItemBase {
    fn base(&self) -> &ItemBase {
        self
    }
}

impl Sortable for Item {
    fn base(&self) -> &ItemBase {
        &self.base
    }
}

impl Sortable for Story {
    fn base(&self) -> &ItemBase {
        &self.base
    }
}

impl Sortable for Comment {
    fn base(&self) -> &ItemBase {
        &self.base
    }
}

impl Sortable for Ask {
    fn base(&self) -> &ItemBase {
        &self.base
    }
}

impl Sortable for Job {
    fn base(&self) -> &ItemBase {
        &self.base
    }
}

impl Sortable for Poll {
    fn base(&self) -> &ItemBase {
        &self.base
    }
}

impl Sortable for PollOption {
    fn base(&self) -> &ItemBase {
        &self.base
    }
}

/// A named account. `submitted` is most-recent-first as sent upstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct User {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub about: String,
    #[serde(default, skip_serializing_if = "Timestamp::is_unset")]
    pub created: Timestamp,
    #[serde(default, skip_serializing_if = "is_zero_i64")]
    pub karma: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub submitted: Vec<ItemId>,
}

/// Item and profile identifiers changed since the previous poll.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct Update {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ItemId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<String>,
}
