use std::fmt::{Display, Formatter};

use serde::Serialize;
use tracing::debug;

use crate::model::{Ask, Comment, Item, ItemKind, Job, Poll, PollOption, Sortable, Story};
use crate::ProjectionError;

/// A narrowed record type selected by a fixed type tag.
pub trait Variant: Sortable + Sized {
    const KIND: ItemKind;

    /// Copy the fields this variant carries out of `item`. Does not check the tag.
    fn narrow(item: Item) -> Self;
}

impl Variant for Story {
    const KIND: ItemKind = ItemKind::Story;

    fn narrow(item: Item) -> Self {
        Self {
            base: item.base,
            descendants: item.descendants,
            kids: item.kids,
            text: item.text,
            title: item.title,
            url: item.url,
        }
    }
}

impl Variant for Comment {
    const KIND: ItemKind = ItemKind::Comment;

    fn narrow(item: Item) -> Self {
        Self { base: item.base, kids: item.kids, parent: item.parent, text: item.text }
    }
}

impl Variant for Ask {
    const KIND: ItemKind = ItemKind::Ask;

    fn narrow(item: Item) -> Self {
        Self {
            base: item.base,
            descendants: item.descendants,
            kids: item.kids,
            text: item.text,
            title: item.title,
        }
    }
}

impl Variant for Job {
    const KIND: ItemKind = ItemKind::Job;

    fn narrow(item: Item) -> Self {
        Self { base: item.base, text: item.text, title: item.title, url: item.url }
    }
}

impl Variant for Poll {
    const KIND: ItemKind = ItemKind::Poll;

    fn narrow(item: Item) -> Self {
        Self {
            base: item.base,
            descendants: item.descendants,
            kids: item.kids,
            parts: item.parts,
            text: item.text,
            title: item.title,
        }
    }
}

impl Variant for PollOption {
    const KIND: ItemKind = ItemKind::PollOption;

    fn narrow(item: Item) -> Self {
        Self { base: item.base, poll: item.poll, text: item.text }
    }
}

/// Narrow `item` into `V`, failing unless its tag is exactly `V::KIND`.
///
/// # Errors
/// [`ProjectionError::UnsupportedTag`] when the tag is not one of the known
/// kinds, [`ProjectionError::TypeMismatch`] when it names a different kind.
pub fn project<V: Variant>(item: Item) -> Result<V, ProjectionError> {
    match item.item_kind() {
        Some(kind) if kind == V::KIND => Ok(V::narrow(item)),
        Some(_) => Err(ProjectionError::TypeMismatch {
            expected: V::KIND,
            actual: item.base.kind,
        }),
        None => Err(ProjectionError::UnsupportedTag(item.base.kind)),
    }
}

/// Narrow every item tagged `V::KIND`, silently dropping the rest.
#[must_use]
pub fn project_all<V: Variant>(items: Vec<Item>) -> Vec<V> {
    let total = items.len();
    let projected: Vec<V> = items.into_iter().filter_map(|item| project(item).ok()).collect();
    if projected.len() < total {
        debug!(
            kind = %V::KIND,
            dropped = total - projected.len(),
            "dropped items with a different type tag"
        );
    }
    projected
}

/// Any item narrowed to the variant its tag selects.
/// Serializes as the inner variant's fields.
#[derive(Debug, Clone, Serialize, Eq, PartialEq)]
#[serde(untagged)]
pub enum TypedItem {
    Story(Story),
    Comment(Comment),
    Ask(Ask),
    Job(Job),
    Poll(Poll),
    PollOption(PollOption),
}

impl TypedItem {
    #[must_use]
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Story(_) => ItemKind::Story,
            Self::Comment(_) => ItemKind::Comment,
            Self::Ask(_) => ItemKind::Ask,
            Self::Job(_) => ItemKind::Job,
            Self::Poll(_) => ItemKind::Poll,
            Self::PollOption(_) => ItemKind::PollOption,
        }
    }
}

impl TryFrom<Item> for TypedItem {
    type Error = ProjectionError;

    fn try_from(item: Item) -> Result<Self, Self::Error> {
        match item.item_kind() {
            Some(ItemKind::Story) => Ok(Self::Story(Story::narrow(item))),
            Some(ItemKind::Comment) => Ok(Self::Comment(Comment::narrow(item))),
            Some(ItemKind::Ask) => Ok(Self::Ask(Ask::narrow(item))),
            Some(ItemKind::Job) => Ok(Self::Job(Job::narrow(item))),
            Some(ItemKind::Poll) => Ok(Self::Poll(Poll::narrow(item))),
            Some(ItemKind::PollOption) => Ok(Self::PollOption(PollOption::narrow(item))),
            None => Err(ProjectionError::UnsupportedTag(item.base.kind)),
        }
    }
}

impl Sortable for TypedItem {
    fn base(&self) -> &crate::ItemBase {
        match self {
            Self::Story(inner) => inner.base(),
            Self::Comment(inner) => inner.base(),
            Self::Ask(inner) => inner.base(),
            Self::Job(inner) => inner.base(),
            Self::Poll(inner) => inner.base(),
            Self::PollOption(inner) => inner.base(),
        }
    }
}

impl Display for TypedItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind(), self.id())
    }
}
