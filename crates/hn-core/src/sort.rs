use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::Sortable;
use crate::SortError;

/// Comparison key shared by every variant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Id,
    Score,
    Time,
    #[serde(rename = "type")]
    Kind,
}

impl SortKey {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Score => "score",
            Self::Time => "time",
            Self::Kind => "type",
        }
    }

    /// # Errors
    /// Returns [`SortError::InvalidKey`] for anything but `id`, `score`, `time` or `type`.
    pub fn parse(value: &str) -> Result<Self, SortError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "score" => Ok(Self::Score),
            "time" => Ok(Self::Time),
            "type" | "kind" => Ok(Self::Kind),
            _ => {
                warn!(key = value, "rejected unknown sort key");
                Err(SortError::InvalidKey(value.to_string()))
            }
        }
    }

    /// Ascending comparison of `a` and `b` under this key.
    pub fn compare<T: Sortable + ?Sized>(self, a: &T, b: &T) -> Ordering {
        match self {
            Self::Id => a.id().cmp(&b.id()),
            Self::Score => a.score().cmp(&b.score()),
            Self::Time => a.time().cmp(&b.time()),
            Self::Kind => a.type_tag().cmp(b.type_tag()),
        }
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = SortError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    /// # Errors
    /// Returns [`SortError::InvalidDirection`] for anything but `asc`/`ascending`
    /// or `desc`/`descending`.
    pub fn parse(value: &str) -> Result<Self, SortError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            _ => {
                warn!(direction = value, "rejected unknown sort direction");
                Err(SortError::InvalidDirection(value.to_string()))
            }
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = SortError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

/// Numeric direction codes: `0` ascending, `1` descending.
impl TryFrom<i64> for Direction {
    type Error = SortError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Ascending),
            1 => Ok(Self::Descending),
            _ => {
                warn!(direction = code, "rejected unknown sort direction code");
                Err(SortError::InvalidDirection(code.to_string()))
            }
        }
    }
}

/// Stable in-place sort by one comparison key.
///
/// Descending order inverts the comparator, so items with equal keys keep
/// their input order in both directions. Unset creation times sort before
/// every set time.
pub fn sort_by<T: Sortable>(items: &mut [T], key: SortKey, direction: Direction) {
    items.sort_by(|a, b| direction.apply(key.compare(a, b)));
}

/// [`sort_by`] with a numeric direction code.
///
/// # Errors
/// Returns [`SortError::InvalidDirection`] and leaves `items` untouched when
/// `code` is neither `0` nor `1`.
pub fn sort_by_code<T: Sortable>(
    items: &mut [T],
    key: SortKey,
    code: i64,
) -> Result<(), SortError> {
    let direction = Direction::try_from(code)?;
    sort_by(items, key, direction);
    Ok(())
}

/// Stable in-place sort with a caller-supplied comparator.
pub fn sort<T, F>(items: &mut [T], compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    items.sort_by(compare);
}
