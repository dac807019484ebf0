use std::fmt::{Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::OffsetDateTime;

/// Creation instant of an item or user, carried upstream as Unix seconds.
///
/// Upstream uses `0` (or omits the field) when no time is recorded. That case
/// decodes to [`Timestamp::UNSET`], which is distinct from a set instant at the
/// Unix epoch and is skipped when serializing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(Option<OffsetDateTime>);

impl Timestamp {
    pub const UNSET: Self = Self(None);

    /// Decode Unix seconds, mapping `0` to [`Timestamp::UNSET`].
    ///
    /// # Errors
    /// Returns [`time::error::ComponentRange`] when `seconds` is outside the
    /// range representable by [`OffsetDateTime`].
    pub fn from_unix(seconds: i64) -> Result<Self, time::error::ComponentRange> {
        if seconds == 0 {
            return Ok(Self::UNSET);
        }
        OffsetDateTime::from_unix_timestamp(seconds).map(|instant| Self(Some(instant)))
    }

    #[must_use]
    pub fn at(instant: OffsetDateTime) -> Self {
        Self(Some(instant))
    }

    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.0.is_none()
    }

    #[must_use]
    pub fn instant(self) -> Option<OffsetDateTime> {
        self.0
    }

    /// Unix seconds, or `0` when unset.
    #[must_use]
    pub fn unix_seconds(self) -> i64 {
        self.0.map_or(0, OffsetDateTime::unix_timestamp)
    }
}

impl From<OffsetDateTime> for Timestamp {
    fn from(instant: OffsetDateTime) -> Self {
        Self::at(instant)
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(instant) => match instant.format(&time::format_description::well_known::Rfc3339) {
                Ok(text) => f.write_str(&text),
                Err(_) => write!(f, "{}", instant.unix_timestamp()),
            },
            None => f.write_str("unset"),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.unix_seconds())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = Option::<i64>::deserialize(deserializer)?;
        match seconds {
            None => Ok(Self::UNSET),
            Some(seconds) => Self::from_unix(seconds).map_err(serde::de::Error::custom),
        }
    }
}
