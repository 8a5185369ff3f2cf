//! The grouping key of the reminder index

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The string key a calendar day is indexed under: day, month and year,
/// zero-padded, no separators (e.g. `26032021` for 2021-03-26).
///
/// Two dates map to the same key if and only if they are the same calendar
/// day. Time-of-day plays no part in it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DateKey {
    content: String,
}

impl DateKey {
    pub fn as_str(&self) -> &str {
        &self.content
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self {
            content: date.format("%d%m%Y").to_string(),
        }
    }
}

impl FromStr for DateKey {
    type Err = chrono::ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(s, "%d%m%Y")?;
        Ok(Self::from(date))
    }
}

impl Display for DateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}

/// Used to support serde (keys serialize as bare strings, so the index can be
/// a plain JSON object)
impl Serialize for DateKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.content)
    }
}
/// Used to support serde
impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D>(deserializer: D) -> Result<DateKey, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
