//! Reminders: the user-created events the whole crate revolves around

use chrono::{NaiveDate, NaiveTime};
use csscolorparser::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::date_key::DateKey;
use crate::errors::{Error, Result};

/// Titles longer than this are rejected
pub const TITLE_MAX_CHARS: usize = 30;
/// The title a reminder gets when the user leaves it blank
pub const DEFAULT_TITLE: &str = "New event";
/// The color a freshly created reminder is tagged with
pub const DEFAULT_COLOR: &str = "#c8e9a0";

/// A dated reminder with a title, time, city and color tag.
///
/// The `id` is globally unique and never changes; `date` is the authoritative
/// day the reminder belongs to, and determines the [`DateKey`] it is indexed
/// under. The persisted form is `{ id, title, date, time, city, color }`,
/// with `date` as `YYYY-MM-DD`, `time` as `HH:MM` and `color` as a CSS hex
/// string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    id: String,
    title: String,
    date: NaiveDate,
    #[serde(with = "hhmm")]
    time: NaiveTime,
    city: String,
    color: Color,
}

impl Reminder {
    /// Create a brand new reminder. This will pick a new (random) id.
    pub fn new(title: String, date: NaiveDate, time: NaiveTime, city: String, color: Color) -> Result<Self> {
        let id = Uuid::new_v4().to_hyphenated().to_string();
        Self::with_id(id, title, date, time, city, color)
    }

    /// Create a reminder that keeps an existing id (the edit path).
    pub fn with_id(id: String, title: String, date: NaiveDate, time: NaiveTime, city: String, color: Color) -> Result<Self> {
        Ok(Self {
            id,
            title: validated_title(title)?,
            date,
            time,
            city,
            color,
        })
    }

    pub fn id(&self) -> &str          { &self.id    }
    pub fn title(&self) -> &str       { &self.title }
    pub fn date(&self) -> NaiveDate   { self.date   }
    pub fn time(&self) -> NaiveTime   { self.time   }
    pub fn city(&self) -> &str        { &self.city  }
    pub fn color(&self) -> &Color     { &self.color }

    /// The key this reminder is indexed under
    pub fn date_key(&self) -> DateKey {
        DateKey::from(self.date)
    }
}

fn validated_title(title: String) -> Result<String> {
    if title.is_empty() {
        return Ok(DEFAULT_TITLE.to_string());
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(Error::Validation {
            field: "title",
            message: format!("the maximum length for this field is {} characters", TITLE_MAX_CHARS),
        });
    }
    Ok(title)
}

/// The raw strings a reminder form submits, before any validation.
///
/// `build` turns a draft into a [`Reminder`], rejecting malformed fields with
/// [`Error::Validation`]. A draft with no `id` (a new reminder) gets a fresh
/// one; a draft carrying an `id` (an edit) keeps it.
#[derive(Clone, Debug, Default)]
pub struct ReminderDraft {
    pub title: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub city: String,
    /// Any CSS color string; blank means [`DEFAULT_COLOR`]
    pub color: String,
    pub id: Option<String>,
}

impl ReminderDraft {
    pub fn build(self) -> Result<Reminder> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").map_err(|err| Error::Validation {
            field: "date",
            message: format!("{:?} is not a valid YYYY-MM-DD date: {}", self.date, err),
        })?;
        let time = NaiveTime::parse_from_str(&self.time, "%H:%M").map_err(|err| Error::Validation {
            field: "time",
            message: format!("{:?} is not a valid HH:MM time: {}", self.time, err),
        })?;
        let color_str = if self.color.is_empty() { DEFAULT_COLOR } else { &self.color };
        let color = csscolorparser::parse(color_str).map_err(|err| Error::Validation {
            field: "color",
            message: format!("{:?} is not a valid CSS color: {}", self.color, err),
        })?;

        match self.id.filter(|id| !id.is_empty()) {
            Some(id) => Reminder::with_id(id, self.title, date, time, self.city, color),
            None => Reminder::new(self.title, date, time, self.city, color),
        }
    }
}

/// Serde support for the `HH:MM` persisted time format
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, "%H:%M").map_err(serde::de::Error::custom)
    }
}
