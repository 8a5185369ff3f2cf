//! Weather forecast lookup for a reminder's city and time.
//!
//! This module only consumes the forecast service: the [`client`] module
//! speaks its HTTP protocol behind the [`ForecastSource`] trait, and the
//! [`watcher`] module debounces the user's input and guards against
//! out-of-order responses. Selecting an entry out of a forecast response
//! happens here.

pub mod client;
pub use client::{ForecastSource, WeatherClient};
pub mod watcher;
pub use watcher::{ForecastRequest, ForecastWatcher};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;

/// The response body of the forecast endpoint: a list of timestamped entries
/// a few hours apart
#[derive(Clone, Debug, Deserialize)]
pub struct ForecastResponse {
    pub list: Vec<ForecastEntry>,
}

/// One timestamped entry of a forecast response
#[derive(Clone, Debug, Deserialize)]
pub struct ForecastEntry {
    /// Unix timestamp of the entry
    pub dt: i64,
    /// The same instant as `YYYY-MM-DD HH:MM:SS`
    pub dt_txt: String,
    pub main: MainReadings,
    pub weather: Vec<WeatherCondition>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MainReadings {
    /// Metric degrees (the requests ask for `units=metric`)
    pub temp: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WeatherCondition {
    pub description: String,
    /// Icon code of the service's image set, e.g. `03d`
    pub icon: String,
}

impl ForecastEntry {
    fn timestamp(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.dt_txt, "%Y-%m-%d %H:%M:%S").ok()
    }
}

impl ForecastResponse {
    /// Select the entry closest to the requested date and time.
    ///
    /// An entry only qualifies if it falls on the requested calendar day:
    /// the closest entry of some other day is no forecast at all. Entries
    /// with an unreadable timestamp are skipped.
    pub fn closest_to(&self, date: NaiveDate, time: NaiveTime) -> Option<Forecast> {
        let target = date.and_time(time);

        let mut best: Option<(i64, &ForecastEntry, NaiveDateTime)> = None;
        for entry in &self.list {
            let stamp = match entry.timestamp() {
                Some(stamp) => stamp,
                None => continue,
            };
            let distance = (stamp - target).num_seconds().abs();
            match best {
                Some((best_distance, _, _)) if best_distance <= distance => {}
                _ => best = Some((distance, entry, stamp)),
            }
        }

        let (_, entry, stamp) = best?;
        if stamp.date() != date {
            return None;
        }
        Forecast::from_entry(entry, stamp)
    }
}

/// The forecast actually shown for a reminder, distilled from the selected
/// entry
#[derive(Clone, Debug, PartialEq)]
pub struct Forecast {
    temperature: f64,
    description: String,
    icon: String,
    timestamp: NaiveDateTime,
}

impl Forecast {
    fn from_entry(entry: &ForecastEntry, timestamp: NaiveDateTime) -> Option<Self> {
        let condition = entry.weather.first()?;
        Some(Self {
            temperature: entry.main.temp,
            description: condition.description.clone(),
            icon: condition.icon.clone(),
            timestamp,
        })
    }

    pub fn temperature(&self) -> f64            { self.temperature  }
    pub fn description(&self) -> &str           { &self.description }
    pub fn icon(&self) -> &str                  { &self.icon        }
    pub fn timestamp(&self) -> NaiveDateTime    { self.timestamp    }

    /// `29.06˚C`
    pub fn display_temperature(&self) -> String {
        format!("{:.2}˚C", self.temperature)
    }

    /// The description with each word capitalized, e.g. `Scattered Clouds`
    pub fn display_description(&self) -> String {
        self.description
            .split_whitespace()
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<String>>()
            .join(" ")
    }

    /// Where the service hosts the icon image
    pub fn icon_url(&self) -> String {
        format!("https://openweathermap.org/img/wn/{}@2x.png", self.icon)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Two entries three hours apart on the same day
    pub(crate) fn fixture() -> ForecastResponse {
        serde_json::from_str(
            r#"{
                "list": [
                    {
                        "dt": 1615129200,
                        "main": { "temp": 29.21 },
                        "weather": [ { "description": "scattered clouds", "icon": "03d" } ],
                        "dt_txt": "2021-03-07 15:00:00"
                    },
                    {
                        "dt": 1615140000,
                        "main": { "temp": 29.06 },
                        "weather": [ { "description": "scattered clouds", "icon": "03d" } ],
                        "dt_txt": "2021-03-07 18:00:00"
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn picks_the_entry_closest_to_the_requested_time() {
        let response = fixture();

        let afternoon = response.closest_to(date(2021, 3, 7), time(15, 0)).unwrap();
        assert_eq!(afternoon.temperature(), 29.21);

        let evening = response.closest_to(date(2021, 3, 7), time(19, 0)).unwrap();
        assert_eq!(evening.temperature(), 29.06);
    }

    #[test]
    fn an_entry_on_another_day_is_no_forecast() {
        let response = fixture();
        // the closest entry to shortly after midnight is still March 7th
        assert_eq!(response.closest_to(date(2021, 3, 8), time(0, 30)), None);
        assert_eq!(response.closest_to(date(2021, 3, 26), time(15, 0)), None);
    }

    #[test]
    fn an_empty_list_is_no_forecast() {
        let response: ForecastResponse = serde_json::from_str(r#"{ "list": [] }"#).unwrap();
        assert_eq!(response.closest_to(date(2021, 3, 7), time(15, 0)), None);
    }

    #[test]
    fn unreadable_timestamps_are_skipped() {
        let response: ForecastResponse = serde_json::from_str(
            r#"{
                "list": [
                    {
                        "dt": 1615129200,
                        "main": { "temp": 12.0 },
                        "weather": [ { "description": "mist", "icon": "50d" } ],
                        "dt_txt": "not a timestamp"
                    },
                    {
                        "dt": 1615140000,
                        "main": { "temp": 29.06 },
                        "weather": [ { "description": "scattered clouds", "icon": "03d" } ],
                        "dt_txt": "2021-03-07 18:00:00"
                    }
                ]
            }"#,
        )
        .unwrap();

        let forecast = response.closest_to(date(2021, 3, 7), time(15, 0)).unwrap();
        assert_eq!(forecast.temperature(), 29.06);
    }

    #[test]
    fn display_helpers_match_the_weather_panel() {
        let forecast = fixture().closest_to(date(2021, 3, 7), time(19, 0)).unwrap();
        assert_eq!(forecast.display_temperature(), "29.06˚C");
        assert_eq!(forecast.display_description(), "Scattered Clouds");
        assert_eq!(forecast.icon_url(), "https://openweathermap.org/img/wn/03d@2x.png");
    }
}
