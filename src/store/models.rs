/// Data models for the JSON stores
///
/// Field names match the files on disk: `notes.json`, `reminders.json` and
/// `config.json` in the data directory.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Default city used for weather when the user doesn't name one
pub const DEFAULT_CITY: &str = "London";

/// A saved note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub content: String,
    pub created_at: NaiveDateTime, // local time, ISO 8601 without offset
}

/// A reminder, optionally with a due time as the user typed it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: u64,
    pub text: String,
    pub created_at: NaiveDateTime,
    pub time: Option<String>,
    pub completed: bool,
}

impl Reminder {
    /// Render as a list line: `- text (Due: time)`
    pub fn display_line(&self) -> String {
        match &self.time {
            Some(time) => format!("- {} (Due: {})", self.text, time),
            None => format!("- {}", self.text),
        }
    }
}

/// User configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub weather_api_key: String,
    pub default_city: String,
}

impl Config {
    pub fn has_weather_key(&self) -> bool {
        !self.weather_api_key.trim().is_empty()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            weather_api_key: String::new(),
            default_city: DEFAULT_CITY.to_string(),
        }
    }
}
