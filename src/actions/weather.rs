/// Weather lookups
///
/// Current conditions from OpenWeatherMap. The provider trait keeps the
/// handlers testable without touching the network.

use crate::error::{AgentError, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error};

const OPENWEATHER_URL: &str = "http://api.openweathermap.org/data/2.5/weather";

/// Fixed request timeout. The shell waits on this synchronously.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Current conditions for one city
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub city: String,
    pub description: String,
    pub temperature_c: f64,
    pub humidity: u32,
    pub wind_speed: f64,
}

impl fmt::Display for WeatherReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Weather in {}: {}, {}°C, Humidity: {}%, Wind: {} m/s",
            self.city,
            title_case(&self.description),
            self.temperature_c,
            self.humidity,
            self.wind_speed
        )
    }
}

/// Anything that can answer "what's it like in <city> right now"
pub trait WeatherProvider {
    fn current(&self, city: &str) -> Result<WeatherReport>;
}

// Only the fields we render
#[derive(Debug, Deserialize)]
struct OwmResponse {
    main: OwmMain,
    weather: Vec<OwmCondition>,
    wind: OwmWind,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: u32,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwmError {
    message: String,
}

/// Blocking OpenWeatherMap client, metric units
pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_key: api_key.into(),
            base_url: OPENWEATHER_URL.to_string(),
        })
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl WeatherProvider for OpenWeatherClient {
    fn current(&self, city: &str) -> Result<WeatherReport> {
        if !self.has_api_key() {
            return Err(AgentError::MissingApiKey);
        }

        debug!(city, "requesting current weather");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<OwmError>()
                .map(|e| e.message)
                .unwrap_or_else(|_| status.to_string());
            error!(city, %status, "Weather API error: {}", message);
            return Err(AgentError::Weather(message));
        }

        let data: OwmResponse = response.json()?;
        let description = data
            .weather
            .into_iter()
            .next()
            .map(|c| c.description)
            .ok_or_else(|| AgentError::Weather("response had no conditions".to_string()))?;

        Ok(WeatherReport {
            city: city.to_string(),
            description,
            temperature_c: data.main.temp,
            humidity: data.main.humidity,
            wind_speed: data.wind.speed,
        })
    }
}

/// "light rain" -> "Light Rain"
pub fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
