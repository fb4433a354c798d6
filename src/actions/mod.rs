/// Action handlers
///
/// The things the agent actually does once the router has picked an intent:
/// save and list notes, add and list reminders, do arithmetic, fetch the
/// weather. Web search and file operations are placeholders for now.

pub mod calculator;
pub mod weather;

pub use calculator::{Calculator, Number};
pub use weather::{OpenWeatherClient, WeatherProvider, WeatherReport};

use crate::core::Handlers;
use crate::error::{AgentError, Result};
use crate::store::DataStore;
use regex::Regex;
use tracing::error;

/// How many notes `show notes` lists
pub const NOTES_SHOWN: usize = 10;

// Leading words that say "this is a note" rather than being part of it
const NOTE_TRIGGERS: &str = r"(?i)^\s*(?:please\s+)?(?:add\s+(?:a\s+)?note|take\s+a\s+note|make\s+a\s+note|new\s+note|note\s+that|note|remember\s+that|remember|save|jot\s+down|write\s+down)\b[\s:,\-]*";

const REMINDER_TRIGGERS: &str = r"(?i)^\s*(?:please\s+)?(?:remind\s+me(?:\s+to)?|set\s+(?:a\s+)?reminder(?:\s+to)?|reminder(?:\s+to)?|remind)\b[\s:,\-]*";

const REMINDER_LISTING: &str = r"(?i)\b(?:show|list|my)\b.*\breminders?\b|^\s*reminders\s*$";

// Trailing "at 5pm" / "by 17:30" / "at noon"
const REMINDER_TIME: &str =
    r"(?i)\s+(?:at|by)\s+(\d{1,2}(?::\d{2})?\s*(?:am|pm)?|noon|midnight)\s*[.!]*$";

const SEARCH_TRIGGERS: &str = r"(?i)\b(?:search\s+for|look\s+up|find|what\s+is|who\s+is|google)\b\s*";

const CALCULATOR_TRIGGERS: &str = r"(?i)\b(?:calculate|compute|what\s+is|how\s+much\s+is|solve)\b\s*";

// City after the last "in"/"for"/"at", minus a trailing "today"/"now" and punctuation
const CITY: &str = r"(?i)^.*\b(?:in|for|at)\s+(\p{L}[\p{L}\s.'\-]*?)\s*(?:today|tonight|tomorrow|right\s+now|now)?\s*[?.!]*$";

struct Patterns {
    note_triggers: Regex,
    reminder_triggers: Regex,
    reminder_listing: Regex,
    reminder_time: Regex,
    search_triggers: Regex,
    calculator_triggers: Regex,
    city: Regex,
}

impl Patterns {
    fn compile() -> Result<Self> {
        Ok(Self {
            note_triggers: Regex::new(NOTE_TRIGGERS)?,
            reminder_triggers: Regex::new(REMINDER_TRIGGERS)?,
            reminder_listing: Regex::new(REMINDER_LISTING)?,
            reminder_time: Regex::new(REMINDER_TIME)?,
            search_triggers: Regex::new(SEARCH_TRIGGERS)?,
            calculator_triggers: Regex::new(CALCULATOR_TRIGGERS)?,
            city: Regex::new(CITY)?,
        })
    }
}

/// Handlers backed by the JSON store, a weather provider and the calculator
pub struct ActionHandlers {
    store: DataStore,
    weather: Box<dyn WeatherProvider>,
    calculator: Calculator,
    patterns: Patterns,
}

impl ActionHandlers {
    /// Build the handler set
    ///
    /// # Returns
    /// * `Err(AgentError::Pattern)` - If a built-in pattern fails to compile
    pub fn new(store: DataStore, weather: Box<dyn WeatherProvider>) -> Result<Self> {
        Ok(Self {
            store,
            weather,
            calculator: Calculator::new()?,
            patterns: Patterns::compile()?,
        })
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut DataStore {
        &mut self.store
    }

    /// City named in the input, if any
    fn extract_city(&self, input: &str) -> Option<String> {
        self.patterns
            .city
            .captures(input.trim())
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|city| !city.is_empty())
    }

    fn weather_for(&self, city: &str) -> String {
        match self.weather.current(city) {
            Ok(report) => report.to_string(),
            Err(AgentError::MissingApiKey) => AgentError::MissingApiKey.user_message(),
            Err(e @ (AgentError::Http(_) | AgentError::Weather(_))) => {
                error!(city, "Weather API error: {}", e);
                format!(
                    "Sorry, I couldn't get weather data for {}. Please check the city name and try again.",
                    city
                )
            }
            Err(e) => {
                error!(city, "Unexpected error getting weather: {}", e);
                "Sorry, there was an error getting weather information.".to_string()
            }
        }
    }

    fn list_reminders(&self) -> String {
        if self.store.reminders().is_empty() {
            return "No reminders set.".to_string();
        }

        let active = self.store.active_reminders();
        if active.is_empty() {
            return "No active reminders.".to_string();
        }

        let lines: Vec<String> = active.iter().map(|r| r.display_line()).collect();
        format!("Active reminders:\n{}", lines.join("\n"))
    }
}

impl Handlers for ActionHandlers {
    fn weather(&mut self, input: &str) -> String {
        match self.extract_city(input) {
            Some(city) => self.weather_for(&city),
            None => {
                let city = self.store.config().default_city.clone();
                format!("Getting weather for {}...\n{}", city, self.weather_for(&city))
            }
        }
    }

    fn add_note(&mut self, input: &str) -> String {
        let content = self.patterns.note_triggers.replace(input, "");
        let content = content.trim();

        if content.is_empty() {
            return "Please provide the note content.".to_string();
        }

        match self.store.add_note(content) {
            Ok(note) => format!("Note saved: '{}'", note.content),
            Err(e) => {
                error!("Error saving notes: {}", e);
                e.user_message()
            }
        }
    }

    fn show_notes(&mut self) -> String {
        let notes = self.store.recent_notes(NOTES_SHOWN);
        if notes.is_empty() {
            return "No notes saved yet.".to_string();
        }

        let lines: Vec<String> = notes
            .iter()
            .map(|note| {
                format!(
                    "- {} (Added: {})",
                    note.content,
                    note.created_at.format("%Y-%m-%d %H:%M")
                )
            })
            .collect();

        format!("Recent notes:\n{}", lines.join("\n"))
    }

    fn calculator(&mut self, input: &str) -> String {
        let expression = self.patterns.calculator_triggers.replace_all(input, "");
        self.calculator.calculate(expression.trim())
    }

    fn reminder(&mut self, input: &str) -> String {
        if self.patterns.reminder_listing.is_match(input) {
            return self.list_reminders();
        }

        let text = self.patterns.reminder_triggers.replace(input, "");
        let mut text = text.trim().to_string();

        let due = self.patterns.reminder_time.captures(&text).and_then(|caps| {
            let start = caps.get(0)?.start();
            let time = caps.get(1)?.as_str().trim().to_string();
            Some((start, time))
        });

        let mut time = None;
        if let Some((start, due_time)) = due {
            text.truncate(start);
            time = Some(due_time);
        }
        let text = text.trim();

        if text.is_empty() {
            return "Please provide the reminder text.".to_string();
        }

        match self.store.add_reminder(text, time) {
            Ok(reminder) => match &reminder.time {
                Some(due) => format!("Reminder added: '{}' (Due: {})", reminder.text, due),
                None => format!("Reminder added: '{}'", reminder.text),
            },
            Err(e) => {
                error!("Error saving reminders: {}", e);
                e.user_message()
            }
        }
    }

    fn web_search(&mut self, input: &str) -> String {
        let query = self.patterns.search_triggers.replace_all(input, "");
        let query = query.trim().trim_end_matches('?').trim_end();

        format!(
            "I would search for '{}' on the web. (Web search integration coming soon!)",
            query
        )
    }

    fn file_operation(&mut self, _input: &str) -> String {
        "File operations are not yet implemented. This feature is coming soon!".to_string()
    }

    fn unknown(&mut self, input: &str) -> String {
        format!(
            "I'm not sure how to help with '{}'. Try asking about weather, notes, calculations, or reminders!",
            input
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Router;
    use crate::intent::{Classifier, Intent};
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    #[derive(Clone, Copy)]
    enum Failure {
        MissingKey,
        NotFound,
        Other,
    }

    /// Returns canned weather and remembers which cities were asked for
    struct StubWeather {
        asked: Rc<RefCell<Vec<String>>>,
        failure: Option<Failure>,
    }

    impl WeatherProvider for StubWeather {
        fn current(&self, city: &str) -> Result<WeatherReport> {
            self.asked.borrow_mut().push(city.to_string());
            match self.failure {
                Some(Failure::MissingKey) => Err(AgentError::MissingApiKey),
                Some(Failure::NotFound) => Err(AgentError::Weather("city not found".to_string())),
                Some(Failure::Other) => Err(AgentError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "connection reset",
                ))),
                None => Ok(WeatherReport {
                    city: city.to_string(),
                    description: "clear sky".to_string(),
                    temperature_c: 21.0,
                    humidity: 40,
                    wind_speed: 2.5,
                }),
            }
        }
    }

    fn setup_with(failure: Option<Failure>) -> (ActionHandlers, Rc<RefCell<Vec<String>>>, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = DataStore::open(dir.path()).unwrap();
        let asked = Rc::new(RefCell::new(Vec::new()));
        let weather = StubWeather {
            asked: Rc::clone(&asked),
            failure,
        };
        let handlers = ActionHandlers::new(store, Box::new(weather)).unwrap();
        (handlers, asked, dir)
    }

    fn setup() -> (ActionHandlers, TempDir) {
        let (handlers, _asked, dir) = setup_with(None);
        (handlers, dir)
    }

    #[test]
    fn test_add_note_strips_trigger() {
        let (mut handlers, _dir) = setup();

        assert_eq!(handlers.add_note("add note buy milk"), "Note saved: 'buy milk'");
        assert_eq!(
            handlers.add_note("Take a note: Call the Bank"),
            "Note saved: 'Call the Bank'"
        );
        assert_eq!(handlers.store().notes().len(), 2);
    }

    #[test]
    fn test_add_note_without_content() {
        let (mut handlers, _dir) = setup();

        assert_eq!(handlers.add_note("add a note"), "Please provide the note content.");
        assert!(handlers.store().notes().is_empty());
    }

    #[test]
    fn test_show_notes() {
        let (mut handlers, _dir) = setup();
        assert_eq!(handlers.show_notes(), "No notes saved yet.");

        for i in 0..12 {
            handlers.add_note(&format!("note that item {}", i));
        }

        let reply = handlers.show_notes();
        assert!(reply.starts_with("Recent notes:\n- item 2 (Added: "));
        assert!(reply.contains("- item 11 (Added: "));
        assert!(!reply.contains("item 1 ("));
        assert_eq!(reply.lines().count(), 1 + NOTES_SHOWN);
    }

    #[test]
    fn test_reminder_added_with_text() {
        let (mut handlers, _dir) = setup();

        let reply = handlers.reminder("remind me to call mom");

        assert_eq!(reply, "Reminder added: 'call mom'");
        assert_eq!(handlers.store().reminders()[0].text, "call mom");
        assert!(handlers.store().reminders()[0].time.is_none());
    }

    #[test]
    fn test_reminder_with_time() {
        let (mut handlers, _dir) = setup();

        let reply = handlers.reminder("set a reminder to water the plants at 5pm");

        assert_eq!(reply, "Reminder added: 'water the plants' (Due: 5pm)");
        assert_eq!(handlers.store().reminders()[0].time.as_deref(), Some("5pm"));
    }

    #[test]
    fn test_reminder_listing() {
        let (mut handlers, _dir) = setup();
        assert_eq!(handlers.reminder("show reminders"), "No reminders set.");

        handlers.reminder("remind me to stretch at 10:30");
        handlers.reminder("remind me to drink water");

        assert_eq!(
            handlers.reminder("list my reminders"),
            "Active reminders:\n- stretch (Due: 10:30)\n- drink water"
        );
    }

    #[test]
    fn test_reminder_without_text() {
        let (mut handlers, _dir) = setup();
        assert_eq!(handlers.reminder("remind me"), "Please provide the reminder text.");
    }

    #[test]
    fn test_calculator_strips_trigger() {
        let (mut handlers, _dir) = setup();

        assert_eq!(handlers.calculator("what is 15 + 27"), "15 + 27 = 42");
        assert_eq!(handlers.calculator("Calculate 7 / 2"), "7 / 2 = 3.5");
        assert_eq!(handlers.calculator("2+2"), "2+2 = 4");
        assert_eq!(
            handlers.calculator("what is rust"),
            "Please provide a valid mathematical expression."
        );
    }

    #[test]
    fn test_weather_uses_named_city() {
        let (mut handlers, asked, _dir) = setup_with(None);

        let reply = handlers.weather("what's the weather in San Francisco?");

        assert_eq!(
            reply,
            "Weather in San Francisco: Clear Sky, 21°C, Humidity: 40%, Wind: 2.5 m/s"
        );
        assert_eq!(asked.borrow().as_slice(), ["San Francisco".to_string()]);
    }

    #[test]
    fn test_weather_strips_trailing_time_words() {
        let (handlers, _dir) = setup();
        assert_eq!(
            handlers.extract_city("weather forecast for Berlin today"),
            Some("Berlin".to_string())
        );
        assert_eq!(handlers.extract_city("weather"), None);
    }

    #[test]
    fn test_weather_takes_city_after_last_preposition() {
        let (mut handlers, asked, _dir) = setup_with(None);

        assert_eq!(
            handlers.extract_city("weather for me in Paris"),
            Some("Paris".to_string())
        );

        handlers.weather("what's the weather like for us in New York tonight?");
        assert_eq!(asked.borrow().as_slice(), ["New York".to_string()]);
    }

    #[test]
    fn test_routed_min_int_floor_ops_reply() {
        let (handlers, _dir) = setup();
        let mut router = Router::new(Classifier::default(), handlers);

        let reply = router.route("(-9223372036854775807 - 1) // -1");
        assert!(reply.starts_with("(-9223372036854775807 - 1) // -1 = "));

        let reply = router.route("(-9223372036854775807 - 1) % -1");
        assert_eq!(reply, "(-9223372036854775807 - 1) % -1 = 0");

        assert_eq!(router.session().count(), 2);
        assert!(router.session().recent(2).iter().all(|r| r.intent == Intent::Calculator));
    }

    #[test]
    fn test_routed_deep_nesting_gets_a_reply() {
        let (handlers, _dir) = setup();
        let mut router = Router::new(Classifier::default(), handlers);

        let deep = format!("{}1{}", "(".repeat(200_000), ")".repeat(200_000));
        let reply = router.route(&deep);

        assert_eq!(
            reply,
            "Sorry, I couldn't calculate that expression. Please check your input."
        );
    }

    #[test]
    fn test_weather_defaults_to_configured_city() {
        let (mut handlers, asked, _dir) = setup_with(None);
        handlers.store_mut().set_default_city("Oslo").unwrap();

        let reply = handlers.weather("weather");

        assert!(reply.starts_with("Getting weather for Oslo...\nWeather in Oslo:"));
        assert_eq!(asked.borrow().as_slice(), ["Oslo".to_string()]);
    }

    #[test]
    fn test_weather_failures_become_messages() {
        let (mut handlers, _asked, _dir) = setup_with(Some(Failure::MissingKey));
        assert!(handlers.weather("weather in Rome").contains("API key not configured"));

        let (mut handlers, _asked, _dir) = setup_with(Some(Failure::NotFound));
        assert_eq!(
            handlers.weather("weather in Atlantis"),
            "Sorry, I couldn't get weather data for Atlantis. Please check the city name and try again."
        );

        let (mut handlers, _asked, _dir) = setup_with(Some(Failure::Other));
        assert_eq!(
            handlers.weather("weather in Rome"),
            "Sorry, there was an error getting weather information."
        );
    }

    #[test]
    fn test_web_search_placeholder() {
        let (mut handlers, _dir) = setup();

        assert_eq!(
            handlers.web_search("search for rust traits"),
            "I would search for 'rust traits' on the web. (Web search integration coming soon!)"
        );
    }

    #[test]
    fn test_file_operation_and_unknown() {
        let (mut handlers, _dir) = setup();

        assert!(handlers.file_operation("open file a.txt").contains("not yet implemented"));
        assert_eq!(
            handlers.unknown("sing me a song"),
            "I'm not sure how to help with 'sing me a song'. Try asking about weather, notes, calculations, or reminders!"
        );
    }
}
