/// JSON-backed data store
///
/// Keeps notes, reminders and config in memory and writes each collection
/// back to its own file after every change.

use crate::error::{AgentError, Result};
use crate::store::models::{Config, Note, Reminder};
use chrono::Local;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

const NOTES_FILE: &str = "notes.json";
const REMINDERS_FILE: &str = "reminders.json";
const CONFIG_FILE: &str = "config.json";

/// Folder under the home directory used when no data dir is given
const DEFAULT_DIR_NAME: &str = ".task-agent";

/// Data store for one data directory
#[derive(Debug)]
pub struct DataStore {
    data_dir: PathBuf,
    notes: Vec<Note>,
    reminders: Vec<Reminder>,
    config: Config,
}

impl DataStore {
    /// Open (or create) a data directory and load everything in it
    ///
    /// Files that are missing start out empty. Files that can't be read or
    /// parsed are logged and treated as empty too, so a corrupt file never
    /// stops the agent from starting.
    ///
    /// # Returns
    /// * `Err(AgentError::Io)` - If the directory can't be created
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)?;

        let notes = load_or_default(&data_dir.join(NOTES_FILE));
        let reminders = load_or_default(&data_dir.join(REMINDERS_FILE));
        let config = load_or_default(&data_dir.join(CONFIG_FILE));

        Ok(Self {
            data_dir,
            notes,
            reminders,
            config,
        })
    }

    /// `~/.task-agent`
    pub fn default_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| AgentError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(DEFAULT_DIR_NAME))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Add a note and persist the notes file
    pub fn add_note(&mut self, content: &str) -> Result<Note> {
        let note = Note {
            id: self.notes.len() as u64 + 1,
            content: content.to_string(),
            created_at: Local::now().naive_local(),
        };

        // Only keep it in memory once it's on disk
        self.notes.push(note.clone());
        if let Err(e) = self.save_notes() {
            self.notes.pop();
            return Err(e);
        }

        Ok(note)
    }

    /// Last `n` notes, oldest first
    pub fn recent_notes(&self, n: usize) -> &[Note] {
        let start = self.notes.len().saturating_sub(n);
        &self.notes[start..]
    }

    /// Add a reminder and persist the reminders file
    pub fn add_reminder(&mut self, text: &str, time: Option<String>) -> Result<Reminder> {
        let reminder = Reminder {
            id: self.reminders.len() as u64 + 1,
            text: text.to_string(),
            created_at: Local::now().naive_local(),
            time,
            completed: false,
        };

        self.reminders.push(reminder.clone());
        if let Err(e) = self.save_reminders() {
            self.reminders.pop();
            return Err(e);
        }

        Ok(reminder)
    }

    pub fn active_reminders(&self) -> Vec<&Reminder> {
        self.reminders.iter().filter(|r| !r.completed).collect()
    }

    pub fn set_weather_api_key(&mut self, key: &str) -> Result<()> {
        self.update_config(|config| config.weather_api_key = key.trim().to_string())
    }

    pub fn set_default_city(&mut self, city: &str) -> Result<()> {
        self.update_config(|config| config.default_city = city.trim().to_string())
    }

    // Apply a change, rolling it back if the file can't be written
    fn update_config<F: FnOnce(&mut Config)>(&mut self, change: F) -> Result<()> {
        let previous = self.config.clone();
        change(&mut self.config);

        if let Err(e) = self.save_config() {
            self.config = previous;
            return Err(e);
        }

        Ok(())
    }

    pub fn save_notes(&self) -> Result<()> {
        save(&self.data_dir.join(NOTES_FILE), &self.notes)
    }

    pub fn save_reminders(&self) -> Result<()> {
        save(&self.data_dir.join(REMINDERS_FILE), &self.reminders)
    }

    pub fn save_config(&self) -> Result<()> {
        save(&self.data_dir.join(CONFIG_FILE), &self.config)
    }
}

fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    if !path.exists() {
        return T::default();
    }

    match load(path) {
        Ok(value) => value,
        Err(e) => {
            error!("Error loading {}: {}", path.display(), e);
            T::default()
        }
    }
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn save<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    debug!(path = %path.display(), "saved");
    Ok(())
}
