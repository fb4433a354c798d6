/// Interactive configuration
///
/// Menu for setting the OpenWeatherMap key and default city, plus the
/// configuration summary printed by `task-agent config`.

use crate::error::Result;
use crate::store::DataStore;
use std::io::{BufRead, Write};

/// Print a summary of the current configuration and data
pub fn write_config_summary<W: Write>(store: &DataStore, out: &mut W) -> Result<()> {
    let config = store.config();

    writeln!(out, "Current Configuration")?;
    writeln!(out, "{}", "=".repeat(50))?;
    writeln!(out, "Data directory: {}", store.data_dir().display())?;
    writeln!(
        out,
        "Weather API key: {}",
        if config.has_weather_key() { "Set" } else { "Not set" }
    )?;
    writeln!(out, "Default city: {}", config.default_city)?;
    writeln!(out, "Notes saved: {}", store.notes().len())?;
    writeln!(out, "Reminders active: {}", store.active_reminders().len())?;
    writeln!(out)?;

    Ok(())
}

/// Run the setup menu until the user picks "Exit" or input runs out
pub fn run_setup<R: BufRead, W: Write>(store: &mut DataStore, input: R, mut out: W) -> Result<()> {
    let mut lines = input.lines();

    writeln!(out, "Task Agent - Configuration Setup")?;
    writeln!(out, "{}\n", "=".repeat(50))?;

    loop {
        writeln!(out, "Choose an option:")?;
        writeln!(out, "1. Setup Weather API")?;
        writeln!(out, "2. Setup Default City")?;
        writeln!(out, "3. Show Current Configuration")?;
        writeln!(out, "4. Exit\n")?;

        let Some(choice) = prompt(&mut lines, &mut out, "Enter your choice (1-4): ")? else {
            break;
        };

        match choice.as_str() {
            "1" => {
                writeln!(out, "\nTo get weather information you need an OpenWeatherMap API key.")?;
                writeln!(out, "1. Go to https://openweathermap.org/api")?;
                writeln!(out, "2. Sign up for a free account")?;
                writeln!(out, "3. Get your API key from the dashboard\n")?;

                let key = prompt(
                    &mut lines,
                    &mut out,
                    "Enter your OpenWeatherMap API key (or press Enter to skip): ",
                )?
                .unwrap_or_default();

                if key.is_empty() {
                    writeln!(out, "Weather API key not set. Weather features will be limited.\n")?;
                } else {
                    store.set_weather_api_key(&key)?;
                    writeln!(out, "Weather API key saved successfully!\n")?;
                }
            }
            "2" => {
                let current = store.config().default_city.clone();
                writeln!(out, "\nCurrent default city: {}", current)?;

                let city = prompt(
                    &mut lines,
                    &mut out,
                    "Enter your default city (or press Enter to keep current): ",
                )?
                .unwrap_or_default();

                if city.is_empty() {
                    writeln!(out, "Keeping current default city: {}\n", current)?;
                } else {
                    store.set_default_city(&city)?;
                    writeln!(out, "Default city set to: {}\n", city)?;
                }
            }
            "3" => {
                writeln!(out)?;
                write_config_summary(store, &mut out)?;
            }
            "4" => break,
            _ => writeln!(out, "Invalid choice. Please enter 1-4.\n")?,
        }
    }

    writeln!(out, "Setup complete! Run 'task-agent' to start the agent.")?;
    Ok(())
}

// Prompt and read one trimmed line. None on end of input.
fn prompt<B: BufRead, W: Write>(
    lines: &mut std::io::Lines<B>,
    out: &mut W,
    message: &str,
) -> Result<Option<String>> {
    write!(out, "{}", message)?;
    out.flush()?;

    match lines.next() {
        Some(line) => Ok(Some(line?.trim().to_string())),
        None => Ok(None),
    }
}
