// task-agent - type what you want, the agent figures out which task you meant
//
// This is the main entry point. Parses CLI args, sets up logging, and hands
// off to the shell, the setup menu, or a one-shot route.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use task_agent_lib::{
    actions::{ActionHandlers, OpenWeatherClient},
    shell::{run_setup, write_config_summary, Shell},
    Classifier, DataStore, IntentCatalog, Router,
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "task-agent", version, about = "A small conversational task agent")]
struct Cli {
    /// Where notes, reminders and config are kept (default: ~/.task-agent)
    #[arg(long, env = "TASK_AGENT_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// OpenWeatherMap key for this run, instead of the stored one
    #[arg(long, env = "OPENWEATHER_API_KEY", global = true, hide_env_values = true)]
    weather_api_key: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the interactive agent (default)
    Chat,
    /// Route a single line and print the reply
    Ask {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Show which intent a line would be routed to
    Classify {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Configure the weather API key and default city
    Setup,
    /// Show the current configuration
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => DataStore::default_dir()?,
    };

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => {
            let mut shell = Shell::new(build_router(data_dir, cli.weather_api_key)?);
            let stdin = io::stdin();
            shell.run(stdin.lock(), io::stdout())?;
        }
        Command::Ask { text } => {
            let mut router = build_router(data_dir, cli.weather_api_key)?;
            println!("{}", router.route(&text.join(" ")));
        }
        Command::Classify { text } => {
            let input = text.join(" ");
            let result = Classifier::new(IntentCatalog::builtin()).classify(&input);
            println!("{} ({:.0}%)", result.intent, result.confidence * 100.0);
        }
        Command::Setup => {
            let mut store = open_store(&data_dir)?;
            let stdin = io::stdin();
            run_setup(&mut store, stdin.lock(), io::stdout())?;
        }
        Command::Config => {
            let store = open_store(&data_dir)?;
            write_config_summary(&store, &mut io::stdout())?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let env_directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    // Logs go to stderr so they never interleave with the conversation
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, env_directives.as_deref()))
        .with_writer(io::stderr)
        .init();
}

/// `RUST_LOG` (or `warn`), raised to at least `debug` by `--verbose`
fn log_filter(verbose: bool, env_directives: Option<&str>) -> EnvFilter {
    let filter = env_directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    let below_debug = filter
        .max_level_hint()
        .map_or(true, |level| level < LevelFilter::DEBUG);

    if verbose && below_debug {
        filter.add_directive(LevelFilter::DEBUG.into())
    } else {
        filter
    }
}

fn open_store(data_dir: &Path) -> anyhow::Result<DataStore> {
    DataStore::open(data_dir)
        .with_context(|| format!("could not open data directory {}", data_dir.display()))
}

fn build_router(
    data_dir: PathBuf,
    key_override: Option<String>,
) -> anyhow::Result<Router<ActionHandlers>> {
    let store = open_store(&data_dir)?;

    let api_key = key_override
        .filter(|key| !key.trim().is_empty())
        .unwrap_or_else(|| store.config().weather_api_key.clone());
    let weather = OpenWeatherClient::new(api_key)?;

    let handlers = ActionHandlers::new(store, Box::new(weather))?;
    let classifier = Classifier::new(IntentCatalog::builtin());

    Ok(Router::new(classifier, handlers))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_defaults_to_warn() {
        assert_eq!(log_filter(false, None).max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_log_filter_honours_rust_log() {
        assert_eq!(log_filter(false, Some("info")).max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_verbose_raises_level_over_rust_log() {
        assert_eq!(log_filter(true, None).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(log_filter(true, Some("warn")).max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_verbose_never_lowers_level() {
        assert_eq!(log_filter(true, Some("trace")).max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn test_bad_rust_log_falls_back_to_warn() {
        assert_eq!(log_filter(false, Some("agent=loud")).max_level_hint(), Some(LevelFilter::WARN));
    }
}
