/// Shell module
///
/// The interactive surfaces: the chat read loop and the setup menu.

pub mod repl;
pub mod setup;

pub use repl::{parse_line, Shell, ShellInput};
pub use setup::{run_setup, write_config_summary};
