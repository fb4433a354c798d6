/// task-agent library
///
/// Classifies a line of free text into one of a handful of tasks and routes
/// it to the matching handler.

pub mod actions;
pub mod core;
pub mod error;
pub mod intent;
pub mod shell;
pub mod store;

// Re-exports for convenience
pub use crate::core::{Handlers, Router};
pub use error::{AgentError, Result};
pub use intent::{Classifier, Intent, IntentCatalog};
pub use store::DataStore;
