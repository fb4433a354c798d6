/// Intent module
///
/// Decides which task a line of user input is asking for.

pub mod catalog;
pub mod classifier;

pub use catalog::{Intent, IntentCatalog, IntentDefinition};
pub use classifier::{ClassificationResult, Classifier};
