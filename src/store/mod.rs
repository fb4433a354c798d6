/// Storage module for task-agent
///
/// Plain JSON files in a data directory. Only the action handlers touch it;
/// the classifier and router never do.

pub mod data_store;
pub mod models;

pub use data_store::DataStore;
pub use models::*;
