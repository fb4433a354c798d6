/// Core routing modules
///
/// Turns a classified line of input into a handler call and keeps the
/// conversation history.

pub mod handlers;
pub mod router;
pub mod session;

pub use handlers::Handlers;
pub use router::{Router, CONFIDENCE_THRESHOLD};
pub use session::{InteractionRecord, Session};
