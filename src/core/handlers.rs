/// Handler table
///
/// One method per intent, so a missing handler is a compile error instead of
/// a failed lookup at dispatch time.
///
/// Handlers must be total: they absorb their own failures and always hand
/// back something the user can read. The router returns whatever they give it.
pub trait Handlers {
    fn weather(&mut self, input: &str) -> String;

    fn add_note(&mut self, input: &str) -> String;

    /// Takes no input; listing notes doesn't depend on what was typed
    fn show_notes(&mut self) -> String;

    fn calculator(&mut self, input: &str) -> String;

    fn reminder(&mut self, input: &str) -> String;

    fn web_search(&mut self, input: &str) -> String;

    fn file_operation(&mut self, input: &str) -> String;

    /// Fallback for input nothing else claimed
    fn unknown(&mut self, input: &str) -> String;
}
