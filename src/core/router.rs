// Routes a line of input to the right handler
//
// classify -> confidence gate -> handler -> session log. Never fails; every
// path ends in a reply string.

use crate::core::{Handlers, InteractionRecord, Session};
use crate::intent::{ClassificationResult, Classifier, Intent};
use chrono::Local;
use tracing::info;

/// Below this, a real match is too weak to act on and we ask instead
pub const CONFIDENCE_THRESHOLD: f64 = 0.3;

pub fn clarification_message(input: &str) -> String {
    format!(
        "I'm not quite sure what you mean by '{}'. Could you rephrase that or be more specific?",
        input
    )
}

pub struct Router<H: Handlers> {
    classifier: Classifier,
    handlers: H,
    session: Session,
}

impl<H: Handlers> Router<H> {
    pub fn new(classifier: Classifier, handlers: H) -> Self {
        Self {
            classifier,
            handlers,
            session: Session::new(),
        }
    }

    // Main entry point. One call, one session record.
    pub fn route(&mut self, input: &str) -> String {
        let classification = self.classifier.classify(input);
        let ClassificationResult { intent, confidence } = classification;

        let response = if confidence < CONFIDENCE_THRESHOLD && intent != Intent::Unknown {
            info!(%intent, confidence, "confidence too low, asking for clarification");
            clarification_message(input)
        } else {
            info!(%intent, confidence, "routing");
            self.dispatch(intent, input)
        };

        self.session.append(InteractionRecord {
            input: input.to_string(),
            intent,
            confidence,
            response: response.clone(),
            recorded_at: Local::now(),
        });

        response
    }

    fn dispatch(&mut self, intent: Intent, input: &str) -> String {
        match intent {
            Intent::Weather => self.handlers.weather(input),
            Intent::AddNote => self.handlers.add_note(input),
            Intent::ShowNotes => self.handlers.show_notes(),
            Intent::Calculator => self.handlers.calculator(input),
            Intent::Reminder => self.handlers.reminder(input),
            Intent::WebSearch => self.handlers.web_search(input),
            Intent::FileOperation => self.handlers.file_operation(input),
            Intent::Unknown => self.handlers.unknown(input),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn handlers(&self) -> &H {
        &self.handlers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{IntentCatalog, IntentDefinition};

    /// Records every call instead of doing anything
    #[derive(Default)]
    struct StubHandlers {
        calls: Vec<(Intent, Option<String>)>,
    }

    impl StubHandlers {
        fn hit(&mut self, intent: Intent, input: Option<&str>) -> String {
            self.calls.push((intent, input.map(str::to_string)));
            format!("{} handled", intent)
        }
    }

    impl Handlers for StubHandlers {
        fn weather(&mut self, input: &str) -> String {
            self.hit(Intent::Weather, Some(input))
        }
        fn add_note(&mut self, input: &str) -> String {
            self.hit(Intent::AddNote, Some(input))
        }
        fn show_notes(&mut self) -> String {
            self.hit(Intent::ShowNotes, None)
        }
        fn calculator(&mut self, input: &str) -> String {
            self.hit(Intent::Calculator, Some(input))
        }
        fn reminder(&mut self, input: &str) -> String {
            self.hit(Intent::Reminder, Some(input))
        }
        fn web_search(&mut self, input: &str) -> String {
            self.hit(Intent::WebSearch, Some(input))
        }
        fn file_operation(&mut self, input: &str) -> String {
            self.hit(Intent::FileOperation, Some(input))
        }
        fn unknown(&mut self, input: &str) -> String {
            self.hit(Intent::Unknown, Some(input))
        }
    }

    fn router() -> Router<StubHandlers> {
        Router::new(Classifier::default(), StubHandlers::default())
    }

    #[test]
    fn test_show_notes_called_without_argument() {
        let mut router = router();

        let reply = router.route("show notes");

        assert_eq!(reply, "show_notes handled");
        assert_eq!(router.handlers().calls, vec![(Intent::ShowNotes, None)]);

        let record = router.session().last().unwrap();
        assert_eq!(record.intent, Intent::ShowNotes);
        assert_eq!(record.confidence, 0.8);
    }

    #[test]
    fn test_handler_gets_raw_input() {
        let mut router = router();

        router.route("  What IS 15 + 27 ");

        assert_eq!(
            router.handlers().calls,
            vec![(Intent::Calculator, Some("  What IS 15 + 27 ".to_string()))]
        );
    }

    #[test]
    fn test_low_confidence_skips_handler() {
        let mut router = router();

        // One weather keyword: 0.1, below the gate
        let reply = router.route("temperature");

        assert_eq!(reply, clarification_message("temperature"));
        assert!(router.handlers().calls.is_empty());

        let record = router.session().last().unwrap();
        assert_eq!(record.intent, Intent::Weather);
        assert!(record.confidence > 0.0 && record.confidence < CONFIDENCE_THRESHOLD);
        assert_eq!(record.response, reply);
    }

    #[test]
    fn test_gate_is_strict_less_than() {
        // Phrase hit lands exactly on the threshold
        let catalog = IntentCatalog::new(vec![IntentDefinition::new(
            Intent::WebSearch,
            &[],
            &["find me"],
            CONFIDENCE_THRESHOLD,
        )])
        .unwrap();
        let mut router = Router::new(Classifier::new(catalog), StubHandlers::default());

        router.route("find me a recipe");

        assert_eq!(router.handlers().calls.len(), 1);
        assert_eq!(router.handlers().calls[0].0, Intent::WebSearch);
    }

    #[test]
    fn test_empty_input_goes_to_unknown_handler() {
        let mut router = router();

        let reply = router.route("");

        assert_eq!(reply, "unknown handled");
        assert_eq!(router.session().count(), 1);
        let record = router.session().last().unwrap();
        assert_eq!(record.intent, Intent::Unknown);
        assert_eq!(record.confidence, 0.0);
    }

    #[test]
    fn test_unknown_is_never_gated() {
        let mut router = router();

        let reply = router.route("hello there");

        assert_eq!(reply, "unknown handled");
        assert_eq!(router.handlers().calls.len(), 1);
    }

    #[test]
    fn test_reminder_passes_gate() {
        let mut router = router();

        router.route("remind me to call mom");

        assert_eq!(
            router.handlers().calls,
            vec![(Intent::Reminder, Some("remind me to call mom".to_string()))]
        );
    }

    #[test]
    fn test_repeated_input_logs_every_time() {
        let mut router = router();

        for expected in 1..=3 {
            router.route("2+2");
            assert_eq!(router.session().count(), expected);
        }

        let confidences: Vec<f64> = router.session().recent(3).iter().map(|r| r.confidence).collect();
        assert_eq!(confidences, vec![0.5, 0.5, 0.5]);
        assert!(router.session().recent(3).iter().all(|r| r.intent == Intent::Calculator));
    }
}
