/// Intent classifier
///
/// Maps one line of free text to the best matching intent and a confidence
/// score. Pure and total: every string, including the empty one, classifies.

use crate::intent::{Intent, IntentCatalog};
use serde::Serialize;
use tracing::debug;

/// Score each matching keyword adds to its intent
pub const KEYWORD_INCREMENT: f64 = 0.1;

/// Confidence assigned when only digits or operators point at arithmetic
pub const NUMERIC_FALLBACK_CONFIDENCE: f64 = 0.5;

const ARITHMETIC_CHARS: &[char] = &['+', '-', '*', '/', '(', ')', '%'];

/// Outcome of a single classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub intent: Intent,
    pub confidence: f64,
}

impl ClassificationResult {
    pub fn unknown() -> Self {
        Self {
            intent: Intent::Unknown,
            confidence: 0.0,
        }
    }
}

/// Scores input against an intent catalog
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    catalog: IntentCatalog,
}

impl Classifier {
    pub fn new(catalog: IntentCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &IntentCatalog {
        &self.catalog
    }

    /// Classify raw input
    ///
    /// Phrases are checked first and the first hit (catalog order) wins at
    /// the intent's ceiling. Otherwise keywords are counted per intent and the
    /// strictly highest capped score wins, so ties go to the earlier entry.
    /// If nothing matched but the text looks like arithmetic, it's a
    /// calculator request.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        let normalized = text.trim().to_lowercase();

        if normalized.is_empty() {
            return ClassificationResult::unknown();
        }

        if let Some(result) = self.match_phrase(&normalized) {
            return result;
        }

        let mut best = ClassificationResult::unknown();

        for def in self.catalog.all_intents() {
            let mut score = 0.0;
            let mut matched = 0;

            for keyword in &def.keywords {
                if normalized.contains(keyword.as_str()) {
                    score += KEYWORD_INCREMENT;
                    matched += 1;
                }
            }

            if matched == 0 {
                continue;
            }

            let score = score.min(def.max_confidence);
            debug!(intent = %def.intent, matched, score, "keyword candidate");

            if score > best.confidence {
                best = ClassificationResult {
                    intent: def.intent,
                    confidence: score,
                };
            }
        }

        if best.intent == Intent::Unknown && looks_numeric(&normalized) {
            debug!("no keyword match, falling back to calculator");
            return ClassificationResult {
                intent: Intent::Calculator,
                confidence: NUMERIC_FALLBACK_CONFIDENCE,
            };
        }

        best
    }

    fn match_phrase(&self, normalized: &str) -> Option<ClassificationResult> {
        for def in self.catalog.all_intents() {
            if let Some(phrase) = def.phrases.iter().find(|p| normalized.contains(p.as_str())) {
                debug!(intent = %def.intent, phrase = %phrase, "phrase match");
                return Some(ClassificationResult {
                    intent: def.intent,
                    confidence: def.max_confidence,
                });
            }
        }

        None
    }
}

fn looks_numeric(text: &str) -> bool {
    text.chars()
        .any(|c| c.is_ascii_digit() || ARITHMETIC_CHARS.contains(&c))
}
