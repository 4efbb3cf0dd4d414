//! Deterministic keyword pattern matching
//!
//! The local fallback classifier: substring rules checked in fixed intent
//! priority order. Total over any input; no match means Unknown.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::Intent;

/// Substring-based intent matcher
pub struct PatternMatcher {
    rules: HashMap<Intent, Vec<String>>,
}

impl PatternMatcher {
    /// Build a matcher over the given per-intent pattern lists
    ///
    /// Overlapping patterns across intents are a caller configuration
    /// concern, resolved purely by [`Intent::PRIORITY`] order.
    pub fn new(rules: HashMap<Intent, Vec<String>>) -> Self {
        debug!(intent_count = rules.len(), "PatternMatcher::new: called");
        Self { rules }
    }

    /// Classify input by substring match, first priority hit wins
    ///
    /// Input is case-folded and trimmed before matching; patterns match
    /// anywhere in the text, not on word boundaries.
    pub fn matches(&self, input: &str) -> Intent {
        let normalized = input.trim().to_lowercase();

        for intent in &Intent::PRIORITY {
            if let Some(patterns) = self.rules.get(intent) {
                if patterns.iter().any(|pattern| normalized.contains(pattern.as_str())) {
                    debug!(%intent, "matches: pattern hit");
                    return *intent;
                }
            }
        }

        debug!("matches: no pattern hit, returning UNKNOWN");
        Intent::Unknown
    }
}
