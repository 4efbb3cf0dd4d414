//! Stage resolution from user text and task context

use regex::Regex;
use tracing::debug;

use crate::domain::TaskContext;

/// Recognized phrasing for an explicit stage reference in user text,
/// e.g. "at stage breakfast" or "stage two"
const STAGE_PATTERN: &str = r"(?:at\s+)?stage\s+(\w+)";

/// Result of stage resolution for one classification call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedStage {
    /// Resolved stage name, lowercased when extracted from text
    pub name: Option<String>,

    /// Resolved stage is the first entry of the context's stage sequence
    pub is_first: bool,

    /// Resolved stage is the last entry of the context's stage sequence
    pub is_last: bool,
}

/// Extracts the current stage from user text or task context
///
/// A stage reference in the utterance always beats the context's
/// `current_stage` marker: the text is more current than a potentially
/// stale context snapshot.
pub struct StageResolver {
    pattern: Regex,
}

impl StageResolver {
    pub fn new() -> Self {
        // Pattern is a compile-time constant, so this cannot fail
        let pattern = Regex::new(STAGE_PATTERN).expect("stage pattern is valid");
        Self { pattern }
    }

    /// Resolve the current stage name and boundary flags
    ///
    /// Never an error: no context and no extractable stage yields
    /// `(None, false, false)` and classification proceeds without boundary
    /// awareness. An empty stage sequence yields both flags false.
    pub fn resolve(&self, user_input: &str, context: Option<&TaskContext>) -> ResolvedStage {
        debug!("StageResolver::resolve: called");
        let name = self
            .extract(user_input)
            .or_else(|| context.and_then(|ctx| ctx.current_stage.clone()));

        let (is_first, is_last) = match (&name, context) {
            (Some(name), Some(ctx)) if !ctx.stages.is_empty() => {
                // Case-insensitive: names extracted from text are lowercased
                let is_first = ctx
                    .stages
                    .first()
                    .is_some_and(|s| s.stage.eq_ignore_ascii_case(name));
                let is_last = ctx
                    .stages
                    .last()
                    .is_some_and(|s| s.stage.eq_ignore_ascii_case(name));
                (is_first, is_last)
            }
            _ => (false, false),
        };

        debug!(?name, is_first, is_last, "StageResolver::resolve: resolved");
        ResolvedStage { name, is_first, is_last }
    }

    /// Extract an explicit stage reference from user text
    fn extract(&self, user_input: &str) -> Option<String> {
        self.pattern
            .captures(&user_input.to_lowercase())
            .map(|captures| captures[1].to_string())
    }
}

impl Default for StageResolver {
    fn default() -> Self {
        Self::new()
    }
}
