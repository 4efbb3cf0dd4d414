//! Intent and response status codes

use serde::{Deserialize, Serialize};
use tracing::debug;

/// One of the seven canonical classification outcomes
///
/// `Unknown` is the universal fallback: every classification resolves to
/// exactly one member of this set, never to an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Intent {
    Next,
    Previous,
    Exit,
    Help,
    Care,
    Hello,
    Unknown,
}

impl Intent {
    /// Fixed precedence for pattern matching: first intent with a matching
    /// pattern wins. Unknown is the fall-through, never matched directly.
    pub const PRIORITY: [Intent; 6] = [
        Intent::Next,
        Intent::Previous,
        Intent::Exit,
        Intent::Help,
        Intent::Care,
        Intent::Hello,
    ];

    /// All seven intents, in prompt-enumeration order
    pub const ALL: [Intent; 7] = [
        Intent::Next,
        Intent::Previous,
        Intent::Exit,
        Intent::Help,
        Intent::Care,
        Intent::Hello,
        Intent::Unknown,
    ];

    /// Canonical uppercase token as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Next => "NEXT",
            Intent::Previous => "PREVIOUS",
            Intent::Exit => "EXIT",
            Intent::Help => "HELP",
            Intent::Care => "CARE",
            Intent::Hello => "HELLO",
            Intent::Unknown => "UNKNOWN",
        }
    }

    /// One-line definition used when enumerating intents in the LLM prompt
    pub fn definition(&self) -> &'static str {
        match self {
            Intent::Next => "the user wants to advance to the next stage",
            Intent::Previous => "the user wants to return to the previous stage",
            Intent::Exit => "the user wants to leave the task flow",
            Intent::Help => "the user is asking for assistance",
            Intent::Care => "the user is expressing distress and needs caregiver support",
            Intent::Hello => "the user is greeting or making small talk",
            Intent::Unknown => "none of the other intents apply",
        }
    }

    /// Parse a canonical token, case-insensitively
    ///
    /// Returns None for anything that is not one of the seven tokens.
    pub fn from_token(token: &str) -> Option<Intent> {
        let token = token.trim();
        Intent::ALL
            .into_iter()
            .find(|intent| intent.as_str().eq_ignore_ascii_case(token))
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response status: the seven intents plus the ERROR code reserved for
/// malformed caller input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Next,
    Previous,
    Exit,
    Help,
    Care,
    Hello,
    Unknown,
    Error,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Next => "NEXT",
            Status::Previous => "PREVIOUS",
            Status::Exit => "EXIT",
            Status::Help => "HELP",
            Status::Care => "CARE",
            Status::Hello => "HELLO",
            Status::Unknown => "UNKNOWN",
            Status::Error => "ERROR",
        }
    }
}

impl From<Intent> for Status {
    fn from(intent: Intent) -> Self {
        debug!(%intent, "Status::from: called");
        match intent {
            Intent::Next => Status::Next,
            Intent::Previous => Status::Previous,
            Intent::Exit => Status::Exit,
            Intent::Help => Status::Help,
            Intent::Care => Status::Care,
            Intent::Hello => Status::Hello,
            Intent::Unknown => Status::Unknown,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_token_case_insensitive() {
        assert_eq!(Intent::from_token("NEXT"), Some(Intent::Next));
        assert_eq!(Intent::from_token("next"), Some(Intent::Next));
        assert_eq!(Intent::from_token("Care"), Some(Intent::Care));
        assert_eq!(Intent::from_token("UNKNOWN"), Some(Intent::Unknown));
    }

    #[test]
    fn test_from_token_rejects_non_tokens() {
        assert_eq!(Intent::from_token("FORWARD"), None);
        assert_eq!(Intent::from_token(""), None);
        assert_eq!(Intent::from_token("NEXTPREVIOUS"), None);
    }

    #[test]
    fn test_priority_excludes_unknown() {
        assert_eq!(Intent::PRIORITY.len(), 6);
        assert!(!Intent::PRIORITY.contains(&Intent::Unknown));
        assert_eq!(Intent::PRIORITY[0], Intent::Next);
        assert_eq!(Intent::PRIORITY[5], Intent::Hello);
    }

    #[test]
    fn test_status_serializes_uppercase() {
        let json = serde_json::to_string(&Status::Next).unwrap();
        assert_eq!(json, "\"NEXT\"");
        let json = serde_json::to_string(&Status::Error).unwrap();
        assert_eq!(json, "\"ERROR\"");
    }
}
