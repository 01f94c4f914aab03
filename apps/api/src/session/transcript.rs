//! Transcript accumulation for one voice session.

use serde::{Deserialize, Serialize};

/// Speaker of a finalized utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    System,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::System => "system",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: Role,
    pub content: String,
}

impl TranscriptEntry {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Append-only sequence of finalized turns, in arrival order.
///
/// Entries are never deduplicated, reordered or edited once pushed.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    /// Most recent line, shown as "now speaking".
    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_preserves_arrival_order() {
        let mut transcript = Transcript::new();
        transcript.push(TranscriptEntry::new(Role::Assistant, "Hi, ready to begin?"));
        transcript.push(TranscriptEntry::new(Role::User, "Yes"));
        transcript.push(TranscriptEntry::new(Role::User, "Yes"));

        let roles: Vec<_> = transcript.entries().iter().map(|e| e.role).collect();
        assert_eq!(roles, vec![Role::Assistant, Role::User, Role::User]);
        assert_eq!(transcript.len(), 3, "duplicates are kept");
    }

    #[test]
    fn test_last_tracks_latest_entry() {
        let mut transcript = Transcript::new();
        assert!(transcript.last().is_none());
        transcript.push(TranscriptEntry::new(Role::User, "first"));
        transcript.push(TranscriptEntry::new(Role::Assistant, "second"));
        assert_eq!(transcript.last().map(|e| e.content.as_str()), Some("second"));
    }

    #[test]
    fn test_role_wire_format_is_lowercase() {
        let json = serde_json::to_string(&TranscriptEntry::new(Role::Assistant, "ok")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"ok"}"#);
    }
}
