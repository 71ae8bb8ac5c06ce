//! Append-only conversation log.

use scrub_core::types::Turn;

/// Ordered record of completed exchanges.
///
/// Insertion order is chronological order. Individual turns are never
/// mutated or removed; the only shrinking operation is a full `clear`.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    turns: Vec<Turn>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one completed turn. O(1), always succeeds.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Empty the log. Used only by a full session reset.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Read-only ordered view of all turns.
    pub fn all(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(you: &str) -> Turn {
        Turn {
            you: you.to_string(),
            bot: format!("answer to {you}"),
            summary: None,
        }
    }

    #[test]
    fn test_new_log_is_empty() {
        let log = ConversationLog::new();
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
        assert!(log.all().is_empty());
    }

    #[test]
    fn test_append_preserves_order() {
        let mut log = ConversationLog::new();
        log.append(turn("first"));
        log.append(turn("second"));
        log.append(turn("third"));

        assert_eq!(log.len(), 3);
        let questions: Vec<_> = log.all().iter().map(|t| t.you.as_str()).collect();
        assert_eq!(questions, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_clear_empties_log() {
        let mut log = ConversationLog::new();
        log.append(turn("one"));
        log.append(turn("two"));
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_turns_keep_summary() {
        let mut log = ConversationLog::new();
        log.append(Turn {
            you: "q".to_string(),
            bot: "a".to_string(),
            summary: Some("a short talk".to_string()),
        });
        assert_eq!(log.all()[0].summary.as_deref(), Some("a short talk"));
    }
}
