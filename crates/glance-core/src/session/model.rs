//! Conversation session model.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::mode::Mode;
use super::turn::{Role, Turn};

/// The ordered turn history belonging to one overlay's lifetime.
///
/// The first turn is always the system turn, inserted once and never
/// mutated. Afterwards the history is append-only: there is no API to
/// reorder, edit or remove a durable turn. Scratch turns used to shape a
/// single request are never stored here; see [`ConversationSession::request_with_scratch`].
#[derive(Debug, Clone)]
pub struct ConversationSession {
    id: Uuid,
    mode: Mode,
    created_at: DateTime<Utc>,
    turns: Vec<Turn>,
}

impl ConversationSession {
    /// Creates an empty session. The system turn is added lazily on the
    /// first submission by [`ConversationSession::ensure_system`].
    pub fn new(mode: Mode) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode,
            created_at: Utc::now(),
            turns: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Mode chosen when the overlay was opened.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Inserts the system turn if the session does not have one yet.
    ///
    /// Returns `true` when the turn was inserted.
    pub fn ensure_system(&mut self, prompt: &str) -> bool {
        if self.has_system() {
            return false;
        }
        self.turns.insert(0, Turn::system(prompt));
        true
    }

    pub fn has_system(&self) -> bool {
        self.turns
            .first()
            .is_some_and(|turn| turn.role == Role::System)
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::assistant(content));
    }

    /// Opens an exchange: inserts the system turn (once), appends the
    /// user turn and returns the full history to send. The assistant
    /// reply is appended separately once it arrives, so a failed call
    /// leaves the user turn in place with no assistant turn after it.
    pub fn begin_exchange(&mut self, system_prompt: &str, user: impl Into<String>) -> Vec<Turn> {
        self.ensure_system(system_prompt);
        self.push_user(user);
        self.turns.clone()
    }

    /// The most recent assistant turn, if any.
    pub fn last_assistant(&self) -> Option<&Turn> {
        self.turns
            .iter()
            .rev()
            .find(|turn| turn.role == Role::Assistant)
    }

    /// Builds the message list for a one-off request: the full history
    /// followed by a scratch user turn. The session itself is left
    /// untouched, so the scratch turn can never leak into later context.
    pub fn request_with_scratch(&self, scratch: impl Into<String>) -> Vec<Turn> {
        let mut messages = Vec::with_capacity(self.turns.len() + 1);
        messages.extend(self.turns.iter().cloned());
        messages.push(Turn::user(scratch));
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_turn_inserted_once() {
        let mut session = ConversationSession::new(Mode::Long);
        assert!(session.ensure_system("be precise"));
        session.push_user("hyponatremia");
        assert!(!session.ensure_system("another prompt"));

        let systems = session
            .turns()
            .iter()
            .filter(|turn| turn.role == Role::System)
            .count();
        assert_eq!(systems, 1);
        assert_eq!(session.turns()[0].content, "be precise");
    }

    #[test]
    fn test_scratch_turn_does_not_touch_history() {
        let mut session = ConversationSession::new(Mode::Long);
        session.ensure_system("system");
        session.push_user("question");
        session.push_assistant("answer");

        let request = session.request_with_scratch("suggest follow-ups");

        assert_eq!(request.len(), 4);
        assert_eq!(request[3], Turn::user("suggest follow-ups"));
        assert_eq!(session.len(), 3);
        assert_eq!(session.last_assistant().unwrap().content, "answer");
    }

    #[test]
    fn test_begin_exchange_keeps_user_turn() {
        let mut session = ConversationSession::new(Mode::Short);
        let request = session.begin_exchange("system", "prompt");

        assert_eq!(request, vec![Turn::system("system"), Turn::user("prompt")]);
        assert_eq!(session.turns(), request.as_slice());
        assert!(session.last_assistant().is_none());
    }

    #[test]
    fn test_exchanges_append_in_order() {
        let mut session = ConversationSession::new(Mode::Long);
        session.begin_exchange("system", "q1");
        session.push_assistant("a1");
        let request = session.begin_exchange("system", "q2");
        session.push_assistant("a2");

        assert_eq!(request.len(), 4);
        assert_eq!(
            session.turns(),
            &[
                Turn::system("system"),
                Turn::user("q1"),
                Turn::assistant("a1"),
                Turn::user("q2"),
                Turn::assistant("a2"),
            ]
        );
    }

    #[test]
    fn test_failed_exchange_then_retry() {
        let mut session = ConversationSession::new(Mode::Long);
        session.begin_exchange("system", "q1");
        let retry = session.begin_exchange("system", "q1 again");

        assert_eq!(
            retry,
            vec![
                Turn::system("system"),
                Turn::user("q1"),
                Turn::user("q1 again"),
            ]
        );
    }

    #[test]
    fn test_new_sessions_have_distinct_ids() {
        let a = ConversationSession::new(Mode::Short);
        let b = ConversationSession::new(Mode::Short);
        assert_ne!(a.id(), b.id());
        assert!(a.is_empty());
        assert_eq!(a.mode(), Mode::Short);
    }
}
