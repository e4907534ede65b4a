//! Chat Feed
//!
//! Bounded, newest-first message log with a single highlighted message.

pub mod mock;

use std::collections::VecDeque;
use std::fmt;
use tracing::debug;

pub use mock::{MockChatSource, Ticker};

/// Default number of messages retained
pub const DEFAULT_MAX_MESSAGES: usize = 50;

/// Process-unique chat message identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One chat entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub author: String,
    pub text: String,
}

/// Newest-first chat log capped at `max_messages`
#[derive(Debug)]
pub struct ChatFeed {
    messages: VecDeque<ChatMessage>,
    max_messages: usize,
    highlighted: Option<MessageId>,
}

impl Default for ChatFeed {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MESSAGES)
    }
}

impl ChatFeed {
    pub fn new(max_messages: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(max_messages.min(1024)),
            max_messages: max_messages.max(1),
            highlighted: None,
        }
    }

    /// Prepend a message, evicting the oldest entries beyond the cap.
    ///
    /// A highlighted message that gets evicted is un-highlighted.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push_front(message);
        while self.messages.len() > self.max_messages {
            if let Some(evicted) = self.messages.pop_back() {
                if self.highlighted == Some(evicted.id) {
                    debug!("Highlighted message {} aged out, clearing highlight", evicted.id);
                    self.highlighted = None;
                }
            }
        }
    }

    /// Messages, newest first
    pub fn messages(&self) -> impl DoubleEndedIterator<Item = &ChatMessage> + ExactSizeIterator {
        self.messages.iter()
    }

    /// Most recent message
    pub fn latest(&self) -> Option<&ChatMessage> {
        self.messages.front()
    }

    pub fn get(&self, id: MessageId) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn max_messages(&self) -> usize {
        self.max_messages
    }

    /// Highlight a message, or clear the highlight if it is the one shown.
    /// Ids not in the log are ignored.
    pub fn toggle_highlight(&mut self, id: MessageId) {
        if self.highlighted == Some(id) {
            self.highlighted = None;
        } else if self.get(id).is_some() {
            self.highlighted = Some(id);
        }
    }

    pub fn clear_highlight(&mut self) {
        self.highlighted = None;
    }

    pub fn highlighted(&self) -> Option<&ChatMessage> {
        self.highlighted.and_then(|id| self.get(id))
    }

    pub fn highlighted_id(&self) -> Option<MessageId> {
        self.highlighted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(id: u64) -> ChatMessage {
        ChatMessage {
            id: MessageId(id),
            author: "Alice".to_string(),
            text: format!("message {id}"),
        }
    }

    #[test]
    fn test_newest_first() {
        let mut feed = ChatFeed::default();
        feed.push(msg(1));
        feed.push(msg(2));
        assert_eq!(feed.latest().unwrap().id, MessageId(2));
        let order: Vec<u64> = feed.messages().map(|m| m.id.0).collect();
        assert_eq!(order, [2, 1]);
    }

    #[test]
    fn test_never_exceeds_cap() {
        let mut feed = ChatFeed::default();
        for i in 0..500 {
            feed.push(msg(i));
            assert!(feed.len() <= DEFAULT_MAX_MESSAGES);
            assert_eq!(feed.latest().unwrap().id, MessageId(i));
        }
        assert_eq!(feed.len(), DEFAULT_MAX_MESSAGES);
        // Oldest retained is the 50th most recent
        assert_eq!(feed.messages().last().unwrap().id, MessageId(450));
    }

    #[test]
    fn test_toggle_highlight() {
        let mut feed = ChatFeed::default();
        feed.push(msg(1));
        feed.push(msg(2));
        feed.toggle_highlight(MessageId(1));
        assert_eq!(feed.highlighted().unwrap().id, MessageId(1));
        feed.toggle_highlight(MessageId(2));
        assert_eq!(feed.highlighted().unwrap().id, MessageId(2));
        feed.toggle_highlight(MessageId(2));
        assert!(feed.highlighted().is_none());
    }

    #[test]
    fn test_highlight_unknown_id_ignored() {
        let mut feed = ChatFeed::default();
        feed.push(msg(1));
        feed.toggle_highlight(MessageId(99));
        assert!(feed.highlighted_id().is_none());
    }

    #[test]
    fn test_highlight_cleared_when_evicted() {
        let mut feed = ChatFeed::new(3);
        feed.push(msg(1));
        feed.toggle_highlight(MessageId(1));
        feed.push(msg(2));
        feed.push(msg(3));
        assert!(feed.highlighted().is_some());
        feed.push(msg(4));
        assert!(feed.highlighted_id().is_none());
    }
}
