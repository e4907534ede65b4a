//! Synthetic chat generator and the periodic ticker driving it
//!
//! The ticker is stepped with elapsed time rather than reading a clock, so
//! the dashboard feeds it frame deltas and tests feed it fixed durations.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tracing::debug;

use super::{ChatMessage, MessageId};

/// Default interval between generated messages
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

const AUTHORS: [&str; 5] = ["Alice", "Bruno", "Carla", "Daniel", "Elisa"];

const PHRASES: [&str; 6] = [
    "What an amazing stream!",
    "Loving the content! 🚀",
    "Could you explain that again?",
    "What's your favorite tool for this?",
    "This is really useful, thanks!",
    "Can't wait for the next live!",
];

/// Fixed-period accumulator
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    accumulated: Duration,
    max_fires: u32,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            accumulated: Duration::ZERO,
            max_fires: u32::MAX,
        }
    }

    /// Limit the fires reported by one `advance`. A larger backlog is
    /// dropped rather than caught up.
    pub fn with_max_fires(mut self, max_fires: u32) -> Self {
        self.max_fires = max_fires.max(1);
        self
    }

    /// Advance by `elapsed`; returns how many periods completed.
    /// Leftover time carries into the next call.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulated = self.accumulated.saturating_add(elapsed);
        let due = self.accumulated.as_nanos() / self.period.as_nanos();

        match u32::try_from(due).ok().filter(|&n| n <= self.max_fires) {
            Some(fired) => {
                self.accumulated -= self.period * fired;
                fired
            }
            None => {
                debug!("Ticker skipped {} missed periods", due - u128::from(self.max_fires));
                self.accumulated = Duration::ZERO;
                self.max_fires
            }
        }
    }
}

/// Generates viewer messages from fixed author and phrase sets
#[derive(Debug)]
pub struct MockChatSource<R: Rng = StdRng> {
    rng: R,
    next_id: u64,
}

impl MockChatSource<StdRng> {
    /// Generator seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic generator
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> MockChatSource<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng, next_id: 1 }
    }

    /// Synthesize one message with a fresh id
    pub fn next_message(&mut self) -> ChatMessage {
        let author = AUTHORS.choose(&mut self.rng).copied().unwrap_or(AUTHORS[0]);
        let text = PHRASES.choose(&mut self.rng).copied().unwrap_or(PHRASES[0]);
        let id = MessageId(self.next_id);
        self.next_id += 1;
        debug!("Mock chat message {} from {}", id, author);
        ChatMessage {
            id,
            author: author.to_string(),
            text: text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatFeed;
    use std::collections::HashSet;

    #[test]
    fn test_ticker_fires_per_period() {
        let mut ticker = Ticker::new(DEFAULT_INTERVAL);
        assert_eq!(ticker.advance(Duration::from_secs(4)), 0);
        assert_eq!(ticker.advance(Duration::from_secs(1)), 1);
        assert_eq!(ticker.advance(Duration::from_secs(12)), 2);
        // 2 s carried over
        assert_eq!(ticker.advance(Duration::from_secs(3)), 1);
    }

    #[test]
    fn test_ticker_drops_backlog_beyond_limit() {
        let mut ticker = Ticker::new(Duration::from_millis(1)).with_max_fires(50);
        assert_eq!(ticker.advance(Duration::from_secs(3600)), 50);
        // Backlog discarded, not replayed on the next frame
        assert_eq!(ticker.advance(Duration::ZERO), 0);
        assert_eq!(ticker.advance(Duration::from_millis(5)), 5);
    }

    #[test]
    fn test_ticker_keeps_remainder_within_limit() {
        let mut ticker = Ticker::new(Duration::from_secs(1)).with_max_fires(10);
        assert_eq!(ticker.advance(Duration::from_millis(9500)), 9);
        assert_eq!(ticker.advance(Duration::from_millis(500)), 1);
    }

    #[test]
    fn test_ticker_small_steps_accumulate() {
        let mut ticker = Ticker::new(Duration::from_millis(100));
        let fired: u32 = (0..100).map(|_| ticker.advance(Duration::from_millis(16))).sum();
        assert_eq!(fired, 16);
    }

    #[test]
    fn test_messages_drawn_from_fixed_sets() {
        let mut source = MockChatSource::seeded(7);
        for _ in 0..100 {
            let m = source.next_message();
            assert!(AUTHORS.contains(&m.author.as_str()));
            assert!(PHRASES.contains(&m.text.as_str()));
        }
    }

    #[test]
    fn test_ids_unique() {
        let mut source = MockChatSource::seeded(1);
        let ids: HashSet<MessageId> = (0..1000).map(|_| source.next_message().id).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_seeded_is_deterministic() {
        let mut a = MockChatSource::seeded(42);
        let mut b = MockChatSource::seeded(42);
        for _ in 0..20 {
            assert_eq!(a.next_message(), b.next_message());
        }
    }

    #[test]
    fn test_stepped_feed_stays_bounded() {
        let mut ticker = Ticker::new(DEFAULT_INTERVAL);
        let mut source = MockChatSource::seeded(3);
        let mut feed = ChatFeed::default();
        for _ in 0..400 {
            for _ in 0..ticker.advance(Duration::from_millis(2500)) {
                feed.push(source.next_message());
            }
        }
        // 1000 seconds of stepping at a 5 s interval
        assert_eq!(feed.len(), 50);
        assert_eq!(feed.latest().unwrap().id, MessageId(200));
    }
}
