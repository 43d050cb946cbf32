//! Round-level notifications.
//!
//! Observers register with the game state and receive every [`GameEvent`]
//! synchronously, in emission order.

use tracing::debug;

/// Observable change in round state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    RoundStarted { rush: bool },
    PointsChanged(u64),
    GoalChanged(u64),
    TimerReset(u32),
    CascadeSettled { passes: u32, points: u64, capped: bool },
    /// Fires exactly once per round.
    GameOver { points: u64, goal: u64 },
}

/// Handle returned by [`Observers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

pub type Observer = Box<dyn FnMut(&GameEvent)>;

/// Registered observers, notified in subscription order.
#[derive(Default)]
pub struct Observers {
    next_id: u32,
    entries: Vec<(SubscriptionId, Observer)>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Observer) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push((id, observer));
        id
    }

    /// Returns false if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn emit(&mut self, event: GameEvent) {
        debug!(?event, observers = self.entries.len(), "game event");
        for (_, observer) in &mut self.entries {
            observer(&event);
        }
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.entries.len())
            .finish()
    }
}
