//! Debounced "state changed" notifications.
//!
//! Every mutation pokes the debouncer; subscribers are called once the state
//! has been quiet for the debounce window, with the latest snapshot.

use crate::state::EngineState;
use instant::Instant;
use std::time::Duration;

#[derive(Clone, Copy, Debug)]
pub struct Debouncer {
    delay: Duration,
    pending_since: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending_since: None,
        }
    }

    /// Record a change at `now`, pushing the deadline back.
    #[inline]
    pub fn poke(&mut self, now: Instant) {
        self.pending_since = Some(now);
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    /// True once, when a pending change has been quiet for the delay.
    pub fn take_ready(&mut self, now: Instant) -> bool {
        match self.pending_since {
            Some(t) if now >= t + self.delay => {
                self.pending_since = None;
                true
            }
            _ => false,
        }
    }
}

type Listener = Box<dyn FnMut(&EngineState)>;

pub struct ChangeNotifier {
    debouncer: Debouncer,
    listeners: Vec<Listener>,
    revision: u64,
}

impl ChangeNotifier {
    pub fn new(delay: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(delay),
            listeners: Vec::new(),
            revision: 0,
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&EngineState) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Monotonic counter bumped on every change, for views that re-sync eagerly.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn mark(&mut self, now: Instant) {
        self.revision = self.revision.wrapping_add(1);
        self.debouncer.poke(now);
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn flush(&mut self, now: Instant, state: &EngineState) -> bool {
        if !self.debouncer.take_ready(now) {
            return false;
        }
        for l in self.listeners.iter_mut() {
            l(state);
        }
        true
    }
}
