//! Latest-request guard for view loads.
//!
//! Every load of a view takes a [`Ticket`] for a caller scope (one browser
//! tab, one client) and a view. A result is only kept as the snapshot of
//! that scope and view when its ticket is still the newest one issued for
//! the pair, so a slow response can never replace a newer one. Scopes never
//! interfere with each other.

use std::collections::HashMap;

use tokio::sync::Mutex;
use tracing::debug;

use crate::constants::limits;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    scope: String,
    view: String,
    seq: u64,
}

impl Ticket {
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    #[must_use]
    pub fn view(&self) -> &str {
        &self.view
    }

    #[must_use]
    pub const fn seq(&self) -> u64 {
        self.seq
    }

    fn key(&self) -> (String, String) {
        (self.scope.clone(), self.view.clone())
    }
}

struct Slot<T> {
    issued: u64,
    touched: u64,
    snapshot: Option<(u64, T)>,
}

struct Slots<T> {
    map: HashMap<(String, String), Slot<T>>,
    clock: u64,
}

pub struct RequestSequencer<T> {
    slots: Mutex<Slots<T>>,
    capacity: usize,
}

impl<T> Default for RequestSequencer<T> {
    fn default() -> Self {
        Self::with_capacity(limits::SEQUENCER_SLOTS)
    }
}

impl<T> RequestSequencer<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// At most `capacity` scope/view pairs are tracked. Starting a new pair
    /// beyond that forgets the least recently used one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Mutex::new(Slots {
                map: HashMap::new(),
                clock: 0,
            }),
            capacity: capacity.max(1),
        }
    }

    pub async fn begin(&self, scope: &str, view: &str) -> Ticket {
        let mut slots = self.slots.lock().await;
        slots.clock += 1;
        let now = slots.clock;

        let key = (scope.to_string(), view.to_string());
        if !slots.map.contains_key(&key) && slots.map.len() >= self.capacity {
            let oldest = slots
                .map
                .iter()
                .min_by_key(|(_, slot)| slot.touched)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                debug!(scope = %oldest.0, view = %oldest.1, "Forgetting idle view slot");
                slots.map.remove(&oldest);
            }
        }

        let slot = slots.map.entry(key).or_insert(Slot {
            issued: 0,
            touched: now,
            snapshot: None,
        });
        slot.issued += 1;
        slot.touched = now;

        Ticket {
            scope: scope.to_string(),
            view: view.to_string(),
            seq: slot.issued,
        }
    }

    pub async fn is_latest(&self, ticket: &Ticket) -> bool {
        self.slots
            .lock()
            .await
            .map
            .get(&ticket.key())
            .is_some_and(|slot| slot.issued == ticket.seq)
    }

    /// Stores `value` as the snapshot for the ticket's scope and view if the
    /// ticket is still the latest. Returns whether it was stored.
    pub async fn commit(&self, ticket: &Ticket, value: T) -> bool {
        let mut slots = self.slots.lock().await;
        let Some(slot) = slots.map.get_mut(&ticket.key()) else {
            return false;
        };

        if slot.issued != ticket.seq {
            debug!(
                scope = %ticket.scope,
                view = %ticket.view,
                ticket = ticket.seq,
                latest = slot.issued,
                "Discarding superseded view result"
            );
            return false;
        }

        slot.snapshot = Some((ticket.seq, value));
        true
    }
}

impl<T: Clone> RequestSequencer<T> {
    pub async fn snapshot(&self, scope: &str, view: &str) -> Option<T> {
        self.slots
            .lock()
            .await
            .map
            .get(&(scope.to_string(), view.to_string()))
            .and_then(|slot| slot.snapshot.as_ref())
            .map(|(_, value)| value.clone())
    }
}
