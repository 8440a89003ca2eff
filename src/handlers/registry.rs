//! Handler registry and dispatch.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use slirc_proto::Message;
use tracing::trace;

use super::trigger::Handler;
use crate::bot::Bot;

type HandlerList = Arc<Vec<Arc<dyn Handler>>>;

/// Ordered list of handlers.
///
/// Dispatch walks a snapshot of the list, so a handler may register more
/// handlers while it runs; they take effect from the next message.
#[derive(Default)]
pub struct Registry {
    handlers: RwLock<HandlerList>,
    dispatched: AtomicU64,
    consumed: AtomicU64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler. It runs after every handler registered before it.
    pub fn add(&self, handler: Arc<dyn Handler>) {
        let mut handlers = self.handlers.write();
        let mut next = Vec::with_capacity(handlers.len() + 1);
        next.extend(handlers.iter().cloned());
        next.push(handler);
        *handlers = Arc::new(next);
    }

    pub fn len(&self) -> usize {
        self.handlers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Offer `msg` to each handler in order. Returns `true` if one consumed it.
    pub fn dispatch(&self, bot: &Bot, msg: &Message) -> bool {
        let snapshot = Arc::clone(&*self.handlers.read());
        self.dispatched.fetch_add(1, Ordering::Relaxed);

        for (index, handler) in snapshot.iter().enumerate() {
            if handler.handle(bot, msg) {
                self.consumed.fetch_add(1, Ordering::Relaxed);
                trace!(command = %msg.command, handler = index, "Message consumed");
                return true;
            }
        }
        false
    }

    /// Messages dispatched and messages consumed so far.
    pub fn counts(&self) -> (u64, u64) {
        (
            self.dispatched.load(Ordering::Relaxed),
            self.consumed.load(Ordering::Relaxed),
        )
    }
}
