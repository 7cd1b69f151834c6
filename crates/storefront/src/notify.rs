//! Transient user-facing notifications.
//!
//! A bounded-lifetime message queue. Each notification carries a monotonic
//! id and an expiry instant; expired entries are pruned lazily whenever the
//! active set is read, so no background task is needed.

use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tracing::debug;

/// Default time a notification stays visible.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3);

/// Visual category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    Warning,
}

/// A queued notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub kind: NotificationKind,
    expires_at: Instant,
}

impl Notification {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Queue of transient notifications.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    next_id: AtomicU64,
    entries: RwLock<Vec<Notification>>,
}

impl NotificationQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a notification with the default lifetime; returns its id.
    pub fn push(&self, message: impl Into<String>, kind: NotificationKind) -> u64 {
        self.push_with_ttl(message, kind, DEFAULT_TTL)
    }

    /// Queue a notification with an explicit lifetime; returns its id.
    pub fn push_with_ttl(
        &self,
        message: impl Into<String>,
        kind: NotificationKind,
        ttl: Duration,
    ) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let message = message.into();
        debug!(id, message, "notification queued");
        self.entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(Notification {
                id,
                message,
                kind,
                expires_at: Instant::now() + ttl,
            });
        id
    }

    /// Remove a notification by id before it expires. A no-op for unknown ids.
    pub fn dismiss(&self, id: u64) {
        self.entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .retain(|n| n.id != id);
    }

    /// Drop all notifications, expired or not.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clear();
    }

    /// The live notifications in queue order, pruning expired entries.
    #[must_use]
    pub fn active(&self) -> Vec<Notification> {
        let now = Instant::now();
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.retain(|n| !n.is_expired(now));
        entries.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_push_assigns_increasing_ids() {
        let queue = NotificationQueue::new();
        let a = queue.push("saved", NotificationKind::Success);
        let b = queue.push("oops", NotificationKind::Error);
        assert!(b > a);
        assert_eq!(queue.active().len(), 2);
    }

    #[test]
    fn test_dismiss_removes_only_target() {
        let queue = NotificationQueue::new();
        let a = queue.push("one", NotificationKind::Info);
        queue.push("two", NotificationKind::Info);
        queue.dismiss(a);

        let active = queue.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].message, "two");

        // unknown ids are ignored
        queue.dismiss(9999);
        assert_eq!(queue.active().len(), 1);
    }

    #[test]
    fn test_expired_entries_are_pruned() {
        let queue = NotificationQueue::new();
        queue.push_with_ttl("gone", NotificationKind::Warning, Duration::ZERO);
        queue.push("still here", NotificationKind::Success);

        let active = queue.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].message, "still here");
    }

    #[test]
    fn test_clear_empties_queue() {
        let queue = NotificationQueue::new();
        queue.push("a", NotificationKind::Info);
        queue.push("b", NotificationKind::Info);
        queue.clear();
        assert!(queue.active().is_empty());
    }
}
