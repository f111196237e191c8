// ── Central reactive session store ──
//
// The client list is the only shared mutable resource in the system.
// Writers are the polling feed (full snapshot replacement) and the
// mutation path (key-addressed row patches after portal confirmation).

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use super::collection::KeyedCollection;
use crate::model::{ClientSession, Whitelist};
use crate::stream::SessionStream;

/// Reactive store for the current client-session snapshot.
///
/// Snapshots are total replacements — there is no per-row merge across
/// polls. Row patches exist only for confirmed mutations and always
/// address rows by their stable `ip` key, never by view index.
pub struct SessionStore {
    sessions: KeyedCollection<ClientSession>,
    last_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (last_refresh, _) = watch::channel(None);
        Self {
            sessions: KeyedCollection::new(),
            last_refresh,
        }
    }

    // ── Snapshot application ─────────────────────────────────────────

    /// Replace the whole client list with a freshly polled snapshot.
    ///
    /// Uses upsert-then-prune rather than clear-then-insert, so
    /// subscribers never observe a transient empty list. Keys named in
    /// `pinned` keep their current row even if the incoming snapshot
    /// disagrees — the feed pins rows with an unresolved edit so a poll
    /// completing mid-rename cannot overwrite it.
    #[allow(clippy::implicit_hasher)]
    pub fn apply_snapshot(&self, incoming: Vec<ClientSession>, pinned: &HashSet<String>) {
        let incoming_keys: HashSet<String> = incoming.iter().map(|s| s.ip.clone()).collect();

        for session in incoming {
            if pinned.contains(&session.ip) && self.sessions.get(&session.ip).is_some() {
                continue;
            }
            self.sessions.upsert_silent(session.ip.clone(), session);
        }
        for existing in self.sessions.keys() {
            if !incoming_keys.contains(&existing) && !pinned.contains(&existing) {
                self.sessions.remove_silent(&existing);
            }
        }
        self.sessions.flush();

        let _ = self.last_refresh.send(Some(Utc::now()));
    }

    // ── Row patches (confirmed mutations only) ───────────────────────

    /// Rewrite the hostname of the row keyed by `ip`.
    ///
    /// Returns `false` when the row has vanished (e.g. the client roamed
    /// away between confirmation and patch) — the rename is still
    /// persisted server-side and will show on the next poll.
    pub fn patch_hostname(&self, ip: &str, hostname: &str) -> bool {
        let Some(existing) = self.sessions.get(ip) else {
            return false;
        };
        let mut session = (*existing).clone();
        session.hostname = hostname.to_owned();
        self.sessions.upsert(ip.to_owned(), session);
        true
    }

    /// Flip the whitelist sentinel of the row keyed by `ip`.
    pub fn patch_whitelist(&self, ip: &str, health: Whitelist) -> bool {
        let Some(existing) = self.sessions.get(ip) else {
            return false;
        };
        let mut session = (*existing).clone();
        session.health = health;
        self.sessions.upsert(ip.to_owned(), session);
        true
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Arc<Vec<Arc<ClientSession>>> {
        self.sessions.snapshot()
    }

    pub fn session_by_ip(&self, ip: &str) -> Option<Arc<ClientSession>> {
        self.sessions.get(ip)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.len() == 0
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> SessionStream {
        SessionStream::new(self.sessions.subscribe())
    }

    /// Timestamp of the last applied snapshot, if any.
    pub fn last_refresh(&self) -> watch::Receiver<Option<DateTime<Utc>>> {
        self.last_refresh.subscribe()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
