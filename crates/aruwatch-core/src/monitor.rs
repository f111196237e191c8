// ── Monitor ──
//
// Full lifecycle management for one portal connection: the periodic
// polling feed per network profile, and the role-gated mutation path.
// All state application funnels through the SessionStore; a feed token
// plus a generation counter guard against late or stale responses.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use aruwatch_api::{PortalClient, TransportConfig};

use crate::error::CoreError;
use crate::model::{ClientSession, NetworkProfile, Whitelist};
use crate::recovery::EmptyRecovery;
use crate::session::SessionGate;
use crate::store::SessionStore;
use crate::stream::SessionStream;

/// Fixed poll period. Matches the portal's own refresh cadence so two
/// consecutive polls straddle at most one fetcher run.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(55);

/// Base delay of the empty-result retry schedule (doubles per attempt).
pub const DEFAULT_EMPTY_RETRY_DELAY: Duration = Duration::from_secs(2);

// ── Configuration ────────────────────────────────────────────────────

/// Configuration for connecting to a portal.
///
/// Built by the CLI from its config file — core never reads config files.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Portal root URL (e.g. `http://10.0.0.5:5000`).
    pub portal_url: Url,
    /// TLS / timeout settings for the HTTP client.
    pub transport: TransportConfig,
    /// Fixed poll period. The timer is period-gated, not
    /// completion-gated; the generation check handles overlap.
    pub poll_interval: Duration,
    /// Base delay of the empty-result recovery schedule.
    pub empty_retry_delay: Duration,
}

impl MonitorConfig {
    pub fn new(portal_url: Url) -> Self {
        Self {
            portal_url,
            transport: TransportConfig::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            empty_retry_delay: DEFAULT_EMPTY_RETRY_DELAY,
        }
    }
}

// ── Observable feed state ────────────────────────────────────────────

/// Data availability, observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataState {
    /// No fetch has completed yet.
    Waiting,
    /// The store holds a non-empty snapshot.
    Live,
    /// The portal answered with zero rows; recovery is running or spent.
    NoData,
}

/// Outcome of a mutation entry point.
///
/// `Denied` is the silent authorization no-op: the role gate refused the
/// operation before any request was issued. It is an outcome, not an
/// error — the UI is expected to have prevented the attempt entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationStatus {
    Applied,
    Denied,
}

// ── Monitor ──────────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc`. Owns the polling feed for the selected
/// profile and the mutation path; both write exclusively through the
/// shared [`SessionStore`].
#[derive(Clone)]
pub struct Monitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    config: MonitorConfig,
    client: PortalClient,
    store: Arc<SessionStore>,
    gate: SessionGate,
    /// Root token — cancelled on shutdown. Feeds run on child tokens so
    /// a profile change never poisons the monitor itself.
    cancel: CancellationToken,
    feed: Mutex<Option<FeedHandle>>,
    /// Monotonically increasing fetch generation. A completion is
    /// applied only while its generation is still the newest issued.
    generation: AtomicU64,
    /// Serializes the generation re-check with snapshot application, so
    /// an older completion cannot land between a newer one's check and
    /// its write. Never held across an await.
    apply_gate: std::sync::Mutex<()>,
    /// Rows with an unresolved mutation; polls must not overwrite them.
    pending_edits: DashMap<String, ()>,
    data_state: watch::Sender<DataState>,
}

struct FeedHandle {
    profile: NetworkProfile,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl Monitor {
    /// Create a monitor with its own HTTP client. Does not fetch —
    /// call [`start()`](Self::start) or [`refresh()`](Self::refresh).
    pub fn new(config: MonitorConfig, gate: SessionGate) -> Result<Self, CoreError> {
        let client = PortalClient::new(config.portal_url.clone(), &config.transport)?;
        Ok(Self::with_client(client, config, gate))
    }

    /// Create a monitor around an existing [`PortalClient`] — typically
    /// the one that just performed the login that produced `gate`.
    pub fn with_client(client: PortalClient, config: MonitorConfig, gate: SessionGate) -> Self {
        let (data_state, _) = watch::channel(DataState::Waiting);
        Self {
            inner: Arc::new(MonitorInner {
                config,
                client,
                store: Arc::new(SessionStore::new()),
                gate,
                cancel: CancellationToken::new(),
                feed: Mutex::new(None),
                generation: AtomicU64::new(0),
                apply_gate: std::sync::Mutex::new(()),
                pending_edits: DashMap::new(),
                data_state,
            }),
        }
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn config(&self) -> &MonitorConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.inner.store
    }

    pub fn gate(&self) -> SessionGate {
        self.inner.gate
    }

    pub fn snapshot(&self) -> Arc<Vec<Arc<ClientSession>>> {
        self.inner.store.snapshot()
    }

    pub fn subscribe(&self) -> SessionStream {
        self.inner.store.subscribe()
    }

    /// Observe data availability (waiting / live / no-data).
    pub fn data_state(&self) -> watch::Receiver<DataState> {
        self.inner.data_state.subscribe()
    }

    /// The profile the feed is currently polling, if any.
    pub async fn profile(&self) -> Option<NetworkProfile> {
        self.inner.feed.lock().await.as_ref().map(|f| f.profile)
    }

    // ── Feed lifecycle ───────────────────────────────────────────

    /// Start (or switch) the polling feed for `profile`.
    ///
    /// Fires an initial fetch immediately, then repeats at the fixed
    /// poll period. Switching profiles cancels the previous feed's
    /// timer; an already-issued request is not aborted, but its
    /// response is discarded by the liveness check.
    pub async fn start(&self, profile: NetworkProfile) {
        let mut guard = self.inner.feed.lock().await;

        if let Some(existing) = guard.take() {
            if existing.profile == profile && !existing.cancel.is_cancelled() {
                *guard = Some(existing);
                return;
            }
            debug!(from = %existing.profile, to = %profile, "switching feed profile");
            existing.cancel.cancel();
        }

        let cancel = self.inner.cancel.child_token();
        let task = tokio::spawn(poll_task(self.clone(), profile, cancel.clone()));
        *guard = Some(FeedHandle {
            profile,
            cancel,
            task,
        });
        info!(%profile, "polling feed started");
    }

    /// Stop the polling feed. The last snapshot is retained.
    pub async fn stop(&self) {
        if let Some(feed) = self.inner.feed.lock().await.take() {
            feed.cancel.cancel();
            feed.task.abort();
            debug!(profile = %feed.profile, "polling feed stopped");
        }
    }

    /// Tear down the monitor: stops the feed and cancels everything
    /// spawned from the root token.
    pub async fn shutdown(&self) {
        self.stop().await;
        self.inner.cancel.cancel();
    }

    // ── One-shot fetch ───────────────────────────────────────────

    /// Fetch one snapshot for `profile` outside the feed (CLI one-shot
    /// mode). Returns the number of rows applied.
    pub async fn refresh(&self, profile: NetworkProfile) -> Result<usize, CoreError> {
        match self.fetch_once(profile, &self.inner.cancel).await? {
            Some(count) => Ok(count),
            // Only possible if a concurrent caller raced us; the newer
            // snapshot won, which is the guarantee we want.
            None => Ok(self.inner.store.len()),
        }
    }

    /// Issue one generation-tagged fetch and apply the result.
    ///
    /// Returns `Ok(None)` when the response was discarded: the feed was
    /// cancelled mid-flight, or a newer fetch was issued while this one
    /// was in the air ("last issued wins", never "last completed wins").
    async fn fetch_once(
        &self,
        profile: NetworkProfile,
        cancel: &CancellationToken,
    ) -> Result<Option<usize>, CoreError> {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let raw = self
            .inner
            .client
            .list_sessions(profile.profile_id())
            .await?;

        let sessions: Vec<ClientSession> = raw.into_iter().map(Into::into).collect();
        let count = sessions.len();

        {
            let _gate = self
                .inner
                .apply_gate
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);

            if cancel.is_cancelled() {
                debug!(generation, "discarding response for cancelled feed");
                return Ok(None);
            }
            if generation != self.inner.generation.load(Ordering::SeqCst) {
                debug!(generation, "discarding stale fetch response");
                return Ok(None);
            }

            let pinned: HashSet<String> = self
                .inner
                .pending_edits
                .iter()
                .map(|r| r.key().clone())
                .collect();
            self.inner.store.apply_snapshot(sessions, &pinned);

            let state = if count == 0 {
                DataState::NoData
            } else {
                DataState::Live
            };
            self.inner.data_state.send_replace(state);
        }

        debug!(%profile, rows = count, "snapshot applied");
        Ok(Some(count))
    }

    // ── Mutations (role-gated) ───────────────────────────────────

    /// Rename the display hostname of the row keyed by `ip`.
    ///
    /// Role is re-checked here regardless of what the invoking UI
    /// allowed; non-admins get a silent [`MutationStatus::Denied`].
    /// An empty (after trim) hostname is a validation failure and never
    /// reaches the portal. The local row is patched only after the
    /// portal confirms.
    pub async fn rename_hostname(
        &self,
        ip: &str,
        new_hostname: &str,
    ) -> Result<MutationStatus, CoreError> {
        if !self.inner.gate.can_mutate() {
            debug!(%ip, "rename refused: role is not admin");
            return Ok(MutationStatus::Denied);
        }

        let hostname = new_hostname.trim();
        if hostname.is_empty() {
            return Err(CoreError::ValidationFailed {
                message: "hostname cannot be empty".into(),
            });
        }

        let _pin = PendingEdit::pin(&self.inner.pending_edits, ip);
        self.inner.client.edit_hostname(ip, hostname).await?;

        if !self.inner.store.patch_hostname(ip, hostname) {
            debug!(%ip, "renamed row no longer in snapshot; next poll will carry it");
        }
        Ok(MutationStatus::Applied)
    }

    /// Add or remove `ip` from the whitelist.
    ///
    /// Confirmation prompts are the caller's responsibility — this is
    /// the submission path. The `health` sentinel flips only after the
    /// portal confirms; on rejection the row is left exactly as it was.
    pub async fn set_whitelist(
        &self,
        ip: &str,
        include: bool,
    ) -> Result<MutationStatus, CoreError> {
        if !self.inner.gate.can_mutate() {
            debug!(%ip, include, "whitelist change refused: role is not admin");
            return Ok(MutationStatus::Denied);
        }

        let _pin = PendingEdit::pin(&self.inner.pending_edits, ip);
        if include {
            self.inner.client.add_whitelist(ip).await?;
        } else {
            self.inner.client.remove_whitelist(ip).await?;
        }

        let health = if include {
            Whitelist::Included
        } else {
            Whitelist::Excluded
        };
        if !self.inner.store.patch_whitelist(ip, health) {
            debug!(%ip, "whitelisted row no longer in snapshot");
        }
        Ok(MutationStatus::Applied)
    }
}

// ── Pending-edit pin ─────────────────────────────────────────────────

/// RAII marker keeping a row pinned against snapshot overwrites while a
/// mutation is in flight. Dropped (and thus unpinned) on every exit
/// path, including errors.
struct PendingEdit<'a> {
    edits: &'a DashMap<String, ()>,
    ip: String,
}

impl<'a> PendingEdit<'a> {
    fn pin(edits: &'a DashMap<String, ()>, ip: &str) -> Self {
        edits.insert(ip.to_owned(), ());
        Self {
            edits,
            ip: ip.to_owned(),
        }
    }
}

impl Drop for PendingEdit<'_> {
    fn drop(&mut self) {
        self.edits.remove(&self.ip);
    }
}

// ── Poll task ────────────────────────────────────────────────────────

/// Fixed-period poll loop for one profile.
///
/// The timer is period-gated: a slow response does not delay the next
/// tick, and overlap is resolved by the generation check in
/// `fetch_once`. Fetch errors retain the previous snapshot; empty
/// results run the bounded recovery schedule.
async fn poll_task(monitor: Monitor, profile: NetworkProfile, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(monitor.inner.config.poll_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut recovery = EmptyRecovery::new(monitor.inner.config.empty_retry_delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                poll_cycle(&monitor, profile, &cancel, &mut recovery).await;
            }
        }
    }
    debug!(%profile, "poll task exited");
}

async fn poll_cycle(
    monitor: &Monitor,
    profile: NetworkProfile,
    cancel: &CancellationToken,
    recovery: &mut EmptyRecovery,
) {
    match monitor.fetch_once(profile, cancel).await {
        Ok(Some(0)) => {
            if !recovery.is_active() {
                warn!(%profile, "portal returned zero rows; starting bounded recovery");
            }
            run_recovery(monitor, profile, cancel, recovery).await;
        }
        Ok(Some(_)) => recovery.reset(),
        Ok(None) => {}
        Err(e) => {
            // Transient by policy: previous snapshot retained, next
            // scheduled tick is the only retry.
            warn!(%profile, error = %e, "poll failed; retaining previous snapshot");
        }
    }
}

/// Drain the empty-result retry budget. One budget per empty response
/// sequence — an exhausted budget leaves the no-data state standing
/// until a poll returns rows again.
async fn run_recovery(
    monitor: &Monitor,
    profile: NetworkProfile,
    cancel: &CancellationToken,
    recovery: &mut EmptyRecovery,
) {
    let mut attempted = false;
    while let Some(delay) = recovery.on_empty() {
        attempted = true;
        tokio::select! {
            biased;
            () = cancel.cancelled() => return,
            () = tokio::time::sleep(delay) => {}
        }

        match monitor.fetch_once(profile, cancel).await {
            Ok(Some(n)) if n > 0 => {
                info!(%profile, rows = n, "recovered from empty result");
                recovery.reset();
                return;
            }
            Ok(_) => {}
            Err(e) => {
                debug!(%profile, error = %e, "recovery fetch failed");
            }
        }
    }
    // Idle ticks on a spent budget come through here too; only the
    // sequence that actually drained the budget gets the warn.
    if attempted {
        warn!(%profile, "empty-result retries exhausted; waiting for next scheduled poll");
    }
}
