//! Backend selection with cascading fallback
//!
//! Candidates are tried in priority order (Remote, Embedded, Simple) and the
//! first one to initialize is memoized. After selection every call goes to
//! that backend; a failing call marks the selector degraded but never moves
//! to another backend.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::backend::{BackendKind, StoreBackend};
use crate::error::{Result, StoreError};

/// What happens when the remote backend cannot be initialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FallbackPolicy {
    /// Fall back to the embedded store, then to the simple store
    #[default]
    Cascade,
    /// Stay offline with empty collections
    RemoteOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectorState {
    Unselected,
    Probing,
    Selected(BackendKind),
    /// Selected, but an operation has failed since
    Degraded(BackendKind),
    /// Remote-only policy and the remote did not come up
    Offline,
}

pub struct BackendSelector {
    policy: FallbackPolicy,
    candidates: Vec<Arc<dyn StoreBackend>>,
    state: RwLock<SelectorState>,
    active: RwLock<Option<Arc<dyn StoreBackend>>>,
    probe_lock: Mutex<()>,
}

impl BackendSelector {
    pub fn new(policy: FallbackPolicy) -> Self {
        Self {
            policy,
            candidates: Vec::new(),
            state: RwLock::new(SelectorState::Unselected),
            active: RwLock::new(None),
            probe_lock: Mutex::new(()),
        }
    }

    /// Register a backend. Probing order follows [`BackendKind`], not registration order.
    pub fn with_backend(mut self, backend: Arc<dyn StoreBackend>) -> Self {
        self.candidates.push(backend);
        self.candidates.sort_by_key(|b| b.kind() as u8);
        self
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    pub fn state(&self) -> SelectorState {
        *self.state.read()
    }

    pub fn active_kind(&self) -> Option<BackendKind> {
        self.active.read().as_ref().map(|b| b.kind())
    }

    /// The selected backend
    pub fn active(&self) -> Result<Arc<dyn StoreBackend>> {
        if let Some(backend) = self.active.read().as_ref() {
            return Ok(backend.clone());
        }

        match self.state() {
            SelectorState::Offline => Err(StoreError::unavailable(
                BackendKind::Remote,
                "remote-only mode and the remote backend did not initialize",
            )),
            _ => Err(StoreError::NotInitialized),
        }
    }

    /// Probe candidates and memoize the winner.
    ///
    /// Returns the selected kind, or `None` when the selector ends up offline.
    pub async fn select(&self) -> Option<BackendKind> {
        let _probe = self.probe_lock.lock().await;

        match self.state() {
            SelectorState::Selected(kind) | SelectorState::Degraded(kind) => return Some(kind),
            SelectorState::Offline => return None,
            SelectorState::Unselected | SelectorState::Probing => {}
        }

        *self.state.write() = SelectorState::Probing;

        for backend in &self.candidates {
            let kind = backend.kind();
            if self.policy == FallbackPolicy::RemoteOnly && kind != BackendKind::Remote {
                continue;
            }

            match backend.init().await {
                Ok(()) => {
                    info!("Selected {} backend", kind);
                    *self.active.write() = Some(backend.clone());
                    *self.state.write() = SelectorState::Selected(kind);
                    return Some(kind);
                }
                Err(e) => {
                    warn!("{} backend failed to initialize: {}", kind, e);
                }
            }
        }

        match self.policy {
            FallbackPolicy::RemoteOnly => {
                error!("Remote backend unavailable in remote-only mode; staying offline");
            }
            FallbackPolicy::Cascade => {
                error!("No backend could be initialized; staying offline");
            }
        }
        *self.state.write() = SelectorState::Offline;
        None
    }

    /// Note a failed operation on the active backend. Bad input does not count.
    pub fn record_failure(&self, err: &StoreError) {
        if !err.is_unavailable() {
            return;
        }

        let mut state = self.state.write();
        if let SelectorState::Selected(kind) = *state {
            error!("{} backend degraded: {}", kind, err);
            *state = SelectorState::Degraded(kind);
        }
    }
}
