//! Per-session wiring of credential, view state, gate and remote api.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use shared::domain::PetAction;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    auth::{AuthTokenProvider, Credential},
    gate::InteractionGate,
    host::{Feedback, HostBridge},
    pet_client::{InteractOutcome, PetApi},
    view_state::{Trigger, TransitionError, ViewState, ViewStateKind, ViewStateMachine},
};

/// What happened to a user-triggered interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionDispatch {
    Applied,
    Failed(String),
    /// Another interaction is in flight; nothing was sent.
    Busy,
    /// Interactions are only reachable from `Ready`; nothing was sent.
    NotReady(ViewStateKind),
}

/// One client session: the credential read at startup, the view state and
/// the interaction gate, wired to a [`PetApi`].
pub struct PetSession {
    api: Arc<dyn PetApi>,
    host: Arc<dyn HostBridge>,
    credential: Option<Credential>,
    view: ViewStateMachine,
    gate: InteractionGate,
    started: AtomicBool,
}

impl PetSession {
    pub fn new(
        api: Arc<dyn PetApi>,
        auth: &dyn AuthTokenProvider,
        host: Arc<dyn HostBridge>,
    ) -> Self {
        Self {
            api,
            host,
            credential: auth.credential(),
            view: ViewStateMachine::new(),
            gate: InteractionGate::new(),
            started: AtomicBool::new(false),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Signals readiness to the host and performs the initial fetch.
    /// Runs once; later calls are rejected without touching the network.
    pub async fn start(&self) -> Result<ViewState, TransitionError> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(TransitionError {
                from: self.view.snapshot().kind(),
                trigger: Trigger::Fetch,
            });
        }
        self.host.ready();

        let Some(credential) = self.credential.as_ref() else {
            warn!("session: credential absent, no request will be made");
            self.view.apply_missing_credential()?;
            return Ok(self.view.snapshot());
        };

        let outcome = self.api.fetch_pet(credential).await;
        self.view.apply_fetch(outcome)?;
        let state = self.view.snapshot();
        info!(state = ?state.kind(), "session: started");
        Ok(state)
    }

    pub async fn interact(&self, action: PetAction) -> InteractionDispatch {
        let kind = self.view.snapshot().kind();
        if kind != ViewStateKind::Ready {
            return InteractionDispatch::NotReady(kind);
        }
        let Some(credential) = self.credential.as_ref() else {
            return InteractionDispatch::NotReady(kind);
        };
        let Some(_busy) = self.gate.try_acquire() else {
            info!(%action, "session: interaction rejected, another is in flight");
            return InteractionDispatch::Busy;
        };
        // A stale failure must not stay on screen while the next action runs.
        if self.view.snapshot().notification().is_some() {
            if let Err(err) = self.view.dismiss_notification() {
                warn!(%action, error = %err, "session: stale notification kept");
            }
        }

        let outcome = self.api.interact(credential, action).await;
        let dispatch = match &outcome {
            InteractOutcome::Applied(_) => {
                self.host.feedback(Feedback::Success);
                InteractionDispatch::Applied
            }
            InteractOutcome::Failed(reason) => {
                self.host.alert(reason);
                self.host.feedback(Feedback::Error);
                InteractionDispatch::Failed(reason.clone())
            }
        };
        if let Err(err) = self.view.apply_interaction(outcome) {
            warn!(%action, error = %err, "session: interaction outcome dropped");
        }
        dispatch
    }

    pub fn dismiss_notification(&self) -> Result<(), TransitionError> {
        self.view.dismiss_notification()
    }

    pub fn snapshot(&self) -> ViewState {
        self.view.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.view.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    pub fn subscribe_busy(&self) -> watch::Receiver<bool> {
        self.gate.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
