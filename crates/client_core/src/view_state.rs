//! Single-writer view state for the presentation layer.

use chrono::{DateTime, Utc};
use shared::domain::PetState;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::pet_client::{FetchOutcome, InteractOutcome};

pub const MISSING_AUTH_REASON: &str = "missing auth";

/// Transient interaction failure layered over `Ready`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub reason: String,
    pub raised_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            raised_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Ready {
        pet: PetState,
        notification: Option<Notification>,
    },
    NoPet,
    Error(String),
}

impl ViewState {
    pub fn kind(&self) -> ViewStateKind {
        match self {
            ViewState::Loading => ViewStateKind::Loading,
            ViewState::Ready { .. } => ViewStateKind::Ready,
            ViewState::NoPet => ViewStateKind::NoPet,
            ViewState::Error(_) => ViewStateKind::Error,
        }
    }

    pub fn pet(&self) -> Option<&PetState> {
        match self {
            ViewState::Ready { pet, .. } => Some(pet),
            _ => None,
        }
    }

    pub fn notification(&self) -> Option<&Notification> {
        match self {
            ViewState::Ready { notification, .. } => notification.as_ref(),
            _ => None,
        }
    }

    /// `NoPet` and `Error` end the session; nothing moves out of them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ViewState::NoPet | ViewState::Error(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStateKind {
    Loading,
    Ready,
    NoPet,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    MissingCredential,
    Fetch,
    Interaction,
    Dismiss,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transition {trigger:?} is not allowed from {from:?}")]
pub struct TransitionError {
    pub from: ViewStateKind,
    pub trigger: Trigger,
}

/// Owns the current [`ViewState`] and publishes every replacement to
/// subscribers. All mutation goes through the `apply_*` methods.
pub struct ViewStateMachine {
    state: watch::Sender<ViewState>,
}

impl Default for ViewStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewStateMachine {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ViewState::Loading);
        Self { state }
    }

    pub fn snapshot(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    pub fn apply_missing_credential(&self) -> Result<(), TransitionError> {
        self.transition(Trigger::MissingCredential, |current| match current {
            ViewState::Loading => Some(ViewState::Error(MISSING_AUTH_REASON.to_string())),
            _ => None,
        })
    }

    pub fn apply_fetch(&self, outcome: FetchOutcome) -> Result<(), TransitionError> {
        self.transition(Trigger::Fetch, move |current| match current {
            ViewState::Loading => Some(match outcome {
                FetchOutcome::Found(pet) => ViewState::Ready {
                    pet,
                    notification: None,
                },
                FetchOutcome::NotFound => ViewState::NoPet,
                FetchOutcome::Failed(reason) => ViewState::Error(reason),
            }),
            _ => None,
        })
    }

    /// A failed interaction keeps the last known pet and only raises a
    /// notification.
    pub fn apply_interaction(&self, outcome: InteractOutcome) -> Result<(), TransitionError> {
        self.transition(Trigger::Interaction, move |current| match current {
            ViewState::Ready { pet, .. } => Some(match outcome {
                InteractOutcome::Applied(pet) => ViewState::Ready {
                    pet,
                    notification: None,
                },
                InteractOutcome::Failed(reason) => ViewState::Ready {
                    pet: pet.clone(),
                    notification: Some(Notification::new(reason)),
                },
            }),
            _ => None,
        })
    }

    pub fn dismiss_notification(&self) -> Result<(), TransitionError> {
        self.transition(Trigger::Dismiss, |current| match current {
            ViewState::Ready { pet, .. } => Some(ViewState::Ready {
                pet: pet.clone(),
                notification: None,
            }),
            _ => None,
        })
    }

    fn transition<F>(&self, trigger: Trigger, next: F) -> Result<(), TransitionError>
    where
        F: FnOnce(&ViewState) -> Option<ViewState>,
    {
        let mut rejected = None;
        self.state.send_if_modified(|current| match next(current) {
            Some(replacement) => {
                info!(
                    ?trigger,
                    from = ?current.kind(),
                    to = ?replacement.kind(),
                    "view: transition"
                );
                *current = replacement;
                true
            }
            None => {
                rejected = Some(current.kind());
                false
            }
        });

        match rejected {
            Some(from) => {
                warn!(?trigger, ?from, "view: transition rejected");
                Err(TransitionError { from, trigger })
            }
            None => Ok(()),
        }
    }
}
