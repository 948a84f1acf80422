pub mod auth;
pub mod error;
pub mod gate;
pub mod host;
pub mod pet_client;
pub mod session;
pub mod view_state;

pub use auth::{AuthTokenProvider, Credential, EnvCredentialProvider, StaticCredential};
pub use error::ClientError;
pub use gate::{GateGuard, InteractionGate};
pub use host::{Feedback, HostBridge, NoopHost};
pub use pet_client::{FetchOutcome, HttpPetClient, InteractOutcome, PetApi};
pub use session::{InteractionDispatch, PetSession};
pub use view_state::{
    Notification, TransitionError, Trigger, ViewState, ViewStateKind, ViewStateMachine,
    MISSING_AUTH_REASON,
};
