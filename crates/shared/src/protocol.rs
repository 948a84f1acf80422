use serde::{Deserialize, Serialize};

use crate::domain::{PetAction, PetState};

/// Raw pet body as the server sends it. Stats are signed so that
/// out-of-range values reach validation instead of failing as a type error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PetPayload {
    pub name: String,
    pub hunger: i64,
    pub thirst: i64,
    pub happiness: i64,
}

impl From<PetState> for PetPayload {
    fn from(value: PetState) -> Self {
        Self {
            name: value.name().to_string(),
            hunger: value.hunger().into(),
            thirst: value.thirst().into(),
            happiness: value.happiness().into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractRequest {
    pub action: PetAction,
}
