use thiserror::Error;

use crate::domain::STAT_MAX;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PetStateError {
    #[error("pet name must not be empty")]
    EmptyName,
    #[error("pet {stat} out of range: {value} (expected 0..={max})", max = STAT_MAX)]
    StatOutOfRange { stat: &'static str, value: i64 },
}
