use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{error::PetStateError, protocol::PetPayload};

pub const STAT_MAX: u8 = 100;

/// Server-owned snapshot of a pet. Always complete: a value of this type
/// only exists once every stat has been validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PetPayload")]
pub struct PetState {
    name: String,
    hunger: u8,
    thirst: u8,
    happiness: u8,
}

impl PetState {
    pub fn new(
        name: impl Into<String>,
        hunger: i64,
        thirst: i64,
        happiness: i64,
    ) -> Result<Self, PetStateError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PetStateError::EmptyName);
        }
        Ok(Self {
            name,
            hunger: stat("hunger", hunger)?,
            thirst: stat("thirst", thirst)?,
            happiness: stat("happiness", happiness)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hunger(&self) -> u8 {
        self.hunger
    }

    pub fn thirst(&self) -> u8 {
        self.thirst
    }

    pub fn happiness(&self) -> u8 {
        self.happiness
    }

    pub fn mood(&self) -> Mood {
        Mood::from_stats(self.hunger, self.thirst, self.happiness)
    }
}

fn stat(name: &'static str, value: i64) -> Result<u8, PetStateError> {
    u8::try_from(value)
        .ok()
        .filter(|v| *v <= STAT_MAX)
        .ok_or(PetStateError::StatOutOfRange { stat: name, value })
}

impl TryFrom<PetPayload> for PetState {
    type Error = PetStateError;

    fn try_from(value: PetPayload) -> Result<Self, Self::Error> {
        Self::new(value.name, value.hunger, value.thirst, value.happiness)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PetAction {
    Feed,
    Water,
    Play,
}

impl PetAction {
    pub const ALL: [PetAction; 3] = [PetAction::Feed, PetAction::Water, PetAction::Play];

    pub fn as_str(self) -> &'static str {
        match self {
            PetAction::Feed => "feed",
            PetAction::Water => "water",
            PetAction::Play => "play",
        }
    }
}

impl fmt::Display for PetAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity tier derived from the average of the three stats, best first.
///
/// Thresholds are strict: an average of exactly 80 is `Content`, not `Joyful`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mood {
    Joyful,
    Content,
    Neutral,
    Worried,
    Miserable,
}

impl Mood {
    pub fn from_stats(hunger: u8, thirst: u8, happiness: u8) -> Self {
        // avg > t  <=>  sum > 3t, which keeps the comparison exact.
        let sum = u16::from(hunger) + u16::from(thirst) + u16::from(happiness);
        match sum {
            s if s > 3 * 80 => Mood::Joyful,
            s if s > 3 * 60 => Mood::Content,
            s if s > 3 * 40 => Mood::Neutral,
            s if s > 3 * 20 => Mood::Worried,
            _ => Mood::Miserable,
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Mood::Joyful => "😃",
            Mood::Content => "🙂",
            Mood::Neutral => "😐",
            Mood::Worried => "😟",
            Mood::Miserable => "😭",
        }
    }
}
