//! Text rendering of a [`ViewState`]. Pure: same state, same output.

use client_core::{Notification, ViewState};
use shared::domain::{PetState, STAT_MAX};

const BAR_WIDTH: usize = 20;

pub const NO_PET_MESSAGE: &str = "Pet not found. Create one in the bot with /pet.";

pub fn render(state: &ViewState) -> String {
    match state {
        ViewState::Loading => "Loading pet...".to_string(),
        ViewState::Ready { pet, notification } => render_pet(pet, notification.as_ref()),
        ViewState::NoPet => NO_PET_MESSAGE.to_string(),
        ViewState::Error(reason) => format!("Error: {reason}"),
    }
}

fn render_pet(pet: &PetState, notification: Option<&Notification>) -> String {
    let mut out = format!("{} {}\n", pet.name(), pet.mood().emoji());
    out.push_str(&stat_line("hunger", pet.hunger()));
    out.push_str(&stat_line("thirst", pet.thirst()));
    out.push_str(&stat_line("happiness", pet.happiness()));
    if let Some(notification) = notification {
        out.push_str(&format!(
            "! {} ({})\n",
            notification.reason,
            notification.raised_at.format("%H:%M:%S")
        ));
    }
    out.trim_end().to_string()
}

fn stat_line(label: &str, value: u8) -> String {
    let filled = usize::from(value) * BAR_WIDTH / usize::from(STAT_MAX);
    format!(
        "  {label:<10}[{}{}] {value}/{STAT_MAX}\n",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled)
    )
}
