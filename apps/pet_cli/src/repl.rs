//! Line-driven interactive mode.

use std::sync::Arc;

use anyhow::Result;
use client_core::{InteractionDispatch, PetSession, ViewState};
use shared::domain::PetAction;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::watch,
    task::{JoinError, JoinSet},
};
use tracing::warn;

use crate::render::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand {
    Action(PetAction),
    Dismiss,
    Quit,
}

pub fn parse_command(line: &str) -> Option<ReplCommand> {
    match line.trim().to_ascii_lowercase().as_str() {
        "feed" | "f" => Some(ReplCommand::Action(PetAction::Feed)),
        "water" | "w" => Some(ReplCommand::Action(PetAction::Water)),
        "play" | "p" => Some(ReplCommand::Action(PetAction::Play)),
        "dismiss" | "d" => Some(ReplCommand::Dismiss),
        "quit" | "q" | "exit" => Some(ReplCommand::Quit),
        _ => None,
    }
}

/// User-facing line for an action that never reached the server.
pub fn describe_unsent(action: PetAction, dispatch: &InteractionDispatch) -> Option<String> {
    match dispatch {
        InteractionDispatch::Busy => Some(format!(
            "cannot {action}: another action is still in flight"
        )),
        InteractionDispatch::NotReady(kind) => Some(format!(
            "cannot {action} right now: the pet is {}",
            match kind {
                client_core::ViewStateKind::Loading => "still loading",
                client_core::ViewStateKind::Ready => "ready",
                client_core::ViewStateKind::NoPet => "not created yet",
                client_core::ViewStateKind::Error => "unavailable after an error",
            }
        )),
        InteractionDispatch::Applied | InteractionDispatch::Failed(_) => None,
    }
}

pub async fn run(session: Arc<PetSession>) -> Result<()> {
    run_with_input(session, BufReader::new(tokio::io::stdin())).await
}

/// Re-renders on every published view state while reading commands from
/// `input`. Actions run as their own tasks, so a second command typed while
/// one is in flight hits the busy gate. On EOF or `quit` every in-flight
/// action is awaited and the final view is rendered before returning.
pub async fn run_with_input<R>(session: Arc<PetSession>, input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut updates = session.subscribe();
    render_latest(&mut updates);
    if session.snapshot().is_terminal() {
        return Ok(());
    }

    println!("commands: feed | water | play | dismiss | quit");
    let mut lines = input.lines();
    let mut actions = JoinSet::new();
    let mut watching = true;
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line) {
                    Some(ReplCommand::Action(action)) => {
                        let session = session.clone();
                        actions.spawn(async move { (action, session.interact(action).await) });
                    }
                    Some(ReplCommand::Dismiss) => {
                        if let Err(err) = session.dismiss_notification() {
                            warn!(error = %err, "repl: dismiss ignored");
                        }
                    }
                    Some(ReplCommand::Quit) => break,
                    None => println!("unknown command: {}", line.trim()),
                }
            }
            changed = updates.changed(), if watching => {
                match changed {
                    Ok(()) => render_latest(&mut updates),
                    Err(_) => watching = false,
                }
            }
            Some(joined) = actions.join_next() => report(joined),
        }
    }

    while let Some(joined) = actions.join_next().await {
        report(joined);
    }
    if updates.has_changed().unwrap_or(false) {
        render_latest(&mut updates);
    }
    Ok(())
}

fn render_latest(updates: &mut watch::Receiver<ViewState>) {
    let view = updates.borrow_and_update().clone();
    println!("{}", render(&view));
}

fn report(joined: Result<(PetAction, InteractionDispatch), JoinError>) {
    match joined {
        Ok((action, dispatch)) => {
            if let Some(message) = describe_unsent(action, &dispatch) {
                println!("{message}");
            }
        }
        Err(err) => warn!(error = %err, "repl: action task failed"),
    }
}
