use std::io::Write;

use client_core::{Feedback, HostBridge};
use tracing::debug;

/// Terminal stand-in for the chat-app frame: alerts go to stderr and an
/// error ring the bell instead of a haptic buzz.
pub struct TerminalHost;

impl HostBridge for TerminalHost {
    fn ready(&self) {
        debug!("host: ready");
    }

    fn feedback(&self, kind: Feedback) {
        debug!(?kind, "host: feedback");
        if kind == Feedback::Error {
            let mut stderr = std::io::stderr();
            let _ = stderr.write_all(b"\x07");
            let _ = stderr.flush();
        }
    }

    fn alert(&self, message: &str) {
        eprintln!("alert: {message}");
    }
}
