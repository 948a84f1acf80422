//! At-most-one in-flight interaction.

use tokio::sync::watch;
use tracing::debug;

pub struct InteractionGate {
    busy: watch::Sender<bool>,
}

impl Default for InteractionGate {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionGate {
    pub fn new() -> Self {
        let (busy, _) = watch::channel(false);
        Self { busy }
    }

    /// Returns `true` if the gate was idle and is now busy. A `false` return
    /// means another interaction is in flight and the caller must not submit.
    pub fn begin(&self) -> bool {
        let acquired = self.busy.send_if_modified(|busy| {
            if *busy {
                false
            } else {
                *busy = true;
                true
            }
        });
        debug!(acquired, "gate: begin");
        acquired
    }

    pub fn end(&self) {
        let released = self.busy.send_if_modified(|busy| std::mem::replace(busy, false));
        debug!(released, "gate: end");
    }

    /// Like [`begin`](Self::begin), but the busy period ends when the guard drops.
    pub fn try_acquire(&self) -> Option<GateGuard<'_>> {
        self.begin().then(|| GateGuard { gate: self })
    }

    pub fn is_busy(&self) -> bool {
        *self.busy.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.busy.subscribe()
    }
}

pub struct GateGuard<'a> {
    gate: &'a InteractionGate,
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        self.gate.end();
    }
}
