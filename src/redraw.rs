use std::time::{Duration, Instant};

/// How long a drag redraw waits before it becomes due.
pub const REDRAW_DELAY: Duration = Duration::from_millis(16);

/// A box position waiting to be drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingRedraw {
    pub position_x_pct: f32,
    pub position_y_pct: f32,
    pub due: Instant,
}

/// Coalesces drag updates into at most one pending redraw.
///
/// Scheduling replaces whatever is pending and restarts the delay, so a
/// burst of pointer moves ends in a single redraw at the last position.
/// Time is passed in by the caller; nothing here sleeps or spawns.
#[derive(Clone, Debug, Default)]
pub struct RedrawScheduler {
    pending: Option<PendingRedraw>,
}

impl RedrawScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the pending redraw with one at (`x_pct`, `y_pct`), due `REDRAW_DELAY` after `now`.
    pub fn schedule(&mut self, x_pct: f32, y_pct: f32, now: Instant) {
        self.pending = Some(PendingRedraw {
            position_x_pct: x_pct,
            position_y_pct: y_pct,
            due: now + REDRAW_DELAY,
        });
    }

    /// Takes the pending redraw if it is due at `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<PendingRedraw> {
        match self.pending {
            Some(pending) if pending.due <= now => self.pending.take(),
            _ => None,
        }
    }

    /// Drops the pending redraw, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingRedraw> {
        self.pending.as_ref()
    }
}
