//! Frame scheduler
//!
//! Drives one update-then-render step per display refresh. The host owns the
//! actual refresh source (`requestAnimationFrame` in the browser, a manual
//! pump in tests); the scheduler decides whether a delivered frame is still
//! wanted. Every request carries a fresh ticket, and only the ticket that is
//! currently pending is honoured, so a frame delivered after `stop` is inert.

use std::cell::Cell;

/// Identifies one requested frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameTicket(pub u64);

/// A display-refresh source
pub trait FrameHost {
    /// Arrange for the frame identified by `ticket` to be delivered on the
    /// next display refresh
    fn request_frame(&mut self, ticket: FrameTicket);
    /// Withdraw a request that has not been delivered yet
    fn cancel_frame(&mut self, ticket: FrameTicket);
}

/// The one outstanding ticket of a host that reuses a single frame callback.
/// The callback claims the ticket on delivery; a cancel clears it first.
#[derive(Debug, Default)]
pub struct FrameSlot(Cell<Option<FrameTicket>>);

impl FrameSlot {
    pub fn arm(&self, ticket: FrameTicket) {
        self.0.set(Some(ticket));
    }

    /// Claim the armed ticket, leaving the slot empty
    pub fn take(&self) -> Option<FrameTicket> {
        self.0.take()
    }

    /// Clear the slot if `ticket` is still armed
    pub fn disarm(&self, ticket: FrameTicket) -> bool {
        if self.0.get() == Some(ticket) {
            self.0.set(None);
            true
        } else {
            false
        }
    }
}

/// Per-step timing handed to scenes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// 1-based count of steps run since start; motion is tuned per frame
    pub index: u64,
    /// Host clock in milliseconds, used only for timers
    pub now_ms: f64,
}

/// Scheduler lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Stopped,
}

#[derive(Debug, Clone)]
pub struct FrameScheduler {
    state: SchedulerState,
    pending: Option<FrameTicket>,
    next_ticket: u64,
    frames: u64,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self {
            state: SchedulerState::Idle,
            pending: None,
            next_ticket: 1,
            frames: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    /// Steps run so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Begin requesting frames. No-op (returns false) when the surface is
    /// not ready or the loop is already running.
    pub fn start<H: FrameHost + ?Sized>(&mut self, host: &mut H, surface_ready: bool) -> bool {
        if !surface_ready {
            log::debug!("Frame scheduler not started: surface unavailable");
            return false;
        }
        if self.is_running() {
            return false;
        }
        self.state = SchedulerState::Running;
        self.request(host);
        log::debug!("Frame scheduler started");
        true
    }

    /// Accept a delivered frame. Returns `None` for stale or unwanted tickets.
    pub fn begin_frame(&mut self, ticket: FrameTicket, now_ms: f64) -> Option<Frame> {
        if !self.is_running() || self.pending != Some(ticket) {
            return None;
        }
        self.pending = None;
        self.frames += 1;
        Some(Frame {
            index: self.frames,
            now_ms,
        })
    }

    /// Request the next frame if still running
    pub fn finish_frame<H: FrameHost + ?Sized>(&mut self, host: &mut H) {
        if self.is_running() && self.pending.is_none() {
            self.request(host);
        }
    }

    /// Stop the loop and withdraw any pending request. Idempotent.
    pub fn stop<H: FrameHost + ?Sized>(&mut self, host: &mut H) {
        if let Some(ticket) = self.pending.take() {
            host.cancel_frame(ticket);
        }
        if self.state == SchedulerState::Running {
            log::debug!("Frame scheduler stopped after {} frames", self.frames);
        }
        self.state = SchedulerState::Stopped;
    }

    fn request<H: FrameHost + ?Sized>(&mut self, host: &mut H) {
        let ticket = FrameTicket(self.next_ticket);
        self.next_ticket += 1;
        self.pending = Some(ticket);
        host.request_frame(ticket);
    }
}
