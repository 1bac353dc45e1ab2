//! Headless host: frames are pumped by hand and draws are recorded
//!
//! Used by the native binary and by tests as a virtual display.

use crate::renderer::{DrawOp, Surface};
use crate::scheduler::{FrameHost, FrameTicket};

/// Frame host whose refreshes are delivered by calling `take_request`
#[derive(Debug, Clone, Default)]
pub struct ManualFrameHost {
    pending: Option<FrameTicket>,
    cancelled: Vec<FrameTicket>,
    requested: u64,
}

impl ManualFrameHost {
    /// Peek at the outstanding request
    pub fn pending(&self) -> Option<FrameTicket> {
        self.pending
    }

    /// Deliver the outstanding request, if any
    pub fn take_request(&mut self) -> Option<FrameTicket> {
        self.pending.take()
    }

    /// Requests withdrawn before delivery
    pub fn cancelled(&self) -> &[FrameTicket] {
        &self.cancelled
    }

    /// Total requests made
    pub fn requested(&self) -> u64 {
        self.requested
    }
}

impl FrameHost for ManualFrameHost {
    fn request_frame(&mut self, ticket: FrameTicket) {
        self.requested += 1;
        self.pending = Some(ticket);
    }

    fn cancel_frame(&mut self, ticket: FrameTicket) {
        if self.pending == Some(ticket) {
            self.pending = None;
        }
        self.cancelled.push(ticket);
    }
}

/// Surface that keeps every op it is asked to draw
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    size: (u32, u32),
    ops: Vec<DrawOp>,
    total: u64,
}

impl RecordingSurface {
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Every op recorded so far
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Ops drawn over the surface's lifetime
    pub fn total(&self) -> u64 {
        self.total
    }
}

impl Surface for RecordingSurface {
    fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn draw(&mut self, op: &DrawOp) {
        self.total += 1;
        self.ops.push(op.clone());
    }
}
