//! Polled timers: a chained phase sequencer and a repeating interval
//!
//! Both are driven by whatever clock the caller passes in (host milliseconds
//! in the browser, a virtual clock in tests). `cancel` is final: nothing
//! fires afterwards, whatever time is polled.

use std::collections::VecDeque;

/// What a step's delay is measured from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The previous step firing (or `start` for the first step)
    AfterPrevious,
    /// The next `signal` call after the previous step fired
    AfterSignal,
}

/// One timed step in a sequence
#[derive(Debug, Clone, PartialEq)]
pub struct Step<A> {
    pub delay_ms: f64,
    pub trigger: Trigger,
    pub action: A,
}

impl<A> Step<A> {
    pub fn after(delay_ms: f64, action: A) -> Self {
        Self {
            delay_ms,
            trigger: Trigger::AfterPrevious,
            action,
        }
    }

    pub fn after_signal(delay_ms: f64, action: A) -> Self {
        Self {
            delay_ms,
            trigger: Trigger::AfterSignal,
            action,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Arming {
    /// `start` not called yet
    Unstarted,
    /// Head step fires at this time
    Due(f64),
    /// Head step waits for `signal`
    AwaitingSignal,
    /// No steps left
    Finished,
    Cancelled,
}

/// Ordered `(delay, action)` steps consumed one at a time, each armed
/// relative to the previous firing, under a single cancellation.
#[derive(Debug, Clone)]
pub struct PhaseSequencer<A> {
    steps: VecDeque<Step<A>>,
    arming: Arming,
}

impl<A> PhaseSequencer<A> {
    pub fn new(steps: impl IntoIterator<Item = Step<A>>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            arming: Arming::Unstarted,
        }
    }

    /// Arm the first step. Ignored unless unstarted.
    pub fn start(&mut self, now_ms: f64) {
        if self.arming == Arming::Unstarted {
            self.arm_head(now_ms, true);
        }
    }

    /// Arm the head step if it is waiting for a signal
    pub fn signal(&mut self, now_ms: f64) {
        if self.arming == Arming::AwaitingSignal {
            if let Some(step) = self.steps.front() {
                self.arming = Arming::Due(now_ms + step.delay_ms);
            }
        }
    }

    /// Fire the head step if due. Call repeatedly to drain steps that are
    /// due at the same instant.
    pub fn poll(&mut self, now_ms: f64) -> Option<A> {
        let Arming::Due(deadline) = self.arming else {
            return None;
        };
        if now_ms < deadline {
            return None;
        }
        let step = self.steps.pop_front()?;
        self.arm_head(now_ms, false);
        Some(step.action)
    }

    /// Drop every pending step. Idempotent.
    pub fn cancel(&mut self) {
        if self.arming != Arming::Cancelled {
            self.steps.clear();
            self.arming = Arming::Cancelled;
        }
    }

    /// Steps not yet fired
    pub fn pending(&self) -> usize {
        self.steps.len()
    }

    pub fn is_cancelled(&self) -> bool {
        self.arming == Arming::Cancelled
    }

    pub fn is_finished(&self) -> bool {
        self.arming == Arming::Finished
    }

    /// Time the head step fires, if armed
    pub fn next_deadline(&self) -> Option<f64> {
        match self.arming {
            Arming::Due(t) => Some(t),
            _ => None,
        }
    }

    fn arm_head(&mut self, from_ms: f64, first: bool) {
        self.arming = match self.steps.front() {
            None => Arming::Finished,
            // The first step counts from start regardless of its trigger
            Some(step) if first || step.trigger == Trigger::AfterPrevious => {
                Arming::Due(from_ms + step.delay_ms)
            }
            Some(_) => Arming::AwaitingSignal,
        };
    }
}

/// A repeating timer, like `setInterval`. A poll that is several periods
/// late fires once and realigns to the original cadence.
#[derive(Debug, Clone)]
pub struct Interval {
    period_ms: f64,
    next_due: Option<f64>,
    cancelled: bool,
}

impl Interval {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms,
            next_due: None,
            cancelled: false,
        }
    }

    pub fn start(&mut self, now_ms: f64) {
        if !self.cancelled && self.next_due.is_none() {
            self.next_due = Some(now_ms + self.period_ms);
        }
    }

    /// True if a tick is due at `now_ms`
    pub fn poll(&mut self, now_ms: f64) -> bool {
        if self.cancelled || self.period_ms <= 0.0 {
            return false;
        }
        let Some(mut due) = self.next_due else {
            return false;
        };
        if now_ms < due {
            return false;
        }
        while due <= now_ms {
            due += self.period_ms;
        }
        self.next_due = Some(due);
        true
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.next_due = None;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}
