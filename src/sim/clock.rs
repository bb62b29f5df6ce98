//! Host services: time source and frame scheduling
//!
//! The core never reads wall-clock time or owns a timer. Hosts inject a
//! `Clock` and a `FrameScheduler`; tests use the manual versions below.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Instant;

/// Monotonic milliseconds
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Real time since construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Clock advanced by hand. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Identifies one requested frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Host per-frame callback source (e.g. display refresh)
pub trait FrameScheduler {
    /// Ask for one callback; the host later calls `Engine::on_frame` with the handle
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Debug, Default)]
struct QueueState {
    next_id: u64,
    pending: Vec<FrameHandle>,
    requested: u64,
    cancelled: u64,
}

/// In-process scheduler. Clones share one queue so a host loop can pull due
/// frames while the engine owns its own handle to the scheduler.
#[derive(Debug, Clone, Default)]
pub struct FrameQueue {
    inner: Rc<RefCell<QueueState>>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Oldest outstanding callback, removed from the queue
    pub fn next_due(&self) -> Option<FrameHandle> {
        let mut inner = self.inner.borrow_mut();
        if inner.pending.is_empty() {
            None
        } else {
            Some(inner.pending.remove(0))
        }
    }

    /// Callbacks requested but not yet delivered or cancelled
    pub fn outstanding(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    pub fn requested(&self) -> u64 {
        self.inner.borrow().requested
    }

    pub fn cancelled(&self) -> u64 {
        self.inner.borrow().cancelled
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameHandle {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        inner.requested += 1;
        let handle = FrameHandle(inner.next_id);
        inner.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let mut inner = self.inner.borrow_mut();
        let before = inner.pending.len();
        inner.pending.retain(|&h| h != handle);
        if inner.pending.len() != before {
            inner.cancelled += 1;
        }
    }
}
