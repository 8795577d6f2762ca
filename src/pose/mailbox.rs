//! Latest-wins pose mailbox
//!
//! The capture/inference pipeline posts results at its own cadence; the frame
//! loop takes whatever finished most recently. Single-threaded (browser main
//! thread), so the slot is shared through `Rc<RefCell<..>>`.

use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;

use super::landmark::PoseSnapshot;

#[derive(Debug, Default)]
struct Slot {
    latest: Option<Rc<PoseSnapshot>>,
    /// Results posted since the loop started
    received: u64,
    /// Failed inferences reported since the loop started
    failures: u64,
}

/// Cloneable handle to the single pose slot
#[derive(Debug, Clone, Default)]
pub struct PoseMailbox {
    slot: Rc<RefCell<Slot>>,
}

impl PoseMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the slot with a fresh result
    pub fn post(&self, snapshot: PoseSnapshot) {
        let mut slot = self.slot.borrow_mut();
        slot.latest = Some(Rc::new(snapshot));
        slot.received += 1;
    }

    /// Record a failed inference. The previous snapshot stays in place.
    pub fn report_failure(&self, error: impl Display) {
        let mut slot = self.slot.borrow_mut();
        slot.failures += 1;
        log::warn!("Pose inference failed ({} total): {}", slot.failures, error);
    }

    /// Drop the current snapshot (e.g. camera stopped)
    pub fn clear(&self) {
        self.slot.borrow_mut().latest = None;
    }

    /// Most recent snapshot, if any
    pub fn latest(&self) -> Option<Rc<PoseSnapshot>> {
        self.slot.borrow().latest.clone()
    }

    pub fn received(&self) -> u64 {
        self.slot.borrow().received
    }

    pub fn failures(&self) -> u64 {
        self.slot.borrow().failures
    }
}
