use std::sync::atomic::{AtomicUsize, Ordering};

/// Tracks the global item cap shared by every seed URL of a run
///
/// Claims are made with a compare-and-swap loop, so the cap stays exact even
/// if several page cursors draw from the same budget.
#[derive(Debug)]
pub struct ItemBudget {
    /// Maximum number of records the run may emit
    max_items: usize,

    /// Records emitted so far
    collected: AtomicUsize,
}

impl ItemBudget {
    /// Creates a budget allowing `max_items` records
    pub fn new(max_items: usize) -> Self {
        Self {
            max_items,
            collected: AtomicUsize::new(0),
        }
    }

    /// Claims one slot for a record about to be emitted
    ///
    /// Returns `false` if the cap has already been reached.
    pub fn try_claim(&self) -> bool {
        self.collected
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.max_items).then_some(n + 1)
            })
            .is_ok()
    }

    /// Checks if the cap has been reached
    pub fn is_exhausted(&self) -> bool {
        self.collected.load(Ordering::Acquire) >= self.max_items
    }

    /// Returns the number of records claimed so far
    pub fn collected(&self) -> usize {
        self.collected.load(Ordering::Acquire)
    }

    /// Returns the number of records that may still be emitted
    pub fn remaining(&self) -> usize {
        self.max_items.saturating_sub(self.collected())
    }

    /// Returns the configured cap
    pub fn max_items(&self) -> usize {
        self.max_items
    }
}
