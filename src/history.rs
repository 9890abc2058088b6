//! Canvas history — the authoritative ordered log of accepted operations.
//!
//! DESIGN
//! ======
//! Insertion-ordered. A `Clear` truncates the log instead of being appended,
//! so any replay taken after a clear is simply empty; the clear itself still
//! reaches already-connected peers as a live event via the hub. This type
//! carries no synchronization of its own — it is mutated only under the
//! hub's lock, by a single logical writer.

use shapes::ShapeOp;

pub struct CanvasHistory {
    ops: Vec<ShapeOp>,
}

impl CanvasHistory {
    #[must_use]
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// Apply one accepted operation: truncate on `Clear`, append otherwise.
    pub fn apply(&mut self, op: &ShapeOp) {
        if op.is_clear() {
            self.ops.clear();
        } else {
            self.ops.push(op.clone());
        }
    }

    /// Ordered copy of the current log, used to replay to a new subscriber.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ShapeOp> {
        self.ops.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl Default for CanvasHistory {
    fn default() -> Self {
        Self::new()
    }
}
