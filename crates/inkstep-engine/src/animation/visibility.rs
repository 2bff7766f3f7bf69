// animation/visibility.rs
//
// The single "hidden canonical stroke" toggle. While a morph overlay stands
// in for a stroke, that stroke is hidden; hiding hands out a guard that
// restores visibility on release or drop, whichever comes first.

use std::cell::Cell;
use std::rc::Rc;

/// Shared handle to the hidden-stroke toggle. Clones observe the same slot.
#[derive(Debug, Clone, Default)]
pub struct StrokeVisibility {
    slot: Rc<Cell<Option<usize>>>,
}

impl StrokeVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the stroke currently hidden, if any.
    pub fn hidden(&self) -> Option<usize> {
        self.slot.get()
    }

    pub fn is_hidden(&self, stroke: usize) -> bool {
        self.slot.get() == Some(stroke)
    }

    /// Hide `stroke`, replacing any previously hidden one.
    pub fn hide(&self, stroke: usize) -> HiddenStroke {
        self.slot.set(Some(stroke));
        HiddenStroke {
            slot: Rc::clone(&self.slot),
            stroke,
            released: false,
        }
    }
}

/// Scoped hide of one stroke.
#[derive(Debug)]
pub struct HiddenStroke {
    slot: Rc<Cell<Option<usize>>>,
    stroke: usize,
    released: bool,
}

impl HiddenStroke {
    pub fn stroke(&self) -> usize {
        self.stroke
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Restore visibility. Idempotent, and a guard never clears a slot that
    /// a newer guard has since taken over.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if self.slot.get() == Some(self.stroke) {
            self.slot.set(None);
        }
    }
}

impl Drop for HiddenStroke {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_restores() {
        let vis = StrokeVisibility::new();
        let mut guard = vis.hide(2);
        assert!(vis.is_hidden(2));
        guard.release();
        guard.release();
        assert_eq!(vis.hidden(), None);
        assert!(guard.is_released());
    }

    #[test]
    fn drop_restores() {
        let vis = StrokeVisibility::new();
        {
            let _guard = vis.hide(0);
            assert_eq!(vis.hidden(), Some(0));
        }
        assert_eq!(vis.hidden(), None);
    }

    #[test]
    fn stale_guard_leaves_newer_hide_alone() {
        let vis = StrokeVisibility::new();
        let old = vis.hide(0);
        let _new = vis.hide(1);
        drop(old);
        assert_eq!(vis.hidden(), Some(1));
    }
}
