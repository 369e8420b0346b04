//! Snapshot-based undo/redo.

use crate::design::Design;
use crate::layer::Layer;
use crate::shapes::Path;
use std::collections::VecDeque;

/// Maximum number of undo states to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// A deep copy of the editable state of a design.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    layers: Vec<Layer>,
    paths: Vec<Path>,
}

impl Snapshot {
    /// Copy the current layers and paths out of a design.
    pub fn capture(design: &Design) -> Self {
        Self {
            layers: design.layers.clone(),
            paths: design.paths.clone(),
        }
    }

    pub(crate) fn restore(self, design: &mut Design) {
        design.layers = self.layers;
        design.paths = self.paths;
    }
}

/// Undo and redo stacks of snapshots.
///
/// Every new action clears the redo stack, so there is never more than one
/// timeline.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<Snapshot>,
    redo_stack: Vec<Snapshot>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self::with_limit(MAX_UNDO_HISTORY)
    }

    /// Create a history bounded at `limit` undo entries (at least one).
    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Record the current state of `design` (call before making changes).
    pub fn snapshot(&mut self, design: &Design) {
        self.record(Snapshot::capture(design));
    }

    /// Record a snapshot captured earlier, e.g. at the start of a gesture.
    pub fn record(&mut self, snapshot: Snapshot) {
        self.push_undo(snapshot);
        self.redo_stack.clear();
    }

    fn push_undo(&mut self, snapshot: Snapshot) {
        self.undo_stack.push_back(snapshot);
        while self.undo_stack.len() > self.limit {
            self.undo_stack.pop_front();
        }
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self, design: &mut Design) -> bool {
        let Some(snapshot) = self.undo_stack.pop_back() else {
            return false;
        };
        self.redo_stack.push(Snapshot::capture(design));
        snapshot.restore(design);
        true
    }

    /// Redo the last undone change.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self, design: &mut Design) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        self.push_undo(Snapshot::capture(design));
        snapshot.restore(design);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drop all history, e.g. after loading another design.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Shape, ShapeKind};
    use kurbo::{Point, Size};

    fn add_square(design: &mut Design, x: f64) {
        let layer = design.base_layer().id();
        let shape = Shape::new(ShapeKind::Rectangle, Point::new(x, 0.0), Size::new(10.0, 10.0));
        design.add_shape(layer, shape);
    }

    #[test]
    fn test_undo_add_shape() {
        let mut design = Design::new();
        let mut history = History::new();

        history.snapshot(&design);
        add_square(&mut design, 0.0);
        assert!(history.can_undo());

        assert!(history.undo(&mut design));
        assert!(design.is_empty());
        assert!(history.can_redo());

        assert!(history.redo(&mut design));
        assert_eq!(design.shape_count(), 1);
    }

    #[test]
    fn test_undo_clears_redo() {
        let mut design = Design::new();
        let mut history = History::new();

        history.snapshot(&design);
        add_square(&mut design, 0.0);
        assert!(history.undo(&mut design));
        assert!(history.can_redo());

        history.snapshot(&design);
        add_square(&mut design, 20.0);
        assert!(!history.can_redo());
        assert!(!history.redo(&mut design));
    }

    #[test]
    fn test_undo_empty_stack() {
        let mut design = Design::new();
        let before = design.clone();
        let mut history = History::new();

        assert!(!history.undo(&mut design));
        assert!(!history.redo(&mut design));
        assert_eq!(design, before);
    }

    #[test]
    fn test_limit_discards_oldest() {
        let mut design = Design::new();
        let mut history = History::with_limit(3);
        for i in 0..5 {
            history.snapshot(&design);
            add_square(&mut design, i as f64 * 20.0);
        }
        assert_eq!(history.undo_depth(), 3);

        while history.undo(&mut design) {}
        // The two oldest actions are no longer reversible.
        assert_eq!(design.shape_count(), 2);
    }

    #[test]
    fn test_snapshot_does_not_alias_live_model() {
        let mut design = Design::new();
        let mut history = History::new();
        add_square(&mut design, 0.0);
        history.snapshot(&design);

        design.layers[0].shapes[0].position = Point::new(999.0, 999.0);
        assert!(history.undo(&mut design));
        assert_eq!(design.layers[0].shapes[0].position, Point::new(0.0, 0.0));

        // The restored copy is independent of what went onto the redo stack.
        design.layers[0].shapes[0].position = Point::new(5.0, 5.0);
        assert!(history.redo(&mut design));
        assert_eq!(design.layers[0].shapes[0].position, Point::new(999.0, 999.0));
    }
}
