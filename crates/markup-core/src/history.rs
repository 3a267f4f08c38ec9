//! Linear undo/redo history over full shape-list snapshots.

use crate::shapes::Shape;

/// Snapshot log with a cursor marking the current state.
///
/// There is always at least one snapshot: the state the canvas was opened with.
/// Recording after an undo discards everything past the cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    snapshots: Vec<Vec<Shape>>,
    cursor: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl History {
    /// Start a history whose first snapshot is `initial`.
    pub fn new(initial: Vec<Shape>) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
        }
    }

    /// Record a new state, pruning any redo branch first.
    pub fn snapshot(&mut self, shapes: &[Shape]) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(shapes.to_vec());
        self.cursor = self.snapshots.len() - 1;
    }

    /// Step back one snapshot. Returns `None` at the oldest snapshot.
    pub fn undo(&mut self) -> Option<&[Shape]> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        log::debug!("History undo -> {}/{}", self.cursor, self.snapshots.len());
        Some(&self.snapshots[self.cursor])
    }

    /// Step forward one snapshot. Returns `None` at the newest snapshot.
    pub fn redo(&mut self) -> Option<&[Shape]> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        log::debug!("History redo -> {}/{}", self.cursor, self.snapshots.len());
        Some(&self.snapshots[self.cursor])
    }

    /// The snapshot at the cursor.
    pub fn current(&self) -> &[Shape] {
        &self.snapshots[self.cursor]
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Number of snapshots in the log.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeStyle;
    use kurbo::{Point, Size};

    fn rect(n: f64) -> Shape {
        Shape::rectangle(Point::new(n, n), Size::new(n, n), ShapeStyle::default())
    }

    /// Build a history with `n` commits, returning the list after each commit.
    fn committed(n: usize) -> (History, Vec<Vec<Shape>>) {
        let mut history = History::default();
        let mut shapes = Vec::new();
        let mut states = vec![Vec::new()];
        for i in 0..n {
            shapes.push(rect(i as f64));
            history.snapshot(&shapes);
            states.push(shapes.clone());
        }
        (history, states)
    }

    #[test]
    fn test_initial_state() {
        let mut history = History::default();
        assert_eq!(history.len(), 1);
        assert!(history.current().is_empty());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_seeded_history() {
        let seed = vec![rect(1.0), rect(2.0)];
        let mut history = History::new(seed.clone());
        assert_eq!(history.current(), seed.as_slice());
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let n = 5;
        for k in 0..=n {
            let (mut history, states) = committed(n);
            let before = history.current().to_vec();
            for step in 1..=k {
                let restored = history.undo().unwrap().to_vec();
                assert_eq!(restored, states[n - step]);
            }
            for _ in 0..k {
                history.redo().unwrap();
            }
            assert_eq!(history.current(), before.as_slice());
            assert!(!history.can_redo());
        }
    }

    #[test]
    fn test_snapshot_after_undo_prunes_redo() {
        let (mut history, _) = committed(1);
        history.undo().unwrap();
        assert!(history.can_redo());

        let replacement = vec![rect(9.0)];
        history.snapshot(&replacement);
        assert_eq!(history.len(), 2);
        assert_eq!(history.cursor(), 1);
        assert!(!history.can_redo());
        assert!(history.redo().is_none());
        assert_eq!(history.current(), replacement.as_slice());
    }

    #[test]
    fn test_snapshots_are_copies() {
        let mut history = History::default();
        let mut shapes = vec![rect(1.0)];
        history.snapshot(&shapes);
        shapes[0].origin = Point::new(99.0, 99.0);
        assert_eq!(history.current()[0].origin, Point::new(1.0, 1.0));
    }
}
