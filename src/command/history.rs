use crate::layer::Layer;

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Linear undo/redo over full snapshots of the layer sequence.
///
/// `snapshots[index]` is always the layer sequence currently shown, so the
/// tracker is never empty and `index` stays in `0..snapshots.len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    snapshots: Vec<Vec<Layer>>,
    index: usize,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl History {
    /// Creates a history whose only snapshot is `initial`
    pub fn new(initial: Vec<Layer>) -> Self {
        Self::with_limit(initial, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_limit(initial: Vec<Layer>, limit: usize) -> Self {
        Self {
            snapshots: vec![initial],
            index: 0,
            limit: limit.max(1),
        }
    }

    /// Push the post-mutation layers, dropping any redo tail.
    pub fn record(&mut self, layers: &[Layer]) {
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push(layers.to_vec());

        // Over the cap: forget the oldest state
        if self.snapshots.len() > self.limit {
            let excess = self.snapshots.len() - self.limit;
            self.snapshots.drain(..excess);
        }
        self.index = self.snapshots.len() - 1;
    }

    /// Step back one snapshot. Returns the snapshot to restore, or `None` at the start.
    pub fn undo(&mut self) -> Option<&[Layer]> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(&self.snapshots[self.index])
    }

    /// Step forward one snapshot. Returns `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Option<&[Layer]> {
        if self.index + 1 >= self.snapshots.len() {
            return None;
        }
        self.index += 1;
        Some(&self.snapshots[self.index])
    }

    /// Returns true if there are snapshots that can be undone
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    /// Returns true if there are snapshots that can be redone
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn current(&self) -> &[Layer] {
        &self.snapshots[self.index]
    }
}
