use std::collections::VecDeque;

use super::raster::Raster;

/// Bounded stack of raster snapshots; the oldest entry is dropped on overflow
#[derive(Debug, Clone)]
pub struct UndoStack {
    snapshots: VecDeque<Raster>,
    capacity: usize,
}

impl UndoStack {
    pub fn new(capacity: usize) -> Self {
        Self {
            snapshots: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, snapshot: Raster) {
        if self.capacity == 0 {
            return;
        }
        if self.snapshots.len() == self.capacity {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(snapshot);
    }

    pub fn pop(&mut self) -> Option<Raster> {
        self.snapshots.pop_back()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::color::Color;

    fn marked(value: u8) -> Raster {
        Raster::new(1, 1, Color::rgb(value, 0, 0))
    }

    #[test]
    fn test_lifo_order() {
        let mut stack = UndoStack::new(5);
        stack.push(marked(1));
        stack.push(marked(2));
        assert_eq!(stack.pop(), Some(marked(2)));
        assert_eq!(stack.pop(), Some(marked(1)));
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn test_overflow_drops_oldest() {
        let mut stack = UndoStack::new(20);
        for i in 0..25 {
            stack.push(marked(i));
        }
        assert_eq!(stack.len(), 20);

        let mut last = None;
        while let Some(snapshot) = stack.pop() {
            last = Some(snapshot);
        }
        // Snapshots 0..5 were evicted
        assert_eq!(last, Some(marked(5)));
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut stack = UndoStack::new(0);
        stack.push(marked(1));
        assert!(stack.is_empty());
    }
}
