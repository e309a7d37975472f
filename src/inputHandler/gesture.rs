// Press / track / release recognition shared by every draggable desktop element.
// A press either ends as a click or as a drag, never both.

use std::time::{Duration, Instant};

use crate::state::geometry::Position;

/// How a press ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEnd {
    /// Released without moving past the threshold
    Click(Position),
    /// Moved past the threshold before release
    DragEnd { from: Position, to: Position },
}

/// Tracks one press until release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressGesture {
    origin: Position,
    threshold: i32,
    dragging: bool,
}

impl PressGesture {
    pub fn new(origin: Position, threshold: i32) -> Self {
        Self {
            origin,
            threshold,
            dragging: false,
        }
    }

    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Feed a pointer move. Returns the offset from the press origin once the
    /// gesture has become a drag; once dragging it stays dragging.
    pub fn track(&mut self, point: Position) -> Option<(i32, i32)> {
        let (dx, dy) = point.delta_from(self.origin);
        if !self.dragging && (dx.abs() > self.threshold || dy.abs() > self.threshold) {
            self.dragging = true;
        }
        self.dragging.then_some((dx, dy))
    }

    pub fn release(mut self, point: Position) -> GestureEnd {
        self.track(point);
        if self.dragging {
            GestureEnd::DragEnd {
                from: self.origin,
                to: point,
            }
        } else {
            GestureEnd::Click(self.origin)
        }
    }
}

/// Detects two clicks on the same target within a time window
#[derive(Debug, Clone)]
pub struct ClickTracker {
    window: Duration,
    last: Option<(String, Instant)>,
}

impl ClickTracker {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Register a click on `target`. Returns true when it completes a double click.
    pub fn click(&mut self, target: &str, now: Instant) -> bool {
        let is_double = match &self.last {
            Some((last_target, at)) => {
                last_target == target && now.saturating_duration_since(*at) <= self.window
            }
            None => false,
        };

        // A completed double click does not count as the first half of the next one
        self.last = if is_double {
            None
        } else {
            Some((target.to_string(), now))
        };
        is_double
    }
}
