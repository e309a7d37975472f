// Input handler module for pointer gestures and window chrome interaction
// Handles drag-vs-click recognition, title-bar dragging, resizing, and control buttons

pub mod types;
pub mod gesture;
pub mod chrome;

pub use chrome::{ChromeCommand, ChromeController, ChromeHit, ChromeLayout, ChromePart, ChromeRelease};
pub use gesture::{ClickTracker, GestureEnd, PressGesture};
pub use types::*;
