//! Flap position mapping.
//!
//! A split-flap wheel shows one label per position. [`FlapDisplay`] maps
//! labels onto motor steps and only ever drives the wheel forward, because
//! flaps fall past a mechanical stop and cannot be wound back.

mod labels;
mod mapper;

pub use labels::{Label, LabelTable, MAX_LABELS, MAX_LABEL_LEN};
pub use mapper::{FlapDisplay, FlapMove};

/// Reserved label for an empty/idle wheel.
pub const BLANK_LABEL: &str = "_";
