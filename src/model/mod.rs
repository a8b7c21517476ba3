//! Data models for overlay buttons.

mod button;

pub use button::{
    validate_size, ButtonEntry, ButtonModel, Transform, DEFAULT_BUTTON_SIZE, MAX_BUTTON_SIZE,
    MIN_BUTTON_SIZE, NEW_BUTTON_POSITION,
};
