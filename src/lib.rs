//! Playmap Overlay - button overlay editor for PlayCover-style keymaps
//!
//! Loads a property-list or JSON keymap, projects its `buttonModels` onto a
//! background image, and lets the user drag, rebind, resize, add and delete
//! buttons before saving the document back out.

pub mod config;
pub mod controller;
pub mod document;
pub mod error;
pub mod keycodes;
pub mod model;
pub mod platform;
pub mod raster;
pub mod render;
pub mod session;

pub use config::{ConfigError, EditorConfig, LogLevel};
pub use controller::{AppState, Dialog, DialogAction, Event, InteractionController, InteractionState};
pub use document::{Document, DocumentFormat, Value};
pub use error::{EditorError, ValidationError};
pub use keycodes::{KeyCodeTable, ResolvedKey};
pub use model::{ButtonEntry, ButtonModel, Transform};
pub use platform::NativeDialogs;
pub use raster::RasterDecoder;
pub use render::{CanvasGeometry, OverlayRenderer, Point};
pub use session::{Editor, Session};
