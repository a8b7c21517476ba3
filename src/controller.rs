//! Pointer, keyboard and dialog handling for the overlay.
//!
//! All input arrives as [`Event`]s, either handled directly with
//! [`InteractionController::handle`] or queued and drained with
//! [`InteractionController::process`]. Every mutation happens inside a
//! transition and is followed by a full overlay redraw.
//!
//! ```text
//! Idle ──press on button──▶ Dragging ──release──▶ Idle (position committed)
//! Idle ──double click on button──▶ DialogOpen(EditMenu) ──▶ sub-dialog ──▶ Idle
//! Idle ──AddButton──▶ DialogOpen(KeyCapture) ──confirm──▶ Idle (button appended)
//! ```

use std::collections::VecDeque;

use crate::config::{EditorConfig, InteractionConfig};
use crate::document::Document;
use crate::error::ValidationError;
use crate::keycodes::{KeyCodeTable, ResolvedKey};
use crate::model::{validate_size, ButtonModel, DEFAULT_BUTTON_SIZE};
use crate::render::{CanvasGeometry, OverlayRenderer, Point};

/// Everything the controller mutates.
#[derive(Debug, Clone)]
pub struct AppState {
    pub document: Document,
    pub renderer: OverlayRenderer,
    pub config: InteractionConfig,
    /// Set by any document edit, cleared by the caller after saving.
    pub modified: bool,
}

impl AppState {
    /// Build the state and draw the initial overlay.
    pub fn new(document: Document, geometry: CanvasGeometry, config: &EditorConfig) -> Self {
        let mut state = Self {
            document,
            renderer: OverlayRenderer::new(geometry, config.overlay.label_metrics()),
            config: config.interaction,
            modified: false,
        };
        state.rerender();
        state
    }

    /// Clear and redraw every button.
    pub fn rerender(&mut self) {
        self.renderer.render(&self.document);
    }

    fn commit(&mut self) {
        self.modified = true;
        self.rerender();
    }
}

/// Input delivered to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Primary pointer button pressed. `timestamp_ms` is the host event time.
    PointerPressed { position: Point, timestamp_ms: u64 },
    PointerMoved { position: Point },
    PointerReleased { position: Point },
    /// A key (or mouse button named by its key identifier, e.g. `LMB`) pressed.
    KeyPressed { identifier: String, raw_code: i64 },
    /// The user asked to add a new button.
    AddButton,
    /// Action in the open dialog.
    Dialog(DialogAction),
    /// The background image was replaced and the canvas now has this size.
    CanvasReplaced { width: f64, height: f64 },
}

/// Actions available inside dialogs.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogAction {
    // Edit menu entries
    Rename,
    RecaptureKey,
    Resize,
    Delete,

    /// Text field contents changed
    InputChanged(String),
    Confirm,
    Cancel,
}

/// Why a key-capture dialog is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePurpose {
    /// Rebind the button at this index
    Recapture(usize),
    /// Append a new button bound to the captured key
    AddButton,
}

/// An open modal dialog and its scratch values.
#[derive(Debug, Clone, PartialEq)]
pub enum Dialog {
    /// Choice of rename, recapture, resize or delete for one button.
    EditMenu { index: usize },
    /// Free-form label edit.
    Rename { index: usize, text: String },
    /// Waits for the next key press. Cannot be confirmed until a key arrives.
    KeyCapture {
        purpose: CapturePurpose,
        captured: Option<ResolvedKey>,
    },
    /// Numeric size entry. `error` is shown inline until the input changes.
    Resize {
        index: usize,
        input: String,
        error: Option<ValidationError>,
    },
}

impl Dialog {
    /// Whether the confirm action is enabled.
    pub fn can_confirm(&self) -> bool {
        match self {
            Dialog::EditMenu { .. } => false,
            Dialog::KeyCapture { captured, .. } => captured.is_some(),
            Dialog::Rename { .. } | Dialog::Resize { .. } => true,
        }
    }

    /// Button the dialog edits, if any.
    pub fn target(&self) -> Option<usize> {
        match self {
            Dialog::EditMenu { index }
            | Dialog::Rename { index, .. }
            | Dialog::Resize { index, .. } => Some(*index),
            Dialog::KeyCapture { purpose, .. } => match purpose {
                CapturePurpose::Recapture(index) => Some(*index),
                CapturePurpose::AddButton => None,
            },
        }
    }
}

/// Controller state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    /// Waiting for input.
    #[default]
    Idle,
    /// A button follows the pointer. Nothing is written until release.
    Dragging {
        index: usize,
        /// Pointer position at the press
        origin: Point,
        /// Pointer position at the previous move
        last: Point,
        /// Set once the pointer leaves the double-click radius around `origin`
        moved: bool,
    },
    /// A modal dialog owns all input.
    DialogOpen(Dialog),
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, InteractionState::Dragging { .. })
    }
}

/// Last press seen while idle, for double-click detection.
#[derive(Debug, Clone, Copy)]
struct PressRecord {
    position: Point,
    timestamp_ms: u64,
}

/// Drives [`InteractionState`] from [`Event`]s.
#[derive(Debug, Default)]
pub struct InteractionController {
    state: InteractionState,
    queue: VecDeque<Event>,
    last_press: Option<PressRecord>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// The open dialog, if any.
    pub fn dialog(&self) -> Option<&Dialog> {
        match &self.state {
            InteractionState::DialogOpen(dialog) => Some(dialog),
            _ => None,
        }
    }

    /// Queue an event for the next [`process`](Self::process) call.
    pub fn push(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    /// Handle queued events in order. Returns true if any of them edited the document.
    pub fn process(&mut self, app: &mut AppState) -> bool {
        let mut changed = false;
        while let Some(event) = self.queue.pop_front() {
            changed |= self.handle(app, event);
        }
        changed
    }

    /// Handle one event. Returns true if the document was edited.
    pub fn handle(&mut self, app: &mut AppState, event: Event) -> bool {
        log::trace!("{:?} in {:?}", event, self.state);

        match event {
            Event::CanvasReplaced { width, height } => {
                self.replace_canvas(app, CanvasGeometry::new(width, height));
                false
            }
            Event::PointerPressed {
                position,
                timestamp_ms,
            } => {
                self.pointer_pressed(app, position, timestamp_ms);
                false
            }
            Event::PointerMoved { position } => {
                self.pointer_moved(app, position);
                false
            }
            Event::PointerReleased { position } => self.pointer_released(app, position),
            Event::KeyPressed {
                identifier,
                raw_code,
            } => {
                self.key_pressed(&identifier, raw_code);
                false
            }
            Event::AddButton => {
                self.add_button(app);
                false
            }
            Event::Dialog(action) => self.dialog_action(app, action),
        }
    }

    // ========================================================================
    // Pointer
    // ========================================================================

    fn pointer_pressed(&mut self, app: &mut AppState, position: Point, timestamp_ms: u64) {
        if !self.state.is_idle() || !app.config.editable {
            return;
        }

        let hit = app.renderer.hit_test(position, app.config.hit_tolerance);
        let double_click = self.is_double_click(&app.config, position, timestamp_ms);

        match (hit, double_click) {
            (Some(hit), true) => {
                self.last_press = None;
                log::debug!("Opening edit menu for button {}", hit.index);
                self.state = InteractionState::DialogOpen(Dialog::EditMenu { index: hit.index });
            }
            (Some(hit), false) => {
                self.last_press = Some(PressRecord {
                    position,
                    timestamp_ms,
                });
                log::debug!("Dragging button {} ({:?})", hit.index, hit.part);
                self.state = InteractionState::Dragging {
                    index: hit.index,
                    origin: position,
                    last: position,
                    moved: false,
                };
            }
            (None, _) => {
                self.last_press = Some(PressRecord {
                    position,
                    timestamp_ms,
                });
            }
        }
    }

    fn is_double_click(&self, config: &InteractionConfig, position: Point, timestamp_ms: u64) -> bool {
        self.last_press.is_some_and(|last| {
            timestamp_ms.saturating_sub(last.timestamp_ms) <= config.double_click_interval_ms
                && last.position.distance_to(&position) <= config.double_click_distance
        })
    }

    fn pointer_moved(&mut self, app: &mut AppState, position: Point) {
        if let InteractionState::Dragging {
            index,
            origin,
            last,
            moved,
        } = &mut self.state
        {
            let dx = position.x - last.x;
            let dy = position.y - last.y;
            if dx == 0.0 && dy == 0.0 {
                return;
            }
            log::trace!("Drag button {} by ({}, {})", index, dx, dy);
            app.renderer.translate(*index, dx, dy);
            *last = position;
            if origin.distance_to(&position) > app.config.double_click_distance {
                *moved = true;
            }
        }
    }

    fn pointer_released(&mut self, app: &mut AppState, position: Point) -> bool {
        if !self.state.is_dragging() {
            return false;
        }
        self.pointer_moved(app, position);

        let InteractionState::Dragging {
            index,
            origin,
            last,
            moved,
        } = std::mem::take(&mut self.state)
        else {
            return false;
        };

        if !moved {
            // Jitter within the click radius is not a drag
            if last != origin {
                app.rerender();
            }
            return false;
        }

        // The press after a real drag starts a new click sequence
        self.last_press = None;

        let Some((x_coord, y_coord)) = app.renderer.normalized_center(index) else {
            app.rerender();
            return false;
        };
        let Some(model) = app.document.button_mut(index) else {
            log::warn!("Dragged button {} no longer exists", index);
            app.rerender();
            return false;
        };

        model.set_position(x_coord, y_coord);
        log::info!(
            "Moved button {} to ({:.4}, {:.4})",
            index,
            x_coord,
            y_coord
        );
        app.commit();
        true
    }

    fn replace_canvas(&mut self, app: &mut AppState, geometry: CanvasGeometry) {
        if self.state.is_dragging() {
            log::debug!("Canvas replaced mid-drag, dropping uncommitted move");
            self.state = InteractionState::Idle;
        }
        self.last_press = None;
        app.renderer.set_geometry(geometry);
        app.rerender();
    }

    // ========================================================================
    // Keyboard and dialogs
    // ========================================================================

    fn key_pressed(&mut self, identifier: &str, raw_code: i64) {
        if let InteractionState::DialogOpen(Dialog::KeyCapture { captured, .. }) = &mut self.state
        {
            let key = KeyCodeTable::global().resolve(identifier, raw_code);
            log::debug!("Captured '{}' as {} ({})", identifier, key.code, key.name);
            *captured = Some(key);
        }
    }

    fn add_button(&mut self, app: &AppState) {
        if !self.state.is_idle() || !app.config.editable {
            return;
        }
        self.state = InteractionState::DialogOpen(Dialog::KeyCapture {
            purpose: CapturePurpose::AddButton,
            captured: None,
        });
    }

    fn dialog_action(&mut self, app: &mut AppState, action: DialogAction) -> bool {
        if !matches!(self.state, InteractionState::DialogOpen(_)) {
            return false;
        }
        let InteractionState::DialogOpen(dialog) = std::mem::take(&mut self.state) else {
            return false;
        };

        if action == DialogAction::Cancel {
            log::debug!("Dialog {:?} cancelled", dialog);
            return false;
        }

        let (next, changed) = match dialog {
            Dialog::EditMenu { index } => Self::edit_menu(app, index, action),
            Dialog::Rename { index, text } => Self::rename(app, index, text, action),
            Dialog::KeyCapture { purpose, captured } => {
                Self::key_capture(app, purpose, captured, action)
            }
            Dialog::Resize {
                index,
                input,
                error,
            } => Self::resize(app, index, input, error, action),
        };

        self.state = match next {
            Some(dialog) => InteractionState::DialogOpen(dialog),
            None => InteractionState::Idle,
        };
        changed
    }

    fn edit_menu(app: &mut AppState, index: usize, action: DialogAction) -> (Option<Dialog>, bool) {
        let Some(model) = app.document.button(index) else {
            log::warn!("Edit menu target {} no longer exists", index);
            return (None, false);
        };

        let next = match action {
            DialogAction::Rename => Some(Dialog::Rename {
                index,
                text: model.key_name.clone().unwrap_or_default(),
            }),
            DialogAction::RecaptureKey => Some(Dialog::KeyCapture {
                purpose: CapturePurpose::Recapture(index),
                captured: None,
            }),
            DialogAction::Resize => {
                let size = model
                    .transform
                    .as_ref()
                    .map_or(DEFAULT_BUTTON_SIZE, |t| t.size);
                Some(Dialog::Resize {
                    index,
                    input: size.to_string(),
                    error: None,
                })
            }
            DialogAction::Delete => {
                let removed = app.document.remove(index).is_some();
                if removed {
                    log::info!("Deleted button {}", index);
                    app.commit();
                }
                return (None, removed);
            }
            _ => Some(Dialog::EditMenu { index }),
        };
        (next, false)
    }

    fn rename(
        app: &mut AppState,
        index: usize,
        text: String,
        action: DialogAction,
    ) -> (Option<Dialog>, bool) {
        match action {
            DialogAction::InputChanged(text) => (Some(Dialog::Rename { index, text }), false),
            DialogAction::Confirm => match app.document.button_mut(index) {
                Some(model) => {
                    log::info!("Renamed button {} to '{}'", index, text);
                    model.key_name = Some(text);
                    app.commit();
                    (None, true)
                }
                None => {
                    log::warn!("Rename target {} no longer exists", index);
                    (None, false)
                }
            },
            _ => (Some(Dialog::Rename { index, text }), false),
        }
    }

    fn key_capture(
        app: &mut AppState,
        purpose: CapturePurpose,
        captured: Option<ResolvedKey>,
        action: DialogAction,
    ) -> (Option<Dialog>, bool) {
        let key = match (action, captured) {
            (DialogAction::Confirm, Some(key)) => key,
            (_, captured) => return (Some(Dialog::KeyCapture { purpose, captured }), false),
        };

        match purpose {
            CapturePurpose::AddButton => {
                let index = app.document.push(ButtonModel::from_key(&key));
                log::info!("Added button {} for {} ({})", index, key.name, key.code);
            }
            CapturePurpose::Recapture(index) => match app.document.button_mut(index) {
                Some(model) => {
                    model.set_key(&key);
                    log::info!("Rebound button {} to {} ({})", index, key.name, key.code);
                }
                None => {
                    log::warn!("Recapture target {} no longer exists", index);
                    return (None, false);
                }
            },
        }

        app.commit();
        (None, true)
    }

    fn resize(
        app: &mut AppState,
        index: usize,
        input: String,
        error: Option<ValidationError>,
        action: DialogAction,
    ) -> (Option<Dialog>, bool) {
        match action {
            DialogAction::InputChanged(input) => (
                Some(Dialog::Resize {
                    index,
                    input,
                    error: None,
                }),
                false,
            ),
            DialogAction::Confirm => match validate_size(&input) {
                Err(error) => {
                    log::debug!("Rejected size '{}': {}", input, error);
                    (
                        Some(Dialog::Resize {
                            index,
                            input,
                            error: Some(error),
                        }),
                        false,
                    )
                }
                Ok(size) => match app.document.button_mut(index) {
                    Some(model) => {
                        model.set_size(size);
                        log::info!("Resized button {} to {}", index, size);
                        app.commit();
                        (None, true)
                    }
                    None => {
                        log::warn!("Resize target {} no longer exists", index);
                        (None, false)
                    }
                },
            },
            _ => (
                Some(Dialog::Resize {
                    index,
                    input,
                    error,
                }),
                false,
            ),
        }
    }
}
