//! Startup, image replacement and save-as workflows.
//!
//! These tie the core to its collaborators: the user picks a background image
//! and a keymap document, both are decoded, and the overlay is drawn. Errors are
//! shown through the [`Notifier`] and then returned, so the caller decides
//! whether to abort.

use std::path::{Path, PathBuf};

use crate::config::EditorConfig;
use crate::controller::{AppState, Event, InteractionController};
use crate::document::{Document, DocumentFormat};
use crate::error::EditorError;
use crate::platform::{DOCUMENT_FILTER, FilePicker, IMAGE_FILTER, Notifier, Severity};
use crate::raster::{DecodedImage, ImageDecoder};

const APP_TITLE: &str = "Playmap Overlay";

/// Suggested save-as name for a document started empty.
const DEFAULT_FILE_NAME: &str = "keymap.playmap";

/// An open image plus its overlay document.
#[derive(Debug)]
pub struct Editor {
    pub app: AppState,
    pub controller: InteractionController,
    pub image: DecodedImage,
    pub image_path: PathBuf,
    /// Where the document was loaded from or last saved to. `None` for a
    /// document started empty.
    pub document_path: Option<PathBuf>,
}

impl Editor {
    /// Window title naming the image and whether it was scaled.
    pub fn window_title(&self) -> String {
        let file_name = self
            .image_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let scaling = if self.image.is_scaled() {
            "scaled to fit screen"
        } else {
            "native size"
        };
        format!("{} - {} ({})", APP_TITLE, file_name, scaling)
    }
}

/// Runs workflows against a set of collaborators.
pub struct Session<'a> {
    picker: &'a dyn FilePicker,
    notifier: &'a dyn Notifier,
    decoder: &'a dyn ImageDecoder,
    config: &'a EditorConfig,
}

impl<'a> Session<'a> {
    pub fn new(
        picker: &'a dyn FilePicker,
        notifier: &'a dyn Notifier,
        decoder: &'a dyn ImageDecoder,
        config: &'a EditorConfig,
    ) -> Self {
        Self {
            picker,
            notifier,
            decoder,
            config,
        }
    }

    /// Ask for an image and a document, then open both.
    ///
    /// Cancelling the document picker opens the image with an empty document.
    /// Returns `Ok(None)` if the user cancels the image picker.
    pub fn start(&self) -> Result<Option<Editor>, EditorError> {
        let Some(image_path) = self
            .picker
            .pick_open("First: select an image file", &[IMAGE_FILTER])
        else {
            log::info!("Image selection cancelled");
            return Ok(None);
        };

        let opened = match self
            .picker
            .pick_open("Second: select a plist, JSON or playmap file", &[DOCUMENT_FILTER])
        {
            Some(document_path) => self.open(&image_path, &document_path),
            None => {
                log::info!("Document selection cancelled, starting empty");
                self.open_image(&image_path)
            }
        };

        opened
            .inspect_err(|e| self.notifier.notify_error(e))
            .map(Some)
    }

    /// Decode `image_path`, load `document_path` and draw the overlay.
    ///
    /// Nothing is shown to the user here; see [`start`](Self::start).
    pub fn open(&self, image_path: &Path, document_path: &Path) -> Result<Editor, EditorError> {
        let image = self
            .decoder
            .decode_file(image_path, self.config.display_bounds())?;
        let document = Document::load_path(document_path)?;

        log::info!(
            "Opened {:?} over {}x{} image {:?}",
            document_path,
            image.width(),
            image.height(),
            image_path
        );
        Ok(self.editor(image, image_path, document, Some(document_path)))
    }

    /// Decode `image_path` and start with an empty document.
    ///
    /// The first added button creates the `buttonModels` array; save-as picks
    /// where it goes.
    pub fn open_image(&self, image_path: &Path) -> Result<Editor, EditorError> {
        let image = self
            .decoder
            .decode_file(image_path, self.config.display_bounds())?;

        log::info!(
            "Opened {}x{} image {:?} without a document",
            image.width(),
            image.height(),
            image_path
        );
        Ok(self.editor(image, image_path, Document::new(), None))
    }

    fn editor(
        &self,
        image: DecodedImage,
        image_path: &Path,
        document: Document,
        document_path: Option<&Path>,
    ) -> Editor {
        Editor {
            app: AppState::new(document, image.geometry(), self.config),
            controller: InteractionController::new(),
            image,
            image_path: image_path.to_path_buf(),
            document_path: document_path.map(Path::to_path_buf),
        }
    }

    /// Ask for a new background image and swap it in.
    ///
    /// On failure the previous image and overlay are kept. Returns false if
    /// the user cancelled.
    pub fn replace_image(&self, editor: &mut Editor) -> Result<bool, EditorError> {
        let Some(path) = self.picker.pick_open("Select an image file", &[IMAGE_FILTER]) else {
            return Ok(false);
        };
        self.replace_image_from(editor, &path)
            .inspect_err(|e| self.notifier.notify_error(e))?;
        Ok(true)
    }

    /// Swap in the image at `path`; the overlay is re-projected onto it.
    pub fn replace_image_from(&self, editor: &mut Editor, path: &Path) -> Result<(), EditorError> {
        let image = self.decoder.decode_file(path, self.config.display_bounds())?;
        let geometry = image.geometry();

        editor.controller.handle(
            &mut editor.app,
            Event::CanvasReplaced {
                width: geometry.width,
                height: geometry.height,
            },
        );
        editor.image = image;
        editor.image_path = path.to_path_buf();

        log::info!("Replaced background with {:?}", path);
        Ok(())
    }

    /// Ask for a destination and save the document there.
    ///
    /// Returns the chosen path, or `None` if the user cancelled.
    pub fn save_as(&self, editor: &mut Editor) -> Result<Option<PathBuf>, EditorError> {
        let file_name = editor
            .document_path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());

        let Some(path) = self
            .picker
            .pick_save("Save keymap as", &[DOCUMENT_FILTER], &file_name)
        else {
            return Ok(None);
        };

        self.save_to(editor, &path)
            .inspect_err(|e| self.notifier.notify_error(e))?;
        self.notifier.notify(
            "Saved",
            &format!("Keymap saved to {}", path.display()),
            Severity::Info,
        );
        Ok(Some(path))
    }

    /// Save to `path` in the format its extension names.
    pub fn save_to(&self, editor: &mut Editor, path: &Path) -> Result<(), EditorError> {
        let format = save_format_for(path, self.config.default_save_format);
        editor.app.document.save(path, format)?;
        editor.app.modified = false;
        editor.document_path = Some(path.to_path_buf());
        Ok(())
    }
}

/// Format to write `path` in: from its extension, else `fallback`.
pub fn save_format_for(path: &Path, fallback: DocumentFormat) -> DocumentFormat {
    DocumentFormat::from_path(path).unwrap_or(fallback)
}
