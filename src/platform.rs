//! File picker and notification collaborators.
//!
//! The session talks to these through traits so the startup and save flows can
//! be driven without a desktop in tests. [`NativeDialogs`] implements both with
//! `rfd`.

use std::path::PathBuf;

use crate::document::DOCUMENT_EXTENSIONS;
use crate::error::EditorError;
use crate::raster::IMAGE_EXTENSIONS;

/// A named group of extensions shown in a file picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFilter {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
}

/// Filter for background images.
pub const IMAGE_FILTER: FileFilter = FileFilter {
    name: "Images",
    extensions: IMAGE_EXTENSIONS,
};

/// Filter for overlay documents.
pub const DOCUMENT_FILTER: FileFilter = FileFilter {
    name: "Keymaps",
    extensions: DOCUMENT_EXTENSIONS,
};

/// Severity of a user notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Chooses files to open or save. `None` means the user cancelled.
pub trait FilePicker {
    fn pick_open(&self, title: &str, filters: &[FileFilter]) -> Option<PathBuf>;

    fn pick_save(&self, title: &str, filters: &[FileFilter], file_name: &str) -> Option<PathBuf>;
}

/// Shows a message and waits for the user to acknowledge it.
pub trait Notifier {
    fn notify(&self, title: &str, message: &str, severity: Severity);

    /// Report an error with its standard title.
    fn notify_error(&self, error: &EditorError) {
        log::error!("{}: {}", error.title(), error);
        self.notify(error.title(), &error.to_string(), Severity::Error);
    }
}

/// Native desktop dialogs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeDialogs;

impl NativeDialogs {
    fn file_dialog(title: &str, filters: &[FileFilter]) -> rfd::FileDialog {
        filters
            .iter()
            .fold(rfd::FileDialog::new().set_title(title), |dialog, filter| {
                dialog.add_filter(filter.name, filter.extensions)
            })
    }
}

impl FilePicker for NativeDialogs {
    fn pick_open(&self, title: &str, filters: &[FileFilter]) -> Option<PathBuf> {
        let path = Self::file_dialog(title, filters).pick_file();
        log::debug!("{}: {:?}", title, path);
        path
    }

    fn pick_save(&self, title: &str, filters: &[FileFilter], file_name: &str) -> Option<PathBuf> {
        let path = Self::file_dialog(title, filters)
            .set_file_name(file_name)
            .save_file();
        log::debug!("{}: {:?}", title, path);
        path
    }
}

impl Notifier for NativeDialogs {
    fn notify(&self, title: &str, message: &str, severity: Severity) {
        let level = match severity {
            Severity::Info => rfd::MessageLevel::Info,
            Severity::Warning => rfd::MessageLevel::Warning,
            Severity::Error => rfd::MessageLevel::Error,
        };
        rfd::MessageDialog::new()
            .set_level(level)
            .set_title(title)
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }
}
