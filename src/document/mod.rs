//! Overlay documents and their property-list / JSON file formats.
//!
//! A document is a dictionary whose `buttonModels` array is the only part the
//! editor interprets. All other top-level fields are kept as opaque [`Value`]s
//! and written back unchanged.
//!
//! ## Formats
//!
//! - **Property list** (`.plist`, `.playmap`): binary or XML, detected on read.
//!   Written as binary by default.
//! - **JSON** (`.json`): written indented.
//!
//! Any document can be saved in either format regardless of how it was loaded.

mod codec;
mod value;

#[cfg(test)]
mod tests;

use std::fmt;
use std::io::Cursor;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EditorError;
use crate::model::{ButtonEntry, ButtonModel};

pub use value::{Dictionary, Value};

/// Top-level key holding the button array.
pub const BUTTON_MODELS: &str = "buttonModels";

/// Extensions offered in the data-file picker.
pub const DOCUMENT_EXTENSIONS: &[&str] = &["plist", "playmap", "json"];

/// On-disk encoding of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    /// Binary property list
    #[default]
    BinaryPlist,
    /// XML property list
    XmlPlist,
    /// Indented JSON
    Json,
}

impl DocumentFormat {
    /// Format named by a file extension, if recognized.
    ///
    /// Both property-list extensions map to [`DocumentFormat::BinaryPlist`]; on
    /// read the binary and XML encodings are told apart by content.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "plist" | "playmap" => Some(DocumentFormat::BinaryPlist),
            "json" => Some(DocumentFormat::Json),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn is_plist(&self) -> bool {
        !matches!(self, DocumentFormat::Json)
    }

    /// Human-readable format name for messages.
    pub fn name(&self) -> &'static str {
        if self.is_plist() {
            PLIST_FORMAT_NAME
        } else {
            JSON_FORMAT_NAME
        }
    }
}

const PLIST_FORMAT_NAME: &str = "property list";
const JSON_FORMAT_NAME: &str = "JSON";

/// An open overlay document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    /// `None` when the source had no usable `buttonModels` array.
    buttons: Option<Vec<ButtonEntry>>,
    /// Every other top-level field.
    fields: Dictionary,
}

impl Document {
    /// An empty document with no fields at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a decoded root value. The root must be a dictionary.
    pub fn from_value(root: Value, format: &'static str) -> Result<Self, EditorError> {
        let mut fields = match root {
            Value::Dictionary(fields) => fields,
            other => {
                return Err(EditorError::parse(
                    format,
                    format!("document root is a {}, expected a dictionary", other.type_name()),
                ));
            }
        };

        let buttons = match fields.remove(BUTTON_MODELS) {
            Some(Value::Array(items)) => {
                Some(items.into_iter().map(ButtonEntry::from_value).collect())
            }
            Some(other) => {
                log::warn!(
                    "'{}' is a {}, not an array; no buttons will be shown",
                    BUTTON_MODELS,
                    other.type_name()
                );
                fields.insert(BUTTON_MODELS.to_string(), other);
                None
            }
            None => None,
        };

        Ok(Self { buttons, fields })
    }

    pub fn to_value(&self) -> Value {
        let mut root = self.fields.clone();
        if let Some(buttons) = &self.buttons {
            root.insert(
                BUTTON_MODELS.to_string(),
                Value::Array(buttons.iter().map(ButtonEntry::to_value).collect()),
            );
        }
        Value::Dictionary(root)
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Parse a property list (binary or XML).
    pub fn load_plist(bytes: &[u8]) -> Result<Self, EditorError> {
        let root = plist::Value::from_reader(Cursor::new(bytes))
            .map_err(|e| EditorError::parse(PLIST_FORMAT_NAME, e.to_string()))?;
        Self::from_value(codec::from_plist(root), PLIST_FORMAT_NAME)
    }

    pub fn load_json(text: &str) -> Result<Self, EditorError> {
        let root: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| EditorError::parse(JSON_FORMAT_NAME, e.to_string()))?;
        Self::from_value(codec::from_json(root), JSON_FORMAT_NAME)
    }

    /// Parse raw bytes using the format hint.
    ///
    /// Without a hint JSON is tried first; if that fails the bytes are parsed
    /// as a property list and only the property-list error is reported.
    pub fn load_bytes(bytes: &[u8], hint: Option<DocumentFormat>) -> Result<Self, EditorError> {
        match hint {
            Some(format) if format.is_plist() => Self::load_plist(bytes),
            Some(_) => Self::load_json(decode_utf8(bytes)?),
            None => {
                let json = decode_utf8(bytes).and_then(Self::load_json);
                match json {
                    Ok(doc) => Ok(doc),
                    Err(e) => {
                        log::debug!("Not JSON ({}), trying property list", e);
                        Self::load_plist(bytes)
                    }
                }
            }
        }
    }

    /// Read and parse a file, choosing the parser from its extension.
    pub fn load_path(path: &Path) -> Result<Self, EditorError> {
        log::info!("Loading document from {:?}", path);
        let bytes = std::fs::read(path)?;
        let doc = Self::load_bytes(&bytes, DocumentFormat::from_path(path))?;
        log::info!("Loaded {}", doc.summary());
        Ok(doc)
    }

    // ========================================================================
    // Saving
    // ========================================================================

    /// Serialize into the given format.
    pub fn encode(&self, format: DocumentFormat) -> Result<Vec<u8>, EditorError> {
        let root = self.to_value();
        match format {
            DocumentFormat::Json => {
                let text = serde_json::to_string_pretty(&codec::to_json(&root))
                    .map_err(|e| EditorError::encode(JSON_FORMAT_NAME, e.to_string()))?;
                Ok(text.into_bytes())
            }
            DocumentFormat::BinaryPlist | DocumentFormat::XmlPlist => {
                let plist = codec::to_plist(&root).unwrap_or_else(|| {
                    plist::Value::Dictionary(plist::Dictionary::new())
                });
                let mut bytes = Vec::new();
                let written = if format == DocumentFormat::BinaryPlist {
                    plist.to_writer_binary(&mut bytes)
                } else {
                    plist.to_writer_xml(&mut bytes)
                };
                written.map_err(|e| EditorError::encode(PLIST_FORMAT_NAME, e.to_string()))?;
                Ok(bytes)
            }
        }
    }

    /// Write to `path` in `format`.
    pub fn save(&self, path: &Path, format: DocumentFormat) -> Result<(), EditorError> {
        log::info!("Saving {} as {} to {:?}", self.summary(), format.name(), path);
        let bytes = self.encode(format)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    // ========================================================================
    // Buttons
    // ========================================================================

    /// All `buttonModels` elements, in document order.
    pub fn entries(&self) -> &[ButtonEntry] {
        self.buttons.as_deref().unwrap_or(&[])
    }

    /// Whether the source had a `buttonModels` array.
    pub fn has_button_models(&self) -> bool {
        self.buttons.is_some()
    }

    /// Number of `buttonModels` elements.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Button models with their indices, skipping opaque entries.
    pub fn buttons(&self) -> impl Iterator<Item = (usize, &ButtonModel)> {
        self.entries()
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| entry.as_model().map(|model| (i, model)))
    }

    pub fn button(&self, index: usize) -> Option<&ButtonModel> {
        self.entries().get(index).and_then(ButtonEntry::as_model)
    }

    pub fn button_mut(&mut self, index: usize) -> Option<&mut ButtonModel> {
        self.buttons
            .as_mut()
            .and_then(|buttons| buttons.get_mut(index))
            .and_then(ButtonEntry::as_model_mut)
    }

    /// Append a button and return its index.
    ///
    /// Creates the `buttonModels` array if the document had none. A non-array
    /// `buttonModels` field is replaced.
    pub fn push(&mut self, model: ButtonModel) -> usize {
        if self.buttons.is_none() && self.fields.remove(BUTTON_MODELS).is_some() {
            log::warn!("Replacing non-array '{}' field", BUTTON_MODELS);
        }
        let buttons = self.buttons.get_or_insert_with(Vec::new);
        buttons.push(ButtonEntry::Model(model));
        buttons.len() - 1
    }

    /// Remove the entry at `index`. Later entries shift down by one.
    pub fn remove(&mut self, index: usize) -> Option<ButtonEntry> {
        let buttons = self.buttons.as_mut()?;
        if index < buttons.len() {
            Some(buttons.remove(index))
        } else {
            None
        }
    }

    /// Passthrough top-level fields.
    pub fn fields(&self) -> &Dictionary {
        &self.fields
    }

    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            entries: self.len(),
            drawable: self
                .buttons()
                .filter(|(_, model)| model.transform.is_some())
                .count(),
            passthrough_fields: self.fields.len(),
        }
    }
}

fn decode_utf8(bytes: &[u8]) -> Result<&str, EditorError> {
    std::str::from_utf8(bytes).map_err(|e| EditorError::parse(JSON_FORMAT_NAME, e.to_string()))
}

/// Counts describing a document, for logs and window titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentSummary {
    /// `buttonModels` elements, including ones that cannot be drawn
    pub entries: usize,
    /// Buttons with a usable transform
    pub drawable: usize,
    /// Top-level fields other than `buttonModels`
    pub passthrough_fields: usize,
}

impl fmt::Display for DocumentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "document with {} buttons ({} drawable) and {} other fields",
            self.entries, self.drawable, self.passthrough_fields
        )
    }
}
