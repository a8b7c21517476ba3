//! Button model types and validation.

use crate::document::{Dictionary, Value};
use crate::error::ValidationError;
use crate::keycodes::ResolvedKey;

/// Diameter used when a transform has no `size`, in percent of canvas width.
pub const DEFAULT_BUTTON_SIZE: f64 = 5.0;

/// Smallest size accepted from the resize dialog.
pub const MIN_BUTTON_SIZE: f64 = 1.0;

/// Largest size accepted from the resize dialog.
pub const MAX_BUTTON_SIZE: f64 = 20.0;

/// Normalized position used for freshly added buttons (canvas center).
pub const NEW_BUTTON_POSITION: (f64, f64) = (0.5, 0.5);

const KEY_CODE: &str = "keyCode";
const KEY_NAME: &str = "keyName";
const TRANSFORM: &str = "transform";
const SIZE: &str = "size";
const X_COORD: &str = "xCoord";
const Y_COORD: &str = "yCoord";

/// Normalized placement of a button.
#[derive(Debug, Clone)]
pub struct Transform {
    /// Diameter as a percentage of canvas width. Nominally 1..=20, but values
    /// loaded from a file are kept as-is.
    pub size: f64,
    /// Center as a fraction of canvas width.
    pub x_coord: f64,
    /// Center as a fraction of canvas height.
    pub y_coord: f64,
    /// Unrecognized transform fields.
    pub extra: Dictionary,
    /// Field values as loaded; `None` for transforms built in the editor.
    source: Option<SourceFields>,
}

/// Numeric transform fields exactly as they appeared in the file.
///
/// An unedited field is written back in its original form (integer stays
/// integer) and a field that was absent stays absent.
#[derive(Debug, Clone, Default)]
struct SourceFields {
    size: Option<Value>,
    x_coord: Option<Value>,
    y_coord: Option<Value>,
}

impl PartialEq for Transform {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size
            && self.x_coord == other.x_coord
            && self.y_coord == other.y_coord
            && self.extra == other.extra
    }
}

impl Transform {
    pub fn new(size: f64, x_coord: f64, y_coord: f64) -> Self {
        Self {
            size,
            x_coord,
            y_coord,
            extra: Dictionary::new(),
            source: None,
        }
    }

    /// Default transform for a newly added button.
    pub fn centered() -> Self {
        let (x, y) = NEW_BUTTON_POSITION;
        Self::new(DEFAULT_BUTTON_SIZE, x, y)
    }

    /// Build from a partially-formed record, filling in defaults for missing
    /// fields.
    ///
    /// A field that is present but not a number makes the record unusable; it
    /// is handed back untouched so the caller can keep it verbatim.
    pub fn from_dictionary(mut dict: Dictionary) -> Result<Self, Dictionary> {
        let ill_typed = [SIZE, X_COORD, Y_COORD].into_iter().find_map(|key| {
            dict.get(key)
                .filter(|value| value.as_f64().is_none())
                .map(|value| (key, value.type_name()))
        });
        if let Some((key, type_name)) = ill_typed {
            log::warn!(
                "Transform field '{}' is a {}, button will not be drawn",
                key,
                type_name
            );
            return Err(dict);
        }

        let source = SourceFields {
            size: dict.remove(SIZE),
            x_coord: dict.remove(X_COORD),
            y_coord: dict.remove(Y_COORD),
        };
        let number = |field: &Option<Value>, default: f64| {
            field.as_ref().and_then(Value::as_f64).unwrap_or(default)
        };

        Ok(Self {
            size: number(&source.size, DEFAULT_BUTTON_SIZE),
            x_coord: number(&source.x_coord, 0.0),
            y_coord: number(&source.y_coord, 0.0),
            extra: dict,
            source: Some(source),
        })
    }

    pub fn to_value(&self) -> Value {
        let mut dict = self.extra.clone();
        match &self.source {
            Some(source) => {
                write_field(&mut dict, SIZE, self.size, &source.size, DEFAULT_BUTTON_SIZE);
                write_field(&mut dict, X_COORD, self.x_coord, &source.x_coord, 0.0);
                write_field(&mut dict, Y_COORD, self.y_coord, &source.y_coord, 0.0);
            }
            None => {
                dict.insert(SIZE.to_string(), Value::Real(self.size));
                dict.insert(X_COORD.to_string(), Value::Real(self.x_coord));
                dict.insert(Y_COORD.to_string(), Value::Real(self.y_coord));
            }
        }
        Value::Dictionary(dict)
    }
}

/// Write a loaded field: unchanged values keep their original node, edited
/// ones become reals.
fn write_field(dict: &mut Dictionary, key: &str, value: f64, source: &Option<Value>, default: f64) {
    let node = match source {
        Some(original) if original.as_f64() == Some(value) => original.clone(),
        None if value == default => return,
        _ => Value::Real(value),
    };
    dict.insert(key.to_string(), node);
}

/// One overlay button as stored in the document.
///
/// `key_code` and `key_name` are independent: the name is a free-form label.
/// Fields absent from the source stay absent on save.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonModel {
    pub key_code: Option<i64>,
    pub key_name: Option<String>,
    /// `None` when the source had no transform dictionary; such buttons are not drawn.
    pub transform: Option<Transform>,
    /// Unrecognized or ill-typed fields, written back verbatim.
    pub extra: Dictionary,
}

impl ButtonModel {
    pub fn new(key_code: i64, key_name: impl Into<String>, transform: Transform) -> Self {
        Self {
            key_code: Some(key_code),
            key_name: Some(key_name.into()),
            transform: Some(transform),
            extra: Dictionary::new(),
        }
    }

    /// New button bound to `key`, placed at the canvas center.
    pub fn from_key(key: &ResolvedKey) -> Self {
        Self::new(key.code, key.name.clone(), Transform::centered())
    }

    pub fn from_dictionary(mut dict: Dictionary) -> Self {
        let key_code = match dict.remove(KEY_CODE) {
            Some(Value::Integer(code)) => Some(code),
            Some(other) => {
                dict.insert(KEY_CODE.to_string(), other);
                None
            }
            None => None,
        };

        let key_name = match dict.remove(KEY_NAME) {
            Some(Value::String(name)) => Some(name),
            Some(other) => {
                dict.insert(KEY_NAME.to_string(), other);
                None
            }
            None => None,
        };

        let transform = match dict.remove(TRANSFORM) {
            Some(Value::Dictionary(t)) => match Transform::from_dictionary(t) {
                Ok(transform) => Some(transform),
                Err(t) => {
                    dict.insert(TRANSFORM.to_string(), Value::Dictionary(t));
                    None
                }
            },
            Some(other) => {
                log::warn!(
                    "Button transform is a {}, button will not be drawn",
                    other.type_name()
                );
                dict.insert(TRANSFORM.to_string(), other);
                None
            }
            None => None,
        };

        Self {
            key_code,
            key_name,
            transform,
            extra: dict,
        }
    }

    pub fn to_value(&self) -> Value {
        let mut dict = self.extra.clone();
        if let Some(code) = self.key_code {
            dict.insert(KEY_CODE.to_string(), Value::Integer(code));
        }
        if let Some(name) = &self.key_name {
            dict.insert(KEY_NAME.to_string(), Value::String(name.clone()));
        }
        if let Some(transform) = &self.transform {
            dict.insert(TRANSFORM.to_string(), transform.to_value());
        }
        Value::Dictionary(dict)
    }

    /// Label drawn at the button center, if any.
    pub fn label(&self) -> Option<&str> {
        self.key_name.as_deref().filter(|name| !name.is_empty())
    }

    /// Rebind to a newly captured key, replacing both code and label.
    pub fn set_key(&mut self, key: &ResolvedKey) {
        self.key_code = Some(key.code);
        self.key_name = Some(key.name.clone());
    }

    /// Move the center. Coordinates are stored unclamped.
    pub fn set_position(&mut self, x_coord: f64, y_coord: f64) {
        let transform = self.transform.get_or_insert_with(Transform::centered);
        transform.x_coord = x_coord;
        transform.y_coord = y_coord;
    }

    /// Set a size that has already passed [`validate_size`].
    pub fn set_size(&mut self, size: f64) {
        self.transform.get_or_insert_with(Transform::centered).size = size;
    }
}

/// An element of the document's `buttonModels` array.
#[derive(Debug, Clone, PartialEq)]
pub enum ButtonEntry {
    Model(ButtonModel),
    /// A non-dictionary element, kept verbatim.
    Opaque(Value),
}

impl ButtonEntry {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Dictionary(dict) => ButtonEntry::Model(ButtonModel::from_dictionary(dict)),
            other => {
                log::warn!("Skipping buttonModels element of type {}", other.type_name());
                ButtonEntry::Opaque(other)
            }
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            ButtonEntry::Model(model) => model.to_value(),
            ButtonEntry::Opaque(value) => value.clone(),
        }
    }

    pub fn as_model(&self) -> Option<&ButtonModel> {
        match self {
            ButtonEntry::Model(model) => Some(model),
            ButtonEntry::Opaque(_) => None,
        }
    }

    pub fn as_model_mut(&mut self) -> Option<&mut ButtonModel> {
        match self {
            ButtonEntry::Model(model) => Some(model),
            ButtonEntry::Opaque(_) => None,
        }
    }
}

/// Parse resize-dialog input. Accepts 1..=20 inclusive.
pub fn validate_size(input: &str) -> Result<f64, ValidationError> {
    let trimmed = input.trim();
    let value: f64 = trimmed
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| ValidationError::NotANumber {
            input: trimmed.to_string(),
        })?;

    if (MIN_BUTTON_SIZE..=MAX_BUTTON_SIZE).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::size_out_of_range(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(entries: Vec<(&str, Value)>) -> Dictionary {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_transform_defaults() {
        let t = Transform::from_dictionary(Dictionary::new()).unwrap();
        assert_eq!(t.size, 5.0);
        assert_eq!(t.x_coord, 0.0);
        assert_eq!(t.y_coord, 0.0);

        let t = Transform::from_dictionary(dict(vec![("xCoord", Value::Real(0.3))])).unwrap();
        assert_eq!(t.size, DEFAULT_BUTTON_SIZE);
        assert_eq!(t.x_coord, 0.3);
    }

    #[test]
    fn test_loaded_size_is_not_clamped() {
        let t = Transform::from_dictionary(dict(vec![("size", Value::Real(99.0))])).unwrap();
        assert_eq!(t.size, 99.0);
    }

    #[test]
    fn test_integer_coordinates_accepted() {
        let t = Transform::from_dictionary(dict(vec![
            ("size", Value::Integer(8)),
            ("xCoord", Value::Integer(1)),
        ]))
        .unwrap();
        assert_eq!(t.size, 8.0);
        assert_eq!(t.x_coord, 1.0);
    }

    #[test]
    fn test_button_keeps_unknown_fields() {
        let source = dict(vec![
            ("keyCode", Value::Integer(4)),
            ("keyName", Value::from("A")),
            ("mode", Value::Integer(2)),
            (
                "transform",
                Value::Dictionary(dict(vec![
                    ("size", Value::Real(6.0)),
                    ("xCoord", Value::Real(0.1)),
                    ("yCoord", Value::Real(0.9)),
                    ("rotation", Value::Real(45.0)),
                ])),
            ),
        ]);

        let model = ButtonModel::from_dictionary(source.clone());
        assert_eq!(model.key_code, Some(4));
        assert_eq!(model.label(), Some("A"));
        assert_eq!(model.extra.get("mode"), Some(&Value::Integer(2)));
        assert_eq!(model.to_value(), Value::Dictionary(source));
    }

    #[test]
    fn test_ill_typed_fields_pass_through() {
        let source = dict(vec![
            ("keyCode", Value::from("not a number")),
            ("transform", Value::from("broken")),
        ]);
        let model = ButtonModel::from_dictionary(source.clone());
        assert_eq!(model.key_code, None);
        assert!(model.transform.is_none());
        assert_eq!(model.to_value(), Value::Dictionary(source));
    }

    #[test]
    fn test_non_numeric_transform_field_is_kept_verbatim() {
        let transform = dict(vec![
            ("size", Value::from("big")),
            ("xCoord", Value::Real(0.5)),
            ("yCoord", Value::Null),
        ]);
        let source = dict(vec![
            ("keyCode", Value::Integer(4)),
            ("transform", Value::Dictionary(transform.clone())),
        ]);

        assert_eq!(Transform::from_dictionary(transform.clone()), Err(transform));

        let model = ButtonModel::from_dictionary(source.clone());
        assert!(model.transform.is_none());
        assert_eq!(model.to_value(), Value::Dictionary(source));
    }

    #[test]
    fn test_partial_integer_transform_written_back_unchanged() {
        let source = dict(vec![
            ("size", Value::Integer(5)),
            ("xCoord", Value::Integer(1)),
        ]);
        let t = Transform::from_dictionary(source.clone()).unwrap();
        assert_eq!((t.size, t.x_coord, t.y_coord), (5.0, 1.0, 0.0));
        assert_eq!(t.to_value(), Value::Dictionary(source));
    }

    #[test]
    fn test_only_edited_transform_fields_change() {
        let source = dict(vec![
            ("keyCode", Value::Integer(4)),
            (
                "transform",
                Value::Dictionary(dict(vec![
                    ("size", Value::Integer(5)),
                    ("xCoord", Value::Integer(1)),
                ])),
            ),
        ]);
        let mut model = ButtonModel::from_dictionary(source);
        model.set_position(0.25, 0.0);

        let expected = dict(vec![
            ("size", Value::Integer(5)),
            ("xCoord", Value::Real(0.25)),
        ]);
        assert_eq!(
            model.transform.as_ref().unwrap().to_value(),
            Value::Dictionary(expected)
        );

        model.set_size(7.5);
        let written = model.transform.as_ref().unwrap().to_value();
        assert_eq!(
            written.as_dictionary().unwrap().get("size"),
            Some(&Value::Real(7.5))
        );
    }

    #[test]
    fn test_new_transform_writes_every_field() {
        let value = Transform::centered().to_value();
        let written = value.as_dictionary().unwrap();
        assert_eq!(written.get("size"), Some(&Value::Real(5.0)));
        assert_eq!(written.get("xCoord"), Some(&Value::Real(0.5)));
        assert_eq!(written.get("yCoord"), Some(&Value::Real(0.5)));
    }

    #[test]
    fn test_opaque_entry() {
        let entry = ButtonEntry::from_value(Value::Integer(7));
        assert!(entry.as_model().is_none());
        assert_eq!(entry.to_value(), Value::Integer(7));
    }

    #[test]
    fn test_from_key_is_centered() {
        let key = ResolvedKey {
            code: -1,
            name: "LMB".to_string(),
        };
        let model = ButtonModel::from_key(&key);
        let t = model.transform.as_ref().unwrap();
        assert_eq!((t.size, t.x_coord, t.y_coord), (5.0, 0.5, 0.5));
        assert_eq!(model.key_code, Some(-1));
    }

    #[test]
    fn test_validate_size() {
        assert_eq!(validate_size("7.5"), Ok(7.5));
        assert_eq!(validate_size(" 20 "), Ok(20.0));
        assert_eq!(validate_size("1"), Ok(1.0));
        assert_eq!(
            validate_size("25"),
            Err(ValidationError::size_out_of_range(25.0))
        );
        assert_eq!(
            validate_size("0.5"),
            Err(ValidationError::size_out_of_range(0.5))
        );
        assert!(matches!(
            validate_size("big"),
            Err(ValidationError::NotANumber { .. })
        ));
        assert!(matches!(
            validate_size("NaN"),
            Err(ValidationError::NotANumber { .. })
        ));
    }
}
