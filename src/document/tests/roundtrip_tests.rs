//! Save-then-load round trips within and across formats.

use crate::document::{Dictionary, Document, DocumentFormat, Value};
use crate::model::{ButtonModel, Transform};

const ALL_FORMATS: [DocumentFormat; 3] = [
    DocumentFormat::BinaryPlist,
    DocumentFormat::XmlPlist,
    DocumentFormat::Json,
];

fn reload(doc: &Document, format: DocumentFormat) -> Document {
    let bytes = doc.encode(format).expect("encode");
    Document::load_bytes(&bytes, Some(format)).expect("decode")
}

/// A document exercising passthrough fields at every level.
fn create_document_with_extras() -> Document {
    let json = r#"{
      "version": "3.1",
      "bundleIdentifier": "com.example.game",
      "options": { "sensitivity": 0.8, "invertY": false, "tags": ["a", "b"] },
      "buttonModels": [
        { "keyCode": 26, "keyName": "W", "zIndex": 3,
          "transform": { "size": 7.5, "xCoord": 0.2, "yCoord": 0.6, "anchor": "center" } },
        { "keyCode": -2, "keyName": "Aim",
          "transform": { "size": 12.0, "xCoord": 0.85, "yCoord": 0.4 } }
      ]
    }"#;
    Document::load_json(json).unwrap()
}

#[test]
fn test_roundtrip_zero_buttons() {
    let doc = Document::load_json(r#"{"buttonModels": []}"#).unwrap();
    for format in ALL_FORMATS {
        let loaded = reload(&doc, format);
        assert_eq!(loaded, doc, "format {:?}", format);
        assert!(loaded.has_button_models());
        assert_eq!(loaded.len(), 0);
    }
}

#[test]
fn test_roundtrip_without_button_models_field() {
    let doc = Document::load_json(r#"{"name": "nothing here"}"#).unwrap();
    for format in ALL_FORMATS {
        let loaded = reload(&doc, format);
        assert!(!loaded.has_button_models());
        assert_eq!(loaded, doc);
    }
}

#[test]
fn test_roundtrip_preserves_passthrough_fields() {
    let doc = create_document_with_extras();
    for format in ALL_FORMATS {
        let loaded = reload(&doc, format);
        assert_eq!(loaded, doc, "format {:?}", format);

        let button = loaded.button(0).unwrap();
        assert_eq!(button.extra.get("zIndex"), Some(&Value::Integer(3)));
        assert_eq!(
            button.transform.as_ref().unwrap().extra.get("anchor"),
            Some(&Value::from("center"))
        );
    }
}

#[test]
fn test_roundtrip_keeps_out_of_range_size() {
    let doc = Document::load_json(
        r#"{"buttonModels": [{"keyCode": 4, "keyName": "A",
            "transform": {"size": 99.0, "xCoord": 1.4, "yCoord": -0.2}}]}"#,
    )
    .unwrap();

    for format in ALL_FORMATS {
        let loaded = reload(&doc, format);
        let t = loaded.button(0).unwrap().transform.clone().unwrap();
        assert_eq!(t.size, 99.0);
        assert_eq!(t.x_coord, 1.4);
        assert_eq!(t.y_coord, -0.2);
    }
}

#[test]
fn test_cross_format_plist_to_json() {
    let original = create_document_with_extras();
    let as_plist = reload(&original, DocumentFormat::BinaryPlist);
    let as_json = reload(&as_plist, DocumentFormat::Json);
    assert_eq!(as_json, original);
}

#[test]
fn test_opaque_entries_survive() {
    let doc = Document::load_json(r#"{"buttonModels": [42, "text", {"keyCode": 4}]}"#).unwrap();
    for format in ALL_FORMATS {
        assert_eq!(reload(&doc, format), doc);
    }
}

#[test]
fn test_plist_data_becomes_base64_in_json() {
    let mut fields = Dictionary::new();
    fields.insert("blob".to_string(), Value::Data(vec![0xde, 0xad, 0xbe, 0xef]));
    let doc = Document::from_value(Value::Dictionary(fields), "test").unwrap();

    // Plist keeps raw bytes
    let loaded = reload(&doc, DocumentFormat::BinaryPlist);
    assert_eq!(loaded.fields().get("blob"), Some(&Value::Data(vec![0xde, 0xad, 0xbe, 0xef])));

    // JSON cannot, so the bytes are written as base64 text
    let loaded = reload(&doc, DocumentFormat::Json);
    assert_eq!(loaded.fields().get("blob"), Some(&Value::from("3q2+7w==")));
}

#[test]
fn test_edits_are_saved() {
    let mut doc = create_document_with_extras();
    doc.button_mut(0).unwrap().set_position(0.3, 0.7);
    doc.button_mut(1).unwrap().key_name = Some("Right".to_string());
    let index = doc.push(ButtonModel::new(44, "␣", Transform::centered()));
    assert_eq!(index, 2);

    for format in ALL_FORMATS {
        let loaded = reload(&doc, format);
        assert_eq!(loaded, doc);
        assert_eq!(loaded.button(2).unwrap().key_code, Some(44));
    }
}

#[test]
fn test_push_into_empty_document() {
    let mut doc = Document::new();
    assert!(!doc.has_button_models());
    doc.push(ButtonModel::new(-1, "LMB", Transform::centered()));
    assert!(doc.has_button_models());

    let json = String::from_utf8(doc.encode(DocumentFormat::Json).unwrap()).unwrap();
    assert!(json.contains("\"buttonModels\""));
    assert!(json.contains("\"keyName\": \"LMB\""));
}

#[test]
fn test_remove_shifts_indices() {
    let mut doc = create_document_with_extras();
    let removed = doc.remove(0).unwrap();
    assert_eq!(removed.as_model().unwrap().key_code, Some(26));
    assert_eq!(doc.len(), 1);
    assert_eq!(doc.button(0).unwrap().key_code, Some(-2));
    assert!(doc.remove(5).is_none());
}

#[test]
fn test_save_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let doc = create_document_with_extras();

    let json_path = dir.path().join("out.json");
    doc.save(&json_path, DocumentFormat::Json).unwrap();
    assert_eq!(Document::load_path(&json_path).unwrap(), doc);

    let plist_path = dir.path().join("out.playmap");
    doc.save(&plist_path, DocumentFormat::BinaryPlist).unwrap();
    let bytes = std::fs::read(&plist_path).unwrap();
    assert!(bytes.starts_with(b"bplist00"));
    assert_eq!(Document::load_path(&plist_path).unwrap(), doc);
}

#[test]
fn test_save_to_missing_directory_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no").join("such").join("dir.json");
    let err = create_document_with_extras()
        .save(&path, DocumentFormat::Json)
        .unwrap_err();
    assert!(matches!(err, crate::error::EditorError::Io(_)));
}

#[test]
fn test_unedited_transforms_are_written_back_as_read() {
    let json = r#"{"buttonModels": [
        {"keyCode": 4, "transform": {"size": 5, "xCoord": 1}},
        {"keyCode": 5, "transform": {"size": "big", "xCoord": 0.5, "yCoord": null}}
    ]}"#;
    let doc = Document::load_json(json).unwrap();
    assert!(doc.button(0).unwrap().transform.is_some());
    assert!(doc.button(1).unwrap().transform.is_none());

    let written: serde_json::Value =
        serde_json::from_slice(&doc.encode(DocumentFormat::Json).unwrap()).unwrap();
    let buttons = &written["buttonModels"];
    assert_eq!(buttons[0]["transform"], serde_json::json!({"size": 5, "xCoord": 1}));
    assert_eq!(
        buttons[1]["transform"],
        serde_json::json!({"size": "big", "xCoord": 0.5, "yCoord": null})
    );

    // Property lists have no null, everything else survives
    let reloaded = reload(&doc, DocumentFormat::BinaryPlist);
    assert_eq!(reloaded.button(0), doc.button(0));
    let kept = reloaded.entries()[1].as_model().unwrap();
    assert!(kept.transform.is_none());
    let transform = kept.extra.get("transform").and_then(Value::as_dictionary).unwrap();
    assert_eq!(transform.get("size"), Some(&Value::from("big")));
    assert!(!transform.contains_key("yCoord"));
}
