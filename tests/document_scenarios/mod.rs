use std::sync::Arc;

use observable_tree::DocumentConfig;
use observable_tree::JsonAdapter;
use observable_tree::NotifyConfig;
use observable_tree::ObservableDocument;
use parking_lot::Mutex;
use serde_json::json;
use serde_json::Value;

use crate::commons::json_document;
use crate::commons::recording_callback;
use crate::commons::taken;

#[test]
fn config_document_lifecycle() {
    let document = json_document();
    let (usb, usb_callback) = recording_callback();
    let (dai, dai_callback) = recording_callback();
    let _usb_handle = document.register("config/usb/enabled", usb_callback);
    let _dai_handle = document.register("config/dai/ca/con", dai_callback);

    let first = json!({"config": {"usb": {"enabled": 0}, "dai": {"ca": {"con": "x"}}}});
    document.replace(first.clone());
    assert_eq!(taken(&usb), vec![(Value::Null, json!(0))]);
    assert_eq!(taken(&dai), vec![(Value::Null, json!("x"))]);

    document.replace(first);
    assert!(taken(&usb).is_empty());
    assert!(taken(&dai).is_empty());

    document.replace(json!({"config": {"usb": {"enabled": 1}, "dai": {"ca": {"con": "x"}}}}));
    assert_eq!(taken(&usb), vec![(json!(0), json!(1))]);
    assert!(taken(&dai).is_empty());
}

#[test]
fn nested_registrations_fire_bottom_up_and_siblings_stay_quiet() {
    let document = json_document();
    let order = Arc::new(Mutex::new(Vec::new()));
    let mut handles = Vec::new();
    for raw in ["a/b", "a/b/c", "a/d"] {
        let order = Arc::clone(&order);
        handles.push(document.register(raw, move |_: &Value, _: &Value| order.lock().push(raw)));
    }

    document.replace(json!({"a": {"b": {"c": 1}, "d": "same"}}));
    order.lock().clear();

    document.replace(json!({"a": {"b": {"c": 2}, "d": "same"}}));
    assert_eq!(*order.lock(), vec!["a/b/c", "a/b"]);
}

#[test]
fn larger_configuration_update() {
    let document = ObservableDocument::new(
        JsonAdapter::new(),
        json!({"config": {"usb": {"enabled": 0, "sanitized": 1}, "customcheck": {"enabled": 1, "options": [1, 2, 3]}}}),
    );
    let (usb, usb_callback) = recording_callback();
    let (custom, custom_callback) = recording_callback();
    let (greeting, greeting_callback) = recording_callback();
    let _usb = document.register("config/usb/enabled", usb_callback);
    let _custom = document.register("/config/customcheck/", custom_callback);
    let _greeting = document.register("config/dai/ca/con", greeting_callback);

    document.replace(json!({
        "config": {
            "usb": {"enabled": 1, "sanitized": 1},
            "customcheck": {"enabled": 1, "options": [1, 2, 3]},
            "hello": 1,
            "world": "nguyen van con",
            "dai": {"ca": {"con": "number one!"}}
        }
    }));

    assert_eq!(taken(&usb), vec![(json!(0), json!(1))]);
    assert!(taken(&custom).is_empty());
    assert_eq!(taken(&greeting), vec![(Value::Null, json!("number one!"))]);
}

#[test]
fn empty_documents_with_and_without_short_circuit_agree() {
    let mut naive_config = DocumentConfig::default();
    naive_config.notify = NotifyConfig {
        skip_empty_subtrees: false,
        drop_inactive_registries: false,
    };
    let documents = [
        json_document(),
        ObservableDocument::with_config(JsonAdapter::new(), Value::Null, &naive_config).unwrap(),
    ];

    for document in &documents {
        let (events, callback) = recording_callback();
        let _handle = document.register("deep/er/path", callback);

        assert!(!document.replace(Value::Null));
        assert!(taken(&events).is_empty());
    }
}

#[test]
fn subtree_replacement_targets_one_path() {
    let document = ObservableDocument::new(JsonAdapter::new(), json!({"config": {"usb": {"enabled": 0}}}));
    let (enabled, enabled_callback) = recording_callback();
    let (usb, usb_callback) = recording_callback();
    let _enabled = document.register("config/usb/enabled", enabled_callback);
    let _usb = document.register("config/usb", usb_callback);

    document.replace_at(&document.path("config/usb/enabled"), json!(1));

    assert_eq!(taken(&enabled), vec![(json!(0), json!(1))]);
    // Ancestors are only notified by whole-document replacement
    assert!(taken(&usb).is_empty());
    assert_eq!(document.snapshot(), json!({"config": {"usb": {"enabled": 1}}}));

    // A full replace with the same content is quiet for everyone
    document.replace(document.snapshot());
    assert!(taken(&enabled).is_empty());
    assert!(taken(&usb).is_empty());
}

#[test]
fn typed_reads_follow_replacements() {
    let document = json_document();
    let path = document.path("config/usb/enabled");

    assert_eq!(document.typed_get::<Option<i32>>(&path).unwrap(), None);

    document.replace(JsonAdapter::parse(r#"{"config":{"usb":{"enabled":0}}}"#).unwrap());
    assert_eq!(document.typed_get::<i32>(&path).unwrap(), 0);

    document.replace_at(&path, json!(1));
    assert_eq!(document.typed_get::<i32>(&path).unwrap(), 1);
}
