//! Property tests for structured extraction of model output.

use proptest::prelude::*;
use serde_json::{Map, Value};

use issue_scribe::domain::dialogue::{extract_json_object, parse_object};

/// Flat objects whose string values may contain braces, quotes and escapes.
fn object() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map(
        "[a-z_]{1,8}",
        prop_oneof![
            "[a-zA-Z0-9 .,!?{}\"\\\\]{0,24}".prop_map(Value::from),
            any::<i32>().prop_map(Value::from),
            any::<bool>().prop_map(Value::from),
        ],
        1..6,
    )
    .prop_map(|entries| entries.into_iter().collect())
}

/// Strings that stress the brace scanner: braces, brackets, quotes, escapes.
fn tricky_string() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,:{}\\[\\]\"\\\\]{0,24}"
}

/// Free-form state: nested maps and arrays down to scalars.
fn state_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        tricky_string().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        Just(Value::Null),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z_]{1,8}", inner, 0..4)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

/// Dialogue-turn payloads: reply, intent, an issue draft and nested state.
fn decision_object() -> impl Strategy<Value = Map<String, Value>> {
    (
        tricky_string(),
        prop_oneof![Just("ask"), Just("create"), Just("cancel")],
        tricky_string(),
        tricky_string(),
        "[A-Z]{2,4}",
        prop::collection::btree_map("[a-z_]{1,8}", state_value(), 0..4),
    )
        .prop_map(|(reply, intent, title, description, key, state)| {
            let mut issue = Map::new();
            issue.insert("title".into(), Value::from(title));
            issue.insert("description".into(), Value::from(description));
            issue.insert("type".into(), Value::from("Bug"));
            issue.insert("project_key".into(), Value::from(key));

            let mut decision = Map::new();
            decision.insert("reply".into(), Value::from(reply));
            decision.insert("intent".into(), Value::from(intent));
            decision.insert("issue".into(), Value::Object(issue));
            decision.insert("state".into(), Value::Object(state.into_iter().collect()));
            decision
        })
}

/// Flat objects or nested dialogue payloads.
fn payload() -> impl Strategy<Value = Map<String, Value>> {
    prop_oneof![object(), decision_object()]
}

/// Text without braces or backticks.
fn prose() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,!?:\n]{0,40}"
}

proptest! {
    #[test]
    fn property_bare_object_is_recovered(obj in payload()) {
        let text = Value::Object(obj.clone()).to_string();
        prop_assert_eq!(extract_json_object(&text).unwrap(), obj);
    }

    #[test]
    fn property_object_in_prose_is_recovered(
        obj in payload(),
        before in prose(),
        after in prose(),
    ) {
        let text = format!("{}{}{}", before, Value::Object(obj.clone()), after);
        prop_assert_eq!(extract_json_object(&text).unwrap(), obj);
    }

    #[test]
    fn property_fenced_object_is_recovered(
        obj in payload(),
        before in prose(),
        tag in prop_oneof![Just(""), Just("json")],
    ) {
        let text = format!("{}```{}\n{:#}\n```\n", before, tag, Value::Object(obj.clone()));
        prop_assert_eq!(extract_json_object(&text).unwrap(), obj);
    }

    #[test]
    fn property_extraction_is_idempotent(obj in payload(), before in prose(), after in prose()) {
        let text = format!("{}{}{}", before, Value::Object(obj), after);
        let first = extract_json_object(&text).unwrap();
        let again = extract_json_object(&Value::Object(first.clone()).to_string()).unwrap();
        prop_assert_eq!(again, first);
    }

    #[test]
    fn property_nested_state_survives_extraction(obj in decision_object(), before in prose()) {
        let text = format!("{}{}", before, Value::Object(obj.clone()));
        let extracted = extract_json_object(&text).unwrap();
        prop_assert_eq!(extracted.get("state"), obj.get("state"));
        prop_assert_eq!(extracted.get("issue"), obj.get("issue"));
    }

    #[test]
    fn property_truncated_object_is_rejected(
        obj in object(),
        before in prose(),
        cut in 0.0f64..1.0,
    ) {
        let json = Value::Object(obj).to_string();
        let chars: Vec<char> = json.chars().collect();
        // Keep at least the opening brace, never the closing one.
        let keep = 1 + ((chars.len() - 2) as f64 * cut) as usize;
        let prefix: String = chars[..keep].iter().collect();
        let text = format!("{}{}", before, prefix);

        prop_assert!(parse_object(&text).is_err());
    }
}
