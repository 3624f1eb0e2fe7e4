//! Proptest generators for property-based testing.

use proptest::prelude::*;
use serde_json::Value;

use wipecert_core::{Certificate, FieldValue, Fields, CORE_FIELDS, SIGNATURE_FIELD};

/// Generate a field name, never `signature`.
pub fn field_name() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z_]{1,12}",
        "\\PC{1,6}",
    ]
    .prop_filter("reserved name", |name| name != SIGNATURE_FIELD)
}

/// Generate a finite JSON number, integer or float.
pub fn number() -> impl Strategy<Value = FieldValue> {
    prop_oneof![
        any::<i64>().prop_map(FieldValue::from),
        any::<u64>().prop_map(FieldValue::from),
        (-1.0e12f64..1.0e12).prop_filter_map("non-finite", |f| {
            serde_json::Number::from_f64(f).map(FieldValue::Number)
        }),
    ]
}

/// Generate an arbitrary field value, nesting up to three levels.
pub fn field_value() -> impl Strategy<Value = FieldValue> {
    let leaf = prop_oneof![
        Just(FieldValue::Null),
        any::<bool>().prop_map(FieldValue::Bool),
        number(),
        "\\PC{0,16}".prop_map(FieldValue::Text),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(FieldValue::List),
            prop::collection::btree_map(field_name(), inner, 0..4).prop_map(FieldValue::Map),
        ]
    })
}

/// Generate a top-level field mapping.
pub fn fields() -> impl Strategy<Value = Fields> {
    prop::collection::btree_map(field_name(), field_value(), 0..8)
}

/// Generate a certificate with all core fields plus random extras.
pub fn certificate() -> impl Strategy<Value = Certificate> {
    (
        "[a-z0-9-]{1,16}",
        "\\PC{1,24}",
        prop_oneof![Just("clear"), Just("purge"), Just("destroy")],
        prop_oneof![Just("overwrite"), Just("secure-erase"), Just("crypto-erase")],
        0i64..=4_102_444_800,
        "[0-9a-f]{64}",
        fields(),
    )
        .prop_map(|(id, device, profile, method, timestamp, hash, extra)| {
            let mut builder = Certificate::builder(id)
                .device(device)
                .profile(profile)
                .method(method)
                .timestamp(timestamp)
                .hash(hash);
            for (name, value) in extra
                .into_iter()
                .filter(|(name, _)| !CORE_FIELDS.contains(&name.as_str()))
            {
                builder = builder.field(name, value);
            }
            builder.build()
        })
}

/// Generate `(fields, json)` where `json` encodes `fields` with keys in a
/// random order, recursively, and random insignificant whitespace.
pub fn fields_with_shuffled_json() -> impl Strategy<Value = (Fields, String)> {
    fields().prop_flat_map(|fields| {
        let value = FieldValue::Map(fields.clone());
        (
            Just(fields),
            Just(value).prop_perturb(|value, mut rng| render_shuffled(&value, &mut rng)),
        )
    })
}

fn sep<R: Rng>(rng: &mut R) -> &'static str {
    if rng.gen_bool(0.5) {
        " "
    } else {
        ""
    }
}

fn render_shuffled<R: Rng>(value: &FieldValue, rng: &mut R) -> String {
    match value {
        FieldValue::Map(map) => {
            let mut entries: Vec<(&String, &FieldValue)> = map.iter().collect();
            for i in (1..entries.len()).rev() {
                let j = rng.gen_range(0..=i);
                entries.swap(i, j);
            }
            let parts: Vec<String> = entries
                .into_iter()
                .map(|(k, v)| {
                    let key = Value::String(k.clone()).to_string();
                    format!("{}:{}{}", key, sep(rng), render_shuffled(v, rng))
                })
                .collect();
            format!("{{{}}}", parts.join(&format!(",{}", sep(rng))))
        }
        FieldValue::List(items) => {
            let parts: Vec<String> = items.iter().map(|v| render_shuffled(v, rng)).collect();
            format!("[{}]", parts.join(","))
        }
        leaf => Value::from(leaf.clone()).to_string(),
    }
}

/// Return a copy of `fields` with the value at position `index` (modulo the
/// field count) replaced by a logically different value.
///
/// Returns `None` for an empty mapping.
pub fn tamper(fields: &Fields, index: usize) -> Option<Fields> {
    let key = fields.keys().nth(index % fields.len().max(1))?.clone();
    let mut out = fields.clone();
    let changed = match &fields[&key] {
        FieldValue::Null => FieldValue::Bool(false),
        FieldValue::Bool(b) => FieldValue::Bool(!b),
        FieldValue::Number(n) => match n.as_i64() {
            Some(i) if i > i64::MIN => FieldValue::from(i - 1),
            _ => FieldValue::Text(n.to_string()),
        },
        FieldValue::Text(s) => FieldValue::Text(format!("{}x", s)),
        FieldValue::List(items) => {
            let mut items = items.clone();
            items.push(FieldValue::Null);
            FieldValue::List(items)
        }
        FieldValue::Map(map) => {
            let mut map = map.clone();
            let extra = format!("{}~", map.keys().last().map(String::as_str).unwrap_or(""));
            map.insert(extra, FieldValue::Null);
            FieldValue::Map(map)
        }
    };
    out.insert(key, changed);
    Some(out)
}
