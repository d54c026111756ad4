use serde_json::Value;

/// Object keys that must never survive canonicalization (prototype-pollution
/// defense — carried over even though this is Rust, since the canonical form
/// must be byte-identical to a JS/TS reimplementation that is vulnerable to it).
const DROPPED_KEYS: [&str; 3] = ["__proto__", "constructor", "prototype"];

/// Render `value` as deterministic, JCS-like canonical JSON: object keys in
/// byte-wise ascending order, no whitespace, no trailing newline, UTF-8
/// output. Numbers and strings pass through `serde_json`'s own literal
/// formatting unchanged — this function does not renormalize numeric
/// representations beyond what `serde_json` already produces.
pub fn canonicalize(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out);
    out
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            out.push_str(&serde_json::to_string(value).expect("primitive JSON values never fail to serialize"));
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map
                .keys()
                .filter(|k| !DROPPED_KEYS.contains(&k.as_str()))
                .collect();
            keys.sort_by(|a, b| a.as_bytes().cmp(b.as_bytes()));

            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&serde_json::to_string(key.as_str()).expect("strings always serialize"));
                out.push(':');
                write_value(&map[*key], out);
            }
            out.push('}');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sorts_keys_byte_wise() {
        let a = canonicalize(&json!({"b": 1, "a": 2}));
        let b = canonicalize(&json!({"a": 2, "b": 1}));
        assert_eq!(a, b);
        assert_eq!(a, r#"{"a":2,"b":1}"#);
    }

    #[test]
    fn no_whitespace_emitted() {
        let v = canonicalize(&json!({"x": [1, 2, 3], "y": "hi"}));
        assert!(!v.contains(' '));
        assert!(!v.contains('\n'));
    }

    #[test]
    fn drops_prototype_pollution_keys() {
        let v = canonicalize(&json!({"__proto__": 1, "constructor": 2, "prototype": 3, "keep": 4}));
        assert_eq!(v, r#"{"keep":4}"#);
    }

    #[test]
    fn nested_objects_reorder_recursively() {
        let a = canonicalize(&json!({"outer": {"z": 1, "a": 2}}));
        let b = canonicalize(&json!({"outer": {"a": 2, "z": 1}}));
        assert_eq!(a, b);
    }

    #[test]
    fn explicit_null_survives_as_literal() {
        let v = canonicalize(&json!({"a": null}));
        assert_eq!(v, r#"{"a":null}"#);
    }
}
