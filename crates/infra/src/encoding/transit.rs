//! Transit+JSON request bodies (`application/transit+json`).
//!
//! Commands are written in Transit's verbose JSON form: maps stay JSON
//! objects and no key caching is applied. Two rules differ from plain JSON:
//!
//! - strings (values and keys) starting with `~`, `^` or `` ` `` get a
//!   leading `~`, so the reader does not mistake them for tagged values;
//! - integers beyond ±(2^53 - 1) are written as `"~i<digits>"` because
//!   JSON readers may lose precision on them.

use std::borrow::Cow;

use serde::{Serialize, Serializer};
use serde_json::{Number, Value};
use stitch_core::ports::RequestEncoder;
use stitch_domain::constants::TRANSIT_CONTENT_TYPE;
use stitch_domain::{Result, StitchError};

use crate::errors::InfraError;

const ESC: char = '~';
const SUB: char = '^';
const RESERVED: char = '`';

/// Largest integer a JSON reader is guaranteed to represent exactly.
const JSON_INT_MAX: u64 = (1 << 53) - 1;

/// Encodes commands as Transit verbose JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct TransitJsonEncoder;

impl RequestEncoder for TransitJsonEncoder {
    fn content_type(&self) -> &'static str {
        TRANSIT_CONTENT_TYPE
    }

    fn encode(&self, commands: &[Value]) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(commands.len() * 128);
        let mut serializer = serde_json::Serializer::new(&mut out);
        serializer
            .collect_seq(commands.iter().map(Transit))
            .map_err(|err| StitchError::from(InfraError::from(err)))?;
        Ok(out)
    }
}

/// Serializes a JSON value with Transit escaping applied.
struct Transit<'a>(&'a Value);

impl Serialize for Transit<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.0 {
            Value::String(s) => serializer.serialize_str(&escape(s)),
            Value::Number(n) => match tagged_integer(n) {
                Some(tagged) => serializer.serialize_str(&tagged),
                None => n.serialize(serializer),
            },
            Value::Array(items) => serializer.collect_seq(items.iter().map(Transit)),
            Value::Object(map) => {
                serializer.collect_map(map.iter().map(|(key, value)| (escape(key), Transit(value))))
            }
            other => other.serialize(serializer),
        }
    }
}

fn escape(s: &str) -> Cow<'_, str> {
    match s.chars().next() {
        Some(ESC | SUB | RESERVED) => Cow::Owned(format!("{ESC}{s}")),
        _ => Cow::Borrowed(s),
    }
}

fn tagged_integer(n: &Number) -> Option<String> {
    if let Some(i) = n.as_i64() {
        return (i.unsigned_abs() > JSON_INT_MAX).then(|| format!("{ESC}i{i}"));
    }
    n.as_u64().filter(|u| *u > JSON_INT_MAX).map(|u| format!("{ESC}i{u}"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn encode(value: Value) -> String {
        String::from_utf8(TransitJsonEncoder.encode(&[value]).unwrap()).unwrap()
    }

    #[test]
    fn test_plain_command_matches_json() {
        let command = json!({
            "action": "upsert",
            "sequence": 1_700_000_000_000_i64,
            "table_name": "users",
            "key_names": ["id"],
            "data": {"id": 1, "score": 2.5, "active": true, "note": null},
            "client_id": 4242
        });

        assert_eq!(encode(command.clone()), format!("[{}]", serde_json::to_string(&command).unwrap()));
    }

    #[test]
    fn test_reserved_prefixes_escaped() {
        assert_eq!(encode(json!({"a": "~tilde"})), r#"[{"a":"~~tilde"}]"#);
        assert_eq!(encode(json!({"a": "^caret"})), r#"[{"a":"~^caret"}]"#);
        assert_eq!(encode(json!({"a": "`tick"})), r#"[{"a":"~`tick"}]"#);
        assert_eq!(encode(json!({"a": "mid~dle"})), r#"[{"a":"mid~dle"}]"#);
        assert_eq!(encode(json!({"a": ""})), r#"[{"a":""}]"#);
    }

    #[test]
    fn test_map_keys_escaped() {
        assert_eq!(encode(json!({"~key": 1})), r#"[{"~~key":1}]"#);
    }

    #[test]
    fn test_large_integers_tagged() {
        let max_safe = (1_i64 << 53) - 1;
        assert_eq!(encode(json!({"n": max_safe})), format!(r#"[{{"n":{max_safe}}}]"#));
        assert_eq!(encode(json!({"n": max_safe + 1})), r#"[{"n":"~i9007199254740992"}]"#);
        assert_eq!(encode(json!({"n": -(max_safe + 1)})), r#"[{"n":"~i-9007199254740992"}]"#);
        assert_eq!(encode(json!({"n": u64::MAX})), r#"[{"n":"~i18446744073709551615"}]"#);
    }

    #[test]
    fn test_nested_values_escaped() {
        assert_eq!(
            encode(json!({"data": {"tags": ["^a", {"~b": "`c"}]}})),
            r#"[{"data":{"tags":["~^a",{"~~b":"~`c"}]}}]"#
        );
    }

    #[test]
    fn test_key_order_preserved() {
        assert_eq!(encode(json!({"z": 1, "a": 2, "m": 3})), r#"[{"z":1,"a":2,"m":3}]"#);
    }

    #[test]
    fn test_multiple_commands() {
        let body = TransitJsonEncoder.encode(&[json!({"a": 1}), json!({"b": 2})]).unwrap();
        assert_eq!(body, br#"[{"a":1},{"b":2}]"#.to_vec());
    }
}
