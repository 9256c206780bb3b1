//! Identidad canónica de los InputSets.
//!
//! El archivo compara el campo `inputs` de un assessor como texto plano, así
//! que la serialización tiene que ser estable: claves ordenadas, compacta,
//! sin whitespace. El hash abrevia esa cadena para logs y resúmenes.

use blake3::Hasher;
use serde_json::Value;

/// Serializa un valor JSON en forma canónica (claves ordenadas, compacto).
pub fn to_canonical_json(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => serde_json::to_string(s).unwrap(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(to_canonical_json).collect();
            format!("[{}]", items.join(","))
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let items: Vec<String> = keys.into_iter()
                                         .map(|k| format!("{}:{}", serde_json::to_string(k).unwrap(), to_canonical_json(&map[k])))
                                         .collect();
            format!("{{{}}}", items.join(","))
        }
    }
}

/// Hashea un string y devuelve hex.
pub fn hash_str(input: &str) -> String {
    let mut h = Hasher::new();
    h.update(input.as_bytes());
    h.finalize().to_hex().to_string()
}

/// Hash hex del JSON canónico de `value`.
pub fn hash_value(value: &Value) -> String {
    hash_str(&to_canonical_json(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn canonical_json_sorts_keys_and_compacts() {
        let v = json!({"scan2": "/p/b", "scan1": "/p/a"});
        assert_eq!(to_canonical_json(&v), r#"{"scan1":"/p/a","scan2":"/p/b"}"#);
    }

    #[test]
    fn canonical_json_preserves_array_order() {
        let v = json!({"assr1": ["/p/x", "/p/y"]});
        assert_eq!(to_canonical_json(&v), r#"{"assr1":["/p/x","/p/y"]}"#);
    }

    #[test]
    fn hash_is_stable_across_key_order() {
        let a = json!({"a": 1, "b": 2});
        let b = json!({"b": 2, "a": 1});
        assert_eq!(hash_value(&a), hash_value(&b));
    }
}
