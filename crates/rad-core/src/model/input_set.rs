//! Una combinación resuelta de artefactos: slot -> rutas elegidas.
//!
//! Transitoria: la produce el armador de matriz y la consumen verificación
//! y resolución de recursos. Su forma canónica serializada es la identidad
//! con la que se deduplica contra assessors existentes.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::hashing::{hash_str, to_canonical_json};
use rad_domain::DomainError;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputSet {
    slots: IndexMap<String, Vec<String>>,
}

impl InputSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot con un único artefacto (el caso normal de una fila de matriz).
    pub fn insert(&mut self, slot: &str, path: &str) {
        self.slots.insert(slot.to_string(), vec![path.to_string()]);
    }

    pub fn insert_many(&mut self, slot: &str, paths: Vec<String>) {
        self.slots.insert(slot.to_string(), paths);
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn paths(&self, slot: &str) -> &[String] {
        self.slots.get(slot).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.slots.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Identidad textual: JSON canónico con slots de un artefacto como
    /// cadena y slots múltiples como array. Es lo que se guarda en el campo
    /// `inputs` del assessor y lo que se compara al deduplicar.
    pub fn canonical_string(&self) -> String {
        let mut obj = Map::new();
        for (slot, paths) in &self.slots {
            let value = match paths.as_slice() {
                [single] => Value::String(single.clone()),
                many => Value::Array(many.iter().map(|p| Value::String(p.clone())).collect()),
            };
            obj.insert(slot.clone(), value);
        }
        to_canonical_json(&Value::Object(obj))
    }

    /// Hash abreviado de la identidad, para logs y resúmenes.
    pub fn fingerprint(&self) -> String {
        hash_str(&self.canonical_string())
    }

    /// Reconstruye el InputSet desde el campo serializado de un registro.
    /// Normaliza todo slot a lista, como hace el paso de build original.
    pub fn from_canonical(serialized: &str) -> Result<Self, DomainError> {
        let value: Value = serde_json::from_str(serialized)?;
        let Value::Object(obj) = value else {
            return Err(DomainError::ValidationError("serialized inputs must be a JSON object".to_string()));
        };
        let mut set = InputSet::new();
        for (slot, v) in obj {
            match v {
                Value::String(s) => set.insert(&slot, &s),
                Value::Array(arr) => {
                    let mut paths = Vec::with_capacity(arr.len());
                    for item in arr {
                        let Value::String(s) = item else {
                            return Err(DomainError::ValidationError(
                                format!("slot {slot} holds a non-string artefact path")));
                        };
                        paths.push(s);
                    }
                    set.insert_many(&slot, paths);
                }
                _ => {
                    return Err(DomainError::ValidationError(
                        format!("slot {slot} holds a non-path value")));
                }
            }
        }
        Ok(set)
    }
}
