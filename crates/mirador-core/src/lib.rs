#![forbid(unsafe_code)]

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

pub const CRATE_NAME: &str = "mirador-core";

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    Usage = 2,
    Validation = 3,
    DependencyFailure = 4,
    Internal = 10,
}

impl ExitCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Usage => "usage",
            Self::Validation => "validation",
            Self::DependencyFailure => "dependency_failure",
            Self::Internal => "internal",
        }
    }
}

pub const ENV_MIRADOR_LOG: &str = "MIRADOR_LOG";
pub const ENV_MIRADOR_BIND_ADDR: &str = "MIRADOR_BIND_ADDR";
pub const ENV_MIRADOR_GEMINI_API_KEY: &str = "MIRADOR_GEMINI_API_KEY";
pub const ENV_MIRADOR_HOMICIDES_PATH: &str = "MIRADOR_HOMICIDES_PATH";
pub const ENV_MIRADOR_TOURISM_PATH: &str = "MIRADOR_TOURISM_PATH";
pub const ENV_MIRADOR_HAZARDS_PATH: &str = "MIRADOR_HAZARDS_PATH";
pub const ENV_MIRADOR_ASSISTANT_TIMEOUT_MS: &str = "MIRADOR_ASSISTANT_TIMEOUT_MS";

#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MachineError {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub details: BTreeMap<String, String>,
}

impl MachineError {
    #[must_use]
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            details: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_detail(mut self, key: &str, value: &str) -> Self {
        self.details.insert(key.to_string(), value.to_string());
        self
    }
}

impl std::fmt::Display for MachineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for MachineError {}

pub mod canonical {
    use serde::Serialize;
    use serde_json::{Map, Value};
    use sha2::{Digest, Sha256};

    pub fn stable_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
        let raw = serde_json::to_value(value)?;
        let normalized = normalize_json_value(raw);
        serde_json::to_vec(&normalized)
    }

    #[must_use]
    pub fn stable_hash_hex(bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        format!("{:x}", hasher.finalize())
    }

    pub fn stable_json_hash_hex<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
        let bytes = stable_json_bytes(value)?;
        Ok(stable_hash_hex(&bytes))
    }

    fn normalize_json_value(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let mut sorted = Map::new();
                let mut entries: Vec<(String, Value)> = map
                    .into_iter()
                    .map(|(k, v)| (k, normalize_json_value(v)))
                    .collect();
                entries.sort_by(|a, b| a.0.cmp(&b.0));
                for (k, v) in entries {
                    sorted.insert(k, v);
                }
                Value::Object(sorted)
            }
            Value::Array(items) => {
                Value::Array(items.into_iter().map(normalize_json_value).collect())
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sha256_hex_matches_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn canonical_bytes_sort_object_keys_recursively() {
        let a = json!({"b": 1, "a": {"z": 2, "y": [ {"k": 1, "j": 2} ]}});
        let b = json!({"a": {"y": [ {"j": 2, "k": 1} ], "z": 2}, "b": 1});
        let ba = canonical::stable_json_bytes(&a).expect("canonical a");
        let bb = canonical::stable_json_bytes(&b).expect("canonical b");
        assert_eq!(ba, bb);
        assert_eq!(
            canonical::stable_json_hash_hex(&a).expect("hash a"),
            canonical::stable_json_hash_hex(&b).expect("hash b")
        );
    }

    #[test]
    fn machine_error_serializes_with_details() {
        let err = MachineError::new("ingest_failed", "missing column").with_detail("column", "Arma");
        let value = serde_json::to_value(&err).expect("machine error json");
        assert_eq!(value["code"], "ingest_failed");
        assert_eq!(value["details"]["column"], "Arma");
    }

    #[test]
    fn exit_codes_are_stable() {
        assert_eq!(ExitCode::Success as u8, 0);
        assert_eq!(ExitCode::Usage as u8, 2);
        assert_eq!(ExitCode::Validation as u8, 3);
        assert_eq!(ExitCode::DependencyFailure as u8, 4);
        assert_eq!(ExitCode::Internal as u8, 10);
        assert_eq!(ExitCode::Validation.as_str(), "validation");
    }
}
