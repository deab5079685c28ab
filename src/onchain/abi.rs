//! Contract class ABI extraction.
//!
//! `starknet_getClassAt` returns either a legacy (Cairo 0) class, whose `abi`
//! is a JSON array, or a Sierra class, whose `abi` is that same array
//! serialized into a string. Both are normalized to `Abi`.

use serde::Serialize;
use serde_json::Value;

use super::RpcError;

/// ABI entries exactly as the node returned them.
pub type Abi = Vec<Value>;

/// Pull the ABI out of a `starknet_getClassAt` result.
pub fn parse_class_abi(class: &Value) -> Result<Abi, RpcError> {
    match class.get("abi") {
        None | Some(Value::Null) => Err(RpcError::MissingAbi),
        Some(Value::Array(entries)) => Ok(entries.clone()),
        Some(Value::String(raw)) if raw.trim().is_empty() => Err(RpcError::MissingAbi),
        Some(Value::String(raw)) => {
            serde_json::from_str::<Abi>(raw).map_err(|e| RpcError::InvalidAbi(e.to_string()))
        }
        Some(other) => Err(RpcError::InvalidAbi(format!(
            "expected array or string, got {}",
            json_kind(other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Entry counts by kind, descending into Sierra `interface` items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AbiSummary {
    pub functions: usize,
    pub events: usize,
    pub structs: usize,
    pub other: usize,
}

impl AbiSummary {
    pub fn of(abi: &[Value]) -> Self {
        let mut summary = Self::default();
        summary.add(abi);
        summary
    }

    fn add(&mut self, entries: &[Value]) {
        for entry in entries {
            match entry.get("type").and_then(Value::as_str) {
                Some("function") | Some("l1_handler") | Some("constructor") => self.functions += 1,
                Some("event") => self.events += 1,
                Some("struct") => self.structs += 1,
                Some("interface") => {
                    if let Some(items) = entry.get("items").and_then(Value::as_array) {
                        self.add(items);
                    }
                }
                _ => self.other += 1,
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.functions + self.events + self.structs + self.other == 0
    }
}

impl std::fmt::Display for AbiSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        write!(f, "{}fn/{}ev", self.functions, self.events)
    }
}
