//! Transaction outcome types.
//!
//! These mirror the subset of the node's `Transaction` JSON the harness
//! inspects: success flag, `vm_status`, and the emitted events.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::encoding::json_u64_field;
use crate::status::{AbortStatus, VmStatus};

/// An event emitted by a committed transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainEvent {
    #[serde(rename = "type")]
    pub type_tag: String,
    pub sequence_number: Option<u64>,
    pub data: Value,
}

impl ChainEvent {
    pub fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            type_tag: value.get("type")?.as_str()?.to_string(),
            sequence_number: json_u64_field(value, "sequence_number"),
            data: value.get("data").cloned().unwrap_or(Value::Null),
        })
    }

    /// `data.<field>` as a string, if present.
    pub fn data_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(|v| v.as_str())
    }
}

/// Terminal result of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionOutcome {
    pub hash: String,
    pub version: Option<u64>,
    pub success: bool,
    pub vm_status: String,
    pub gas_used: Option<u64>,
    pub events: Vec<ChainEvent>,
}

impl TransactionOutcome {
    /// Parse a committed transaction. Returns `None` while it is still pending
    /// or when the JSON lacks the committed-transaction fields.
    pub fn from_json(value: &Value) -> Option<Self> {
        if is_pending(value) {
            return None;
        }
        let success = value.get("success")?.as_bool()?;
        let vm_status = value.get("vm_status")?.as_str()?.to_string();
        let events = value
            .get("events")
            .and_then(|e| e.as_array())
            .map(|arr| arr.iter().filter_map(ChainEvent::from_value).collect())
            .unwrap_or_default();

        Some(Self {
            hash: value.get("hash")?.as_str()?.to_string(),
            version: json_u64_field(value, "version"),
            success,
            vm_status,
            gas_used: json_u64_field(value, "gas_used"),
            events,
        })
    }

    /// The parsed abort, when the transaction failed with a Move abort.
    pub fn abort_status(&self) -> Option<AbortStatus> {
        if self.success {
            return None;
        }
        match VmStatus::parse(&self.vm_status) {
            VmStatus::Abort(abort) => Some(abort),
            _ => None,
        }
    }
}

/// `true` for the node's `pending_transaction` shape.
pub fn is_pending(value: &Value) -> bool {
    value.get("type").and_then(|t| t.as_str()) == Some("pending_transaction")
}

/// Body for `POST /tables/{handle}/item`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableItemRequest {
    pub key_type: String,
    pub value_type: String,
    pub key: Value,
}
