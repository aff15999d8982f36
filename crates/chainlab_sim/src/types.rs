//! Core types for the simulated chain

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Account or instance address (32 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// Create from bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create from hex string
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Derive a test account address from a name
    pub fn derive(name: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"chainlab_account:");
        hasher.update(name.as_bytes());
        let hash: [u8; 32] = hasher.finalize().into();
        Self(hash)
    }

    /// Get as hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Get bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Zero address
    pub fn zero() -> Self {
        Self([0u8; 32])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", &self.to_hex()[..16])
    }
}

/// Event emitted by a deployed instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event name
    pub name: String,
    /// Event payload (an object; indexed fields are looked up in it)
    pub data: serde_json::Value,
    /// Names of the payload fields that are indexed (filterable)
    pub indexed: Vec<String>,
}

impl Event {
    /// Create new event
    pub fn new(name: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            data,
            indexed: Vec::new(),
        }
    }

    /// Mark a payload field as indexed
    pub fn indexed(mut self, field: impl Into<String>) -> Self {
        self.indexed.push(field.into());
        self
    }
}

/// One committed event emission, in chain order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Global emission sequence number
    pub seq: u64,
    /// Block height at emission
    pub block: u64,
    /// Emitting instance
    pub address: Address,
    /// The event itself
    pub event: Event,
}

/// Result of a successful invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallOutcome {
    /// Return value of the operation
    pub value: serde_json::Value,
    /// Events emitted during the call, in order
    pub events: Vec<Event>,
}

impl CallOutcome {
    /// Create from a bare return value
    pub fn new(value: serde_json::Value) -> Self {
        Self {
            value,
            events: Vec::new(),
        }
    }
}
