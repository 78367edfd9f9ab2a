//! Typed invocation context passed from the tix host to a plugin
//!
//! The host constructs a fresh context for every invocation and the plugin
//! treats it as read-only. Only three fields are guaranteed by the contract:
//! the plugin name, the ticket root, and an optional ticket record. Hosts may
//! serialize additional fields; unknown keys are ignored on deserialization.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const STAMP_DIR: &str = ".tix";
const METADATA_FILE: &str = "info.toml";

#[derive(Debug, Error)]
pub enum TicketError {
    #[error("Not a tix ticket workspace (missing {0})")]
    MissingStamp(PathBuf),

    #[error("Failed to read ticket stamp {path}")]
    ReadStamp {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid ticket stamp {path}")]
    ParseStamp {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Context for a single plugin invocation.
///
/// `ticket` is the only optional field: the host omits it when the invocation
/// happens outside a ticket workspace. `plugin_name` and `ticket_root` are
/// always present; their absence in a context file is a host bug and fails
/// deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginContext {
    /// Registered name of the invoked plugin.
    pub plugin_name: String,

    /// Root location for the current ticket. Treated as an opaque string;
    /// hosts conventionally pass an absolute filesystem path.
    pub ticket_root: String,

    /// Ticket record, if the host resolved one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket: Option<Ticket>,
}

impl PluginContext {
    /// Returns the ticket identifier, if the ticket carries one.
    ///
    /// Absent ticket, absent `id` key, and a null `id` value all yield `None`.
    pub fn ticket_id(&self) -> Option<&TicketValue> {
        self.ticket
            .as_ref()
            .and_then(Ticket::id)
            .filter(|v| !matches!(v, TicketValue::Null))
    }
}

/// Ticket record: string keys mapped to primitive values.
///
/// Backed by a `BTreeMap` so iteration order is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticket(BTreeMap<String, TicketValue>);

impl Ticket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a value by key.
    pub fn get(&self, key: &str) -> Option<&TicketValue> {
        self.0.get(key)
    }

    /// Returns the value of the conventional `id` key.
    pub fn id(&self) -> Option<&TicketValue> {
        self.get("id")
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<TicketValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TicketValue)> {
        self.0.iter()
    }

    /// Loads the `.tix/info.toml` stamp from a ticket workspace.
    ///
    /// Useful when the host passed only a `ticket_root` and the plugin wants
    /// the ticket metadata anyway. Errors if the stamp is missing or invalid.
    pub fn load(ticket_root: impl AsRef<Path>) -> Result<Self, TicketError> {
        let path = ticket_root.as_ref().join(STAMP_DIR).join(METADATA_FILE);

        if !path.exists() {
            return Err(TicketError::MissingStamp(path));
        }

        let content = fs::read_to_string(&path).map_err(|source| TicketError::ReadStamp {
            path: path.clone(),
            source,
        })?;

        let table: toml::Table =
            toml::from_str(&content).map_err(|source| TicketError::ParseStamp { path, source })?;

        Ok(table
            .into_iter()
            .map(|(k, v)| (k, TicketValue::from(v)))
            .collect())
    }
}

impl FromIterator<(String, TicketValue)> for Ticket {
    fn from_iter<I: IntoIterator<Item = (String, TicketValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A primitive ticket value.
///
/// Hosts are free to put arbitrary data into a ticket record; the plugin
/// contract only requires that values be retrievable generically. Compound
/// values (arrays, nested tables) degrade to their serialized text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum TicketValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Serialize for TicketValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TicketValue::Null => serializer.serialize_unit(),
            TicketValue::Bool(b) => serializer.serialize_bool(*b),
            TicketValue::Integer(i) => serializer.serialize_i64(*i),
            TicketValue::Float(f) => serializer.serialize_f64(*f),
            TicketValue::String(s) => serializer.serialize_str(s),
        }
    }
}

impl From<serde_json::Value> for TicketValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => TicketValue::Null,
            serde_json::Value::Bool(b) => TicketValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => TicketValue::Integer(i),
                None => TicketValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => TicketValue::String(s),
            // Compound values keep their compact JSON rendering
            other => TicketValue::String(other.to_string()),
        }
    }
}

impl From<toml::Value> for TicketValue {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => TicketValue::String(s),
            toml::Value::Integer(i) => TicketValue::Integer(i),
            toml::Value::Float(f) => TicketValue::Float(f),
            toml::Value::Boolean(b) => TicketValue::Bool(b),
            toml::Value::Datetime(d) => TicketValue::String(d.to_string()),
            other => TicketValue::String(other.to_string()),
        }
    }
}

impl From<&str> for TicketValue {
    fn from(s: &str) -> Self {
        TicketValue::String(s.to_string())
    }
}

impl From<String> for TicketValue {
    fn from(s: String) -> Self {
        TicketValue::String(s)
    }
}

impl fmt::Display for TicketValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketValue::Null => write!(f, "None"),
            TicketValue::Bool(b) => write!(f, "{}", b),
            TicketValue::Integer(i) => write!(f, "{}", i),
            TicketValue::Float(x) => write!(f, "{}", x),
            TicketValue::String(s) => write!(f, "{}", s),
        }
    }
}
