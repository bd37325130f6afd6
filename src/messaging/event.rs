use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

// ============================================================================
// Domain Events
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventType {
    Create,
    Update,
    Delete,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Create => "Create",
            EventType::Update => "Update",
            EventType::Delete => "Delete",
        }
    }
}

/// Immutable record of one entity lifecycle change. The payload is the
/// entity exactly as it stood at the time of the operation.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Event {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "eventType")]
    pub event_type: EventType,
    pub payload: Value,
}

impl Event {
    pub fn new(event_type: EventType, payload: impl Serialize) -> Result<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event_type,
            payload: serde_json::to_value(payload)?,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
