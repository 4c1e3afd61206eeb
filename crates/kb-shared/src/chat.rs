//! Payloads returned by the chat assistant endpoints

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Every chat endpoint wraps its payload with a `status` field
#[derive(Debug, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct CreateSessionResponse {
    pub status: String,
    pub session_id: String,
}

#[derive(Debug, serde::Deserialize, Clone, PartialEq)]
pub struct SessionListResponse {
    pub status: String,
    #[serde(default)]
    pub sessions: Vec<SessionSummary>,
}

#[derive(Debug, serde::Deserialize, Clone, PartialEq)]
pub struct HistoryResponse {
    pub status: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, serde::Deserialize, Clone, PartialEq)]
pub struct SymptomsResponse {
    pub status: String,
    #[serde(default)]
    pub symptoms: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct SessionSummary {
    pub id: String,
    pub title: String,
    /// Seconds since the unix epoch
    pub created_at: f64,
    /// Seconds since the unix epoch
    pub updated_at: f64,
    pub message_count: u32,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
    /// Seconds since the unix epoch
    #[serde(default)]
    pub timestamp: Option<f64>,
}

impl SessionSummary {
    pub fn updated_at_utc(&self) -> Option<DateTime<Utc>> {
        epoch_seconds_to_utc(self.updated_at)
    }
}

impl ChatMessage {
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        self.timestamp.and_then(epoch_seconds_to_utc)
    }
}

fn epoch_seconds_to_utc(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.trunc() as i64;
    let nanos = ((seconds - seconds.trunc()) * 1e9).round() as u32;
    DateTime::from_timestamp(whole, nanos.min(999_999_999))
}
