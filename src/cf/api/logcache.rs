//! Log-cache reader. Envelopes carry base64 payloads and nanosecond timestamps.

use super::ccerror::CcError;
use super::connection::{ApiFlavor, Connection, Request};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MessageType {
    #[default]
    Out,
    Err,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogMessage {
    pub message: String,
    pub message_type: MessageType,
    pub timestamp: DateTime<Utc>,
    pub source_type: String,
    pub source_instance: String,
}

impl LogMessage {
    pub fn staging(&self) -> bool {
        self.source_type == "STG"
    }

    pub fn nanos(&self) -> i64 {
        self.timestamp.timestamp_nanos_opt().unwrap_or_default()
    }

    /// `2018-01-01T00:00:00.00+0000 [STG/0] OUT`
    pub fn header(&self) -> String {
        let centis = self.timestamp.timestamp_subsec_millis() / 10;
        let stream = match self.message_type {
            MessageType::Out => "OUT",
            MessageType::Err => "ERR",
        };
        format!(
            "{}.{:02}{} [{}/{}] {}",
            self.timestamp.format("%Y-%m-%dT%H:%M:%S"),
            centis,
            self.timestamp.format("%z"),
            self.source_type,
            self.source_instance,
            stream
        )
    }
}

pub trait LogCacheClient {
    /// Log envelopes for `source_guid` newer than `start_time` (unix nanos), oldest first.
    fn read(&self, source_guid: &str, start_time: i64) -> Result<Vec<LogMessage>, CcError>;
}

impl<T: LogCacheClient + ?Sized> LogCacheClient for &T {
    fn read(&self, source_guid: &str, start_time: i64) -> Result<Vec<LogMessage>, CcError> {
        (**self).read(source_guid, start_time)
    }
}

#[derive(Debug, Deserialize)]
struct LogBody {
    #[serde(default)]
    payload: String,
    #[serde(default, rename = "type")]
    log_type: String,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    timestamp: String,
    #[serde(default)]
    instance_id: String,
    #[serde(default)]
    tags: BTreeMap<String, String>,
    #[serde(default)]
    log: Option<LogBody>,
}

#[derive(Debug, Default, Deserialize)]
struct Batch {
    #[serde(default)]
    batch: Vec<Envelope>,
}

#[derive(Debug, Deserialize)]
struct ReadResponse {
    #[serde(default)]
    envelopes: Batch,
}

fn to_message(envelope: Envelope) -> Option<LogMessage> {
    let log = envelope.log?;
    let payload = STANDARD.decode(log.payload.as_bytes()).ok()?;
    let nanos: i64 = envelope.timestamp.parse().ok()?;
    Some(LogMessage {
        message: String::from_utf8_lossy(&payload).into_owned(),
        message_type: if log.log_type == "ERR" {
            MessageType::Err
        } else {
            MessageType::Out
        },
        timestamp: DateTime::from_timestamp_nanos(nanos),
        source_type: envelope.tags.get("source_type").cloned().unwrap_or_default(),
        source_instance: envelope.instance_id,
    })
}

fn decode_batch(body: ReadResponse) -> Vec<LogMessage> {
    let mut messages: Vec<_> = body
        .envelopes
        .batch
        .into_iter()
        .filter_map(to_message)
        .collect();
    messages.sort_by_key(|m| m.timestamp);
    messages
}

#[derive(Debug, Clone)]
pub struct Client {
    connection: Connection,
}

impl Client {
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }
}

impl LogCacheClient for Client {
    fn read(&self, source_guid: &str, start_time: i64) -> Result<Vec<LogMessage>, CcError> {
        let request = Request::get(format!("/api/v1/read/{source_guid}"))
            .query("start_time", start_time.to_string())
            .query("envelope_types", "LOG");
        self.connection
            .make_json::<ReadResponse>(request, ApiFlavor::V3)
            .result
            .map(decode_batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_log_envelopes_and_skips_others() {
        let json = r#"{"envelopes": {"batch": [
            {"timestamp": "1514764800500000000", "instance_id": "0",
             "tags": {"source_type": "APP/PROC/WEB"},
             "log": {"payload": "aGVsbG8gZXJy", "type": "ERR"}},
            {"timestamp": "1514764800000000000", "instance_id": "0",
             "tags": {"source_type": "STG"},
             "log": {"payload": "U3RhZ2luZy4uLg==", "type": "OUT"}},
            {"timestamp": "1514764801000000000", "counter": {"name": "requests"}}
        ]}}"#;
        let messages = decode_batch(serde_json::from_str(json).unwrap());

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].message, "Staging...");
        assert!(messages[0].staging());
        assert_eq!(messages[1].message, "hello err");
        assert_eq!(messages[1].message_type, MessageType::Err);
    }

    #[test]
    fn header_matches_cf_log_format() {
        let message = LogMessage {
            message: "hi".into(),
            message_type: MessageType::Out,
            timestamp: DateTime::from_timestamp_nanos(1_514_764_800_250_000_000),
            source_type: "STG".into(),
            source_instance: "0".into(),
        };
        assert_eq!(message.header(), "2018-01-01T00:00:00.25+0000 [STG/0] OUT");
    }
}
