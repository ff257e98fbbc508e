use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// A named remote procedure invocation with ordered string parameters.
/// Built by [`crate::core::payload::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    method_name: String,
    params: Vec<String>,
}

impl MethodCall {
    pub(crate) fn from_parts(method_name: String, params: Vec<String>) -> Self {
        Self {
            method_name,
            params,
        }
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }
}

/// A device setting (path expression) and the value to assign to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterChange {
    pub path: String,
    pub value: String,
}

impl ParameterChange {
    pub fn new(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for ParameterChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}]", self.path, self.value)
    }
}

/// Network address of a target device, `host` or `host:port`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceAddress(String);

impl DeviceAddress {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into().trim().to_string())
    }

    /// Accepts only a bare IPv4 or IPv6 address.
    pub fn parse_ip(addr: &str) -> Option<Self> {
        let trimmed = addr.trim();
        trimmed.parse::<IpAddr>().ok().map(|_| Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceAddress {
    fn from(addr: &str) -> Self {
        Self::new(addr)
    }
}

/// Classified result of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum RpcOutcome {
    Success(String),
    RemoteFault(String),
    TransportError(String),
    ParseError(String),
    EncodingError(String),
}

impl RpcOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RpcOutcome::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            RpcOutcome::Success(msg)
            | RpcOutcome::RemoteFault(msg)
            | RpcOutcome::TransportError(msg)
            | RpcOutcome::ParseError(msg)
            | RpcOutcome::EncodingError(msg) => msg,
        }
    }
}

impl fmt::Display for RpcOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcOutcome::Success(_) => f.write_str("ok"),
            other => f.write_str(other.message()),
        }
    }
}

/// One attempted request and how it ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestRecord {
    pub device: DeviceAddress,
    pub change: ParameterChange,
    pub outcome: RpcOutcome,
}

/// Position of a request within the run, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub change_index: usize,
    pub change_total: usize,
    pub device_index: usize,
    pub device_total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub attempted: usize,
    pub records: Vec<RequestRecord>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl BatchResult {
    pub fn new() -> Self {
        Self {
            attempted: 0,
            records: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn record(&mut self, record: RequestRecord) {
        self.attempted += 1;
        self.records.push(record);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn failures(&self) -> impl Iterator<Item = &RequestRecord> {
        self.records.iter().filter(|r| !r.outcome.is_success())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn is_full_success(&self) -> bool {
        self.failure_count() == 0
    }
}

impl Default for BatchResult {
    fn default() -> Self {
        Self::new()
    }
}
