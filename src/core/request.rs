use crate::core::payload;
use crate::domain::model::{MethodCall, ParameterChange};
use crate::utils::error::{BatchError, Result};
use std::fmt;

pub const SET_PARAMETERS_METHOD: &str = "setBoxParameters";
pub const SET_MODE_METHOD: &str = "setModeMediaLevel";

const TRANSPORT_STREAM_PATH: &str = "/viper/outputList/output[2]/transportStreamList/transportStream";

/// The request variants a batch can send. Both go through the same client;
/// they differ only in method name and argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    /// `[path, value]`
    SetParameters { method: String },
    /// `[path, state, ""]`
    SetModeMediaLevel { method: String },
}

impl RequestKind {
    pub fn set_parameters() -> Self {
        RequestKind::SetParameters {
            method: SET_PARAMETERS_METHOD.to_string(),
        }
    }

    pub fn set_mode() -> Self {
        RequestKind::SetModeMediaLevel {
            method: SET_MODE_METHOD.to_string(),
        }
    }

    pub fn method_name(&self) -> &str {
        match self {
            RequestKind::SetParameters { method } | RequestKind::SetModeMediaLevel { method } => {
                method
            }
        }
    }

    pub fn build_call(&self, change: &ParameterChange) -> MethodCall {
        match self {
            RequestKind::SetParameters { method } => {
                payload::build(method, [change.path.as_str(), change.value.as_str()])
            }
            RequestKind::SetModeMediaLevel { method } => {
                payload::build(method, [change.path.as_str(), change.value.as_str(), ""])
            }
        }
    }
}

/// Operating state for a transport stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Offline,
    Online,
}

impl StreamState {
    pub fn from_flag(flag: u32) -> Result<Self> {
        match flag {
            0 => Ok(StreamState::Offline),
            1 => Ok(StreamState::Online),
            other => Err(BatchError::InvalidConfigValueError {
                field: "state".to_string(),
                value: other.to_string(),
                reason: "State must be either 0 (Offline) or 1 (Online)".to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StreamState::Offline => "Offline",
            StreamState::Online => "Online",
        }
    }
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Path of the 1-based transport stream `index`; 0 addresses every stream.
pub fn transport_stream_path(index: u32) -> String {
    if index == 0 {
        TRANSPORT_STREAM_PATH.to_string()
    } else {
        format!("{}[{}]", TRANSPORT_STREAM_PATH, index)
    }
}

/// The single change a mode-set run applies to every device.
pub fn mode_change(index: u32, state: StreamState) -> ParameterChange {
    ParameterChange::new(transport_stream_path(index), state.as_str())
}
