pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::{SetModeArgs, SetParamsArgs};

pub use crate::adapters::console::{ConsoleReporter, ProgressLabel};
pub use crate::adapters::http::HttpTransport;
pub use crate::config::{AddressFilter, Settings};
pub use crate::core::batch::BatchRunner;
pub use crate::core::request::RequestKind;
pub use crate::domain::model::{BatchResult, DeviceAddress, MethodCall, ParameterChange, RpcOutcome};
pub use crate::utils::error::{BatchError, Result, RpcError};
