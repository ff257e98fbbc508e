pub mod batch;
pub mod interpreter;
pub mod payload;
pub mod request;

pub use crate::domain::model::{
    BatchResult, DeviceAddress, MethodCall, ParameterChange, Progress, RequestRecord, RpcOutcome,
};
pub use crate::domain::ports::{BatchObserver, ConfigProvider, SilentObserver, Transport};
pub use crate::utils::error::Result;
