use crate::domain::model::{BatchResult, DeviceAddress, MethodCall, Progress, RequestRecord};
use crate::utils::error::RpcError;
use async_trait::async_trait;
use std::time::Duration;

/// Delivers a method call to a device and hands back the raw response body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, device: &DeviceAddress, call: &MethodCall) -> Result<String, RpcError>;
}

pub trait ConfigProvider: Send + Sync {
    fn timeout(&self) -> Duration;
    fn endpoint_path(&self) -> &str;
}

/// Receives batch events as they happen. Every method defaults to a no-op.
pub trait BatchObserver {
    fn on_response(&mut self, _device: &DeviceAddress, _body: &str) {}
    fn on_success(&mut self, _record: &RequestRecord, _progress: Progress) {}
    fn on_failure(&mut self, _record: &RequestRecord, _progress: Progress) {}
    fn on_complete(&mut self, _result: &BatchResult) {}
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl BatchObserver for SilentObserver {}
