use crate::core::interpreter;
use crate::core::request::RequestKind;
use crate::domain::model::{
    BatchResult, DeviceAddress, ParameterChange, Progress, RequestRecord, RpcOutcome,
};
use crate::domain::ports::{BatchObserver, Transport};
use crate::utils::error::RpcError;
use std::time::Instant;

/// Applies every parameter change to every device, one request at a time.
pub struct BatchRunner<T: Transport> {
    transport: T,
    request: RequestKind,
}

impl<T: Transport> BatchRunner<T> {
    pub fn new(transport: T, request: RequestKind) -> Self {
        Self { transport, request }
    }

    pub fn request(&self) -> &RequestKind {
        &self.request
    }

    /// Runs the whole batch. Changes are the outer loop and devices the
    /// inner one. No failure stops the run.
    pub async fn run<O: BatchObserver>(
        &self,
        devices: &[DeviceAddress],
        changes: &[ParameterChange],
        observer: &mut O,
    ) -> BatchResult {
        let started = Instant::now();
        let mut result = BatchResult::new();

        tracing::info!(
            "🚀 Sending {} to {} device(s) for {} change(s)",
            self.request.method_name(),
            devices.len(),
            changes.len()
        );

        for (i, change) in changes.iter().enumerate() {
            for (j, device) in devices.iter().enumerate() {
                let progress = Progress {
                    change_index: i + 1,
                    change_total: changes.len(),
                    device_index: j + 1,
                    device_total: devices.len(),
                };

                let outcome = self.execute(device, change, observer).await;
                let record = RequestRecord {
                    device: device.clone(),
                    change: change.clone(),
                    outcome,
                };

                if record.outcome.is_success() {
                    observer.on_success(&record, progress);
                } else {
                    tracing::debug!("{} {} failed: {}", device, change, record.outcome);
                    observer.on_failure(&record, progress);
                }
                result.record(record);
            }
        }

        result.finish();
        tracing::info!(
            "Batch finished: {} request(s), {} failure(s), took {:?}",
            result.attempted,
            result.failure_count(),
            started.elapsed()
        );
        observer.on_complete(&result);
        result
    }

    async fn execute<O: BatchObserver>(
        &self,
        device: &DeviceAddress,
        change: &ParameterChange,
        observer: &mut O,
    ) -> RpcOutcome {
        let call = self.request.build_call(change);

        let outcome = match self.transport.send(device, &call).await {
            Ok(body) => {
                observer.on_response(device, &body);
                interpreter::interpret(&body)
            }
            Err(RpcError::Encoding(reason)) => RpcOutcome::EncodingError(reason),
            Err(e) => RpcOutcome::TransportError(e.to_string()),
        };

        tracing::debug!(
            device = %device,
            method = call.method_name(),
            path = %change.path,
            "outcome: {:?}",
            outcome
        );
        outcome
    }
}
