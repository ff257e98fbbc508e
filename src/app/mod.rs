// Application layer: wires settings, transport and reporter into a batch run.

use crate::adapters::console::{ConsoleReporter, ProgressLabel};
use crate::adapters::http::HttpTransport;
use crate::config::Settings;
use crate::core::batch::BatchRunner;
use crate::core::request::RequestKind;
use crate::domain::model::{BatchResult, DeviceAddress, ParameterChange};
use crate::utils::error::{BatchError, Result};
use std::path::Path;

/// Everything one binary invocation will send.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub request: RequestKind,
    pub devices: Vec<DeviceAddress>,
    pub changes: Vec<ParameterChange>,
    pub label: ProgressLabel,
}

/// Runs the plan over HTTP, printing progress to stdout.
pub async fn execute(settings: &Settings, plan: RunPlan, echo_responses: bool) -> Result<BatchResult> {
    let transport = HttpTransport::from_config(settings)?;
    let runner = BatchRunner::new(transport, plan.request);
    let mut reporter = ConsoleReporter::stdout(plan.label, echo_responses);

    if plan.devices.is_empty() {
        tracing::warn!("No device addresses to send to");
    }

    Ok(runner.run(&plan.devices, &plan.changes, &mut reporter).await)
}

pub fn write_report<P: AsRef<Path>>(path: P, result: &BatchResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    std::fs::write(path.as_ref(), json)?;
    tracing::info!("📁 Report saved to: {}", path.as_ref().display());
    Ok(())
}

/// Reports a fatal error and stops the process.
pub fn exit_with(err: &BatchError) -> ! {
    tracing::error!("❌ {}", err);
    eprintln!("❌ {}", err.user_friendly_message());
    eprintln!("💡 {}", err.recovery_suggestion());
    std::process::exit(1)
}
