use anyhow::Context;
use clap::Parser;
use rpc_batch::adapters::console::ProgressLabel;
use rpc_batch::app::{self, RunPlan};
use rpc_batch::config::cli::SetModeArgs;
use rpc_batch::config::inputs::read_addresses;
use rpc_batch::core::request::{mode_change, StreamState};
use rpc_batch::utils::{logger, validation::Validate};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = SetModeArgs::parse();

    // 初始化日誌
    logger::init_logger(args.common.verbose, args.common.log_json);
    tracing::debug!("CLI args: {:?}", args);

    if let Err(e) = args.validate() {
        app::exit_with(&e);
    }

    let settings = args
        .common
        .load_settings()
        .unwrap_or_else(|e| app::exit_with(&e));

    let devices = read_addresses(&args.common.address_file, settings.address_filter())
        .unwrap_or_else(|e| app::exit_with(&e));

    // 將狀態參數轉為字串
    let state = StreamState::from_flag(args.state).unwrap_or_else(|e| app::exit_with(&e));

    let plan = RunPlan {
        request: settings.set_mode_request(),
        devices,
        changes: vec![mode_change(args.index, state)],
        label: ProgressLabel::TransportStream(state),
    };

    let result = app::execute(&settings, plan, args.common.debug)
        .await
        .unwrap_or_else(|e| app::exit_with(&e));

    if let Some(report) = &args.common.report {
        app::write_report(report, &result)
            .with_context(|| format!("writing report to {}", report.display()))?;
    }

    Ok(())
}
