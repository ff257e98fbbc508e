use anyhow::Context;
use clap::Parser;
use rpc_batch::adapters::console::ProgressLabel;
use rpc_batch::app::{self, RunPlan};
use rpc_batch::config::cli::SetParamsArgs;
use rpc_batch::config::inputs::{read_addresses, read_changes};
use rpc_batch::utils::{logger, validation::Validate};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = SetParamsArgs::parse();

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

    // Each input is checked on its own so the failing file is named.
    let devices = read_addresses(&args.common.address_file, settings.address_filter())
        .unwrap_or_else(|e| app::exit_with(&e));
    let changes = read_changes(&args.change_file).unwrap_or_else(|e| app::exit_with(&e));

    let plan = RunPlan {
        request: settings.set_parameters_request(),
        devices,
        changes,
        label: ProgressLabel::Parameters,
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
