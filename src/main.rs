use calendario_eventi::calendar::controller::CalendarController;
use calendario_eventi::calendar::progress::TerminalProgress;
use calendario_eventi::calendar::view::{CalendarView, JsonCalendar, TerminalCalendar};
use calendario_eventi::cli::Cli;
use calendario_eventi::config::env_loader::load_config;
use calendario_eventi::config::model::Config;
use calendario_eventi::tracing::setup_tracing;
use calendario_eventi::virgilio::normalizer::EventNormalizer;
use clap::Parser;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let loki = setup_tracing(cli.debug).await;
    let config = load_config();

    info!("Starting with {:?}", config);

    let normalizer = EventNormalizer::new(config.reference_year);
    let exit_code = if cli.json {
        let view = JsonCalendar::new(io::stdout());
        run(CalendarController::new(view, normalizer), &cli, &config).await
    } else {
        let view = TerminalCalendar::new(io::stdout(), cli.month);
        run(CalendarController::new(view, normalizer), &cli, &config).await
    };

    if let Some((controller, handle)) = loki {
        controller.shutdown().await;
        if let Err(err) = handle.await {
            warn!("Loki task ended abruptly: {}", err);
        }
    }

    exit_code
}

async fn run<V: CalendarView>(
    controller: CalendarController<V>,
    cli: &Cli,
    config: &Config,
) -> ExitCode {
    let mut controller = controller.with_filter(&cli.filter);
    let dataset = cli.dataset.as_deref().unwrap_or(&config.dataset);

    if controller.initialize(dataset).await.is_err() {
        return ExitCode::FAILURE;
    }

    if let Some(index) = cli.select {
        if controller.select_event(index).is_none() {
            warn!("There's no event number {}", index);
        }
    }

    if cli.refresh {
        let progress = controller
            .refresh(
                &config.refresh_url,
                cli.refresh_mode,
                Arc::new(TerminalProgress),
                config.progress_window,
            )
            .await;

        if let Err(err) = progress.await {
            warn!("Progress bar task failed: {}", err);
        }
    }

    ExitCode::SUCCESS
}
