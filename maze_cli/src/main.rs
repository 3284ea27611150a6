mod cli;
mod commands;
mod error_fmt;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use cli::{Cli, Commands, FILE_GUARD, JSON_MODE};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

fn init_tracing(json: bool, level: Option<&str>, logging: &maze_config::Logging) {
    // RUST_LOG wins over --log-level, which wins over [logging].level
    let default_level = level.or(logging.level.as_deref()).unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let console = if json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(filter)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(filter)
            .boxed()
    };

    let file_layer = logging.file.as_ref().map(|path| {
        let path = std::path::Path::new(path);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| std::path::Path::new("."));
        let name = path
            .file_name()
            .map_or_else(|| "mazebot.log".into(), |n| n.to_string_lossy().into_owned());
        let appender = match logging.rotation.as_deref() {
            Some("daily") => tracing_appender::rolling::daily(dir, name),
            Some("hourly") => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        fmt::layer()
            .json()
            .with_writer(writer)
            .with_filter(EnvFilter::new(default_level))
    });

    let _ = tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .try_init();
}

fn report_error(err: &eyre::Report) -> i32 {
    if JSON_MODE.get().copied().unwrap_or(false) {
        println!("{}", error_fmt::format_error_json(err));
    } else {
        eprintln!("{}", error_fmt::humanize(err));
    }
    tracing::debug!(error = ?err, "command failed");
    error_fmt::exit_code_for_error(err)
}

fn run(cli: Cli) -> eyre::Result<()> {
    let cfg = commands::load_config(cli.config.as_deref())?;
    init_tracing(cli.json, cli.log_level.as_deref(), &cfg.logging);

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = stop.clone();
        if let Err(e) = ctrlc::set_handler(move || stop.store(true, Ordering::Relaxed)) {
            tracing::warn!(error = %e, "failed to install Ctrl-C handler; cancellation disabled");
        }
    }

    match cli.cmd {
        Commands::Solve { overrides, seed } => {
            commands::run_solve(&cfg, &overrides, seed, cli.json, stop)
        }
        Commands::Stats {
            overrides,
            runs,
            seed,
        } => commands::run_stats(&cfg, &overrides, runs, seed, cli.json, stop),
        Commands::SelfCheck => commands::run_self_check(&cfg, cli.json),
    }
}

fn main() {
    let _ = color_eyre::install();
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(err) = run(cli) {
        let code = report_error(&err);
        std::process::exit(code);
    }
}
