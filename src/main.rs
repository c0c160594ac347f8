use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use silitop::app::App;
use silitop::config::{self, load_config, load_config_from_path};
use silitop::{sampler, soc};
use tokio_util::sync::CancellationToken;
use tracing::error;

#[derive(Parser)]
#[command(name = "silitop", version, about = "Apple Silicon performance monitor")]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sampling interval in milliseconds
    #[arg(short, long)]
    interval: Option<u64>,

    /// UI color: green, red, blue, cyan, magenta, yellow, white
    #[arg(short, long)]
    color: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // powermetrics is a root-owned capability; without it there is nothing
    // to monitor.
    #[cfg(unix)]
    if !running_as_root() {
        println!("Welcome to silitop! Please try again and run silitop with sudo privileges!");
        println!("Usage: sudo silitop");
        return Ok(());
    }

    color_eyre::install()?;
    init_tracing();

    let config = load_config_for_cli(&cli);
    let soc = soc::detect()?;
    let profile = soc::ChipProfile::from_soc(&soc);

    let mut terminal = ratatui::init();
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let cancel = CancellationToken::new();
    let (streams, sampler_task) =
        sampler::spawn(config.general.interval_ms, profile, cancel.clone());
    let app = App::new(&config, soc);

    let result = app.run(&mut terminal, streams, cancel.clone()).await;

    ratatui::restore();

    cancel.cancel();
    match sampler_task.await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => {
            error!(%err, "sampler failed");
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    }

    result
}

#[cfg(unix)]
fn running_as_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}

fn load_config_for_cli(cli: &Cli) -> config::Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(interval) = cli.interval {
        config.general.interval_ms = interval;
    }
    if let Some(ref color) = cli.color {
        config.colors.accent = color.clone();
    }

    config
}

/// Logs go to a file since stdout belongs to the TUI. A failure to set up
/// logging is not worth dying over.
fn init_tracing() {
    let path = log_path();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let Ok(file) = std::fs::File::create(&path) else {
        return;
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("silitop=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn log_path() -> PathBuf {
    let dir = dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(std::env::temp_dir);
    dir.join("silitop").join("silitop.log")
}
