use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use eyewatch::{App, GeneratorMode, Settings};

#[derive(Parser, Debug)]
#[command(name = "eyewatch")]
#[command(about = "Simulated eye-health dashboard with a background watcher")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Data mode: "daily" snapshot or "rolling" windows
    #[arg(short, long)]
    mode: Option<GeneratorMode>,

    /// Seed for reproducible mock data
    #[arg(long)]
    seed: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Directory holding the cascade XML files
    #[arg(long)]
    assets: Option<PathBuf>,
}

impl Args {
    fn apply(self, settings: &mut Settings) {
        if let Some(host) = self.host {
            settings.server.host = host;
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if let Some(mode) = self.mode {
            settings.generator.mode = mode;
        }
        if self.seed.is_some() {
            settings.generator.seed = self.seed;
        }
        if self.debug {
            settings.server.debug = true;
        }
        if let Some(dir) = self.assets {
            settings.assets.dir = dir;
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    args.apply(&mut settings);

    init_tracing(settings.server.debug);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(settings))
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "eyewatch=debug" } else { "eyewatch=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(settings: Settings) -> Result<()> {
    let addr = settings.server.listen_addr();
    info!(
        mode = %settings.generator.mode,
        interval_secs = settings.watcher.interval_secs,
        assets = %settings.assets.dir.display(),
        "Starting eye health dashboard"
    );

    let app = Arc::new(App::new(settings));
    let listener = eyewatch::server::bind(&addr).await?;

    eyewatch::server::serve(listener, app, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}
