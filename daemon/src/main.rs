use clap::Parser;
use grb_daemon::args::Args;
use grb_daemon::watcher::StopSignal;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let resolved = args.resolve()?;

    let stop = StopSignal::new();
    signal_hook::flag::register(signal_hook::consts::SIGTERM, stop.flag())?;
    signal_hook::flag::register(signal_hook::consts::SIGINT, stop.flag())?;

    grb_daemon::run(resolved, &stop)
}
