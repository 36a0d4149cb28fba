/// Soul Control - playback control console
use clap::Parser;
use soul_control::{ListenerId, PlayControl, StatusListenerHandle, TrackListenerHandle};
use soul_control_console::{run_command, Command, ConsoleConfig, ConsoleListener};
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "soul-control")]
#[command(about = "Soul Player playback control console", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "SOUL_CONTROL_CONFIG")]
    config: Option<PathBuf>,

    /// Tracks appended to the configured library
    tracks: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = ConsoleConfig::load(cli.config.as_deref())?;
    config.validate()?;

    // Initialize tracing (stdout carries events, logs go to stderr)
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let tracks = config.tracks(&cli.tracks);
    tracing::info!("Starting Soul Control with {} tracks", tracks.len());

    let control = PlayControl::new(tracks, config.playback_config());

    let console = Arc::new(ConsoleListener::new(io::stdout()));
    let id = ListenerId::generate();
    control.register_track_listener(TrackListenerHandle::new(id, console.clone()));
    control.register_status_listener(StatusListenerHandle::new(id, console));

    for line in io::stdin().lock().lines() {
        let line = line?;
        match Command::parse(&line) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => println!("{}", run_command(&control, command)),
            Err(e) => eprintln!("{}", e),
        }
    }

    control.connection_died(id);
    control.release_playback_resources();

    Ok(())
}
