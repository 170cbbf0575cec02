mod console;

use clap::Parser;
use std::path::PathBuf;
use tagcraft_blocks::BlockPos;
use tagcraft_core::player::Player;
use tagcraft_core::SessionConfig;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Plays the tag minigame commands from a terminal.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Configuration file, created with defaults if missing
    #[arg(long, default_value = "Config.toml")]
    config: PathBuf,
    /// Name of the player driven from stdin
    #[arg(long, default_value = "Player")]
    name: String,
    /// Tag given to the player; repeat for several
    #[arg(long = "tag")]
    tags: Vec<String>,
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    x: i32,
    #[arg(long, default_value_t = 65, allow_negative_numbers = true)]
    y: i32,
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    z: i32,
}

fn main() -> anyhow::Result<()> {
    // Setup logging
    let logfile = tracing_appender::rolling::daily("./logs", "tagcraft.log");
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var("TAGCRAFT_LOG")
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_writer(logfile.and(std::io::stdout))
        .with_env_filter(env_filter)
        .init();

    let args = Args::parse();
    let config = SessionConfig::load(&args.config)?;
    let player = Player::new(args.name, BlockPos::new(args.x, args.y, args.z)).with_tags(args.tags);

    console::run(config, player)
}
