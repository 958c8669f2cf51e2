use anyhow::{bail, Result};
use bodycap::{
    control_channel, BodycapConfig, DirectoryTarget, Exporter, KeyboardInputHandler, MarkerSet,
    MocapPipeline, ReplayDevice,
};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "bodycap")]
#[command(about = "Skeleton tracker that records body motion to TRC files")]
#[command(version)]
#[command(long_about = "Follows one body from a depth sensor stream, shows its skeleton, \
and records joint positions on demand. Press SPACE to start or stop a recording; \
each stopped recording is written as a tab-separated .trc motion file.")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "bodycap.toml", help = "Path to TOML configuration file")]
    config: String,

    /// Body frame recording to replay (JSON lines)
    #[arg(long, value_name = "FILE", help = "Replay body frames from a JSON-lines file")]
    replay: Option<String>,

    /// Directory for exported .trc files
    #[arg(short, long, value_name = "DIR", help = "Directory receiving exported .trc files")]
    output_dir: Option<String>,

    /// Record the whole replay without keyboard control
    #[arg(long, help = "Disable keyboard control; record from start until the input ends")]
    no_keyboard: bool,

    /// Enable debug logging (most verbose)
    #[arg(short, long, help = "Enable debug level logging")]
    debug: bool,

    /// Enable verbose logging (info level)
    #[arg(short, long, help = "Enable verbose info level logging")]
    verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(short, long, help = "Enable quiet mode - only log errors")]
    quiet: bool,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration file and exit")]
    validate_config: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in TOML format and exit")]
    print_config: bool,

    /// Override log format (json, pretty, compact)
    #[arg(long, value_name = "FORMAT", help = "Log output format: json, pretty, or compact")]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config {
        print_default_config()?;
        return Ok(());
    }

    init_logging(&args)?;

    info!("Starting bodycap v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration file: {}", args.config);

    let mut config = match BodycapConfig::load_from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if let Some(replay) = &args.replay {
        config.sensor.replay_path = Some(replay.clone());
    }
    if let Some(output_dir) = &args.output_dir {
        config.recording.output_dir = output_dir.clone();
    }

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        if args.validate_config {
            eprintln!("✗ Configuration validation failed: {}", e);
            std::process::exit(1);
        }
        return Err(e.into());
    }

    if args.validate_config {
        info!("Configuration validation successful");
        println!("✓ Configuration is valid");
        return Ok(());
    }

    let Some(replay_path) = config.sensor.replay_path.clone() else {
        bail!("No body source configured; pass --replay or set sensor.replay_path");
    };
    let device = ReplayDevice::open(&replay_path, config.sensor.loop_replay)?;

    let exporter = Exporter::new(
        Box::new(DirectoryTarget::new(
            &config.recording.output_dir,
            config.recording.file_prefix.clone(),
        )),
        MarkerSet::sensor_joints(),
    );
    let mut pipeline = MocapPipeline::new(&config, Box::new(device), exporter);

    let (sender, receiver) = control_channel(config.system.control_channel_capacity);
    let cancellation_token = CancellationToken::new();

    let keyboard = if args.no_keyboard {
        pipeline.start_recording();
        None
    } else {
        let handler = KeyboardInputHandler::new(sender.clone());
        handler.start().await?;
        Some(handler)
    };

    let ctrl_c_token = cancellation_token.clone();
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            info!("Received SIGINT signal (Ctrl+C)");
            ctrl_c_token.cancel();
        }
    });

    let stats = pipeline
        .run(receiver, config.tick_interval(), cancellation_token)
        .await;

    if let Some(handler) = keyboard {
        handler.stop().await?;
    }
    drop(sender);

    info!(
        "bodycap exited: {} recordings exported, {} export failures",
        stats.recordings_exported, stats.export_failures
    );
    Ok(())
}

fn init_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let log_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("bodycap={}", log_level)));

    let fmt_layer = match args.log_format.as_deref() {
        Some("json") => fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        Some("compact") => fmt::layer()
            .compact()
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .boxed(),
        Some("pretty") | None => fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(args.debug)
            .with_file(args.debug)
            .with_line_number(args.debug)
            .boxed(),
        Some(format) => {
            eprintln!("Warning: Unknown log format '{}', using default", format);
            fmt::layer()
                .with_target(true)
                .with_thread_ids(args.debug)
                .with_file(args.debug)
                .with_line_number(args.debug)
                .boxed()
        }
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .init();

    Ok(())
}

/// Print default configuration in TOML format
fn print_default_config() -> Result<()> {
    println!("# bodycap configuration file");
    println!("# Every value below is the built-in default");
    println!();
    println!("{}", toml::to_string_pretty(&BodycapConfig::default())?);
    Ok(())
}
