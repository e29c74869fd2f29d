use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use image_trace::{ExactSize, Quality, TraceOptions};
use inkburst_core::effects::CATALOG;
use inkburst_core::{
    AlwaysOpen, ChannelSink, CommandSink, DrawConfig, DrawSession, Effect, InstantTimer,
    PixelText, RecordingSink, Timer, TokioTimer, TransportGate, config::parse_draw_delay,
};
use std::path::PathBuf;
use std::sync::Arc;
use stroke_canvas::{Color, CommandBatch, DrawCommand, Vec2};
use tokio::io::AsyncWriteExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "inkburst",
    version,
    about = "Runs InkBurst drawing effects offline",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// YAML drawing configuration
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
    /// Pause after each replayed command or text pixel, in milliseconds
    #[arg(long, value_name = "MS", global = true)]
    delay: Option<String>,
    /// Fixed random seed
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Pace with real sleeps instead of finishing immediately
    #[arg(long, global = true)]
    realtime: bool,
    /// Print every command as a socket frame on stdout
    #[arg(long, global = true)]
    frames: bool,
    /// Save the produced commands as a JSON batch
    #[arg(long, value_name = "FILE", global = true)]
    export: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the named effects
    List,
    /// Run a named effect
    Run { effect: String },
    /// Draw text with the pixel font
    Text {
        text: String,
        #[arg(long, default_value_t = 0.1)]
        x: f32,
        #[arg(long, default_value_t = 0.45)]
        y: f32,
        #[arg(long, default_value_t = 0.015)]
        size: f32,
        #[arg(long, default_value = "#000000")]
        color: String,
    },
    /// Replay a saved command batch
    Replay { file: PathBuf },
    /// Convert an image into a command batch
    Convert(ConvertArgs),
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Input image (png, jpg, bmp, gif)
    input: PathBuf,
    /// Where to write the batch
    #[arg(short, long, default_value = "commands.json")]
    output: PathBuf,
    /// Palette size, 1-16
    #[arg(long, default_value_t = 8)]
    max_colors: usize,
    /// Stroke thickness, 1-50
    #[arg(long, default_value_t = 2)]
    thickness: u32,
    /// Resize factor, 0.1-2.0; ignored with --exact-size
    #[arg(long, default_value_t = 1.0)]
    scale: f32,
    /// Outline fidelity: low, medium or high
    #[arg(long, default_value = "medium")]
    quality: Quality,
    /// Exact output size in pixels, e.g. 67.3x67.3
    #[arg(long, value_name = "WxH")]
    exact_size: Option<ExactSize>,
}

impl ConvertArgs {
    fn options(&self) -> TraceOptions {
        TraceOptions {
            max_colors: self.max_colors,
            thickness: self.thickness,
            scale: self.scale,
            exact_size: self.exact_size,
            quality: self.quality,
        }
    }
}

async fn convert(args: &ConvertArgs) -> Result<()> {
    let input = args.input.clone();
    let options = args.options();
    let batch = tokio::task::spawn_blocking(move || image_trace::convert_file(&input, &options))
        .await?
        .with_context(|| format!("Failed to convert {}", args.input.display()))?;
    batch
        .write_to(&args.output)
        .with_context(|| format!("Failed to write batch to {}", args.output.display()))?;
    tracing::info!(
        output = %args.output.display(),
        commands = batch.len(),
        estimated = %batch.metadata.estimated_draw_time,
        "Converted image"
    );
    println!("{} commands -> {}", batch.len(), args.output.display());
    Ok(())
}

/// Records every command and optionally streams it to a frame writer.
struct PlaygroundSink {
    record: RecordingSink,
    stream: Option<ChannelSink>,
}

impl CommandSink for PlaygroundSink {
    fn send(&self, cmd: &DrawCommand) -> bool {
        let streamed = self.stream.as_ref().is_none_or(|s| s.send(cmd));
        streamed && self.record.send(cmd)
    }
}

impl TransportGate for PlaygroundSink {
    fn is_open(&self) -> bool {
        self.stream.as_ref().is_none_or(|s| s.is_open())
    }
}

fn load_config(cli: &Cli) -> Result<DrawConfig> {
    let mut config = match &cli.config {
        Some(path) => DrawConfig::load(path)?,
        None => DrawConfig::default(),
    }
    .with_env_overrides();
    if let Some(raw) = &cli.delay {
        config.draw_delay_ms = parse_draw_delay(Some(raw));
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    Ok(config)
}

fn resolve_effect(command: &Command) -> Result<Option<Effect>> {
    Ok(match command {
        Command::List | Command::Convert(_) => None,
        Command::Run { effect } => Some(effect.parse()?),
        Command::Text {
            text,
            x,
            y,
            size,
            color,
        } => {
            let color: Color = color.parse().context("Invalid --color")?;
            Some(Effect::Text(PixelText::new(
                text.clone(),
                Vec2::new(*x, *y),
                *size,
                color,
            )))
        }
        Command::Replay { file } => {
            let batch = CommandBatch::read_from(file)
                .with_context(|| format!("Failed to load batch {}", file.display()))?;
            Some(Effect::Replay(batch))
        }
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Command::Convert(args) = &cli.command {
        return convert(args).await;
    }
    let Some(effect) = resolve_effect(&cli.command)? else {
        for effect in CATALOG {
            println!("{:<26} {}", effect.name(), effect.title());
        }
        return Ok(());
    };
    let config = load_config(&cli)?;

    let (stream, writer) = if cli.frames {
        let (sink, mut rx) = ChannelSink::new();
        let writer = tokio::spawn(async move {
            let mut stdout = tokio::io::stdout();
            while let Some(frame) = rx.recv().await {
                if stdout.write_all(frame.as_bytes()).await.is_err()
                    || stdout.write_all(b"\n").await.is_err()
                {
                    break;
                }
            }
            stdout.flush().await.ok();
        });
        (Some(sink), Some(writer))
    } else {
        (None, None)
    };

    let sink = Arc::new(PlaygroundSink {
        record: RecordingSink::new(),
        stream,
    });
    let gate: Arc<dyn TransportGate> = if cli.frames {
        sink.clone()
    } else {
        Arc::new(AlwaysOpen)
    };
    let timer: Arc<dyn Timer> = if cli.realtime {
        Arc::new(TokioTimer)
    } else {
        Arc::new(InstantTimer)
    };
    let surface = config.surface;
    let session = Arc::new(
        DrawSession::builder()
            .with_sink(sink.clone())
            .with_gate(gate)
            .with_timer(timer)
            .with_config(config)
            .build(),
    );

    let stopper = session.clone();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stopper.stop();
        }
    });

    let report = session.run(&effect).await?;

    if let Some(path) = &cli.export {
        let batch = CommandBatch::new(effect.name(), sink.record.take(), &surface);
        batch
            .write_to(path)
            .with_context(|| format!("Failed to export batch to {}", path.display()))?;
        tracing::info!(path = %path.display(), commands = batch.len(), "Exported batch");
    }

    // Closing the channel lets the writer drain and exit.
    ctrl_c.abort();
    ctrl_c.await.ok();
    drop(session);
    drop(sink);
    if let Some(writer) = writer {
        writer.await.ok();
    }

    eprintln!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
