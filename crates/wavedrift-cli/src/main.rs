//! CLI for wavedrift: scroll-reactive wave background and marquee, in a terminal.

mod commands;
mod tui;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "wavedrift")]
#[command(about = "wavedrift: scroll-reactive wave background and marquee")]
#[command(version = wavedrift_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Live dashboard: mouse wheel / arrow keys scroll, t toggles theme, c cycles accent
    Live {
        /// Target frame rate
        #[arg(long, default_value = "60")]
        fps: u32,

        /// JSON tuning file (missing fields use defaults)
        #[arg(long)]
        config: Option<String>,

        /// Comma-separated marquee tags (default: a built-in skill list)
        #[arg(long)]
        tags: Option<String>,

        /// Start in the light theme
        #[arg(long)]
        light: bool,
    },

    /// List the accent palettes with brightness and contrast text color
    Palette {
        /// Only show one theme's palette
        #[arg(long, value_parser = ["dark", "light"])]
        theme: Option<String>,
    },

    /// Headless run: feed scroll deltas one per frame and print the motion state
    Simulate {
        /// Comma-separated scroll deltas in pixels, one applied before each frame
        #[arg(long, allow_hyphen_values = true, default_value = "")]
        scroll: String,

        /// Number of frames to run (defaults to the number of deltas + 1)
        #[arg(long)]
        frames: Option<usize>,

        /// Which renderer's motion to report
        #[arg(long, default_value = "waveform", value_parser = ["waveform", "marquee"])]
        effect: String,

        /// JSON tuning file
        #[arg(long)]
        config: Option<String>,

        /// Print one JSON object per frame instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Render the wave background to a PPM image
    Snapshot {
        /// Output path
        #[arg(long, default_value = "wavedrift.ppm")]
        output: String,

        #[arg(long, default_value = "1280")]
        width: usize,

        #[arg(long, default_value = "720")]
        height: usize,

        /// Frames to advance before capturing
        #[arg(long, default_value = "120")]
        frames: usize,

        /// Accent palette entry by name (e.g. "Muted Blue")
        #[arg(long)]
        color: Option<String>,

        /// Render over the light theme background
        #[arg(long)]
        light: bool,

        /// JSON tuning file
        #[arg(long)]
        config: Option<String>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Live {
            fps,
            config,
            tags,
            light,
        } => commands::live::run(commands::live::LiveCommandConfig {
            fps,
            config_path: config.as_deref(),
            tags: tags.as_deref(),
            light,
        }),
        Commands::Palette { theme } => commands::palette::run(theme.as_deref()),
        Commands::Simulate {
            scroll,
            frames,
            effect,
            config,
            json,
        } => commands::simulate::run(commands::simulate::SimulateCommandConfig {
            scroll: &scroll,
            frames,
            effect: &effect,
            config_path: config.as_deref(),
            json,
        }),
        Commands::Snapshot {
            output,
            width,
            height,
            frames,
            color,
            light,
            config,
        } => commands::snapshot::run(commands::snapshot::SnapshotCommandConfig {
            output: &output,
            width,
            height,
            frames,
            color: color.as_deref(),
            light,
            config_path: config.as_deref(),
        }),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
