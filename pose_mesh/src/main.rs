//! pose_mesh — stage entry point.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use pose_mesh::app::run;
use pose_mesh::config::{AppConfig, SourceKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "pose_mesh.toml";

#[derive(Parser, Debug)]
#[command(name = "pose_mesh", version, about = "Gesture-driven skeleton stage")]
struct Args {
    /// Config file (defaults to ./pose_mesh.toml when present)
    #[arg(long, env = "POSE_MESH_CONFIG")]
    config: Option<PathBuf>,

    /// Keypoint source
    #[arg(long, value_enum)]
    source: Option<SourceKind>,

    /// JSON-lines input for `--source jsonl` (`-` for stdin)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Record recognised gestures to the ledger
    #[arg(long)]
    ledger: bool,

    /// Ignore any config file and start with defaults
    #[arg(long)]
    quick: bool,
}

fn load_config(args: &Args) -> Result<AppConfig> {
    if args.quick {
        return Ok(AppConfig::default());
    }
    match &args.config {
        Some(path) => AppConfig::load(path),
        None if Path::new(DEFAULT_CONFIG).exists() => AppConfig::load(DEFAULT_CONFIG),
        None => Ok(AppConfig::default()),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut cfg = load_config(&args)?;

    if let Some(kind) = args.source {
        cfg.source.kind = kind;
    }
    if let Some(input) = args.input {
        cfg.source.input = input;
        if args.source.is_none() {
            cfg.source.kind = SourceKind::Jsonl;
        }
    }
    if args.ledger {
        cfg.ledger.enabled = true;
    }

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║             Pose Mesh — gesture-driven skeleton stage         ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    info!(
        source = ?cfg.source.kind,
        ledger = cfg.ledger.enabled,
        zones  = cfg.scene.zones.len(),
        boxes  = cfg.scene.boxes.len(),
        "starting stage",
    );

    run(cfg)
}
