//! `pose_mesh.toml`.  Every field is optional.
//!
//! ```toml
//! [window]
//! width  = 960
//! height = 720
//!
//! [classifier]
//! history_capacity = 64
//! thresholds = { squat_gap = 0.2, level = 0.1, wave_travel = 0.5 }
//!
//! [[scene.boxes]]
//! position = [0.66, 0.22, 0.0]
//! color    = 0x00ff00
//!
//! [[scene.zones]]
//! center = [0.8, 0.3, 0.0]
//! radius = 0.1
//!
//! [ledger]
//! enabled     = true
//! account     = "0x5fe2…"
//! store_dir   = "gesture_metadata"
//! cooldown_ms = 2000
//!
//! [source]
//! kind  = "jsonl"
//! input = "poses.jsonl"
//! fps   = 30
//!
//! [server]
//! port       = 3000
//! public_dir = "public"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ValueEnum;
use pose_gesture::Thresholds;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub window:     WindowConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub scene:      SceneConfig,
    #[serde(default)]
    pub ledger:     LedgerConfig,
    #[serde(default)]
    pub source:     SourceConfig,
    #[serde(default)]
    pub server:     ServerConfig,
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }
}

// ── window ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width:  usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_title")]
    pub title:  String,
}

fn default_width() -> usize { 960 }
fn default_height() -> usize { 720 }
fn default_title() -> String { "Pose Mesh — gesture stage".to_string() }

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width:  default_width(),
            height: default_height(),
            title:  default_title(),
        }
    }
}

// ── classifier ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// Ring size of the gesture history.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    #[serde(default)]
    pub thresholds:       Thresholds,
}

fn default_history_capacity() -> usize { 64 }

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            thresholds:       Thresholds::default(),
        }
    }
}

// ── scene ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct BoxConfig {
    pub position: [f32; 3],
    #[serde(default = "default_box_color")]
    pub color:    u32,
    #[serde(default = "default_box_size")]
    pub size:     f32,
}

fn default_box_color() -> u32 { 0x00FF00 }
fn default_box_size() -> f32 { 0.2 }

#[derive(Debug, Clone, Deserialize)]
pub struct ZoneConfig {
    pub center: [f32; 3],
    #[serde(default = "default_zone_radius")]
    pub radius: f32,
}

fn default_zone_radius() -> f32 { pose_zones::DEFAULT_ZONE_RADIUS }

#[derive(Debug, Clone, Deserialize)]
pub struct SceneConfig {
    #[serde(default = "default_boxes")]
    pub boxes:          Vec<BoxConfig>,
    #[serde(default = "default_zones")]
    pub zones:          Vec<ZoneConfig>,
    /// Most feedback effects alive at once.
    #[serde(default = "default_feedback_limit")]
    pub feedback_limit: usize,
}

fn default_boxes() -> Vec<BoxConfig> {
    vec![BoxConfig {
        position: [0.66, 0.22, 0.0],
        color:    default_box_color(),
        size:     0.08,
    }]
}

fn default_zones() -> Vec<ZoneConfig> {
    vec![ZoneConfig { center: [0.8, 0.3, 0.0], radius: 0.1 }]
}

fn default_feedback_limit() -> usize { 16 }

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            boxes:          default_boxes(),
            zones:          default_zones(),
            feedback_limit: default_feedback_limit(),
        }
    }
}

// ── ledger ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    #[serde(default)]
    pub enabled:     bool,
    /// Wallet address; without one the ledger fails to initialize.
    #[serde(default)]
    pub account:     Option<String>,
    /// Metadata directory; in-memory storage when unset.
    #[serde(default)]
    pub store_dir:   Option<PathBuf>,
    /// Minimum gap between two submissions of the same gesture.
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
}

fn default_cooldown_ms() -> u64 { 2000 }

impl LedgerConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            enabled:     false,
            account:     None,
            store_dir:   None,
            cooldown_ms: default_cooldown_ms(),
        }
    }
}

// ── source ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Keyboard-driven puppet.
    Sim,
    /// JSON-lines poses from a file or stdin.
    Jsonl,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_source_kind")]
    pub kind:  SourceKind,
    /// Path for `jsonl`; `-` is stdin.
    #[serde(default = "default_input")]
    pub input: PathBuf,
    /// Playback pacing for `jsonl`; 0 delivers lines as fast as they arrive.
    #[serde(default = "default_fps")]
    pub fps:   u32,
}

fn default_source_kind() -> SourceKind { SourceKind::Sim }
fn default_input() -> PathBuf { PathBuf::from("-") }
fn default_fps() -> u32 { 30 }

impl SourceConfig {
    pub fn frame_interval(&self) -> Option<Duration> {
        (self.fps > 0).then(|| Duration::from_secs(1) / self.fps)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind:  default_source_kind(),
            input: default_input(),
            fps:   default_fps(),
        }
    }
}

// ── server ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port:       u16,
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
}

fn default_port() -> u16 { 3000 }
fn default_public_dir() -> PathBuf { PathBuf::from("public") }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port:       default_port(),
            public_dir: default_public_dir(),
        }
    }
}
