//! Top-level frame loop.
//!
//! `AppState` owns the classifier, the zone tracker, the scene and the ledger
//! worker.  It consumes one keypoint [`Frame`] at a time and is ticked once per
//! rendered frame; `run` wires it to a keypoint source and the window.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use gesture_ledger::{
    DirContentStore, GestureRecord, LedgerAdapter, LedgerOutcome, LedgerWorker, LocalChain,
    MemoryContentStore,
};
use pose_gesture::{Gesture, GestureClassifier, Pose};
use pose_zones::{Vec3, ZoneTracker};
use tracing::{debug, info, warn};

use crate::config::{AppConfig, LedgerConfig, SourceConfig, SourceKind};
use crate::scene::Scene;
use crate::source::{
    spawn_keypoint_source, Frame, JsonlKeypointSource, KeypointSource, SimInput,
    SimKeypointSource,
};
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// Ledger start-up
// ════════════════════════════════════════════════════════════════════════════

/// Connect the wallet, open the metadata store and move the adapter onto
/// its worker thread.
pub fn start_ledger(cfg: &LedgerConfig) -> gesture_ledger::Result<LedgerWorker> {
    let chain = match &cfg.account {
        Some(addr) => LocalChain::connected(addr.clone()),
        None       => LocalChain::disconnected(),
    };
    match &cfg.store_dir {
        Some(dir) => {
            let mut adapter = LedgerAdapter::new(DirContentStore::open(dir)?, chain);
            adapter.initialize()?;
            Ok(LedgerWorker::spawn(adapter))
        }
        None => {
            let mut adapter = LedgerAdapter::new(MemoryContentStore::default(), chain);
            adapter.initialize()?;
            Ok(LedgerWorker::spawn(adapter))
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    // ── recognition ──────────────────────────────────────────────────────
    classifier: GestureClassifier,
    zones:      ZoneTracker,
    /// Gestures found for each body in the last frame.
    detections: Vec<Vec<Gesture>>,

    // ── presentation ─────────────────────────────────────────────────────
    scene:      Scene,
    pub status: String,

    // ── ledger ───────────────────────────────────────────────────────────
    ledger:        Option<LedgerWorker>,
    cooldown:      Duration,
    last_submit:   Option<(Gesture, Instant)>,
    ledger_status: Option<String>,
}

impl AppState {
    pub fn new(cfg: &AppConfig) -> Self {
        let mut zones = ZoneTracker::new();
        for z in &cfg.scene.zones {
            zones.add_zone(Vec3::from(z.center), z.radius);
        }

        let (ledger, ledger_status) = if cfg.ledger.enabled {
            match start_ledger(&cfg.ledger) {
                Ok(worker) => (Some(worker), Some("Ledger ready".to_string())),
                Err(e) => {
                    warn!(error = %e, "ledger unavailable; gestures will not be recorded");
                    (None, Some(format!("Ledger unavailable: {}", e)))
                }
            }
        } else {
            (None, None)
        };

        AppState {
            classifier: GestureClassifier::new(
                cfg.classifier.history_capacity,
                cfg.classifier.thresholds,
            ),
            zones,
            detections: Vec::new(),
            scene:      Scene::from_config(&cfg.scene),
            status:     "Waiting for poses".to_string(),
            ledger,
            cooldown:      cfg.ledger.cooldown(),
            last_submit:   None,
            ledger_status,
        }
    }

    // ── process one keypoint frame ────────────────────────────────────────

    pub fn handle_frame(&mut self, frame: &[Pose], now: Instant) {
        self.scene.set_bodies(frame);
        self.detections.clear();

        if frame.is_empty() {
            self.status = "No poses detected".to_string();
            return;
        }
        self.status = format!("Detecting poses - Found: {}", frame.len());

        for pose in frame {
            let gestures = self.classifier.classify_at(pose, now);
            if let Some(&first) = gestures.first() {
                if let Some(anchor) = pose.first() {
                    self.scene.spawn_feedback(Vec3::from(anchor));
                }
                self.submit(first, pose, now);
            }
            self.zones.check(pose, &mut self.scene);
            self.detections.push(gestures);
        }
    }

    /// Hand `gesture` to the ledger unless the same gesture went out less
    /// than one cooldown ago.
    fn submit(&mut self, gesture: Gesture, pose: &Pose, now: Instant) {
        let Some(worker) = self.ledger.as_ref() else { return };

        if let Some((last, at)) = self.last_submit {
            if last == gesture && now.saturating_duration_since(at) < self.cooldown {
                return;
            }
        }

        let record = GestureRecord::new(gesture, pose.mean_score(gesture.joints()));
        if worker.submit(record) {
            debug!(%gesture, "submitted to ledger");
            self.last_submit = Some((gesture, now));
        } else {
            warn!("ledger thread gone; disabling ledger");
            self.ledger = None;
        }
    }

    /// The keypoint stream closed; keep rendering what is left.
    pub fn source_ended(&mut self) {
        self.scene.set_bodies(&[]);
        self.detections.clear();
        self.status = "Keypoint source ended".to_string();
    }

    // ── Per-frame tick ────────────────────────────────────────────────────

    pub fn tick(&mut self, dt: Duration) {
        self.scene.tick(dt);

        let outcomes = match &self.ledger {
            Some(worker) => worker.drain_outcomes(),
            None         => return,
        };
        for outcome in outcomes {
            match outcome {
                LedgerOutcome::Minted(r) => {
                    self.ledger_status = Some(format!("Minted block {}", r.block));
                }
                LedgerOutcome::Failed { gesture, error } => {
                    self.ledger_status = Some(format!("Ledger disabled: {} ({})", error, gesture));
                    self.ledger = None;
                }
            }
        }
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn scene(&self)         -> &Scene              { &self.scene }
    pub fn zones(&self)         -> &ZoneTracker        { &self.zones }
    pub fn detections(&self)    -> &[Vec<Gesture>]     { &self.detections }
    pub fn classifier(&self)    -> &GestureClassifier  { &self.classifier }
    pub fn ledger_status(&self) -> Option<&str>        { self.ledger_status.as_deref() }
    pub fn ledger_enabled(&self) -> bool               { self.ledger.is_some() }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

fn open_source(cfg: &SourceConfig, sim_rx: Receiver<SimInput>) -> Result<Box<dyn KeypointSource>> {
    Ok(match cfg.kind {
        SourceKind::Sim   => Box::new(SimKeypointSource::new(sim_rx)),
        SourceKind::Jsonl => Box::new(
            JsonlKeypointSource::open(&cfg.input, cfg.frame_interval())
                .with_context(|| format!("opening keypoint stream {}", cfg.input.display()))?,
        ),
    })
}

/// Feed every queued frame to `app`.  True once the source has closed.
fn drain_frames(rx: &Receiver<Frame>, app: &mut AppState) -> bool {
    loop {
        match rx.try_recv() {
            Ok(frame)                       => app.handle_frame(&frame, Instant::now()),
            Err(TryRecvError::Empty)        => return false,
            Err(TryRecvError::Disconnected) => return true,
        }
    }
}

/// Run the stage until the window closes or `Q` is pressed.
pub fn run(cfg: AppConfig) -> Result<()> {
    // ── Keypoint source ───────────────────────────────────────────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    let mut frames = match open_source(&cfg.source, sim_rx) {
        Ok(source) => Some(spawn_keypoint_source(source)),
        Err(e) => {
            warn!("keypoint source unavailable: {:#}", e);
            None
        }
    };

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let mut vis = Visualizer::new(&cfg.window, sim_tx)?;

    // ── App state ─────────────────────────────────────────────────────────
    let mut app = AppState::new(&cfg);
    if frames.is_none() {
        app.status = "Keypoint source unavailable".to_string();
    }
    info!(source = ?cfg.source.kind, ledger = app.ledger_enabled(), "stage open");

    // ── Main loop ─────────────────────────────────────────────────────────
    let mut last = Instant::now();
    while vis.is_open() {
        if !vis.poll_input() { break; }

        if let Some(rx) = &frames {
            if drain_frames(rx, &mut app) {
                info!("keypoint source closed");
                app.source_ended();
                frames = None;
            }
        }

        let now = Instant::now();
        app.tick(now - last);
        last = now;

        vis.render(
            app.scene(),
            app.zones(),
            app.detections(),
            &app.status,
            app.ledger_status(),
        );
    }

    info!("stage closed");
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
