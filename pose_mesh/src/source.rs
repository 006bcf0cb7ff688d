//! Keypoint providers: the keyboard puppet and JSON-lines streams.
//!
//! The public interface is a [`Frame`] (every pose seen in one camera frame)
//! delivered over a `mpsc` channel.  The frame loop doesn't care whether the
//! poses came from a model, a recording, or the puppet.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use pose_gesture::Pose;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::puppet::{Puppet, Stance, HAND_STEP};

/// All poses detected in one frame; empty when nobody is in view.
pub type Frame = Vec<Pose>;

// ════════════════════════════════════════════════════════════════════════════
// KeypointSource trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`Frame`]s over a channel.  Returning from
/// `run` closes the stream.
pub trait KeypointSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<Frame>);
}

/// Spawn a keypoint source on its own thread and return the receiving end.
pub fn spawn_keypoint_source(source: Box<dyn KeypointSource>) -> Receiver<Frame> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || source.run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// SimKeypointSource — keyboard puppet
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the stage window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimInput {
    KeyDown(SimKey),
    KeyUp(SimKey),
}

/// Simulated key codes (mapped from minifb Key).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimKey {
    RaiseHands, // H
    Squat,      // C
    TPose,      // T
    Wave,       // W, held
    Left,       // ←
    Right,      // →
    Up,         // ↑
    Down,       // ↓
    ToggleBody, // N
    Quit,       // Q
}

/// Arrow keys currently held.
#[derive(Debug, Default, Clone, Copy)]
struct Steering {
    left:  bool,
    right: bool,
    up:    bool,
    down:  bool,
}

impl Steering {
    fn delta(&self) -> (f32, f32) {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32 * HAND_STEP;
        (axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Animates a [`Puppet`] from window key events at a fixed frame rate.
pub struct SimKeypointSource {
    rx:       Receiver<SimInput>,
    interval: Duration,
}

impl SimKeypointSource {
    pub fn new(rx: Receiver<SimInput>) -> Self {
        SimKeypointSource { rx, interval: Duration::from_millis(33) }
    }
}

/// Apply one input to the puppet.  False on quit.
fn apply_input(puppet: &mut Puppet, steering: &mut Steering, input: SimInput) -> bool {
    let (key, down) = match input {
        SimInput::KeyDown(k) => (k, true),
        SimInput::KeyUp(k)   => (k, false),
    };
    match (key, down) {
        (SimKey::Quit, _)           => return false,
        (SimKey::RaiseHands, true)  => puppet.toggle_stance(Stance::RaisedHands),
        (SimKey::Squat, true)       => puppet.toggle_stance(Stance::Squat),
        (SimKey::TPose, true)       => puppet.toggle_stance(Stance::TPose),
        (SimKey::ToggleBody, true)  => puppet.toggle_present(),
        (SimKey::Wave, held)        => puppet.set_waving(held),
        (SimKey::Left, held)        => steering.left  = held,
        (SimKey::Right, held)       => steering.right = held,
        (SimKey::Up, held)          => steering.up    = held,
        (SimKey::Down, held)        => steering.down  = held,
        _ => {}
    }
    true
}

impl KeypointSource for SimKeypointSource {
    fn run(self: Box<Self>, tx: Sender<Frame>) {
        let mut puppet   = Puppet::new();
        let mut steering = Steering::default();

        loop {
            loop {
                match self.rx.try_recv() {
                    Ok(input) => {
                        if !apply_input(&mut puppet, &mut steering, input) {
                            info!("puppet source stopped");
                            return;
                        }
                    }
                    Err(TryRecvError::Empty)        => break,
                    Err(TryRecvError::Disconnected) => return,
                }
            }

            let (dx, dy) = steering.delta();
            puppet.move_hand(dx, dy);
            puppet.step();

            let frame: Frame = puppet.pose().into_iter().collect();
            if tx.send(frame).is_err() {
                return;
            }
            thread::sleep(self.interval);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// JsonlKeypointSource — recorded or piped poses
// ════════════════════════════════════════════════════════════════════════════

/// One line of input: a single pose or every pose in the frame.
#[derive(Deserialize)]
#[serde(untagged)]
enum FrameLine {
    Many(Vec<Pose>),
    One(Pose),
}

/// Parse one JSON line into a frame.
pub fn parse_frame(line: &str) -> serde_json::Result<Frame> {
    Ok(match serde_json::from_str::<FrameLine>(line)? {
        FrameLine::Many(poses) => poses,
        FrameLine::One(pose)   => vec![pose],
    })
}

/// Reads one frame per line.  Blank and malformed lines are skipped.
pub struct JsonlKeypointSource {
    reader:   Box<dyn BufRead + Send>,
    interval: Option<Duration>,
}

impl JsonlKeypointSource {
    /// Open `path` (`-` for stdin).  `interval` paces delivery; `None` sends
    /// frames as fast as they are read.
    pub fn open(path: &Path, interval: Option<Duration>) -> io::Result<Self> {
        let reader: Box<dyn BufRead + Send> = if path == Path::new("-") {
            Box::new(BufReader::new(io::stdin()))
        } else {
            Box::new(BufReader::new(File::open(path)?))
        };
        Ok(JsonlKeypointSource { reader, interval })
    }

    pub fn from_reader<R: BufRead + Send + 'static>(reader: R, interval: Option<Duration>) -> Self {
        JsonlKeypointSource { reader: Box::new(reader), interval }
    }
}

impl KeypointSource for JsonlKeypointSource {
    fn run(self: Box<Self>, tx: Sender<Frame>) {
        let JsonlKeypointSource { reader, interval } = *self;
        let mut sent = 0usize;

        for (n, line) in reader.lines().enumerate() {
            let line = match line {
                Ok(l)  => l,
                Err(e) => {
                    warn!(error = %e, "keypoint stream read failed");
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            let frame = match parse_frame(&line) {
                Ok(f)  => f,
                Err(e) => {
                    warn!(line = n + 1, error = %e, "skipping malformed pose line");
                    continue;
                }
            };
            debug!(line = n + 1, poses = frame.len(), "frame");
            if tx.send(frame).is_err() {
                return;
            }
            sent += 1;
            if let Some(d) = interval {
                thread::sleep(d);
            }
        }
        info!(frames = sent, "keypoint stream ended");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pose_gesture::Joint;
    use std::io::Cursor;

    const WAIT: Duration = Duration::from_secs(2);

    #[test]
    fn single_pose_and_array_lines() {
        let one = parse_frame(r#"{"keypoints":[{"name":"nose","x":0.5,"y":0.2}]}"#).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].get(Joint::Nose).unwrap().z, 0.0);

        let many = parse_frame(r#"[{"keypoints":[]},{"keypoints":[{"name":"nose","x":0.1,"y":0.1,"score":0.7}]}]"#).unwrap();
        assert_eq!(many.len(), 2);
        assert!(many[0].is_empty());
        assert_eq!(many[1].get(Joint::Nose).unwrap().score, Some(0.7));

        assert!(parse_frame("[]").unwrap().is_empty());
        assert!(parse_frame("{\"poses\": 3}").is_err());
    }

    #[test]
    fn jsonl_skips_bad_lines_and_closes() {
        let input = concat!(
            "{\"keypoints\":[{\"name\":\"nose\",\"x\":0.5,\"y\":0.2}]}\n",
            "not json\n",
            "\n",
            "[]\n",
        );
        let src = JsonlKeypointSource::from_reader(Cursor::new(input), None);
        let rx  = spawn_keypoint_source(Box::new(src));

        assert_eq!(rx.recv_timeout(WAIT).unwrap().len(), 1);
        assert_eq!(rx.recv_timeout(WAIT).unwrap().len(), 0);
        assert!(rx.recv_timeout(WAIT).is_err());
    }

    #[test]
    fn open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let res = JsonlKeypointSource::open(&dir.path().join("nope.jsonl"), None);
        assert!(res.is_err());
    }

    #[test]
    fn inputs_drive_the_puppet() {
        let mut p = Puppet::new();
        let mut s = Steering::default();

        assert!(apply_input(&mut p, &mut s, SimInput::KeyDown(SimKey::TPose)));
        assert_eq!(p.stance(), Stance::TPose);
        // key-up never toggles
        apply_input(&mut p, &mut s, SimInput::KeyUp(SimKey::TPose));
        assert_eq!(p.stance(), Stance::TPose);

        apply_input(&mut p, &mut s, SimInput::KeyDown(SimKey::Wave));
        assert!(p.is_waving());
        apply_input(&mut p, &mut s, SimInput::KeyUp(SimKey::Wave));
        assert!(!p.is_waving());

        apply_input(&mut p, &mut s, SimInput::KeyDown(SimKey::Right));
        apply_input(&mut p, &mut s, SimInput::KeyDown(SimKey::Up));
        assert_eq!(s.delta(), (HAND_STEP, -HAND_STEP));
        apply_input(&mut p, &mut s, SimInput::KeyUp(SimKey::Right));
        assert_eq!(s.delta(), (0.0, -HAND_STEP));

        assert!(!apply_input(&mut p, &mut s, SimInput::KeyDown(SimKey::Quit)));
    }

    #[test]
    fn sim_source_streams_until_quit() {
        let (in_tx, in_rx) = mpsc::channel();
        let rx = spawn_keypoint_source(Box::new(SimKeypointSource::new(in_rx)));

        assert_eq!(rx.recv_timeout(WAIT).unwrap().len(), 1);
        in_tx.send(SimInput::KeyDown(SimKey::ToggleBody)).unwrap();
        let empty = (0..10).any(|_| rx.recv_timeout(WAIT).map_or(false, |f| f.is_empty()));
        assert!(empty);

        in_tx.send(SimInput::KeyDown(SimKey::Quit)).unwrap();
        while rx.recv_timeout(WAIT).is_ok() {}
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Disconnected)));
    }
}
