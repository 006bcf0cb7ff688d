//! Software-rendered stage using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  grid                                      ( zone )      │
//! │            o   raised_hands                  [box]       │
//! │          --+--                                           │
//! │            |        (feedback ring)                      │
//! │           / \                                            │
//! ├──────────────────────────────────────────────────────────┤
//! │  status bar                               ledger status  │
//! │  key legend                                              │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Pose coordinates are normalized to the stage area; depth only changes the
//! size of what is drawn.

use std::sync::mpsc::Sender;

use anyhow::{anyhow, Result};
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use pose_gesture::{Gesture, Joint, Pose};
use pose_zones::{Vec3, ZoneTracker};

use crate::config::WindowConfig;
use crate::scene::{Scene, FEEDBACK_COLOR, FEEDBACK_RADIUS};
use crate::source::{SimInput, SimKey};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

const STATUS_H:     usize = 36;
const BG_COLOR:     u32   = 0xFF1A1A2E;
const GRID_COLOR:   u32   = 0xFF2A2A44;
const TEXT_BG:      u32   = 0xFF0F3460;
const BONE_COLOR:   u32   = 0xFF88CCFF;
const JOINT_COLOR:  u32   = 0xFFFFFFFF;
const HAND_COLOR:   u32   = 0xFFFFD700;  // tracked right wrist
const ZONE_COLOR:   u32   = 0xFF00FFFF;
const LABEL_COLOR:  u32   = 0xFFFFD700;

const BONES: [(Joint, Joint); 16] = [
    (Joint::Nose,          Joint::LeftEye),
    (Joint::Nose,          Joint::RightEye),
    (Joint::LeftEye,       Joint::LeftEar),
    (Joint::RightEye,      Joint::RightEar),
    (Joint::LeftShoulder,  Joint::RightShoulder),
    (Joint::LeftShoulder,  Joint::LeftElbow),
    (Joint::LeftElbow,     Joint::LeftWrist),
    (Joint::RightShoulder, Joint::RightElbow),
    (Joint::RightElbow,    Joint::RightWrist),
    (Joint::LeftShoulder,  Joint::LeftHip),
    (Joint::RightShoulder, Joint::RightHip),
    (Joint::LeftHip,       Joint::RightHip),
    (Joint::LeftHip,       Joint::LeftKnee),
    (Joint::LeftKnee,      Joint::LeftAnkle),
    (Joint::RightHip,      Joint::RightKnee),
    (Joint::RightKnee,     Joint::RightAnkle),
];

const LEGEND: &str =
    "H=raise hands  C=squat  T=t-pose  W=wave (hold)  arrows=move hand  N=no body  Q=quit";

/// Size multiplier for something at depth `z`; nearer (negative z) is bigger.
pub fn depth_scale(z: f32) -> f32 {
    2.0 / (2.0 + z.max(-1.5))
}

// ════════════════════════════════════════════════════════════════════════════
// Canvas — pixel buffer and primitives
// ════════════════════════════════════════════════════════════════════════════

pub struct Canvas {
    w:   usize,
    h:   usize,
    buf: Vec<u32>,
}

impl Canvas {
    pub fn new(w: usize, h: usize) -> Self {
        Canvas { w, h, buf: vec![BG_COLOR; w * h] }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        (x < self.w && y < self.h).then(|| self.buf[y * self.w + x])
    }

    fn stage_h(&self) -> usize {
        self.h.saturating_sub(STATUS_H)
    }

    /// Pixels per pose unit for radii and sizes.
    fn unit(&self) -> f32 {
        self.w.min(self.stage_h()) as f32
    }

    /// Pose space → stage pixels, unrounded.
    fn project_f(&self, p: Vec3) -> (f64, f64) {
        (p.x as f64 * self.w as f64, p.y as f64 * self.stage_h() as f64)
    }

    /// Pose space → stage pixels.  Points far off the canvas are pinned to a
    /// band outside it, wide enough that anything drawn around them stays
    /// off screen.
    fn project(&self, p: Vec3) -> (isize, isize) {
        let (x, y) = self.project_f(p);
        let m = self.offscreen_margin();
        (
            x.clamp(-m, self.w as f64 + m) as isize,
            y.clamp(-m, self.h as f64 + m) as isize,
        )
    }

    fn offscreen_margin(&self) -> f64 {
        4.0 * self.w.max(self.h) as f64 + 64.0
    }

    fn set_pixel(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.buf[y as usize * self.w + x as usize] = color;
        }
    }

    /// Mix `color` over whatever is already at (x, y).
    fn blend_pixel(&mut self, x: isize, y: isize, color: u32, alpha: f32) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            let i = y as usize * self.w + x as usize;
            self.buf[i] = blend(self.buf[i], color, alpha);
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.h) {
            for col in x..(x + w).min(self.w) {
                self.buf[row * self.w + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: isize, y: isize, w: isize, h: isize, color: u32) {
        if w <= 0 || h <= 0 { return; }
        for col in x..x + w {
            self.set_pixel(col, y,         color);
            self.set_pixel(col, y + h - 1, color);
        }
        for row in y..y + h {
            self.set_pixel(x,         row, color);
            self.set_pixel(x + w - 1, row, color);
        }
    }

    fn fill_circle(&mut self, cx: isize, cy: isize, r: isize, color: u32, alpha: f32) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.blend_pixel(cx + dx, cy + dy, color, alpha);
                }
            }
        }
    }

    /// Ring of width `thick` just inside radius `r`.
    fn draw_circle(&mut self, cx: isize, cy: isize, r: isize, thick: isize, color: u32, alpha: f32) {
        let inner = (r - thick).max(0);
        for dy in -r..=r {
            for dx in -r..=r {
                let d2 = dx * dx + dy * dy;
                if d2 <= r * r && d2 > inner * inner {
                    self.blend_pixel(cx + dx, cy + dy, color, alpha);
                }
            }
        }
    }

    /// Cohen–Sutherland clip of a segment to the canvas, in pixel space.
    /// Clipped ends land exactly on an edge, however far away the
    /// original point was.  `None` when no part of it is on the canvas.
    fn clip_segment(&self, mut p0: (f64, f64), mut p1: (f64, f64)) -> Option<((isize, isize), (isize, isize))> {
        const LEFT: u8 = 1;
        const RIGHT: u8 = 2;
        const TOP: u8 = 4;
        const BOTTOM: u8 = 8;

        if self.w == 0 || self.h == 0 || ![p0.0, p0.1, p1.0, p1.1].iter().all(|v| v.is_finite()) {
            return None;
        }
        let (xmax, ymax) = ((self.w - 1) as f64, (self.h - 1) as f64);
        let outcode = |(x, y): (f64, f64)| {
            let mut code = 0;
            if x < 0.0 { code |= LEFT } else if x > xmax { code |= RIGHT }
            if y < 0.0 { code |= TOP } else if y > ymax { code |= BOTTOM }
            code
        };

        // Each pass moves one end onto an edge.  Rounding can leave an end a
        // hair outside after the last pass; the snap below absorbs that.
        for _ in 0..8 {
            let (c0, c1) = (outcode(p0), outcode(p1));
            if c0 | c1 == 0 { break; }
            if c0 & c1 != 0 { return None; }
            let c = if c0 != 0 { c0 } else { c1 };
            let ((x0, y0), (x1, y1)) = (p0, p1);
            let edge = if c & TOP != 0 {
                (x0 + (x1 - x0) * (0.0 - y0) / (y1 - y0), 0.0)
            } else if c & BOTTOM != 0 {
                (x0 + (x1 - x0) * (ymax - y0) / (y1 - y0), ymax)
            } else if c & LEFT != 0 {
                (0.0, y0 + (y1 - y0) * (0.0 - x0) / (x1 - x0))
            } else {
                (xmax, y0 + (y1 - y0) * (xmax - x0) / (x1 - x0))
            };
            if c == c0 { p0 = edge } else { p1 = edge }
        }

        let snap = |(x, y): (f64, f64)| (
            x.round().clamp(0.0, xmax) as isize,
            y.round().clamp(0.0, ymax) as isize,
        );
        Some((snap(p0), snap(p1)))
    }

    /// Segment between two pixel-space points, clipped to the canvas first
    /// so the rasterizer only walks visible pixels.
    fn draw_line(&mut self, a: (f64, f64), b: (f64, f64), color: u32) {
        let Some(((x0, y0), (x1, y1))) = self.clip_segment(a, b) else { return };
        let (dx, dy) = ((x1 - x0).abs(), -(y1 - y0).abs());
        let (sx, sy) = (if x0 < x1 { 1 } else { -1 }, if y0 < y1 { 1 } else { -1 });
        let (mut x, mut y, mut err) = (x0, y0, dx + dy);
        loop {
            self.set_pixel(x, y, color);
            if x == x1 && y == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }

    /// Minimal bitmap font, 3×5 glyphs.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            if cx + 4 > self.w { break; }
            for (row, &bits) in char_glyph(ch).iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.set_pixel((cx + col) as isize, (y + row) as isize, color);
                    }
                }
            }
            cx += 4; // 3 wide + 1 gap
        }
    }

    // ── Stage layers ──────────────────────────────────────────────────────

    pub fn clear(&mut self) {
        self.buf.fill(BG_COLOR);
        let stage_h = self.stage_h();
        for i in 1..10 {
            let gx = self.w * i / 10;
            let gy = stage_h * i / 10;
            for y in 0..stage_h { self.set_pixel(gx as isize, y as isize, GRID_COLOR); }
            for x in 0..self.w  { self.set_pixel(x as isize, gy as isize, GRID_COLOR); }
        }
    }

    pub fn draw_zones(&mut self, zones: &ZoneTracker) {
        let unit = self.unit();
        for (_, zone) in zones.zones().iter() {
            let (cx, cy) = self.project(zone.center);
            let r = (zone.radius * unit * depth_scale(zone.center.z)) as isize;
            self.fill_circle(cx, cy, r, ZONE_COLOR, zone.opacity);
            self.draw_circle(cx, cy, r, 1, ZONE_COLOR, if zone.active { 1.0 } else { 0.5 });
        }
    }

    pub fn draw_boxes(&mut self, scene: &Scene) {
        let unit = self.unit();
        for (_, b) in scene.boxes().iter() {
            let (cx, cy) = self.project(b.position);
            let side = (b.size * b.scale * unit * depth_scale(b.position.z)) as isize;
            let (x0, y0) = (cx - side / 2, cy - side / 2);
            for y in y0..y0 + side {
                for x in x0..x0 + side {
                    self.blend_pixel(x, y, b.color, b.opacity);
                }
            }
            self.draw_border(x0, y0, side, side, 0xFF000000);
        }
    }

    pub fn draw_bodies(&mut self, bodies: &[Pose], labels: &[Vec<Gesture>]) {
        for (i, pose) in bodies.iter().enumerate() {
            for (a, b) in BONES {
                if let (Some(ka), Some(kb)) = (pose.get(a), pose.get(b)) {
                    let pa = self.project_f(Vec3::from(ka));
                    let pb = self.project_f(Vec3::from(kb));
                    self.draw_line(pa, pb, BONE_COLOR);
                }
            }
            for kp in pose.keypoints() {
                let (x, y) = self.project(Vec3::from(kp));
                let r = (4.0 * depth_scale(kp.z)).round() as isize;
                let color = if kp.as_joint() == Some(Joint::RightWrist) { HAND_COLOR } else { JOINT_COLOR };
                self.fill_circle(x, y, r, color, kp.score.unwrap_or(1.0).clamp(0.3, 1.0));
            }

            let gestures = labels.get(i).map(Vec::as_slice).unwrap_or(&[]);
            if gestures.is_empty() { continue; }
            if let Some(anchor) = pose.get(Joint::Nose).or_else(|| pose.first()) {
                let text: Vec<&str> = gestures.iter().map(|g| g.label()).collect();
                let (x, y) = self.project(Vec3::from(anchor));
                self.draw_label(&text.join(" "), (x + 14).max(0) as usize, (y - 3).max(0) as usize, LABEL_COLOR);
            }
        }
    }

    pub fn draw_feedback(&mut self, scene: &Scene) {
        let unit = self.unit();
        for (_, fx) in scene.feedback().iter() {
            let (cx, cy) = self.project(fx.position);
            let r = (FEEDBACK_RADIUS * fx.scale * unit * depth_scale(fx.position.z)) as isize;
            self.draw_circle(cx, cy, r, 3, FEEDBACK_COLOR, fx.opacity);
        }
    }

    pub fn draw_status(&mut self, status: &str, ledger: Option<&str>) {
        let y = self.stage_h();
        self.fill_rect(0, y, self.w, STATUS_H, TEXT_BG);
        self.draw_label(status, 10, y + 8, 0xFFEEEEEE);
        if let Some(text) = ledger {
            let x = self.w.saturating_sub(text.chars().count() * 4 + 10);
            self.draw_label(text, x, y + 8, 0xFFAADDFF);
        }
        self.draw_label(LEGEND, 10, y + STATUS_H - 14, 0xFF888888);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer — window, input, frame presentation
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    canvas: Canvas,
    sim_tx: Sender<SimInput>,
    /// Keys reported as held, with their last known state.
    held:   [(Key, SimKey, bool); 5],
}

impl Visualizer {
    pub fn new(cfg: &WindowConfig, sim_tx: Sender<SimInput>) -> Result<Self> {
        let mut window = Window::new(
            &cfg.title,
            cfg.width, cfg.height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| anyhow!("opening window: {}", e))?;

        window.set_target_fps(60);

        Ok(Visualizer {
            window,
            canvas: Canvas::new(cfg.width, cfg.height),
            sim_tx,
            held: [
                (Key::W,     SimKey::Wave,  false),
                (Key::Left,  SimKey::Left,  false),
                (Key::Right, SimKey::Right, false),
                (Key::Up,    SimKey::Up,    false),
                (Key::Down,  SimKey::Down,  false),
            ],
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll keyboard state and forward it to the puppet.  False on quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        let one_shot = |w: &Window, k: Key| w.is_key_pressed(k, KeyRepeat::No);

        if one_shot(&self.window, Key::Q) || one_shot(&self.window, Key::Escape) {
            let _ = self.sim_tx.send(SimInput::KeyDown(SimKey::Quit));
            return false;
        }
        for (key, sim) in [
            (Key::H, SimKey::RaiseHands),
            (Key::C, SimKey::Squat),
            (Key::T, SimKey::TPose),
            (Key::N, SimKey::ToggleBody),
        ] {
            if one_shot(&self.window, key) {
                let _ = self.sim_tx.send(SimInput::KeyDown(sim));
            }
        }

        // Held keys report edges only.
        for (key, sim, was_down) in self.held.iter_mut() {
            let down = self.window.is_key_down(*key);
            if down != *was_down {
                *was_down = down;
                let input = if down { SimInput::KeyDown(*sim) } else { SimInput::KeyUp(*sim) };
                let _ = self.sim_tx.send(input);
            }
        }
        true
    }

    /// Render one frame.
    pub fn render(
        &mut self,
        scene:  &Scene,
        zones:  &ZoneTracker,
        labels: &[Vec<Gesture>],
        status: &str,
        ledger: Option<&str>,
    ) {
        let c = &mut self.canvas;
        c.clear();
        c.draw_zones(zones);
        c.draw_boxes(scene);
        c.draw_bodies(scene.bodies(), labels);
        c.draw_feedback(scene);
        c.draw_status(status, ledger);

        self.window.update_with_buffer(&c.buf, c.w, c.h).ok();
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '#' => [0b101, 0b111, 0b101, 0b111, 0b101],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0 - t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar, br) << 16) | (lerp(ag, bg) << 8) | lerp(ab, bb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pose_gesture::Keypoint;

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 0.0), 0xFF000000);
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 1.0), 0xFFFFFFFF);
        assert_eq!(blend(0xFF000000, 0xFF00FF00, 2.0), 0xFF00FF00);
    }

    #[test]
    fn nearer_is_bigger() {
        assert_eq!(depth_scale(0.0), 1.0);
        assert!(depth_scale(-0.5) > 1.0);
        assert!(depth_scale(1.0) < 1.0);
        assert!(depth_scale(-100.0).is_finite());
    }

    #[test]
    fn projection_fills_stage_above_status_bar() {
        let c = Canvas::new(200, 136);
        assert_eq!(c.project(Vec3::new(0.5, 0.5, 0.0)), (100, 50));
        assert_eq!(c.project(Vec3::new(1.0, 1.0, 0.0)), (200, 100));
    }

    #[test]
    fn primitives_clip_at_edges() {
        let mut c = Canvas::new(20, 50);
        c.fill_circle(-5, -5, 10, 0xFFFFFFFF, 1.0);
        c.draw_line((-10.0, 3.0), (30.0, 3.0), 0xFFFF0000);
        c.draw_border(15, 10, 20, 20, 0xFF00FF00);
        assert_eq!(c.pixel(0, 0), Some(0xFFFFFFFF));
        assert_eq!(c.pixel(19, 3), Some(0xFFFF0000));
        assert_eq!(c.pixel(15, 12), Some(0xFF00FF00));
        assert_eq!(c.pixel(20, 0), None);
    }

    #[test]
    fn bodies_draw_bones_between_joints() {
        let mut c = Canvas::new(100, 136);
        c.clear();
        let pose = Pose::from_keypoints(vec![
            Keypoint::joint(Joint::LeftHip,  0.2, 0.5, 0.0),
            Keypoint::joint(Joint::RightHip, 0.8, 0.5, 0.0),
        ]);
        c.draw_bodies(&[pose], &[]);
        assert_eq!(c.pixel(50, 50), Some(BONE_COLOR));
        assert_eq!(c.pixel(20, 50), Some(JOINT_COLOR));
    }

    #[test]
    fn segments_clip_to_canvas() {
        let c = Canvas::new(100, 136);
        assert_eq!(c.clip_segment((-50.0, 10.0), (150.0, 10.0)), Some(((0, 10), (99, 10))));
        assert_eq!(c.clip_segment((-1e30, 50.0), (1e30, 50.0)), Some(((0, 50), (99, 50))));
        assert_eq!(c.clip_segment((200.0, 10.0), (2e6, 10.0)), None);
        assert_eq!(c.clip_segment((10.0, 10.0), (f64::NAN, 10.0)), None);
        assert_eq!(c.clip_segment((1e30, 50.0), (50.0, -1e30)), None);
    }

    #[test]
    fn far_off_keypoints_draw_promptly() {
        let start = std::time::Instant::now();
        let mut c = Canvas::new(100, 136);
        c.clear();
        let pose = Pose::from_keypoints(vec![
            Keypoint::joint(Joint::LeftHip,   -1e30, 0.5, 0.0),
            Keypoint::joint(Joint::RightHip,   1e30, 0.5, 0.0),
            Keypoint::joint(Joint::LeftKnee,  2e6,   0.8, 0.0),
            Keypoint::joint(Joint::RightKnee, 0.5,  -1e30, 0.0),
        ]);
        c.draw_bodies(&[pose], &[vec![Gesture::Squat]]);

        let mut big = Canvas::new(960, 720);
        let pose = Pose::from_keypoints(vec![
            Keypoint::joint(Joint::LeftHip,  0.5, 0.5, 0.0),
            Keypoint::joint(Joint::LeftKnee, 2e6, 0.5, 0.0),
        ]);
        big.draw_bodies(&[pose], &[]);

        assert!(start.elapsed() < std::time::Duration::from_secs(1));
        // The hip line crosses the whole stage.
        assert_eq!(c.pixel(50, 50), Some(BONE_COLOR));
        assert_eq!(big.pixel(959, 342), Some(BONE_COLOR));
    }
}
