//! Scripted fireworks celebration
//!
//! Timeline:
//! 1. `first_launch_delay_ms` after mount, a shell climbs to `first_target`
//! 2. its burst reveals line 1
//! 3. `second_launch_delay_ms` after that reveal, a second shell climbs to
//!    `second_target`
//! 4. its burst reveals line 2 and starts random background fireworks
//! 5. `controls_delay_ms` after that reveal, the exit control appears and the
//!    scene reports completion
//!
//! Timed steps run on a `PhaseSequencer`; the gaps that wait on a burst are
//! released by signalling it from the detonation.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::interaction::Rect;
use super::palette::{FIREWORK_COLORS, LINE1_COLOR, LINE2_COLOR, NIGHT_SKY};
use super::particle::{Spark, burst, update_sparks};
use super::projectile::{Detonation, Projectile, update_projectiles};
use super::sequencer::{PhaseSequencer, Step};
use super::sparkle::SparkleTrail;
use super::star::{Star, starfield};
use crate::Viewport;
use crate::renderer::{DrawList, shapes};
use crate::runner::{Scene, SceneSignal};
use crate::scheduler::Frame;
use crate::settings::{CelebrationTuning, Settings};

/// Exit control size
pub const CONTROL_SIZE: Vec2 = Vec2::new(160.0, 48.0);
/// Gap between the exit control and the bottom edge
pub const CONTROL_MARGIN: f32 = 32.0;
/// Background shells aim between these fractions of viewport height
pub const AMBIENT_TARGET_BAND: (f32, f32) = (0.10, 1.0 / 3.0);
/// Background shells launch between these fractions of viewport width
pub const AMBIENT_LAUNCH_BAND: (f32, f32) = (0.10, 0.90);

/// Current stage of the celebration timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CelebrationPhase {
    Idle,
    Line1Pending,
    Line1Revealed,
    Line2Pending,
    Line2Revealed,
    ControlsRevealed,
}

/// What a shell does when it bursts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    First,
    Second,
    Background,
}

/// Timed actions on the sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    LaunchFirst,
    LaunchSecond,
    RevealControls,
}

pub struct CelebrationScene {
    phase: CelebrationPhase,
    pub stars: Vec<Star>,
    pub shells: Vec<Projectile<Shell>>,
    pub sparks: Vec<Spark>,
    pub sparkles: SparkleTrail,
    sequencer: PhaseSequencer<Cue>,
    tuning: CelebrationTuning,
    viewport: Viewport,
    rng: Pcg32,
    glow_scale: f32,
    /// Latest frame index seen by `update`
    frame: u64,
    /// Background fireworks sub-phase
    show_running: bool,
    line1_at: Option<u64>,
    line2_at: Option<u64>,
    controls_at: Option<u64>,
    dismissed: bool,
    signals: Vec<SceneSignal>,
}

impl CelebrationScene {
    pub fn new(viewport: Viewport, settings: &Settings, seed: u64) -> Self {
        let tuning = settings.celebration.clone();
        let mut rng = Pcg32::seed_from_u64(seed);
        let stars = starfield(settings.quality.star_count(), &mut rng);
        let sequencer = PhaseSequencer::new([
            Step::after(tuning.first_launch_delay_ms, Cue::LaunchFirst),
            Step::after_signal(tuning.second_launch_delay_ms, Cue::LaunchSecond),
            Step::after_signal(tuning.controls_delay_ms, Cue::RevealControls),
        ]);

        Self {
            phase: CelebrationPhase::Idle,
            stars,
            shells: Vec::new(),
            sparks: Vec::new(),
            sparkles: SparkleTrail::new(settings.sparkle.clone()),
            sequencer,
            tuning,
            viewport,
            rng,
            glow_scale: settings.quality.glow_scale(),
            frame: 0,
            show_running: false,
            line1_at: None,
            line2_at: None,
            controls_at: None,
            dismissed: false,
            signals: Vec::new(),
        }
    }

    pub fn phase(&self) -> CelebrationPhase {
        self.phase
    }

    pub fn tuning(&self) -> &CelebrationTuning {
        &self.tuning
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn line1_revealed(&self) -> bool {
        self.line1_at.is_some()
    }

    pub fn line2_revealed(&self) -> bool {
        self.line2_at.is_some()
    }

    pub fn controls_revealed(&self) -> bool {
        self.controls_at.is_some()
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    /// Whether the random background fireworks are running
    pub fn show_running(&self) -> bool {
        self.show_running
    }

    /// Timers still pending on the sequencer
    pub fn pending_timers(&self) -> usize {
        self.sequencer.pending()
    }

    /// Exit control bounds, bottom-centre
    pub fn exit_control(&self) -> Rect {
        let center = Vec2::new(
            self.viewport.center_x(),
            self.viewport.height - CONTROL_MARGIN - CONTROL_SIZE.y * 0.5,
        );
        Rect::centered(center, CONTROL_SIZE)
    }

    /// Dismiss the scene: cancel the timeline, stop the background show and
    /// report once
    pub fn dismiss(&mut self) {
        if self.dismissed {
            return;
        }
        self.dismissed = true;
        self.show_running = false;
        self.sequencer.cancel();
        self.signals.push(SceneSignal::Dismissed);
        log::info!("Celebration dismissed at {:?}", self.phase);
    }

    fn set_phase(&mut self, phase: CelebrationPhase) {
        if phase > self.phase {
            log::info!("Celebration phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    fn launch(&mut self, x: f32, target_y: f32, shell: Shell) {
        let projectile = Projectile::launch(x, self.viewport.height, target_y, shell, &mut self.rng);
        self.shells.push(projectile);
    }

    fn launch_background(&mut self) {
        let (x0, x1) = AMBIENT_LAUNCH_BAND;
        let (y0, y1) = AMBIENT_TARGET_BAND;
        let x = self.viewport.width * (x0 + self.rng.random::<f32>() * (x1 - x0));
        let y = self.viewport.height * (y0 + self.rng.random::<f32>() * (y1 - y0));
        self.launch(x, y, Shell::Background);
    }

    fn run_cue(&mut self, cue: Cue, frame: &Frame) {
        let center = self.viewport.center_x();
        match cue {
            Cue::LaunchFirst => {
                let target = self.viewport.height * self.tuning.first_target;
                self.launch(center, target, Shell::First);
                self.set_phase(CelebrationPhase::Line1Pending);
            }
            Cue::LaunchSecond => {
                let target = self.viewport.height * self.tuning.second_target;
                self.launch(center, target, Shell::Second);
                self.set_phase(CelebrationPhase::Line2Pending);
            }
            Cue::RevealControls => {
                self.controls_at = Some(frame.index);
                self.set_phase(CelebrationPhase::ControlsRevealed);
                self.signals.push(SceneSignal::Completed);
            }
        }
    }

    fn detonate(&mut self, detonation: Detonation<Shell>, frame: &Frame) {
        let count = match detonation.payload {
            Shell::First => self.tuning.first_burst,
            Shell::Second => self.tuning.second_burst,
            Shell::Background => self.tuning.ambient_burst,
        };
        burst(&mut self.sparks, detonation.at, count, &FIREWORK_COLORS, &mut self.rng);

        match detonation.payload {
            Shell::First => {
                self.line1_at = Some(frame.index);
                self.set_phase(CelebrationPhase::Line1Revealed);
                self.sequencer.signal(frame.now_ms);
            }
            Shell::Second => {
                self.line2_at = Some(frame.index);
                self.set_phase(CelebrationPhase::Line2Revealed);
                self.show_running = true;
                self.sequencer.signal(frame.now_ms);
            }
            Shell::Background => {}
        }
    }
}

impl Scene for CelebrationScene {
    fn start(&mut self, now_ms: f64) {
        self.sequencer.start(now_ms);
    }

    fn update(&mut self, frame: &Frame) {
        self.frame = frame.index;

        while let Some(cue) = self.sequencer.poll(frame.now_ms) {
            self.run_cue(cue, frame);
        }

        if self.show_running && self.rng.random::<f32>() < self.tuning.ambient_launch_chance {
            self.launch_background();
        }

        // Existing sparks first, so fresh bursts render at full life
        update_sparks(&mut self.sparks);
        for detonation in update_projectiles(&mut self.shells) {
            self.detonate(detonation, frame);
        }
        self.sparkles.update(frame.now_ms);
    }

    fn render(&self, out: &mut DrawList) {
        let vp = self.viewport;
        shapes::background(vp, NIGHT_SKY, out);

        for star in &self.stars {
            shapes::star(star, vp, self.frame, out);
        }
        for shell in &self.shells {
            shapes::projectile(shell, self.glow_scale, out);
        }
        for spark in &self.sparks {
            shapes::spark(spark, self.glow_scale, out);
        }

        let x = vp.center_x();
        if let Some(progress) = shapes::reveal_progress(self.line1_at, self.frame) {
            shapes::reveal_text(
                &self.tuning.line1,
                Vec2::new(x, vp.height * self.tuning.first_target),
                shapes::heading_size(vp.width, 36.0, 72.0),
                LINE1_COLOR,
                progress,
                self.glow_scale,
                out,
            );
        }
        if let Some(progress) = shapes::reveal_progress(self.line2_at, self.frame) {
            shapes::reveal_text(
                &self.tuning.line2,
                Vec2::new(x, vp.height * self.tuning.second_target),
                shapes::heading_size(vp.width, 30.0, 60.0),
                LINE2_COLOR,
                progress,
                self.glow_scale,
                out,
            );
        }
        if let Some(progress) = shapes::reveal_progress(self.controls_at, self.frame) {
            shapes::button(self.exit_control(), &self.tuning.exit_label, progress, out);
        }
        for sparkle in &self.sparkles.sparkles {
            shapes::sparkle(sparkle, self.glow_scale, out);
        }
    }

    fn click(&mut self, at: Vec2, _now_ms: f64) {
        if self.controls_revealed() && self.exit_control().contains(at) {
            self.dismiss();
        }
    }

    fn pointer_move(&mut self, at: Vec2, now_ms: f64) {
        self.sparkles.pointer_move(at, now_ms, &mut self.rng);
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn cancel_timers(&mut self) {
        self.sequencer.cancel();
    }

    fn take_signals(&mut self) -> Vec<SceneSignal> {
        std::mem::take(&mut self.signals)
    }
}
