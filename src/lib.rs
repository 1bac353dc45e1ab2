//! Skyburst - animated 2D canvas scenes
//!
//! Core modules:
//! - `sim`: Seeded entity simulation (sparks, shells, floating symbols, scenes)
//! - `renderer`: Draw-op generation and the immediate-mode surface contract
//! - `scheduler`: Display-refresh driven update/render loop
//! - `runner`: Mount/teardown glue between a scene, its surface and its host
//! - `platform`: Browser and headless hosts
//! - `settings`: Data-driven tuning

pub mod error;
pub mod platform;
pub mod renderer;
pub mod runner;
pub mod scheduler;
pub mod settings;
pub mod sim;

pub use error::{SettingsError, SurfaceError};
pub use runner::{PendingDispatch, Scene, SceneCallbacks, SceneRunner, SceneSignal};
pub use scheduler::{Frame, FrameHost, FrameScheduler, FrameSlot, FrameTicket};
pub use settings::{AmbientTuning, CelebrationTuning, QualityPreset, Settings, SparkleTuning};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Scene configuration constants
pub mod consts {
    /// Nominal seconds per frame, used for twinkle phase (motion is tuned per frame)
    pub const FRAME_SECONDS: f32 = 0.016;
    /// Frames a text reveal takes to fade and scale in (~500ms at 60 Hz)
    pub const REVEAL_FRAMES: u64 = 30;
    /// Starting scale of a text reveal
    pub const REVEAL_START_SCALE: f32 = 0.75;
    /// Viewport used before the host reports a real size
    pub const DEFAULT_VIEWPORT: (f32, f32) = (1280.0, 720.0);
}

/// Drawable area in surface pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        let (width, height) = consts::DEFAULT_VIEWPORT;
        Self { width, height }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Horizontal centre line
    pub fn center_x(&self) -> f32 {
        self.width * 0.5
    }

    /// Map a viewport fraction to pixels
    #[inline]
    pub fn at_fraction(&self, fraction: Vec2) -> Vec2 {
        Vec2::new(fraction.x * self.width, fraction.y * self.height)
    }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
