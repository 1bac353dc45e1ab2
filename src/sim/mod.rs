//! Deterministic simulation module
//!
//! All scene logic lives here. This module must stay pure and deterministic:
//! - Per-frame motion constants; the host clock drives only timers and
//!   sparkle lifetimes
//! - Seeded RNG only
//! - Stable iteration order (creation order)
//! - No platform dependencies; scenes emit draw ops, never touch a surface

pub mod ambient;
pub mod celebration;
pub mod interaction;
pub mod palette;
pub mod particle;
pub mod projectile;
pub mod sequencer;
pub mod sparkle;
pub mod star;
pub mod symbol;

pub use ambient::{AmbientScene, Pop};
pub use celebration::{CelebrationPhase, CelebrationScene, Cue, Shell};
pub use interaction::{Rect, pick_topmost};
pub use palette::Color;
pub use particle::{Fragment, Motion, Spark};
pub use projectile::{Detonation, Projectile, TrailPoint};
pub use sequencer::{Interval, PhaseSequencer, Step, Trigger};
pub use sparkle::{Sparkle, SparkleTrail};
pub use star::Star;
pub use symbol::AmbientSymbol;
