//! Firework shells: rise at constant speed, detonate once at a target height

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::palette::{Color, FIREWORK_COLORS, pick};

/// Maximum number of trail points to store
pub const TRAIL_LENGTH: usize = 20;
/// Life a trail point loses each frame
pub const TRAIL_FADE: f32 = 0.05;
/// Shells start this far below the bottom edge
pub const LAUNCH_DEPTH: f32 = 10.0;

/// Trail point for shell rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    /// 0-1, fades independently of the shell
    pub life: f32,
}

/// Where and what a shell detonated
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detonation<P> {
    pub at: Vec2,
    pub payload: P,
}

/// A rising firework shell carrying a caller-defined payload
#[derive(Debug, Clone)]
pub struct Projectile<P> {
    pub pos: Vec2,
    pub target_y: f32,
    /// Pixels per frame, upward
    pub speed: f32,
    pub color: Color,
    pub exploded: bool,
    pub payload: P,
    /// Trail history for rendering (newest first)
    pub trail: Vec<TrailPoint>,
}

impl<P: Copy> Projectile<P> {
    /// Launch from just below a viewport of `floor` height
    pub fn launch<R: Rng + ?Sized>(x: f32, floor: f32, target_y: f32, payload: P, rng: &mut R) -> Self {
        Self {
            pos: Vec2::new(x, floor + LAUNCH_DEPTH),
            target_y,
            speed: 8.0 + rng.random::<f32>() * 4.0,
            color: pick(rng, &FIREWORK_COLORS),
            exploded: false,
            payload,
            trail: Vec::with_capacity(TRAIL_LENGTH),
        }
    }

    /// Record current position and fade older points
    fn record_trail(&mut self) {
        self.trail.insert(
            0,
            TrailPoint {
                pos: self.pos,
                life: 1.0,
            },
        );
        for point in &mut self.trail {
            point.life -= TRAIL_FADE;
        }
        self.trail.retain(|p| p.life > 0.0);
        self.trail.truncate(TRAIL_LENGTH);
    }

    /// Advance one frame. Yields the detonation exactly once, on the frame
    /// the shell reaches its target height.
    pub fn update(&mut self) -> Option<Detonation<P>> {
        if self.exploded {
            return None;
        }

        self.record_trail();
        self.pos.y -= self.speed;

        if self.pos.y <= self.target_y {
            self.exploded = true;
            return Some(Detonation {
                at: Vec2::new(self.pos.x, self.target_y),
                payload: self.payload,
            });
        }
        None
    }
}

/// Advance all shells, dropping detonated ones. Detonations come back in
/// creation order.
pub fn update_projectiles<P: Copy>(shells: &mut Vec<Projectile<P>>) -> Vec<Detonation<P>> {
    let detonations: Vec<_> = shells.iter_mut().filter_map(Projectile::update).collect();
    shells.retain(|s| !s.exploded);
    detonations
}
