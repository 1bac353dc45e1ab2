//! Burst particles: firework sparks and popped-symbol fragments
//!
//! Motion is per frame, not per second: velocity is added once per update,
//! then gravity pulls down and drag damps the horizontal component.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

use super::palette::{Color, FRAGMENT_GLYPHS, pick};
use crate::polar_to_cartesian;

/// Stylized motion constants for one particle family
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    /// Added to vy each frame
    pub gravity: f32,
    /// vx multiplier each frame (< 1)
    pub damping: f32,
}

pub const SPARK_MOTION: Motion = Motion {
    gravity: 0.05,
    damping: 0.99,
};

pub const FRAGMENT_MOTION: Motion = Motion {
    gravity: 0.1,
    damping: 0.98,
};

#[inline]
fn integrate(pos: &mut Vec2, vel: &mut Vec2, motion: Motion) {
    *pos += *vel;
    vel.y += motion.gravity;
    vel.x *= motion.damping;
}

/// A firework spark
#[derive(Debug, Clone)]
pub struct Spark {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    /// 0-1, decreases by `decay` each frame
    pub life: f32,
    pub decay: f32,
    pub size: f32,
}

impl Spark {
    /// Random heading, speed 2-8, decay 0.008-0.016, size 2-5
    pub fn new<R: Rng + ?Sized>(pos: Vec2, color: Color, rng: &mut R) -> Self {
        let angle = rng.random::<f32>() * TAU;
        let speed = 2.0 + rng.random::<f32>() * 6.0;
        Self {
            pos,
            vel: polar_to_cartesian(speed, angle),
            color,
            life: 1.0,
            decay: 0.008 + rng.random::<f32>() * 0.008,
            size: 2.0 + rng.random::<f32>() * 3.0,
        }
    }

    /// Advance one frame. Returns false once life is spent.
    pub fn update(&mut self) -> bool {
        integrate(&mut self.pos, &mut self.vel, SPARK_MOTION);
        self.life -= self.decay;
        self.life > 0.0
    }

    /// Draw radius shrinks with life
    pub fn radius(&self) -> f32 {
        self.size * self.life
    }
}

/// A decorative fragment thrown off by a popped symbol
#[derive(Debug, Clone)]
pub struct Fragment {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    pub glyph: &'static str,
    pub life: f32,
    pub decay: f32,
    pub size: f32,
    pub rotation: f32,
    /// Radians per frame
    pub spin: f32,
}

impl Fragment {
    /// Random heading, speed 3-9, decay 0.02-0.04, size 8-20
    pub fn new<R: Rng + ?Sized>(pos: Vec2, color: Color, glyph: &'static str, rng: &mut R) -> Self {
        let angle = rng.random::<f32>() * TAU;
        let speed = 3.0 + rng.random::<f32>() * 6.0;
        Self {
            pos,
            vel: polar_to_cartesian(speed, angle),
            color,
            glyph,
            life: 1.0,
            decay: 0.02 + rng.random::<f32>() * 0.02,
            size: 8.0 + rng.random::<f32>() * 12.0,
            rotation: rng.random::<f32>() * TAU,
            spin: (rng.random::<f32>() - 0.5) * 0.3,
        }
    }

    /// Advance one frame. Returns false once life is spent.
    pub fn update(&mut self) -> bool {
        integrate(&mut self.pos, &mut self.vel, FRAGMENT_MOTION);
        self.rotation += self.spin;
        self.life -= self.decay;
        self.life > 0.0
    }
}

/// Spawn exactly `count` sparks at `at`, colors drawn from `colors`
pub fn burst<R: Rng + ?Sized>(
    sparks: &mut Vec<Spark>,
    at: Vec2,
    count: usize,
    colors: &[Color],
    rng: &mut R,
) {
    sparks.reserve(count);
    for _ in 0..count {
        let color = pick(rng, colors);
        sparks.push(Spark::new(at, color, rng));
    }
}

/// Spawn exactly `count` fragments; the first `own` reuse `glyph`,
/// the rest come from the small decorative set.
pub fn scatter<R: Rng + ?Sized>(
    fragments: &mut Vec<Fragment>,
    at: Vec2,
    color: Color,
    glyph: &'static str,
    count: usize,
    own: usize,
    rng: &mut R,
) {
    fragments.reserve(count);
    for i in 0..count {
        let g = if i < own { glyph } else { pick(rng, &FRAGMENT_GLYPHS) };
        fragments.push(Fragment::new(at, color, g, rng));
    }
}

/// Advance all sparks and drop the spent ones, preserving creation order
pub fn update_sparks(sparks: &mut Vec<Spark>) {
    sparks.retain_mut(Spark::update);
}

/// Advance all fragments and drop the spent ones, preserving creation order
pub fn update_fragments(fragments: &mut Vec<Fragment>) {
    fragments.retain_mut(Fragment::update);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spark_expires_after_hundred_ticks() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut spark = Spark::new(Vec2::new(100.0, 100.0), Color::WHITE, &mut rng);
        spark.decay = 0.01;

        let mut sparks = vec![spark];
        let mut ticks = 0;
        while !sparks.is_empty() {
            update_sparks(&mut sparks);
            ticks += 1;
            assert!(ticks < 200, "spark never expired");
        }
        assert!((99..=101).contains(&ticks), "expired after {ticks} ticks");
    }

    #[test]
    fn test_life_strictly_decreases() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut spark = Spark::new(Vec2::ZERO, Color::WHITE, &mut rng);
        let mut frag = Fragment::new(Vec2::ZERO, Color::WHITE, "★", &mut rng);
        for _ in 0..20 {
            let (before_s, before_f) = (spark.life, frag.life);
            spark.update();
            frag.update();
            assert!(spark.life < before_s);
            assert!(frag.life < before_f);
        }
    }

    #[test]
    fn test_gravity_and_drag() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut spark = Spark::new(Vec2::ZERO, Color::WHITE, &mut rng);
        spark.vel = Vec2::new(1.0, 0.0);
        spark.update();
        assert_eq!(spark.pos, Vec2::new(1.0, 0.0));
        assert!((spark.vel.x - 0.99).abs() < 1e-6);
        assert!((spark.vel.y - 0.05).abs() < 1e-6);

        let mut frag = Fragment::new(Vec2::ZERO, Color::WHITE, "✦", &mut rng);
        frag.vel = Vec2::new(2.0, 0.0);
        let rot = frag.rotation;
        frag.update();
        assert!((frag.vel.x - 1.96).abs() < 1e-6);
        assert!((frag.vel.y - 0.1).abs() < 1e-6);
        assert!((frag.rotation - (rot + frag.spin)).abs() < 1e-6);
    }

    #[test]
    fn test_spent_particles_removed_same_tick() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut a = Spark::new(Vec2::ZERO, Color::WHITE, &mut rng);
        let mut b = a.clone();
        a.life = 0.005;
        a.decay = 0.01;
        b.decay = 0.01;
        let mut sparks = vec![a, b];
        update_sparks(&mut sparks);
        assert_eq!(sparks.len(), 1);
        assert!(sparks.iter().all(|s| s.life > 0.0));
    }

    #[test]
    fn test_scatter_uses_own_glyph_first() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut fragments = Vec::new();
        scatter(&mut fragments, Vec2::ZERO, Color::WHITE, "🦋", 12, 3, &mut rng);
        assert_eq!(fragments.len(), 12);
        assert!(fragments[..3].iter().all(|f| f.glyph == "🦋"));
        assert!(fragments[3..].iter().all(|f| FRAGMENT_GLYPHS.contains(&f.glyph)));
    }

    proptest! {
        #[test]
        fn prop_burst_spawns_exact_count(count in 0usize..300, seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut sparks = Vec::new();
            burst(&mut sparks, Vec2::new(10.0, 20.0), count, &crate::sim::palette::FIREWORK_COLORS, &mut rng);
            prop_assert_eq!(sparks.len(), count);
            prop_assert!(sparks.iter().all(|s| s.life == 1.0 && s.pos == Vec2::new(10.0, 20.0)));
        }

        #[test]
        fn prop_scatter_spawns_exact_count(count in 0usize..64, seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut fragments = Vec::new();
            scatter(&mut fragments, Vec2::ZERO, Color::WHITE, "★", count, 3, &mut rng);
            prop_assert_eq!(fragments.len(), count);
            prop_assert!(fragments.iter().all(|f| f.life == 1.0));
        }
    }
}
