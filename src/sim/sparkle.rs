//! Pointer sparkle trail
//!
//! Moving the pointer drops a small glowing glyph near it, at most one per
//! `throttle_ms`. Each sparkle fades out over `lifetime_ms` of host clock
//! and is then removed.

use glam::Vec2;
use rand::Rng;

use super::palette::{Color, SPARKLE_COLORS, SPARKLE_GLYPHS, pick};
use crate::settings::SparkleTuning;

/// Smallest sparkle glyph size in px
pub const SPARKLE_MIN_SIZE: f32 = 5.0;
/// Size range above the minimum
pub const SPARKLE_SIZE_RANGE: f32 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Sparkle {
    pub pos: Vec2,
    pub glyph: &'static str,
    pub color: Color,
    /// Glyph size in px; the glow radius matches it
    pub size: f32,
    pub born_ms: f64,
    /// 1 when dropped, 0 when expired
    pub life: f32,
}

impl Sparkle {
    pub fn new<R: Rng + ?Sized>(pos: Vec2, now_ms: f64, rng: &mut R) -> Self {
        Self {
            pos,
            glyph: pick(rng, &SPARKLE_GLYPHS),
            color: pick(rng, &SPARKLE_COLORS),
            size: SPARKLE_MIN_SIZE + rng.random::<f32>() * SPARKLE_SIZE_RANGE,
            born_ms: now_ms,
            life: 1.0,
        }
    }
}

/// Throttled trail of sparkles following the pointer
#[derive(Debug, Clone)]
pub struct SparkleTrail {
    /// Live sparkles, oldest first
    pub sparkles: Vec<Sparkle>,
    last_emit: Option<f64>,
    tuning: SparkleTuning,
}

impl SparkleTrail {
    pub fn new(tuning: SparkleTuning) -> Self {
        Self {
            sparkles: Vec::new(),
            last_emit: None,
            tuning,
        }
    }

    /// Drop a sparkle near `at` unless one was dropped within the throttle
    /// window. Returns whether a sparkle was added.
    pub fn pointer_move<R: Rng + ?Sized>(&mut self, at: Vec2, now_ms: f64, rng: &mut R) -> bool {
        if !self.tuning.enabled {
            return false;
        }
        if let Some(last) = self.last_emit {
            if now_ms - last < self.tuning.throttle_ms {
                return false;
            }
        }
        self.last_emit = Some(now_ms);

        let jitter = self.tuning.jitter;
        let offset = Vec2::new(
            (rng.random::<f32>() - 0.5) * 2.0 * jitter,
            (rng.random::<f32>() - 0.5) * 2.0 * jitter,
        );
        self.sparkles.push(Sparkle::new(at + offset, now_ms, rng));
        true
    }

    /// Fade every sparkle by its age and drop the expired ones
    pub fn update(&mut self, now_ms: f64) {
        let lifetime = self.tuning.lifetime_ms;
        self.sparkles.retain_mut(|s| {
            let age = (now_ms - s.born_ms).max(0.0);
            s.life = (1.0 - age / lifetime) as f32;
            s.life > 0.0
        });
    }

    pub fn len(&self) -> usize {
        self.sparkles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sparkles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn trail() -> SparkleTrail {
        SparkleTrail::new(SparkleTuning::default())
    }

    #[test]
    fn test_first_move_emits() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut t = trail();
        assert!(t.pointer_move(Vec2::new(100.0, 100.0), 0.0, &mut rng));
        assert_eq!(t.len(), 1);
        assert_eq!(t.sparkles[0].life, 1.0);
    }

    #[test]
    fn test_throttle_one_per_50ms() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut t = trail();
        assert!(t.pointer_move(Vec2::ZERO, 1000.0, &mut rng));
        assert!(!t.pointer_move(Vec2::ZERO, 1010.0, &mut rng));
        assert!(!t.pointer_move(Vec2::ZERO, 1049.9, &mut rng));
        assert!(t.pointer_move(Vec2::ZERO, 1050.0, &mut rng));
        assert_eq!(t.len(), 2);

        // A steady 4ms mouse stream over 500ms yields one sparkle per 52ms step
        let mut t = trail();
        let emitted = (0..125)
            .filter(|i| t.pointer_move(Vec2::ZERO, *i as f64 * 4.0, &mut rng))
            .count();
        assert_eq!(emitted, 10);
    }

    #[test]
    fn test_expires_after_lifetime() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut t = trail();
        t.pointer_move(Vec2::ZERO, 0.0, &mut rng);
        t.pointer_move(Vec2::ZERO, 400.0, &mut rng);

        t.update(400.0);
        assert_eq!(t.len(), 2);
        assert!((t.sparkles[0].life - 0.5).abs() < 1e-6);
        assert_eq!(t.sparkles[1].life, 1.0);

        t.update(799.0);
        assert_eq!(t.len(), 2);

        t.update(800.0);
        assert_eq!(t.len(), 1);
        assert_eq!(t.sparkles[0].born_ms, 400.0);

        t.update(1200.0);
        assert!(t.is_empty());
    }

    #[test]
    fn test_disabled_trail_stays_empty() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut t = SparkleTrail::new(SparkleTuning {
            enabled: false,
            ..SparkleTuning::default()
        });
        assert!(!t.pointer_move(Vec2::ZERO, 0.0, &mut rng));
        assert!(t.is_empty());
    }

    proptest! {
        #[test]
        fn prop_sparkle_near_pointer(seed in any::<u64>(), x in 0.0f32..2000.0, y in 0.0f32..2000.0) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut t = trail();
            t.pointer_move(Vec2::new(x, y), 0.0, &mut rng);
            let s = &t.sparkles[0];
            prop_assert!((s.pos.x - x).abs() <= 10.001);
            prop_assert!((s.pos.y - y).abs() <= 10.001);
            prop_assert!(s.size >= SPARKLE_MIN_SIZE && s.size <= SPARKLE_MIN_SIZE + SPARKLE_SIZE_RANGE);
            prop_assert!(SPARKLE_GLYPHS.contains(&s.glyph));
            prop_assert!(SPARKLE_COLORS.contains(&s.color));
        }
    }
}
