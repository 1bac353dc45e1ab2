//! Floating decorative symbols for the ambient background

use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

use super::palette::{Color, SYMBOL_COLORS, SYMBOL_GLYPHS, pick};

/// A symbol drifting on a slow anchor with a two-sinusoid wobble.
///
/// Symbols never decay; they leave the population only when popped.
#[derive(Debug, Clone)]
pub struct AmbientSymbol {
    /// Rendered position (anchor + wobble)
    pub pos: Vec2,
    /// Drifting anchor point
    pub anchor: Vec2,
    pub glyph: &'static str,
    pub color: Color,
    /// Font size in px, also the hit radius
    pub size: f32,
    /// Wobble phase
    pub phase: f32,
    pub phase_speed: f32,
    /// Wobble amplitude per axis
    pub wobble: Vec2,
    /// Anchor vertical drift per frame (negative rises)
    pub drift: f32,
    pub rotation: f32,
    pub spin: f32,
    pub opacity: f32,
    pub pulse: f32,
    pub pulse_speed: f32,
}

impl AmbientSymbol {
    pub fn new<R: Rng + ?Sized>(at: Vec2, rng: &mut R) -> Self {
        Self {
            pos: at,
            anchor: at,
            glyph: pick(rng, &SYMBOL_GLYPHS),
            color: pick(rng, &SYMBOL_COLORS),
            size: 16.0 + rng.random::<f32>() * 20.0,
            phase: rng.random::<f32>() * TAU,
            phase_speed: 0.005 + rng.random::<f32>() * 0.01,
            wobble: Vec2::new(
                30.0 + rng.random::<f32>() * 40.0,
                20.0 + rng.random::<f32>() * 30.0,
            ),
            drift: -0.1 - rng.random::<f32>() * 0.2,
            rotation: rng.random::<f32>() * TAU,
            spin: (rng.random::<f32>() - 0.5) * 0.02,
            opacity: 0.4 + rng.random::<f32>() * 0.3,
            pulse: rng.random::<f32>() * TAU,
            pulse_speed: 0.02 + rng.random::<f32>() * 0.02,
        }
    }

    /// Advance phases, drift the anchor and wrap past `height +/- margin`
    pub fn update(&mut self, height: f32, margin: f32) {
        self.phase += self.phase_speed;
        self.pulse += self.pulse_speed;
        self.rotation += self.spin;

        self.pos.x = self.anchor.x + self.phase.sin() * self.wobble.x;
        self.pos.y = self.anchor.y + (self.phase * 0.7).cos() * self.wobble.y;
        self.anchor.y += self.drift;

        if self.anchor.y < -margin {
            self.anchor.y = height + margin;
        } else if self.anchor.y > height + margin {
            self.anchor.y = -margin;
        }
    }

    /// Breathing scale applied to the glyph size
    pub fn pulse_scale(&self) -> f32 {
        1.0 + self.pulse.sin() * 0.1
    }

    /// Breathing opacity
    pub fn pulse_alpha(&self) -> f32 {
        self.opacity * (0.8 + self.pulse.sin() * 0.2)
    }

    /// Pointer hit within the symbol's size
    pub fn contains(&self, point: Vec2) -> bool {
        self.pos.distance(point) < self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn symbol(at: Vec2) -> AmbientSymbol {
        let mut rng = Pcg32::seed_from_u64(42);
        AmbientSymbol::new(at, &mut rng)
    }

    #[test]
    fn test_wraps_top_to_bottom() {
        let mut s = symbol(Vec2::new(100.0, -49.9));
        s.drift = -0.5;
        s.update(600.0, 50.0);
        assert_eq!(s.anchor.y, 650.0);
    }

    #[test]
    fn test_wraps_bottom_to_top() {
        let mut s = symbol(Vec2::new(100.0, 649.9));
        s.drift = 0.5;
        s.update(600.0, 50.0);
        assert_eq!(s.anchor.y, -50.0);
    }

    #[test]
    fn test_wobble_stays_near_anchor() {
        let mut s = symbol(Vec2::new(300.0, 300.0));
        for _ in 0..500 {
            s.update(600.0, 50.0);
            let offset = s.pos - Vec2::new(s.anchor.x, s.anchor.y - s.drift);
            assert!(offset.x.abs() <= s.wobble.x + 1e-3);
            assert!(offset.y.abs() <= s.wobble.y + 1e-3);
        }
    }

    #[test]
    fn test_contains_uses_size() {
        let mut s = symbol(Vec2::new(0.0, 0.0));
        s.size = 20.0;
        assert!(s.contains(Vec2::new(19.0, 0.0)));
        assert!(!s.contains(Vec2::new(20.0, 0.0)));
    }

    #[test]
    fn test_pulse_bounds() {
        let mut s = symbol(Vec2::ZERO);
        for _ in 0..300 {
            s.update(600.0, 50.0);
            assert!((0.9..=1.1).contains(&s.pulse_scale()));
            assert!(s.pulse_alpha() <= s.opacity + 1e-6);
        }
    }
}
