//! Twinkling background stars for the celebration sky

use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

use crate::Viewport;
use crate::consts::FRAME_SECONDS;

/// A star pinned to a viewport fraction, so it follows resizes
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    /// Position as a fraction of the viewport, each axis in [0, 1)
    pub fraction: Vec2,
    pub size: f32,
    pub twinkle_offset: f32,
    pub twinkle_speed: f32,
}

impl Star {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            fraction: Vec2::new(rng.random::<f32>(), rng.random::<f32>()),
            size: 0.3 + rng.random::<f32>() * 1.2,
            twinkle_offset: rng.random::<f32>() * TAU,
            twinkle_speed: 0.01 + rng.random::<f32>() * 0.02,
        }
    }

    /// Pixel position for the current viewport
    pub fn position(&self, viewport: Viewport) -> Vec2 {
        viewport.at_fraction(self.fraction)
    }

    /// Alpha at `frame`, never below 0.1
    pub fn brightness(&self, frame: u64) -> f32 {
        let t = frame as f32 * FRAME_SECONDS;
        let twinkle = 0.3 + (t * self.twinkle_speed * 60.0 + self.twinkle_offset).sin() * 0.4;
        twinkle.max(0.1)
    }
}

/// Generate a fixed starfield
pub fn starfield<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Star> {
    (0..count).map(|_| Star::new(rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_position_tracks_viewport() {
        let mut rng = Pcg32::seed_from_u64(8);
        let stars = starfield(50, &mut rng);
        for (w, h) in [(800.0, 600.0), (1920.0, 1080.0), (375.0, 812.0)] {
            let vp = Viewport::new(w, h);
            for star in &stars {
                let p = star.position(vp);
                assert_eq!(p.x, star.fraction.x * w);
                assert_eq!(p.y, star.fraction.y * h);
            }
        }
    }

    #[test]
    fn test_brightness_range() {
        let mut rng = Pcg32::seed_from_u64(4);
        let star = Star::new(&mut rng);
        for frame in 0..1000 {
            let b = star.brightness(frame);
            assert!((0.1..=0.7 + 1e-6).contains(&b));
        }
    }
}
