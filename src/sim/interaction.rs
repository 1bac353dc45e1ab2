//! Pointer hit-testing against the live population and on-surface controls

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::symbol::AmbientSymbol;

/// Axis-aligned rectangle in surface pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size * 0.5,
            size,
        }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Inclusive of the top-left edge, exclusive of the bottom-right
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.y >= self.min.y && point.x < max.x && point.y < max.y
    }
}

/// Index of the most recently created symbol under `point`
pub fn pick_topmost(symbols: &[AmbientSymbol], point: Vec2) -> Option<usize> {
    symbols.iter().rposition(|s| s.contains(point))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_topmost_wins_overlap() {
        let mut rng = Pcg32::seed_from_u64(1);
        let symbols: Vec<_> = (0..3)
            .map(|_| AmbientSymbol::new(Vec2::new(50.0, 50.0), &mut rng))
            .collect();
        assert_eq!(pick_topmost(&symbols, Vec2::new(52.0, 49.0)), Some(2));
    }

    #[test]
    fn test_miss() {
        let mut rng = Pcg32::seed_from_u64(1);
        let symbols = vec![AmbientSymbol::new(Vec2::new(50.0, 50.0), &mut rng)];
        assert_eq!(pick_topmost(&symbols, Vec2::new(500.0, 500.0)), None);
        assert_eq!(pick_topmost(&[], Vec2::ZERO), None);
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect::centered(Vec2::new(100.0, 100.0), Vec2::new(40.0, 20.0));
        assert_eq!(rect.min, Vec2::new(80.0, 90.0));
        assert!(rect.contains(Vec2::new(80.0, 90.0)));
        assert!(rect.contains(Vec2::new(119.9, 109.9)));
        assert!(!rect.contains(Vec2::new(120.0, 100.0)));
        assert!(!rect.contains(Vec2::new(100.0, 89.0)));
    }
}
