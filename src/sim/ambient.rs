//! Ambient background: floating symbols that can be popped
//!
//! Symbols drift forever, wrapping at the vertical edges. A spawn attempt
//! every interval adds one at the bottom while under the cap. A click pops
//! at most one symbol, the most recently created one under the pointer,
//! into a shower of fragments.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::interaction::pick_topmost;
use super::particle::{Fragment, scatter, update_fragments};
use super::sequencer::Interval;
use super::sparkle::SparkleTrail;
use super::symbol::AmbientSymbol;
use crate::Viewport;
use crate::renderer::{DrawList, DrawOp, shapes};
use crate::runner::{Scene, SceneSignal};
use crate::scheduler::Frame;
use crate::settings::{AmbientTuning, Settings};

/// Spawned symbols enter this far below the bottom edge
pub const SPAWN_DEPTH: f32 = 30.0;

/// Result of a successful pop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pop {
    pub glyph: &'static str,
    pub at: Vec2,
}

pub struct AmbientScene {
    /// Live symbols, in creation order
    pub symbols: Vec<AmbientSymbol>,
    /// Live fragments, in creation order
    pub fragments: Vec<Fragment>,
    pub sparkles: SparkleTrail,
    tuning: AmbientTuning,
    spawner: Interval,
    viewport: Viewport,
    rng: Pcg32,
    glow_scale: f32,
    signals: Vec<SceneSignal>,
}

impl AmbientScene {
    /// Create the scene and seed its initial symbols at random positions
    pub fn new(viewport: Viewport, settings: &Settings, seed: u64) -> Self {
        let tuning = settings.ambient.clone();
        let mut scene = Self {
            symbols: Vec::with_capacity(tuning.max_symbols),
            fragments: Vec::new(),
            sparkles: SparkleTrail::new(settings.sparkle.clone()),
            spawner: Interval::new(tuning.spawn_interval_ms),
            tuning,
            viewport,
            rng: Pcg32::seed_from_u64(seed),
            glow_scale: settings.quality.glow_scale(),
            signals: Vec::new(),
        };

        let initial = scene.tuning.initial_symbols.min(scene.tuning.max_symbols);
        for _ in 0..initial {
            let at = Vec2::new(
                scene.rng.random::<f32>() * viewport.width,
                scene.rng.random::<f32>() * viewport.height,
            );
            let symbol = AmbientSymbol::new(at, &mut scene.rng);
            scene.symbols.push(symbol);
        }
        scene
    }

    pub fn tuning(&self) -> &AmbientTuning {
        &self.tuning
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Add one symbol below the bottom edge, rising faster than the seeded
    /// ones. Returns false at the cap.
    pub fn spawn_symbol(&mut self) -> bool {
        if self.symbols.len() >= self.tuning.max_symbols {
            return false;
        }
        let at = Vec2::new(
            self.rng.random::<f32>() * self.viewport.width,
            self.viewport.height + SPAWN_DEPTH,
        );
        let mut symbol = AmbientSymbol::new(at, &mut self.rng);
        symbol.drift = -0.3 - self.rng.random::<f32>() * 0.3;
        self.symbols.push(symbol);
        true
    }

    /// Pop the most recently created symbol under `at`, if any
    pub fn pop_at(&mut self, at: Vec2) -> Option<Pop> {
        let index = pick_topmost(&self.symbols, at)?;
        let symbol = self.symbols.remove(index);
        scatter(
            &mut self.fragments,
            symbol.pos,
            symbol.color,
            symbol.glyph,
            self.tuning.fragments_per_pop,
            self.tuning.own_glyph_fragments,
            &mut self.rng,
        );
        log::debug!("Popped {} at ({:.0}, {:.0})", symbol.glyph, symbol.pos.x, symbol.pos.y);
        Some(Pop {
            glyph: symbol.glyph,
            at: symbol.pos,
        })
    }
}

impl Scene for AmbientScene {
    fn start(&mut self, now_ms: f64) {
        self.spawner.start(now_ms);
    }

    fn update(&mut self, frame: &Frame) {
        if self.spawner.poll(frame.now_ms) {
            self.spawn_symbol();
        }

        let (height, margin) = (self.viewport.height, self.tuning.wrap_margin);
        for symbol in &mut self.symbols {
            symbol.update(height, margin);
        }
        update_fragments(&mut self.fragments);
        self.sparkles.update(frame.now_ms);
    }

    fn render(&self, out: &mut DrawList) {
        out.push(DrawOp::Clear);
        for symbol in &self.symbols {
            shapes::symbol(symbol, self.glow_scale, out);
        }
        for fragment in &self.fragments {
            shapes::fragment(fragment, self.glow_scale, out);
        }
        for sparkle in &self.sparkles.sparkles {
            shapes::sparkle(sparkle, self.glow_scale, out);
        }
    }

    fn click(&mut self, at: Vec2, _now_ms: f64) {
        if let Some(pop) = self.pop_at(at) {
            self.signals.push(SceneSignal::Popped {
                glyph: pop.glyph,
                at: pop.at,
            });
        }
    }

    fn pointer_move(&mut self, at: Vec2, now_ms: f64) {
        self.sparkles.pointer_move(at, now_ms, &mut self.rng);
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn cancel_timers(&mut self) {
        self.spawner.cancel();
    }

    fn take_signals(&mut self) -> Vec<SceneSignal> {
        std::mem::take(&mut self.signals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scene(seed: u64) -> AmbientScene {
        AmbientScene::new(Viewport::new(800.0, 600.0), &Settings::default(), seed)
    }

    fn frame(index: u64, now_ms: f64) -> Frame {
        Frame { index, now_ms }
    }

    #[test]
    fn test_initial_population() {
        let s = scene(1);
        assert_eq!(s.symbols.len(), 20);
        assert!(s.fragments.is_empty());
    }

    #[test]
    fn test_spawn_respects_cap() {
        let mut s = scene(2);
        for _ in 0..5 {
            assert!(s.spawn_symbol());
        }
        assert_eq!(s.symbols.len(), 25);
        assert!(!s.spawn_symbol());
        assert_eq!(s.symbols.len(), 25);

        let newest = s.symbols.last().unwrap();
        assert_eq!(newest.anchor.y, 600.0 + SPAWN_DEPTH);
        assert!(newest.drift <= -0.3 && newest.drift >= -0.6);
    }

    #[test]
    fn test_spawn_on_interval() {
        let mut s = scene(3);
        s.start(0.0);
        s.update(&frame(1, 1999.0));
        assert_eq!(s.symbols.len(), 20);
        s.update(&frame(2, 2000.0));
        assert_eq!(s.symbols.len(), 21);
        s.update(&frame(3, 2016.0));
        assert_eq!(s.symbols.len(), 21);
    }

    #[test]
    fn test_pop_removes_one_and_scatters_twelve() {
        let mut s = scene(4);
        s.symbols.truncate(3);
        // Stack the three symbols on one point
        let at = Vec2::new(400.0, 300.0);
        for symbol in s.symbols.iter_mut() {
            symbol.pos = at;
            symbol.anchor = at;
        }
        let topmost_glyph = s.symbols[2].glyph;

        s.click(at, 0.0);
        assert_eq!(s.symbols.len(), 2);
        assert_eq!(s.fragments.len(), 12);
        assert!(s.fragments[..3].iter().all(|f| f.glyph == topmost_glyph));
        assert!(s.fragments.iter().all(|f| f.life == 1.0 && f.pos == at));

        let signals = s.take_signals();
        assert_eq!(
            signals,
            vec![SceneSignal::Popped {
                glyph: topmost_glyph,
                at
            }]
        );
        assert!(s.take_signals().is_empty());
    }

    #[test]
    fn test_pop_takes_most_recent_match() {
        let mut s = scene(5);
        s.symbols.clear();
        let at = Vec2::new(100.0, 100.0);
        for _ in 0..3 {
            let mut sym = AmbientSymbol::new(at, &mut Pcg32::seed_from_u64(0));
            sym.size = 30.0;
            s.symbols.push(sym);
        }
        s.symbols[0].glyph = "first";
        s.symbols[2].glyph = "last";
        let pop = s.pop_at(at).unwrap();
        assert_eq!(pop.glyph, "last");
        assert_eq!(s.symbols.len(), 2);
        assert_eq!(s.symbols[0].glyph, "first");
    }

    #[test]
    fn test_miss_is_noop() {
        let mut s = scene(6);
        let before = s.symbols.len();
        s.click(Vec2::new(-5000.0, -5000.0), 0.0);
        assert_eq!(s.symbols.len(), before);
        assert!(s.fragments.is_empty());
        assert!(s.take_signals().is_empty());
    }

    #[test]
    fn test_fragments_expire() {
        let mut s = scene(7);
        let at = s.symbols[0].pos;
        s.pop_at(at).unwrap();
        // Slowest decay is 0.02, so 51 frames clears every fragment
        for i in 0..51 {
            s.update(&frame(i, 0.0));
        }
        assert!(s.fragments.is_empty());
    }

    #[test]
    fn test_render_order() {
        let mut s = scene(8);
        let at = s.symbols[0].pos;
        s.pop_at(at).unwrap();
        let mut out = DrawList::new();
        s.render(&mut out);
        assert_eq!(out.ops()[0], DrawOp::Clear);
        assert_eq!(out.len(), 1 + s.symbols.len() + s.fragments.len());
    }

    #[test]
    fn test_sparkles_drawn_last_and_expire() {
        let mut s = scene(10);
        s.start(0.0);
        s.pointer_move(Vec2::new(200.0, 200.0), 100.0);
        s.pointer_move(Vec2::new(210.0, 200.0), 120.0);
        assert_eq!(s.sparkles.len(), 1);

        let mut out = DrawList::new();
        s.render(&mut out);
        let Some(DrawOp::Text { text, .. }) = out.ops().last() else {
            panic!("sparkle should be text");
        };
        assert_eq!(text, s.sparkles.sparkles[0].glyph);

        s.update(&frame(1, 899.0));
        assert_eq!(s.sparkles.len(), 1);
        s.update(&frame(2, 900.0));
        assert!(s.sparkles.is_empty());
    }

    #[test]
    fn test_cancelled_spawner_never_fires() {
        let mut s = scene(9);
        s.start(0.0);
        s.cancel_timers();
        s.symbols.clear();
        for i in 0..100 {
            s.update(&frame(i, i as f64 * 1000.0));
        }
        assert!(s.symbols.is_empty());
    }

    proptest! {
        #[test]
        fn prop_population_never_exceeds_cap(
            seed in any::<u64>(),
            clicks in proptest::collection::vec((0f32..800.0, 0f32..600.0), 0..20),
            frames in 1u64..400,
        ) {
            let mut s = scene(seed);
            s.start(0.0);
            let mut clicks = clicks.into_iter();
            for i in 0..frames {
                // Long frames so the spawner fires every step
                s.update(&frame(i, i as f64 * 2500.0));
                if i % 10 == 0 {
                    if let Some((x, y)) = clicks.next() {
                        s.click(Vec2::new(x, y), 0.0);
                    }
                }
                prop_assert!(s.symbols.len() <= 25);
            }
        }
    }
}
