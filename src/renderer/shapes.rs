//! Draw-op generation for scene entities
//!
//! Pure functions: every transform, alpha and glow value is computed here and
//! carried on the op, so tests can assert on them without a live surface.

use glam::Vec2;
use std::borrow::Cow;

use super::draw::{DrawList, DrawOp, Font, Paint, Transform};
use crate::Viewport;
use crate::consts::{REVEAL_FRAMES, REVEAL_START_SCALE};
use crate::sim::Rect;
use crate::sim::palette::{CONTROL_FILL, CONTROL_TEXT, Color};
use crate::sim::particle::{Fragment, Spark};
use crate::sim::projectile::Projectile;
use crate::sim::sparkle::Sparkle;
use crate::sim::star::Star;
use crate::sim::symbol::AmbientSymbol;

/// Glow radii before quality scaling
pub const SYMBOL_GLOW: f32 = 15.0;
pub const FRAGMENT_GLOW: f32 = 10.0;
pub const SPARK_GLOW: f32 = 10.0;
pub const SHELL_GLOW: f32 = 15.0;
pub const TEXT_GLOW: f32 = 25.0;

/// Shell head radius
pub const SHELL_RADIUS: f32 = 4.0;
/// Trail dot radius
pub const TRAIL_RADIUS: f32 = 2.0;
/// Trail alpha at full point life
pub const TRAIL_ALPHA: f32 = 0.4;

/// Opaque full-viewport fill
pub fn background(viewport: Viewport, color: Color, out: &mut DrawList) {
    out.push(DrawOp::FillRect {
        rect: Rect::new(Vec2::ZERO, Vec2::new(viewport.width, viewport.height)),
        paint: Paint::solid(color),
    });
}

/// Twinkling star dot
pub fn star(star: &Star, viewport: Viewport, frame: u64, out: &mut DrawList) {
    out.push(DrawOp::Circle {
        center: star.position(viewport),
        radius: star.size,
        paint: Paint::solid(Color::WHITE).with_alpha(star.brightness(frame)),
    });
}

/// Fading trail (oldest first, so newer dots paint over) then the glowing head
pub fn projectile<P>(shell: &Projectile<P>, glow_scale: f32, out: &mut DrawList) {
    if shell.exploded {
        return;
    }
    for point in shell.trail.iter().rev() {
        out.push(DrawOp::Circle {
            center: point.pos,
            radius: TRAIL_RADIUS,
            paint: Paint::solid(shell.color).with_alpha(point.life * TRAIL_ALPHA),
        });
    }
    out.push(DrawOp::Circle {
        center: shell.pos,
        radius: SHELL_RADIUS,
        paint: Paint::solid(shell.color).with_glow(SHELL_GLOW * glow_scale),
    });
}

/// Spark shrinks and fades with life
pub fn spark(spark: &Spark, glow_scale: f32, out: &mut DrawList) {
    if spark.life <= 0.0 {
        return;
    }
    out.push(DrawOp::Circle {
        center: spark.pos,
        radius: spark.radius(),
        paint: Paint::solid(spark.color)
            .with_alpha(spark.life)
            .with_glow(SPARK_GLOW * glow_scale),
    });
}

/// Floating symbol with breathing size and opacity
pub fn symbol(symbol: &AmbientSymbol, glow_scale: f32, out: &mut DrawList) {
    out.push(DrawOp::Text {
        text: Cow::Borrowed(symbol.glyph),
        transform: Transform::at(symbol.pos).rotated(symbol.rotation),
        size_px: symbol.size * symbol.pulse_scale(),
        font: Font::SansSerif,
        paint: Paint::solid(symbol.color)
            .with_alpha(symbol.pulse_alpha())
            .with_glow(SYMBOL_GLOW * glow_scale),
    });
}

/// Spinning fragment, shrinking and fading with life
pub fn fragment(fragment: &Fragment, glow_scale: f32, out: &mut DrawList) {
    if fragment.life <= 0.0 {
        return;
    }
    out.push(DrawOp::Text {
        text: Cow::Borrowed(fragment.glyph),
        transform: Transform::at(fragment.pos).rotated(fragment.rotation),
        size_px: fragment.size * fragment.life,
        font: Font::SansSerif,
        paint: Paint::solid(fragment.color)
            .with_alpha(fragment.life)
            .with_glow(FRAGMENT_GLOW * glow_scale),
    });
}

/// Pointer sparkle, glowing as wide as it is tall
pub fn sparkle(sparkle: &Sparkle, glow_scale: f32, out: &mut DrawList) {
    if sparkle.life <= 0.0 {
        return;
    }
    out.push(DrawOp::Text {
        text: Cow::Borrowed(sparkle.glyph),
        transform: Transform::at(sparkle.pos),
        size_px: sparkle.size,
        font: Font::SansSerif,
        paint: Paint::solid(sparkle.color)
            .with_alpha(sparkle.life)
            .with_glow(sparkle.size * glow_scale),
    });
}

/// Reveal progress 0-1 for something revealed at `revealed_at`
pub fn reveal_progress(revealed_at: Option<u64>, frame: u64) -> Option<f32> {
    let at = revealed_at?;
    let elapsed = frame.saturating_sub(at);
    Some((elapsed as f32 / REVEAL_FRAMES as f32).min(1.0))
}

/// Responsive heading size: 8% of width, clamped
pub fn heading_size(width: f32, min_px: f32, max_px: f32) -> f32 {
    (width * 0.08).clamp(min_px, max_px)
}

/// Heading that fades in and grows from 75% to full size
pub fn reveal_text(
    text: &str,
    center: Vec2,
    size_px: f32,
    color: Color,
    progress: f32,
    glow_scale: f32,
    out: &mut DrawList,
) {
    let progress = progress.clamp(0.0, 1.0);
    let scale = REVEAL_START_SCALE + (1.0 - REVEAL_START_SCALE) * progress;
    out.push(DrawOp::Text {
        text: Cow::Owned(text.to_string()),
        transform: Transform::at(center).scaled(scale),
        size_px,
        font: Font::Script,
        paint: Paint::solid(color)
            .with_alpha(progress)
            .with_glow(TEXT_GLOW * glow_scale),
    });
}

/// Translucent button with a centred label
pub fn button(rect: Rect, label: &str, progress: f32, out: &mut DrawList) {
    let progress = progress.clamp(0.0, 1.0);
    out.push(DrawOp::FillRect {
        rect,
        paint: Paint::solid(CONTROL_FILL).with_alpha(0.8 * progress),
    });
    out.push(DrawOp::Text {
        text: Cow::Owned(label.to_string()),
        transform: Transform::at(rect.center()),
        size_px: 18.0,
        font: Font::SansSerif,
        paint: Paint::solid(CONTROL_TEXT).with_alpha(progress),
    });
}
