//! Immediate-mode draw operations and the surface contract
//!
//! Scenes never touch a drawing context. They emit `DrawOp`s carrying their
//! full transform, alpha and glow, and a `Surface` replays them. Any
//! save/restore bookkeeping belongs to the surface implementation.

use glam::Vec2;
use std::borrow::Cow;

use crate::sim::Rect;
use crate::sim::palette::Color;

/// Fill style for one draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub color: Color,
    /// Global alpha, 0-1
    pub alpha: f32,
    /// Glow (shadow blur) radius in px, same color as the fill. 0 disables.
    pub glow: f32,
}

impl Paint {
    pub fn solid(color: Color) -> Self {
        Self {
            color,
            alpha: 1.0,
            glow: 0.0,
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn with_glow(mut self, glow: f32) -> Self {
        self.glow = glow.max(0.0);
        self
    }
}

/// Translate, then rotate, then scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translate: Vec2,
    /// Radians
    pub rotation: f32,
    pub scale: f32,
}

impl Transform {
    pub fn at(translate: Vec2) -> Self {
        Self {
            translate,
            rotation: 0.0,
            scale: 1.0,
        }
    }

    pub fn rotated(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn scaled(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

/// Font family for text draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    SansSerif,
    /// Decorative heading face
    Script,
}

impl Font {
    pub fn css_family(&self) -> &'static str {
        match self {
            Font::SansSerif => "sans-serif",
            Font::Script => "'Great Vibes', cursive",
        }
    }
}

/// One immediate-mode draw
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Clear to transparent
    Clear,
    FillRect { rect: Rect, paint: Paint },
    Circle { center: Vec2, radius: f32, paint: Paint },
    /// Text centred on the transform origin (both axes)
    Text {
        text: Cow<'static, str>,
        transform: Transform,
        size_px: f32,
        font: Font,
        paint: Paint,
    },
}

/// The drawing capability a scene needs from its host
pub trait Surface {
    /// Resize the drawable area in pixels
    fn set_size(&mut self, width: u32, height: u32);
    fn draw(&mut self, op: &DrawOp);
}

/// Ops for one frame, back to front
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    ops: Vec<DrawOp>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Replay every op onto `surface` in order
    pub fn replay<S: Surface + ?Sized>(&self, surface: &mut S) {
        for op in &self.ops {
            surface.draw(op);
        }
    }
}
