//! Viewport tracking and surface resizing

use super::draw::Surface;
use crate::Viewport;

/// Keeps the drawable area equal to the viewport
#[derive(Debug, Clone, Default)]
pub struct SurfaceManager {
    viewport: Viewport,
}

impl SurfaceManager {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Size a freshly attached surface to the current viewport
    pub fn attach<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.set_size(self.viewport.width as u32, self.viewport.height as u32);
    }

    /// Record a new viewport and resize the surface, if one is attached.
    /// Absolute-pixel entities are left where they are.
    pub fn resize<S: Surface + ?Sized>(
        &mut self,
        width: f32,
        height: f32,
        surface: Option<&mut S>,
    ) -> Viewport {
        self.viewport = Viewport::new(width.max(0.0), height.max(0.0));
        if let Some(surface) = surface {
            self.attach(surface);
        }
        log::debug!("Viewport resized to {}x{}", self.viewport.width, self.viewport.height);
        self.viewport
    }
}
