//! 2D rendering module
//!
//! Scenes emit draw ops; any immediate-mode raster surface replays them.

pub mod draw;
pub mod shapes;
pub mod surface;

pub use draw::{DrawList, DrawOp, Font, Paint, Surface, Transform};
pub use surface::SurfaceManager;
