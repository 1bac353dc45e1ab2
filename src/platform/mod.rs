//! Platform abstraction layer
//!
//! Hosts supply the display-refresh source, the drawing surface, pointer and
//! resize events:
//! - `headless`: manual frame pump and recording surface (native, tests)
//! - `web`: canvas 2D context and `requestAnimationFrame` (wasm32)

pub mod headless;

#[cfg(target_arch = "wasm32")]
pub mod web;
