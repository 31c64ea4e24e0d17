//! View helpers for the gallery.
//!
//! - Thumbnail grid with per-card caption editing (grid.rs)
//! - Full-size modal viewer (viewer.rs)

pub mod grid;
pub mod viewer;
