//! State management module
//!
//! This module handles all gallery state, including:
//! - Shared data structures (data.rs)
//! - The ordered image index and its persisted snapshot (index.rs)
//! - The gallery state manager and its editing state machine (gallery.rs)

pub mod data;
pub mod gallery;
pub mod index;
