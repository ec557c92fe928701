//! Background Tasks Module
//!
//! # Tasks
//! - Cache cleanup: sweeps expired in-process cache entries at configured intervals

mod cleanup;

pub use cleanup::spawn_cleanup_task;
