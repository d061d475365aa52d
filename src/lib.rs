//! emberfield
//!
//! The two animated backdrops of a portfolio site (the black-hole disc tunnel
//! and the footer fireworks) rendered into software pixel buffers, the mount
//! lifecycle that drives them frame by frame, and the résumé chat proxy.

pub mod chat;
pub mod config;
pub mod display;
pub mod easing;
pub mod effects;
pub mod mount;
pub mod util;

/// Crate version, logged by both binaries at startup
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
