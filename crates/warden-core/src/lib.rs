//! Warden Core - shared building blocks for the NPC simulation
//!
//! This crate provides the pieces every other Warden crate leans on:
//! - Heading math on the horizontal plane (yaw, smooth turning)
//! - Fixed-step game time
//! - The character motion interface that AI and player logic drive,
//!   plus a headless flat-ground implementation of it

pub mod heading;
pub mod motion;
pub mod time;
pub mod types;

pub use glam::Vec3;
pub use motion::{CharacterMotion, FlatGround};
pub use time::{GameTime, TimeConfig};
pub use types::BodyId;
