//! Dolly locomotion.
//!
//! Moves the dolly forward along the head's heading, keeps it clear of
//! walls and snaps it onto the floor, all through ray queries against the
//! collision proxy.
//!
//! # Design
//!
//! The [`LocomotionController`] mutates a [`Pose`] once per frame. The
//! heading it steers by is the head's look orientation, passed in each
//! frame; the pose's body orientation is never touched, so looking around
//! steers without turning the body.

mod config;
mod controller;
mod pose;

pub use config::LocomotionConfig;
pub use controller::{LocomotionController, LocomotionReport};
pub use pose::Pose;
