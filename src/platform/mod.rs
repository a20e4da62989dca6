//! Platform abstraction layer
//!
//! Host-facing pieces that sit between raw browser events and the
//! simulation:
//! - Input: edge-detecting keyboard latch with an allow-list
//! - Time: fixed-timestep scheduler driven by display frame timestamps

pub mod input;
pub mod time;

pub use input::{InputLatch, Key};
pub use time::{FixedStepScheduler, FrameReport, Simulation};
