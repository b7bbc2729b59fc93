//! # eyewatch-types
//!
//! Core types for simulated eye-health telemetry. This crate defines the data
//! model shared by the eyewatch server and any client that consumes its JSON
//! endpoints.
//!
//! ## Features
//!
//! - `serde` (default): JSON (or any serde format) serialization of every type
//!
//! ## Example
//!
//! ```rust
//! use eyewatch_types::{BlinkSample, DrowsinessSample, DrowsinessScale};
//!
//! let blink = BlinkSample::new("14:05", 17.2);
//! assert!(blink.is_healthy);
//!
//! let drowsy = DrowsinessSample::new("14:05", 0.71, DrowsinessScale::Fraction);
//! assert!(drowsy.is_drowsy);
//! ```

mod insight;
mod metrics;
mod sample;

pub use insight::*;
pub use metrics::*;
pub use sample::*;

/// Blink rate (blinks per minute) at or above which a sample is considered healthy.
pub const HEALTHY_BLINK_RATE: f64 = 15.0;

/// Daily screen time (hours) above which a day is considered excessive.
pub const EXCESSIVE_SCREEN_HOURS: f64 = 6.0;
