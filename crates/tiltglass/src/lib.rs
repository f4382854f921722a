//! Tilt Glass: a two-screen gyroscope demo.
//!
//! A start screen navigates to a visualization where a circle of water
//! shifts inside a stroked glass outline as the machine tilts. Samples
//! come from the Linux IIO gyroscope, or over a Unix socket via the
//! `gyrio` CLI on machines without one.

pub mod config;
pub mod events;
pub mod gui;
pub mod sys;
