//! Gyroscope access over the Linux industrial I/O (IIO) sysfs interface.
//!
//! `gyrio` is both a library (device discovery and sampling for the Tilt
//! Glass app) and a small CLI for inspecting gyroscopes and injecting
//! synthetic tilt samples into a running app.

mod macros;

pub mod iio;
pub mod sample;

pub use iio::{DeviceName, Gyroscope, IioError};
pub use sample::TiltSample;
