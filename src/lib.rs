//! Swell - real-time procedural ocean surface viewer

pub mod camera;
pub mod cli;
pub mod error;
pub mod input;
pub mod logging;
pub mod ocean;
pub mod params;
pub mod rendering;
pub mod scene;

pub use error::{Error, Result};
