//! Utility types for the 3dm library.
//!
//! This module contains fundamental types used throughout the library:
//! - [`Error`] / [`Result`] - Error handling
//! - Point, vector, rectangle and size types built on glam
//! - [`Color`] - 8-bit RGBA color

mod color;
mod error;
mod math;

pub use color::*;
pub use error::*;
pub use math::*;
