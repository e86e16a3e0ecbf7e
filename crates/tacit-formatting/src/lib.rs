//! # tacit-formatting
//!
//! Renders a finished query result into one of the supported output
//! encodings. Rendering is a pure transform over a borrowed result.

pub mod formats;
pub mod formatter;

pub use formatter::{render, Formatter};
