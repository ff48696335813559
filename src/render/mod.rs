//! Turning quotes into PDF documents.

pub mod generator;
pub mod template;

pub use generator::{PdfGenerator, RenderConfig};
pub use template::{Palette, Template};
