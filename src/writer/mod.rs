//! PDF generation pipeline.
//!
//! The writer is layered bottom-up:
//!
//! - [`fonts`]: Helvetica metrics and WinAnsi text encoding
//! - [`content_stream`]: page-level graphics and text operators
//! - [`images`]: logo decoding into Image XObjects
//! - [`pdf_writer`]: whole-file assembly (objects, xref, trailer)
//!
//! Layout code builds a [`ContentStreamBuilder`] per page, hands the pages
//! to a [`PdfWriter`], and receives the finished bytes.

pub mod content_stream;
pub mod fonts;
pub mod images;
pub mod pdf_writer;

pub use content_stream::{Color, ContentStreamBuilder, ContentStreamOp};
pub use fonts::{win_ansi_byte, Font};
pub use images::{ColorSpace, ImageData, ImageFormat};
pub use pdf_writer::{PdfWriter, PdfWriterConfig};
