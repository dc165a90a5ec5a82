//! PDF text extraction
//!
//! Timing sheets are read as plain text. Table structure is recovered later by
//! the [`parser`](crate::parser) module from the order of tokens on each line.

mod reader;
pub mod text_utils;

pub use reader::PdfText;
