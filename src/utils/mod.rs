//! Utilities (document reading, PDF text extraction).

pub mod document;
pub mod pdf;

pub use document::{read_document, read_stdin};
