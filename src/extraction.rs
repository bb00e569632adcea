//! Extraction adapters: raw files to text plus metadata.
//!
//! Files are classified by extension into a [`FileKind`]; each supported
//! kind has a [`ContentExtractor`]. The [`ExtractorRegistry`] ties them
//! together behind the [`ExtractionAdapter`] contract used by the
//! retrieval façade.

pub mod extractor;
pub mod image;
pub mod kind;
pub mod pdf;
pub mod registry;
pub mod text;

pub use extractor::{ContentExtractor, Extracted, ExtractionAdapter};
pub use image::OcrImageExtractor;
pub use kind::FileKind;
pub use pdf::PdfExtractor;
pub use registry::ExtractorRegistry;
pub use text::TextExtractor;
