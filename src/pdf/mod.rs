//! PDF portfolio generation module

pub mod assemble;
pub mod elements;
pub mod fonts;
pub mod footer;
pub mod images;
pub mod metadata;
pub mod paginate;
pub mod render;
pub mod story;

// Re-export commonly used items
pub use assemble::{generate, Assembler, AssemblerOptions, GenerationReport};
pub use footer::{page_label, FooterOverlay};
pub use metadata::{count_pages, extract_metadata, page_footers, PdfMetadata};
pub use paginate::{paginate, DrawOp, PageSnapshot};
pub use story::{build_story, SUMMARY_PAGE_COUNT};
