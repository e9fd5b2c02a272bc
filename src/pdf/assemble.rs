//! Portfolio assembly: photos in, paginated PDF out

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::Result;
use crate::layout::PageTemplate;
use crate::pdf::footer::FooterOverlay;
use crate::pdf::images::{RasterImage, MAX_LOGO_EDGE};
use crate::pdf::paginate::paginate;
use crate::pdf::render::{render_document, DocumentInfo};
use crate::pdf::story::build_story;

/// Default caption printed under every photo
pub const DEFAULT_CAPTION: &str = "Session photography by the studio team\n\
Contact: studio@example.com | +1 (555) 010-0100\n\
Images are provided for portfolio review only";

/// Default heading on the first photo page
pub const DEFAULT_SECTION_HEADER: &str = "Photo Portfolio";

/// Options for assembling a portfolio
#[derive(Debug, Clone)]
pub struct AssemblerOptions {
    /// Logo drawn in the top-left corner of every page after the first
    pub logo_left: PathBuf,
    /// Logo drawn in the top-right corner of every page after the first
    pub logo_right: PathBuf,
    /// Heading shown on the first photo page
    pub section_header: String,
    /// Caption printed under every photo
    pub caption: String,
    /// Date printed under the section header
    pub session_date: Option<NaiveDate>,
    /// Document title (PDF Info dictionary)
    pub title: Option<String>,
    /// Document author (PDF Info dictionary)
    pub author: Option<String>,
    pub template: PageTemplate,
}

impl AssemblerOptions {
    pub fn new(logo_left: impl Into<PathBuf>, logo_right: impl Into<PathBuf>) -> Self {
        Self {
            logo_left: logo_left.into(),
            logo_right: logo_right.into(),
            section_header: DEFAULT_SECTION_HEADER.to_string(),
            caption: DEFAULT_CAPTION.to_string(),
            session_date: None,
            title: Some("Photo Portfolio".to_string()),
            author: None,
            template: PageTemplate::portfolio(),
        }
    }
}

/// Outcome of a successful generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub output_path: PathBuf,
    pub page_count: usize,
}

/// Turns an ordered photo list into a portfolio PDF
#[derive(Debug, Clone)]
pub struct Assembler {
    options: AssemblerOptions,
}

impl Assembler {
    pub fn new(options: AssemblerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AssemblerOptions {
        &self.options
    }

    /// Render `photos`, in order, into a PDF at `output`
    ///
    /// Both logo assets are loaded first, so a missing asset fails the call
    /// before anything is written. An unwritable `output` fails the call with
    /// an I/O error; nothing is cleaned up after a failure.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use photo_portfolio::pdf::{Assembler, AssemblerOptions};
    /// use std::path::{Path, PathBuf};
    ///
    /// let assembler = Assembler::new(AssemblerOptions::new(
    ///     "assets/logo-left.png",
    ///     "assets/logo-right.png",
    /// ));
    /// let photos = vec![PathBuf::from("beach.jpg"), PathBuf::from("forest.jpg")];
    ///
    /// let report = assembler
    ///     .generate(Path::new("portfolio.pdf"), &photos)
    ///     .expect("Failed to generate portfolio");
    /// println!("{} pages", report.page_count);
    /// ```
    pub fn generate(&self, output: &Path, photos: &[PathBuf]) -> Result<GenerationReport> {
        let options = &self.options;
        log::info!(
            "Assembling portfolio of {} photos into {}",
            photos.len(),
            output.display()
        );

        let left_logo = RasterImage::load(&options.logo_left, MAX_LOGO_EDGE)?;
        let right_logo = RasterImage::load(&options.logo_right, MAX_LOGO_EDGE)?;

        // Pass 1: lay out every page
        let story = build_story(photos, options);
        let snapshots = paginate(&story, &options.template)?;

        // Pass 2: replay the pages with the total known
        let overlay = FooterOverlay::new(
            options.template,
            (left_logo.width, left_logo.height),
            (right_logo.width, right_logo.height),
        );
        let info = DocumentInfo {
            title: options.title.clone(),
            author: options.author.clone(),
        };
        let page_count = render_document(
            &snapshots,
            &options.template,
            &overlay,
            [&left_logo, &right_logo],
            &info,
            output,
        )?;

        Ok(GenerationReport {
            output_path: output.to_path_buf(),
            page_count,
        })
    }
}

/// Convenience wrapper around [`Assembler::generate`]
pub fn generate(output: &Path, photos: &[PathBuf], options: &AssemblerOptions) -> Result<GenerationReport> {
    Assembler::new(options.clone()).generate(output, photos)
}
