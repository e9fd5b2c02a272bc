//! The portfolio element stream
//!
//! One page per photo, then the fixed summary pages. The session-log tables
//! are static placeholder content and are not derived from the photos.

use std::path::PathBuf;

use crate::date::format_date;
use crate::pdf::assemble::AssemblerOptions;
use crate::pdf::elements::{Element, ImageBlock, Paragraph, ParagraphStyle, Table};

/// Number of pages the fixed summary section occupies
pub const SUMMARY_PAGE_COUNT: usize = 4;

/// Share of the frame each photo may occupy
const PHOTO_WIDTH_FRACTION: f32 = 1.0;
const PHOTO_HEIGHT_FRACTION: f32 = 0.6;

/// Build the full element stream for `photos`, in order
pub fn build_story(photos: &[PathBuf], options: &AssemblerOptions) -> Vec<Element> {
    let mut story = Vec::with_capacity(photos.len() * 5 + 16);

    for (index, photo) in photos.iter().enumerate() {
        story.push(Element::Image(ImageBlock {
            path: photo.clone(),
            width_fraction: PHOTO_WIDTH_FRACTION,
            height_fraction: PHOTO_HEIGHT_FRACTION,
        }));
        story.push(Element::Spacer(18.0));

        if index == 0 {
            story.extend(section_header(options));
        }

        story.push(Element::Paragraph(Paragraph::new(
            options.caption.clone(),
            ParagraphStyle::CAPTION,
        )));
        story.push(Element::PageBreak);
    }

    story.extend(summary_pages());
    story
}

fn section_header(options: &AssemblerOptions) -> Vec<Element> {
    let mut block = vec![Element::Paragraph(Paragraph::new(
        options.section_header.clone(),
        ParagraphStyle::TITLE,
    ))];

    if let Some(date) = &options.session_date {
        block.push(Element::Paragraph(Paragraph::new(
            format!("Session date: {}", format_date(date)),
            ParagraphStyle::BODY,
        )));
    }

    block.push(Element::Spacer(12.0));
    block
}

fn titled_page(title: &str) -> [Element; 3] {
    [
        Element::PageBreak,
        Element::Paragraph(Paragraph::new(title, ParagraphStyle::HEADING)),
        Element::Spacer(12.0),
    ]
}

/// Three session logs and the closing summary page
pub fn summary_pages() -> Vec<Element> {
    let mut elements = Vec::new();

    elements.extend(titled_page("Remote Session Log"));
    elements.push(Element::Table(remote_sessions()));

    elements.extend(titled_page("On-Site Session Log"));
    elements.push(Element::Table(onsite_sessions()));

    elements.extend(titled_page("Other Activities Log"));
    elements.push(Element::Table(other_activities()));

    elements.extend(titled_page("Summary"));
    elements.push(Element::Paragraph(Paragraph::new(
        "Hours by category",
        ParagraphStyle::BODY,
    )));
    elements.push(Element::Spacer(6.0));
    elements.push(Element::Table(hours_by_category()));
    elements.push(Element::Spacer(24.0));
    elements.push(Element::Paragraph(Paragraph::new(
        "Reconciliation",
        ParagraphStyle::BODY,
    )));
    elements.push(Element::Spacer(6.0));
    elements.push(Element::Table(reconciliation()));

    elements
}

fn remote_sessions() -> Table {
    Table::new(&["Date", "Client", "Platform", "Hours"])
        .column_weights(&[1.0, 2.0, 1.5, 0.8])
        .row(&["2024-01-08", "Client A", "Video call", "1.5"])
        .row(&["2024-01-15", "Client B", "Video call", "2.0"])
        .row(&["2024-01-22", "Client A", "Phone", "1.0"])
        .row(&["2024-02-05", "Client C", "Video call", "1.5"])
        .row(&["2024-02-12", "Client B", "Screen share", "2.0"])
        .row(&["2024-02-19", "Client D", "Phone", "1.0"])
        .total("Total remote hours", "9.0")
}

fn onsite_sessions() -> Table {
    Table::new(&["Date", "Location", "Activity", "Hours"])
        .column_weights(&[1.0, 2.0, 1.5, 0.8])
        .row(&["2024-01-10", "Studio", "Portrait session", "3.0"])
        .row(&["2024-01-24", "Client A premises", "Product shoot", "2.5"])
        .row(&["2024-02-07", "Studio", "Portrait session", "2.0"])
        .row(&["2024-02-21", "Outdoor location", "Landscape session", "3.5"])
        .row(&["2024-03-06", "Studio", "Review", "1.0"])
        .total("Total on-site hours", "12.0")
}

fn other_activities() -> Table {
    Table::new(&["Date", "Activity", "Notes", "Hours"])
        .column_weights(&[1.0, 1.5, 2.0, 0.8])
        .row(&["2024-01-12", "Editing", "Colour grading", "2.0"])
        .row(&["2024-01-30", "Planning", "Shot lists", "1.0"])
        .row(&["2024-02-14", "Printing", "Proof prints", "1.5"])
        .row(&["2024-03-01", "Training", "Lighting workshop", "2.0"])
        .total("Total other hours", "6.5")
}

fn hours_by_category() -> Table {
    Table::new(&["Category", "Hours"])
        .column_weights(&[3.0, 1.0])
        .row(&["Remote sessions", "9.0"])
        .row(&["On-site sessions", "12.0"])
        .row(&["Other activities", "6.5"])
        .total("Total", "27.5")
        .keep_together()
}

fn reconciliation() -> Table {
    Table::new(&["Item", "Hours"])
        .column_weights(&[3.0, 1.0])
        .row(&["Required hours", "25.0"])
        .row(&["Logged hours", "27.5"])
        .total("Balance", "+2.5")
        .keep_together()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PageTemplate;
    use crate::pdf::paginate::Paginator;
    use std::path::Path;

    fn options() -> AssemblerOptions {
        AssemblerOptions::new("logo-left.png", "logo-right.png")
    }

    fn layout(photos: &[PathBuf]) -> Vec<crate::pdf::paginate::PageSnapshot> {
        let story = build_story(photos, &options());
        Paginator::new(&PageTemplate::portfolio(), |_: &Path| -> crate::error::Result<(u32, u32)> {
            Ok((3000, 2000))
        })
            .layout(&story)
            .unwrap()
    }

    #[test]
    fn test_summary_only_story() {
        let pages = layout(&[]);
        assert_eq!(pages.len(), SUMMARY_PAGE_COUNT);
        assert_eq!(pages[0].texts().next(), Some("Remote Session Log"));
        assert_eq!(pages[3].texts().next(), Some("Summary"));
    }

    #[test]
    fn test_one_page_per_photo() {
        let photos: Vec<PathBuf> = ["a.jpg", "b.jpg", "c.jpg"].iter().map(PathBuf::from).collect();
        let pages = layout(&photos);
        assert_eq!(pages.len(), photos.len() + SUMMARY_PAGE_COUNT);

        for (page, photo) in pages.iter().zip(&photos) {
            assert_eq!(page.images().collect::<Vec<_>>(), vec![photo.as_path()]);
        }
    }

    #[test]
    fn test_section_header_only_on_first_photo_page() {
        let photos: Vec<PathBuf> = ["a.jpg", "b.jpg"].iter().map(PathBuf::from).collect();
        let header = options().section_header;
        let pages = layout(&photos);

        assert!(pages[0].texts().any(|t| t == header));
        assert!(!pages[1].texts().any(|t| t == header));
    }

    #[test]
    fn test_caption_on_every_photo_page() {
        let photos: Vec<PathBuf> = ["a.jpg", "a.jpg"].iter().map(PathBuf::from).collect();
        let first_line = options().caption.lines().next().unwrap().to_string();
        let pages = layout(&photos);

        assert!(pages[0].texts().any(|t| t == first_line));
        assert!(pages[1].texts().any(|t| t == first_line));
    }

    #[test]
    fn test_session_date_in_header() {
        let mut opts = options();
        opts.session_date = chrono::NaiveDate::from_ymd_opt(2024, 11, 20);
        let story = build_story(&[PathBuf::from("a.jpg")], &opts);

        let found = story.iter().any(|element| match element {
            Element::Paragraph(p) => p.text == "Session date: November 20, 2024",
            _ => false,
        });
        assert!(found);
    }

    #[test]
    fn test_tables_have_total_rows() {
        let tables: Vec<Table> = summary_pages()
            .into_iter()
            .filter_map(|element| match element {
                Element::Table(table) => Some(table),
                _ => None,
            })
            .collect();
        assert_eq!(tables.len(), 5);
        assert!(tables.iter().all(|t| t.total.is_some()));
        assert!(tables[..3].iter().all(|t| t.splittable));
        assert!(tables[3..].iter().all(|t| !t.splittable));
    }
}
