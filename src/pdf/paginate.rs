//! First render pass: lay the element stream out into pages
//!
//! The paginator walks the elements top to bottom inside the content frame
//! and records every drawing primitive it places. The result is one immutable
//! [`PageSnapshot`] per physical page. Nothing is written here; the page count
//! is only final once the last element has been placed, which is why the
//! footer is applied by the second pass in `render`.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::layout::{fit_within, PageTemplate, Rect};
use crate::pdf::elements::{Align, Color, Element, ImageBlock, Paragraph, Table, TableStyle};
use crate::pdf::fonts::{sanitize, text_width, wrap_text, FontFace};
use crate::pdf::images;

/// A drawing primitive in page coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Single line of text; `x`/`y` is the start of the baseline
    Text {
        face: FontFace,
        size: f32,
        color: Color,
        x: f32,
        y: f32,
        text: String,
    },
    /// Image file drawn into `rect`
    Image { source: PathBuf, rect: Rect },
    FillRect { rect: Rect, color: Color },
    StrokeRect { rect: Rect, color: Color, line_width: f32 },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        color: Color,
        line_width: f32,
    },
}

/// Everything laid out on one physical page
#[derive(Debug, Clone, PartialEq)]
pub struct PageSnapshot {
    number: usize,
    ops: Vec<DrawOp>,
}

impl PageSnapshot {
    /// 1-based page number
    pub fn number(&self) -> usize {
        self.number
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Text lines on the page, in drawing order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Image files drawn on the page
    pub fn images(&self) -> impl Iterator<Item = &Path> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Image { source, .. } => Some(source.as_path()),
            _ => None,
        })
    }
}

/// Lay out `elements` on the given page template, probing image files on disk
pub fn paginate(elements: &[Element], template: &PageTemplate) -> Result<Vec<PageSnapshot>> {
    Paginator::new(template, images::probe_dimensions).layout(elements)
}

/// Flows elements into the content frame, page by page
pub struct Paginator<P> {
    frame: Rect,
    probe: P,
    pages: Vec<PageSnapshot>,
    ops: Vec<DrawOp>,
    /// Top of the space still free on the current page
    cursor: f32,
    has_content: bool,
}

impl<P> Paginator<P>
where
    P: FnMut(&Path) -> Result<(u32, u32)>,
{
    /// `probe` reports the pixel size of an image file
    pub fn new(template: &PageTemplate, probe: P) -> Self {
        let frame = template.frame();
        Self {
            frame,
            probe,
            pages: Vec::new(),
            ops: Vec::new(),
            cursor: frame.top(),
            has_content: false,
        }
    }

    pub fn layout(mut self, elements: &[Element]) -> Result<Vec<PageSnapshot>> {
        for element in elements {
            match element {
                Element::Image(block) => self.place_image(block)?,
                Element::Spacer(height) => self.place_spacer(*height),
                Element::Paragraph(paragraph) => self.place_paragraph(paragraph),
                Element::Table(table) => self.place_table(table),
                Element::PageBreak => {
                    if self.has_content {
                        self.finish_page();
                    }
                }
            }
        }

        if self.has_content || self.pages.is_empty() {
            self.finish_page();
        }

        log::debug!("Laid out {} pages", self.pages.len());
        Ok(self.pages)
    }

    fn remaining(&self) -> f32 {
        self.cursor - self.frame.y
    }

    fn finish_page(&mut self) {
        let number = self.pages.len() + 1;
        self.pages.push(PageSnapshot {
            number,
            ops: std::mem::take(&mut self.ops),
        });
        self.cursor = self.frame.top();
        self.has_content = false;
    }

    /// Start a new page unless `height` fits or the page is still empty
    fn ensure_room(&mut self, height: f32) {
        if height > self.remaining() && self.has_content {
            self.finish_page();
        }
    }

    fn place_spacer(&mut self, height: f32) {
        // Spacers collapse at the top of a page
        if !self.has_content {
            return;
        }
        if height > self.remaining() {
            self.finish_page();
        } else {
            self.cursor -= height;
        }
    }

    fn place_image(&mut self, block: &ImageBlock) -> Result<()> {
        let (px_width, px_height) = (self.probe)(&block.path)?;

        let box_width = self.frame.width * block.width_fraction.clamp(0.0, 1.0);
        let box_height = self.frame.height * block.height_fraction.clamp(0.0, 1.0);
        let (width, height) = fit_within(px_width as f32, px_height as f32, box_width, box_height);

        self.ensure_room(height);

        let bounds = Rect::new(self.frame.x, self.frame.y, self.frame.width, self.remaining());
        let rect = bounds.fit_top_centered(width, height);

        self.ops.push(DrawOp::Image {
            source: block.path.clone(),
            rect,
        });
        self.cursor -= rect.height;
        self.has_content = true;
        Ok(())
    }

    fn place_paragraph(&mut self, paragraph: &Paragraph) {
        let style = paragraph.style;
        let text = sanitize(&paragraph.text);

        for line in wrap_text(&text, style.face, style.font_size, self.frame.width) {
            self.ensure_room(style.leading);

            if !line.is_empty() {
                let width = text_width(&line, style.face, style.font_size);
                self.ops.push(DrawOp::Text {
                    face: style.face,
                    size: style.font_size,
                    color: style.color,
                    x: align_x(style.align, self.frame.x, self.frame.width, width),
                    y: self.cursor - style.font_size,
                    text: line,
                });
            }
            self.cursor -= style.leading;
            self.has_content = true;
        }
    }

    fn place_table(&mut self, table: &Table) {
        if table.column_count() == 0 {
            return;
        }

        let layout = TableLayout::new(table, self.frame.x, self.frame.width);
        let header = &layout.rows[0];
        let body = &layout.rows[1..];

        if table.splittable {
            let first = body.first().map(|row| row.height).unwrap_or(0.0);
            self.ensure_room(header.height + first);
        } else {
            self.ensure_room(layout.height());
        }

        self.draw_row(header, &layout);
        for row in body {
            if row.height > self.remaining() {
                self.finish_page();
                self.draw_row(header, &layout);
            }
            self.draw_row(row, &layout);
        }
    }

    fn draw_row(&mut self, row: &RowLayout, layout: &TableLayout) {
        let style = &layout.style;
        let top = self.cursor;

        for cell in &row.cells {
            let rect = Rect::new(cell.x, top - row.height, cell.width, row.height);

            if let Some(background) = cell.background {
                self.ops.push(DrawOp::FillRect {
                    rect,
                    color: background,
                });
            }
            self.ops.push(DrawOp::StrokeRect {
                rect,
                color: style.grid,
                line_width: style.grid_width,
            });

            let inner_x = cell.x + style.padding;
            let inner_width = cell.width - 2.0 * style.padding;
            for (i, line) in cell.lines.iter().enumerate() {
                if line.is_empty() {
                    continue;
                }
                let width = text_width(line, cell.face, style.font_size);
                self.ops.push(DrawOp::Text {
                    face: cell.face,
                    size: style.font_size,
                    color: cell.text_color,
                    x: align_x(cell.align, inner_x, inner_width, width),
                    y: top - style.padding - style.font_size - i as f32 * layout.leading,
                    text: line.clone(),
                });
            }
        }

        self.cursor -= row.height;
        self.has_content = true;
    }
}

fn align_x(align: Align, x: f32, available: f32, width: f32) -> f32 {
    match align {
        Align::Left => x,
        Align::Center => x + (available - width) / 2.0,
        Align::Right => x + available - width,
    }
}

struct CellLayout {
    x: f32,
    width: f32,
    lines: Vec<String>,
    face: FontFace,
    align: Align,
    text_color: Color,
    background: Option<Color>,
}

struct RowLayout {
    height: f32,
    cells: Vec<CellLayout>,
}

/// Table rows measured against the frame: header first, then body rows, then the total row
struct TableLayout {
    rows: Vec<RowLayout>,
    leading: f32,
    style: TableStyle,
}

impl TableLayout {
    fn new(table: &Table, x: f32, width: f32) -> Self {
        let style = table.style;
        let leading = style.font_size * 1.2;
        let widths = table.column_widths(width);
        let offsets: Vec<f32> = widths
            .iter()
            .scan(x, |acc, w| {
                let start = *acc;
                *acc += w;
                Some(start)
            })
            .collect();
        let last = widths.len() - 1;

        let measure = |cells: Vec<CellLayout>| -> RowLayout {
            let lines = cells.iter().map(|c| c.lines.len()).max().unwrap_or(1).max(1);
            RowLayout {
                height: lines as f32 * leading + 2.0 * style.padding,
                cells,
            }
        };
        let cell = |x: f32, w: f32, text: &str, face: FontFace, align: Align, text_color: Color, background: Option<Color>| {
            CellLayout {
                x,
                width: w,
                lines: wrap_text(&sanitize(text), face, style.font_size, w - 2.0 * style.padding),
                face,
                align,
                text_color,
                background,
            }
        };

        let mut rows = Vec::with_capacity(table.rows.len() + 2);

        rows.push(measure(
            table
                .header
                .iter()
                .enumerate()
                .map(|(i, text)| {
                    cell(
                        offsets[i],
                        widths[i],
                        text,
                        FontFace::Bold,
                        Align::Center,
                        style.header_text,
                        Some(style.header_background),
                    )
                })
                .collect(),
        ));

        for data in &table.rows {
            rows.push(measure(
                (0..=last)
                    .map(|i| {
                        let text = data.get(i).map(String::as_str).unwrap_or("");
                        let align = if i == last && last > 0 { Align::Right } else { Align::Left };
                        cell(offsets[i], widths[i], text, FontFace::Regular, align, Color::BLACK, None)
                    })
                    .collect(),
            ));
        }

        if let Some(total) = &table.total {
            let mut cells = Vec::with_capacity(2);
            if last > 0 {
                let merged_width: f32 = widths[..last].iter().sum();
                cells.push(cell(
                    x,
                    merged_width,
                    &total.label,
                    FontFace::Bold,
                    Align::Right,
                    Color::BLACK,
                    Some(style.total_background),
                ));
            }
            cells.push(cell(
                offsets[last],
                widths[last],
                &total.value,
                FontFace::Bold,
                Align::Right,
                Color::BLACK,
                Some(style.total_background),
            ));
            rows.push(measure(cells));
        }

        Self { rows, leading, style }
    }

    fn height(&self) -> f32 {
        self.rows.iter().map(|row| row.height).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::elements::ParagraphStyle;

    fn fixed_probe(_: &Path) -> Result<(u32, u32)> {
        Ok((4000, 3000))
    }

    fn run(elements: &[Element]) -> Vec<PageSnapshot> {
        Paginator::new(&PageTemplate::portfolio(), fixed_probe)
            .layout(elements)
            .unwrap()
    }

    fn photo(name: &str) -> Element {
        Element::Image(ImageBlock {
            path: PathBuf::from(name),
            width_fraction: 1.0,
            height_fraction: 0.6,
        })
    }

    #[test]
    fn test_empty_stream_yields_one_blank_page() {
        let pages = run(&[]);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].ops().is_empty());
    }

    #[test]
    fn test_page_break_on_empty_page_is_noop() {
        let pages = run(&[
            Element::PageBreak,
            Element::Paragraph(Paragraph::new("first", ParagraphStyle::BODY)),
            Element::PageBreak,
            Element::PageBreak,
            Element::Paragraph(Paragraph::new("second", ParagraphStyle::BODY)),
            Element::PageBreak,
        ]);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].texts().collect::<Vec<_>>(), vec!["first"]);
        assert_eq!(pages[1].texts().collect::<Vec<_>>(), vec!["second"]);
        assert_eq!(pages[1].number(), 2);
    }

    #[test]
    fn test_image_fits_box_and_keeps_aspect() {
        let pages = run(&[photo("a.jpg")]);
        let frame = PageTemplate::portfolio().frame();

        match &pages[0].ops()[0] {
            DrawOp::Image { source, rect } => {
                assert_eq!(source, &PathBuf::from("a.jpg"));
                assert!(rect.width <= frame.width + 0.01);
                assert!(rect.height <= frame.height * 0.6 + 0.01);
                assert!((rect.width / rect.height - 4.0 / 3.0).abs() < 0.01);
                assert!((rect.top() - frame.top()).abs() < 0.01);
            }
            other => panic!("Expected image, got {:?}", other),
        }
    }

    #[test]
    fn test_two_large_images_need_two_pages() {
        let pages = run(&[photo("a.jpg"), photo("b.jpg")]);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].images().collect::<Vec<_>>(), vec![Path::new("b.jpg")]);
    }

    #[test]
    fn test_probe_error_propagates() {
        let result = Paginator::new(&PageTemplate::portfolio(), |path: &Path| -> Result<(u32, u32)> {
            Err(crate::error::Error::FileNotFound(path.to_path_buf()))
        })
        .layout(&[photo("missing.jpg")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_paragraph_flows_onto_next_page() {
        let text = vec!["line"; 60].join("\n");
        let pages = run(&[Element::Paragraph(Paragraph::new(text, ParagraphStyle::BODY))]);
        // 630pt frame / 14pt leading = 45 lines on the first page
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].texts().count(), 45);
        assert_eq!(pages[1].texts().count(), 15);
    }

    #[test]
    fn test_table_header_repeats_when_split() {
        let mut table = Table::new(&["Date", "Notes", "Hours"]);
        for i in 0..80 {
            table = table.row(&[format!("2024-01-{:02}", i % 28 + 1), "Row".to_string(), "1.0".to_string()]);
        }
        let table = table.total("Total hours", "80.0");

        let pages = run(&[Element::Table(table)]);
        assert!(pages.len() >= 2);
        for page in &pages {
            let texts: Vec<&str> = page.texts().collect();
            assert_eq!(texts[..3], ["Date", "Notes", "Hours"]);
        }
        let last: Vec<&str> = pages.last().unwrap().texts().collect();
        assert!(last.contains(&"Total hours"));
        assert!(last.contains(&"80.0"));
    }

    #[test]
    fn test_unsplittable_table_moves_whole() {
        let filler = vec!["line"; 40].join("\n");
        let mut table = Table::new(&["Item", "Hours"]).keep_together();
        for _ in 0..10 {
            table = table.row(&["Remote", "1.0"]);
        }

        let pages = run(&[
            Element::Paragraph(Paragraph::new(filler, ParagraphStyle::BODY)),
            Element::Table(table),
        ]);
        assert_eq!(pages.len(), 2);
        assert!(!pages[0].texts().any(|t| t == "Item"));
        assert_eq!(pages[1].texts().filter(|t| *t == "Remote").count(), 10);
    }

    #[test]
    fn test_total_row_merges_all_but_last_column() {
        let table = Table::new(&["Date", "Client", "Hours"])
            .row(&["2024-01-08", "Client A", "1.5"])
            .total("Total", "1.5");
        let frame = PageTemplate::portfolio().frame();
        let pages = run(&[Element::Table(table)]);

        let fills: Vec<Rect> = pages[0]
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillRect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect();
        // Three header cells, then the merged label cell and the value cell
        assert_eq!(fills.len(), 5);
        let merged = fills[3];
        assert!((merged.x - frame.x).abs() < 0.01);
        assert!((merged.width - frame.width * 2.0 / 3.0).abs() < 0.01);
        assert!((fills[4].right() - frame.right()).abs() < 0.01);
    }

    #[test]
    fn test_spacer_collapses_at_page_top() {
        let pages = run(&[
            Element::Spacer(100.0),
            Element::Paragraph(Paragraph::new("top", ParagraphStyle::BODY)),
        ]);
        let frame = PageTemplate::portfolio().frame();
        match &pages[0].ops()[0] {
            DrawOp::Text { y, .. } => assert!((*y - (frame.top() - 10.0)).abs() < 0.01),
            other => panic!("Expected text, got {:?}", other),
        }
    }
}
