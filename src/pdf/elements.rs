//! Flowable elements that make up a document before pagination

use std::path::PathBuf;

use crate::pdf::fonts::FontFace;

/// RGB colour with components in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const GRAY: Color = Color::rgb(0.4, 0.4, 0.4);
    pub const LIGHT_GRAY: Color = Color::rgb(0.85, 0.85, 0.85);
    /// Table header background
    pub const STEEL_BLUE: Color = Color::rgb(0.23, 0.36, 0.55);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// Horizontal alignment of text inside its box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Font, size and spacing of a paragraph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParagraphStyle {
    pub face: FontFace,
    pub font_size: f32,
    /// Baseline-to-baseline distance
    pub leading: f32,
    pub color: Color,
    pub align: Align,
}

impl ParagraphStyle {
    pub const TITLE: ParagraphStyle = ParagraphStyle {
        face: FontFace::Bold,
        font_size: 18.0,
        leading: 24.0,
        color: Color::BLACK,
        align: Align::Left,
    };

    pub const HEADING: ParagraphStyle = ParagraphStyle {
        face: FontFace::Bold,
        font_size: 14.0,
        leading: 18.0,
        color: Color::BLACK,
        align: Align::Left,
    };

    pub const BODY: ParagraphStyle = ParagraphStyle {
        face: FontFace::Regular,
        font_size: 10.0,
        leading: 14.0,
        color: Color::BLACK,
        align: Align::Left,
    };

    pub const CAPTION: ParagraphStyle = ParagraphStyle {
        face: FontFace::Regular,
        font_size: 9.0,
        leading: 12.0,
        color: Color::GRAY,
        align: Align::Center,
    };
}

/// A block of wrapped text
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub text: String,
    pub style: ParagraphStyle,
}

impl Paragraph {
    pub fn new(text: impl Into<String>, style: ParagraphStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// An image scaled to fit a box whose size is a fraction of the content frame
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBlock {
    pub path: PathBuf,
    /// Fraction of the frame width available to the image
    pub width_fraction: f32,
    /// Fraction of the frame height available to the image
    pub height_fraction: f32,
}

/// Visual treatment of a table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableStyle {
    pub font_size: f32,
    pub padding: f32,
    pub header_background: Color,
    pub header_text: Color,
    pub total_background: Color,
    pub grid: Color,
    pub grid_width: f32,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            font_size: 9.0,
            padding: 4.0,
            header_background: Color::STEEL_BLUE,
            header_text: Color::WHITE,
            total_background: Color::LIGHT_GRAY,
            grid: Color::GRAY,
            grid_width: 0.5,
        }
    }
}

/// Closing row of a table: a label cell merged across all but the last
/// column, and the value in the last column
#[derive(Debug, Clone, PartialEq)]
pub struct TotalRow {
    pub label: String,
    pub value: String,
}

/// A styled table with a header row, body rows and an optional total row
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Relative column widths; normalised against the frame width
    pub column_weights: Vec<f32>,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total: Option<TotalRow>,
    /// Splittable tables continue on the next page (header repeated);
    /// others move to the next page whole
    pub splittable: bool,
    pub style: TableStyle,
}

impl Table {
    pub fn new<S: AsRef<str>>(header: &[S]) -> Self {
        Self {
            column_weights: vec![1.0; header.len()],
            header: header.iter().map(|h| h.as_ref().to_string()).collect(),
            rows: Vec::new(),
            total: None,
            splittable: true,
            style: TableStyle::default(),
        }
    }

    pub fn column_weights(mut self, weights: &[f32]) -> Self {
        self.column_weights = weights.to_vec();
        self
    }

    pub fn row<S: AsRef<str>>(mut self, cells: &[S]) -> Self {
        self.rows.push(cells.iter().map(|c| c.as_ref().to_string()).collect());
        self
    }

    pub fn total(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.total = Some(TotalRow {
            label: label.into(),
            value: value.into(),
        });
        self
    }

    pub fn keep_together(mut self) -> Self {
        self.splittable = false;
        self
    }

    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Absolute column widths for a table spanning `total_width`
    pub fn column_widths(&self, total_width: f32) -> Vec<f32> {
        let count = self.column_count();
        let weights: Vec<f32> = (0..count)
            .map(|i| self.column_weights.get(i).copied().unwrap_or(1.0).max(0.0))
            .collect();
        let sum: f32 = weights.iter().sum();
        if sum <= 0.0 {
            return vec![total_width / count.max(1) as f32; count];
        }
        weights.iter().map(|w| total_width * w / sum).collect()
    }
}

/// One item of the element stream consumed by the paginator
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Image(ImageBlock),
    /// Vertical gap in points
    Spacer(f32),
    Paragraph(Paragraph),
    Table(Table),
    /// Forced page break; a no-op when the current page is still empty
    PageBreak,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_widths_normalised() {
        let table = Table::new(&["Date", "Notes", "Hours"]).column_weights(&[1.0, 2.0, 1.0]);
        let widths = table.column_widths(400.0);
        assert_eq!(widths.len(), 3);
        assert!((widths[0] - 100.0).abs() < 0.01);
        assert!((widths[1] - 200.0).abs() < 0.01);
        assert!((widths[2] - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_missing_weights_default_to_one() {
        let table = Table::new(&["A", "B"]).column_weights(&[3.0]);
        let widths = table.column_widths(400.0);
        assert!((widths[0] - 300.0).abs() < 0.01);
        assert!((widths[1] - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_builder() {
        let table = Table::new(&["Item", "Hours"])
            .row(&["Remote", "9.0"])
            .total("Total", "9.0")
            .keep_together();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.rows.len(), 1);
        assert!(!table.splittable);
        assert_eq!(table.total.as_ref().map(|t| t.value.as_str()), Some("9.0"));
    }
}
