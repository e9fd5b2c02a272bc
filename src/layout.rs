//! Page geometry
//!
//! All drawing coordinates are PDF points (1/72 inch) with the origin at the
//! bottom-left corner of the page.

/// Length stored in points
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Length(f32);

impl Length {
    /// Create a length from points
    pub fn from_pt(pt: f32) -> Self {
        Length(pt)
    }

    /// Create a length from inches
    pub fn from_inches(inches: f32) -> Self {
        Length(inches * 72.0)
    }

    /// Get the value in points (1/72 inch)
    pub fn pt(&self) -> f32 {
        self.0
    }
}

/// Page dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageDimensions {
    pub width: Length,
    pub height: Length,
}

impl PageDimensions {
    /// US Letter size (8.5" × 11")
    pub fn letter() -> Self {
        Self {
            width: Length::from_inches(8.5),
            height: Length::from_inches(11.0),
        }
    }
}

/// Margins for page content
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: Length,
    pub bottom: Length,
    pub left: Length,
    pub right: Length,
}

impl Margins {
    /// Portfolio margins: the top band holds the logos, the bottom band the page number
    pub fn portfolio() -> Self {
        Self {
            top: Length::from_inches(1.25),
            bottom: Length::from_inches(1.0),
            left: Length::from_inches(0.75),
            right: Length::from_inches(0.75),
        }
    }
}

/// Axis-aligned rectangle in points, anchored at its bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Largest rectangle with the given aspect ratio that fits inside `self`,
    /// centred horizontally and anchored to the top edge
    pub fn fit_top_centered(&self, source_width: f32, source_height: f32) -> Rect {
        let (width, height) = fit_within(source_width, source_height, self.width, self.height);
        Rect {
            x: self.x + (self.width - width) / 2.0,
            y: self.top() - height,
            width,
            height,
        }
    }
}

/// Scale `(width, height)` to fit inside `(max_width, max_height)` keeping the aspect ratio
pub fn fit_within(width: f32, height: f32, max_width: f32, max_height: f32) -> (f32, f32) {
    if width <= 0.0 || height <= 0.0 {
        return (max_width, max_height);
    }
    let scale = (max_width / width).min(max_height / height);
    (width * scale, height * scale)
}

/// Page size plus margins; yields the frame that body content flows into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageTemplate {
    pub page: PageDimensions,
    pub margins: Margins,
}

impl PageTemplate {
    /// US Letter with portfolio margins
    pub fn portfolio() -> Self {
        Self {
            page: PageDimensions::letter(),
            margins: Margins::portfolio(),
        }
    }

    /// Area available to flowing content
    pub fn frame(&self) -> Rect {
        let x = self.margins.left.pt();
        let y = self.margins.bottom.pt();
        Rect {
            x,
            y,
            width: self.page.width.pt() - x - self.margins.right.pt(),
            height: self.page.height.pt() - y - self.margins.top.pt(),
        }
    }
}

impl Default for PageTemplate {
    fn default() -> Self {
        Self::portfolio()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_conversions() {
        let len = Length::from_inches(1.0);
        assert!((len.pt() - 72.0).abs() < 0.01);
        assert!((Length::from_pt(18.0).pt() - 18.0).abs() < 0.01);
    }

    #[test]
    fn test_letter_size() {
        let letter = PageDimensions::letter();
        assert!((letter.width.pt() - 612.0).abs() < 0.01);
        assert!((letter.height.pt() - 792.0).abs() < 0.01);
    }

    #[test]
    fn test_portfolio_frame() {
        let frame = PageTemplate::portfolio().frame();
        assert!((frame.x - 54.0).abs() < 0.01);
        assert!((frame.y - 72.0).abs() < 0.01);
        assert!((frame.width - 504.0).abs() < 0.01);
        assert!((frame.height - 630.0).abs() < 0.01);
        assert!((frame.top() - 702.0).abs() < 0.01);
    }

    #[test]
    fn test_fit_within_keeps_aspect() {
        let (w, h) = fit_within(4000.0, 3000.0, 400.0, 400.0);
        assert!((w - 400.0).abs() < 0.01);
        assert!((h - 300.0).abs() < 0.01);

        let (w, h) = fit_within(1000.0, 2000.0, 400.0, 400.0);
        assert!((w - 200.0).abs() < 0.01);
        assert!((h - 400.0).abs() < 0.01);
    }

    #[test]
    fn test_fit_top_centered() {
        let bounds = Rect::new(0.0, 0.0, 400.0, 300.0);
        let placed = bounds.fit_top_centered(100.0, 100.0);
        assert!((placed.width - 300.0).abs() < 0.01);
        assert!((placed.x - 50.0).abs() < 0.01);
        assert!((placed.top() - 300.0).abs() < 0.01);
    }
}
