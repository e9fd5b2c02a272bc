//! Running footer overlay
//!
//! Drawn on every page after the first once the total page count is known:
//! a rule under the logo band, the two logos in the top corners, a rule over
//! the footer band and "Page {n} of {total}" right-aligned near the bottom.

use crate::layout::{fit_within, PageTemplate, Rect};
use crate::pdf::elements::Color;
use crate::pdf::fonts::{text_width, FontFace};
use crate::pdf::paginate::DrawOp;

/// Resource names the renderer registers the two logos under
pub const LEFT_LOGO: &str = "LogoL";
pub const RIGHT_LOGO: &str = "LogoR";

/// Footer text for a page
pub fn page_label(page_number: usize, total_pages: usize) -> String {
    format!("Page {} of {}", page_number, total_pages)
}

/// Geometry and styling of the overlay
#[derive(Debug, Clone)]
pub struct FooterOverlay {
    template: PageTemplate,
    /// Pixel sizes of the left and right logos
    logo_sizes: [(u32, u32); 2],
    pub font_size: f32,
    pub rule_color: Color,
    pub rule_width: f32,
    /// Largest box a logo is scaled into
    pub logo_box: (f32, f32),
    /// Distance of the logos from the page edges
    pub inset: f32,
}

/// Placement of one logo on the page
#[derive(Debug, Clone, PartialEq)]
pub struct LogoPlacement {
    pub resource: &'static str,
    pub rect: Rect,
}

impl FooterOverlay {
    pub fn new(template: PageTemplate, left_logo: (u32, u32), right_logo: (u32, u32)) -> Self {
        Self {
            template,
            logo_sizes: [left_logo, right_logo],
            font_size: 9.0,
            rule_color: Color::GRAY,
            rule_width: 0.75,
            logo_box: (120.0, 45.0),
            inset: 27.0,
        }
    }

    /// Whether page `page_number` (1-based) carries the overlay
    pub fn applies_to(&self, page_number: usize) -> bool {
        page_number > 1
    }

    /// Logo positions, anchored to the top-left and top-right corners
    pub fn logo_placements(&self) -> [LogoPlacement; 2] {
        let page_width = self.template.page.width.pt();
        let page_height = self.template.page.height.pt();
        let (box_width, box_height) = self.logo_box;

        let place = |(px_w, px_h): (u32, u32), left: bool| {
            let (width, height) = fit_within(px_w as f32, px_h as f32, box_width, box_height);
            let x = if left {
                self.inset
            } else {
                page_width - self.inset - width
            };
            Rect::new(x, page_height - self.inset - height, width, height)
        };

        [
            LogoPlacement {
                resource: LEFT_LOGO,
                rect: place(self.logo_sizes[0], true),
            },
            LogoPlacement {
                resource: RIGHT_LOGO,
                rect: place(self.logo_sizes[1], false),
            },
        ]
    }

    /// Drawing primitives for the overlay on one page
    ///
    /// Logos are not part of the returned ops since they are shared XObjects;
    /// see [`FooterOverlay::logo_placements`].
    pub fn draw(&self, page_number: usize, total_pages: usize) -> Vec<DrawOp> {
        let frame = self.template.frame();
        let left = frame.x;
        let right = frame.right();

        // Rules sit halfway between the frame and the logo/footer bands
        let top_rule = frame.top() + (self.template.page.height.pt() - self.inset - self.logo_box.1 - frame.top()) / 2.0;
        let bottom_rule = frame.y / 2.0 + self.font_size;

        let label = page_label(page_number, total_pages);
        let label_width = text_width(&label, FontFace::Regular, self.font_size);

        vec![
            DrawOp::Line {
                from: (left, top_rule),
                to: (right, top_rule),
                color: self.rule_color,
                line_width: self.rule_width,
            },
            DrawOp::Line {
                from: (left, bottom_rule),
                to: (right, bottom_rule),
                color: self.rule_color,
                line_width: self.rule_width,
            },
            DrawOp::Text {
                face: FontFace::Regular,
                size: self.font_size,
                color: Color::BLACK,
                x: right - label_width,
                y: bottom_rule - self.font_size * 1.5,
                text: label,
            },
        ]
    }
}
