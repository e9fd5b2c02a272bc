//! Second render pass: turn page snapshots into a PDF file
//!
//! Each snapshot is replayed into its own content stream. Pages after the
//! first then get the footer overlay, which can only be drawn now that the
//! total page count is fixed. Fonts and logos are shared objects; each distinct
//! photo file is embedded once no matter how many pages show it.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use crate::error::Result;
use crate::layout::{PageTemplate, Rect};
use crate::pdf::elements::Color;
use crate::pdf::fonts::{escape_pdf_string, FontFace};
use crate::pdf::footer::FooterOverlay;
use crate::pdf::images::{RasterImage, MAX_PHOTO_EDGE};
use crate::pdf::paginate::{DrawOp, PageSnapshot};

/// Values for the PDF Info dictionary
#[derive(Debug, Clone, Default)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
}

/// Write `snapshots` to `output` and return the number of pages written
pub fn render_document(
    snapshots: &[PageSnapshot],
    template: &PageTemplate,
    overlay: &FooterOverlay,
    logos: [&RasterImage; 2],
    info: &DocumentInfo,
    output: &Path,
) -> Result<usize> {
    let mut renderer = Renderer::new(template, logos);
    let total = snapshots.len();

    for snapshot in snapshots {
        renderer.add_page(snapshot, overlay, total)?;
    }

    renderer.finish(info, output)
}

struct Renderer {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    media_box: Vec<Object>,
    fonts: Dictionary,
    logo_ids: [ObjectId; 2],
    photos: HashMap<PathBuf, (String, ObjectId)>,
}

impl Renderer {
    fn new(template: &PageTemplate, logos: [&RasterImage; 2]) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for face in [FontFace::Regular, FontFace::Bold] {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => face.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(face.resource_name(), Object::Reference(font_id));
        }

        let logo_ids = [logos[0].embed(&mut doc), logos[1].embed(&mut doc)];

        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
            media_box: vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(template.page.width.pt()),
                Object::Real(template.page.height.pt()),
            ],
            fonts,
            logo_ids,
            photos: HashMap::new(),
        }
    }

    fn add_page(&mut self, snapshot: &PageSnapshot, overlay: &FooterOverlay, total: usize) -> Result<()> {
        let mut content = String::new();
        let mut xobjects = Dictionary::new();

        // Replay the laid-out content
        for op in snapshot.ops() {
            self.draw(&mut content, &mut xobjects, op)?;
        }

        // Then commit the overlay on top of it
        if overlay.applies_to(snapshot.number()) {
            for (placement, logo_id) in overlay.logo_placements().iter().zip(self.logo_ids) {
                xobjects.set(placement.resource, Object::Reference(logo_id));
                push_image(&mut content, placement.resource, &placement.rect);
            }
            for op in overlay.draw(snapshot.number(), total) {
                self.draw(&mut content, &mut xobjects, &op)?;
            }
        }

        let content_id = self.doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(self.fonts.clone()));
        if !xobjects.is_empty() {
            resources.set("XObject", Object::Dictionary(xobjects));
        }

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => self.media_box.clone(),
            "Contents" => content_id,
            "Resources" => resources,
        });
        self.page_ids.push(page_id);

        Ok(())
    }

    /// Append the content stream operators for one primitive
    fn draw(&mut self, content: &mut String, xobjects: &mut Dictionary, op: &DrawOp) -> Result<()> {
        match op {
            DrawOp::Text {
                face,
                size,
                color,
                x,
                y,
                text,
            } => push_text(content, *face, *size, color, (*x, *y), text),
            DrawOp::Image { source, rect } => {
                let name = self.photo_xobject(source, xobjects)?;
                push_image(content, &name, rect);
            }
            DrawOp::FillRect { rect, color } => push_fill(content, rect, color),
            DrawOp::StrokeRect {
                rect,
                color,
                line_width,
            } => push_stroke(content, rect, color, *line_width),
            DrawOp::Line {
                from,
                to,
                color,
                line_width,
            } => push_line(content, *from, *to, color, *line_width),
        }
        Ok(())
    }

    /// Resource name of the XObject for `source`, embedding it on first use
    fn photo_xobject(&mut self, source: &Path, xobjects: &mut Dictionary) -> Result<String> {
        if !self.photos.contains_key(source) {
            let raster = RasterImage::load(source, MAX_PHOTO_EDGE)?;
            let id = raster.embed(&mut self.doc);
            let name = format!("Im{}", self.photos.len() + 1);
            self.photos.insert(source.to_path_buf(), (name, id));
        }

        let (name, id) = &self.photos[source];
        xobjects.set(name.as_str(), Object::Reference(*id));
        Ok(name.clone())
    }

    fn finish(mut self, info: &DocumentInfo, output: &Path) -> Result<usize> {
        let count = self.page_ids.len();

        let kids: Vec<Object> = self.page_ids.iter().map(|&id| Object::Reference(id)).collect();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count as i64,
        };
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut info_dict = Dictionary::new();
        if let Some(title) = &info.title {
            info_dict.set("Title", Object::string_literal(title.as_str()));
        }
        if let Some(author) = &info.author {
            info_dict.set("Author", Object::string_literal(author.as_str()));
        }
        info_dict.set(
            "Producer",
            Object::string_literal(concat!("photo-portfolio ", env!("CARGO_PKG_VERSION"))),
        );
        let info_id = self.doc.add_object(Object::Dictionary(info_dict));
        self.doc.trailer.set("Info", Object::Reference(info_id));

        self.doc.compress();

        // The handle lives only for this scope and is closed on every exit path
        let file = File::create(output)?;
        let mut writer = BufWriter::new(file);
        self.doc.save_to(&mut writer)?;
        writer.flush()?;

        log::info!("Wrote {} pages to {}", count, output.display());
        Ok(count)
    }
}

fn num(value: f32) -> String {
    format!("{:.2}", value)
}

fn color_operands(color: &Color) -> String {
    format!("{} {} {}", num(color.r), num(color.g), num(color.b))
}

fn rect_operands(rect: &Rect) -> String {
    format!("{} {} {} {}", num(rect.x), num(rect.y), num(rect.width), num(rect.height))
}

fn push_image(content: &mut String, name: &str, rect: &Rect) {
    let _ = writeln!(
        content,
        "q\n{} 0 0 {} {} {} cm\n/{} Do\nQ",
        num(rect.width),
        num(rect.height),
        num(rect.x),
        num(rect.y),
        name
    );
}

fn push_text(content: &mut String, face: FontFace, size: f32, color: &Color, at: (f32, f32), text: &str) {
    content.push_str("BT\n");
    let _ = writeln!(content, "/{} {} Tf", face.resource_name(), num(size));
    let _ = writeln!(content, "{} rg", color_operands(color));
    let _ = writeln!(content, "1 0 0 1 {} {} Tm", num(at.0), num(at.1));
    let _ = writeln!(content, "({}) Tj", escape_pdf_string(text));
    content.push_str("ET\n");
}

fn push_fill(content: &mut String, rect: &Rect, color: &Color) {
    let _ = writeln!(content, "q\n{} rg\n{} re\nf\nQ", color_operands(color), rect_operands(rect));
}

fn push_stroke(content: &mut String, rect: &Rect, color: &Color, line_width: f32) {
    let _ = writeln!(
        content,
        "q\n{} RG\n{} w\n{} re\nS\nQ",
        color_operands(color),
        num(line_width),
        rect_operands(rect)
    );
}

fn push_line(content: &mut String, from: (f32, f32), to: (f32, f32), color: &Color, line_width: f32) {
    let _ = writeln!(
        content,
        "q\n{} RG\n{} w\n{} {} m\n{} {} l\nS\nQ",
        color_operands(color),
        num(line_width),
        num(from.0),
        num(from.1),
        num(to.0),
        num(to.1)
    );
}
