//! Photo and logo loading, and PDF image XObjects

use std::path::Path;

use image::GenericImageView;
use lopdf::{dictionary, Document, ObjectId, Stream};

use crate::error::{Error, Result};

/// Longest edge, in pixels, of a photo once embedded
pub const MAX_PHOTO_EDGE: u32 = 2400;

/// Longest edge of an embedded logo
pub const MAX_LOGO_EDGE: u32 = 600;

/// Read the pixel size of an image without decoding it
pub fn probe_dimensions(path: &Path) -> Result<(u32, u32)> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    image::image_dimensions(path).map_err(|e| Error::image(path, e))
}

/// Decoded image ready to be embedded
#[derive(Debug, Clone)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    /// Interleaved 8-bit RGB samples
    pub rgb: Vec<u8>,
    /// 8-bit alpha samples, present only if the source has transparency
    pub alpha: Option<Vec<u8>>,
}

impl RasterImage {
    /// Decode `path`, shrinking it so neither edge exceeds `max_edge`
    pub fn load(path: &Path, max_edge: u32) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        let mut img = image::open(path).map_err(|e| Error::image(path, e))?;
        let (width, height) = img.dimensions();
        if width > max_edge || height > max_edge {
            log::debug!(
                "Downscaling {} from {}x{} to fit {}px",
                path.display(),
                width,
                height,
                max_edge
            );
            img = img.thumbnail(max_edge, max_edge);
        }

        Ok(Self::from_dynamic(&img))
    }

    fn from_dynamic(img: &image::DynamicImage) -> Self {
        let (width, height) = img.dimensions();

        if !img.color().has_alpha() {
            return Self {
                width,
                height,
                rgb: img.to_rgb8().into_raw(),
                alpha: None,
            };
        }

        let rgba = img.to_rgba8();
        let mut rgb = Vec::with_capacity((width * height * 3) as usize);
        let mut alpha = Vec::with_capacity((width * height) as usize);
        for pixel in rgba.pixels() {
            rgb.extend_from_slice(&pixel.0[..3]);
            alpha.push(pixel.0[3]);
        }

        Self {
            width,
            height,
            rgb,
            alpha: Some(alpha),
        }
    }

    /// Add this image to `doc` as an image XObject and return its id
    pub fn embed(&self, doc: &mut Document) -> ObjectId {
        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => self.width as i64,
            "Height" => self.height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        };

        if let Some(alpha) = &self.alpha {
            let smask = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => self.width as i64,
                    "Height" => self.height as i64,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8,
                },
                alpha.clone(),
            );
            let smask_id = doc.add_object(smask);
            dict.set("SMask", smask_id);
        }

        doc.add_object(Stream::new(dict, self.rgb.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use tempfile::TempDir;

    #[test]
    fn test_probe_dimensions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("photo.png");
        RgbImage::from_pixel(64, 48, Rgb([10, 20, 30])).save(&path).unwrap();

        assert_eq!(probe_dimensions(&path).unwrap(), (64, 48));
    }

    #[test]
    fn test_probe_missing_file() {
        let result = probe_dimensions(Path::new("no/such/photo.jpg"));
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }

    #[test]
    fn test_probe_not_an_image() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        assert!(matches!(probe_dimensions(&path), Err(Error::Image { .. })));
    }

    #[test]
    fn test_load_downscales() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wide.png");
        RgbImage::from_pixel(400, 100, Rgb([255, 0, 0])).save(&path).unwrap();

        let raster = RasterImage::load(&path, 200).unwrap();
        assert_eq!(raster.width, 200);
        assert_eq!(raster.height, 50);
        assert_eq!(raster.rgb.len(), 200 * 50 * 3);
        assert!(raster.alpha.is_none());
    }

    #[test]
    fn test_load_splits_alpha() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logo.png");
        RgbaImage::from_pixel(8, 4, Rgba([1, 2, 3, 128])).save(&path).unwrap();

        let raster = RasterImage::load(&path, MAX_LOGO_EDGE).unwrap();
        assert_eq!(&raster.rgb[..3], &[1, 2, 3]);
        let alpha = raster.alpha.unwrap();
        assert_eq!(alpha.len(), 32);
        assert!(alpha.iter().all(|a| *a == 128));
    }

    #[test]
    fn test_embed_with_smask() {
        let raster = RasterImage {
            width: 2,
            height: 1,
            rgb: vec![0; 6],
            alpha: Some(vec![255, 0]),
        };
        let mut doc = Document::with_version("1.5");
        let id = raster.embed(&mut doc);

        let stream = doc.get_object(id).unwrap().as_stream().unwrap();
        assert_eq!(stream.dict.get(b"Width").unwrap().as_i64().unwrap(), 2);
        assert!(stream.dict.get(b"SMask").is_ok());
    }
}
