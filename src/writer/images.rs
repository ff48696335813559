//! Image XObject preparation for company logos.
//!
//! JPEG data is embedded as-is with DCTDecode; PDF viewers decode it
//! natively. PNG data is decoded to raw pixels and recompressed with Flate,
//! with the alpha channel split into a soft mask stream when present.

use crate::error::{Error, Result};
use crate::object::Object;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

/// Source encoding of the embedded image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// JPEG, embedded untouched with the DCTDecode filter
    Jpeg,
    /// PNG, re-encoded as Flate-compressed raw pixels
    Png,
}

/// Color space of the image samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceGray,
    DeviceRGB,
}

impl ColorSpace {
    /// Number of components per pixel.
    pub fn components(&self) -> u8 {
        match self {
            ColorSpace::DeviceGray => 1,
            ColorSpace::DeviceRGB => 3,
        }
    }

    /// PDF color space name.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRGB => "DeviceRGB",
        }
    }
}

/// A decoded image ready to be written as an Image XObject.
#[derive(Debug, Clone)]
pub struct ImageData {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Bits per color component (always 8 here)
    pub bits_per_component: u8,
    /// Color space of the samples
    pub color_space: ColorSpace,
    /// Source format, determines the stream filter
    pub format: ImageFormat,
    /// Stream data (original JPEG bytes or Flate-compressed pixels)
    pub data: Vec<u8>,
    /// Flate-compressed alpha channel, if the source had one
    pub soft_mask: Option<Vec<u8>>,
}

impl ImageData {
    /// Load a JPEG image, keeping the compressed data untouched.
    pub fn from_jpeg(data: Vec<u8>) -> Result<Self> {
        let (width, height, color_space) = jpeg_dimensions(&data)?;

        Ok(Self {
            width,
            height,
            bits_per_component: 8,
            color_space,
            format: ImageFormat::Jpeg,
            data,
            soft_mask: None,
        })
    }

    /// Load a PNG image, recompressing the pixel data with Flate.
    pub fn from_png(data: &[u8]) -> Result<Self> {
        use image::GenericImageView;

        let img = image::load_from_memory_with_format(data, image::ImageFormat::Png)
            .map_err(|e| Error::Image(e.to_string()))?;

        let (width, height) = img.dimensions();

        let (color_space, pixels, alpha) = match img.color() {
            image::ColorType::L8 | image::ColorType::L16 => {
                let gray = img.to_luma8();
                (ColorSpace::DeviceGray, gray.into_raw(), None)
            },
            image::ColorType::La8 | image::ColorType::La16 => {
                let la = img.to_luma_alpha8();
                let mut gray = Vec::with_capacity((width * height) as usize);
                let mut alpha_channel = Vec::with_capacity((width * height) as usize);
                for pixel in la.pixels() {
                    gray.push(pixel.0[0]);
                    alpha_channel.push(pixel.0[1]);
                }
                (ColorSpace::DeviceGray, gray, Some(alpha_channel))
            },
            image::ColorType::Rgb8 | image::ColorType::Rgb16 => {
                let rgb = img.to_rgb8();
                (ColorSpace::DeviceRGB, rgb.into_raw(), None)
            },
            image::ColorType::Rgba8 | image::ColorType::Rgba16 => {
                let rgba = img.to_rgba8();
                let mut rgb = Vec::with_capacity((width * height * 3) as usize);
                let mut alpha_channel = Vec::with_capacity((width * height) as usize);
                for pixel in rgba.pixels() {
                    rgb.push(pixel.0[0]);
                    rgb.push(pixel.0[1]);
                    rgb.push(pixel.0[2]);
                    alpha_channel.push(pixel.0[3]);
                }
                (ColorSpace::DeviceRGB, rgb, Some(alpha_channel))
            },
            _ => {
                let rgb = img.to_rgb8();
                (ColorSpace::DeviceRGB, rgb.into_raw(), None)
            },
        };

        let compressed = flate_compress(&pixels)?;

        Ok(Self {
            width,
            height,
            bits_per_component: 8,
            color_space,
            format: ImageFormat::Png,
            data: compressed,
            soft_mask: alpha.map(|a| flate_compress(&a)).transpose()?,
        })
    }

    /// Load an image from raw bytes, sniffing the format from magic bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8 {
            return Self::from_jpeg(data.to_vec());
        }

        if data.len() >= 8 && &data[0..8] == b"\x89PNG\r\n\x1a\n" {
            return Self::from_png(data);
        }

        Err(Error::Image("unsupported image format, expected JPEG or PNG".to_string()))
    }

    /// Load an image from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_bytes(&data)
    }

    /// Aspect ratio (width / height).
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Dimensions that fit within a bounding box, preserving aspect ratio.
    pub fn fit_to_box(&self, max_width: f32, max_height: f32) -> (f32, f32) {
        let aspect = self.aspect_ratio();
        let box_aspect = max_width / max_height;

        if aspect > box_aspect {
            (max_width, max_width / aspect)
        } else {
            (max_height * aspect, max_height)
        }
    }

    /// Build the Image XObject stream dictionary (without /Length, which the
    /// stream serializer fills in).
    pub fn build_xobject_dict(&self) -> HashMap<String, Object> {
        let mut dict = HashMap::new();

        dict.insert("Type".to_string(), Object::name("XObject"));
        dict.insert("Subtype".to_string(), Object::name("Image"));
        dict.insert("Width".to_string(), Object::Integer(self.width as i64));
        dict.insert("Height".to_string(), Object::Integer(self.height as i64));
        dict.insert("ColorSpace".to_string(), Object::name(self.color_space.pdf_name()));
        dict.insert(
            "BitsPerComponent".to_string(),
            Object::Integer(self.bits_per_component as i64),
        );

        match self.format {
            ImageFormat::Jpeg => {
                dict.insert("Filter".to_string(), Object::name("DCTDecode"));
            },
            ImageFormat::Png => {
                // Pixels are stored as plain scanlines, no PNG row predictor
                dict.insert("Filter".to_string(), Object::name("FlateDecode"));
            },
        }

        dict
    }

    /// Build the soft mask (alpha channel) XObject dictionary, if any.
    pub fn build_soft_mask_dict(&self) -> Option<HashMap<String, Object>> {
        self.soft_mask.as_ref().map(|_| {
            let mut dict = HashMap::new();
            dict.insert("Type".to_string(), Object::name("XObject"));
            dict.insert("Subtype".to_string(), Object::name("Image"));
            dict.insert("Width".to_string(), Object::Integer(self.width as i64));
            dict.insert("Height".to_string(), Object::Integer(self.height as i64));
            dict.insert("ColorSpace".to_string(), Object::name("DeviceGray"));
            dict.insert("BitsPerComponent".to_string(), Object::Integer(8));
            dict.insert("Filter".to_string(), Object::name("FlateDecode"));
            dict
        })
    }
}

/// Read width, height and color space from JPEG SOF markers.
fn jpeg_dimensions(data: &[u8]) -> Result<(u32, u32, ColorSpace)> {
    if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
        return Err(Error::Image("not a JPEG file".to_string()));
    }

    let mut pos = 2;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            pos += 1;
            continue;
        }

        let marker = data[pos + 1];
        // SOF0, SOF1, SOF2 carry the frame header
        if matches!(marker, 0xC0 | 0xC1 | 0xC2) {
            if pos + 10 > data.len() {
                break;
            }
            let height = u32::from(data[pos + 5]) << 8 | u32::from(data[pos + 6]);
            let width = u32::from(data[pos + 7]) << 8 | u32::from(data[pos + 8]);
            let color_space = match data[pos + 9] {
                1 => ColorSpace::DeviceGray,
                3 => ColorSpace::DeviceRGB,
                n => {
                    return Err(Error::Image(format!(
                        "unsupported JPEG component count {}",
                        n
                    )))
                },
            };
            return Ok((width, height, color_space));
        }

        // Skip over the segment using its declared length
        let len = usize::from(data[pos + 2]) << 8 | usize::from(data[pos + 3]);
        pos += 2 + len;
    }

    Err(Error::Image("JPEG frame header not found".to_string()))
}

fn flate_compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}
