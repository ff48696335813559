//! Low-level PDF document assembly.
//!
//! Collects pages and image XObjects, then serializes a complete file:
//! header, body objects, xref table, and trailer.

use crate::error::Result;
use crate::object::{Object, ObjectRef};
use crate::writer::content_stream::ContentStreamBuilder;
use crate::writer::fonts::Font;
use crate::writer::images::ImageData;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::collections::HashMap;
use std::io::Write;

/// Document-level metadata and output options.
#[derive(Debug, Clone)]
pub struct PdfWriterConfig {
    /// PDF version written in the header
    pub version: String,
    /// Document title (Info dictionary)
    pub title: Option<String>,
    /// Document author
    pub author: Option<String>,
    /// Document subject
    pub subject: Option<String>,
    /// Producing application
    pub creator: Option<String>,
    /// Flate-compress page content streams
    pub compress: bool,
}

impl Default for PdfWriterConfig {
    fn default() -> Self {
        Self {
            version: "1.7".to_string(),
            title: None,
            author: None,
            subject: None,
            creator: None,
            compress: true,
        }
    }
}

impl PdfWriterConfig {
    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the document author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the document subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the producing application name.
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    /// Enable or disable content stream compression.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}

struct PageData {
    width: f32,
    height: f32,
    content: ContentStreamBuilder,
}

/// Writer that assembles pages and resources into PDF bytes.
pub struct PdfWriter {
    config: PdfWriterConfig,
    pages: Vec<PageData>,
    images: Vec<ImageData>,
}

impl PdfWriter {
    /// Create a writer with default configuration.
    pub fn new() -> Self {
        Self::with_config(PdfWriterConfig::default())
    }

    /// Create a writer with the given configuration.
    pub fn with_config(config: PdfWriterConfig) -> Self {
        Self {
            config,
            pages: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Append a finished page.
    pub fn push_page(&mut self, width: f32, height: f32, content: ContentStreamBuilder) {
        self.pages.push(PageData { width, height, content });
    }

    /// Register an image XObject and return its resource id ("Im1", ...).
    ///
    /// The id is valid in any page's content stream.
    pub fn register_image(&mut self, image: ImageData) -> String {
        self.images.push(image);
        format!("Im{}", self.images.len())
    }

    /// Number of pages added so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Serialize the document to bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        let mut xref_offsets: Vec<(u32, usize)> = Vec::new();

        // PDF header plus binary marker
        writeln!(output, "%PDF-{}", self.config.version)?;
        output.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

        // Object id layout: 1 catalog, 2 pages tree, then fonts, images
        // (with soft masks), page/content pairs, and finally the info dict.
        let mut next_id: u32 = 1;
        let mut alloc = || {
            let id = next_id;
            next_id += 1;
            id
        };

        let catalog_id = alloc();
        let pages_id = alloc();

        let font_ids: Vec<(Font, u32)> = Font::ALL.iter().map(|&f| (f, alloc())).collect();

        let mut image_ids: Vec<(u32, Option<u32>)> = Vec::with_capacity(self.images.len());
        for image in &self.images {
            let id = alloc();
            let mask_id = image.soft_mask.as_ref().map(|_| alloc());
            image_ids.push((id, mask_id));
        }

        let page_ids: Vec<(u32, u32)> = (0..self.pages.len()).map(|_| (alloc(), alloc())).collect();
        let info_id = alloc();

        // Shared resource dictionary
        let font_resources: HashMap<String, Object> = font_ids
            .iter()
            .map(|(font, id)| (font.resource_name().to_string(), Object::reference(*id, 0)))
            .collect();
        let image_resources: HashMap<String, Object> = image_ids
            .iter()
            .enumerate()
            .map(|(i, (id, _))| (format!("Im{}", i + 1), Object::reference(*id, 0)))
            .collect();

        let mut resources = vec![("Font", Object::Dictionary(font_resources))];
        if !image_resources.is_empty() {
            resources.push(("XObject", Object::Dictionary(image_resources)));
        }
        let resources = Object::dict(resources);

        // Catalog and pages tree
        let catalog_obj = Object::dict(vec![
            ("Type", Object::name("Catalog")),
            ("Pages", Object::reference(pages_id, 0)),
        ]);
        let page_refs: Vec<Object> =
            page_ids.iter().map(|(page_id, _)| Object::reference(*page_id, 0)).collect();
        let pages_obj = Object::dict(vec![
            ("Type", Object::name("Pages")),
            ("Kids", Object::Array(page_refs)),
            ("Count", Object::Integer(self.pages.len() as i64)),
        ]);

        xref_offsets.push((catalog_id, output.len()));
        output.extend_from_slice(&catalog_obj.to_indirect_bytes(catalog_id, 0));
        xref_offsets.push((pages_id, output.len()));
        output.extend_from_slice(&pages_obj.to_indirect_bytes(pages_id, 0));

        // Standard Type1 fonts with WinAnsi encoding for French text
        for (font, id) in &font_ids {
            let font_obj = Object::dict(vec![
                ("Type", Object::name("Font")),
                ("Subtype", Object::name("Type1")),
                ("BaseFont", Object::name(font.base_name())),
                ("Encoding", Object::name("WinAnsiEncoding")),
            ]);
            xref_offsets.push((*id, output.len()));
            output.extend_from_slice(&font_obj.to_indirect_bytes(*id, 0));
        }

        // Image XObjects and their soft masks
        for (image, (id, mask_id)) in self.images.iter().zip(&image_ids) {
            let mut dict = image.build_xobject_dict();
            if let Some(mask_id) = mask_id {
                dict.insert("SMask".to_string(), Object::reference(*mask_id, 0));
            }
            let stream = Object::Stream {
                dict,
                data: bytes::Bytes::from(image.data.clone()),
            };
            xref_offsets.push((*id, output.len()));
            output.extend_from_slice(&stream.to_indirect_bytes(*id, 0));

            if let (Some(mask_id), Some(mask_dict), Some(mask_data)) =
                (mask_id, image.build_soft_mask_dict(), image.soft_mask.as_ref())
            {
                let mask = Object::Stream {
                    dict: mask_dict,
                    data: bytes::Bytes::from(mask_data.clone()),
                };
                xref_offsets.push((*mask_id, output.len()));
                output.extend_from_slice(&mask.to_indirect_bytes(*mask_id, 0));
            }
        }

        // Page and content stream objects
        for (page, (page_id, content_id)) in self.pages.iter().zip(&page_ids) {
            let raw_content = page.content.build()?;

            let (content_bytes, is_compressed) = if self.config.compress {
                match compress_data(&raw_content) {
                    Ok(compressed) => (compressed, true),
                    Err(_) => (raw_content, false),
                }
            } else {
                (raw_content, false)
            };

            let mut content_dict = HashMap::new();
            if is_compressed {
                content_dict.insert("Filter".to_string(), Object::name("FlateDecode"));
            }

            let page_obj = Object::dict(vec![
                ("Type", Object::name("Page")),
                ("Parent", Object::reference(pages_id, 0)),
                ("MediaBox", Object::rect(0.0, 0.0, page.width as f64, page.height as f64)),
                ("Contents", Object::reference(*content_id, 0)),
                ("Resources", resources.clone()),
            ]);

            xref_offsets.push((*page_id, output.len()));
            output.extend_from_slice(&page_obj.to_indirect_bytes(*page_id, 0));

            let content_obj = Object::Stream {
                dict: content_dict,
                data: bytes::Bytes::from(content_bytes),
            };
            xref_offsets.push((*content_id, output.len()));
            output.extend_from_slice(&content_obj.to_indirect_bytes(*content_id, 0));
        }

        // Info dictionary
        let mut info_entries = Vec::new();
        if let Some(title) = &self.config.title {
            info_entries.push(("Title", Object::string(title)));
        }
        if let Some(author) = &self.config.author {
            info_entries.push(("Author", Object::string(author)));
        }
        if let Some(subject) = &self.config.subject {
            info_entries.push(("Subject", Object::string(subject)));
        }
        if let Some(creator) = &self.config.creator {
            info_entries.push(("Creator", Object::string(creator)));
        }
        let info_obj = Object::dict(info_entries);
        xref_offsets.push((info_id, output.len()));
        output.extend_from_slice(&info_obj.to_indirect_bytes(info_id, 0));

        // Cross-reference table
        let xref_start = output.len();
        writeln!(output, "xref")?;
        writeln!(output, "0 {}", next_id)?;
        writeln!(output, "0000000000 65535 f ")?;

        xref_offsets.sort_by_key(|(id, _)| *id);
        for (_, offset) in &xref_offsets {
            writeln!(output, "{:010} 00000 n ", offset)?;
        }

        let trailer = Object::dict(vec![
            ("Size", Object::Integer(next_id as i64)),
            ("Root", Object::Reference(ObjectRef::new(catalog_id, 0))),
            ("Info", Object::Reference(ObjectRef::new(info_id, 0))),
        ]);

        writeln!(output, "trailer")?;
        output.extend_from_slice(&trailer.to_bytes());
        writeln!(output)?;
        writeln!(output, "startxref")?;
        writeln!(output, "{}", xref_start)?;
        write!(output, "%%EOF")?;

        Ok(output)
    }

    /// Serialize and write the document to a file.
    pub fn save(self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let bytes = self.finish()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn compress_data(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}
