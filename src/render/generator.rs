//! Quote PDF rendering.
//!
//! Lays out an A4 document from a [`Quote`]: colored header band, issuer
//! and client panels, optional subject line, the item table with repeated
//! headers across page breaks, the totals box and payment terms, plus a
//! footer rule (and watermark line for free-tier documents) on every page.
//!
//! Coordinates are handled in millimeters from the top-left corner, the
//! convention of print layouts, and converted to PDF points (bottom-left
//! origin) at the last moment.

use crate::error::Result;
use crate::model::Quote;
use crate::money::{format_eur, format_quantity, format_rate};
use crate::render::template::Palette;
use crate::writer::{Color, ContentStreamBuilder, Font, ImageData, PdfWriter, PdfWriterConfig};
use log::{debug, warn};
use std::path::PathBuf;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
/// Content below this line moves to the next page.
const CONTENT_LIMIT_MM: f32 = 272.0;
const FOOTER_LINE_MM: f32 = 277.0;

/// Millimeters to PDF points.
fn mm(value: f32) -> f32 {
    value * 72.0 / 25.4
}

/// Convert a top-origin y position in millimeters to a PDF y coordinate.
fn pdf_y(y_mm: f32) -> f32 {
    mm(PAGE_HEIGHT_MM - y_mm)
}

/// Rendering options shared by all generated documents.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Directory the PDF files are written to, created on demand
    pub output_dir: PathBuf,
    /// Master switch for the free-tier watermark line
    pub watermark_enabled: bool,
    /// Text of the watermark line
    pub watermark_text: String,
    /// Flate-compress page content streams
    pub compress: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_dir: std::env::temp_dir().join("devisflash"),
            watermark_enabled: true,
            watermark_text: "Devis généré gratuitement avec DevisFlash".to_string(),
            compress: true,
        }
    }
}

/// Renders quotes to PDF files.
pub struct PdfGenerator {
    config: RenderConfig,
}

impl PdfGenerator {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render the quote and write it to `{output_dir}/devis_{number}.pdf`.
    ///
    /// Assigns a quote number first if the quote has none. `watermarked`
    /// requests the free-tier footer line; it only appears when the config
    /// also enables watermarks.
    pub fn generate(&self, quote: &mut Quote, watermarked: bool) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.config.output_dir)?;

        let number = quote.generate_quote_number().to_string();
        let bytes = self.render(quote, watermarked)?;

        let path = self.config.output_dir.join(format!("devis_{}.pdf", number));
        std::fs::write(&path, bytes)?;
        debug!("wrote quote {} to {}", number, path.display());
        Ok(path)
    }

    /// Render the quote to PDF bytes without touching the filesystem.
    ///
    /// The quote must already carry a number; [`generate`](Self::generate)
    /// handles assignment.
    pub fn render(&self, quote: &Quote, watermarked: bool) -> Result<Vec<u8>> {
        let template = quote.pdf_template;
        let watermark = (watermarked && self.config.watermark_enabled)
            .then(|| self.config.watermark_text.clone());

        let mut writer = PdfWriter::with_config(
            PdfWriterConfig::default()
                .with_title(format!("Devis {}", quote.quote_number.as_deref().unwrap_or("")))
                .with_author(quote.company_name.clone())
                .with_creator("DevisFlash")
                .with_compress(self.config.compress),
        );
        let logo = load_logo(quote).map(|image| {
            let (width_pt, height_pt) = image.fit_to_box(mm(25.0), mm(24.0));
            LogoPlacement {
                resource_id: writer.register_image(image),
                width_pt,
                height_pt,
            }
        });

        let mut composer = PageComposer::new(template.palette(), watermark, logo);

        composer.header_band(quote);
        composer.party_panels(quote);
        composer.description(quote);
        composer.items_table(quote);
        composer.totals_box(quote);
        composer.payment_terms(quote);

        composer.finish(&mut writer);
        writer.finish()
    }
}

/// Open the quote's logo if it has one. A logo that cannot be read is
/// logged and skipped, the header falls back to the title instead.
fn load_logo(quote: &Quote) -> Option<ImageData> {
    let path = quote.company_logo.as_ref()?;
    match ImageData::from_file(path) {
        Ok(image) => Some(image),
        Err(err) => {
            warn!("logo {} could not be loaded: {}", path.display(), err);
            None
        },
    }
}

/// A registered logo XObject and its scaled size in the header band.
struct LogoPlacement {
    resource_id: String,
    width_pt: f32,
    height_pt: f32,
}

/// Accumulates pages top-down, breaking to a new page when content runs
/// past the limit line.
struct PageComposer {
    palette: Palette,
    watermark: Option<String>,
    pages: Vec<ContentStreamBuilder>,
    current: ContentStreamBuilder,
    /// Cursor, in millimeters from the top of the current page
    y: f32,
    logo: Option<LogoPlacement>,
}

impl PageComposer {
    fn new(palette: Palette, watermark: Option<String>, logo: Option<LogoPlacement>) -> Self {
        Self {
            palette,
            watermark,
            pages: Vec::new(),
            current: ContentStreamBuilder::new(),
            y: MARGIN_MM,
            logo,
        }
    }

    /// Finish the current page and start a blank one at the top margin.
    fn break_page(&mut self) {
        self.draw_footer();
        let finished = std::mem::take(&mut self.current);
        self.pages.push(finished);
        self.y = MARGIN_MM;
    }

    /// Break to a new page unless `height_mm` still fits on this one.
    fn ensure_space(&mut self, height_mm: f32) -> bool {
        if self.y + height_mm > CONTENT_LIMIT_MM {
            self.break_page();
            true
        } else {
            false
        }
    }

    fn draw_footer(&mut self) {
        self.current
            .stroke_color(Color::from_rgb8(200, 200, 200))
            .line_width(mm(0.3))
            .move_to(mm(MARGIN_MM), pdf_y(FOOTER_LINE_MM))
            .line_to(mm(PAGE_WIDTH_MM - MARGIN_MM), pdf_y(FOOTER_LINE_MM))
            .stroke();

        if let Some(text) = self.watermark.clone() {
            self.text_center(
                Font::HelveticaOblique,
                8.0,
                Color::from_rgb8(150, 150, 150),
                PAGE_WIDTH_MM / 2.0,
                FOOTER_LINE_MM + 4.5,
                &text,
            );
        }
    }

    /// Text with its baseline at `y_mm` from the top.
    fn text_at(&mut self, font: Font, size: f32, color: Color, x_mm: f32, y_mm: f32, text: &str) {
        self.current
            .fill_color(color)
            .set_font(font.resource_name(), size)
            .text(text, mm(x_mm), pdf_y(y_mm));
    }

    /// Right-aligned text ending at `x_right_mm`.
    fn text_right(&mut self, font: Font, size: f32, color: Color, x_right_mm: f32, y_mm: f32, text: &str) {
        let width_mm = font.text_width(text, size) * 25.4 / 72.0;
        self.text_at(font, size, color, x_right_mm - width_mm, y_mm, text);
    }

    /// Text centered on `x_center_mm`.
    fn text_center(&mut self, font: Font, size: f32, color: Color, x_center_mm: f32, y_mm: f32, text: &str) {
        let width_mm = font.text_width(text, size) * 25.4 / 72.0;
        self.text_at(font, size, color, x_center_mm - width_mm / 2.0, y_mm, text);
    }

    /// Filled rectangle addressed from the top-left corner.
    fn fill_rect(&mut self, x_mm: f32, y_mm: f32, w_mm: f32, h_mm: f32, color: Color) {
        self.current
            .fill_color(color)
            .rect(mm(x_mm), pdf_y(y_mm + h_mm), mm(w_mm), mm(h_mm))
            .fill();
    }

    fn stroke_rect(&mut self, x_mm: f32, y_mm: f32, w_mm: f32, h_mm: f32, color: Color, width_mm: f32) {
        self.current
            .stroke_color(color)
            .line_width(mm(width_mm))
            .rect(mm(x_mm), pdf_y(y_mm + h_mm), mm(w_mm), mm(h_mm))
            .stroke();
    }

    /// Shorten text with an ellipsis until it fits `max_mm` at the given size.
    fn fit_text(font: Font, size: f32, max_mm: f32, text: &str) -> String {
        let max_pt = mm(max_mm);
        if font.text_width(text, size) <= max_pt {
            return text.to_string();
        }
        let mut out: String = text.to_string();
        while !out.is_empty() {
            out.pop();
            let candidate = format!("{}...", out.trim_end());
            if font.text_width(&candidate, size) <= max_pt {
                return candidate;
            }
        }
        String::new()
    }

    /// Greedy word wrap to a maximum line width.
    fn wrap_text(font: Font, size: f32, max_mm: f32, text: &str) -> Vec<String> {
        let max_pt = mm(max_mm);
        let mut lines = Vec::new();
        for raw_line in text.lines() {
            let mut line = String::new();
            for word in raw_line.split_whitespace() {
                let candidate = if line.is_empty() {
                    word.to_string()
                } else {
                    format!("{} {}", line, word)
                };
                if font.text_width(&candidate, size) <= max_pt || line.is_empty() {
                    line = candidate;
                } else {
                    lines.push(line);
                    line = word.to_string();
                }
            }
            lines.push(line);
        }
        lines
    }

    /// Colored band across the top of the first page with the logo or a
    /// large "DEVIS" title, and the reference and dates on the right.
    fn header_band(&mut self, quote: &Quote) {
        self.fill_rect(0.0, 0.0, PAGE_WIDTH_MM, 40.0, self.palette.primary);

        match self.logo.take() {
            Some(logo) => {
                let h_mm = logo.height_pt * 25.4 / 72.0;
                self.current.draw_image(
                    &logo.resource_id,
                    mm(MARGIN_MM),
                    pdf_y(8.0 + h_mm),
                    logo.width_pt,
                    logo.height_pt,
                );
            },
            None => {
                self.text_at(Font::HelveticaBold, 32.0, Color::WHITE, MARGIN_MM, 19.0, "DEVIS");
            },
        }

        let number = quote.quote_number.as_deref().unwrap_or("");
        self.text_right(
            Font::Helvetica,
            11.0,
            Color::WHITE,
            PAGE_WIDTH_MM - 20.0,
            15.5,
            &format!("N° {}", number),
        );
        self.text_right(
            Font::Helvetica,
            11.0,
            Color::WHITE,
            PAGE_WIDTH_MM - 20.0,
            21.5,
            &format!("Date : {}", quote.quote_date.format("%d/%m/%Y")),
        );
        if let Some(valid_until) = quote.quote_valid_until {
            self.text_right(
                Font::Helvetica,
                11.0,
                Color::WHITE,
                PAGE_WIDTH_MM - 20.0,
                27.5,
                &format!("Valable jusqu'au : {}", valid_until.format("%d/%m/%Y")),
            );
        }

        self.y = 45.0;
    }

    /// Issuer panel on a tinted background, client panel beside it.
    fn party_panels(&mut self, quote: &Quote) {
        let top = self.y;
        self.fill_rect(MARGIN_MM, top, 85.0, 45.0, self.palette.secondary);

        self.text_at(Font::HelveticaBold, 11.0, self.palette.primary, MARGIN_MM + 2.0, top + 5.0, "ÉMETTEUR");
        let mut line_y = top + 10.5;
        for line in company_lines(quote) {
            let line = Self::fit_text(Font::Helvetica, 9.0, 81.0, &line);
            self.text_at(Font::Helvetica, 9.0, Color::BLACK, MARGIN_MM + 2.0, line_y, &line);
            line_y += 4.0;
        }

        self.text_at(Font::HelveticaBold, 11.0, self.palette.primary, 105.0, top + 5.0, "CLIENT");
        let mut line_y = top + 10.5;
        for line in client_lines(quote) {
            let line = Self::fit_text(Font::Helvetica, 9.0, 83.0, &line);
            self.text_at(Font::Helvetica, 9.0, Color::BLACK, 105.0, line_y, &line);
            line_y += 4.0;
        }

        self.y = top + 50.0;
    }

    /// Subject block, skipped entirely when the quote has no description.
    fn description(&mut self, quote: &Quote) {
        let Some(text) = quote.quote_description.as_deref().filter(|t| !t.trim().is_empty()) else {
            return;
        };

        self.text_at(Font::HelveticaBold, 10.0, self.palette.primary, MARGIN_MM, self.y + 4.5, "OBJET");
        self.y += 7.0;

        for line in Self::wrap_text(Font::Helvetica, 9.0, 180.0, text) {
            self.ensure_space(4.0);
            self.text_at(Font::Helvetica, 9.0, Color::BLACK, MARGIN_MM, self.y + 3.5, &line);
            self.y += 4.0;
        }
        self.y += 3.0;
    }

    fn table_header(&mut self) {
        let top = self.y;
        self.fill_rect(MARGIN_MM, top, 180.0, 8.0, self.palette.primary);

        let baseline = top + 5.5;
        self.text_at(Font::HelveticaBold, 9.0, Color::WHITE, MARGIN_MM + 2.0, baseline, "Désignation");
        self.text_center(Font::HelveticaBold, 9.0, Color::WHITE, 117.5, baseline, "Quantité");
        self.text_right(Font::HelveticaBold, 9.0, Color::WHITE, 163.0, baseline, "Prix unit. HT");
        self.text_right(Font::HelveticaBold, 9.0, Color::WHITE, 193.0, baseline, "Total HT");

        self.y = top + 8.0;
    }

    /// The item table. Rows never straddle a page break; each new page
    /// restarts with the column header.
    fn items_table(&mut self, quote: &Quote) {
        self.ensure_space(8.0 + 7.0);
        self.table_header();

        for (i, item) in quote.items().iter().enumerate() {
            if self.ensure_space(7.0) {
                self.table_header();
            }

            let top = self.y;
            if i % 2 == 1 {
                self.fill_rect(MARGIN_MM, top, 180.0, 7.0, self.palette.zebra_row());
            }
            self.stroke_rect(MARGIN_MM, top, 180.0, 7.0, Color::from_rgb8(220, 220, 220), 0.1);

            let baseline = top + 4.8;
            let label = Self::fit_text(Font::Helvetica, 9.0, 86.0, &item.label);
            self.text_at(Font::Helvetica, 9.0, Color::BLACK, MARGIN_MM + 2.0, baseline, &label);
            self.text_center(
                Font::Helvetica,
                9.0,
                Color::BLACK,
                117.5,
                baseline,
                &format_quantity(item.quantity),
            );
            self.text_right(
                Font::Helvetica,
                9.0,
                Color::BLACK,
                163.0,
                baseline,
                &format_eur(item.unit_price_ht),
            );
            self.text_right(
                Font::Helvetica,
                9.0,
                Color::BLACK,
                193.0,
                baseline,
                &format_eur(item.total_ht()),
            );

            self.y = top + 7.0;
        }
    }

    /// Totals box on the right: HT, VAT at the quote's rate, a separator
    /// in the primary color, then the TTC line in bold.
    fn totals_box(&mut self, quote: &Quote) {
        self.y += 5.0;
        self.ensure_space(28.0);
        let top = self.y;

        self.fill_rect(125.0, top, 65.0, 28.0, self.palette.zebra_row());

        self.text_at(Font::Helvetica, 10.0, Color::BLACK, 127.0, top + 7.0, "Total HT");
        self.text_right(Font::Helvetica, 10.0, Color::BLACK, 188.0, top + 7.0, &format_eur(quote.total_ht()));

        let vat_label = format!("TVA ({}%)", format_rate(quote.vat_rate.percent()));
        self.text_at(Font::Helvetica, 10.0, Color::BLACK, 127.0, top + 14.0, &vat_label);
        self.text_right(Font::Helvetica, 10.0, Color::BLACK, 188.0, top + 14.0, &format_eur(quote.vat_amount()));

        self.current
            .stroke_color(self.palette.primary)
            .line_width(mm(0.5))
            .move_to(mm(127.0), pdf_y(top + 16.5))
            .line_to(mm(188.0), pdf_y(top + 16.5))
            .stroke();

        self.text_at(Font::HelveticaBold, 12.0, self.palette.primary, 127.0, top + 24.0, "Total TTC");
        self.text_right(
            Font::HelveticaBold,
            12.0,
            self.palette.primary,
            188.0,
            top + 24.0,
            &format_eur(quote.total_ttc()),
        );

        self.y = top + 33.0;
    }

    /// Payment terms block, skipped when the clause is empty.
    fn payment_terms(&mut self, quote: &Quote) {
        let Some(terms) = quote.payment_terms.as_deref().filter(|t| !t.trim().is_empty()) else {
            return;
        };

        // heading plus the first wrapped line, so the heading is never
        // orphaned at the bottom of a page
        self.ensure_space(10.0);
        self.text_at(
            Font::HelveticaBold,
            9.0,
            Color::BLACK,
            MARGIN_MM,
            self.y + 4.0,
            "Conditions de paiement",
        );
        self.y += 6.0;

        for line in Self::wrap_text(Font::Helvetica, 8.0, 180.0, terms) {
            self.ensure_space(4.0);
            self.text_at(Font::Helvetica, 8.0, Color::BLACK, MARGIN_MM, self.y + 3.0, &line);
            self.y += 4.0;
        }
    }

    /// Close the last page and hand everything to the writer.
    fn finish(mut self, writer: &mut PdfWriter) {
        self.draw_footer();
        let last = std::mem::take(&mut self.current);
        self.pages.push(last);

        for page in self.pages {
            writer.push_page(mm(PAGE_WIDTH_MM), mm(PAGE_HEIGHT_MM), page);
        }
    }
}

fn company_lines(quote: &Quote) -> Vec<String> {
    let mut lines = Vec::new();
    lines.extend(non_blank(&quote.company_name));
    lines.extend(non_blank(&quote.company_contact));
    for address_line in quote.company_address.lines() {
        lines.extend(non_blank(address_line));
    }
    lines.extend(non_blank(&quote.company_email).map(|l| format!("Email : {}", l)));
    if let Some(phone) = quote.company_phone.as_deref() {
        lines.extend(non_blank(phone).map(|l| format!("Tél : {}", l)));
    }
    if let Some(siret) = quote.company_siret.as_deref() {
        lines.extend(non_blank(siret).map(|l| format!("SIRET : {}", l)));
    }
    lines
}

fn client_lines(quote: &Quote) -> Vec<String> {
    let mut lines = Vec::new();
    lines.extend(non_blank(&quote.client_name));
    if let Some(company) = quote.client_company.as_deref() {
        lines.extend(non_blank(company));
    }
    for address_line in quote.client_address.lines() {
        lines.extend(non_blank(address_line));
    }
    if let Some(email) = quote.client_email.as_deref() {
        lines.extend(non_blank(email).map(|l| format!("Email : {}", l)));
    }
    lines
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
