//! PDF rendering of quotes.
//!
//! Assertions read the uncompressed content streams: text shows up as
//! WinAnsi-encoded literal strings, so accented labels appear with octal
//! escapes ("Désignation" is "D\351signation").

use devisflash::{LineItem, PdfGenerator, Quote, RenderConfig, Template};
use rust_decimal_macros::dec;
use std::path::PathBuf;

fn test_config(output_dir: PathBuf) -> RenderConfig {
    RenderConfig {
        output_dir,
        watermark_enabled: true,
        watermark_text: "Version gratuite".to_string(),
        compress: false,
    }
}

fn filled_quote() -> Quote {
    let mut quote = Quote::new();
    quote.company_name = "Atelier Dupont".to_string();
    quote.company_contact = "Jean Dupont".to_string();
    quote.company_address = "12 rue des Lilas\n75011 Paris".to_string();
    quote.company_email = "contact@atelier-dupont.fr".to_string();
    quote.client_name = "SARL Martin".to_string();
    quote.client_address = "4 avenue de la Gare\n69002 Lyon".to_string();
    quote.items_mut().clear();
    quote.add_item(LineItem {
        quantity: dec!(10),
        unit_price_ht: dec!(100),
        ..LineItem::new("Developpement")
    });
    quote.add_item(LineItem {
        quantity: dec!(2),
        unit_price_ht: dec!(50),
        ..LineItem::new("Maintenance")
    });
    quote
}

fn render_text(quote: &mut Quote, watermarked: bool) -> String {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    let generator = PdfGenerator::new(test_config(dir.path().to_path_buf()));
    quote.generate_quote_number();
    let bytes = generator.render(quote, watermarked).unwrap();
    String::from_utf8_lossy(&bytes).to_string()
}

#[test]
fn test_document_carries_labels_and_totals() {
    let mut quote = filled_quote();
    let text = render_text(&mut quote, false);

    // header band and panels
    assert!(text.contains("(DEVIS) Tj"));
    assert!(text.contains("(\\311METTEUR) Tj"));
    assert!(text.contains("(CLIENT) Tj"));
    assert!(text.contains("(Atelier Dupont) Tj"));
    assert!(text.contains("(SARL Martin) Tj"));

    // table header with accented column names
    assert!(text.contains("(D\\351signation) Tj"));
    assert!(text.contains("(Quantit\\351) Tj"));
    assert!(text.contains("(Prix unit. HT) Tj"));

    // amounts in French format with the euro sign (0x80 in WinAnsi)
    assert!(text.contains("(1 100,00 \\200) Tj"));
    assert!(text.contains("(TVA \\(20,0%\\)) Tj"));
    assert!(text.contains("(1 320,00 \\200) Tj"));
    assert!(text.contains("(Total TTC) Tj"));
}

#[test]
fn test_header_shows_number_and_dates() {
    let mut quote = filled_quote();
    quote.quote_date = chrono::NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
    quote.quote_valid_until = chrono::NaiveDate::from_ymd_opt(2025, 4, 8);
    quote.quote_number = Some("DF-20250309-0042".to_string());

    let text = render_text(&mut quote, false);
    assert!(text.contains("(N\\260 DF-20250309-0042) Tj"));
    assert!(text.contains("(Date : 09/03/2025) Tj"));
    assert!(text.contains("(Valable jusqu'au : 08/04/2025) Tj"));
}

#[test]
fn test_optional_blocks_omitted_when_empty() {
    let mut quote = filled_quote();
    quote.quote_valid_until = None;
    quote.quote_description = None;
    quote.payment_terms = None;
    quote.client_email = None;

    let text = render_text(&mut quote, false);
    assert!(!text.contains("Valable"));
    assert!(!text.contains("(OBJET) Tj"));
    assert!(!text.contains("Conditions de paiement"));
    // only the issuer panel has an email line left
    assert_eq!(text.matches("(Email :").count(), 1);
}

#[test]
fn test_optional_blocks_present_when_filled() {
    let mut quote = filled_quote();
    quote.quote_description = Some("Refonte du site vitrine".to_string());
    quote.payment_terms = Some("Paiement sous 30 jours.".to_string());

    let text = render_text(&mut quote, false);
    assert!(text.contains("(OBJET) Tj"));
    assert!(text.contains("(Refonte du site vitrine) Tj"));
    assert!(text.contains("(Conditions de paiement) Tj"));
    assert!(text.contains("(Paiement sous 30 jours.) Tj"));
}

#[test]
fn test_watermark_follows_flag_and_config() {
    let mut quote = filled_quote();
    assert!(render_text(&mut quote, true).contains("(Version gratuite) Tj"));
    assert!(!render_text(&mut quote, false).contains("(Version gratuite) Tj"));

    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path().to_path_buf());
    config.watermark_enabled = false;
    let generator = PdfGenerator::new(config);
    let bytes = generator.render(&quote, true).unwrap();
    assert!(!String::from_utf8_lossy(&bytes).contains("(Version gratuite) Tj"));
}

#[test]
fn test_long_quote_spans_pages_with_repeated_table_header() {
    let mut quote = filled_quote();
    quote.items_mut().clear();
    for i in 0..60 {
        quote.add_item(LineItem {
            quantity: dec!(1),
            unit_price_ht: dec!(10),
            ..LineItem::new(format!("Prestation {}", i + 1))
        });
    }

    let text = render_text(&mut quote, true);
    let pages = text.matches("/Type /Page>>").count();
    assert!(pages >= 2, "expected a page break, got {} page(s)", pages);

    // the table header and the footer rule repeat on every page
    assert_eq!(text.matches("(D\\351signation) Tj").count(), pages);
    assert_eq!(text.matches("(Version gratuite) Tj").count(), pages);

    // no row went missing across the breaks
    assert!(text.contains("(Prestation 1) Tj"));
    assert!(text.contains("(Prestation 60) Tj"));
}

#[test]
fn test_templates_produce_distinct_documents() {
    let mut quote = filled_quote();
    quote.quote_number = Some("DF-20250101-0001".to_string());

    let mut outputs = Vec::new();
    for template in [Template::Modern, Template::Corporate, Template::Creative] {
        quote.pdf_template = template;
        outputs.push(render_text(&mut quote, false));
    }
    assert_ne!(outputs[0], outputs[1]);
    assert_ne!(outputs[1], outputs[2]);
}

#[test]
fn test_logo_replaces_header_title() {
    let dir = tempfile::tempdir().unwrap();
    let logo_path = dir.path().join("logo.png");
    image::RgbImage::from_pixel(2, 2, image::Rgb([99, 102, 241]))
        .save(&logo_path)
        .unwrap();

    let mut quote = filled_quote();
    quote.company_logo = Some(logo_path);

    let text = render_text(&mut quote, false);
    // the logo XObject is embedded and painted under the id the writer
    // handed out for it, and the fallback title stays out
    assert!(text.contains("/Subtype /Image"));
    assert!(text.contains("/Im1 Do"));
    assert_eq!(text.matches(" Do\n").count(), 1);
    assert!(!text.contains("(DEVIS) Tj"));
}

#[test]
fn test_missing_logo_falls_back_to_title() {
    let mut quote = filled_quote();
    quote.company_logo = Some(PathBuf::from("/nonexistent/logo.png"));

    let text = render_text(&mut quote, false);
    assert!(text.contains("(DEVIS) Tj"));
    assert!(!text.contains("/Im1 Do"));
}

#[test]
fn test_metadata_identifies_the_quote() {
    let mut quote = filled_quote();
    quote.quote_number = Some("DF-20250101-0007".to_string());
    let text = render_text(&mut quote, false);

    assert!(text.contains("(Devis DF-20250101-0007)"));
    assert!(text.contains("(Atelier Dupont)"));
    assert!(text.contains("(DevisFlash)"));
}

#[test]
fn test_generate_writes_named_file() {
    let dir = tempfile::tempdir().unwrap();
    let output_dir = dir.path().join("pdf").join("out");
    let generator = PdfGenerator::new(test_config(output_dir.clone()));

    let mut quote = filled_quote();
    let path = generator.generate(&mut quote, true).unwrap();

    let number = quote.quote_number.clone().unwrap();
    assert_eq!(path, output_dir.join(format!("devis_{}.pdf", number)));
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF-1.7"));
    assert!(bytes.ends_with(b"%%EOF"));
}

#[test]
fn test_generate_assigns_number_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let generator = PdfGenerator::new(test_config(dir.path().to_path_buf()));

    let mut quote = filled_quote();
    assert!(quote.quote_number.is_none());
    generator.generate(&mut quote, false).unwrap();
    assert!(quote.quote_number.is_some());
}

#[test]
fn test_compressed_output_still_structured() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path().to_path_buf());
    config.compress = true;
    let generator = PdfGenerator::new(config);

    let mut quote = filled_quote();
    quote.generate_quote_number();
    let bytes = generator.render(&quote, false).unwrap();
    let text = String::from_utf8_lossy(&bytes);

    assert!(text.contains("/Filter /FlateDecode"));
    assert!(!text.contains("(DEVIS) Tj"));
    assert!(text.contains("/Type /Catalog"));
}
