//! DevisFlash: commercial quote engine with PDF output.
//!
//! The crate is split into a domain model and a rendering pipeline:
//!
//! - [`model`]: quotes, line items, VAT rates and validation
//! - [`money`]: French number formatting for the rendered document
//! - [`render`]: layout of a quote into an A4 PDF across three visual
//!   templates
//! - [`object`] and [`writer`]: the PDF file format layer the renderer
//!   sits on
//! - [`store`], [`quota`], [`logo`]: persistence, free-tier limits and
//!   logo uploads
//!
//! # Example
//!
//! ```no_run
//! use devisflash::{PdfGenerator, Quote, RenderConfig};
//!
//! let mut quote = Quote::new();
//! quote.company_name = "Atelier Dupont".to_string();
//! quote.company_contact = "Jean Dupont".to_string();
//! quote.company_address = "12 rue des Lilas\n75011 Paris".to_string();
//! quote.company_email = "contact@atelier-dupont.fr".to_string();
//! quote.client_name = "SARL Martin".to_string();
//! quote.client_address = "4 avenue de la Gare\n69002 Lyon".to_string();
//!
//! let generator = PdfGenerator::new(RenderConfig::default());
//! let path = generator.generate(&mut quote, true)?;
//! println!("devis écrit dans {}", path.display());
//! # Ok::<(), devisflash::Error>(())
//! ```

pub mod error;
pub mod logo;
pub mod model;
pub mod money;
pub mod object;
pub mod quota;
pub mod render;
pub mod store;
pub mod writer;

pub use error::{Error, Result};
pub use logo::{LogoStore, MAX_LOGO_BYTES};
pub use model::{FieldError, LineItem, Quote, VatRate};
pub use quota::{FreeTierCounter, QuotaTracker};
pub use render::{PdfGenerator, RenderConfig, Template};
pub use store::{MemoryQuoteStore, QuoteStore};
