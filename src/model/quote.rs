//! The quote aggregate: parties, line items, dates and totals.

use crate::model::line_item::LineItem;
use crate::model::validation::{is_valid_email, FieldError};
use crate::model::vat::VatRate;
use crate::render::Template;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Default validity period of a quote, in days.
pub const VALIDITY_DAYS: i64 = 30;

/// Default payment clause printed when none is set explicitly.
pub const DEFAULT_PAYMENT_TERMS: &str =
    "Paiement à réception de facture. Règlement par virement bancaire.";

/// A commercial quote.
///
/// Totals are derived from the line items on every read; the `total_ht` and
/// `total_ttc` fields are display snapshots refreshed by
/// [`calculate_totals`](Quote::calculate_totals) before persisting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Storage identifier, `None` until first saved
    pub id: Option<u64>,
    /// Owning user, `None` for anonymous quotes
    pub owner: Option<Uuid>,
    /// Assigned reference, `None` until first generated
    pub quote_number: Option<String>,

    /// Issuing company name
    pub company_name: String,
    /// Contact person at the issuing company
    pub company_contact: String,
    /// Issuing company postal address
    pub company_address: String,
    /// Issuing company email
    pub company_email: String,
    /// Issuing company phone, omitted from the PDF when empty
    pub company_phone: Option<String>,
    /// Issuing company SIRET, omitted from the PDF when empty
    pub company_siret: Option<String>,
    /// Path to the company logo image, if one was uploaded
    pub company_logo: Option<PathBuf>,

    /// Client name
    pub client_name: String,
    /// Client company, omitted from the PDF when empty
    pub client_company: Option<String>,
    /// Client postal address
    pub client_address: String,
    /// Client email, omitted from the PDF when empty
    pub client_email: Option<String>,

    /// Issue date
    pub quote_date: NaiveDate,
    /// Expiry date of the offer
    pub quote_valid_until: Option<NaiveDate>,
    /// Subject line shown under the parties, omitted when empty
    pub quote_description: Option<String>,

    /// VAT rate applied to the whole quote
    pub vat_rate: VatRate,
    /// Payment clause, printed when non-empty
    pub payment_terms: Option<String>,
    /// Visual template used for the PDF
    pub pdf_template: Template,

    /// Snapshot of the total excluding VAT
    pub total_ht: Decimal,
    /// Snapshot of the total including VAT
    pub total_ttc: Decimal,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: Option<DateTime<Utc>>,

    items: Vec<LineItem>,
}

impl Quote {
    /// Create an empty quote dated today with one blank line item and the
    /// default payment clause.
    pub fn new() -> Self {
        let today = Utc::now().date_naive();
        Self {
            id: None,
            owner: None,
            quote_number: None,
            company_name: String::new(),
            company_contact: String::new(),
            company_address: String::new(),
            company_email: String::new(),
            company_phone: None,
            company_siret: None,
            company_logo: None,
            client_name: String::new(),
            client_company: None,
            client_address: String::new(),
            client_email: None,
            quote_date: today,
            quote_valid_until: Some(today + Duration::days(VALIDITY_DAYS)),
            quote_description: None,
            vat_rate: VatRate::default(),
            payment_terms: Some(DEFAULT_PAYMENT_TERMS.to_string()),
            pdf_template: Template::default(),
            total_ht: Decimal::ZERO,
            total_ttc: Decimal::ZERO,
            created_at: Utc::now(),
            updated_at: None,
            items: vec![LineItem::default()],
        }
    }

    /// The line items, in display order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Mutable access to the line items.
    pub fn items_mut(&mut self) -> &mut Vec<LineItem> {
        &mut self.items
    }

    /// Append an item. Adding an item whose id is already present is a no-op.
    pub fn add_item(&mut self, item: LineItem) {
        if !self.items.iter().any(|existing| existing.id == item.id) {
            self.items.push(item);
        }
    }

    /// Remove the item with the given id, returning it if present.
    pub fn remove_item(&mut self, id: Uuid) -> Option<LineItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Total excluding VAT, computed from the line items.
    pub fn total_ht(&self) -> Decimal {
        self.items.iter().map(LineItem::total_ht).sum()
    }

    /// VAT amount at the quote's rate.
    pub fn vat_amount(&self) -> Decimal {
        self.total_ht() * self.vat_rate.fraction()
    }

    /// Total including VAT.
    pub fn total_ttc(&self) -> Decimal {
        self.total_ht() + self.vat_amount()
    }

    /// Refresh the stored total snapshots and bump the update timestamp.
    pub fn calculate_totals(&mut self) {
        self.total_ht = self.total_ht();
        self.total_ttc = self.total_ttc();
        self.updated_at = Some(Utc::now());
    }

    /// Assign a quote number if none is set yet, and return it.
    ///
    /// Numbers follow `DF-YYYYMMDD-NNNN` with a random four-digit suffix.
    /// Calling this on a numbered quote returns the existing number.
    pub fn generate_quote_number(&mut self) -> &str {
        let date = self.quote_date;
        self.quote_number.get_or_insert_with(|| {
            let suffix: u32 = rand::thread_rng().gen_range(1..=9999);
            format!("DF-{}-{:04}", date.format("%Y%m%d"), suffix)
        })
    }

    /// A fresh copy suitable for editing into a new quote.
    ///
    /// Identity, number, timestamps and the totals snapshot are reset,
    /// dates are re-seeded from today, and every line item gets a new id.
    /// Parties, items, rate and template carry over.
    pub fn duplicate(&self) -> Self {
        let today = Utc::now().date_naive();
        Self {
            id: None,
            quote_number: None,
            quote_date: today,
            quote_valid_until: Some(today + Duration::days(VALIDITY_DAYS)),
            created_at: Utc::now(),
            updated_at: None,
            total_ht: Decimal::ZERO,
            total_ttc: Decimal::ZERO,
            items: self.items.iter().map(LineItem::duplicate).collect(),
            ..self.clone()
        }
    }

    /// Validate the quote for rendering, returning every failure at once.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.company_name.trim().is_empty() {
            errors.push(FieldError::new("company_name", "Le nom de l'émetteur est obligatoire"));
        }
        if self.company_contact.trim().is_empty() {
            errors.push(FieldError::new("company_contact", "Le contact de l'émetteur est obligatoire"));
        }
        if self.company_address.trim().is_empty() {
            errors.push(FieldError::new("company_address", "L'adresse de l'émetteur est obligatoire"));
        }
        if self.company_email.trim().is_empty() {
            errors.push(FieldError::new("company_email", "L'email de l'émetteur est obligatoire"));
        } else if !is_valid_email(self.company_email.trim()) {
            errors.push(FieldError::new("company_email", "Adresse email invalide"));
        }
        if self.client_name.trim().is_empty() {
            errors.push(FieldError::new("client_name", "Le nom du client est obligatoire"));
        }
        if self.client_address.trim().is_empty() {
            errors.push(FieldError::new("client_address", "L'adresse du client est obligatoire"));
        }
        if let Some(email) = self.client_email.as_deref() {
            if !email.trim().is_empty() && !is_valid_email(email.trim()) {
                errors.push(FieldError::new("client_email", "Adresse email invalide"));
            }
        }

        if self.items.is_empty() {
            errors.push(FieldError::new("items", "Le devis doit contenir au moins une ligne"));
        }
        for (i, item) in self.items.iter().enumerate() {
            errors.extend(item.validate(&format!("items[{}]", i)));
        }

        errors
    }
}

impl Default for Quote {
    fn default() -> Self {
        Self::new()
    }
}
