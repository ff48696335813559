//! Quote line items.

use crate::model::validation::{FieldError, MAX_LABEL_LEN};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One billable line of a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Stable identity, kept across edits
    pub id: Uuid,
    /// Description shown in the PDF table
    pub label: String,
    /// Billed quantity, may be fractional (hours, kilos)
    pub quantity: Decimal,
    /// Unit price excluding VAT
    pub unit_price_ht: Decimal,
}

impl LineItem {
    /// Create an item with the given label, quantity 1 and price 0.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            quantity: dec!(1),
            unit_price_ht: Decimal::ZERO,
        }
    }

    /// Line total excluding VAT.
    pub fn total_ht(&self) -> Decimal {
        self.quantity * self.unit_price_ht
    }

    /// Same content under a fresh identity, for quote duplication.
    pub fn duplicate(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            ..self.clone()
        }
    }

    /// Validate the item, reporting errors under the given field prefix.
    pub fn validate(&self, prefix: &str) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.label.trim().is_empty() {
            errors.push(FieldError::new(
                format!("{}.label", prefix),
                "La désignation est obligatoire",
            ));
        } else if self.label.chars().count() > MAX_LABEL_LEN {
            errors.push(FieldError::new(
                format!("{}.label", prefix),
                format!("La désignation ne peut pas dépasser {} caractères", MAX_LABEL_LEN),
            ));
        }

        if self.quantity <= Decimal::ZERO {
            errors.push(FieldError::new(
                format!("{}.quantity", prefix),
                "La quantité doit être supérieure à zéro",
            ));
        }

        if self.unit_price_ht < Decimal::ZERO {
            errors.push(FieldError::new(
                format!("{}.unit_price_ht", prefix),
                "Le prix unitaire ne peut pas être négatif",
            ));
        }

        errors
    }
}

impl Default for LineItem {
    fn default() -> Self {
        Self::new("")
    }
}
