//! Quote domain model: line items, VAT rates, the quote aggregate and its
//! validation rules.

pub mod line_item;
pub mod quote;
pub mod validation;
pub mod vat;

pub use line_item::LineItem;
pub use quote::{Quote, DEFAULT_PAYMENT_TERMS, VALIDITY_DAYS};
pub use validation::{FieldError, MAX_LABEL_LEN};
pub use vat::VatRate;
