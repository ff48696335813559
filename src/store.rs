//! Quote persistence boundary.
//!
//! [`QuoteStore`] is the seam a database-backed implementation plugs into;
//! [`MemoryQuoteStore`] is the in-process implementation used in tests and
//! single-user setups.

use crate::error::{Error, Result};
use crate::model::Quote;
use log::debug;
use rust_decimal::Decimal;
use std::collections::HashMap;
use uuid::Uuid;

/// Storage for quotes, scoped per owning user.
pub trait QuoteStore {
    /// Persist a quote, assigning an id on first save.
    ///
    /// Refreshes the total snapshots before writing. Fails with
    /// [`Error::DuplicateQuoteNumber`] when another quote already holds the
    /// same number; callers regenerate the number and retry.
    fn save(&mut self, quote: &mut Quote) -> Result<u64>;

    /// Fetch a quote by id.
    fn find(&self, id: u64) -> Result<Quote>;

    /// Fetch a quote by id, checking ownership.
    ///
    /// A missing quote is [`Error::NotFound`]; an existing quote held by a
    /// different owner is [`Error::AccessDenied`]. The two cases stay
    /// distinct so callers can answer 404 and 403 separately.
    fn find_owned(&self, id: u64, owner: Uuid) -> Result<Quote>;

    /// Delete a quote, with the same ownership rules as [`find_owned`](Self::find_owned).
    fn delete(&mut self, id: u64, owner: Uuid) -> Result<()>;

    /// All quotes of an owner, newest first.
    fn list_for_owner(&self, owner: Uuid) -> Vec<Quote>;

    /// Number of quotes an owner has.
    fn count_for_owner(&self, owner: Uuid) -> usize;

    /// Sum of the owner's quote totals excluding VAT.
    fn total_ht_for_owner(&self, owner: Uuid) -> Decimal;
}

/// In-memory store backed by a hash map.
#[derive(Debug, Default)]
pub struct MemoryQuoteStore {
    quotes: HashMap<u64, Quote>,
    next_id: u64,
}

impl MemoryQuoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn owned(&self, id: u64, owner: Uuid) -> Result<&Quote> {
        let quote = self.quotes.get(&id).ok_or(Error::NotFound(id))?;
        if quote.owner != Some(owner) {
            return Err(Error::AccessDenied(id));
        }
        Ok(quote)
    }
}

impl QuoteStore for MemoryQuoteStore {
    fn save(&mut self, quote: &mut Quote) -> Result<u64> {
        if let Some(number) = quote.quote_number.as_deref() {
            let taken = self
                .quotes
                .values()
                .any(|other| other.id != quote.id && other.quote_number.as_deref() == Some(number));
            if taken {
                return Err(Error::DuplicateQuoteNumber(number.to_string()));
            }
        }

        quote.calculate_totals();

        let id = match quote.id {
            Some(id) => id,
            None => {
                self.next_id += 1;
                quote.id = Some(self.next_id);
                self.next_id
            },
        };

        self.quotes.insert(id, quote.clone());
        debug!("saved quote {}", id);
        Ok(id)
    }

    fn find(&self, id: u64) -> Result<Quote> {
        self.quotes.get(&id).cloned().ok_or(Error::NotFound(id))
    }

    fn find_owned(&self, id: u64, owner: Uuid) -> Result<Quote> {
        self.owned(id, owner).cloned()
    }

    fn delete(&mut self, id: u64, owner: Uuid) -> Result<()> {
        self.owned(id, owner)?;
        self.quotes.remove(&id);
        Ok(())
    }

    fn list_for_owner(&self, owner: Uuid) -> Vec<Quote> {
        let mut quotes: Vec<Quote> = self
            .quotes
            .values()
            .filter(|quote| quote.owner == Some(owner))
            .cloned()
            .collect();
        quotes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        quotes
    }

    fn count_for_owner(&self, owner: Uuid) -> usize {
        self.quotes.values().filter(|quote| quote.owner == Some(owner)).count()
    }

    fn total_ht_for_owner(&self, owner: Uuid) -> Decimal {
        self.quotes
            .values()
            .filter(|quote| quote.owner == Some(owner))
            .map(|quote| quote.total_ht())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LineItem;
    use rust_decimal_macros::dec;

    fn quote_for(owner: Uuid, total: Decimal) -> Quote {
        let mut quote = Quote::new();
        quote.owner = Some(owner);
        quote.items_mut().clear();
        quote.add_item(LineItem {
            quantity: dec!(1),
            unit_price_ht: total,
            ..LineItem::new("Prestation")
        });
        quote
    }

    #[test]
    fn test_save_assigns_sequential_ids() {
        let mut store = MemoryQuoteStore::new();
        let owner = Uuid::new_v4();
        let first = store.save(&mut quote_for(owner, dec!(100))).unwrap();
        let second = store.save(&mut quote_for(owner, dec!(200))).unwrap();
        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }

    #[test]
    fn test_save_refreshes_snapshots() {
        let mut store = MemoryQuoteStore::new();
        let mut quote = quote_for(Uuid::new_v4(), dec!(100));
        store.save(&mut quote).unwrap();
        assert_eq!(quote.total_ht, dec!(100));
        assert_eq!(quote.total_ttc, dec!(120));
    }

    #[test]
    fn test_resave_keeps_id() {
        let mut store = MemoryQuoteStore::new();
        let mut quote = quote_for(Uuid::new_v4(), dec!(100));
        let id = store.save(&mut quote).unwrap();
        quote.client_name = "Nouveau client".to_string();
        assert_eq!(store.save(&mut quote).unwrap(), id);
        assert_eq!(store.find(id).unwrap().client_name, "Nouveau client");
    }

    #[test]
    fn test_duplicate_number_rejected() {
        let mut store = MemoryQuoteStore::new();
        let owner = Uuid::new_v4();

        let mut first = quote_for(owner, dec!(100));
        first.quote_number = Some("DF-20250101-0042".to_string());
        store.save(&mut first).unwrap();

        let mut second = quote_for(owner, dec!(200));
        second.quote_number = Some("DF-20250101-0042".to_string());
        let err = store.save(&mut second).unwrap_err();
        assert!(matches!(err, Error::DuplicateQuoteNumber(_)));

        // resaving the holder of the number is fine
        assert!(store.save(&mut first).is_ok());
    }

    #[test]
    fn test_not_found_vs_access_denied() {
        let mut store = MemoryQuoteStore::new();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let id = store.save(&mut quote_for(owner, dec!(100))).unwrap();

        assert!(matches!(store.find_owned(999, owner), Err(Error::NotFound(999))));
        assert!(matches!(store.find_owned(id, intruder), Err(Error::AccessDenied(_))));
        assert!(store.find_owned(id, owner).is_ok());
    }

    #[test]
    fn test_delete_checks_ownership() {
        let mut store = MemoryQuoteStore::new();
        let owner = Uuid::new_v4();
        let id = store.save(&mut quote_for(owner, dec!(100))).unwrap();

        assert!(matches!(store.delete(id, Uuid::new_v4()), Err(Error::AccessDenied(_))));
        store.delete(id, owner).unwrap();
        assert!(matches!(store.find(id), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_list_newest_first() {
        let mut store = MemoryQuoteStore::new();
        let owner = Uuid::new_v4();

        let mut older = quote_for(owner, dec!(100));
        older.created_at = chrono::Utc::now() - chrono::Duration::hours(2);
        store.save(&mut older).unwrap();
        let mut newer = quote_for(owner, dec!(200));
        store.save(&mut newer).unwrap();

        let listed = store.list_for_owner(owner);
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, newer.id);
        assert_eq!(listed[1].id, older.id);
    }

    #[test]
    fn test_aggregates_scoped_to_owner() {
        let mut store = MemoryQuoteStore::new();
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();

        store.save(&mut quote_for(owner, dec!(100))).unwrap();
        store.save(&mut quote_for(owner, dec!(250.50))).unwrap();
        store.save(&mut quote_for(other, dec!(999))).unwrap();

        assert_eq!(store.count_for_owner(owner), 2);
        assert_eq!(store.total_ht_for_owner(owner), dec!(350.50));
        assert_eq!(store.count_for_owner(Uuid::new_v4()), 0);
        assert_eq!(store.total_ht_for_owner(Uuid::new_v4()), Decimal::ZERO);
    }
}
