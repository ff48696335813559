//! Quote total computation.
//!
//! Totals are derived from the line items with decimal arithmetic:
//! total HT is the sum of quantity x unit price, the VAT amount follows
//! the quote's rate, and total TTC is their sum. No floating point is
//! involved, so cent amounts stay exact.

use devisflash::{LineItem, Quote, VatRate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn item(label: &str, quantity: Decimal, unit_price_ht: Decimal) -> LineItem {
    LineItem {
        quantity,
        unit_price_ht,
        ..LineItem::new(label)
    }
}

fn quote_with_items(items: Vec<LineItem>) -> Quote {
    let mut quote = Quote::new();
    quote.items_mut().clear();
    for it in items {
        quote.add_item(it);
    }
    quote
}

#[test]
fn test_worked_example_at_standard_rate() {
    // 10 x 100 + 2 x 50 = 1100 HT, 220 of VAT at 20 %, 1320 TTC
    let quote = quote_with_items(vec![
        item("Développement", dec!(10), dec!(100)),
        item("Maintenance", dec!(2), dec!(50)),
    ]);

    assert_eq!(quote.total_ht(), dec!(1100));
    assert_eq!(quote.vat_amount(), dec!(220));
    assert_eq!(quote.total_ttc(), dec!(1320));
}

#[test]
fn test_every_vat_rate() {
    let mut quote = quote_with_items(vec![item("Prestation", dec!(1), dec!(1000))]);

    let expected = [
        (VatRate::Zero, dec!(0), dec!(1000)),
        (VatRate::Reduced, dec!(55), dec!(1055)),
        (VatRate::Intermediate, dec!(100), dec!(1100)),
        (VatRate::Standard, dec!(200), dec!(1200)),
    ];
    for (rate, vat, ttc) in expected {
        quote.vat_rate = rate;
        assert_eq!(quote.vat_amount(), vat, "VAT at {:?}", rate);
        assert_eq!(quote.total_ttc(), ttc, "TTC at {:?}", rate);
    }
}

#[test]
fn test_fractional_quantities_stay_exact() {
    let quote = quote_with_items(vec![
        item("Conseil", dec!(2.5), dec!(80.40)),
        item("Déplacement", dec!(0.5), dec!(0.10)),
    ]);

    assert_eq!(quote.total_ht(), dec!(201.05));
}

#[test]
fn test_empty_quote_totals_are_zero() {
    let quote = quote_with_items(vec![]);
    assert_eq!(quote.total_ht(), Decimal::ZERO);
    assert_eq!(quote.vat_amount(), Decimal::ZERO);
    assert_eq!(quote.total_ttc(), Decimal::ZERO);
}

#[test]
fn test_snapshots_follow_item_edits() {
    let mut quote = quote_with_items(vec![item("Prestation", dec!(1), dec!(100))]);
    quote.calculate_totals();
    assert_eq!(quote.total_ht, dec!(100));

    quote.items_mut()[0].quantity = dec!(3);
    // snapshot is stale until recomputed, the derived value is not
    assert_eq!(quote.total_ht, dec!(100));
    assert_eq!(quote.total_ht(), dec!(300));

    quote.calculate_totals();
    assert_eq!(quote.total_ht, dec!(300));
}

proptest! {
    /// The total must not depend on the order of the line items.
    #[test]
    fn test_total_is_order_independent(
        cents in prop::collection::vec((1u32..=1000, 1u32..=100_000), 1..12)
    ) {
        let items: Vec<LineItem> = cents
            .iter()
            .map(|&(qty, price_cents)| {
                item(
                    "Ligne",
                    Decimal::from(qty),
                    Decimal::new(price_cents as i64, 2),
                )
            })
            .collect();

        let forward = quote_with_items(items.clone());
        let mut reversed_items = items;
        reversed_items.reverse();
        let reversed = quote_with_items(reversed_items);

        prop_assert_eq!(forward.total_ht(), reversed.total_ht());
        prop_assert_eq!(forward.total_ttc(), reversed.total_ttc());
    }

    /// TTC always equals HT plus the VAT amount.
    #[test]
    fn test_ttc_decomposition(
        qty in 1u32..=500,
        price_cents in 0u32..=10_000_000,
        rate_index in 0usize..4,
    ) {
        let mut quote = quote_with_items(vec![item(
            "Ligne",
            Decimal::from(qty),
            Decimal::new(price_cents as i64, 2),
        )]);
        quote.vat_rate = VatRate::ALL[rate_index];

        prop_assert_eq!(quote.total_ttc(), quote.total_ht() + quote.vat_amount());
    }
}
