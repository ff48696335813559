//! French VAT rates.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// The four French VAT rates a quote can carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VatRate {
    /// 0 % (exonération)
    Zero,
    /// 5,5 % (taux réduit)
    Reduced,
    /// 10 % (taux intermédiaire)
    Intermediate,
    /// 20 % (taux normal)
    #[default]
    Standard,
}

impl VatRate {
    /// All rates, in ascending order.
    pub const ALL: [VatRate; 4] = [
        VatRate::Zero,
        VatRate::Reduced,
        VatRate::Intermediate,
        VatRate::Standard,
    ];

    /// The rate as a percentage.
    pub fn percent(self) -> Decimal {
        match self {
            VatRate::Zero => dec!(0),
            VatRate::Reduced => dec!(5.5),
            VatRate::Intermediate => dec!(10),
            VatRate::Standard => dec!(20),
        }
    }

    /// The rate as a multiplier fraction (e.g. `0.20`).
    pub fn fraction(self) -> Decimal {
        self.percent() / dec!(100)
    }

    /// Look up a rate by its percentage value.
    pub fn from_percent(percent: Decimal) -> Option<Self> {
        Self::ALL.into_iter().find(|rate| rate.percent() == percent.normalize())
    }
}
