//! Community-wide impact figures shown on the landing page.
//!
//! Waste collected is the sum of the leading number of every task's free-text
//! amount (see [`WasteAmount::leading_quantity`]); CO2 offset is half of
//! that. Both are rounded to one decimal place for display.
//!
//! [`WasteAmount::leading_quantity`]: super::WasteAmount::leading_quantity

use serde::{Deserialize, Serialize};

/// CO2 offset credited per unit of waste collected.
pub const CO2_OFFSET_PER_UNIT: f64 = 0.5;

/// Raw aggregates read from storage.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImpactTotals {
    /// Sum of leading quantities across all collection tasks.
    pub waste_collected: f64,
    pub reports_submitted: u64,
    /// Sum of every `earned*` ledger row.
    pub tokens_earned: u64,
}

/// Rounded figures returned to clients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactSummary {
    pub waste_collected: f64,
    pub reports_submitted: u64,
    pub tokens_earned: u64,
    pub co2_offset: f64,
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl From<ImpactTotals> for ImpactSummary {
    /// # Examples
    /// ```
    /// use cleanbee::domain::{ImpactSummary, ImpactTotals};
    ///
    /// let summary = ImpactSummary::from(ImpactTotals {
    ///     waste_collected: 7.25,
    ///     reports_submitted: 3,
    ///     tokens_earned: 40,
    /// });
    /// assert_eq!(summary.waste_collected, 7.3);
    /// assert_eq!(summary.co2_offset, 3.6);
    /// ```
    fn from(totals: ImpactTotals) -> Self {
        Self {
            waste_collected: round_to_tenth(totals.waste_collected),
            reports_submitted: totals.reports_submitted,
            tokens_earned: totals.tokens_earned,
            co2_offset: round_to_tenth(totals.waste_collected * CO2_OFFSET_PER_UNIT),
        }
    }
}
