use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockyard_core::{CheckId, Entity, ProductId, SlotCode};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckStatus {
    InProgress,
    Completed,
}

/// One product's line on an inventory check.
///
/// `system_quantity` is the stock recorded when the check started;
/// `actual_quantity` stays `None` until the product is counted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub location: Option<SlotCode>,
    /// Unit price at snapshot time, used when the product is gone by completion.
    pub unit_price: Decimal,
    pub system_quantity: u32,
    pub actual_quantity: Option<u32>,
}

impl CountLine {
    pub fn is_counted(&self) -> bool {
        self.actual_quantity.is_some()
    }

    /// `actual - system`, reading an uncounted line as 0.
    pub fn difference(&self) -> i64 {
        i64::from(self.actual_quantity.unwrap_or(0)) - i64::from(self.system_quantity)
    }

    pub fn is_match(&self) -> bool {
        self.difference() == 0
    }
}

/// Figures computed when a check is completed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSummary {
    pub total_items: usize,
    pub matched: usize,
    pub discrepancies: usize,
    pub surplus_items: usize,
    pub shortage_items: usize,
    pub surplus_value: Decimal,
    pub shortage_value: Decimal,
    pub uncounted: usize,
    /// Products whose quantity was overwritten with the counted figure.
    pub corrections_applied: usize,
    /// Uncounted lines left alone although corrections were requested.
    pub skipped_uncounted: usize,
}

impl CheckSummary {
    /// Share of matching lines, in percent. An empty check counts as fully accurate.
    pub fn accuracy(&self) -> f64 {
        if self.total_items == 0 {
            return 100.0;
        }
        self.matched as f64 / self.total_items as f64 * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryCheck {
    pub id: CheckId,
    pub started_at: DateTime<Utc>,
    pub inspector: String,
    pub status: CheckStatus,
    pub notes: String,
    pub items: Vec<CountLine>,
    /// Set once, on completion.
    pub summary: Option<CheckSummary>,
}

impl InventoryCheck {
    pub fn is_in_progress(&self) -> bool {
        self.status == CheckStatus::InProgress
    }

    pub fn line(&self, product_id: ProductId) -> Option<&CountLine> {
        self.items.iter().find(|l| l.product_id == product_id)
    }

    pub fn counted(&self) -> usize {
        self.items.iter().filter(|l| l.is_counted()).count()
    }
}

impl Entity for InventoryCheck {
    type Id = CheckId;

    fn id(&self) -> CheckId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(system: u32, actual: Option<u32>) -> CountLine {
        CountLine {
            product_id: ProductId::new(1),
            product_name: "Widget".to_string(),
            location: None,
            unit_price: Decimal::from(3),
            system_quantity: system,
            actual_quantity: actual,
        }
    }

    #[test]
    fn uncounted_line_reads_as_zero() {
        let l = line(4, None);
        assert!(!l.is_counted());
        assert_eq!(l.difference(), -4);
        assert!(!l.is_match());

        assert!(line(0, None).is_match());
    }

    #[test]
    fn difference_is_actual_minus_system() {
        assert_eq!(line(10, Some(12)).difference(), 2);
        assert_eq!(line(10, Some(7)).difference(), -3);
        assert!(line(10, Some(10)).is_match());
    }

    #[test]
    fn accuracy_in_percent() {
        let summary = CheckSummary {
            total_items: 4,
            matched: 3,
            ..CheckSummary::default()
        };
        assert!((summary.accuracy() - 75.0).abs() < f64::EPSILON);
        assert!((CheckSummary::default().accuracy() - 100.0).abs() < f64::EPSILON);
    }
}
