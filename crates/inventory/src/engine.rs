//! Inventory checks: snapshot, count, reconcile.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use stockyard_catalog::Catalog;
use stockyard_core::{CheckId, IdSequence, ProductId, WarehouseError, WarehouseResult, find_by_id};

use crate::check::{CheckStatus, CheckSummary, CountLine, InventoryCheck};

/// Runs inventory checks against the catalog. At most one check is in
/// progress at a time; completed checks are kept as history.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationEngine {
    checks: Vec<InventoryCheck>,
    ids: IdSequence<CheckId>,
}

impl ReconciliationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a check, snapshotting every product's current quantity.
    pub fn start(
        &mut self,
        catalog: &Catalog,
        inspector: impl Into<String>,
        at: DateTime<Utc>,
    ) -> WarehouseResult<CheckId> {
        if let Some(open) = self.current() {
            return Err(WarehouseError::AlreadyInProgress(open.id));
        }
        let inspector = inspector.into();
        if inspector.trim().is_empty() {
            return Err(WarehouseError::validation("inspector cannot be empty"));
        }

        let items: Vec<CountLine> = catalog
            .iter()
            .map(|p| CountLine {
                product_id: p.product_id(),
                product_name: p.name().to_string(),
                location: p.location(),
                unit_price: p.unit_price(),
                system_quantity: p.quantity(),
                actual_quantity: None,
            })
            .collect();

        let id = self.ids.next_id();
        tracing::info!(check_id = %id, inspector = %inspector, items = items.len(), "inventory check started");
        self.checks.push(InventoryCheck {
            id,
            started_at: at,
            inspector,
            status: CheckStatus::InProgress,
            notes: String::new(),
            items,
            summary: None,
        });
        Ok(id)
    }

    /// The in-progress check, if any.
    pub fn current(&self) -> Option<&InventoryCheck> {
        self.checks.iter().find(|c| c.is_in_progress())
    }

    /// Record counted quantities on the open check. Later entries for the same
    /// product overwrite earlier ones; products not on the check are ignored.
    /// Returns how many entries matched a line.
    pub fn record_counts(&mut self, counts: &[(ProductId, u32)]) -> WarehouseResult<usize> {
        let check = self.current_mut()?;
        let mut recorded = 0;
        for &(product_id, actual) in counts {
            match check.items.iter_mut().find(|l| l.product_id == product_id) {
                Some(line) => {
                    line.actual_quantity = Some(actual);
                    recorded += 1;
                }
                None => {
                    tracing::debug!(check_id = %check.id, product_id = %product_id, "count for product not on check")
                }
            }
        }
        tracing::debug!(check_id = %check.id, recorded, "counts recorded");
        Ok(recorded)
    }

    /// Lines of the open check that have not been counted yet.
    pub fn pending(&self) -> WarehouseResult<Vec<&CountLine>> {
        let check = self.current().ok_or(WarehouseError::NoActiveCheck)?;
        Ok(check.items.iter().filter(|l| !l.is_counted()).collect())
    }

    /// Close the open check.
    ///
    /// With `apply_corrections`, every counted line overwrites its product's
    /// quantity. Uncounted lines are never written; they are reported in
    /// `skipped_uncounted`.
    pub fn complete(
        &mut self,
        catalog: &mut Catalog,
        apply_corrections: bool,
        notes: impl Into<String>,
    ) -> WarehouseResult<CheckSummary> {
        let notes = notes.into();
        let check = self.current_mut()?;
        let mut summary = summarize(&check.items, catalog);

        if apply_corrections {
            for line in &check.items {
                let Some(actual) = line.actual_quantity else {
                    summary.skipped_uncounted += 1;
                    continue;
                };
                if !catalog.contains(line.product_id) {
                    tracing::warn!(check_id = %check.id, product_id = %line.product_id, "product removed during check, correction skipped");
                    continue;
                }
                catalog.set_quantity(line.product_id, actual)?;
                summary.corrections_applied += 1;
            }
            if summary.skipped_uncounted > 0 {
                tracing::warn!(
                    check_id = %check.id,
                    skipped = summary.skipped_uncounted,
                    "uncounted items left at system quantity"
                );
            }
        }

        check.status = CheckStatus::Completed;
        check.notes = notes;
        check.summary = Some(summary.clone());
        tracing::info!(
            check_id = %check.id,
            matched = summary.matched,
            discrepancies = summary.discrepancies,
            surplus_value = %summary.surplus_value,
            shortage_value = %summary.shortage_value,
            corrections = summary.corrections_applied,
            "inventory check completed"
        );
        Ok(summary)
    }

    /// All checks, newest first.
    pub fn history(&self) -> Vec<&InventoryCheck> {
        let mut checks: Vec<&InventoryCheck> = self.checks.iter().collect();
        checks.sort_by(|a, b| b.started_at.cmp(&a.started_at).then(b.id.cmp(&a.id)));
        checks
    }

    pub fn check(&self, id: CheckId) -> WarehouseResult<&InventoryCheck> {
        find_by_id(&self.checks, id).ok_or_else(|| WarehouseError::not_found(format!("inventory check {id}")))
    }

    /// Most recent completed check.
    pub fn last_completed(&self) -> Option<&InventoryCheck> {
        self.history().into_iter().find(|c| !c.is_in_progress())
    }

    /// Accuracy (percent) of the most recent completed check.
    pub fn accuracy(&self) -> Option<f64> {
        self.last_completed()
            .and_then(|c| c.summary.as_ref())
            .map(CheckSummary::accuracy)
    }

    /// True when the open check has a line for `product_id`.
    pub fn is_referenced(&self, product_id: ProductId) -> bool {
        self.current().is_some_and(|c| c.line(product_id).is_some())
    }

    fn current_mut(&mut self) -> WarehouseResult<&mut InventoryCheck> {
        self.checks
            .iter_mut()
            .find(|c| c.is_in_progress())
            .ok_or(WarehouseError::NoActiveCheck)
    }
}

/// Compute matched/discrepancy/surplus/shortage figures for a set of lines.
///
/// Values use the product's current unit price, falling back to the snapshot
/// price for products no longer in the catalog.
pub fn summarize(items: &[CountLine], catalog: &Catalog) -> CheckSummary {
    let mut summary = CheckSummary {
        total_items: items.len(),
        ..CheckSummary::default()
    };
    for line in items {
        if !line.is_counted() {
            summary.uncounted += 1;
        }
        let difference = line.difference();
        let unit_price = catalog
            .find_by_id(line.product_id)
            .map(|p| p.unit_price())
            .unwrap_or(line.unit_price);
        let value = Decimal::from(difference.unsigned_abs()) * unit_price;
        match difference {
            0 => summary.matched += 1,
            d if d > 0 => {
                summary.surplus_items += 1;
                summary.surplus_value += value;
            }
            _ => {
                summary.shortage_items += 1;
                summary.shortage_value += value;
            }
        }
    }
    summary.discrepancies = summary.total_items - summary.matched;
    summary
}
